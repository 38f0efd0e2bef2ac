use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;
use validator::Validate;

use crate::core::error::{AppError, Result};
use crate::core::extractor::AppJson;
use crate::features::events::dtos::{CreateEventDto, EventDto, EventStatsDto, UpdateEventDto};
use crate::features::events::services::EventService;
use crate::shared::types::{ApiResponse, Meta, PaginationQuery};

/// Create an event
#[utoipa::path(
    post,
    path = "/api/events",
    request_body = CreateEventDto,
    responses(
        (status = 201, description = "Event created", body = ApiResponse<EventDto>),
        (status = 400, description = "Validation error or missing form reference"),
        (status = 409, description = "Event name already in use")
    ),
    tag = "events",
    security(("bearer_auth" = []))
)]
pub async fn create_event(
    State(service): State<Arc<EventService>>,
    AppJson(dto): AppJson<CreateEventDto>,
) -> Result<(StatusCode, Json<ApiResponse<EventDto>>)> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let event = service.create(dto).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(Some(event), None, None)),
    ))
}

/// List events
#[utoipa::path(
    get,
    path = "/api/events",
    params(PaginationQuery),
    responses(
        (status = 200, description = "List of events", body = ApiResponse<Vec<EventDto>>),
    ),
    tag = "events"
)]
pub async fn list_events(
    State(service): State<Arc<EventService>>,
    Query(pagination): Query<PaginationQuery>,
) -> Result<Json<ApiResponse<Vec<EventDto>>>> {
    let (events, total) = service
        .list(pagination.offset(), pagination.limit())
        .await?;
    Ok(Json(ApiResponse::success(
        Some(events),
        None,
        Some(Meta { total }),
    )))
}

/// List events with registration counts
#[utoipa::path(
    get,
    path = "/api/events/stats",
    params(PaginationQuery),
    responses(
        (status = 200, description = "Events with registration counts", body = ApiResponse<Vec<EventStatsDto>>),
    ),
    tag = "events"
)]
pub async fn list_events_with_stats(
    State(service): State<Arc<EventService>>,
    Query(pagination): Query<PaginationQuery>,
) -> Result<Json<ApiResponse<Vec<EventStatsDto>>>> {
    let (events, total) = service
        .list_with_stats(pagination.offset(), pagination.limit())
        .await?;
    Ok(Json(ApiResponse::success(
        Some(events),
        None,
        Some(Meta { total }),
    )))
}

/// Get an event by id
#[utoipa::path(
    get,
    path = "/api/events/{id}",
    params(("id" = Uuid, Path, description = "Event id")),
    responses(
        (status = 200, description = "Event found", body = ApiResponse<EventDto>),
        (status = 404, description = "Event not found")
    ),
    tag = "events"
)]
pub async fn get_event(
    State(service): State<Arc<EventService>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<EventDto>>> {
    let event = service.get(id).await?;
    Ok(Json(ApiResponse::success(Some(event), None, None)))
}

/// Update an event; only provided fields overwrite
#[utoipa::path(
    put,
    path = "/api/events/{id}",
    params(("id" = Uuid, Path, description = "Event id")),
    request_body = UpdateEventDto,
    responses(
        (status = 200, description = "Event updated", body = ApiResponse<EventDto>),
        (status = 400, description = "Validation error or missing form reference"),
        (status = 404, description = "Event not found"),
        (status = 409, description = "Event name already in use")
    ),
    tag = "events",
    security(("bearer_auth" = []))
)]
pub async fn update_event(
    State(service): State<Arc<EventService>>,
    Path(id): Path<Uuid>,
    AppJson(dto): AppJson<UpdateEventDto>,
) -> Result<Json<ApiResponse<EventDto>>> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let event = service.update(id, dto).await?;
    Ok(Json(ApiResponse::success(Some(event), None, None)))
}

/// Delete an event
#[utoipa::path(
    delete,
    path = "/api/events/{id}",
    params(("id" = Uuid, Path, description = "Event id")),
    responses(
        (status = 200, description = "Event deleted"),
        (status = 404, description = "Event not found"),
        (status = 409, description = "Event has registrations")
    ),
    tag = "events",
    security(("bearer_auth" = []))
)]
pub async fn delete_event(
    State(service): State<Arc<EventService>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<()>>> {
    service.delete(id).await?;
    Ok(Json(ApiResponse::success(
        None,
        Some("Event deleted".to_string()),
        None,
    )))
}
