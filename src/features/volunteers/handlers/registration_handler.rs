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
use crate::features::volunteers::dtos::{
    DetailedRegistrationDto, RegisterForEventDto, RegistrationDto, SubmitResponsesDto,
    SubmitResponsesResultDto, UpdateAcceptanceDto,
};
use crate::features::volunteers::services::RegistrationService;
use crate::shared::types::{ApiResponse, Meta, PaginationQuery};

/// Register a volunteer for an event, creating the volunteer if new
#[utoipa::path(
    post,
    path = "/api/registrations",
    request_body = RegisterForEventDto,
    responses(
        (status = 201, description = "Registration created", body = ApiResponse<RegistrationDto>),
        (status = 400, description = "Validation error"),
        (status = 404, description = "Event not found"),
        (status = 409, description = "Already registered for this event")
    ),
    tag = "registrations"
)]
pub async fn register_for_event(
    State(service): State<Arc<RegistrationService>>,
    AppJson(dto): AppJson<RegisterForEventDto>,
) -> Result<(StatusCode, Json<ApiResponse<RegistrationDto>>)> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let registration = service.register_for_event(dto).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(Some(registration), None, None)),
    ))
}

/// List registrations for an event
#[utoipa::path(
    get,
    path = "/api/events/{id}/registrations",
    params(
        ("id" = Uuid, Path, description = "Event id"),
        PaginationQuery
    ),
    responses(
        (status = 200, description = "Registrations for the event", body = ApiResponse<Vec<RegistrationDto>>),
        (status = 404, description = "Event not found")
    ),
    tag = "registrations",
    security(("bearer_auth" = []))
)]
pub async fn list_registrations(
    State(service): State<Arc<RegistrationService>>,
    Path(id): Path<Uuid>,
    Query(pagination): Query<PaginationQuery>,
) -> Result<Json<ApiResponse<Vec<RegistrationDto>>>> {
    let (registrations, total) = service
        .list_for_event(id, pagination.offset(), pagination.limit())
        .await?;
    Ok(Json(ApiResponse::success(
        Some(registrations),
        None,
        Some(Meta { total }),
    )))
}

/// List registrations with volunteer identity and pre-event answers
#[utoipa::path(
    get,
    path = "/api/events/{id}/registrations/detailed",
    params(
        ("id" = Uuid, Path, description = "Event id"),
        PaginationQuery
    ),
    responses(
        (status = 200, description = "Detailed registrations", body = ApiResponse<Vec<DetailedRegistrationDto>>),
        (status = 404, description = "Event not found")
    ),
    tag = "registrations",
    security(("bearer_auth" = []))
)]
pub async fn list_detailed_registrations(
    State(service): State<Arc<RegistrationService>>,
    Path(id): Path<Uuid>,
    Query(pagination): Query<PaginationQuery>,
) -> Result<Json<ApiResponse<Vec<DetailedRegistrationDto>>>> {
    let (registrations, total) = service
        .list_detailed_for_event(id, pagination.offset(), pagination.limit())
        .await?;
    Ok(Json(ApiResponse::success(
        Some(registrations),
        None,
        Some(Meta { total }),
    )))
}

/// Accept or reject a registration
#[utoipa::path(
    patch,
    path = "/api/registrations/{id}/acceptance",
    params(("id" = Uuid, Path, description = "Registration id")),
    request_body = UpdateAcceptanceDto,
    responses(
        (status = 200, description = "Acceptance updated", body = ApiResponse<RegistrationDto>),
        (status = 404, description = "Registration not found")
    ),
    tag = "registrations",
    security(("bearer_auth" = []))
)]
pub async fn update_acceptance(
    State(service): State<Arc<RegistrationService>>,
    Path(id): Path<Uuid>,
    AppJson(dto): AppJson<UpdateAcceptanceDto>,
) -> Result<Json<ApiResponse<RegistrationDto>>> {
    let registration = service.set_acceptance(id, dto.accepted).await?;
    Ok(Json(ApiResponse::success(Some(registration), None, None)))
}

/// Submit pre- or post-event questionnaire answers for a registration
#[utoipa::path(
    post,
    path = "/api/registrations/{id}/responses",
    params(("id" = Uuid, Path, description = "Registration id")),
    request_body = SubmitResponsesDto,
    responses(
        (status = 201, description = "Responses recorded", body = ApiResponse<SubmitResponsesResultDto>),
        (status = 400, description = "Validation error or unknown question/option"),
        (status = 404, description = "Registration not found")
    ),
    tag = "registrations"
)]
pub async fn submit_responses(
    State(service): State<Arc<RegistrationService>>,
    Path(id): Path<Uuid>,
    AppJson(dto): AppJson<SubmitResponsesDto>,
) -> Result<(StatusCode, Json<ApiResponse<SubmitResponsesResultDto>>)> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let result = service.submit_responses(id, dto).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(Some(result), None, None)),
    ))
}
