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
use crate::features::volunteers::dtos::{CreateVolunteerDto, VolunteerDto};
use crate::features::volunteers::services::VolunteerService;
use crate::shared::types::{ApiResponse, Meta, PaginationQuery};

/// Create a volunteer
#[utoipa::path(
    post,
    path = "/api/volunteers",
    request_body = CreateVolunteerDto,
    responses(
        (status = 201, description = "Volunteer created", body = ApiResponse<VolunteerDto>),
        (status = 400, description = "Validation error"),
        (status = 409, description = "Identification number already registered")
    ),
    tag = "volunteers"
)]
pub async fn create_volunteer(
    State(service): State<Arc<VolunteerService>>,
    AppJson(dto): AppJson<CreateVolunteerDto>,
) -> Result<(StatusCode, Json<ApiResponse<VolunteerDto>>)> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let volunteer = service.create(dto).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(Some(volunteer), None, None)),
    ))
}

/// List volunteers
#[utoipa::path(
    get,
    path = "/api/volunteers",
    params(PaginationQuery),
    responses(
        (status = 200, description = "List of volunteers", body = ApiResponse<Vec<VolunteerDto>>),
    ),
    tag = "volunteers",
    security(("bearer_auth" = []))
)]
pub async fn list_volunteers(
    State(service): State<Arc<VolunteerService>>,
    Query(pagination): Query<PaginationQuery>,
) -> Result<Json<ApiResponse<Vec<VolunteerDto>>>> {
    let (volunteers, total) = service
        .list(pagination.offset(), pagination.limit())
        .await?;
    Ok(Json(ApiResponse::success(
        Some(volunteers),
        None,
        Some(Meta { total }),
    )))
}

/// Get a volunteer by id
#[utoipa::path(
    get,
    path = "/api/volunteers/{id}",
    params(("id" = Uuid, Path, description = "Volunteer id")),
    responses(
        (status = 200, description = "Volunteer found", body = ApiResponse<VolunteerDto>),
        (status = 404, description = "Volunteer not found")
    ),
    tag = "volunteers",
    security(("bearer_auth" = []))
)]
pub async fn get_volunteer(
    State(service): State<Arc<VolunteerService>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<VolunteerDto>>> {
    let volunteer = service.get(id).await?;
    Ok(Json(ApiResponse::success(Some(volunteer), None, None)))
}
