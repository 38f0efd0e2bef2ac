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
use crate::features::forms::dtos::{CreateFormDto, FormDto, FormSummaryDto, UpdateFormDto};
use crate::features::forms::services::FormService;
use crate::shared::types::{ApiResponse, Meta, PaginationQuery};

/// Create a form with its questions
#[utoipa::path(
    post,
    path = "/api/forms",
    request_body = CreateFormDto,
    responses(
        (status = 201, description = "Form created", body = ApiResponse<FormDto>),
        (status = 400, description = "Validation error"),
        (status = 409, description = "Form name already in use")
    ),
    tag = "forms",
    security(("bearer_auth" = []))
)]
pub async fn create_form(
    State(service): State<Arc<FormService>>,
    AppJson(dto): AppJson<CreateFormDto>,
) -> Result<(StatusCode, Json<ApiResponse<FormDto>>)> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let form = service.create(dto).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(Some(form), None, None)),
    ))
}

/// List forms
#[utoipa::path(
    get,
    path = "/api/forms",
    params(PaginationQuery),
    responses(
        (status = 200, description = "List of forms", body = ApiResponse<Vec<FormSummaryDto>>),
    ),
    tag = "forms",
    security(("bearer_auth" = []))
)]
pub async fn list_forms(
    State(service): State<Arc<FormService>>,
    Query(pagination): Query<PaginationQuery>,
) -> Result<Json<ApiResponse<Vec<FormSummaryDto>>>> {
    let (forms, total) = service
        .list(pagination.offset(), pagination.limit())
        .await?;
    Ok(Json(ApiResponse::success(
        Some(forms),
        None,
        Some(Meta { total }),
    )))
}

/// Get a form with nested questions and options
#[utoipa::path(
    get,
    path = "/api/forms/{id}",
    params(("id" = Uuid, Path, description = "Form id")),
    responses(
        (status = 200, description = "Form found", body = ApiResponse<FormDto>),
        (status = 404, description = "Form not found")
    ),
    tag = "forms",
    security(("bearer_auth" = []))
)]
pub async fn get_form(
    State(service): State<Arc<FormService>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<FormDto>>> {
    let form = service.get(id).await?;
    Ok(Json(ApiResponse::success(Some(form), None, None)))
}

/// Update a form; a provided question list replaces the existing one
#[utoipa::path(
    put,
    path = "/api/forms/{id}",
    params(("id" = Uuid, Path, description = "Form id")),
    request_body = UpdateFormDto,
    responses(
        (status = 200, description = "Form updated", body = ApiResponse<FormDto>),
        (status = 400, description = "Validation error"),
        (status = 404, description = "Form not found"),
        (status = 409, description = "Form name already in use")
    ),
    tag = "forms",
    security(("bearer_auth" = []))
)]
pub async fn update_form(
    State(service): State<Arc<FormService>>,
    Path(id): Path<Uuid>,
    AppJson(dto): AppJson<UpdateFormDto>,
) -> Result<Json<ApiResponse<FormDto>>> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let form = service.update(id, dto).await?;
    Ok(Json(ApiResponse::success(Some(form), None, None)))
}

/// Delete a form and everything it owns
#[utoipa::path(
    delete,
    path = "/api/forms/{id}",
    params(("id" = Uuid, Path, description = "Form id")),
    responses(
        (status = 200, description = "Form deleted"),
        (status = 404, description = "Form not found")
    ),
    tag = "forms",
    security(("bearer_auth" = []))
)]
pub async fn delete_form(
    State(service): State<Arc<FormService>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<()>>> {
    service.delete(id).await?;
    Ok(Json(ApiResponse::success(
        None,
        Some("Form deleted".to_string()),
        None,
    )))
}
