use crate::core::error::{AppError, Result};
use crate::core::extractor::AppJson;
use crate::features::auth::dtos::{
    ForgotPasswordDto, ResetPasswordDto, TokenValidationDto, ValidateResetTokenDto,
};
use crate::features::auth::services::PasswordResetService;
use crate::shared::types::ApiResponse;
use axum::{extract::State, Json};
use std::sync::Arc;
use validator::Validate;

const GENERIC_RESET_MESSAGE: &str =
    "If the email is registered, a password reset link has been sent";

/// Request a password reset link
///
/// Always answers with the same message, whether or not the email exists.
#[utoipa::path(
    post,
    path = "/api/auth/forgot-password",
    request_body = ForgotPasswordDto,
    responses(
        (status = 200, description = "Reset request accepted"),
        (status = 400, description = "Validation error")
    ),
    tag = "auth"
)]
pub async fn forgot_password(
    State(service): State<Arc<PasswordResetService>>,
    AppJson(dto): AppJson<ForgotPasswordDto>,
) -> Result<Json<ApiResponse<()>>> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    service.forgot_password(&dto.email).await?;
    Ok(Json(ApiResponse::success(
        None,
        Some(GENERIC_RESET_MESSAGE.to_string()),
        None,
    )))
}

/// Check whether a reset token is still usable
#[utoipa::path(
    post,
    path = "/api/auth/validate-reset-token",
    request_body = ValidateResetTokenDto,
    responses(
        (status = 200, description = "Token validity", body = ApiResponse<TokenValidationDto>),
        (status = 400, description = "Validation error")
    ),
    tag = "auth"
)]
pub async fn validate_reset_token(
    State(service): State<Arc<PasswordResetService>>,
    AppJson(dto): AppJson<ValidateResetTokenDto>,
) -> Result<Json<ApiResponse<TokenValidationDto>>> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let valid = service.validate_token(&dto.token).await?;
    Ok(Json(ApiResponse::success(
        Some(TokenValidationDto { valid }),
        None,
        None,
    )))
}

/// Complete a password reset with a fresh token
#[utoipa::path(
    post,
    path = "/api/auth/reset-password",
    request_body = ResetPasswordDto,
    responses(
        (status = 200, description = "Password updated"),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Invalid, expired or already used token")
    ),
    tag = "auth"
)]
pub async fn reset_password(
    State(service): State<Arc<PasswordResetService>>,
    AppJson(dto): AppJson<ResetPasswordDto>,
) -> Result<Json<ApiResponse<()>>> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    service.reset_password(&dto.token, &dto.new_password).await?;
    Ok(Json(ApiResponse::success(
        None,
        Some("Password updated successfully".to_string()),
        None,
    )))
}
