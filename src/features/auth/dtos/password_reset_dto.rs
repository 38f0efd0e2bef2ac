use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::shared::validation::{not_blank, password_strength};

/// Request DTO for starting a password reset
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ForgotPasswordDto {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,
}

/// Request DTO for checking a reset token
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ValidateResetTokenDto {
    #[validate(custom(function = not_blank))]
    pub token: String,
}

/// Request DTO for completing a password reset
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ResetPasswordDto {
    #[validate(custom(function = not_blank))]
    pub token: String,

    #[validate(custom(function = password_strength))]
    pub new_password: String,
}

/// Response DTO for token validation
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TokenValidationDto {
    pub valid: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reset_password_dto_requires_strong_password() {
        let dto = ResetPasswordDto {
            token: "sometoken".to_string(),
            new_password: "weakpassword".to_string(),
        };
        assert!(dto.validate().is_err());

        let dto = ResetPasswordDto {
            token: "sometoken".to_string(),
            new_password: "Str0ngPassword".to_string(),
        };
        assert!(dto.validate().is_ok());
    }

    #[test]
    fn test_validate_token_dto_rejects_blank_token() {
        let dto = ValidateResetTokenDto {
            token: "  ".to_string(),
        };
        assert!(dto.validate().is_err());
    }
}
