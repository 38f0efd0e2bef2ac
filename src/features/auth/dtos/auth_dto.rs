use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::features::auth::models::Administrator;
use crate::shared::validation::not_blank;

/// Request DTO for administrator registration
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequestDto {
    #[validate(
        custom(function = not_blank),
        length(max = 255, message = "Name must not exceed 255 characters")
    )]
    pub name: String,

    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,
}

/// Request DTO for administrator login
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequestDto {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(custom(function = not_blank))]
    pub password: String,
}

/// Response DTO for administrator (never exposes the password hash)
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AdministratorDto {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

impl From<Administrator> for AdministratorDto {
    fn from(a: Administrator) -> Self {
        Self {
            id: a.id,
            name: a.name,
            email: a.email,
            created_at: a.created_at,
        }
    }
}

/// Response DTO for a successful login
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponseDto {
    pub token: String,
    pub token_type: String,
    /// Seconds until the token expires
    pub expires_in: u64,
    pub administrator: AdministratorDto,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_dto_rejects_blank_name() {
        let dto = RegisterRequestDto {
            name: "   ".to_string(),
            email: "admin@example.com".to_string(),
            password: "longenough".to_string(),
        };
        assert!(dto.validate().is_err());
    }

    #[test]
    fn test_register_dto_rejects_bad_email() {
        let dto = RegisterRequestDto {
            name: "Ana".to_string(),
            email: "not-an-email".to_string(),
            password: "longenough".to_string(),
        };
        assert!(dto.validate().is_err());
    }

    #[test]
    fn test_register_dto_rejects_short_password() {
        let dto = RegisterRequestDto {
            name: "Ana".to_string(),
            email: "admin@example.com".to_string(),
            password: "short".to_string(),
        };
        assert!(dto.validate().is_err());
    }

    #[test]
    fn test_register_dto_accepts_valid_input() {
        let dto = RegisterRequestDto {
            name: "Ana".to_string(),
            email: "admin@example.com".to_string(),
            password: "longenough".to_string(),
        };
        assert!(dto.validate().is_ok());
    }
}
