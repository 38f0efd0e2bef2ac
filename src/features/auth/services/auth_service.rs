use sqlx::PgPool;
use std::sync::Arc;
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::auth::dtos::{
    AdministratorDto, AuthResponseDto, LoginRequestDto, RegisterRequestDto,
};
use crate::features::auth::model::AuthenticatedAdmin;
use crate::features::auth::models::Administrator;
use crate::features::auth::services::TokenService;

/// Service for administrator registration and authentication
pub struct AuthService {
    pool: PgPool,
    token_service: Arc<TokenService>,
}

impl AuthService {
    pub fn new(pool: PgPool, token_service: Arc<TokenService>) -> Self {
        Self {
            pool,
            token_service,
        }
    }

    pub async fn find_by_email(&self, email: &str) -> Result<Option<Administrator>> {
        let admin = sqlx::query_as::<_, Administrator>(
            r#"
            SELECT id, name, email, password_hash, created_at
            FROM administrators
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to look up administrator by email: {:?}", e);
            AppError::Database(e)
        })?;

        Ok(admin)
    }

    /// Register a new administrator. Email uniqueness is checked before the insert.
    pub async fn register(&self, dto: RegisterRequestDto) -> Result<AdministratorDto> {
        if self.find_by_email(&dto.email).await?.is_some() {
            return Err(AppError::Conflict(
                "An administrator with this email already exists".to_string(),
            ));
        }

        let password_hash = bcrypt::hash(&dto.password, bcrypt::DEFAULT_COST)
            .map_err(|e| AppError::Internal(format!("Failed to hash password: {}", e)))?;

        let admin = sqlx::query_as::<_, Administrator>(
            r#"
            INSERT INTO administrators (id, name, email, password_hash)
            VALUES ($1, $2, $3, $4)
            RETURNING id, name, email, password_hash, created_at
            "#,
        )
        .bind(Uuid::now_v7())
        .bind(dto.name.trim())
        .bind(&dto.email)
        .bind(&password_hash)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to create administrator: {:?}", e);
            AppError::Database(e)
        })?;

        tracing::info!("Administrator registered: id={}, email={}", admin.id, admin.email);

        Ok(admin.into())
    }

    /// Authenticate with email and password. The failure message never reveals
    /// whether the email exists.
    pub async fn login(&self, dto: LoginRequestDto) -> Result<AuthResponseDto> {
        let admin = self
            .find_by_email(&dto.email)
            .await?
            .ok_or_else(|| AppError::Auth("Invalid email or password".to_string()))?;

        let matches = bcrypt::verify(&dto.password, &admin.password_hash)
            .map_err(|e| AppError::Internal(format!("Failed to verify password: {}", e)))?;

        if !matches {
            return Err(AppError::Auth("Invalid email or password".to_string()));
        }

        let issued = self.token_service.issue(&admin)?;

        tracing::info!("Administrator logged in: id={}", admin.id);

        Ok(AuthResponseDto {
            token: issued.token,
            token_type: "Bearer".to_string(),
            expires_in: issued.expires_in,
            administrator: admin.into(),
        })
    }

    /// Resolve the full administrator record behind an authenticated request.
    pub async fn get_current(&self, admin: AuthenticatedAdmin) -> Result<AdministratorDto> {
        let record = self
            .find_by_email(&admin.email)
            .await?
            .ok_or_else(|| AppError::NotFound("Administrator not found".to_string()))?;

        Ok(record.into())
    }
}
