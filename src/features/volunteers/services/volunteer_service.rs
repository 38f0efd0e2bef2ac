use sqlx::PgPool;
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::volunteers::dtos::{CreateVolunteerDto, VolunteerDto};
use crate::features::volunteers::models::Volunteer;

/// Service for volunteer operations
pub struct VolunteerService {
    pool: PgPool,
}

impl VolunteerService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a volunteer. The national id must be unique.
    pub async fn create(&self, dto: CreateVolunteerDto) -> Result<VolunteerDto> {
        if self.national_id_taken(&dto.national_id).await? {
            return Err(AppError::Conflict(
                "A volunteer with this identification number already exists".to_string(),
            ));
        }

        let volunteer = sqlx::query_as::<_, Volunteer>(
            r#"
            INSERT INTO volunteers (id, name, email, email_confirmation, national_id)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, name, email, email_confirmation, national_id, created_at
            "#,
        )
        .bind(Uuid::now_v7())
        .bind(dto.name.trim())
        .bind(&dto.email)
        .bind(&dto.email_confirmation)
        .bind(&dto.national_id)
        .fetch_one(&self.pool)
        .await
        .map_err(AppError::Database)?;

        tracing::info!("Volunteer created: id={}", volunteer.id);

        Ok(volunteer.into())
    }

    /// List volunteers, stable id order.
    pub async fn list(&self, offset: i64, limit: i64) -> Result<(Vec<VolunteerDto>, i64)> {
        let total = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM volunteers")
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::Database)?;

        let volunteers = sqlx::query_as::<_, Volunteer>(
            r#"
            SELECT id, name, email, email_confirmation, national_id, created_at
            FROM volunteers
            ORDER BY id
            OFFSET $1 LIMIT $2
            "#,
        )
        .bind(offset)
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(AppError::Database)?;

        Ok((volunteers.into_iter().map(Into::into).collect(), total))
    }

    /// Get volunteer by id
    pub async fn get(&self, id: Uuid) -> Result<VolunteerDto> {
        let volunteer = sqlx::query_as::<_, Volunteer>(
            r#"
            SELECT id, name, email, email_confirmation, national_id, created_at
            FROM volunteers
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(AppError::Database)?;

        volunteer
            .map(Into::into)
            .ok_or_else(|| AppError::NotFound(format!("Volunteer '{}' not found", id)))
    }

    async fn national_id_taken(&self, national_id: &str) -> Result<bool> {
        let taken = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM volunteers WHERE national_id = $1)",
        )
        .bind(national_id)
        .fetch_one(&self.pool)
        .await
        .map_err(AppError::Database)?;

        Ok(taken)
    }
}
