use chrono::NaiveDate;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::events::dtos::{CreateEventDto, EventDto, EventStatsDto, UpdateEventDto};
use crate::features::events::models::Event;

#[derive(Debug, FromRow)]
struct EventStatsRow {
    id: Uuid,
    name: String,
    event_date: NaiveDate,
    place: String,
    description: Option<String>,
    pre_form_id: Option<Uuid>,
    post_form_id: Option<Uuid>,
    total_registrations: i64,
    accepted_registrations: i64,
}

/// Service for event operations
pub struct EventService {
    pool: PgPool,
}

impl EventService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create an event. Referenced pre/post forms must exist.
    pub async fn create(&self, dto: CreateEventDto) -> Result<EventDto> {
        let name = dto.name.trim().to_string();
        if self.name_taken(&name, None).await? {
            return Err(AppError::Conflict(
                "An event with this name already exists".to_string(),
            ));
        }

        self.check_form_exists(dto.pre_form_id, "pre-event").await?;
        self.check_form_exists(dto.post_form_id, "post-event").await?;

        let event = sqlx::query_as::<_, Event>(
            r#"
            INSERT INTO events (id, name, event_date, place, description, pre_form_id, post_form_id)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id, name, event_date, place, description, pre_form_id, post_form_id, created_at
            "#,
        )
        .bind(Uuid::now_v7())
        .bind(&name)
        .bind(dto.event_date)
        .bind(dto.place.trim())
        .bind(&dto.description)
        .bind(dto.pre_form_id)
        .bind(dto.post_form_id)
        .fetch_one(&self.pool)
        .await
        .map_err(AppError::Database)?;

        tracing::info!("Event created: id={}, date={}", event.id, event.event_date);

        Ok(event.into())
    }

    /// List events, stable id order.
    pub async fn list(&self, offset: i64, limit: i64) -> Result<(Vec<EventDto>, i64)> {
        let total = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM events")
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::Database)?;

        let events = sqlx::query_as::<_, Event>(
            r#"
            SELECT id, name, event_date, place, description, pre_form_id, post_form_id, created_at
            FROM events
            ORDER BY id
            OFFSET $1 LIMIT $2
            "#,
        )
        .bind(offset)
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(AppError::Database)?;

        Ok((events.into_iter().map(Into::into).collect(), total))
    }

    /// List events with total and accepted registration counts.
    pub async fn list_with_stats(
        &self,
        offset: i64,
        limit: i64,
    ) -> Result<(Vec<EventStatsDto>, i64)> {
        let total = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM events")
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::Database)?;

        let rows = sqlx::query_as::<_, EventStatsRow>(
            r#"
            SELECT
                e.id, e.name, e.event_date, e.place, e.description,
                e.pre_form_id, e.post_form_id,
                COUNT(r.id) AS total_registrations,
                COUNT(r.id) FILTER (WHERE r.accepted) AS accepted_registrations
            FROM events e
            LEFT JOIN event_registrations r ON r.event_id = e.id
            GROUP BY e.id
            ORDER BY e.id
            OFFSET $1 LIMIT $2
            "#,
        )
        .bind(offset)
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(AppError::Database)?;

        let items = rows
            .into_iter()
            .map(|r| EventStatsDto {
                id: r.id,
                name: r.name,
                event_date: r.event_date,
                place: r.place,
                description: r.description,
                pre_form_id: r.pre_form_id,
                post_form_id: r.post_form_id,
                total_registrations: r.total_registrations,
                accepted_registrations: r.accepted_registrations,
            })
            .collect();

        Ok((items, total))
    }

    /// Get event by id
    pub async fn get(&self, id: Uuid) -> Result<EventDto> {
        self.fetch(id).await.map(Into::into)
    }

    /// Partial update; only provided fields overwrite.
    pub async fn update(&self, id: Uuid, dto: UpdateEventDto) -> Result<EventDto> {
        let mut event = self.fetch(id).await?;

        if let Some(name) = dto.name {
            let name = name.trim().to_string();
            if self.name_taken(&name, Some(id)).await? {
                return Err(AppError::Conflict(
                    "An event with this name already exists".to_string(),
                ));
            }
            event.name = name;
        }
        if let Some(event_date) = dto.event_date {
            event.event_date = event_date;
        }
        if let Some(place) = dto.place {
            event.place = place.trim().to_string();
        }
        if let Some(description) = dto.description {
            event.description = Some(description);
        }
        if let Some(pre_form_id) = dto.pre_form_id {
            self.check_form_exists(Some(pre_form_id), "pre-event").await?;
            event.pre_form_id = Some(pre_form_id);
        }
        if let Some(post_form_id) = dto.post_form_id {
            self.check_form_exists(Some(post_form_id), "post-event").await?;
            event.post_form_id = Some(post_form_id);
        }

        let updated = sqlx::query_as::<_, Event>(
            r#"
            UPDATE events
            SET name = $1, event_date = $2, place = $3, description = $4,
                pre_form_id = $5, post_form_id = $6
            WHERE id = $7
            RETURNING id, name, event_date, place, description, pre_form_id, post_form_id, created_at
            "#,
        )
        .bind(&event.name)
        .bind(event.event_date)
        .bind(&event.place)
        .bind(&event.description)
        .bind(event.pre_form_id)
        .bind(event.post_form_id)
        .bind(id)
        .fetch_one(&self.pool)
        .await
        .map_err(AppError::Database)?;

        tracing::info!("Event updated: id={}", id);

        Ok(updated.into())
    }

    /// Delete an event. Events with registrations cannot be removed.
    pub async fn delete(&self, id: Uuid) -> Result<()> {
        let result = sqlx::query("DELETE FROM events WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| match &e {
                sqlx::Error::Database(db) if db.is_foreign_key_violation() => AppError::Conflict(
                    "Event has registrations and cannot be deleted".to_string(),
                ),
                _ => AppError::Database(e),
            })?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Event '{}' not found", id)));
        }

        tracing::info!("Event deleted: id={}", id);
        Ok(())
    }

    async fn fetch(&self, id: Uuid) -> Result<Event> {
        sqlx::query_as::<_, Event>(
            r#"
            SELECT id, name, event_date, place, description, pre_form_id, post_form_id, created_at
            FROM events
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(AppError::Database)?
        .ok_or_else(|| AppError::NotFound(format!("Event '{}' not found", id)))
    }

    async fn name_taken(&self, name: &str, exclude: Option<Uuid>) -> Result<bool> {
        let taken = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM events WHERE name = $1 AND ($2::uuid IS NULL OR id <> $2))",
        )
        .bind(name)
        .bind(exclude)
        .fetch_one(&self.pool)
        .await
        .map_err(AppError::Database)?;

        Ok(taken)
    }

    async fn check_form_exists(&self, form_id: Option<Uuid>, which: &str) -> Result<()> {
        let Some(form_id) = form_id else {
            return Ok(());
        };

        let exists = sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM forms WHERE id = $1)")
            .bind(form_id)
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::Database)?;

        if !exists {
            return Err(AppError::BadRequest(format!(
                "Referenced {} form '{}' does not exist",
                which, form_id
            )));
        }
        Ok(())
    }
}
