use std::collections::HashMap;

use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::forms::dtos::{
    CreateFormDto, CreateQuestionDto, FormDto, FormSummaryDto, QuestionDto, UpdateFormDto,
};
use crate::features::forms::models::{Form, Question, QuestionOption};

#[derive(Debug, FromRow)]
struct FormSummaryRow {
    id: Uuid,
    name: String,
    created_at: DateTime<Utc>,
    question_count: i64,
}

/// Service for form, question and option operations
pub struct FormService {
    pool: PgPool,
}

impl FormService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a form with its questions and options in one transaction.
    pub async fn create(&self, dto: CreateFormDto) -> Result<FormDto> {
        let name = dto.name.trim().to_string();
        if self.name_taken(&name, None).await? {
            return Err(AppError::Conflict(
                "A form with this name already exists".to_string(),
            ));
        }

        let form_id = Uuid::now_v7();
        let mut tx = self.pool.begin().await.map_err(AppError::Database)?;

        sqlx::query("INSERT INTO forms (id, name) VALUES ($1, $2)")
            .bind(form_id)
            .bind(&name)
            .execute(&mut *tx)
            .await
            .map_err(AppError::Database)?;

        Self::insert_questions(&mut tx, form_id, &dto.questions).await?;

        tx.commit().await.map_err(AppError::Database)?;

        tracing::info!(
            "Form created: id={}, questions={}",
            form_id,
            dto.questions.len()
        );

        self.get(form_id).await
    }

    /// List forms with their question counts, stable id order.
    pub async fn list(&self, offset: i64, limit: i64) -> Result<(Vec<FormSummaryDto>, i64)> {
        let total = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM forms")
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::Database)?;

        let rows = sqlx::query_as::<_, FormSummaryRow>(
            r#"
            SELECT f.id, f.name, f.created_at, COUNT(q.id) AS question_count
            FROM forms f
            LEFT JOIN questions q ON q.form_id = f.id
            GROUP BY f.id
            ORDER BY f.id
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
            .map(|r| FormSummaryDto {
                id: r.id,
                name: r.name,
                created_at: r.created_at,
                question_count: r.question_count,
            })
            .collect();

        Ok((items, total))
    }

    /// Get a form with nested questions and options.
    pub async fn get(&self, id: Uuid) -> Result<FormDto> {
        let form = sqlx::query_as::<_, Form>(
            "SELECT id, name, created_at FROM forms WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(AppError::Database)?
        .ok_or_else(|| AppError::NotFound(format!("Form '{}' not found", id)))?;

        let questions = sqlx::query_as::<_, Question>(
            r#"
            SELECT id, form_id, text, question_type
            FROM questions
            WHERE form_id = $1
            ORDER BY id
            "#,
        )
        .bind(id)
        .fetch_all(&self.pool)
        .await
        .map_err(AppError::Database)?;

        let options = sqlx::query_as::<_, QuestionOption>(
            r#"
            SELECT o.id, o.question_id, o.label
            FROM options o
            JOIN questions q ON q.id = o.question_id
            WHERE q.form_id = $1
            ORDER BY o.id
            "#,
        )
        .bind(id)
        .fetch_all(&self.pool)
        .await
        .map_err(AppError::Database)?;

        let mut options_by_question: HashMap<Uuid, Vec<QuestionOption>> = HashMap::new();
        for option in options {
            options_by_question
                .entry(option.question_id)
                .or_default()
                .push(option);
        }

        let questions = questions
            .into_iter()
            .map(|q| QuestionDto {
                options: options_by_question
                    .remove(&q.id)
                    .unwrap_or_default()
                    .into_iter()
                    .map(Into::into)
                    .collect(),
                id: q.id,
                text: q.text,
                question_type: q.question_type,
            })
            .collect();

        Ok(FormDto {
            id: form.id,
            name: form.name,
            created_at: form.created_at,
            questions,
        })
    }

    /// Partial update. A provided question list replaces the existing
    /// questions and their options wholesale.
    pub async fn update(&self, id: Uuid, dto: UpdateFormDto) -> Result<FormDto> {
        let exists = sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM forms WHERE id = $1)")
            .bind(id)
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::Database)?;
        if !exists {
            return Err(AppError::NotFound(format!("Form '{}' not found", id)));
        }

        let mut tx = self.pool.begin().await.map_err(AppError::Database)?;

        if let Some(name) = &dto.name {
            let name = name.trim().to_string();
            if self.name_taken(&name, Some(id)).await? {
                return Err(AppError::Conflict(
                    "A form with this name already exists".to_string(),
                ));
            }
            sqlx::query("UPDATE forms SET name = $1 WHERE id = $2")
                .bind(&name)
                .bind(id)
                .execute(&mut *tx)
                .await
                .map_err(AppError::Database)?;
        }

        if let Some(questions) = &dto.questions {
            // Options go with their questions via ON DELETE CASCADE
            sqlx::query("DELETE FROM questions WHERE form_id = $1")
                .bind(id)
                .execute(&mut *tx)
                .await
                .map_err(AppError::Database)?;

            Self::insert_questions(&mut tx, id, questions).await?;
        }

        tx.commit().await.map_err(AppError::Database)?;

        tracing::info!("Form updated: id={}", id);

        self.get(id).await
    }

    /// Delete a form; questions and options cascade.
    pub async fn delete(&self, id: Uuid) -> Result<()> {
        let result = sqlx::query("DELETE FROM forms WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(AppError::Database)?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Form '{}' not found", id)));
        }

        tracing::info!("Form deleted: id={}", id);
        Ok(())
    }

    async fn insert_questions(
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        form_id: Uuid,
        questions: &[CreateQuestionDto],
    ) -> Result<()> {
        for question in questions {
            let question_id = Uuid::now_v7();
            sqlx::query(
                "INSERT INTO questions (id, form_id, text, question_type) VALUES ($1, $2, $3, $4)",
            )
            .bind(question_id)
            .bind(form_id)
            .bind(question.text.trim())
            .bind(question.question_type)
            .execute(&mut **tx)
            .await
            .map_err(AppError::Database)?;

            for option in &question.options {
                sqlx::query("INSERT INTO options (id, question_id, label) VALUES ($1, $2, $3)")
                    .bind(Uuid::now_v7())
                    .bind(question_id)
                    .bind(option.label.trim())
                    .execute(&mut **tx)
                    .await
                    .map_err(AppError::Database)?;
            }
        }
        Ok(())
    }

    async fn name_taken(&self, name: &str, exclude: Option<Uuid>) -> Result<bool> {
        let taken = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM forms WHERE name = $1 AND ($2::uuid IS NULL OR id <> $2))",
        )
        .bind(name)
        .bind(exclude)
        .fetch_one(&self.pool)
        .await
        .map_err(AppError::Database)?;

        Ok(taken)
    }
}
