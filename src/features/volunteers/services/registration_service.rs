use std::collections::HashMap;

use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::volunteers::dtos::{
    AnswerDto, AnswerValue, DetailedRegistrationDto, RegisterForEventDto, RegistrationDto,
    SubmitResponsesDto, SubmitResponsesResultDto, VolunteerDto,
};
use crate::features::volunteers::models::{EventRegistration, FormPhase, Volunteer};
use crate::shared::constants::RESPONSE_CODE_LEN;

#[derive(Debug, FromRow)]
struct DetailedRegistrationRow {
    id: Uuid,
    volunteer_id: Uuid,
    event_id: Uuid,
    registered_at: DateTime<Utc>,
    accepted: bool,
    pre_completed: bool,
    post_completed: bool,
    terms_accepted: bool,
    volunteer_name: String,
    volunteer_email: String,
    volunteer_national_id: String,
    volunteer_created_at: DateTime<Utc>,
}

#[derive(Debug, FromRow)]
struct AnswerRow {
    registration_id: Uuid,
    question_id: Uuid,
    question_text: String,
    answer_text: Option<String>,
    option_label: Option<String>,
}

/// Fold raw answer rows into one answer per (registration, question).
/// Option labels accumulate without duplication; free text keeps the first
/// value seen for the question.
fn fold_answers(rows: Vec<AnswerRow>) -> HashMap<Uuid, Vec<AnswerDto>> {
    let mut by_registration: HashMap<Uuid, Vec<AnswerDto>> = HashMap::new();

    for row in rows {
        let answers = by_registration.entry(row.registration_id).or_default();

        let idx = match answers.iter().position(|a| a.question_id == row.question_id) {
            Some(idx) => idx,
            None => {
                answers.push(AnswerDto {
                    question_id: row.question_id,
                    question_text: row.question_text,
                    answer_text: None,
                    option_labels: Vec::new(),
                });
                answers.len() - 1
            }
        };
        let answer = &mut answers[idx];

        if let Some(text) = row.answer_text {
            if answer.answer_text.is_none() {
                answer.answer_text = Some(text);
            }
        }
        if let Some(label) = row.option_label {
            if !answer.option_labels.contains(&label) {
                answer.option_labels.push(label);
            }
        }
    }

    by_registration
}

/// Service for event registrations and questionnaire responses
pub struct RegistrationService {
    pool: PgPool,
}

impl RegistrationService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Register a volunteer for an event. The volunteer is looked up by
    /// email and created when unknown; one registration per (volunteer,
    /// event) pair is enforced.
    pub async fn register_for_event(&self, dto: RegisterForEventDto) -> Result<RegistrationDto> {
        let event_exists =
            sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM events WHERE id = $1)")
                .bind(dto.event_id)
                .fetch_one(&self.pool)
                .await
                .map_err(AppError::Database)?;
        if !event_exists {
            return Err(AppError::NotFound(format!(
                "Event '{}' not found",
                dto.event_id
            )));
        }

        let mut tx = self.pool.begin().await.map_err(AppError::Database)?;

        let volunteer = sqlx::query_as::<_, Volunteer>(
            r#"
            SELECT id, name, email, email_confirmation, national_id, created_at
            FROM volunteers
            WHERE email = $1
            "#,
        )
        .bind(&dto.email)
        .fetch_optional(&mut *tx)
        .await
        .map_err(AppError::Database)?;

        let volunteer = match volunteer {
            Some(v) => v,
            None => {
                let taken = sqlx::query_scalar::<_, bool>(
                    "SELECT EXISTS(SELECT 1 FROM volunteers WHERE national_id = $1)",
                )
                .bind(&dto.national_id)
                .fetch_one(&mut *tx)
                .await
                .map_err(AppError::Database)?;
                if taken {
                    return Err(AppError::Conflict(
                        "A volunteer with this identification number already exists".to_string(),
                    ));
                }

                sqlx::query_as::<_, Volunteer>(
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
                .fetch_one(&mut *tx)
                .await
                .map_err(AppError::Database)?
            }
        };

        let already_registered = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM event_registrations WHERE volunteer_id = $1 AND event_id = $2)",
        )
        .bind(volunteer.id)
        .bind(dto.event_id)
        .fetch_one(&mut *tx)
        .await
        .map_err(AppError::Database)?;
        if already_registered {
            return Err(AppError::Conflict(
                "Volunteer is already registered for this event".to_string(),
            ));
        }

        let registration = sqlx::query_as::<_, EventRegistration>(
            r#"
            INSERT INTO event_registrations (id, volunteer_id, event_id, terms_accepted)
            VALUES ($1, $2, $3, $4)
            RETURNING id, volunteer_id, event_id, registered_at, accepted,
                      pre_completed, post_completed, terms_accepted
            "#,
        )
        .bind(Uuid::now_v7())
        .bind(volunteer.id)
        .bind(dto.event_id)
        .bind(dto.terms_accepted)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| match &e {
            sqlx::Error::Database(db) if db.is_unique_violation() => AppError::Conflict(
                "Volunteer is already registered for this event".to_string(),
            ),
            _ => AppError::Database(e),
        })?;

        tx.commit().await.map_err(AppError::Database)?;

        tracing::info!(
            "Registration created: id={}, volunteer={}, event={}",
            registration.id,
            volunteer.id,
            dto.event_id
        );

        Ok(registration.into())
    }

    /// List registrations for an event.
    pub async fn list_for_event(
        &self,
        event_id: Uuid,
        offset: i64,
        limit: i64,
    ) -> Result<(Vec<RegistrationDto>, i64)> {
        self.check_event_exists(event_id).await?;

        let total = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM event_registrations WHERE event_id = $1",
        )
        .bind(event_id)
        .fetch_one(&self.pool)
        .await
        .map_err(AppError::Database)?;

        let registrations = sqlx::query_as::<_, EventRegistration>(
            r#"
            SELECT id, volunteer_id, event_id, registered_at, accepted,
                   pre_completed, post_completed, terms_accepted
            FROM event_registrations
            WHERE event_id = $1
            ORDER BY id
            OFFSET $2 LIMIT $3
            "#,
        )
        .bind(event_id)
        .bind(offset)
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(AppError::Database)?;

        Ok((registrations.into_iter().map(Into::into).collect(), total))
    }

    /// List registrations for an event with the volunteer's identity and
    /// the pre-event answers, one deduplicated answer per question.
    pub async fn list_detailed_for_event(
        &self,
        event_id: Uuid,
        offset: i64,
        limit: i64,
    ) -> Result<(Vec<DetailedRegistrationDto>, i64)> {
        self.check_event_exists(event_id).await?;

        let total = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM event_registrations WHERE event_id = $1",
        )
        .bind(event_id)
        .fetch_one(&self.pool)
        .await
        .map_err(AppError::Database)?;

        let rows = sqlx::query_as::<_, DetailedRegistrationRow>(
            r#"
            SELECT r.id, r.volunteer_id, r.event_id, r.registered_at, r.accepted,
                   r.pre_completed, r.post_completed, r.terms_accepted,
                   v.name AS volunteer_name,
                   v.email AS volunteer_email,
                   v.national_id AS volunteer_national_id,
                   v.created_at AS volunteer_created_at
            FROM event_registrations r
            JOIN volunteers v ON v.id = r.volunteer_id
            WHERE r.event_id = $1
            ORDER BY r.id
            OFFSET $2 LIMIT $3
            "#,
        )
        .bind(event_id)
        .bind(offset)
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(AppError::Database)?;

        let registration_ids: Vec<Uuid> = rows.iter().map(|r| r.id).collect();

        let answer_rows = sqlx::query_as::<_, AnswerRow>(
            r#"
            SELECT resp.registration_id,
                   d.question_id,
                   q.text AS question_text,
                   d.answer_text,
                   o.label AS option_label
            FROM response_details d
            JOIN responses resp ON resp.id = d.response_id
            JOIN questions q ON q.id = d.question_id
            LEFT JOIN options o ON o.id = d.option_id
            WHERE resp.phase = 'pre' AND resp.registration_id = ANY($1)
            ORDER BY d.id
            "#,
        )
        .bind(&registration_ids)
        .fetch_all(&self.pool)
        .await
        .map_err(AppError::Database)?;

        let mut answers_by_registration = fold_answers(answer_rows);

        let items = rows
            .into_iter()
            .map(|r| DetailedRegistrationDto {
                answers: answers_by_registration.remove(&r.id).unwrap_or_default(),
                volunteer: VolunteerDto {
                    id: r.volunteer_id,
                    name: r.volunteer_name,
                    email: r.volunteer_email,
                    national_id: r.volunteer_national_id,
                    created_at: r.volunteer_created_at,
                },
                id: r.id,
                event_id: r.event_id,
                registered_at: r.registered_at,
                accepted: r.accepted,
                pre_completed: r.pre_completed,
                post_completed: r.post_completed,
                terms_accepted: r.terms_accepted,
            })
            .collect();

        Ok((items, total))
    }

    /// Accept or reject a registration.
    pub async fn set_acceptance(&self, id: Uuid, accepted: bool) -> Result<RegistrationDto> {
        let registration = sqlx::query_as::<_, EventRegistration>(
            r#"
            UPDATE event_registrations
            SET accepted = $1
            WHERE id = $2
            RETURNING id, volunteer_id, event_id, registered_at, accepted,
                      pre_completed, post_completed, terms_accepted
            "#,
        )
        .bind(accepted)
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(AppError::Database)?
        .ok_or_else(|| AppError::NotFound(format!("Registration '{}' not found", id)))?;

        tracing::info!("Registration {} acceptance set to {}", id, accepted);

        Ok(registration.into())
    }

    /// Record a phase questionnaire: one response row plus a detail row per
    /// answer (several for multi-select), then flip the completion flag.
    /// The whole write is one transaction.
    pub async fn submit_responses(
        &self,
        registration_id: Uuid,
        dto: SubmitResponsesDto,
    ) -> Result<SubmitResponsesResultDto> {
        let registration_exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM event_registrations WHERE id = $1)",
        )
        .bind(registration_id)
        .fetch_one(&self.pool)
        .await
        .map_err(AppError::Database)?;
        if !registration_exists {
            return Err(AppError::NotFound(format!(
                "Registration '{}' not found",
                registration_id
            )));
        }

        let response_id = Uuid::now_v7();
        let code = Self::generate_code();

        let mut tx = self.pool.begin().await.map_err(AppError::Database)?;

        sqlx::query(
            "INSERT INTO responses (id, registration_id, phase, code) VALUES ($1, $2, $3, $4)",
        )
        .bind(response_id)
        .bind(registration_id)
        .bind(dto.phase)
        .bind(&code)
        .execute(&mut *tx)
        .await
        .map_err(AppError::Database)?;

        for (question_id, answer) in &dto.answers {
            match answer {
                AnswerValue::Text(text) => {
                    Self::insert_detail(&mut tx, response_id, *question_id, Some(text.as_str()), None)
                        .await?;
                }
                AnswerValue::OptionId(option_id) => {
                    Self::insert_detail(&mut tx, response_id, *question_id, None, Some(*option_id))
                        .await?;
                }
                AnswerValue::OptionIds(option_ids) => {
                    for option_id in option_ids {
                        Self::insert_detail(
                            &mut tx,
                            response_id,
                            *question_id,
                            None,
                            Some(*option_id),
                        )
                        .await?;
                    }
                }
            }
        }

        let flag_column = match dto.phase {
            FormPhase::Pre => "pre_completed",
            FormPhase::Post => "post_completed",
        };
        sqlx::query(&format!(
            "UPDATE event_registrations SET {} = TRUE WHERE id = $1",
            flag_column
        ))
        .bind(registration_id)
        .execute(&mut *tx)
        .await
        .map_err(AppError::Database)?;

        tx.commit().await.map_err(AppError::Database)?;

        tracing::info!(
            "Responses recorded: registration={}, phase={:?}, answers={}",
            registration_id,
            dto.phase,
            dto.answers.len()
        );

        Ok(SubmitResponsesResultDto { response_id, code })
    }

    fn generate_code() -> String {
        Uuid::new_v4().simple().to_string()[..RESPONSE_CODE_LEN].to_string()
    }

    async fn insert_detail(
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        response_id: Uuid,
        question_id: Uuid,
        answer_text: Option<&str>,
        option_id: Option<Uuid>,
    ) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO response_details (id, response_id, question_id, answer_text, option_id)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(Uuid::now_v7())
        .bind(response_id)
        .bind(question_id)
        .bind(answer_text)
        .bind(option_id)
        .execute(&mut **tx)
        .await
        .map_err(|e| match &e {
            sqlx::Error::Database(db) if db.is_foreign_key_violation() => {
                AppError::BadRequest("Unknown question or option reference".to_string())
            }
            _ => AppError::Database(e),
        })?;

        Ok(())
    }

    async fn check_event_exists(&self, event_id: Uuid) -> Result<()> {
        let exists =
            sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM events WHERE id = $1)")
                .bind(event_id)
                .fetch_one(&self.pool)
                .await
                .map_err(AppError::Database)?;
        if !exists {
            return Err(AppError::NotFound(format!("Event '{}' not found", event_id)));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(
        registration: Uuid,
        question: Uuid,
        text: Option<&str>,
        label: Option<&str>,
    ) -> AnswerRow {
        AnswerRow {
            registration_id: registration,
            question_id: question,
            question_text: "Question".to_string(),
            answer_text: text.map(str::to_string),
            option_label: label.map(str::to_string),
        }
    }

    #[test]
    fn test_fold_answers_groups_by_registration() {
        let r1 = Uuid::now_v7();
        let r2 = Uuid::now_v7();
        let q = Uuid::now_v7();

        let folded = fold_answers(vec![
            row(r1, q, Some("yes"), None),
            row(r2, q, Some("no"), None),
        ]);

        assert_eq!(folded.len(), 2);
        assert_eq!(folded[&r1][0].answer_text.as_deref(), Some("yes"));
        assert_eq!(folded[&r2][0].answer_text.as_deref(), Some("no"));
    }

    #[test]
    fn test_fold_answers_accumulates_distinct_labels() {
        let r = Uuid::now_v7();
        let q = Uuid::now_v7();

        let folded = fold_answers(vec![
            row(r, q, None, Some("Red")),
            row(r, q, None, Some("Blue")),
            row(r, q, None, Some("Red")),
        ]);

        let answers = &folded[&r];
        assert_eq!(answers.len(), 1);
        assert_eq!(answers[0].option_labels, vec!["Red", "Blue"]);
    }

    #[test]
    fn test_fold_answers_no_duplicate_per_question() {
        let r = Uuid::now_v7();
        let q1 = Uuid::now_v7();
        let q2 = Uuid::now_v7();

        let folded = fold_answers(vec![
            row(r, q1, Some("first"), None),
            row(r, q1, Some("second"), None),
            row(r, q2, None, Some("Yes")),
        ]);

        let answers = &folded[&r];
        assert_eq!(answers.len(), 2);
        // Re-encountering a question keeps the first text answer
        let a1 = answers.iter().find(|a| a.question_id == q1).unwrap();
        assert_eq!(a1.answer_text.as_deref(), Some("first"));
    }

    #[test]
    fn test_generate_code_length() {
        let code = RegistrationService::generate_code();
        assert_eq!(code.len(), RESPONSE_CODE_LEN);
        assert!(code.chars().all(|c| c.is_ascii_hexdigit()));
    }
}
