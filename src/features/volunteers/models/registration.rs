use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

/// Questionnaire phase relative to the event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "form_phase", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum FormPhase {
    Pre,
    Post,
}

/// Database model for event registration.
/// At most one registration exists per (volunteer, event) pair.
#[derive(Debug, Clone, FromRow)]
pub struct EventRegistration {
    pub id: Uuid,
    pub volunteer_id: Uuid,
    pub event_id: Uuid,
    pub registered_at: DateTime<Utc>,
    pub accepted: bool,
    pub pre_completed: bool,
    pub post_completed: bool,
    pub terms_accepted: bool,
}

/// Database model for a submitted questionnaire response
#[derive(Debug, Clone, FromRow)]
pub struct FormResponse {
    pub id: Uuid,
    pub registration_id: Uuid,
    pub phase: FormPhase,
    pub code: String,
    pub created_at: DateTime<Utc>,
}

/// Database model for a single answer row. Carries either free text or a
/// selected option; multi-select answers span multiple rows.
#[derive(Debug, Clone, FromRow)]
pub struct ResponseDetail {
    pub id: Uuid,
    pub response_id: Uuid,
    pub question_id: Uuid,
    pub answer_text: Option<String>,
    pub option_id: Option<Uuid>,
}
