use chrono::{DateTime, NaiveDate, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// Database model for event. The pre/post form references are non-owning
/// and become NULL when the referenced form is deleted.
#[derive(Debug, Clone, FromRow)]
pub struct Event {
    pub id: Uuid,
    pub name: String,
    pub event_date: NaiveDate,
    pub place: String,
    pub description: Option<String>,
    pub pre_form_id: Option<Uuid>,
    pub post_form_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}
