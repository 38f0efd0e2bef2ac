use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// Database model for volunteer
#[derive(Debug, Clone, FromRow)]
pub struct Volunteer {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub email_confirmation: String,
    pub national_id: String,
    pub created_at: DateTime<Utc>,
}
