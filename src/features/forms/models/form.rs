use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// Database model for form
#[derive(Debug, Clone, FromRow)]
pub struct Form {
    pub id: Uuid,
    pub name: String,
    pub created_at: DateTime<Utc>,
}
