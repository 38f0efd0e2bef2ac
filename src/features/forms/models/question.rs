use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

/// Question kind. Choice-typed questions own a set of options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "question_type", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum QuestionType {
    Textual,
    SingleChoice,
    MultipleChoice,
}

impl QuestionType {
    pub fn is_choice(&self) -> bool {
        matches!(self, QuestionType::SingleChoice | QuestionType::MultipleChoice)
    }
}

/// Database model for question
#[derive(Debug, Clone, FromRow)]
pub struct Question {
    pub id: Uuid,
    pub form_id: Uuid,
    pub text: String,
    pub question_type: QuestionType,
}

/// Database model for a choice option
#[derive(Debug, Clone, FromRow)]
pub struct QuestionOption {
    pub id: Uuid,
    pub question_id: Uuid,
    pub label: String,
}
