use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::features::forms::models::{QuestionOption, QuestionType};
use crate::shared::validation::{not_blank, validation_error};

/// Request DTO for a choice option
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateOptionDto {
    #[validate(
        custom(function = not_blank),
        length(max = 255, message = "Option label must not exceed 255 characters")
    )]
    pub label: String,
}

/// Request DTO for a question, with options for choice types
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
#[validate(schema(function = validate_question_options))]
pub struct CreateQuestionDto {
    #[validate(custom(function = not_blank))]
    pub text: String,

    pub question_type: QuestionType,

    #[serde(default)]
    #[validate(nested)]
    pub options: Vec<CreateOptionDto>,
}

/// Choice-typed questions must carry at least one option.
fn validate_question_options(dto: &CreateQuestionDto) -> Result<(), ValidationError> {
    if dto.question_type.is_choice() && dto.options.is_empty() {
        return Err(validation_error(
            "options",
            "choice questions must have at least one option",
        ));
    }
    Ok(())
}

/// Request DTO for creating a form with its questions
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateFormDto {
    #[validate(
        custom(function = not_blank),
        length(max = 255, message = "Name must not exceed 255 characters")
    )]
    pub name: String,

    #[validate(
        length(min = 1, message = "Form must have at least one question"),
        nested
    )]
    pub questions: Vec<CreateQuestionDto>,
}

/// Request DTO for a partial form update. When `questions` is present the
/// existing question set is replaced wholesale.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateFormDto {
    #[validate(
        custom(function = not_blank),
        length(max = 255, message = "Name must not exceed 255 characters")
    )]
    pub name: Option<String>,

    #[validate(
        length(min = 1, message = "Form must have at least one question"),
        nested
    )]
    pub questions: Option<Vec<CreateQuestionDto>>,
}

/// Response DTO for a choice option
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OptionDto {
    pub id: Uuid,
    pub label: String,
}

impl From<QuestionOption> for OptionDto {
    fn from(o: QuestionOption) -> Self {
        Self {
            id: o.id,
            label: o.label,
        }
    }
}

/// Response DTO for a question with its options
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct QuestionDto {
    pub id: Uuid,
    pub text: String,
    pub question_type: QuestionType,
    pub options: Vec<OptionDto>,
}

/// Response DTO for a full form
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FormDto {
    pub id: Uuid,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub questions: Vec<QuestionDto>,
}

/// Response DTO for form listings
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FormSummaryDto {
    pub id: Uuid,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub question_count: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn textual_question() -> CreateQuestionDto {
        CreateQuestionDto {
            text: "How did you hear about us?".to_string(),
            question_type: QuestionType::Textual,
            options: vec![],
        }
    }

    #[test]
    fn test_form_requires_at_least_one_question() {
        let dto = CreateFormDto {
            name: "Pre-event survey".to_string(),
            questions: vec![],
        };
        assert!(dto.validate().is_err());
    }

    #[test]
    fn test_choice_question_requires_options() {
        let dto = CreateQuestionDto {
            text: "Pick one".to_string(),
            question_type: QuestionType::SingleChoice,
            options: vec![],
        };
        assert!(dto.validate().is_err());
    }

    #[test]
    fn test_textual_question_needs_no_options() {
        assert!(textual_question().validate().is_ok());
    }

    #[test]
    fn test_blank_question_text_rejected() {
        let dto = CreateQuestionDto {
            text: " ".to_string(),
            question_type: QuestionType::Textual,
            options: vec![],
        };
        assert!(dto.validate().is_err());
    }

    #[test]
    fn test_nested_option_validation_runs() {
        let dto = CreateFormDto {
            name: "Survey".to_string(),
            questions: vec![CreateQuestionDto {
                text: "Pick one".to_string(),
                question_type: QuestionType::MultipleChoice,
                options: vec![CreateOptionDto {
                    label: "".to_string(),
                }],
            }],
        };
        assert!(dto.validate().is_err());
    }

    #[test]
    fn test_valid_form_passes() {
        let dto = CreateFormDto {
            name: "Pre-event survey".to_string(),
            questions: vec![
                textual_question(),
                CreateQuestionDto {
                    text: "Shirt size".to_string(),
                    question_type: QuestionType::SingleChoice,
                    options: vec![
                        CreateOptionDto {
                            label: "S".to_string(),
                        },
                        CreateOptionDto {
                            label: "M".to_string(),
                        },
                    ],
                },
            ],
        };
        assert!(dto.validate().is_ok());
    }
}
