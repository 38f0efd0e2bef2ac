use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::features::volunteers::dtos::VolunteerDto;
use crate::features::volunteers::models::{EventRegistration, FormPhase};

/// Response DTO for event registration
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationDto {
    pub id: Uuid,
    pub volunteer_id: Uuid,
    pub event_id: Uuid,
    pub registered_at: DateTime<Utc>,
    pub accepted: bool,
    pub pre_completed: bool,
    pub post_completed: bool,
    pub terms_accepted: bool,
}

impl From<EventRegistration> for RegistrationDto {
    fn from(r: EventRegistration) -> Self {
        Self {
            id: r.id,
            volunteer_id: r.volunteer_id,
            event_id: r.event_id,
            registered_at: r.registered_at,
            accepted: r.accepted,
            pre_completed: r.pre_completed,
            post_completed: r.post_completed,
            terms_accepted: r.terms_accepted,
        }
    }
}

/// Request DTO for accepting or rejecting a registration
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAcceptanceDto {
    pub accepted: bool,
}

/// A single answer: free text, one option, or several options.
/// Untagged, so the JSON payload is a plain string, a uuid or a uuid list.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(untagged)]
pub enum AnswerValue {
    OptionIds(Vec<Uuid>),
    OptionId(Uuid),
    Text(String),
}

/// Request DTO for submitting a phase questionnaire.
/// Keys of `answers` are question ids.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SubmitResponsesDto {
    pub phase: FormPhase,
    pub answers: HashMap<Uuid, AnswerValue>,
}

/// Response DTO returned after a questionnaire submission
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SubmitResponsesResultDto {
    pub response_id: Uuid,
    pub code: String,
}

/// One answered question in the detailed registration view.
/// Multi-select answers accumulate distinct option labels.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AnswerDto {
    pub question_id: Uuid,
    pub question_text: String,
    pub answer_text: Option<String>,
    pub option_labels: Vec<String>,
}

/// Response DTO for the detailed registration view: the registration, the
/// volunteer's identity and the pre-event answers.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DetailedRegistrationDto {
    pub id: Uuid,
    pub event_id: Uuid,
    pub registered_at: DateTime<Utc>,
    pub accepted: bool,
    pub pre_completed: bool,
    pub post_completed: bool,
    pub terms_accepted: bool,
    pub volunteer: VolunteerDto,
    pub answers: Vec<AnswerDto>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_answer_value_parses_text() {
        let value: AnswerValue = serde_json::from_str(r#""free text answer""#).unwrap();
        assert!(matches!(value, AnswerValue::Text(_)));
    }

    #[test]
    fn test_answer_value_parses_single_option() {
        let value: AnswerValue =
            serde_json::from_str(r#""0192d1a0-0000-7000-8000-000000000001""#).unwrap();
        assert!(matches!(value, AnswerValue::OptionId(_)));
    }

    #[test]
    fn test_answer_value_parses_option_list() {
        let value: AnswerValue = serde_json::from_str(
            r#"["0192d1a0-0000-7000-8000-000000000001", "0192d1a0-0000-7000-8000-000000000002"]"#,
        )
        .unwrap();
        match value {
            AnswerValue::OptionIds(ids) => assert_eq!(ids.len(), 2),
            other => panic!("expected option list, got {:?}", other),
        }
    }

    #[test]
    fn test_submit_responses_payload_shape() {
        let json = r#"{
            "phase": "pre",
            "answers": {
                "0192d1a0-0000-7000-8000-00000000000a": "because it sounded fun",
                "0192d1a0-0000-7000-8000-00000000000b": ["0192d1a0-0000-7000-8000-000000000001"]
            }
        }"#;
        let dto: SubmitResponsesDto = serde_json::from_str(json).unwrap();
        assert_eq!(dto.phase, FormPhase::Pre);
        assert_eq!(dto.answers.len(), 2);
    }
}
