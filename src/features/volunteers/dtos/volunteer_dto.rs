use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::features::volunteers::models::Volunteer;
use crate::shared::validation::{not_blank, validation_error, NATIONAL_ID_REGEX};

/// Registrations require explicit consent.
pub(crate) fn must_accept_terms(value: &bool) -> Result<(), ValidationError> {
    if !*value {
        return Err(validation_error(
            "terms_accepted",
            "terms and conditions must be accepted",
        ));
    }
    Ok(())
}

/// Request DTO for creating a volunteer
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateVolunteerDto {
    #[validate(
        custom(function = not_blank),
        length(max = 255, message = "Name must not exceed 255 characters")
    )]
    pub name: String,

    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(must_match(other = email, message = "Email confirmation does not match"))]
    pub email_confirmation: String,

    #[validate(regex(
        path = *NATIONAL_ID_REGEX,
        message = "Invalid national identification number"
    ))]
    pub national_id: String,

    #[validate(custom(function = must_accept_terms))]
    pub terms_accepted: bool,
}

/// Request DTO for registering a volunteer for an event.
/// Creates the volunteer first when the email is unknown.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterForEventDto {
    #[validate(
        custom(function = not_blank),
        length(max = 255, message = "Name must not exceed 255 characters")
    )]
    pub name: String,

    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(must_match(other = email, message = "Email confirmation does not match"))]
    pub email_confirmation: String,

    #[validate(regex(
        path = *NATIONAL_ID_REGEX,
        message = "Invalid national identification number"
    ))]
    pub national_id: String,

    pub event_id: Uuid,

    #[validate(custom(function = must_accept_terms))]
    pub terms_accepted: bool,
}

/// Response DTO for volunteer
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct VolunteerDto {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub national_id: String,
    pub created_at: DateTime<Utc>,
}

impl From<Volunteer> for VolunteerDto {
    fn from(v: Volunteer) -> Self {
        Self {
            id: v.id,
            name: v.name,
            email: v.email,
            national_id: v.national_id,
            created_at: v.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_dto() -> CreateVolunteerDto {
        CreateVolunteerDto {
            name: "Ana".to_string(),
            email: "a@x.com".to_string(),
            email_confirmation: "a@x.com".to_string(),
            national_id: "123".to_string(),
            terms_accepted: true,
        }
    }

    #[test]
    fn test_valid_volunteer_passes() {
        assert!(valid_dto().validate().is_ok());
    }

    #[test]
    fn test_mismatched_confirmation_rejected() {
        let mut dto = valid_dto();
        dto.email_confirmation = "b@x.com".to_string();
        assert!(dto.validate().is_err());
    }

    #[test]
    fn test_terms_must_be_accepted() {
        let mut dto = valid_dto();
        dto.terms_accepted = false;
        assert!(dto.validate().is_err());
    }

    #[test]
    fn test_blank_name_rejected() {
        let mut dto = valid_dto();
        dto.name = " ".to_string();
        assert!(dto.validate().is_err());
    }

    #[test]
    fn test_malformed_national_id_rejected() {
        let mut dto = valid_dto();
        dto.national_id = "12 34".to_string();
        assert!(dto.validate().is_err());
    }
}
