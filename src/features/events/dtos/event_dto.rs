use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::features::events::models::Event;
use crate::shared::validation::{not_blank, validation_error};

/// Events may be created for today or later, never in the past.
fn date_not_past(value: &NaiveDate) -> Result<(), ValidationError> {
    if *value < Utc::now().date_naive() {
        return Err(validation_error("date_not_past", "event date is in the past"));
    }
    Ok(())
}

/// Request DTO for creating an event
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateEventDto {
    #[validate(
        custom(function = not_blank),
        length(max = 255, message = "Name must not exceed 255 characters")
    )]
    pub name: String,

    #[validate(custom(function = date_not_past))]
    pub event_date: NaiveDate,

    #[validate(
        custom(function = not_blank),
        length(max = 255, message = "Place must not exceed 255 characters")
    )]
    pub place: String,

    pub description: Option<String>,

    pub pre_form_id: Option<Uuid>,
    pub post_form_id: Option<Uuid>,
}

/// Request DTO for a partial event update; only provided fields overwrite.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateEventDto {
    #[validate(
        custom(function = not_blank),
        length(max = 255, message = "Name must not exceed 255 characters")
    )]
    pub name: Option<String>,

    pub event_date: Option<NaiveDate>,

    #[validate(
        custom(function = not_blank),
        length(max = 255, message = "Place must not exceed 255 characters")
    )]
    pub place: Option<String>,

    pub description: Option<String>,

    pub pre_form_id: Option<Uuid>,
    pub post_form_id: Option<Uuid>,
}

/// Response DTO for event
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EventDto {
    pub id: Uuid,
    pub name: String,
    pub event_date: NaiveDate,
    pub place: String,
    pub description: Option<String>,
    pub pre_form_id: Option<Uuid>,
    pub post_form_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

impl From<Event> for EventDto {
    fn from(e: Event) -> Self {
        Self {
            id: e.id,
            name: e.name,
            event_date: e.event_date,
            place: e.place,
            description: e.description,
            pre_form_id: e.pre_form_id,
            post_form_id: e.post_form_id,
            created_at: e.created_at,
        }
    }
}

/// Response DTO for event listing with registration counts
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EventStatsDto {
    pub id: Uuid,
    pub name: String,
    pub event_date: NaiveDate,
    pub place: String,
    pub description: Option<String>,
    pub pre_form_id: Option<Uuid>,
    pub post_form_id: Option<Uuid>,
    pub total_registrations: i64,
    pub accepted_registrations: i64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Days;

    fn base_dto(date: NaiveDate) -> CreateEventDto {
        CreateEventDto {
            name: "Build day".to_string(),
            event_date: date,
            place: "Workshop".to_string(),
            description: None,
            pre_form_id: None,
            post_form_id: None,
        }
    }

    #[test]
    fn test_past_date_rejected() {
        let yesterday = Utc::now().date_naive().checked_sub_days(Days::new(1)).unwrap();
        assert!(base_dto(yesterday).validate().is_err());
    }

    #[test]
    fn test_today_accepted() {
        assert!(base_dto(Utc::now().date_naive()).validate().is_ok());
    }

    #[test]
    fn test_future_date_accepted() {
        let next_week = Utc::now().date_naive().checked_add_days(Days::new(7)).unwrap();
        assert!(base_dto(next_week).validate().is_ok());
    }

    #[test]
    fn test_blank_place_rejected() {
        let mut dto = base_dto(Utc::now().date_naive());
        dto.place = "  ".to_string();
        assert!(dto.validate().is_err());
    }
}
