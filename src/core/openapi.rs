use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::features::auth::{self, dtos as auth_dtos};
use crate::features::events::{dtos as event_dtos, handlers as event_handlers};
use crate::features::forms::{dtos as form_dtos, handlers as form_handlers, models as form_models};
use crate::features::volunteers::{
    dtos as volunteer_dtos, handlers as volunteer_handlers, models as volunteer_models,
};
use crate::shared::types::{ApiResponse, Meta};

#[derive(OpenApi)]
#[openapi(
    paths(
        // Auth
        auth::handlers::auth_handler::register,
        auth::handlers::auth_handler::login,
        auth::handlers::auth_handler::get_me,
        auth::handlers::password_reset_handler::forgot_password,
        auth::handlers::password_reset_handler::validate_reset_token,
        auth::handlers::password_reset_handler::reset_password,
        // Forms
        form_handlers::form_handler::create_form,
        form_handlers::form_handler::list_forms,
        form_handlers::form_handler::get_form,
        form_handlers::form_handler::update_form,
        form_handlers::form_handler::delete_form,
        // Events
        event_handlers::event_handler::create_event,
        event_handlers::event_handler::list_events,
        event_handlers::event_handler::list_events_with_stats,
        event_handlers::event_handler::get_event,
        event_handlers::event_handler::update_event,
        event_handlers::event_handler::delete_event,
        // Volunteers
        volunteer_handlers::volunteer_handler::create_volunteer,
        volunteer_handlers::volunteer_handler::list_volunteers,
        volunteer_handlers::volunteer_handler::get_volunteer,
        // Registrations
        volunteer_handlers::registration_handler::register_for_event,
        volunteer_handlers::registration_handler::list_registrations,
        volunteer_handlers::registration_handler::list_detailed_registrations,
        volunteer_handlers::registration_handler::update_acceptance,
        volunteer_handlers::registration_handler::submit_responses,
    ),
    components(
        schemas(
            // Shared
            Meta,
            // Auth
            auth::model::AuthenticatedAdmin,
            auth_dtos::RegisterRequestDto,
            auth_dtos::LoginRequestDto,
            auth_dtos::AdministratorDto,
            auth_dtos::AuthResponseDto,
            auth_dtos::ForgotPasswordDto,
            auth_dtos::ValidateResetTokenDto,
            auth_dtos::ResetPasswordDto,
            auth_dtos::TokenValidationDto,
            ApiResponse<auth_dtos::AdministratorDto>,
            ApiResponse<auth_dtos::AuthResponseDto>,
            ApiResponse<auth_dtos::TokenValidationDto>,
            // Forms
            form_models::QuestionType,
            form_dtos::CreateOptionDto,
            form_dtos::CreateQuestionDto,
            form_dtos::CreateFormDto,
            form_dtos::UpdateFormDto,
            form_dtos::OptionDto,
            form_dtos::QuestionDto,
            form_dtos::FormDto,
            form_dtos::FormSummaryDto,
            ApiResponse<form_dtos::FormDto>,
            ApiResponse<Vec<form_dtos::FormSummaryDto>>,
            // Events
            event_dtos::CreateEventDto,
            event_dtos::UpdateEventDto,
            event_dtos::EventDto,
            event_dtos::EventStatsDto,
            ApiResponse<event_dtos::EventDto>,
            ApiResponse<Vec<event_dtos::EventDto>>,
            ApiResponse<Vec<event_dtos::EventStatsDto>>,
            // Volunteers & registrations
            volunteer_models::FormPhase,
            volunteer_dtos::CreateVolunteerDto,
            volunteer_dtos::RegisterForEventDto,
            volunteer_dtos::VolunteerDto,
            volunteer_dtos::RegistrationDto,
            volunteer_dtos::UpdateAcceptanceDto,
            volunteer_dtos::AnswerValue,
            volunteer_dtos::SubmitResponsesDto,
            volunteer_dtos::SubmitResponsesResultDto,
            volunteer_dtos::AnswerDto,
            volunteer_dtos::DetailedRegistrationDto,
            ApiResponse<volunteer_dtos::VolunteerDto>,
            ApiResponse<Vec<volunteer_dtos::VolunteerDto>>,
            ApiResponse<volunteer_dtos::RegistrationDto>,
            ApiResponse<Vec<volunteer_dtos::RegistrationDto>>,
            ApiResponse<Vec<volunteer_dtos::DetailedRegistrationDto>>,
            ApiResponse<volunteer_dtos::SubmitResponsesResultDto>,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "auth", description = "Administrator authentication and password reset"),
        (name = "forms", description = "Questionnaire forms"),
        (name = "events", description = "Events"),
        (name = "volunteers", description = "Volunteers"),
        (name = "registrations", description = "Event registrations and responses"),
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

/// Applies runtime title/version/description from `SwaggerConfig`
pub struct SwaggerInfoModifier {
    pub title: String,
    pub version: String,
    pub description: String,
}

impl Modify for SwaggerInfoModifier {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        openapi.info.title = self.title.clone();
        openapi.info.version = self.version.clone();
        openapi.info.description = Some(self.description.clone());
    }
}
