use std::sync::Arc;

use axum::{
    routing::{get, patch, post},
    Router,
};

use crate::features::volunteers::handlers::{registration_handler, volunteer_handler};
use crate::features::volunteers::services::{RegistrationService, VolunteerService};

/// Public volunteer routes: self-service creation, event registration and
/// questionnaire submission
pub fn public_routes(
    volunteer_service: Arc<VolunteerService>,
    registration_service: Arc<RegistrationService>,
) -> Router {
    let volunteers = Router::new()
        .route("/api/volunteers", post(volunteer_handler::create_volunteer))
        .with_state(volunteer_service);

    let registrations = Router::new()
        .route(
            "/api/registrations",
            post(registration_handler::register_for_event),
        )
        .route(
            "/api/registrations/{id}/responses",
            post(registration_handler::submit_responses),
        )
        .with_state(registration_service);

    volunteers.merge(registrations)
}

/// Admin-protected volunteer routes: listings and registration management
pub fn protected_routes(
    volunteer_service: Arc<VolunteerService>,
    registration_service: Arc<RegistrationService>,
) -> Router {
    let volunteers = Router::new()
        .route("/api/volunteers", get(volunteer_handler::list_volunteers))
        .route("/api/volunteers/{id}", get(volunteer_handler::get_volunteer))
        .with_state(volunteer_service);

    let registrations = Router::new()
        .route(
            "/api/events/{id}/registrations",
            get(registration_handler::list_registrations),
        )
        .route(
            "/api/events/{id}/registrations/detailed",
            get(registration_handler::list_detailed_registrations),
        )
        .route(
            "/api/registrations/{id}/acceptance",
            patch(registration_handler::update_acceptance),
        )
        .with_state(registration_service);

    volunteers.merge(registrations)
}
