use std::sync::Arc;

use axum::{
    routing::{get, post, put},
    Router,
};

use crate::features::events::handlers::event_handler;
use crate::features::events::services::EventService;

/// Public event routes: volunteers browse events without a token
pub fn public_routes(service: Arc<EventService>) -> Router {
    Router::new()
        .route("/api/events", get(event_handler::list_events))
        .route("/api/events/stats", get(event_handler::list_events_with_stats))
        .route("/api/events/{id}", get(event_handler::get_event))
        .with_state(service)
}

/// Admin-protected event routes: mutations
pub fn protected_routes(service: Arc<EventService>) -> Router {
    Router::new()
        .route("/api/events", post(event_handler::create_event))
        .route(
            "/api/events/{id}",
            put(event_handler::update_event).delete(event_handler::delete_event),
        )
        .with_state(service)
}
