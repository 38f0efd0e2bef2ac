use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};

use crate::features::forms::handlers::form_handler;
use crate::features::forms::services::FormService;

/// Create routes for the forms feature (admin-protected)
pub fn routes(service: Arc<FormService>) -> Router {
    Router::new()
        .route(
            "/api/forms",
            post(form_handler::create_form).get(form_handler::list_forms),
        )
        .route(
            "/api/forms/{id}",
            get(form_handler::get_form)
                .put(form_handler::update_form)
                .delete(form_handler::delete_form),
        )
        .with_state(service)
}
