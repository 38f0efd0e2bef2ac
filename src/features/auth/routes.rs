use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};

use crate::features::auth::handlers::{auth_handler, password_reset_handler};
use crate::features::auth::services::{AuthService, PasswordResetService};

/// Public auth routes: registration, login and the password-reset flow
pub fn public_routes(
    auth_service: Arc<AuthService>,
    reset_service: Arc<PasswordResetService>,
) -> Router {
    let auth = Router::new()
        .route("/api/auth/register", post(auth_handler::register))
        .route("/api/auth/login", post(auth_handler::login))
        .with_state(auth_service);

    let reset = Router::new()
        .route(
            "/api/auth/forgot-password",
            post(password_reset_handler::forgot_password),
        )
        .route(
            "/api/auth/validate-reset-token",
            post(password_reset_handler::validate_reset_token),
        )
        .route(
            "/api/auth/reset-password",
            post(password_reset_handler::reset_password),
        )
        .with_state(reset_service);

    auth.merge(reset)
}

/// Routes that require a valid bearer token
pub fn protected_routes(auth_service: Arc<AuthService>) -> Router {
    Router::new()
        .route("/api/auth/me", get(auth_handler::get_me))
        .with_state(auth_service)
}
