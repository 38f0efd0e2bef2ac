#[cfg(test)]
use crate::features::auth::model::AuthenticatedAdmin;

#[cfg(test)]
use axum::{extract::Request, middleware::Next, response::Response, Router};

#[cfg(test)]
#[allow(dead_code)]
pub fn create_test_admin() -> AuthenticatedAdmin {
    AuthenticatedAdmin {
        id: uuid::Uuid::now_v7(),
        email: "admin@test.local".to_string(),
    }
}

#[cfg(test)]
#[allow(dead_code)]
async fn inject_admin_middleware(mut request: Request, next: Next) -> Response {
    request.extensions_mut().insert(create_test_admin());
    next.run(request).await
}

/// Wraps a router so every request carries an authenticated admin,
/// bypassing the JWT middleware in handler tests.
#[cfg(test)]
#[allow(dead_code)]
pub fn with_admin_auth(router: Router) -> Router {
    router.layer(axum::middleware::from_fn(inject_admin_middleware))
}
