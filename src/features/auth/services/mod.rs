mod auth_service;
mod password_reset_service;
mod token_service;

pub use auth_service::AuthService;
pub use password_reset_service::PasswordResetService;
pub use token_service::TokenService;
