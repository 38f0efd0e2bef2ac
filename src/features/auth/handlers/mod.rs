pub mod auth_handler;
pub mod password_reset_handler;
