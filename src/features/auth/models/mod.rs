mod administrator;
mod password_reset_token;

pub use administrator::Administrator;
pub use password_reset_token::PasswordResetToken;
