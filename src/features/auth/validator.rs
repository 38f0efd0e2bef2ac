use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};

use super::model::{AuthenticatedAdmin, Claims};
use crate::core::error::AppError;

/// Validates HS256 bearer tokens issued by `TokenService`.
pub struct JwtValidator {
    decoding_key: DecodingKey,
}

impl JwtValidator {
    pub fn new(secret: &str) -> Self {
        Self {
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
        }
    }

    pub fn validate_token(&self, token: &str) -> Result<AuthenticatedAdmin, AppError> {
        let validation = Validation::new(Algorithm::HS256);

        let token_data = decode::<Claims>(token, &self.decoding_key, &validation)
            .map_err(|e| AppError::Auth(format!("Invalid token: {}", e)))?;

        let claims = token_data.claims;

        Ok(AuthenticatedAdmin {
            id: claims.admin_id,
            email: claims.sub,
        })
    }
}
