use chrono::Utc;
use jsonwebtoken::{encode, EncodingKey, Header};

use crate::core::config::AuthConfig;
use crate::core::error::{AppError, Result};
use crate::features::auth::model::Claims;
use crate::features::auth::models::Administrator;

/// Issued bearer token plus its lifetime in seconds.
pub struct IssuedToken {
    pub token: String,
    pub expires_in: u64,
}

/// Service issuing HS256 bearer tokens for administrators.
pub struct TokenService {
    encoding_key: EncodingKey,
    token_ttl_secs: u64,
}

impl TokenService {
    pub fn new(config: &AuthConfig) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(config.jwt_secret.as_bytes()),
            token_ttl_secs: config.token_ttl.as_secs(),
        }
    }

    /// Encode a token carrying the administrator's id and email.
    pub fn issue(&self, admin: &Administrator) -> Result<IssuedToken> {
        let now = Utc::now().timestamp().max(0) as u64;
        let claims = Claims {
            sub: admin.email.clone(),
            admin_id: admin.id,
            iat: now,
            exp: now + self.token_ttl_secs,
        };

        let token = encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| AppError::Internal(format!("Failed to encode token: {}", e)))?;

        Ok(IssuedToken {
            token,
            expires_in: self.token_ttl_secs,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::auth::JwtValidator;
    use std::time::Duration;
    use uuid::Uuid;

    fn test_config() -> AuthConfig {
        AuthConfig {
            jwt_secret: "a-test-secret-that-is-long-enough!!".to_string(),
            token_ttl: Duration::from_secs(3600),
        }
    }

    fn test_admin() -> Administrator {
        Administrator {
            id: Uuid::now_v7(),
            name: "Ana".to_string(),
            email: "ana@example.com".to_string(),
            password_hash: "irrelevant".to_string(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_issued_token_round_trips() {
        let config = test_config();
        let service = TokenService::new(&config);
        let admin = test_admin();

        let issued = service.issue(&admin).unwrap();
        assert_eq!(issued.expires_in, 3600);

        let validator = JwtValidator::new(&config.jwt_secret);
        let authenticated = validator.validate_token(&issued.token).unwrap();
        assert_eq!(authenticated.id, admin.id);
        assert_eq!(authenticated.email, admin.email);
    }

    #[test]
    fn test_token_rejected_with_wrong_secret() {
        let service = TokenService::new(&test_config());
        let issued = service.issue(&test_admin()).unwrap();

        let validator = JwtValidator::new("a-different-secret-also-long-enough");
        assert!(validator.validate_token(&issued.token).is_err());
    }

    #[test]
    fn test_garbage_token_rejected() {
        let validator = JwtValidator::new("a-test-secret-that-is-long-enough!!");
        assert!(validator.validate_token("not.a.jwt").is_err());
    }
}
