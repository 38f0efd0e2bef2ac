use chrono::{Duration, Utc};
use rand::RngCore;
use sha2::{Digest, Sha256};
use sqlx::PgPool;
use std::sync::Arc;
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::auth::models::{Administrator, PasswordResetToken};
use crate::modules::mailer::Mailer;
use crate::shared::constants::RESET_TOKEN_TTL_MINUTES;

/// Service for time-limited single-use password reset tokens.
pub struct PasswordResetService {
    pool: PgPool,
    mailer: Arc<dyn Mailer>,
}

impl PasswordResetService {
    pub fn new(pool: PgPool, mailer: Arc<dyn Mailer>) -> Self {
        Self { pool, mailer }
    }

    /// Token derived from a nanosecond timestamp plus 32 random bytes,
    /// hashed to a 64-char hex string (256 bits).
    fn generate_token() -> String {
        let mut random_bytes = [0u8; 32];
        rand::rng().fill_bytes(&mut random_bytes);
        let nanos = Utc::now().timestamp_nanos_opt().unwrap_or_default();

        let mut hasher = Sha256::new();
        hasher.update(nanos.to_be_bytes());
        hasher.update(random_bytes);
        hex::encode(hasher.finalize())
    }

    /// Start a reset for the given email. Completes silently whether or not
    /// the email matches an administrator, so account existence never leaks.
    pub async fn forgot_password(&self, email: &str) -> Result<()> {
        self.purge_expired().await?;

        let admin = sqlx::query_as::<_, Administrator>(
            r#"
            SELECT id, name, email, password_hash, created_at
            FROM administrators
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(AppError::Database)?;

        let Some(admin) = admin else {
            tracing::info!("Password reset requested for unknown email");
            return Ok(());
        };

        let token = Self::generate_token();
        let expires_at = Utc::now() + Duration::minutes(RESET_TOKEN_TTL_MINUTES);

        let mut tx = self.pool.begin().await.map_err(AppError::Database)?;

        // Invalidate any outstanding unused token before minting a new one
        sqlx::query(
            r#"
            UPDATE password_reset_tokens
            SET used = TRUE
            WHERE administrator_id = $1 AND used = FALSE
            "#,
        )
        .bind(admin.id)
        .execute(&mut *tx)
        .await
        .map_err(AppError::Database)?;

        sqlx::query(
            r#"
            INSERT INTO password_reset_tokens (id, administrator_id, token, expires_at)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(Uuid::now_v7())
        .bind(admin.id)
        .bind(&token)
        .bind(expires_at)
        .execute(&mut *tx)
        .await
        .map_err(AppError::Database)?;

        tx.commit().await.map_err(AppError::Database)?;

        tracing::info!("Password reset token minted for administrator {}", admin.id);

        self.mailer
            .send_password_reset(&admin.name, &admin.email, &token)
            .await?;

        Ok(())
    }

    /// A token is valid iff it exists, is unused and has not expired.
    pub async fn validate_token(&self, token: &str) -> Result<bool> {
        let found = sqlx::query_as::<_, PasswordResetToken>(
            r#"
            SELECT id, administrator_id, token, expires_at, used, created_at
            FROM password_reset_tokens
            WHERE token = $1 AND used = FALSE AND expires_at > now()
            "#,
        )
        .bind(token)
        .fetch_optional(&self.pool)
        .await
        .map_err(AppError::Database)?;

        Ok(found.is_some())
    }

    /// Atomically validate the token, store the re-hashed password on the
    /// owning administrator and mark the token used.
    pub async fn reset_password(&self, token: &str, new_password: &str) -> Result<()> {
        let password_hash = bcrypt::hash(new_password, bcrypt::DEFAULT_COST)
            .map_err(|e| AppError::Internal(format!("Failed to hash password: {}", e)))?;

        let mut tx = self.pool.begin().await.map_err(AppError::Database)?;

        let reset_token = sqlx::query_as::<_, PasswordResetToken>(
            r#"
            SELECT id, administrator_id, token, expires_at, used, created_at
            FROM password_reset_tokens
            WHERE token = $1 AND used = FALSE AND expires_at > now()
            FOR UPDATE
            "#,
        )
        .bind(token)
        .fetch_optional(&mut *tx)
        .await
        .map_err(AppError::Database)?
        .ok_or_else(|| AppError::Auth("Invalid or expired reset token".to_string()))?;

        sqlx::query("UPDATE administrators SET password_hash = $1 WHERE id = $2")
            .bind(&password_hash)
            .bind(reset_token.administrator_id)
            .execute(&mut *tx)
            .await
            .map_err(AppError::Database)?;

        sqlx::query("UPDATE password_reset_tokens SET used = TRUE WHERE id = $1")
            .bind(reset_token.id)
            .execute(&mut *tx)
            .await
            .map_err(AppError::Database)?;

        tx.commit().await.map_err(AppError::Database)?;

        tracing::info!(
            "Password reset completed for administrator {}",
            reset_token.administrator_id
        );

        Ok(())
    }

    /// Maintenance: drop tokens whose expiry has passed.
    pub async fn purge_expired(&self) -> Result<u64> {
        let result = sqlx::query("DELETE FROM password_reset_tokens WHERE expires_at < now()")
            .execute(&self.pool)
            .await
            .map_err(AppError::Database)?;

        let purged = result.rows_affected();
        if purged > 0 {
            tracing::debug!("Purged {} expired reset tokens", purged);
        }
        Ok(purged)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_generated_token_is_256_bit_hex() {
        let token = PasswordResetService::generate_token();
        assert_eq!(token.len(), 64);
        assert!(token.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_generated_tokens_are_unique() {
        let tokens: HashSet<String> = (0..100)
            .map(|_| PasswordResetService::generate_token())
            .collect();
        assert_eq!(tokens.len(), 100);
    }
}
