use async_trait::async_trait;

use crate::core::config::MailConfig;
use crate::core::error::Result;

/// Email delivery channel for password-reset notifications.
///
/// Actual SMTP delivery is an external collaborator; the default
/// implementation logs the reset link instead of sending it.
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send_password_reset(
        &self,
        recipient_name: &str,
        recipient_email: &str,
        token: &str,
    ) -> Result<()>;
}

/// Mailer that writes the reset link to the log.
pub struct LogMailer {
    config: MailConfig,
}

impl LogMailer {
    pub fn new(config: MailConfig) -> Self {
        Self { config }
    }

    fn reset_link(&self, token: &str) -> String {
        format!("{}/reset-password?token={}", self.config.app_url, token)
    }
}

#[async_trait]
impl Mailer for LogMailer {
    async fn send_password_reset(
        &self,
        recipient_name: &str,
        recipient_email: &str,
        token: &str,
    ) -> Result<()> {
        let link = self.reset_link(token);
        tracing::info!(
            "Password reset email for {} <{}> (from {}): {}",
            recipient_name,
            recipient_email,
            self.config.from_email,
            link
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> MailConfig {
        MailConfig {
            from_email: "noreply@test.local".to_string(),
            app_url: "http://localhost:5173".to_string(),
        }
    }

    #[test]
    fn test_reset_link_format() {
        let mailer = LogMailer::new(test_config());
        assert_eq!(
            mailer.reset_link("abc123"),
            "http://localhost:5173/reset-password?token=abc123"
        );
    }

    #[tokio::test]
    async fn test_log_mailer_send_succeeds() {
        let mailer = LogMailer::new(test_config());
        let result = mailer
            .send_password_reset("Ana", "ana@example.com", "tok")
            .await;
        assert!(result.is_ok());
    }
}
