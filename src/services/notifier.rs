use async_trait::async_trait;

/// Delivers password-reset tokens to account owners.
#[async_trait]
pub trait ResetNotifier: Send + Sync {
    async fn send_reset_token(&self, email: &str, token: &str);
}

/// Writes the token to the log instead of mailing it.
#[derive(Debug, Clone, Default)]
pub struct LogResetNotifier;

#[async_trait]
impl ResetNotifier for LogResetNotifier {
    async fn send_reset_token(&self, email: &str, token: &str) {
        tracing::info!(%email, %token, "password reset requested");
    }
}
