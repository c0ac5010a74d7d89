//! Builders shared by unit and integration tests.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::Router;
use sea_orm::DatabaseConnection;

use crate::{
    auth::{
        AuthProviderKind,
        oauth::{OAuthAdapter, OAuthCallback, OAuthProfile, OAuthProviders},
    },
    config::{AppConfig, AuthConfig, DatabaseConfig},
    db::connection,
    error::AppError,
    routes::router,
    services::notifier::ResetNotifier,
    state::AppState,
};

pub const TEST_ACCESS_SECRET: &str = "test-access-secret";
pub const TEST_REFRESH_SECRET: &str = "test-refresh-secret";

pub fn test_config() -> AppConfig {
    AppConfig {
        database: Some(DatabaseConfig {
            url: "sqlite::memory:".to_string(),
            max_connections: 1,
            min_idle: 1,
        }),
        auth: AuthConfig {
            access_secret: TEST_ACCESS_SECRET.to_string(),
            refresh_secret: TEST_REFRESH_SECRET.to_string(),
            ..AuthConfig::default()
        },
        ..AppConfig::default()
    }
}

/// In-memory SQLite with the schema synced. One pooled connection keeps every
/// query on the same database.
pub async fn test_db() -> DatabaseConnection {
    let cfg = test_config();
    let db_cfg = cfg.database.as_ref().expect("test config has a database");
    connection::connect(db_cfg)
        .await
        .expect("in-memory database should open")
}

/// Keeps every reset token instead of mailing it.
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    sent: Mutex<Vec<(String, String)>>,
}

impl RecordingNotifier {
    pub fn last_token_for(&self, email: &str) -> Option<String> {
        self.sent
            .lock()
            .ok()?
            .iter()
            .rev()
            .find(|(to, _)| to == email)
            .map(|(_, token)| token.clone())
    }

    pub fn sent_count(&self) -> usize {
        self.sent.lock().map(|sent| sent.len()).unwrap_or_default()
    }
}

#[async_trait]
impl ResetNotifier for RecordingNotifier {
    async fn send_reset_token(&self, email: &str, token: &str) {
        if let Ok(mut sent) = self.sent.lock() {
            sent.push((email.to_string(), token.to_string()));
        }
    }
}

/// Answers every callback with the same profile.
#[derive(Debug, Clone)]
pub struct StubOAuthAdapter {
    profile: OAuthProfile,
}

impl StubOAuthAdapter {
    pub fn new(profile: OAuthProfile) -> Self {
        Self { profile }
    }
}

#[async_trait]
impl OAuthAdapter for StubOAuthAdapter {
    fn provider(&self) -> AuthProviderKind {
        self.profile.provider
    }

    async fn fetch_profile(&self, callback: &OAuthCallback) -> Result<OAuthProfile, AppError> {
        if callback.code.is_empty() {
            return Err(AppError::bad_request("Missing authorization code"));
        }
        Ok(self.profile.clone())
    }
}

pub fn test_state(
    db: DatabaseConnection,
    oauth: OAuthProviders,
    notifier: Arc<RecordingNotifier>,
) -> Arc<AppState> {
    AppState::new(test_config(), db, oauth, notifier)
}

pub fn test_router(state: &Arc<AppState>) -> Router {
    router(Arc::clone(state))
}
