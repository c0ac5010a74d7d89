mod apple;
mod google;

use std::{collections::HashMap, sync::Arc};

use async_trait::async_trait;
use serde::Deserialize;

use crate::{auth::AuthProviderKind, error::AppError};

pub use apple::AppleAdapter;
pub use google::GoogleAdapter;

/// What the provider tells us about the person signing in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OAuthProfile {
    pub provider: AuthProviderKind,
    pub external_id: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub avatar_url: Option<String>,
}

/// Parameters of the provider redirect back to us.
#[derive(Debug, Clone, Deserialize)]
pub struct OAuthCallback {
    pub code: String,
    /// Apple posts the user's name as JSON, and only on the first sign-in.
    #[serde(default)]
    pub user: Option<String>,
}

#[async_trait]
pub trait OAuthAdapter: Send + Sync {
    fn provider(&self) -> AuthProviderKind;

    async fn fetch_profile(&self, callback: &OAuthCallback) -> Result<OAuthProfile, AppError>;
}

#[derive(Clone, Default)]
pub struct OAuthProviders {
    adapters: HashMap<AuthProviderKind, Arc<dyn OAuthAdapter>>,
}

impl OAuthProviders {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_adapter(mut self, adapter: Arc<dyn OAuthAdapter>) -> Result<Self, AppError> {
        self.add(adapter)?;
        Ok(self)
    }

    pub fn add(&mut self, adapter: Arc<dyn OAuthAdapter>) -> Result<(), AppError> {
        let provider = adapter.provider();
        if provider == AuthProviderKind::Local {
            return Err(AppError::bad_request("Local accounts have no OAuth adapter"));
        }
        if self.adapters.contains_key(&provider) {
            return Err(AppError::conflict(format!(
                "OAuth provider already registered: {}",
                provider.as_str()
            )));
        }
        self.adapters.insert(provider, adapter);
        Ok(())
    }

    pub fn get(&self, provider: AuthProviderKind) -> Result<&dyn OAuthAdapter, AppError> {
        self.adapters
            .get(&provider)
            .map(|adapter| adapter.as_ref())
            .ok_or_else(|| {
                AppError::bad_request(format!(
                    "OAuth provider not configured: {}",
                    provider.as_str()
                ))
            })
    }

    pub fn is_configured(&self, provider: AuthProviderKind) -> bool {
        self.adapters.contains_key(&provider)
    }
}

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        AppError::bad_request(format!("OAuth provider request failed: {err}"))
    }
}
