use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;

use super::{OAuthAdapter, OAuthCallback, OAuthProfile};
use crate::{auth::AuthProviderKind, config::GoogleOAuthConfig, error::AppError};

const HTTP_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Clone)]
pub struct GoogleAdapter {
    cfg: GoogleOAuthConfig,
    http_client: reqwest::Client,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

#[derive(Debug, Deserialize)]
struct UserInfo {
    id: String,
    email: Option<String>,
    given_name: Option<String>,
    family_name: Option<String>,
    picture: Option<String>,
}

impl GoogleAdapter {
    pub fn new(cfg: GoogleOAuthConfig) -> anyhow::Result<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(HTTP_TIMEOUT_SECS))
            .build()?;
        Ok(Self { cfg, http_client })
    }

    async fn exchange_code(&self, code: &str) -> Result<String, AppError> {
        let response: TokenResponse = self
            .http_client
            .post(&self.cfg.token_url)
            .form(&[
                ("code", code),
                ("client_id", self.cfg.client_id.as_str()),
                ("client_secret", self.cfg.client_secret.as_str()),
                ("redirect_uri", self.cfg.redirect_uri.as_str()),
                ("grant_type", "authorization_code"),
            ])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Ok(response.access_token)
    }
}

#[async_trait]
impl OAuthAdapter for GoogleAdapter {
    fn provider(&self) -> AuthProviderKind {
        AuthProviderKind::Google
    }

    async fn fetch_profile(&self, callback: &OAuthCallback) -> Result<OAuthProfile, AppError> {
        let access_token = self.exchange_code(&callback.code).await?;
        let info: UserInfo = self
            .http_client
            .get(&self.cfg.userinfo_url)
            .bearer_auth(access_token)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        profile_from_userinfo(info)
    }
}

fn profile_from_userinfo(info: UserInfo) -> Result<OAuthProfile, AppError> {
    let email = info
        .email
        .filter(|email| !email.trim().is_empty())
        .ok_or_else(|| AppError::bad_request("Email required from Google"))?;

    Ok(OAuthProfile {
        provider: AuthProviderKind::Google,
        external_id: info.id,
        email,
        first_name: non_empty_or(info.given_name, "Google"),
        last_name: non_empty_or(info.family_name, "User"),
        avatar_url: info.picture,
    })
}

fn non_empty_or(value: Option<String>, fallback: &str) -> String {
    value
        .filter(|value| !value.trim().is_empty())
        .unwrap_or_else(|| fallback.to_string())
}
