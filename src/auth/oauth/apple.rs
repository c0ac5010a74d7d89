use std::time::Duration;

use async_trait::async_trait;
use jsonwebtoken::dangerous::insecure_decode;
use serde::Deserialize;

use super::{OAuthAdapter, OAuthCallback, OAuthProfile};
use crate::{auth::AuthProviderKind, config::AppleOAuthConfig, error::AppError};

const HTTP_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Clone)]
pub struct AppleAdapter {
    cfg: AppleOAuthConfig,
    http_client: reqwest::Client,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    id_token: String,
}

#[derive(Debug, Deserialize)]
struct IdTokenClaims {
    sub: String,
    email: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AppleName {
    first_name: Option<String>,
    last_name: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct AppleUser {
    #[serde(default)]
    name: AppleName,
}

impl AppleAdapter {
    pub fn new(cfg: AppleOAuthConfig) -> anyhow::Result<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(HTTP_TIMEOUT_SECS))
            .build()?;
        Ok(Self { cfg, http_client })
    }
}

#[async_trait]
impl OAuthAdapter for AppleAdapter {
    fn provider(&self) -> AuthProviderKind {
        AuthProviderKind::Apple
    }

    async fn fetch_profile(&self, callback: &OAuthCallback) -> Result<OAuthProfile, AppError> {
        let response: TokenResponse = self
            .http_client
            .post(&self.cfg.token_url)
            .form(&[
                ("code", callback.code.as_str()),
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

        // The id_token arrives straight from Apple's token endpoint over TLS,
        // so its payload is read without re-checking the signature.
        let claims = read_id_token(&response.id_token)?;
        profile_from(claims, callback.user.as_deref())
    }
}

fn read_id_token(id_token: &str) -> Result<IdTokenClaims, AppError> {
    insecure_decode::<IdTokenClaims>(id_token)
        .map(|data| data.claims)
        .map_err(|err| AppError::bad_request(format!("Malformed Apple id_token: {err}")))
}

fn profile_from(claims: IdTokenClaims, user: Option<&str>) -> Result<OAuthProfile, AppError> {
    let email = claims
        .email
        .filter(|email| !email.trim().is_empty())
        .ok_or_else(|| AppError::bad_request("Email required from Apple"))?;

    let name = user
        .and_then(|raw| serde_json::from_str::<AppleUser>(raw).ok())
        .unwrap_or_default()
        .name;

    Ok(OAuthProfile {
        provider: AuthProviderKind::Apple,
        external_id: claims.sub,
        email,
        first_name: name
            .first_name
            .filter(|value| !value.trim().is_empty())
            .unwrap_or_else(|| "Apple".to_string()),
        last_name: name
            .last_name
            .filter(|value| !value.trim().is_empty())
            .unwrap_or_else(|| "User".to_string()),
        avatar_url: None,
    })
}
