use anyhow::Result;
use serde::{Deserialize, Serialize};

use super::{defaults, envconfig::EnvConfig, validate};

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    pub general: GeneralConfig,
    pub logging: LoggingConfig,
    pub database: Option<DatabaseConfig>,
    pub auth: AuthConfig,
    pub oauth: OAuthConfig,
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        <Self as EnvConfig>::from_env()
    }
}

impl EnvConfig for AppConfig {
    fn validate(&self) -> Result<()> {
        validate::validate(self)
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct GeneralConfig {
    pub host: String,
    pub port: u16,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            host: defaults::DEFAULT_HOST.to_string(),
            port: defaults::DEFAULT_PORT as u16,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoggingConfig {
    pub rust_log: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            rust_log: defaults::DEFAULT_RUST_LOG.to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct DatabaseConfig {
    pub url: String,
    #[serde(default = "default_db_max_connections")]
    pub max_connections: u32,
    #[serde(default = "default_db_min_idle")]
    pub min_idle: u32,
}

/// Token secrets, lifetimes and session housekeeping.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct AuthConfig {
    pub access_secret: String,
    pub refresh_secret: String,
    pub access_ttl_secs: u64,
    pub refresh_ttl_secs: u64,
    pub reset_ttl_mins: u64,
    /// Adds the `Secure` attribute to auth cookies. Enable behind HTTPS.
    pub secure_cookies: bool,
    pub purge_interval_secs: u64,
    pub admin_email: Option<String>,
    pub admin_password: Option<String>,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            access_secret: String::new(),
            refresh_secret: String::new(),
            access_ttl_secs: defaults::DEFAULT_ACCESS_TTL_SECS as u64,
            refresh_ttl_secs: defaults::DEFAULT_REFRESH_TTL_SECS as u64,
            reset_ttl_mins: defaults::DEFAULT_RESET_TTL_MINS as u64,
            secure_cookies: defaults::DEFAULT_SECURE_COOKIES,
            purge_interval_secs: defaults::DEFAULT_PURGE_INTERVAL_SECS as u64,
            admin_email: None,
            admin_password: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default, deny_unknown_fields)]
pub struct OAuthConfig {
    pub google: Option<GoogleOAuthConfig>,
    pub apple: Option<AppleOAuthConfig>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct GoogleOAuthConfig {
    pub client_id: String,
    pub client_secret: String,
    pub redirect_uri: String,
    #[serde(default = "default_google_token_url")]
    pub token_url: String,
    #[serde(default = "default_google_userinfo_url")]
    pub userinfo_url: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AppleOAuthConfig {
    pub client_id: String,
    /// Pre-signed client secret JWT issued for the Sign in with Apple service.
    pub client_secret: String,
    pub redirect_uri: String,
    #[serde(default = "default_apple_token_url")]
    pub token_url: String,
}

fn default_db_max_connections() -> u32 {
    defaults::DEFAULT_DB_MAX_CONNECTIONS as u32
}

fn default_db_min_idle() -> u32 {
    defaults::DEFAULT_DB_MIN_IDLE as u32
}

fn default_google_token_url() -> String {
    defaults::GOOGLE_TOKEN_URL.to_string()
}

fn default_google_userinfo_url() -> String {
    defaults::GOOGLE_USERINFO_URL.to_string()
}

fn default_apple_token_url() -> String {
    defaults::APPLE_TOKEN_URL.to_string()
}
