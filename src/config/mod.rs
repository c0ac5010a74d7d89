pub mod configs;
pub mod defaults;
pub mod envconfig;
pub mod validate;

pub use configs::{
    AppConfig, AppleOAuthConfig, AuthConfig, DatabaseConfig, GeneralConfig, GoogleOAuthConfig,
    LoggingConfig, OAuthConfig,
};
pub use envconfig::EnvConfig;
