use std::sync::Arc;

use sea_orm::DatabaseConnection;

use crate::{
    auth::{cookies::AuthCookies, jwt::TokenCodec, oauth::OAuthProviders},
    config::AppConfig,
    services::notifier::ResetNotifier,
};

#[derive(Clone)]
pub struct AppState {
    pub config: AppConfig,
    pub db: DatabaseConnection,
    pub tokens: TokenCodec,
    pub cookies: AuthCookies,
    pub oauth: OAuthProviders,
    pub notifier: Arc<dyn ResetNotifier>,
}

impl AppState {
    pub fn new(
        config: AppConfig,
        db: DatabaseConnection,
        oauth: OAuthProviders,
        notifier: Arc<dyn ResetNotifier>,
    ) -> Arc<Self> {
        Arc::new(Self {
            tokens: TokenCodec::from_config(&config.auth),
            cookies: AuthCookies::from_config(&config.auth),
            db,
            config,
            oauth,
            notifier,
        })
    }
}
