use std::sync::Arc;

use chrono::Duration;

use crate::{
    auth::jwt::TokenCodec,
    db::dao::DaoContext,
    services::{
        account_service::AccountService, notifier::ResetNotifier,
        session_service::SessionService,
    },
    state::AppState,
};

#[derive(Clone)]
pub struct ServiceContext {
    daos: DaoContext,
    tokens: TokenCodec,
    reset_ttl: Duration,
    notifier: Arc<dyn ResetNotifier>,
}

impl ServiceContext {
    pub fn new(
        daos: DaoContext,
        tokens: TokenCodec,
        reset_ttl: Duration,
        notifier: Arc<dyn ResetNotifier>,
    ) -> Self {
        Self {
            daos,
            tokens,
            reset_ttl,
            notifier,
        }
    }

    pub fn from_state(state: &AppState) -> Self {
        Self::new(
            DaoContext::new(&state.db),
            state.tokens.clone(),
            Duration::minutes(state.config.auth.reset_ttl_mins as i64),
            state.notifier.clone(),
        )
    }

    pub fn session(&self) -> SessionService {
        SessionService::new(
            self.daos.user(),
            self.daos.refresh_token(),
            self.tokens.clone(),
        )
    }

    pub fn account(&self) -> AccountService {
        AccountService::new(
            self.daos.user(),
            self.daos.refresh_token(),
            self.daos.password_reset(),
            self.reset_ttl,
            self.notifier.clone(),
        )
    }
}
