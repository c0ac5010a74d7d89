use std::sync::Arc;

use axum::Router;

use crate::{auth::origin::OriginGuardLayer, state::AppState};

use super::{account, auth, oauth};

pub fn router(state: Arc<AppState>) -> Router {
    let same_origin = Router::new()
        .merge(auth::router(state.clone()))
        .merge(account::router(state.clone()))
        .layer(OriginGuardLayer::new());

    // Provider callbacks arrive cross-site by design (Apple form_post) and are
    // authenticated by the code exchange instead.
    same_origin.merge(oauth::router(state))
}
