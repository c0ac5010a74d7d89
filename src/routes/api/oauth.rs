use std::sync::Arc;

use axum::{
    Form, Router,
    extract::{Query, State},
    http::StatusCode,
    routing::get,
};
use axum_extra::extract::CookieJar;

use crate::{
    auth::{AuthProviderKind, oauth::OAuthCallback},
    error::AppError,
    response::JsonApiResponse,
    routes::payloads::{SessionPayload, UserView},
    services::context::ServiceContext,
    state::AppState,
};

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/google/callback", get(google_callback))
        .route("/apple/callback", get(apple_callback).post(apple_form_post))
        .with_state(state)
}

async fn google_callback(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Query(callback): Query<OAuthCallback>,
) -> Result<(CookieJar, JsonApiResponse<SessionPayload>), AppError> {
    sign_in(&state, jar, AuthProviderKind::Google, callback).await
}

async fn apple_callback(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Query(callback): Query<OAuthCallback>,
) -> Result<(CookieJar, JsonApiResponse<SessionPayload>), AppError> {
    sign_in(&state, jar, AuthProviderKind::Apple, callback).await
}

// Apple uses response_mode=form_post when it also sends the user's name.
async fn apple_form_post(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Form(callback): Form<OAuthCallback>,
) -> Result<(CookieJar, JsonApiResponse<SessionPayload>), AppError> {
    sign_in(&state, jar, AuthProviderKind::Apple, callback).await
}

async fn sign_in(
    state: &AppState,
    jar: CookieJar,
    provider: AuthProviderKind,
    callback: OAuthCallback,
) -> Result<(CookieJar, JsonApiResponse<SessionPayload>), AppError> {
    let profile = state.oauth.get(provider)?.fetch_profile(&callback).await?;
    let session = ServiceContext::from_state(state)
        .session()
        .oauth_login(profile)
        .await?;
    tracing::info!(user_id = %session.user.id, provider = provider.as_str(), "oauth sign-in");

    let jar = state.cookies.with_session(
        jar,
        &session.tokens.access_token,
        &session.tokens.refresh_token,
    );
    let message = match provider {
        AuthProviderKind::Google => "Google login successful",
        AuthProviderKind::Apple => "Apple login successful",
        AuthProviderKind::Local => "Login successful",
    };
    let body = JsonApiResponse::with_status(
        StatusCode::OK,
        message,
        SessionPayload {
            user: UserView::from(session.user),
            access_token: session.tokens.access_token,
        },
    )?;
    Ok((jar, body))
}
