use std::sync::Arc;

use axum::{Router, extract::State, http::StatusCode, routing::post};
use axum_extra::extract::CookieJar;

use crate::{
    auth::{Claims, cookies::refresh_token_from},
    error::AppError,
    middleware::ValidatedJson,
    response::JsonApiResponse,
    routes::payloads::{
        AccessTokenPayload, LoginRequest, RegisterRequest, SessionPayload, UserView,
    },
    services::{context::ServiceContext, session_service::RegisterInput},
    state::AppState,
};

const REFRESH_TOKEN_REQUIRED: &str = "Refresh token is required";

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/refresh", post(refresh))
        .route("/logout", post(logout))
        .route("/logout-all", post(logout_all))
        .with_state(state)
}

async fn register(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    ValidatedJson(body): ValidatedJson<RegisterRequest>,
) -> Result<(CookieJar, JsonApiResponse<SessionPayload>), AppError> {
    let session = ServiceContext::from_state(&state)
        .session()
        .register(RegisterInput {
            email: body.email,
            password: body.password,
            first_name: body.first_name,
            last_name: body.last_name,
        })
        .await?;

    let jar = state.cookies.with_session(
        jar,
        &session.tokens.access_token,
        &session.tokens.refresh_token,
    );
    let body = JsonApiResponse::with_status(
        StatusCode::CREATED,
        "User registered successfully",
        SessionPayload {
            user: UserView::from(session.user),
            access_token: session.tokens.access_token,
        },
    )?;
    Ok((jar, body))
}

async fn login(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    ValidatedJson(body): ValidatedJson<LoginRequest>,
) -> Result<(CookieJar, JsonApiResponse<SessionPayload>), AppError> {
    let session = ServiceContext::from_state(&state)
        .session()
        .login(&body.email, &body.password)
        .await?;

    let jar = state.cookies.with_session(
        jar,
        &session.tokens.access_token,
        &session.tokens.refresh_token,
    );
    let body = JsonApiResponse::with_status(
        StatusCode::OK,
        "Login successful",
        SessionPayload {
            user: UserView::from(session.user),
            access_token: session.tokens.access_token,
        },
    )?;
    Ok((jar, body))
}

async fn refresh(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
) -> Result<(CookieJar, JsonApiResponse<AccessTokenPayload>), AppError> {
    let refresh_token =
        refresh_token_from(&jar).ok_or_else(|| AppError::bad_request(REFRESH_TOKEN_REQUIRED))?;

    let access_token = ServiceContext::from_state(&state)
        .session()
        .refresh(&refresh_token)
        .await?;

    let jar = jar.add(state.cookies.access(&access_token));
    let body = JsonApiResponse::with_status(
        StatusCode::OK,
        "Token refreshed successfully",
        AccessTokenPayload { access_token },
    )?;
    Ok((jar, body))
}

async fn logout(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
) -> Result<(CookieJar, JsonApiResponse<()>), AppError> {
    let refresh_token =
        refresh_token_from(&jar).ok_or_else(|| AppError::bad_request(REFRESH_TOKEN_REQUIRED))?;

    ServiceContext::from_state(&state)
        .session()
        .logout(&refresh_token)
        .await?;

    let body = JsonApiResponse::message("Logged out successfully")?;
    Ok((state.cookies.cleared(jar), body))
}

async fn logout_all(
    State(state): State<Arc<AppState>>,
    claims: Claims,
    jar: CookieJar,
) -> Result<(CookieJar, JsonApiResponse<()>), AppError> {
    let count = ServiceContext::from_state(&state)
        .session()
        .logout_all(&claims.user_id)
        .await?;

    let body = JsonApiResponse::message(format!("Logged out from {count} device(s) successfully"))?;
    Ok((state.cookies.cleared(jar), body))
}
