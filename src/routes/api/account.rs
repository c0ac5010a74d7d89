use std::sync::Arc;

use axum::{
    Router,
    extract::State,
    http::StatusCode,
    routing::{get, post},
};

use crate::{
    auth::Claims,
    middleware::ValidatedJson,
    response::{ApiResult, JsonApiResponse},
    routes::payloads::{
        ChangePasswordRequest, ForgotPasswordRequest, ResetPasswordRequest,
        UpdateProfileRequest, UserView,
    },
    services::{account_service::ProfileUpdate, context::ServiceContext},
    state::AppState,
};

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/profile", get(profile).put(update_profile))
        .route("/change-password", post(change_password))
        .route("/forgot-password", post(forgot_password))
        .route("/reset-password", post(reset_password))
        .with_state(state)
}

async fn profile(State(state): State<Arc<AppState>>, claims: Claims) -> ApiResult<UserView> {
    let user = ServiceContext::from_state(&state)
        .account()
        .profile(claims.user_id)
        .await?;
    JsonApiResponse::ok(UserView::from(user))
}

async fn update_profile(
    State(state): State<Arc<AppState>>,
    claims: Claims,
    ValidatedJson(body): ValidatedJson<UpdateProfileRequest>,
) -> ApiResult<UserView> {
    let update = ProfileUpdate::try_from(body)?;
    let user = ServiceContext::from_state(&state)
        .account()
        .update_profile(claims.user_id, update)
        .await?;
    JsonApiResponse::with_status(
        StatusCode::OK,
        "Profile updated successfully",
        UserView::from(user),
    )
}

async fn change_password(
    State(state): State<Arc<AppState>>,
    claims: Claims,
    ValidatedJson(body): ValidatedJson<ChangePasswordRequest>,
) -> ApiResult<()> {
    ServiceContext::from_state(&state)
        .account()
        .change_password(claims.user_id, &body.current_password, &body.new_password)
        .await?;
    JsonApiResponse::message(
        "Password changed successfully. Please login again with your new password.",
    )
}

async fn forgot_password(
    State(state): State<Arc<AppState>>,
    ValidatedJson(body): ValidatedJson<ForgotPasswordRequest>,
) -> ApiResult<()> {
    let message = ServiceContext::from_state(&state)
        .account()
        .forgot_password(&body.email)
        .await?;
    JsonApiResponse::message(message)
}

async fn reset_password(
    State(state): State<Arc<AppState>>,
    ValidatedJson(body): ValidatedJson<ResetPasswordRequest>,
) -> ApiResult<()> {
    ServiceContext::from_state(&state)
        .account()
        .reset_password(&body.token, &body.new_password)
        .await?;
    JsonApiResponse::message("Password reset successfully")
}
