mod common;

use axum::http::{Method, StatusCode};
use chrono::{Duration, Utc};
use sea_orm::{ActiveModelTrait, IntoActiveModel, Set};
use serde_json::json;

use common::{spawn_app, with_refresh_cookie};
use shop_accounts::{
    db::dao::{DaoBase, DaoContext},
    services::account_service::FORGOT_PASSWORD_MESSAGE,
};

#[tokio::test]
async fn forgot_password_does_not_reveal_accounts() {
    let app = spawn_app().await;
    app.register("known@example.com", "secret123").await;

    let known = app
        .post_json("/auth/forgot-password", json!({ "email": "known@example.com" }))
        .await;
    let unknown = app
        .post_json("/auth/forgot-password", json!({ "email": "ghost@example.com" }))
        .await;

    assert_eq!(known.status, StatusCode::OK);
    assert_eq!(unknown.status, StatusCode::OK);
    assert_eq!(known.message(), FORGOT_PASSWORD_MESSAGE);
    assert_eq!(known.json, unknown.json);
    assert_eq!(app.notifier.sent_count(), 1);
    assert!(app.notifier.last_token_for("known@example.com").is_some());
}

#[tokio::test]
async fn reset_sets_new_password_and_revokes_sessions() {
    let app = spawn_app().await;
    let registered = app.register("reset@example.com", "secret123").await;
    let refresh_token = registered.cookie("refreshToken").expect("refresh cookie");

    app.post_json("/auth/forgot-password", json!({ "email": "reset@example.com" }))
        .await;
    let token = app
        .notifier
        .last_token_for("reset@example.com")
        .expect("reset token should be sent");

    let res = app
        .post_json(
            "/auth/reset-password",
            json!({ "token": token, "newPassword": "brand-new" }),
        )
        .await;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.message(), "Password reset successfully");

    let refused = app
        .send(with_refresh_cookie(Method::POST, "/auth/refresh", &refresh_token))
        .await;
    assert_eq!(refused.status, StatusCode::UNAUTHORIZED);
    assert_eq!(
        app.login("reset@example.com", "brand-new").await.status,
        StatusCode::OK
    );

    let reused = app
        .post_json(
            "/auth/reset-password",
            json!({ "token": token, "newPassword": "another-one" }),
        )
        .await;
    assert_eq!(reused.status, StatusCode::BAD_REQUEST);
    assert_eq!(reused.message(), "Invalid or expired token");
}

#[tokio::test]
async fn new_reset_request_replaces_the_previous_token() {
    let app = spawn_app().await;
    app.register("twice@example.com", "secret123").await;

    app.post_json("/auth/forgot-password", json!({ "email": "twice@example.com" }))
        .await;
    let first = app
        .notifier
        .last_token_for("twice@example.com")
        .expect("first token");
    app.post_json("/auth/forgot-password", json!({ "email": "twice@example.com" }))
        .await;
    let second = app
        .notifier
        .last_token_for("twice@example.com")
        .expect("second token");
    assert_ne!(first, second);

    let stale = app
        .post_json(
            "/auth/reset-password",
            json!({ "token": first, "newPassword": "brand-new" }),
        )
        .await;
    assert_eq!(stale.status, StatusCode::BAD_REQUEST);

    let fresh = app
        .post_json(
            "/auth/reset-password",
            json!({ "token": second, "newPassword": "brand-new" }),
        )
        .await;
    assert_eq!(fresh.status, StatusCode::OK);
}

#[tokio::test]
async fn expired_reset_token_is_rejected_and_removed() {
    let app = spawn_app().await;
    app.register("late@example.com", "secret123").await;
    app.post_json("/auth/forgot-password", json!({ "email": "late@example.com" }))
        .await;
    let token = app
        .notifier
        .last_token_for("late@example.com")
        .expect("reset token");

    let resets = DaoContext::new(&app.state.db).password_reset();
    let row = resets
        .find_by_token(&token)
        .await
        .expect("lookup should succeed")
        .expect("token row should exist");
    let mut active = row.into_active_model();
    active.expires_at = Set((Utc::now() - Duration::minutes(1)).fixed_offset());
    active
        .update(resets.db())
        .await
        .expect("expiry should update");

    let res = app
        .post_json(
            "/auth/reset-password",
            json!({ "token": token, "newPassword": "brand-new" }),
        )
        .await;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    assert_eq!(res.message(), "Token expired");

    let gone = resets
        .find_by_token(&token)
        .await
        .expect("lookup should succeed");
    assert!(gone.is_none());
}

#[tokio::test]
async fn reset_body_is_validated() {
    let app = spawn_app().await;

    let res = app
        .post_json(
            "/auth/reset-password",
            json!({ "token": "", "newPassword": "123" }),
        )
        .await;

    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    assert!(res.message().contains("Token is required"));
}
