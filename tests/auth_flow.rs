mod common;

use axum::{
    body::Body,
    http::{Method, Request, StatusCode, header},
};
use serde_json::json;

use common::{spawn_app, with_bearer, with_refresh_cookie};
use shop_accounts::auth::TokenKind;

#[tokio::test]
async fn health_reports_ok() {
    let app = spawn_app().await;

    let res = app
        .send(
            Request::builder()
                .uri("/health")
                .body(Body::empty())
                .expect("request should build"),
        )
        .await;

    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.json["success"], true);
    assert_eq!(res.json["data"]["status"], "ok");
}

#[tokio::test]
async fn register_sets_cookies_and_returns_verifiable_token() {
    let app = spawn_app().await;

    let res = app.register("ada@example.com", "secret123").await;

    assert_eq!(res.status, StatusCode::CREATED);
    assert_eq!(res.message(), "User registered successfully");
    assert_eq!(res.json["data"]["user"]["email"], "ada@example.com");
    assert_eq!(res.json["data"]["user"]["fullName"], "Ada Lovelace");
    assert!(res.json["data"]["user"].get("passwordHash").is_none());

    let access_cookie = res.set_cookie("accessToken").expect("access cookie should be set");
    assert!(access_cookie.contains("HttpOnly"));
    assert!(access_cookie.contains("SameSite=Strict"));
    assert!(res.cookie("refreshToken").is_some());

    let access = res.json["data"]["accessToken"]
        .as_str()
        .expect("access token in body");
    let claims = app
        .state
        .tokens
        .verify(access, TokenKind::Access)
        .expect("access token should verify");
    assert_eq!(
        claims.user_id.to_string(),
        res.json["data"]["user"]["id"].as_str().expect("user id")
    );
}

#[tokio::test]
async fn duplicate_registration_conflicts() {
    let app = spawn_app().await;
    app.register("ada@example.com", "secret123").await;

    let res = app.register("ada@example.com", "another123").await;

    assert_eq!(res.status, StatusCode::CONFLICT);
    assert_eq!(res.message(), "User with this email already exists");
}

#[tokio::test]
async fn concurrent_registrations_yield_one_account_and_one_conflict() {
    let app = spawn_app().await;

    let (first, second) = tokio::join!(
        app.register("race@example.com", "secret123"),
        app.register("race@example.com", "secret123"),
    );

    let mut statuses = [first.status, second.status];
    statuses.sort_by_key(|status| status.as_u16());
    assert_eq!(statuses, [StatusCode::CREATED, StatusCode::CONFLICT]);
    let loser = if first.status == StatusCode::CONFLICT {
        &first
    } else {
        &second
    };
    assert_eq!(loser.message(), "User with this email already exists");
}

#[tokio::test]
async fn invalid_register_body_is_rejected() {
    let app = spawn_app().await;

    let res = app.register("not-an-email", "123").await;

    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    assert_eq!(res.json["success"], false);
    assert!(res.message().contains("Invalid email address"));
}

#[tokio::test]
async fn malformed_json_is_a_bad_request_envelope() {
    let app = spawn_app().await;

    let res = app
        .send(
            Request::builder()
                .method(Method::POST)
                .uri("/auth/login")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from("{not json"))
                .expect("request should build"),
        )
        .await;

    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    assert_eq!(res.json["success"], false);
}

#[tokio::test]
async fn full_session_lifecycle() {
    let app = spawn_app().await;
    let registered = app.register("flow@example.com", "secret123").await;
    assert_eq!(registered.status, StatusCode::CREATED);
    let first_access = registered.json["data"]["accessToken"]
        .as_str()
        .expect("access token")
        .to_string();

    let bad = app.login("flow@example.com", "wrong-password").await;
    assert_eq!(bad.status, StatusCode::UNAUTHORIZED);
    assert_eq!(bad.message(), "Invalid email or password");

    let good = app.login("flow@example.com", "secret123").await;
    assert_eq!(good.status, StatusCode::OK);
    assert_eq!(good.message(), "Login successful");
    let second_access = good.json["data"]["accessToken"]
        .as_str()
        .expect("access token");
    let first_jti = app
        .state
        .tokens
        .verify(&first_access, TokenKind::Access)
        .expect("first token verifies")
        .jti;
    let second_jti = app
        .state
        .tokens
        .verify(second_access, TokenKind::Access)
        .expect("second token verifies")
        .jti;
    assert_ne!(first_jti, second_jti);

    let refresh_token = good.cookie("refreshToken").expect("refresh cookie");
    let refreshed = app
        .send(with_refresh_cookie(Method::POST, "/auth/refresh", &refresh_token))
        .await;
    assert_eq!(refreshed.status, StatusCode::OK);
    assert_eq!(refreshed.message(), "Token refreshed successfully");
    assert!(refreshed.json["data"]["accessToken"].is_string());
    assert!(refreshed.cookie("accessToken").is_some());

    let logout = app
        .send(with_refresh_cookie(Method::POST, "/auth/logout", &refresh_token))
        .await;
    assert_eq!(logout.status, StatusCode::OK);
    assert_eq!(logout.message(), "Logged out successfully");

    let after_logout = app
        .send(with_refresh_cookie(Method::POST, "/auth/refresh", &refresh_token))
        .await;
    assert_eq!(after_logout.status, StatusCode::UNAUTHORIZED);
    assert_eq!(after_logout.message(), "Invalid or expired refresh token");

    let again = app
        .send(with_refresh_cookie(Method::POST, "/auth/logout", &refresh_token))
        .await;
    assert_eq!(again.status, StatusCode::NOT_FOUND);
    assert_eq!(again.message(), "Refresh token not found");

    let unknown = app
        .send(with_refresh_cookie(Method::POST, "/auth/logout", "never-issued"))
        .await;
    assert_eq!(unknown.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn refresh_and_logout_require_the_cookie() {
    let app = spawn_app().await;

    for path in ["/auth/refresh", "/auth/logout"] {
        let res = app
            .send(
                Request::builder()
                    .method(Method::POST)
                    .uri(path)
                    .body(Body::empty())
                    .expect("request should build"),
            )
            .await;
        assert_eq!(res.status, StatusCode::BAD_REQUEST, "{path}");
        assert_eq!(res.message(), "Refresh token is required");
    }
}

#[tokio::test]
async fn logout_all_revokes_every_device() {
    let app = spawn_app().await;
    let bystander = app.register("other@example.com", "secret123").await;
    app.register("many@example.com", "secret123").await;
    let phone = app.login("many@example.com", "secret123").await;
    let laptop = app.login("many@example.com", "secret123").await;
    let access = laptop.json["data"]["accessToken"]
        .as_str()
        .expect("access token");

    let res = app
        .send(with_bearer(Method::POST, "/auth/logout-all", access, None))
        .await;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.message(), "Logged out from 3 device(s) successfully");

    let phone_refresh = phone.cookie("refreshToken").expect("refresh cookie");
    let refused = app
        .send(with_refresh_cookie(Method::POST, "/auth/refresh", &phone_refresh))
        .await;
    assert_eq!(refused.status, StatusCode::UNAUTHORIZED);

    let bystander_refresh = bystander.cookie("refreshToken").expect("refresh cookie");
    let untouched = app
        .send(with_refresh_cookie(Method::POST, "/auth/refresh", &bystander_refresh))
        .await;
    assert_eq!(untouched.status, StatusCode::OK);
}

#[tokio::test]
async fn profile_requires_a_valid_access_token() {
    let app = spawn_app().await;

    let missing = app
        .send(
            Request::builder()
                .uri("/auth/profile")
                .body(Body::empty())
                .expect("request should build"),
        )
        .await;
    assert_eq!(missing.status, StatusCode::UNAUTHORIZED);
    assert_eq!(
        missing.message(),
        "No token provided. Please provide a valid access token."
    );

    let forged = app
        .send(with_bearer(Method::GET, "/auth/profile", "forged.token.value", None))
        .await;
    assert_eq!(forged.status, StatusCode::UNAUTHORIZED);
    assert_eq!(forged.message(), "Invalid or expired token");
}

#[tokio::test]
async fn refresh_token_is_not_accepted_as_access_token() {
    let app = spawn_app().await;
    let res = app.register("kinds@example.com", "secret123").await;
    let refresh_token = res.cookie("refreshToken").expect("refresh cookie");

    let profile = app
        .send(with_bearer(Method::GET, "/auth/profile", &refresh_token, None))
        .await;
    assert_eq!(profile.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn profile_can_be_read_from_cookie_and_updated() {
    let app = spawn_app().await;
    let res = app.register("me@example.com", "secret123").await;
    let access = res.cookie("accessToken").expect("access cookie");

    let profile = app
        .send(
            Request::builder()
                .uri("/auth/profile")
                .header(header::COOKIE, format!("accessToken={access}"))
                .body(Body::empty())
                .expect("request should build"),
        )
        .await;
    assert_eq!(profile.status, StatusCode::OK);
    assert_eq!(profile.json["data"]["email"], "me@example.com");

    let updated = app
        .send(with_bearer(
            Method::PUT,
            "/auth/profile",
            &access,
            Some(json!({ "bio": "Analyst", "gender": "female", "birthday": "1815-12-10" })),
        ))
        .await;
    assert_eq!(updated.status, StatusCode::OK);
    assert_eq!(updated.message(), "Profile updated successfully");
    assert_eq!(updated.json["data"]["bio"], "Analyst");
    assert_eq!(updated.json["data"]["birthday"], "1815-12-10");
    assert_eq!(updated.json["data"]["firstName"], "Ada");

    let invalid = app
        .send(with_bearer(
            Method::PUT,
            "/auth/profile",
            &access,
            Some(json!({ "gender": "robot" })),
        ))
        .await;
    assert_eq!(invalid.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn profile_email_must_stay_unique() {
    let app = spawn_app().await;
    app.register("first@example.com", "secret123").await;
    let second = app.register("second@example.com", "secret123").await;
    let access = second.cookie("accessToken").expect("access cookie");

    let res = app
        .send(with_bearer(
            Method::PUT,
            "/auth/profile",
            &access,
            Some(json!({ "email": "first@example.com" })),
        ))
        .await;
    assert_eq!(res.status, StatusCode::CONFLICT);
    assert_eq!(res.message(), "Email already in use");
}

#[tokio::test]
async fn change_password_signs_out_other_sessions() {
    let app = spawn_app().await;
    let bystander = app.register("stays@example.com", "secret123").await;
    let res = app.register("change@example.com", "secret123").await;
    let access = res.cookie("accessToken").expect("access cookie");
    let refresh_token = res.cookie("refreshToken").expect("refresh cookie");

    let wrong = app
        .send(with_bearer(
            Method::POST,
            "/auth/change-password",
            &access,
            Some(json!({ "currentPassword": "nope", "newPassword": "newsecret" })),
        ))
        .await;
    assert_eq!(wrong.status, StatusCode::UNAUTHORIZED);
    assert_eq!(wrong.message(), "Current password is incorrect");

    let changed = app
        .send(with_bearer(
            Method::POST,
            "/auth/change-password",
            &access,
            Some(json!({ "currentPassword": "secret123", "newPassword": "newsecret" })),
        ))
        .await;
    assert_eq!(changed.status, StatusCode::OK);
    assert_eq!(
        changed.message(),
        "Password changed successfully. Please login again with your new password."
    );

    let refused = app
        .send(with_refresh_cookie(Method::POST, "/auth/refresh", &refresh_token))
        .await;
    assert_eq!(refused.status, StatusCode::UNAUTHORIZED);

    let bystander_refresh = bystander.cookie("refreshToken").expect("refresh cookie");
    let untouched = app
        .send(with_refresh_cookie(Method::POST, "/auth/refresh", &bystander_refresh))
        .await;
    assert_eq!(untouched.status, StatusCode::OK);

    assert_eq!(
        app.login("change@example.com", "secret123").await.status,
        StatusCode::UNAUTHORIZED
    );
    assert_eq!(
        app.login("change@example.com", "newsecret").await.status,
        StatusCode::OK
    );
}

#[tokio::test]
async fn unknown_route_gets_json_envelope() {
    let app = spawn_app().await;

    let res = app
        .send(
            Request::builder()
                .uri("/auth/nope")
                .body(Body::empty())
                .expect("request should build"),
        )
        .await;

    assert_eq!(res.status, StatusCode::NOT_FOUND);
    assert_eq!(res.json["success"], false);
}
