#![allow(dead_code)]

use std::sync::Arc;

use axum::{
    Router,
    body::{self, Body},
    http::{HeaderMap, Method, Request, StatusCode, header},
};
use serde_json::Value;
use tower::ServiceExt; // for `oneshot`

use shop_accounts::{
    auth::oauth::OAuthProviders,
    state::AppState,
    test_helpers::{RecordingNotifier, test_db, test_router, test_state},
};

pub struct TestApp {
    pub state: Arc<AppState>,
    pub router: Router,
    pub notifier: Arc<RecordingNotifier>,
}

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub json: Value,
}

impl TestResponse {
    pub fn message(&self) -> &str {
        self.json["message"].as_str().unwrap_or_default()
    }

    /// Value of a cookie set by this response.
    pub fn cookie(&self, name: &str) -> Option<String> {
        self.set_cookie(name).and_then(|raw| {
            raw.split(';')
                .next()
                .and_then(|pair| pair.split_once('='))
                .map(|(_, value)| value.to_string())
        })
    }

    /// Full `Set-Cookie` line for `name`.
    pub fn set_cookie(&self, name: &str) -> Option<String> {
        self.headers
            .get_all(header::SET_COOKIE)
            .iter()
            .filter_map(|value| value.to_str().ok())
            .find(|raw| raw.starts_with(&format!("{name}=")))
            .map(str::to_string)
    }
}

pub async fn spawn_app() -> TestApp {
    spawn_app_with(OAuthProviders::new()).await
}

pub async fn spawn_app_with(oauth: OAuthProviders) -> TestApp {
    let notifier = Arc::new(RecordingNotifier::default());
    let state = test_state(test_db().await, oauth, notifier.clone());
    TestApp {
        router: test_router(&state),
        state,
        notifier,
    }
}

impl TestApp {
    pub async fn send(&self, request: Request<Body>) -> TestResponse {
        let res = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("router is infallible");

        let status = res.status();
        let headers = res.headers().clone();
        let bytes = body::to_bytes(res.into_body(), usize::MAX)
            .await
            .expect("body should be readable");
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).expect("body should be json")
        };
        TestResponse {
            status,
            headers,
            json,
        }
    }

    pub async fn post_json(&self, path: &str, body: Value) -> TestResponse {
        self.send(json_request(Method::POST, path, body)).await
    }

    pub async fn register(&self, email: &str, password: &str) -> TestResponse {
        self.post_json(
            "/auth/register",
            serde_json::json!({
                "email": email,
                "password": password,
                "firstName": "Ada",
                "lastName": "Lovelace"
            }),
        )
        .await
    }

    pub async fn login(&self, email: &str, password: &str) -> TestResponse {
        self.post_json(
            "/auth/login",
            serde_json::json!({ "email": email, "password": password }),
        )
        .await
    }
}

pub fn json_request(method: Method, path: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(path)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .expect("request should build")
}

pub fn with_refresh_cookie(method: Method, path: &str, refresh_token: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(path)
        .header(header::COOKIE, format!("refreshToken={refresh_token}"))
        .body(Body::empty())
        .expect("request should build")
}

pub fn with_bearer(method: Method, path: &str, access_token: &str, body: Option<Value>) -> Request<Body> {
    let builder = Request::builder()
        .method(method)
        .uri(path)
        .header(header::AUTHORIZATION, format!("Bearer {access_token}"));
    match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string())),
        None => builder.body(Body::empty()),
    }
    .expect("request should build")
}
