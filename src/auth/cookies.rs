//! `HttpOnly` auth cookies.

use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use time::Duration;

use crate::config::AuthConfig;

pub const ACCESS_COOKIE: &str = "accessToken";
pub const REFRESH_COOKIE: &str = "refreshToken";

#[derive(Debug, Clone)]
pub struct AuthCookies {
    secure: bool,
    access_max_age_secs: i64,
    refresh_max_age_secs: i64,
}

impl AuthCookies {
    pub fn new(secure: bool, access_max_age_secs: u64, refresh_max_age_secs: u64) -> Self {
        Self {
            secure,
            access_max_age_secs: access_max_age_secs as i64,
            refresh_max_age_secs: refresh_max_age_secs as i64,
        }
    }

    pub fn from_config(cfg: &AuthConfig) -> Self {
        Self::new(cfg.secure_cookies, cfg.access_ttl_secs, cfg.refresh_ttl_secs)
    }

    pub fn access(&self, token: &str) -> Cookie<'static> {
        self.build(ACCESS_COOKIE, token, Duration::seconds(self.access_max_age_secs))
    }

    pub fn refresh(&self, token: &str) -> Cookie<'static> {
        self.build(REFRESH_COOKIE, token, Duration::seconds(self.refresh_max_age_secs))
    }

    /// Sets both cookies of a freshly issued session.
    pub fn with_session(&self, jar: CookieJar, access_token: &str, refresh_token: &str) -> CookieJar {
        jar.add(self.access(access_token))
            .add(self.refresh(refresh_token))
    }

    /// Expires both cookies on the client.
    pub fn cleared(&self, jar: CookieJar) -> CookieJar {
        jar.add(self.build(ACCESS_COOKIE, "", Duration::ZERO))
            .add(self.build(REFRESH_COOKIE, "", Duration::ZERO))
    }

    fn build(&self, name: &'static str, value: &str, max_age: Duration) -> Cookie<'static> {
        Cookie::build((name, value.to_string()))
            .http_only(true)
            .secure(self.secure)
            .same_site(SameSite::Strict)
            .path("/")
            .max_age(max_age)
            .build()
    }
}

pub fn refresh_token_from(jar: &CookieJar) -> Option<String> {
    jar.get(REFRESH_COOKIE)
        .map(|cookie| cookie.value().to_string())
        .filter(|value| !value.is_empty())
}
