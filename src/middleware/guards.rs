use std::sync::Arc;

use axum::{
    Json,
    extract::{FromRequest, FromRequestParts, Request},
    http::{header, request::Parts},
};
use axum_extra::extract::CookieJar;
use serde::de::DeserializeOwned;
use validator::{Validate, ValidationErrors};

use crate::{
    auth::{Claims, TokenKind, cookies::ACCESS_COOKIE},
    error::AppError,
    state::AppState,
};

pub const NO_TOKEN: &str = "No token provided. Please provide a valid access token.";

// Access guard: bearer header first, then the access cookie.
impl FromRequestParts<Arc<AppState>> for Claims {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        if let Some(claims) = parts.extensions.get::<Claims>().cloned() {
            return Ok(claims);
        }

        let token = access_token_from(parts).ok_or_else(|| AppError::unauthorized(NO_TOKEN))?;
        let claims = state.tokens.verify(&token, TokenKind::Access)?;

        parts.extensions.insert(claims.clone());
        Ok(claims)
    }
}

fn access_token_from(parts: &Parts) -> Option<String> {
    let bearer = parts
        .headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(str::to_string);

    bearer.or_else(|| {
        CookieJar::from_headers(&parts.headers)
            .get(ACCESS_COOKIE)
            .map(|cookie| cookie.value().to_string())
            .filter(|value| !value.is_empty())
    })
}

/// JSON body that passed its `validator` rules. Both malformed JSON and rule
/// violations are rejected with 400.
#[derive(Debug, Clone)]
pub struct ValidatedJson<T>(pub T);

impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| AppError::bad_request(rejection.body_text()))?;
        value
            .validate()
            .map_err(|errors| AppError::bad_request(validation_message(&errors)))?;
        Ok(Self(value))
    }
}

pub(crate) fn validation_message(errors: &ValidationErrors) -> String {
    let mut messages: Vec<(String, String)> = errors
        .field_errors()
        .into_iter()
        .flat_map(|(field, errs)| {
            let field = field.to_string();
            errs.iter().map(move |err| {
                let message = err
                    .message
                    .as_ref()
                    .map(|message| message.to_string())
                    .unwrap_or_else(|| format!("{field} is invalid"));
                (field.clone(), message)
            })
        })
        .collect();
    messages.sort();

    if messages.is_empty() {
        return "Validation failed".to_string();
    }
    messages
        .into_iter()
        .map(|(_, message)| message)
        .collect::<Vec<_>>()
        .join("; ")
}
