//! Request bodies and response shapes of the HTTP API. Field names are camelCase on the wire.

use std::borrow::Cow;

use chrono::{DateTime, FixedOffset, NaiveDate};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::{
    db::entities::user, error::AppError, services::account_service::ProfileUpdate,
};

const GENDERS: [&str; 3] = ["male", "female", "other"];

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    #[validate(email(message = "Invalid email address"))]
    pub email: String,
    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    pub password: String,
    #[validate(length(min = 1, message = "First name is required"))]
    pub first_name: String,
    #[validate(length(min = 1, message = "Last name is required"))]
    pub last_name: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email(message = "Invalid email address"))]
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileRequest {
    #[validate(length(min = 1, message = "First name cannot be empty"))]
    pub first_name: Option<String>,
    #[validate(length(min = 1, message = "Last name cannot be empty"))]
    pub last_name: Option<String>,
    #[validate(email(message = "Invalid email address"))]
    pub email: Option<String>,
    pub bio: Option<String>,
    #[validate(url(message = "Invalid URL"))]
    pub avatar_url: Option<String>,
    pub phone_number: Option<String>,
    #[validate(custom(function = "validate_gender"))]
    pub gender: Option<String>,
    #[validate(custom(function = "validate_iso_date"))]
    pub birthday: Option<String>,
}

impl TryFrom<UpdateProfileRequest> for ProfileUpdate {
    type Error = AppError;

    fn try_from(req: UpdateProfileRequest) -> Result<Self, Self::Error> {
        let birthday = req
            .birthday
            .as_deref()
            .map(parse_iso_date)
            .transpose()
            .map_err(|_| AppError::bad_request("Invalid date format"))?;

        Ok(Self {
            first_name: req.first_name,
            last_name: req.last_name,
            email: req.email,
            bio: req.bio,
            avatar_url: req.avatar_url,
            phone_number: req.phone_number,
            gender: req.gender,
            birthday,
        })
    }
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordRequest {
    pub current_password: String,
    #[validate(length(min = 6, message = "New password must be at least 6 characters"))]
    pub new_password: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct ForgotPasswordRequest {
    #[validate(email(message = "Invalid email address"))]
    pub email: String,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ResetPasswordRequest {
    #[validate(length(min = 1, message = "Token is required"))]
    pub token: String,
    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    pub new_password: String,
}

/// Public shape of a user. Never carries the password hash.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserView {
    pub id: Uuid,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub full_name: String,
    pub bio: Option<String>,
    pub avatar_url: Option<String>,
    pub phone_number: Option<String>,
    pub gender: Option<String>,
    pub birthday: Option<NaiveDate>,
    pub role: String,
    pub is_banned: bool,
    pub is_verified: bool,
    pub auth_provider: String,
    pub auth_provider_id: Option<String>,
    pub created_at: DateTime<FixedOffset>,
    pub updated_at: DateTime<FixedOffset>,
}

impl From<user::Model> for UserView {
    fn from(user: user::Model) -> Self {
        Self {
            full_name: format!("{} {}", user.first_name, user.last_name),
            id: user.id,
            email: user.email,
            first_name: user.first_name,
            last_name: user.last_name,
            bio: user.bio,
            avatar_url: user.avatar_url,
            phone_number: user.phone_number,
            gender: user.gender,
            birthday: user.birthday,
            role: user.role,
            is_banned: user.is_banned,
            is_verified: user.is_verified,
            auth_provider: user.auth_provider,
            auth_provider_id: user.auth_provider_id,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionPayload {
    pub user: UserView,
    pub access_token: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessTokenPayload {
    pub access_token: String,
}

fn validate_gender(value: &str) -> Result<(), ValidationError> {
    if GENDERS.contains(&value) {
        return Ok(());
    }
    Err(ValidationError::new("gender")
        .with_message(Cow::Borrowed("Gender must be one of: male, female, other")))
}

fn validate_iso_date(value: &str) -> Result<(), ValidationError> {
    parse_iso_date(value).map(|_| ()).map_err(|_| {
        ValidationError::new("birthday").with_message(Cow::Borrowed("Invalid date format"))
    })
}

fn parse_iso_date(value: &str) -> Result<NaiveDate, chrono::ParseError> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d")
}
