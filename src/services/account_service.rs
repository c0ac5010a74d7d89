use std::sync::Arc;

use chrono::{Duration, NaiveDate, Utc};
use sea_orm::Set;
use uuid::Uuid;

use crate::{
    auth::{
        jwt::INVALID_TOKEN,
        password::{hash_password, verify_password},
    },
    db::{
        dao::{DaoBase, DaoLayerError, PasswordResetDao, RefreshTokenDao, UserDao},
        entities::user,
    },
    error::AppError,
    services::notifier::ResetNotifier,
};

const EMAIL_IN_USE: &str = "Email already in use";

pub const FORGOT_PASSWORD_MESSAGE: &str = "If an account exists, a password reset email has been sent.";

/// Fields a user may change on their own profile. `None` leaves a column as is.
#[derive(Debug, Clone, Default)]
pub struct ProfileUpdate {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub bio: Option<String>,
    pub avatar_url: Option<String>,
    pub phone_number: Option<String>,
    pub gender: Option<String>,
    pub birthday: Option<NaiveDate>,
}

#[derive(Clone)]
pub struct AccountService {
    users: UserDao,
    refresh_tokens: RefreshTokenDao,
    resets: PasswordResetDao,
    reset_ttl: Duration,
    notifier: Arc<dyn ResetNotifier>,
}

impl AccountService {
    pub fn new(
        users: UserDao,
        refresh_tokens: RefreshTokenDao,
        resets: PasswordResetDao,
        reset_ttl: Duration,
        notifier: Arc<dyn ResetNotifier>,
    ) -> Self {
        Self {
            users,
            refresh_tokens,
            resets,
            reset_ttl,
            notifier,
        }
    }

    pub async fn profile(&self, user_id: Uuid) -> Result<user::Model, AppError> {
        self.users.find_by_id(user_id).await.map_err(user_not_found)
    }

    pub async fn update_profile(
        &self,
        user_id: Uuid,
        update: ProfileUpdate,
    ) -> Result<user::Model, AppError> {
        let current = self.profile(user_id).await?;

        let email = update
            .email
            .map(|email| email.trim().to_string())
            .filter(|email| *email != current.email);
        if let Some(email) = email.as_deref() {
            if self.users.find_by_email(email).await?.is_some() {
                return Err(AppError::conflict(EMAIL_IN_USE));
            }
        }

        let user = self
            .users
            .update(user_id, move |active| {
                if let Some(value) = update.first_name {
                    active.first_name = Set(value);
                }
                if let Some(value) = update.last_name {
                    active.last_name = Set(value);
                }
                if let Some(value) = email {
                    active.email = Set(value);
                }
                if let Some(value) = update.bio {
                    active.bio = Set(Some(value));
                }
                if let Some(value) = update.avatar_url {
                    active.avatar_url = Set(Some(value));
                }
                if let Some(value) = update.phone_number {
                    active.phone_number = Set(Some(value));
                }
                if let Some(value) = update.gender {
                    active.gender = Set(Some(value));
                }
                if let Some(value) = update.birthday {
                    active.birthday = Set(Some(value));
                }
            })
            .await
            .map_err(|err| match err {
                DaoLayerError::Duplicate { .. } => AppError::conflict(EMAIL_IN_USE),
                other => user_not_found(other),
            })?;
        Ok(user)
    }

    /// Stores the new password and signs the user out everywhere.
    pub async fn change_password(
        &self,
        user_id: Uuid,
        current_password: &str,
        new_password: &str,
    ) -> Result<(), AppError> {
        let user = self.profile(user_id).await?;
        if !verify_password(current_password, &user.password_hash) {
            return Err(AppError::unauthorized("Current password is incorrect"));
        }

        let password_hash = hash_password(new_password)?;
        self.users
            .set_password_hash(&user.id, &password_hash)
            .await?;
        let revoked = self.refresh_tokens.revoke_all_for_user(&user.id).await?;
        tracing::info!(user_id = %user.id, revoked, "password changed");
        Ok(())
    }

    /// Unknown emails are answered exactly like known ones.
    pub async fn forgot_password(&self, email: &str) -> Result<&'static str, AppError> {
        let Some(user) = self.users.find_by_email(email.trim()).await? else {
            tracing::debug!("password reset requested for unknown email");
            return Ok(FORGOT_PASSWORD_MESSAGE);
        };

        let expires_at = (Utc::now() + self.reset_ttl).fixed_offset();
        let reset = self.resets.create_reset_token(&user.id, expires_at).await?;
        self.notifier
            .send_reset_token(&user.email, &reset.token)
            .await;
        Ok(FORGOT_PASSWORD_MESSAGE)
    }

    pub async fn reset_password(&self, token: &str, new_password: &str) -> Result<(), AppError> {
        let reset = self
            .resets
            .find_by_token(token)
            .await?
            .ok_or_else(|| AppError::bad_request(INVALID_TOKEN))?;

        if reset.expires_at <= Utc::now().fixed_offset() {
            self.resets.delete(reset.id).await?;
            return Err(AppError::bad_request("Token expired"));
        }

        let password_hash = hash_password(new_password)?;
        self.users
            .set_password_hash(&reset.user_id, &password_hash)
            .await
            .map_err(user_not_found)?;
        self.resets.delete(reset.id).await?;
        let revoked = self
            .refresh_tokens
            .revoke_all_for_user(&reset.user_id)
            .await?;
        tracing::info!(user_id = %reset.user_id, revoked, "password reset");
        Ok(())
    }
}

fn user_not_found(err: DaoLayerError) -> AppError {
    match err {
        DaoLayerError::NotFound { .. } => AppError::not_found("User not found"),
        other => other.into(),
    }
}
