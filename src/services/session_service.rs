use uuid::Uuid;

use crate::{
    auth::{
        AuthProviderKind, Role, TokenKind, TokenPair, TokenSubject,
        jwt::TokenCodec,
        oauth::OAuthProfile,
        password::{hash_password, random_password, verify_password},
    },
    db::{
        dao::{DaoBase, DaoLayerError, NewUser, RefreshTokenDao, UserDao},
        entities::user,
    },
    error::AppError,
};

pub const INVALID_CREDENTIALS: &str = "Invalid email or password";
pub const INVALID_REFRESH_TOKEN: &str = "Invalid or expired refresh token";
const EMAIL_TAKEN: &str = "User with this email already exists";

/// A signed-in user together with the tokens just issued for them.
#[derive(Debug, Clone)]
pub struct Session {
    pub user: user::Model,
    pub tokens: TokenPair,
}

#[derive(Debug, Clone)]
pub struct RegisterInput {
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
}

/// Register, login, refresh and logout. Every issued refresh token is
/// recorded in the ledger before it leaves this service.
#[derive(Clone)]
pub struct SessionService {
    users: UserDao,
    refresh_tokens: RefreshTokenDao,
    tokens: TokenCodec,
}

impl SessionService {
    pub fn new(users: UserDao, refresh_tokens: RefreshTokenDao, tokens: TokenCodec) -> Self {
        Self {
            users,
            refresh_tokens,
            tokens,
        }
    }

    pub async fn register(&self, input: RegisterInput) -> Result<Session, AppError> {
        let email = input.email.trim();
        if self.users.find_by_email(email).await?.is_some() {
            return Err(AppError::conflict(EMAIL_TAKEN));
        }

        let password_hash = hash_password(&input.password)?;
        let user = self
            .users
            .create_user(NewUser {
                email: email.to_string(),
                password_hash,
                first_name: input.first_name.trim().to_string(),
                last_name: input.last_name.trim().to_string(),
                role: Role::User.as_str().to_string(),
                auth_provider: AuthProviderKind::Local.as_str().to_string(),
                auth_provider_id: None,
                avatar_url: None,
                is_verified: false,
            })
            .await
            .map_err(email_taken)?;
        tracing::info!(user_id = %user.id, "user registered");

        self.start_session(user).await
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<Session, AppError> {
        let user = self
            .users
            .find_by_email(email.trim())
            .await?
            .ok_or_else(|| AppError::unauthorized(INVALID_CREDENTIALS))?;

        if !verify_password(password, &user.password_hash) {
            return Err(AppError::unauthorized(INVALID_CREDENTIALS));
        }
        ensure_not_banned(&user)?;

        self.start_session(user).await
    }

    /// Mints a new access token. The refresh token itself is not rotated.
    pub async fn refresh(&self, refresh_token: &str) -> Result<String, AppError> {
        let claims = self
            .tokens
            .verify(refresh_token, TokenKind::Refresh)
            .map_err(|_| AppError::unauthorized(INVALID_REFRESH_TOKEN))?;

        if !self.refresh_tokens.is_valid(refresh_token).await? {
            return Err(AppError::unauthorized(INVALID_REFRESH_TOKEN));
        }

        let user = match self.users.find_by_id(claims.user_id).await {
            Ok(user) => user,
            Err(DaoLayerError::NotFound { .. }) => {
                return Err(AppError::unauthorized(INVALID_REFRESH_TOKEN));
            }
            Err(err) => return Err(err.into()),
        };
        ensure_not_banned(&user)?;

        self.tokens.issue_access(&TokenSubject::try_from(&user)?)
    }

    pub async fn logout(&self, refresh_token: &str) -> Result<(), AppError> {
        if !self.refresh_tokens.revoke_token(refresh_token).await? {
            return Err(AppError::not_found("Refresh token not found"));
        }
        Ok(())
    }

    /// Revokes every live refresh token of the user and returns how many there were.
    pub async fn logout_all(&self, user_id: &Uuid) -> Result<u64, AppError> {
        let count = self.refresh_tokens.revoke_all_for_user(user_id).await?;
        tracing::info!(user_id = %user_id, count, "revoked all sessions");
        Ok(count)
    }

    /// Signs in through an external provider: reuse the linked account, else
    /// link the account with the same email, else create a verified one.
    pub async fn oauth_login(&self, profile: OAuthProfile) -> Result<Session, AppError> {
        let provider = profile.provider.as_str();

        let user = if let Some(user) = self
            .users
            .find_by_provider(provider, &profile.external_id)
            .await?
        {
            user
        } else if let Some(existing) = self.users.find_by_email(&profile.email).await? {
            tracing::info!(user_id = %existing.id, provider, "linking oauth identity");
            self.users
                .link_provider(&existing.id, provider, &profile.external_id)
                .await?
        } else {
            let password_hash = hash_password(&random_password())?;
            let user = self
                .users
                .create_user(NewUser {
                    email: profile.email,
                    password_hash,
                    first_name: profile.first_name,
                    last_name: profile.last_name,
                    role: Role::User.as_str().to_string(),
                    auth_provider: provider.to_string(),
                    auth_provider_id: Some(profile.external_id),
                    avatar_url: profile.avatar_url,
                    is_verified: true,
                })
                .await
                .map_err(email_taken)?;
            tracing::info!(user_id = %user.id, provider, "user registered via oauth");
            user
        };
        ensure_not_banned(&user)?;

        self.start_session(user).await
    }

    async fn start_session(&self, user: user::Model) -> Result<Session, AppError> {
        let tokens = self.tokens.issue_pair(&TokenSubject::try_from(&user)?)?;
        self.refresh_tokens
            .create_refresh_token(&tokens.refresh_token, &user.id, tokens.refresh_expires_at)
            .await?;
        Ok(Session { user, tokens })
    }
}

/// A concurrent registration can win the race between the lookup and the insert.
fn email_taken(err: DaoLayerError) -> AppError {
    match err {
        DaoLayerError::Duplicate { .. } => AppError::conflict(EMAIL_TAKEN),
        other => other.into(),
    }
}

fn ensure_not_banned(user: &user::Model) -> Result<(), AppError> {
    if user.is_banned {
        return Err(AppError::forbidden("Account is banned"));
    }
    Ok(())
}
