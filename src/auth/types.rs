use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{db::entities::user, error::AppError};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Admin => "admin",
        }
    }
}

impl TryFrom<&str> for Role {
    type Error = String;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "user" => Ok(Role::User),
            "admin" => Ok(Role::Admin),
            other => Err(format!("unknown role: {other}")),
        }
    }
}

/// Where an account's credentials live.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuthProviderKind {
    Local,
    Google,
    Apple,
}

impl AuthProviderKind {
    pub fn as_str(self) -> &'static str {
        match self {
            AuthProviderKind::Local => "local",
            AuthProviderKind::Google => "google",
            AuthProviderKind::Apple => "apple",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Access,
    Refresh,
}

/// Payload of both access and refresh tokens.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Claims {
    pub user_id: Uuid,
    pub email: String,
    pub role: Role,
    pub jti: String,
    pub iat: usize,
    pub exp: usize,
}

/// Identity a token is minted for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenSubject {
    pub user_id: Uuid,
    pub email: String,
    pub role: Role,
}

/// Fails for a stored role this build does not know, so no token is minted
/// with a guessed role.
impl TryFrom<&user::Model> for TokenSubject {
    type Error = AppError;

    fn try_from(user: &user::Model) -> Result<Self, Self::Error> {
        let role = Role::try_from(user.role.as_str()).map_err(|err| {
            tracing::error!(user_id = %user.id, "{err}");
            AppError::internal("Account has an invalid role")
        })?;
        Ok(Self {
            user_id: user.id,
            email: user.email.clone(),
            role,
        })
    }
}

#[derive(Debug, Clone)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
    /// Matches the `exp` claim of `refresh_token`; stored in the ledger.
    pub refresh_expires_at: chrono::DateTime<chrono::FixedOffset>,
}

#[cfg(test)]
mod tests {
    use super::{Claims, Role, TokenSubject};
    use crate::{db::entities::user, error::AppError};

    #[test]
    fn role_parses_only_known_names() {
        assert_eq!(Role::try_from("user"), Ok(Role::User));
        assert_eq!(Role::try_from("admin"), Ok(Role::Admin));
        assert_eq!(
            Role::try_from("manager"),
            Err("unknown role: manager".to_string())
        );
    }

    fn stored_user(role: &str) -> user::Model {
        let now = chrono::Utc::now().fixed_offset();
        user::Model {
            id: uuid::Uuid::new_v4(),
            email: "a@example.com".to_string(),
            password_hash: "hash".to_string(),
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            bio: None,
            avatar_url: None,
            phone_number: None,
            gender: None,
            birthday: None,
            role: role.to_string(),
            is_banned: false,
            is_verified: false,
            auth_provider: "local".to_string(),
            auth_provider_id: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn subject_keeps_stored_admin_role() {
        let subject = TokenSubject::try_from(&stored_user("admin")).expect("role is known");
        assert_eq!(subject.role, Role::Admin);
    }

    #[test]
    fn unknown_stored_role_is_not_downgraded() {
        let err = TokenSubject::try_from(&stored_user("superuser"))
            .expect_err("unknown role should fail");
        assert!(matches!(err, AppError::Internal(_)));
    }

    #[test]
    fn claims_use_camel_case_wire_names() {
        let claims = Claims {
            user_id: uuid::Uuid::nil(),
            email: "a@example.com".to_string(),
            role: Role::Admin,
            jti: "j".to_string(),
            iat: 1,
            exp: 2,
        };

        let json = serde_json::to_value(&claims).expect("claims should serialize");
        assert_eq!(json["userId"], uuid::Uuid::nil().to_string());
        assert_eq!(json["role"], "admin");
    }
}
