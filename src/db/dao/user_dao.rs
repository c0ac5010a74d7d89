use sea_orm::{ColumnTrait, DatabaseConnection, QueryFilter, Set};
use uuid::Uuid;

use super::{DaoBase, DaoResult};
use crate::db::entities::{prelude::User, user};

#[derive(Clone)]
pub struct UserDao {
    db: DatabaseConnection,
}

/// Column values for a freshly created account.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub password_hash: String,
    pub first_name: String,
    pub last_name: String,
    pub role: String,
    pub auth_provider: String,
    pub auth_provider_id: Option<String>,
    pub avatar_url: Option<String>,
    pub is_verified: bool,
}

impl DaoBase for UserDao {
    type Entity = User;

    fn new(db: &DatabaseConnection) -> Self {
        Self { db: db.clone() }
    }

    fn db(&self) -> &DatabaseConnection {
        &self.db
    }
}

impl UserDao {
    pub async fn find_by_email(&self, email: &str) -> DaoResult<Option<user::Model>> {
        let email = email.to_string();
        self.find_one(move |query| query.filter(user::Column::Email.eq(email)))
            .await
    }

    pub async fn find_by_provider(
        &self,
        provider: &str,
        provider_id: &str,
    ) -> DaoResult<Option<user::Model>> {
        let provider = provider.to_string();
        let provider_id = provider_id.to_string();
        self.find_one(move |query| {
            query
                .filter(user::Column::AuthProvider.eq(provider))
                .filter(user::Column::AuthProviderId.eq(provider_id))
        })
        .await
    }

    pub async fn create_user(&self, new_user: NewUser) -> DaoResult<user::Model> {
        let model = user::ActiveModel {
            email: Set(new_user.email),
            password_hash: Set(new_user.password_hash),
            first_name: Set(new_user.first_name),
            last_name: Set(new_user.last_name),
            bio: Set(None),
            avatar_url: Set(new_user.avatar_url),
            phone_number: Set(None),
            gender: Set(None),
            birthday: Set(None),
            role: Set(new_user.role),
            is_banned: Set(false),
            is_verified: Set(new_user.is_verified),
            auth_provider: Set(new_user.auth_provider),
            auth_provider_id: Set(new_user.auth_provider_id),
            ..Default::default()
        };
        self.create(model).await
    }

    pub async fn set_password_hash(&self, id: &Uuid, password_hash: &str) -> DaoResult<()> {
        let password_hash = password_hash.to_string();
        self.update(*id, move |active| {
            active.password_hash = Set(password_hash);
        })
        .await
        .map(|_| ())
    }

    /// Attaches an external identity to an existing account.
    pub async fn link_provider(
        &self,
        id: &Uuid,
        provider: &str,
        provider_id: &str,
    ) -> DaoResult<user::Model> {
        let provider = provider.to_string();
        let provider_id = provider_id.to_string();
        self.update(*id, move |active| {
            active.auth_provider = Set(provider);
            active.auth_provider_id = Set(Some(provider_id));
            active.is_verified = Set(true);
        })
        .await
    }
}
