use chrono::{DateTime, FixedOffset, Utc};
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set};
use uuid::Uuid;

use super::{DaoBase, DaoLayerError, DaoResult};
use crate::db::entities::password_reset_token::{self, Entity as PasswordResetToken};

#[derive(Clone)]
pub struct PasswordResetDao {
    db: DatabaseConnection,
}

impl DaoBase for PasswordResetDao {
    type Entity = PasswordResetToken;

    fn new(db: &DatabaseConnection) -> Self {
        Self { db: db.clone() }
    }

    fn db(&self) -> &DatabaseConnection {
        &self.db
    }
}

impl PasswordResetDao {
    /// Replaces any outstanding reset token of the user with a fresh one.
    pub async fn create_reset_token(
        &self,
        user_id: &Uuid,
        expires_at: DateTime<FixedOffset>,
    ) -> DaoResult<password_reset_token::Model> {
        PasswordResetToken::delete_many()
            .filter(password_reset_token::Column::UserId.eq(*user_id))
            .exec(&self.db)
            .await
            .map_err(DaoLayerError::Db)?;

        let model = password_reset_token::ActiveModel {
            token: Set(Uuid::new_v4().to_string()),
            user_id: Set(*user_id),
            expires_at: Set(expires_at),
            ..Default::default()
        };
        self.create(model).await
    }

    pub async fn find_by_token(
        &self,
        token: &str,
    ) -> DaoResult<Option<password_reset_token::Model>> {
        let token = token.to_string();
        self.find_one(move |query| query.filter(password_reset_token::Column::Token.eq(token)))
            .await
    }

    pub async fn purge_expired(&self) -> DaoResult<u64> {
        let result = PasswordResetToken::delete_many()
            .filter(password_reset_token::Column::ExpiresAt.lt(Utc::now().fixed_offset()))
            .exec(&self.db)
            .await
            .map_err(DaoLayerError::Db)?;
        Ok(result.rows_affected)
    }
}
