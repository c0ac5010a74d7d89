use chrono::{DateTime, FixedOffset, Utc};
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set, sea_query::Expr,
};
use uuid::Uuid;

use super::{DaoBase, DaoLayerError, DaoResult};
use crate::db::entities::refresh_token::{self, Entity as RefreshToken};

/// Persisted record of every refresh token handed out.
#[derive(Clone)]
pub struct RefreshTokenDao {
    db: DatabaseConnection,
}

impl DaoBase for RefreshTokenDao {
    type Entity = RefreshToken;

    fn new(db: &DatabaseConnection) -> Self {
        Self { db: db.clone() }
    }

    fn db(&self) -> &DatabaseConnection {
        &self.db
    }
}

impl RefreshTokenDao {
    pub async fn create_refresh_token(
        &self,
        token: &str,
        user_id: &Uuid,
        expires_at: DateTime<FixedOffset>,
    ) -> DaoResult<refresh_token::Model> {
        let model = refresh_token::ActiveModel {
            token: Set(token.to_string()),
            user_id: Set(*user_id),
            expires_at: Set(expires_at),
            revoked: Set(false),
            ..Default::default()
        };
        self.create(model).await
    }

    pub async fn find_by_token(&self, token: &str) -> DaoResult<Option<refresh_token::Model>> {
        let token = token.to_string();
        self.find_one(move |query| query.filter(refresh_token::Column::Token.eq(token)))
            .await
    }

    /// Present, not revoked and not yet expired.
    pub async fn is_valid(&self, token: &str) -> DaoResult<bool> {
        let now = Utc::now().fixed_offset();
        Ok(self
            .find_by_token(token)
            .await?
            .is_some_and(|record| !record.revoked && now < record.expires_at))
    }

    /// Flips one live record to revoked. Returns `false` when the token was
    /// never issued or is already revoked.
    pub async fn revoke_token(&self, token: &str) -> DaoResult<bool> {
        let result = RefreshToken::update_many()
            .col_expr(refresh_token::Column::Revoked, Expr::value(true))
            .col_expr(
                refresh_token::Column::UpdatedAt,
                Expr::value(Utc::now().fixed_offset()),
            )
            .filter(refresh_token::Column::Token.eq(token))
            .filter(refresh_token::Column::Revoked.eq(false))
            .exec(&self.db)
            .await
            .map_err(DaoLayerError::Db)?;
        Ok(result.rows_affected > 0)
    }

    /// Revokes every live token of one user, returning how many flipped.
    pub async fn revoke_all_for_user(&self, user_id: &Uuid) -> DaoResult<u64> {
        let result = RefreshToken::update_many()
            .col_expr(refresh_token::Column::Revoked, Expr::value(true))
            .col_expr(
                refresh_token::Column::UpdatedAt,
                Expr::value(Utc::now().fixed_offset()),
            )
            .filter(refresh_token::Column::UserId.eq(*user_id))
            .filter(refresh_token::Column::Revoked.eq(false))
            .exec(&self.db)
            .await
            .map_err(DaoLayerError::Db)?;
        Ok(result.rows_affected)
    }

    pub async fn purge_expired(&self) -> DaoResult<u64> {
        let result = RefreshToken::delete_many()
            .filter(refresh_token::Column::ExpiresAt.lt(Utc::now().fixed_offset()))
            .exec(&self.db)
            .await
            .map_err(DaoLayerError::Db)?;
        Ok(result.rows_affected)
    }
}
