use sea_orm::DatabaseConnection;

use super::{DaoBase, PasswordResetDao, RefreshTokenDao, UserDao};

/// Hands out one DAO per table over a shared connection pool.
#[derive(Clone)]
pub struct DaoContext {
    db: DatabaseConnection,
}

impl DaoContext {
    pub fn new(db: &DatabaseConnection) -> Self {
        Self { db: db.clone() }
    }

    pub fn user(&self) -> UserDao {
        DaoBase::new(&self.db)
    }

    pub fn refresh_token(&self) -> RefreshTokenDao {
        DaoBase::new(&self.db)
    }

    pub fn password_reset(&self) -> PasswordResetDao {
        DaoBase::new(&self.db)
    }
}
