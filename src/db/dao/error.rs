use sea_orm::{DbErr, SqlErr};
use uuid::Uuid;

#[derive(Debug, thiserror::Error)]
pub enum DaoLayerError {
    #[error("Database error: {0}")]
    Db(#[from] DbErr),
    #[error("{entity} not found (id={id})")]
    NotFound { entity: &'static str, id: Uuid },
    #[error("{entity} already holds this value")]
    Duplicate { entity: &'static str },
}

impl DaoLayerError {
    /// Classifies a failed insert or update. Unique constraint violations
    /// become [`DaoLayerError::Duplicate`] so callers can answer with a conflict.
    pub fn from_write(entity: &'static str, err: DbErr) -> Self {
        match err.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(_)) => Self::Duplicate { entity },
            _ => Self::Db(err),
        }
    }
}

pub type DaoResult<T> = Result<T, DaoLayerError>;
