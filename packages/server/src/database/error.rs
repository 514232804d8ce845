use std::time::Duration;

use sea_orm::{DbErr, SqlErr};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Db(DbErr),

    #[error("Unique constraint violated: {0}")]
    UniqueViolation(String),

    #[error("Query mixes `?` and `$n` placeholders: {sql}")]
    MixedPlaceholders { sql: String },

    #[error("Query expects {expected} bound values but {supplied} were supplied")]
    PlaceholderMismatch { expected: usize, supplied: usize },

    #[error("Query did not finish within {0:?}")]
    Timeout(Duration),

    #[error("Unsupported database backend: {0}")]
    UnsupportedBackend(String),

    #[error("Insert did not report a generated id")]
    MissingInsertId,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl StoreError {
    pub fn is_unique_violation(&self) -> bool {
        matches!(self, StoreError::UniqueViolation(_))
    }
}

impl From<DbErr> for StoreError {
    fn from(err: DbErr) -> Self {
        match err.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(detail)) => StoreError::UniqueViolation(detail),
            _ => StoreError::Db(err),
        }
    }
}
