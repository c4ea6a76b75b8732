use ozbooks_core::MoneyError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageError {
    /// A foreign key pointed at a row that does not exist.
    #[error("Referenced record does not exist: {0}")]
    InvalidReference(String),
    #[error("Record already exists: {0}")]
    Conflict(String),
    #[error(transparent)]
    Money(#[from] MoneyError),
    #[error("Stored value is corrupt: {0}")]
    Corrupt(String),
    #[error("Database error: {0}")]
    Database(#[source] sqlx::Error),
}

impl From<sqlx::Error> for StorageError {
    fn from(e: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db) = &e {
            if db.is_foreign_key_violation() {
                return StorageError::InvalidReference(db.message().to_string());
            }
            if db.is_unique_violation() {
                return StorageError::Conflict(db.message().to_string());
            }
        }
        StorageError::Database(e)
    }
}

impl StorageError {
    /// Errors the caller caused, as opposed to failures of the store itself.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            StorageError::InvalidReference(_) | StorageError::Conflict(_) | StorageError::Money(_)
        )
    }
}
