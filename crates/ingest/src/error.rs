use ozbooks_core::AccountId;
use ozbooks_storage::StorageError;
use thiserror::Error;

use crate::extract::ExtractError;

#[derive(Debug, Error)]
pub enum IngestError {
    #[error("No documents were uploaded")]
    NoDocuments,
    #[error("Account {0} was not found")]
    UnknownAccount(AccountId),
    #[error(transparent)]
    Extract(#[from] ExtractError),
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error("Extraction task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

impl From<sqlx::Error> for IngestError {
    fn from(e: sqlx::Error) -> Self {
        IngestError::Storage(StorageError::from(e))
    }
}

impl IngestError {
    /// Errors caused by the upload itself rather than by the service.
    pub fn is_client_error(&self) -> bool {
        match self {
            IngestError::NoDocuments | IngestError::UnknownAccount(_) | IngestError::Extract(_) => {
                true
            }
            IngestError::Storage(e) => e.is_client_error(),
            IngestError::Task(_) => false,
        }
    }
}
