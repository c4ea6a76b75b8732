use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use ozbooks_core::{BankingError, FrankingError, GstError, MoneyError};
use ozbooks_ingest::IngestError;
use ozbooks_storage::StorageError;
use serde::Serialize;
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    BadRequest(String),
    #[error("User not authenticated")]
    Unauthorized,
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Conflict(String),
    #[error("{0}")]
    PayloadTooLarge(String),
    #[error("{0}")]
    UnsupportedMediaType(String),
    /// Never shown to the client; logged under an error id instead.
    #[error("{0}")]
    Internal(String),
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    message: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    error_id: Option<String>,
}

impl AppError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        AppError::BadRequest(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        AppError::NotFound(message.into())
    }

    pub fn internal(err: impl std::fmt::Display) -> Self {
        AppError::Internal(err.to_string())
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthorized => StatusCode::UNAUTHORIZED,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            AppError::UnsupportedMediaType(_) => StatusCode::UNSUPPORTED_MEDIA_TYPE,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        if let AppError::Internal(detail) = &self {
            let error_id = Uuid::new_v4().to_string();
            tracing::error!(error_id = %error_id, error = %detail, "request failed");
            let body = ErrorBody {
                message: "Internal server error",
                error_id: Some(error_id),
            };
            return (status, Json(body)).into_response();
        }

        tracing::debug!(status = status.as_u16(), error = %self, "request rejected");
        let message = self.to_string();
        let body = ErrorBody {
            message: &message,
            error_id: None,
        };
        (status, Json(body)).into_response()
    }
}

impl From<GstError> for AppError {
    fn from(e: GstError) -> Self {
        AppError::BadRequest(e.to_string())
    }
}

impl From<FrankingError> for AppError {
    fn from(e: FrankingError) -> Self {
        AppError::BadRequest(e.to_string())
    }
}

impl From<MoneyError> for AppError {
    fn from(e: MoneyError) -> Self {
        AppError::BadRequest(e.to_string())
    }
}

impl From<BankingError> for AppError {
    fn from(e: BankingError) -> Self {
        AppError::BadRequest(e.to_string())
    }
}

impl From<StorageError> for AppError {
    fn from(e: StorageError) -> Self {
        match e {
            StorageError::InvalidReference(_) | StorageError::Money(_) => {
                AppError::BadRequest(e.to_string())
            }
            StorageError::Conflict(_) => AppError::Conflict(e.to_string()),
            StorageError::Corrupt(_) | StorageError::Database(_) => AppError::internal(e),
        }
    }
}

impl From<IngestError> for AppError {
    fn from(e: IngestError) -> Self {
        match e {
            IngestError::NoDocuments | IngestError::Extract(_) => AppError::BadRequest(e.to_string()),
            IngestError::UnknownAccount(_) => AppError::NotFound(e.to_string()),
            IngestError::Storage(s) => s.into(),
            IngestError::Task(_) => AppError::internal(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;
    use rust_decimal::Decimal;

    async fn body_json(resp: Response) -> serde_json::Value {
        let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn validation_errors_carry_their_message() {
        let resp = AppError::from(FrankingError::PercentageAboveMaximum(Decimal::from(101))).into_response();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let json = body_json(resp).await;
        assert!(json["message"].as_str().unwrap().contains("100"));
        assert!(json.get("error_id").is_none());
    }

    #[tokio::test]
    async fn internal_errors_are_opaque_with_an_id() {
        let resp = AppError::internal("disk on fire").into_response();
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let json = body_json(resp).await;
        assert_eq!(json["message"], "Internal server error");
        let id = json["error_id"].as_str().unwrap();
        assert!(Uuid::parse_str(id).is_ok());
    }

    #[test]
    fn storage_errors_map_to_statuses() {
        assert_eq!(
            AppError::from(StorageError::InvalidReference("fk".into())).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::from(StorageError::Conflict("dup".into())).status(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            AppError::from(StorageError::Corrupt("x".into())).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn unknown_account_is_not_found() {
        let e = IngestError::UnknownAccount(ozbooks_core::AccountId::from("a"));
        assert_eq!(AppError::from(e).status(), StatusCode::NOT_FOUND);
    }
}
