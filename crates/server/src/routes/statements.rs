use axum::extract::multipart::{Field, MultipartError};
use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use axum::Json;
use ozbooks_core::AccountId;
use ozbooks_import::DEFAULT_BANK;
use ozbooks_ingest::{Document, IngestReport, UploadBatch};
use serde::Serialize;
use std::sync::Arc;

use crate::auth::AuthUser;
use crate::error::AppError;
use crate::AppState;

#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub message: String,
    #[serde(flatten)]
    pub report: IngestReport,
}

fn multipart_error(e: MultipartError) -> AppError {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge(e.body_text())
    } else {
        AppError::bad_request(e.body_text())
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Streams one file field, stopping as soon as it passes `limit` bytes.
async fn read_file(field: &mut Field<'_>, name: &str, limit: usize) -> Result<Vec<u8>, AppError> {
    let mut bytes = Vec::new();
    while let Some(chunk) = field.chunk().await.map_err(multipart_error)? {
        if bytes.len() + chunk.len() > limit {
            return Err(AppError::PayloadTooLarge(format!(
                "File {name} exceeds the {limit} byte limit"
            )));
        }
        bytes.extend_from_slice(&chunk);
    }
    Ok(bytes)
}

/// Multipart form: `accountId`, optional `bank`, and one or more `files`.
pub async fn upload(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>, AppError> {
    let config = &state.config;
    let mut account_id = None;
    let mut bank = None;
    let mut documents = Vec::new();

    while let Some(mut field) = multipart.next_field().await.map_err(multipart_error)? {
        let field_name = field.name().unwrap_or_default().to_string();
        match field_name.as_str() {
            "accountId" => account_id = Some(field.text().await.map_err(multipart_error)?),
            "bank" => bank = Some(field.text().await.map_err(multipart_error)?),
            "files" | "file" => {
                if documents.len() >= config.max_files_per_upload {
                    return Err(AppError::bad_request(format!(
                        "At most {} files can be uploaded at once",
                        config.max_files_per_upload
                    )));
                }

                let name = field.file_name().unwrap_or("statement").to_string();
                let content_type = field.content_type().map(str::to_string);
                if let Some(ct) = content_type {
                    if !config.is_allowed_content_type(&ct) {
                        return Err(AppError::UnsupportedMediaType(format!(
                            "File {name} has unsupported content type {ct}"
                        )));
                    }
                }

                let bytes = read_file(&mut field, &name, config.max_file_bytes).await?;
                documents.push(Document { name, bytes });
            }
            other => tracing::debug!(field = other, "ignoring multipart field"),
        }
    }

    let account_id =
        non_blank(account_id).ok_or_else(|| AppError::bad_request("accountId is required"))?;
    if documents.is_empty() {
        return Err(AppError::bad_request("No files uploaded"));
    }
    let bank = non_blank(bank).unwrap_or_else(|| DEFAULT_BANK.to_string());

    tracing::info!(
        account_id = %account_id,
        bank = %bank,
        files = documents.len(),
        "statement upload"
    );
    let report = state
        .pipeline
        .ingest(UploadBatch {
            user_id: user,
            account_id: AccountId(account_id),
            bank,
            documents,
        })
        .await?;

    Ok(Json(UploadResponse {
        message: upload_message(&report),
        report,
    }))
}

fn upload_message(report: &IngestReport) -> String {
    let failed = report.files.iter().filter(|f| !f.is_imported()).count();
    if failed == 0 {
        format!(
            "Successfully uploaded and processed {} transactions.",
            report.count
        )
    } else {
        format!(
            "Processed {} transactions; {} of {} files failed.",
            report.count,
            failed,
            report.files.len()
        )
    }
}

#[cfg(test)]
mod tests {
    use crate::config::Config;
    use crate::routes::test_support::*;
    use crate::test_support::{test_app, test_app_with};
    use axum::http::StatusCode;

    const COMMBANK: &str = "\
Date Transaction Details Amount Balance
05 Jan Salary Aris Zinc 8,490.02
06 Jan WOOLWORTHS 1234 SYDNEY (54.20)
";

    const DEFAULT_FORMAT: &str = "\
12/03/2024 COLES 0456 MELBOURNE (82.15)
13/03/2024 Mystery merchant 19.99-
";

    #[tokio::test]
    async fn imports_and_categorises_a_statement() {
        let app = test_app().await;
        let account = create_account(&app.state, USER).await;

        let (status, json) = send(
            &app.state,
            multipart(
                USER,
                &[("accountId", account.as_str())],
                &[("march.txt", "text/plain", DEFAULT_FORMAT)],
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK, "{json}");
        assert_eq!(
            json["message"],
            "Successfully uploaded and processed 2 transactions."
        );
        assert_eq!(json["count"], 2);
        assert_eq!(json["files"][0]["status"], "imported");
        assert_eq!(json["files"][0]["sha256"].as_str().unwrap().len(), 64);

        let txs = json["transactions"].as_array().unwrap();
        assert_eq!(txs[0]["category"]["name"], "Food");
        assert_eq!(txs[0]["amount"], -82.15);
        assert_eq!(txs[1]["category"]["name"], "Other");
        assert_eq!(txs[1]["category"]["subcategory"], "Uncategorized");
        assert_eq!(txs[1]["amount"], -19.99);

        let (_, stored) = send(&app.state, get_as("/api/transactions", Some(USER))).await;
        assert_eq!(stored.as_array().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn bank_field_selects_the_format() {
        let app = test_app().await;
        let account = create_account(&app.state, USER).await;

        let (status, json) = send(
            &app.state,
            multipart(
                USER,
                &[("accountId", account.as_str()), ("bank", "CBA")],
                &[("jan.txt", "text/plain", COMMBANK)],
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK, "{json}");
        assert_eq!(json["count"], 2);
        assert_eq!(json["transactions"][0]["amount"], 8490.02);
        assert_eq!(json["transactions"][0]["category"]["name"], "Income");
    }

    #[tokio::test]
    async fn one_bad_file_does_not_sink_the_batch() {
        let app = test_app().await;
        let account = create_account(&app.state, USER).await;

        let (status, json) = send(
            &app.state,
            multipart(
                USER,
                &[("accountId", account.as_str())],
                &[
                    ("empty.txt", "text/plain", ""),
                    ("march.txt", "text/plain", DEFAULT_FORMAT),
                ],
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK, "{json}");
        assert_eq!(json["count"], 2);
        assert_eq!(json["message"], "Processed 2 transactions; 1 of 2 files failed.");
        assert_eq!(json["files"][0]["status"], "failed");
        assert!(json["files"][0]["error_id"].is_string());
        assert_eq!(json["files"][1]["status"], "imported");
    }

    #[tokio::test]
    async fn all_files_failing_is_not_reported_as_success() {
        let app = test_app().await;
        let account = create_account(&app.state, USER).await;

        let (status, json) = send(
            &app.state,
            multipart(
                USER,
                &[("accountId", account.as_str())],
                &[("empty.txt", "text/plain", ""), ("blank.txt", "text/plain", "")],
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK, "{json}");
        assert_eq!(json["count"], 0);
        assert_eq!(json["message"], "Processed 0 transactions; 2 of 2 files failed.");
    }

    #[tokio::test]
    async fn missing_account_or_files_are_bad_requests() {
        let app = test_app().await;
        let account = create_account(&app.state, USER).await;

        let (status, json) = send(
            &app.state,
            multipart(USER, &[], &[("march.txt", "text/plain", DEFAULT_FORMAT)]),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["message"], "accountId is required");

        let (status, json) = send(
            &app.state,
            multipart(USER, &[("accountId", account.as_str())], &[]),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["message"], "No files uploaded");
    }

    #[tokio::test]
    async fn foreign_account_is_not_found() {
        let app = test_app().await;
        let account = create_account(&app.state, "user-2").await;

        let (status, _) = send(
            &app.state,
            multipart(
                USER,
                &[("accountId", account.as_str())],
                &[("march.txt", "text/plain", DEFAULT_FORMAT)],
            ),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (_, stored) = send(&app.state, get_as("/api/transactions", Some("user-2"))).await;
        assert!(stored.as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn enforces_content_type_and_size() {
        let app = test_app_with(Config {
            max_file_bytes: 32,
            ..Config::default()
        })
        .await;
        let account = create_account(&app.state, USER).await;

        let (status, _) = send(
            &app.state,
            multipart(
                USER,
                &[("accountId", account.as_str())],
                &[("photo.png", "image/png", "not a statement")],
            ),
        )
        .await;
        assert_eq!(status, StatusCode::UNSUPPORTED_MEDIA_TYPE);

        let (status, json) = send(
            &app.state,
            multipart(
                USER,
                &[("accountId", account.as_str())],
                &[("march.txt", "text/plain", DEFAULT_FORMAT)],
            ),
        )
        .await;
        assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
        assert!(json["message"].as_str().unwrap().contains("march.txt"));
    }

    #[tokio::test]
    async fn anonymous_upload_is_unauthorized() {
        let app = test_app().await;
        let mut req = multipart(USER, &[("accountId", "a")], &[("a.txt", "text/plain", "x")]);
        req.headers_mut().remove(crate::auth::USER_HEADER);
        let (status, _) = send(&app.state, req).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }
}
