use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use ozbooks_core::banking::{validate_account_number, validate_bsb};
use ozbooks_core::{Account, Category};
use ozbooks_storage::{NewAccount, StorageError};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::auth::AuthUser;
use crate::error::AppError;
use crate::AppState;

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CreateAccountRequest {
    pub name: String,
    pub account_type: String,
    pub bsb: Option<String>,
    pub account_number: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct AccountTypeView {
    pub code: String,
    pub name: String,
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

pub async fn create_account(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    Json(req): Json<CreateAccountRequest>,
) -> Result<(StatusCode, Json<Account>), AppError> {
    let name = req.name.trim();
    let account_type = req.account_type.trim();
    if name.is_empty() || account_type.is_empty() {
        return Err(AppError::bad_request("Account type and name are required"));
    }

    let bsb = non_blank(req.bsb);
    let institution = bsb.as_deref().map(validate_bsb).transpose()?;
    let account_number = non_blank(req.account_number)
        .as_deref()
        .map(validate_account_number)
        .transpose()?;

    let new = NewAccount {
        user_id: user,
        name: name.to_string(),
        account_type: account_type.to_string(),
        bsb,
        account_number,
        institution: institution.map(str::to_string),
    };

    let account = ozbooks_storage::create_account(&state.pool, &new)
        .await
        .map_err(|e| match e {
            StorageError::InvalidReference(_) => {
                AppError::bad_request(format!("Unknown account type '{account_type}'"))
            }
            other => other.into(),
        })?;

    Ok((StatusCode::CREATED, Json(account)))
}

pub async fn list_accounts(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
) -> Result<Json<Vec<Account>>, AppError> {
    Ok(Json(ozbooks_storage::list_accounts(&state.pool, &user).await?))
}

pub async fn list_account_types(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<AccountTypeView>>, AppError> {
    let types = ozbooks_storage::get_account_types(&state.pool).await?;
    Ok(Json(
        types
            .into_iter()
            .map(|(code, name)| AccountTypeView { code, name })
            .collect(),
    ))
}

/// System categories plus the caller's own.
pub async fn list_categories(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
) -> Result<Json<Vec<Category>>, AppError> {
    Ok(Json(ozbooks_storage::list_categories(&state.pool, &user).await?))
}

#[cfg(test)]
mod tests {
    use crate::routes::test_support::*;
    use crate::test_support::test_app;
    use axum::http::StatusCode;
    use serde_json::json;

    #[tokio::test]
    async fn creates_and_lists_accounts() {
        let app = test_app().await;
        let (status, created) = send(
            &app.state,
            post_json(
                "/api/accounts",
                Some(USER),
                json!({
                    "name": "Everyday",
                    "accountType": "transaction",
                    "bsb": "062-000",
                    "accountNumber": "1234 5678"
                }),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED, "{created}");
        assert_eq!(created["institution"], "Commonwealth Bank");
        assert_eq!(created["accountNumber"], "12345678");
        assert_eq!(created["userId"], USER);

        let (status, list) = send(&app.state, get_as("/api/accounts", Some(USER))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(list.as_array().unwrap().len(), 1);
        assert_eq!(list[0]["id"], created["id"]);

        let (_, other) = send(&app.state, get_as("/api/accounts", Some("user-2"))).await;
        assert!(other.as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn anonymous_requests_are_rejected() {
        let app = test_app().await;
        let (status, json) = send(
            &app.state,
            post_json(
                "/api/accounts",
                None,
                json!({ "name": "x", "accountType": "transaction" }),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(json["message"], "User not authenticated");
    }

    #[tokio::test]
    async fn missing_fields_are_a_bad_request() {
        let app = test_app().await;
        let (status, json) = send(
            &app.state,
            post_json("/api/accounts", Some(USER), json!({ "name": "x" })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["message"], "Account type and name are required");
    }

    #[tokio::test]
    async fn unknown_account_type_is_a_bad_request() {
        let app = test_app().await;
        let (status, json) = send(
            &app.state,
            post_json(
                "/api/accounts",
                Some(USER),
                json!({ "name": "x", "accountType": "yacht" }),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["message"], "Unknown account type 'yacht'");
    }

    #[tokio::test]
    async fn bad_bsb_and_account_number_are_rejected() {
        let app = test_app().await;
        for (body, message) in [
            (
                json!({ "name": "x", "accountType": "savings", "bsb": "062000" }),
                "BSB must be in format XXX-XXX",
            ),
            (
                json!({ "name": "x", "accountType": "savings", "bsb": "999-999" }),
                "BSB not recognized",
            ),
            (
                json!({ "name": "x", "accountType": "savings", "accountNumber": "12ab" }),
                "Account number must be 4-10 digits",
            ),
        ] {
            let (status, json) =
                send(&app.state, post_json("/api/accounts", Some(USER), body)).await;
            assert_eq!(status, StatusCode::BAD_REQUEST);
            assert_eq!(json["message"], message);
        }
    }

    #[tokio::test]
    async fn account_types_and_categories_are_listed() {
        let app = test_app().await;
        let (status, types) = send(&app.state, get_as("/api/account-types", None)).await;
        assert_eq!(status, StatusCode::OK);
        assert!(types
            .as_array()
            .unwrap()
            .iter()
            .any(|t| t["code"] == "transaction"));

        let (status, cats) = send(&app.state, get_as("/api/categories", Some(USER))).await;
        assert_eq!(status, StatusCode::OK);
        assert!(cats
            .as_array()
            .unwrap()
            .iter()
            .any(|c| c["name"] == "Other" && c["isSystem"] == true));
    }
}
