use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use chrono::{Local, NaiveDate};
use ozbooks_core::{decimal_from_f64, round2, AccountId, FrankingCalculator, FrankingResult};
use ozbooks_storage::{get_account, insert_dividend, DividendRecord, NewDividend};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::auth::AuthUser;
use crate::error::AppError;
use crate::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordDividendRequest {
    pub account_id: Option<String>,
    pub security_code: String,
    /// Cash dividend per share.
    pub dividend_amount: f64,
    pub franking_percentage: f64,
    pub shares_held: f64,
    /// Payment date; today when omitted.
    pub date: Option<NaiveDate>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordDividendResponse {
    pub franking_details: FrankingResult,
    pub dividend: DividendRecord,
}

pub async fn record_dividend(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    Json(req): Json<RecordDividendRequest>,
) -> Result<(StatusCode, Json<RecordDividendResponse>), AppError> {
    let security_code = req.security_code.trim().to_uppercase();
    if security_code.is_empty() {
        return Err(AppError::bad_request("securityCode is required"));
    }

    let shares = decimal_from_f64(req.shares_held)?;
    if shares <= Decimal::ZERO {
        return Err(AppError::bad_request("sharesHeld must be greater than zero"));
    }
    let per_share = decimal_from_f64(req.dividend_amount)?;
    let percentage = decimal_from_f64(req.franking_percentage)?;
    let franking = FrankingCalculator::calculate(round2(per_share * shares), percentage)?;

    let account_id = match req.account_id.as_deref().map(str::trim) {
        Some(id) if !id.is_empty() => {
            let id = AccountId::from(id);
            if get_account(&state.pool, &id, &user).await?.is_none() {
                return Err(AppError::not_found(format!("Account {id} was not found")));
            }
            Some(id)
        }
        _ => None,
    };

    let new = NewDividend {
        user_id: user,
        account_id,
        security_code,
        date: req.date.unwrap_or_else(|| Local::now().date_naive()),
        units_held: shares,
        franking,
    };
    let dividend = insert_dividend(&state.pool, &new).await?;

    tracing::info!(
        dividend_id = dividend.id,
        security = %dividend.security_code,
        credit = %franking.franking_credit,
        "dividend recorded"
    );
    Ok((
        StatusCode::CREATED,
        Json(RecordDividendResponse {
            franking_details: franking,
            dividend,
        }),
    ))
}

pub async fn list_dividends(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
) -> Result<Json<Vec<DividendRecord>>, AppError> {
    Ok(Json(ozbooks_storage::list_dividends(&state.pool, &user).await?))
}
