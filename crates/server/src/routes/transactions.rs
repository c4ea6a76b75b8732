use axum::extract::{Path, Query, State};
use axum::Json;
use ozbooks_core::{decimal_from_f64, GstCalculation, GstCalculator, StoredTransaction};
use ozbooks_storage::{get_transaction, update_transaction_gst};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use super::calculators::parse_treatment;
use super::PeriodQuery;
use crate::auth::AuthUser;
use crate::error::AppError;
use crate::AppState;

pub async fn list_transactions(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    Query(period): Query<PeriodQuery>,
) -> Result<Json<Vec<StoredTransaction>>, AppError> {
    let range = period.range()?;
    Ok(Json(
        ozbooks_storage::list_transactions(&state.pool, &user, range).await?,
    ))
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ApplyGstRequest {
    /// GST-inclusive total. Defaults to the magnitude of the stored amount.
    pub amount: Option<f64>,
    #[serde(alias = "gstTreatment")]
    pub treatment: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplyGstResponse {
    pub gst_calculation: GstCalculation,
    pub transaction: StoredTransaction,
}

/// Works out GST for one of the caller's transactions and stores the split on it.
pub async fn apply_gst(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    Path(id): Path<i64>,
    Json(req): Json<ApplyGstRequest>,
) -> Result<Json<ApplyGstResponse>, AppError> {
    let not_found = || AppError::not_found(format!("Transaction {id} not found"));

    let existing = get_transaction(&state.pool, id, &user)
        .await?
        .ok_or_else(not_found)?;

    let treatment = parse_treatment(req.treatment.as_deref())?;
    let total = match req.amount {
        Some(amount) => decimal_from_f64(amount)?,
        None => existing.amount.abs(),
    };
    let gst = GstCalculator::calculate_from_total(total, treatment)?;

    if !update_transaction_gst(&state.pool, id, &user, &gst).await? {
        return Err(not_found());
    }
    let transaction = get_transaction(&state.pool, id, &user)
        .await?
        .ok_or_else(not_found)?;

    tracing::info!(transaction_id = id, %treatment, gst = %gst.gst_amount, "GST applied");
    Ok(Json(ApplyGstResponse {
        gst_calculation: gst,
        transaction,
    }))
}
