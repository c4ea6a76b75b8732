//! Stateless GST and franking calculators.

use axum::extract::Query;
use axum::Json;
use ozbooks_core::{
    decimal_from_f64, FrankingCalculator, FrankingResult, GstCalculation, GstCalculator,
    GstTreatment,
};
use serde::Deserialize;

use crate::error::AppError;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GstCalculateRequest {
    pub amount: f64,
    /// Defaults to GST-inclusive. Parsed case-insensitively.
    #[serde(alias = "gstTreatment")]
    pub treatment: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GstAddRequest {
    pub net_amount: f64,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GstPreviewQuery {
    pub amount: String,
    #[serde(alias = "gstTreatment")]
    pub treatment: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FrankingRequest {
    pub dividend_amount: f64,
    pub franking_percentage: f64,
}

pub(crate) fn parse_treatment(raw: Option<&str>) -> Result<GstTreatment, AppError> {
    match raw {
        Some(t) => Ok(t.parse()?),
        None => Ok(GstTreatment::default()),
    }
}

pub async fn gst_calculate(
    Json(req): Json<GstCalculateRequest>,
) -> Result<Json<GstCalculation>, AppError> {
    let treatment = parse_treatment(req.treatment.as_deref())?;
    let total = decimal_from_f64(req.amount)?;
    Ok(Json(GstCalculator::calculate_from_total(total, treatment)?))
}

pub async fn gst_add(Json(req): Json<GstAddRequest>) -> Result<Json<GstCalculation>, AppError> {
    let net = decimal_from_f64(req.net_amount)?;
    Ok(Json(GstCalculator::add_gst_to_net(net)?))
}

/// Never fails: bad input of any kind previews as zeros.
pub async fn gst_preview(Query(q): Query<GstPreviewQuery>) -> Json<GstCalculation> {
    match parse_treatment(q.treatment.as_deref()) {
        Ok(treatment) => Json(GstCalculator::preview_from_total(&q.amount, treatment)),
        Err(_) => Json(GstCalculation::zero()),
    }
}

pub async fn franking_calculate(
    Json(req): Json<FrankingRequest>,
) -> Result<Json<FrankingResult>, AppError> {
    let dividend = decimal_from_f64(req.dividend_amount)?;
    let percentage = decimal_from_f64(req.franking_percentage)?;
    Ok(Json(FrankingCalculator::calculate(dividend, percentage)?))
}
