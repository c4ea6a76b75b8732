use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::{Json, Router};
use ozbooks_core::{DateRange, FiscalYear, Quarter};
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;

use crate::error::AppError;
use crate::AppState;

pub mod accounts;
pub mod calculators;
pub mod investments;
pub mod reports;
pub mod statements;
pub mod transactions;

pub fn build_router(state: Arc<AppState>) -> Router {
    let upload_limit = state.config.upload_body_limit();

    // Multipart uploads get their own, larger limit; everything else keeps axum's default.
    let uploads = Router::new()
        .route("/statements/upload", post(statements::upload))
        .layer(DefaultBodyLimit::disable())
        .layer(RequestBodyLimitLayer::new(upload_limit));

    let api = Router::new()
        .route(
            "/accounts",
            get(accounts::list_accounts).post(accounts::create_account),
        )
        .route("/account-types", get(accounts::list_account_types))
        .route("/categories", get(accounts::list_categories))
        .route("/transactions", get(transactions::list_transactions))
        .route("/transactions/{id}/gst", post(transactions::apply_gst))
        .route("/gst/calculate", post(calculators::gst_calculate))
        .route("/gst/add", post(calculators::gst_add))
        .route("/gst/preview", get(calculators::gst_preview))
        .route("/franking/calculate", post(calculators::franking_calculate))
        .route(
            "/investments/dividend",
            get(investments::list_dividends).post(investments::record_dividend),
        )
        .route("/reports/summary", get(reports::summary))
        .merge(uploads);

    Router::new()
        .route("/health", get(health))
        .nest("/api", api)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

/// `?fy=2024&quarter=3` style period filter shared by listing and reporting routes.
#[derive(Debug, Default, Deserialize)]
pub struct PeriodQuery {
    pub fy: Option<i32>,
    pub quarter: Option<u8>,
}

impl PeriodQuery {
    pub fn range(&self) -> Result<Option<DateRange>, AppError> {
        let Some(fy) = self.fy else {
            return match self.quarter {
                Some(_) => Err(AppError::bad_request("quarter requires fy")),
                None => Ok(None),
            };
        };

        let year = (1900..=9999)
            .contains(&fy)
            .then(|| FiscalYear::new(fy))
            .flatten()
            .ok_or_else(|| AppError::bad_request(format!("Invalid financial year {fy}")))?;

        match self.quarter {
            None => Ok(Some(year.range())),
            Some(q) => {
                let quarter = Quarter::new(q)
                    .ok_or_else(|| AppError::bad_request("quarter must be 1 to 4"))?;
                year.quarter(quarter)
                    .map(Some)
                    .ok_or_else(|| AppError::bad_request(format!("Invalid quarter {q}")))
            }
        }
    }
}
