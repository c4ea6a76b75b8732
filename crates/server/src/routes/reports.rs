use axum::extract::{Query, State};
use axum::Json;
use ozbooks_core::{summarize, DateRange, ExpenseSummary};
use ozbooks_storage::transactions_for_summary;
use serde::Serialize;
use std::sync::Arc;

use super::PeriodQuery;
use crate::auth::AuthUser;
use crate::error::AppError;
use crate::AppState;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryResponse {
    /// Absent when the summary covers all time.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub period: Option<DateRange>,
    #[serde(flatten)]
    pub summary: ExpenseSummary,
}

pub async fn summary(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    Query(period): Query<PeriodQuery>,
) -> Result<Json<SummaryResponse>, AppError> {
    let range = period.range()?;
    let transactions = transactions_for_summary(&state.pool, &user, range).await?;
    Ok(Json(SummaryResponse {
        period: range,
        summary: summarize(&transactions),
    }))
}

#[cfg(test)]
mod tests {
    use crate::routes::test_support::*;
    use crate::test_support::test_app;
    use crate::AppState;
    use axum::http::StatusCode;
    use serde_json::Value;
    use std::sync::Arc;

    const STATEMENT: &str = "\
05/08/2023 Salary Aris Zinc 5000.00
06/08/2023 WOOLWORTHS 1234 SYDNEY (200.00)
07/08/2023 Mortgage repayment 1800.00-
08/08/2023 Transfer to savings (1000.00)
01/02/2024 Salary Aris Zinc 5000.00
";

    async fn upload(state: &Arc<AppState>, account: &str) {
        let req = multipart(
            USER,
            &[("accountId", account)],
            &[("s.txt", "text/plain", STATEMENT)],
        );
        let (status, json) = send(state, req).await;
        assert_eq!(status, StatusCode::OK, "{json}");
        assert_eq!(json["count"], 5);
    }

    fn category_amount(summary: &Value, category: &str, subcategory: &str) -> Option<f64> {
        summary["categorySummaries"]
            .as_array()?
            .iter()
            .find(|c| c["category"] == category && c["subcategory"] == subcategory)
            .and_then(|c| c["amount"].as_f64())
    }

    #[tokio::test]
    async fn summarises_uploaded_statements() {
        let app = test_app().await;
        let account = create_account(&app.state, USER).await;
        upload(&app.state, &account).await;

        let (status, all) = send(&app.state, get_as("/api/reports/summary", Some(USER))).await;
        assert_eq!(status, StatusCode::OK, "{all}");
        assert!(all.get("period").is_none());
        assert_eq!(all["totalIncome"], 10000.0);
        // Moving money into savings is not spending.
        assert_eq!(all["totalExpenses"], 2000.0);
        assert_eq!(all["netSavings"], 8000.0);
        assert_eq!(category_amount(&all, "Housing", "Mortgage"), Some(1800.0));
        assert_eq!(category_amount(&all, "Food", "Groceries"), Some(200.0));

        let (_, q1) = send(
            &app.state,
            get_as("/api/reports/summary?fy=2024&quarter=1", Some(USER)),
        )
        .await;
        assert_eq!(q1["period"]["start"], "2023-07-01");
        assert_eq!(q1["totalIncome"], 5000.0);
    }

    #[tokio::test]
    async fn summary_is_private_and_empty_for_new_users() {
        let app = test_app().await;
        let account = create_account(&app.state, USER).await;
        upload(&app.state, &account).await;

        let (status, json) = send(&app.state, get_as("/api/reports/summary", Some("user-2"))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["totalIncome"], 0.0);
        assert!(json["categorySummaries"].as_array().unwrap().is_empty());

        let (status, _) = send(&app.state, get_as("/api/reports/summary", None)).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }
}
