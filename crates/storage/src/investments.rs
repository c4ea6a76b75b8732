use chrono::NaiveDate;
use ozbooks_core::{AccountId, FrankingResult, Money, UserId};
use rust_decimal::Decimal;
use serde::Serialize;
use std::str::FromStr;

use crate::db::DbPool;
use crate::error::StorageError;

#[derive(Debug, Clone)]
pub struct NewDividend {
    pub user_id: UserId,
    pub account_id: Option<AccountId>,
    pub security_code: String,
    pub date: NaiveDate,
    pub units_held: Decimal,
    pub franking: FrankingResult,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DividendRecord {
    pub id: i64,
    pub user_id: UserId,
    pub account_id: Option<AccountId>,
    pub security_code: String,
    pub date: NaiveDate,
    #[serde(with = "rust_decimal::serde::float")]
    pub units_held: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub cash_dividend: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub franking_credit: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub franking_percentage: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub grossed_up_dividend: Decimal,
}

type DividendRow = (
    i64,
    String,
    Option<String>,
    String,
    NaiveDate,
    String,
    i64,
    i64,
    String,
    i64,
);

fn parse_stored_decimal(s: &str) -> Result<Decimal, StorageError> {
    Decimal::from_str(s).map_err(|e| StorageError::Corrupt(format!("decimal '{s}': {e}")))
}

fn dividend_from_row(r: DividendRow) -> Result<DividendRecord, StorageError> {
    Ok(DividendRecord {
        id: r.0,
        user_id: UserId(r.1),
        account_id: r.2.map(AccountId),
        security_code: r.3,
        date: r.4,
        units_held: parse_stored_decimal(&r.5)?,
        cash_dividend: Money::from_cents(r.6).as_decimal(),
        franking_credit: Money::from_cents(r.7).as_decimal(),
        franking_percentage: parse_stored_decimal(&r.8)?,
        grossed_up_dividend: Money::from_cents(r.9).as_decimal(),
    })
}

/// Records a dividend with the franking figures already worked out for it.
pub async fn insert_dividend(
    pool: &DbPool,
    new: &NewDividend,
) -> Result<DividendRecord, StorageError> {
    let f = &new.franking;
    let id = sqlx::query(
        "INSERT INTO dividends (user_id, account_id, security_code, date, units_held, \
         cash_dividend_cents, franking_credit_cents, franking_percentage, grossed_up_dividend_cents) \
         VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(new.user_id.0.as_str())
    .bind(new.account_id.as_ref().map(|a| a.0.as_str()))
    .bind(&new.security_code)
    .bind(new.date)
    .bind(new.units_held.to_string())
    .bind(Money::from_decimal(f.cash_dividend).to_cents()?)
    .bind(Money::from_decimal(f.franking_credit).to_cents()?)
    .bind(f.franking_percentage.to_string())
    .bind(Money::from_decimal(f.grossed_up_dividend).to_cents()?)
    .execute(pool)
    .await?
    .last_insert_rowid();

    tracing::info!(id, security = %new.security_code, user = %new.user_id, "dividend recorded");

    Ok(DividendRecord {
        id,
        user_id: new.user_id.clone(),
        account_id: new.account_id.clone(),
        security_code: new.security_code.clone(),
        date: new.date,
        units_held: new.units_held,
        cash_dividend: f.cash_dividend,
        franking_credit: f.franking_credit,
        franking_percentage: f.franking_percentage,
        grossed_up_dividend: f.grossed_up_dividend,
    })
}

pub async fn list_dividends(pool: &DbPool, user: &UserId) -> Result<Vec<DividendRecord>, StorageError> {
    let rows = sqlx::query_as::<_, DividendRow>(
        "SELECT id, user_id, account_id, security_code, date, units_held, cash_dividend_cents, \
         franking_credit_cents, franking_percentage, grossed_up_dividend_cents \
         FROM dividends WHERE user_id = ? ORDER BY date, id",
    )
    .bind(user.0.as_str())
    .fetch_all(pool)
    .await?;

    rows.into_iter().map(dividend_from_row).collect()
}
