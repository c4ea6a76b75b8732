use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::account::AccountId;
use super::category::{CategoryAssignment, CategoryId};

/// A statement line normalised into typed values.
/// Positive amounts are credits (income), negative amounts are debits (expenses).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedTransaction {
    pub date: NaiveDate,
    pub description: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
}

impl ParsedTransaction {
    pub fn new(date: NaiveDate, description: &str, amount: Decimal) -> Self {
        ParsedTransaction {
            date,
            description: description.trim().to_string(),
            amount,
        }
    }

    pub fn is_credit(&self) -> bool {
        self.amount > Decimal::ZERO
    }

    pub fn is_debit(&self) -> bool {
        self.amount < Decimal::ZERO
    }
}

/// A parsed transaction filed under a persisted category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategorizedTransaction {
    pub date: NaiveDate,
    pub description: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
    pub category_id: CategoryId,
    pub category: CategoryAssignment,
}

impl CategorizedTransaction {
    pub fn new(tx: ParsedTransaction, category_id: CategoryId, category: CategoryAssignment) -> Self {
        CategorizedTransaction {
            date: tx.date,
            description: tx.description,
            amount: tx.amount,
            category_id,
            category,
        }
    }
}

/// A transaction row as stored, including any GST figures written back to it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredTransaction {
    pub id: i64,
    pub account_id: AccountId,
    pub date: NaiveDate,
    pub description: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
    pub category_id: Option<CategoryId>,
    pub category: Option<CategoryAssignment>,
    #[serde(with = "rust_decimal::serde::float_option")]
    pub gst_amount: Option<Decimal>,
    #[serde(with = "rust_decimal::serde::float_option")]
    pub net_amount: Option<Decimal>,
}
