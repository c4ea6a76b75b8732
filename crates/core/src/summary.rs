//! Income/expense roll-up over categorised transactions.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::money::round2;
use crate::transaction::CategorizedTransaction;

/// Categories whose outflows are movements of money rather than spending.
const NON_EXPENSE_CATEGORIES: &[&str] = &["Income", "Investments", "Transfers"];

const INCOME_CATEGORY: &str = "Income";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategorySummary {
    pub category: String,
    /// `None` on the per-category total row.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subcategory: Option<String>,
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub percentage: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpenseSummary {
    #[serde(with = "rust_decimal::serde::float")]
    pub total_income: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub total_expenses: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub net_savings: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub savings_rate: Decimal,
    pub category_summaries: Vec<CategorySummary>,
}

fn is_expense(tx: &CategorizedTransaction) -> bool {
    tx.amount < Decimal::ZERO && !NON_EXPENSE_CATEGORIES.contains(&tx.category.name.as_str())
}

fn percentage_of(part: Decimal, whole: Decimal) -> Decimal {
    if whole.is_zero() {
        Decimal::ZERO
    } else {
        round2(part / whole * Decimal::ONE_HUNDRED)
    }
}

pub fn summarize(transactions: &[CategorizedTransaction]) -> ExpenseSummary {
    let total_income: Decimal = transactions
        .iter()
        .filter(|t| t.category.name == INCOME_CATEGORY)
        .map(|t| t.amount)
        .sum();

    let total_expenses: Decimal = transactions
        .iter()
        .filter(|t| is_expense(t))
        .map(|t| t.amount)
        .sum::<Decimal>()
        .abs();

    let net_savings = total_income - total_expenses;
    let savings_rate = if total_income > Decimal::ZERO {
        percentage_of(net_savings, total_income)
    } else {
        Decimal::ZERO
    };

    // category -> subcategory -> amount, ordered for a deterministic tie-break.
    let mut grouped: BTreeMap<&str, BTreeMap<&str, Decimal>> = BTreeMap::new();
    for tx in transactions.iter().filter(|t| is_expense(t)) {
        let sub = tx
            .category
            .subcategory
            .as_deref()
            .unwrap_or(crate::CategoryAssignment::FALLBACK_SUBCATEGORY);
        *grouped
            .entry(tx.category.name.as_str())
            .or_default()
            .entry(sub)
            .or_default() += tx.amount.abs();
    }

    let mut category_summaries = Vec::new();
    for (category, subs) in grouped {
        let category_total: Decimal = subs.values().copied().sum();
        category_summaries.push(CategorySummary {
            category: category.to_string(),
            subcategory: None,
            amount: category_total,
            percentage: percentage_of(category_total, total_expenses),
        });
        for (sub, amount) in subs {
            category_summaries.push(CategorySummary {
                category: category.to_string(),
                subcategory: Some(sub.to_string()),
                amount,
                percentage: percentage_of(amount, total_expenses),
            });
        }
    }
    // Stable: a category total stays ahead of an equal-valued subcategory row.
    category_summaries.sort_by(|a, b| b.amount.cmp(&a.amount));

    ExpenseSummary {
        total_income,
        total_expenses,
        net_savings,
        savings_rate,
        category_summaries,
    }
}
