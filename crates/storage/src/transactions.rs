use chrono::NaiveDate;
use ozbooks_core::{
    AccountId, CategorizedTransaction, CategoryAssignment, CategoryId, DateRange, GstCalculation,
    Money, StoredTransaction, UserId,
};
use sqlx::SqliteExecutor;

use crate::db::DbPool;
use crate::error::StorageError;

/// A categorised transaction on its way into an account.
#[derive(Debug, Clone, Copy)]
pub struct NewTransaction<'a> {
    pub user_id: &'a UserId,
    pub account_id: &'a AccountId,
    pub transaction: &'a CategorizedTransaction,
    /// Fingerprint of the document the line came from.
    pub source_sha256: Option<&'a str>,
}

type TransactionRow = (
    i64,
    String,
    NaiveDate,
    String,
    i64,
    Option<i64>,
    Option<String>,
    Option<String>,
    Option<i64>,
    Option<i64>,
);

const SELECT_COLUMNS: &str = "SELECT id, account_id, date, description, amount_cents, category_id, \
     category, subcategory, gst_cents, net_cents FROM transactions";

fn transaction_from_row(r: TransactionRow) -> StoredTransaction {
    let category = r.6.map(|name| CategoryAssignment {
        name,
        subcategory: r.7,
    });
    StoredTransaction {
        id: r.0,
        account_id: AccountId(r.1),
        date: r.2,
        description: r.3,
        amount: Money::from_cents(r.4).as_decimal(),
        category_id: r.5.map(CategoryId),
        category,
        gst_amount: r.8.map(|c| Money::from_cents(c).as_decimal()),
        net_amount: r.9.map(|c| Money::from_cents(c).as_decimal()),
    }
}

fn to_cents(amount: rust_decimal::Decimal) -> Result<i64, StorageError> {
    Ok(Money::from_decimal(amount).to_cents()?)
}

/// Inserts one transaction. Generic over the executor so callers can batch inside a
/// database transaction.
pub async fn insert_transaction<'e, E>(
    executor: E,
    new: NewTransaction<'_>,
) -> Result<i64, StorageError>
where
    E: SqliteExecutor<'e>,
{
    let tx = new.transaction;
    let id = sqlx::query(
        "INSERT INTO transactions (user_id, account_id, date, description, amount_cents, \
         category_id, category, subcategory, source_sha256) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(new.user_id.0.as_str())
    .bind(new.account_id.0.as_str())
    .bind(tx.date)
    .bind(&tx.description)
    .bind(to_cents(tx.amount)?)
    .bind(tx.category_id.0)
    .bind(&tx.category.name)
    .bind(tx.category.subcategory.as_deref())
    .bind(new.source_sha256)
    .execute(executor)
    .await?
    .last_insert_rowid();

    Ok(id)
}

/// The user's transactions in date order, optionally restricted to an inclusive date range.
pub async fn list_transactions(
    pool: &DbPool,
    user: &UserId,
    range: Option<DateRange>,
) -> Result<Vec<StoredTransaction>, StorageError> {
    let sql = format!(
        "{SELECT_COLUMNS} WHERE user_id = ? \
         AND (? IS NULL OR date >= ?) AND (? IS NULL OR date <= ?) \
         ORDER BY date, id"
    );
    let start = range.map(|r| r.start);
    let end = range.map(|r| r.end);
    let rows = sqlx::query_as::<_, TransactionRow>(&sql)
        .bind(user.0.as_str())
        .bind(start)
        .bind(start)
        .bind(end)
        .bind(end)
        .fetch_all(pool)
        .await?;

    Ok(rows.into_iter().map(transaction_from_row).collect())
}

pub async fn get_transaction(
    pool: &DbPool,
    id: i64,
    user: &UserId,
) -> Result<Option<StoredTransaction>, StorageError> {
    let sql = format!("{SELECT_COLUMNS} WHERE id = ? AND user_id = ?");
    let row = sqlx::query_as::<_, TransactionRow>(&sql)
        .bind(id)
        .bind(user.0.as_str())
        .fetch_optional(pool)
        .await?;

    Ok(row.map(transaction_from_row))
}

/// Stores GST figures on a transaction. Returns `false` when the user has no such transaction.
pub async fn update_transaction_gst(
    pool: &DbPool,
    id: i64,
    user: &UserId,
    gst: &GstCalculation,
) -> Result<bool, StorageError> {
    let affected = sqlx::query(
        "UPDATE transactions SET gst_cents = ?, net_cents = ? WHERE id = ? AND user_id = ?",
    )
    .bind(to_cents(gst.gst_amount)?)
    .bind(to_cents(gst.net_amount)?)
    .bind(id)
    .bind(user.0.as_str())
    .execute(pool)
    .await?
    .rows_affected();

    Ok(affected > 0)
}

/// Categorised transactions for reporting. Rows without a category are left out.
pub async fn transactions_for_summary(
    pool: &DbPool,
    user: &UserId,
    range: Option<DateRange>,
) -> Result<Vec<CategorizedTransaction>, StorageError> {
    let rows = list_transactions(pool, user, range).await?;
    Ok(rows
        .into_iter()
        .filter_map(|t| {
            Some(CategorizedTransaction {
                date: t.date,
                description: t.description,
                amount: t.amount,
                category_id: t.category_id?,
                category: t.category?,
            })
        })
        .collect())
}
