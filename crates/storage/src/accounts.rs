use ozbooks_core::{Account, AccountId, UserId};
use uuid::Uuid;

use crate::db::DbPool;
use crate::error::StorageError;

#[derive(Debug, Clone)]
pub struct NewAccount {
    pub user_id: UserId,
    pub name: String,
    pub account_type: String,
    pub bsb: Option<String>,
    pub account_number: Option<String>,
    pub institution: Option<String>,
}

type AccountRow = (
    String,
    String,
    String,
    String,
    Option<String>,
    Option<String>,
    Option<String>,
);

fn account_from_row(r: AccountRow) -> Account {
    Account {
        id: AccountId(r.0),
        user_id: UserId(r.1),
        name: r.2,
        account_type: r.3,
        bsb: r.4,
        account_number: r.5,
        institution: r.6,
    }
}

/// Creates an account with a fresh UUID. An unknown `account_type` is an `InvalidReference`.
pub async fn create_account(pool: &DbPool, new: &NewAccount) -> Result<Account, StorageError> {
    let id = Uuid::new_v4().to_string();
    sqlx::query(
        "INSERT INTO accounts (id, user_id, name, account_type, bsb, account_number, institution) \
         VALUES (?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(&id)
    .bind(new.user_id.0.as_str())
    .bind(&new.name)
    .bind(&new.account_type)
    .bind(new.bsb.as_deref())
    .bind(new.account_number.as_deref())
    .bind(new.institution.as_deref())
    .execute(pool)
    .await?;

    tracing::info!(account_id = %id, user = %new.user_id, account_type = %new.account_type, "account created");

    Ok(Account {
        id: AccountId(id),
        user_id: new.user_id.clone(),
        name: new.name.clone(),
        account_type: new.account_type.clone(),
        bsb: new.bsb.clone(),
        account_number: new.account_number.clone(),
        institution: new.institution.clone(),
    })
}

/// Fetches an account only if it belongs to `user`.
pub async fn get_account(
    pool: &DbPool,
    id: &AccountId,
    user: &UserId,
) -> Result<Option<Account>, StorageError> {
    let row = sqlx::query_as::<_, AccountRow>(
        "SELECT id, user_id, name, account_type, bsb, account_number, institution \
         FROM accounts WHERE id = ? AND user_id = ?",
    )
    .bind(id.0.as_str())
    .bind(user.0.as_str())
    .fetch_optional(pool)
    .await?;

    Ok(row.map(account_from_row))
}

pub async fn list_accounts(pool: &DbPool, user: &UserId) -> Result<Vec<Account>, StorageError> {
    let rows = sqlx::query_as::<_, AccountRow>(
        "SELECT id, user_id, name, account_type, bsb, account_number, institution \
         FROM accounts WHERE user_id = ? ORDER BY name",
    )
    .bind(user.0.as_str())
    .fetch_all(pool)
    .await?;

    Ok(rows.into_iter().map(account_from_row).collect())
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;

    pub async fn make_account(pool: &DbPool, user: &str) -> Account {
        create_account(
            pool,
            &NewAccount {
                user_id: UserId::from(user),
                name: "Everyday".into(),
                account_type: "transaction".into(),
                bsb: Some("062-000".into()),
                account_number: Some("12345678".into()),
                institution: Some("Commonwealth Bank".into()),
            },
        )
        .await
        .unwrap()
    }
}
