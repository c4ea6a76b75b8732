//! Category lookup and idempotent creation.
//!
//! A name is unique per user. System rows (no user) are visible to every user, but a
//! user-owned row of the same name shadows the system one.

use ozbooks_core::{Category, CategoryId, UserId};
use sqlx::SqliteExecutor;

use crate::db::DbPool;
use crate::error::StorageError;

type CategoryRow = (i64, String, Option<String>, i64, Option<i64>);

fn category_from_row(r: CategoryRow) -> Category {
    Category {
        id: CategoryId(r.0),
        name: r.1,
        user_id: r.2.map(UserId),
        is_system: r.3 != 0,
        parent_category_id: r.4.map(CategoryId),
    }
}

pub async fn find_category_by_name<'e, E>(
    executor: E,
    name: &str,
    user: &UserId,
) -> Result<Option<Category>, StorageError>
where
    E: SqliteExecutor<'e>,
{
    let row = sqlx::query_as::<_, CategoryRow>(
        "SELECT id, name, user_id, is_system, parent_category_id FROM categories \
         WHERE name = ? AND (user_id = ? OR is_system = 1) \
         ORDER BY is_system ASC LIMIT 1",
    )
    .bind(name)
    .bind(user.0.as_str())
    .fetch_optional(executor)
    .await?;

    Ok(row.map(category_from_row))
}

/// Inserts a user-owned category, failing with `Conflict` if the user already has one by that name.
pub async fn create_category(
    pool: &DbPool,
    name: &str,
    user: &UserId,
) -> Result<Category, StorageError> {
    let row = sqlx::query_as::<_, CategoryRow>(
        "INSERT INTO categories (name, user_id) VALUES (?, ?) \
         RETURNING id, name, user_id, is_system, parent_category_id",
    )
    .bind(name)
    .bind(user.0.as_str())
    .fetch_one(pool)
    .await?;

    Ok(category_from_row(row))
}

/// Returns the category visible to `user` under `name`, creating a user-owned one if none is.
///
/// Safe to call concurrently: the insert is a no-op when another caller got there first, and
/// the follow-up read returns the surviving row.
pub async fn ensure_category(
    pool: &DbPool,
    name: &str,
    user: &UserId,
) -> Result<Category, StorageError> {
    if let Some(existing) = find_category_by_name(pool, name, user).await? {
        return Ok(existing);
    }

    let inserted = sqlx::query(
        "INSERT INTO categories (name, user_id) VALUES (?, ?) \
         ON CONFLICT (name, user_id) DO NOTHING",
    )
    .bind(name)
    .bind(user.0.as_str())
    .execute(pool)
    .await?
    .rows_affected();

    if inserted > 0 {
        tracing::debug!(category = name, user = %user, "created category");
    }

    find_category_by_name(pool, name, user)
        .await?
        .ok_or_else(|| StorageError::Corrupt(format!("category '{name}' vanished after insert")))
}

/// Inserts shared categories that every user can see. Existing names are left alone.
pub async fn seed_system_categories<S: AsRef<str>>(
    pool: &DbPool,
    names: &[S],
) -> Result<(), StorageError> {
    for name in names {
        sqlx::query("INSERT OR IGNORE INTO categories (name, user_id, is_system) VALUES (?, NULL, 1)")
            .bind(name.as_ref())
            .execute(pool)
            .await?;
    }
    Ok(())
}

/// Everything visible to `user`: system rows plus the user's own, by name.
pub async fn list_categories(pool: &DbPool, user: &UserId) -> Result<Vec<Category>, StorageError> {
    let rows = sqlx::query_as::<_, CategoryRow>(
        "SELECT id, name, user_id, is_system, parent_category_id FROM categories \
         WHERE user_id = ? OR is_system = 1 ORDER BY name, is_system",
    )
    .bind(user.0.as_str())
    .fetch_all(pool)
    .await?;

    Ok(rows.into_iter().map(category_from_row).collect())
}
