use ozbooks_core::DEFAULT_ACCOUNT_TYPES;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use sqlx::{Pool, Sqlite};
use std::path::Path;
use std::time::Duration;

use crate::error::StorageError;

pub type DbPool = Pool<Sqlite>;

pub const DEFAULT_MAX_CONNECTIONS: u32 = 5;

/// Opens (creating if needed) the database at `path` and brings the schema up to date.
pub async fn create_db(path: &Path) -> Result<DbPool, StorageError> {
    create_db_with(path, DEFAULT_MAX_CONNECTIONS).await
}

pub async fn create_db_with(path: &Path, max_connections: u32) -> Result<DbPool, StorageError> {
    // Pragmas go on the connect options so every pooled connection gets them.
    let options = SqliteConnectOptions::new()
        .filename(path)
        .create_if_missing(true)
        .journal_mode(SqliteJournalMode::Wal)
        .synchronous(SqliteSynchronous::Normal)
        .foreign_keys(true)
        .busy_timeout(Duration::from_millis(5000))
        .pragma("cache_size", "-32000");

    let pool = SqlitePoolOptions::new()
        .max_connections(max_connections.max(1))
        .connect_with(options)
        .await?;

    run_migrations(&pool).await?;
    seed_account_types(&pool).await?;

    tracing::info!(path = %path.display(), max_connections, "database ready");
    Ok(pool)
}

async fn run_migrations(pool: &DbPool) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS categories (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL,
            user_id TEXT,
            is_system INTEGER NOT NULL DEFAULT 0,
            parent_category_id INTEGER,
            created_at TEXT NOT NULL DEFAULT (datetime('now')),
            UNIQUE (name, user_id),
            FOREIGN KEY (parent_category_id) REFERENCES categories(id)
        )
        "#,
    )
    .execute(pool)
    .await?;

    // NULLs never collide under UNIQUE, so system rows need their own index.
    sqlx::query(
        "CREATE UNIQUE INDEX IF NOT EXISTS idx_categories_system_name ON categories(name) WHERE user_id IS NULL",
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS account_types (
            code TEXT PRIMARY KEY,
            name TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS accounts (
            id TEXT PRIMARY KEY,
            user_id TEXT NOT NULL,
            name TEXT NOT NULL,
            account_type TEXT NOT NULL,
            bsb TEXT,
            account_number TEXT,
            institution TEXT,
            created_at TEXT NOT NULL DEFAULT (datetime('now')),
            FOREIGN KEY (account_type) REFERENCES account_types(code)
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS transactions (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            user_id TEXT NOT NULL,
            account_id TEXT NOT NULL,
            date TEXT NOT NULL,
            description TEXT NOT NULL,
            amount_cents INTEGER NOT NULL,
            category_id INTEGER,
            category TEXT,
            subcategory TEXT,
            gst_cents INTEGER,
            net_cents INTEGER,
            source_sha256 TEXT,
            created_at TEXT NOT NULL DEFAULT (datetime('now')),
            FOREIGN KEY (account_id) REFERENCES accounts(id) ON DELETE CASCADE,
            FOREIGN KEY (category_id) REFERENCES categories(id)
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        "CREATE INDEX IF NOT EXISTS idx_transactions_user_date ON transactions(user_id, date)",
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS dividends (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            user_id TEXT NOT NULL,
            account_id TEXT,
            security_code TEXT NOT NULL,
            date TEXT NOT NULL,
            units_held TEXT NOT NULL,
            cash_dividend_cents INTEGER NOT NULL,
            franking_credit_cents INTEGER NOT NULL,
            franking_percentage TEXT NOT NULL,
            grossed_up_dividend_cents INTEGER NOT NULL,
            created_at TEXT NOT NULL DEFAULT (datetime('now')),
            FOREIGN KEY (account_id) REFERENCES accounts(id) ON DELETE SET NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

async fn seed_account_types(pool: &DbPool) -> Result<(), sqlx::Error> {
    for (code, name) in DEFAULT_ACCOUNT_TYPES {
        sqlx::query("INSERT OR IGNORE INTO account_types (code, name) VALUES (?, ?)")
            .bind(code)
            .bind(name)
            .execute(pool)
            .await?;
    }
    Ok(())
}

pub async fn get_account_types(pool: &DbPool) -> Result<Vec<(String, String)>, StorageError> {
    let rows = sqlx::query_as::<_, (String, String)>(
        "SELECT code, name FROM account_types ORDER BY code",
    )
    .fetch_all(pool)
    .await?;
    Ok(rows)
}
