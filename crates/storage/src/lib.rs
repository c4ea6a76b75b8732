pub mod accounts;
pub mod categories;
pub mod db;
pub mod error;
pub mod investments;
pub mod transactions;

pub use accounts::{create_account, get_account, list_accounts, NewAccount};
pub use categories::{
    create_category, ensure_category, find_category_by_name, list_categories,
    seed_system_categories,
};
pub use db::{create_db, create_db_with, get_account_types, DbPool, DEFAULT_MAX_CONNECTIONS};
pub use error::StorageError;
pub use investments::{insert_dividend, list_dividends, DividendRecord, NewDividend};
pub use transactions::{
    get_transaction, insert_transaction, list_transactions, transactions_for_summary,
    update_transaction_gst, NewTransaction,
};
