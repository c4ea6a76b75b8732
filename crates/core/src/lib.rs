pub mod account;
pub mod banking;
pub mod category;
pub mod franking;
pub mod gst;
pub mod money;
pub mod period;
pub mod summary;
pub mod transaction;

pub use account::{Account, AccountId, DEFAULT_ACCOUNT_TYPES};
pub use banking::BankingError;
pub use category::{Category, CategoryAssignment, CategoryId, UserId};
pub use franking::{FrankingCalculator, FrankingError, FrankingResult, COMPANY_TAX_RATE};
pub use gst::{GstCalculation, GstCalculator, GstError, GstTreatment, GST_RATE};
pub use money::{decimal_from_f64, round2, Money, MoneyError};
pub use period::{DateRange, FiscalYear, Quarter};
pub use summary::{summarize, CategorySummary, ExpenseSummary};
pub use transaction::{CategorizedTransaction, ParsedTransaction, StoredTransaction};
