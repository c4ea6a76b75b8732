//! Statement text to categorised transactions: normalising tokens, per-bank line patterns,
//! and the category rule table.

/// Compiles a literal regex once and hands out a static reference.
macro_rules! re {
    ($name:ident, $pat:expr) => {
        fn $name() -> &'static ::regex::Regex {
            static R: ::std::sync::OnceLock<::regex::Regex> = ::std::sync::OnceLock::new();
            R.get_or_init(|| ::regex::Regex::new($pat).expect("invalid regex"))
        }
    };
}

pub mod bank;
pub mod normalize;
pub mod rules;
pub mod statement;

pub use bank::{BankFormat, BankFormatConfig, BankFormatError, BankRegistry, DEFAULT_BANK};
pub use normalize::{parse_amount, parse_date, parse_date_in_year};
pub use rules::{CategoryRule, RuleError, RuleSet};
pub use statement::{match_lines, parse_statement, parse_statement_in_year, RawTransactionLine};
