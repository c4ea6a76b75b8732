use serde::{Deserialize, Serialize};
use std::fmt;

use super::category::UserId;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccountId(pub String);

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for AccountId {
    fn from(s: &str) -> Self {
        AccountId(s.to_string())
    }
}

/// A bank, card or investment account that statement lines are imported into.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    pub id: AccountId,
    pub user_id: UserId,
    pub name: String,
    /// Code of a row in the `account_types` reference table.
    pub account_type: String,
    pub bsb: Option<String>,
    pub account_number: Option<String>,
    /// Institution inferred from the BSB, when it falls in a known range.
    pub institution: Option<String>,
}

/// Account types seeded into the reference table: (code, display name).
pub const DEFAULT_ACCOUNT_TYPES: &[(&str, &str)] = &[
    ("transaction", "Transaction Account"),
    ("savings", "Savings Account"),
    ("offset", "Offset Account"),
    ("credit_card", "Credit Card"),
    ("home_loan", "Home Loan"),
    ("personal_loan", "Personal Loan"),
    ("investment", "Investment Account"),
    ("superannuation", "Superannuation"),
];
