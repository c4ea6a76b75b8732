//! BSB and account-number checks for Australian bank accounts.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BankingError {
    #[error("BSB must be in format XXX-XXX")]
    BsbFormat,
    #[error("BSB not recognized")]
    BsbUnknown,
    #[error("Account number is required")]
    AccountNumberMissing,
    #[error("Account number must be 4-10 digits")]
    AccountNumberFormat,
}

/// Known BSB ranges per institution, as six-digit numbers with the dash removed.
const BSB_RANGES: &[(&str, &[(u32, u32)])] = &[
    ("Commonwealth Bank", &[(62_000, 62_999), (64_000, 64_999)]),
    ("ANZ", &[(13_000, 13_999)]),
    ("Westpac", &[(3_000, 3_999), (32_000, 36_999)]),
    ("NAB", &[(8_000, 8_999), (82_000, 87_999)]),
    ("ING", &[(92_000, 92_999)]),
];

/// Returns the institution for a well-formed BSB in a known range.
pub fn validate_bsb(bsb: &str) -> Result<&'static str, BankingError> {
    let bytes = bsb.as_bytes();
    let well_formed = bytes.len() == 7
        && bytes[3] == b'-'
        && bytes[..3].iter().chain(&bytes[4..]).all(u8::is_ascii_digit);
    if !well_formed {
        return Err(BankingError::BsbFormat);
    }
    identify_bank_by_bsb(bsb).ok_or(BankingError::BsbUnknown)
}

pub fn identify_bank_by_bsb(bsb: &str) -> Option<&'static str> {
    let number: u32 = bsb.replace('-', "").parse().ok()?;
    BSB_RANGES
        .iter()
        .find(|(_, ranges)| ranges.iter().any(|&(lo, hi)| (lo..=hi).contains(&number)))
        .map(|(bank, _)| *bank)
}

/// Strips spaces and dashes and checks the remainder is 4 to 10 digits.
pub fn validate_account_number(account_number: &str) -> Result<String, BankingError> {
    if account_number.trim().is_empty() {
        return Err(BankingError::AccountNumberMissing);
    }
    let clean: String = account_number
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '-')
        .collect();
    if (4..=10).contains(&clean.len()) && clean.chars().all(|c| c.is_ascii_digit()) {
        Ok(clean)
    } else {
        Err(BankingError::AccountNumberFormat)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn commbank_bsb_is_recognised() {
        assert_eq!(validate_bsb("062-000"), Ok("Commonwealth Bank"));
        assert_eq!(validate_bsb("064-123"), Ok("Commonwealth Bank"));
    }

    #[test]
    fn leading_zero_ranges_resolve() {
        assert_eq!(identify_bank_by_bsb("033-000"), Some("Westpac"));
        assert_eq!(identify_bank_by_bsb("083-004"), Some("NAB"));
        assert_eq!(identify_bank_by_bsb("013-999"), Some("ANZ"));
        assert_eq!(identify_bank_by_bsb("092-100"), Some("ING"));
        assert_eq!(identify_bank_by_bsb("923-100"), None);
    }

    #[test]
    fn malformed_bsb_is_a_format_error() {
        assert_eq!(validate_bsb("062000"), Err(BankingError::BsbFormat));
        assert_eq!(validate_bsb("06-20000"), Err(BankingError::BsbFormat));
        assert_eq!(validate_bsb("abc-def"), Err(BankingError::BsbFormat));
    }

    #[test]
    fn unknown_range_is_rejected() {
        assert_eq!(validate_bsb("999-999"), Err(BankingError::BsbUnknown));
    }

    #[test]
    fn account_number_is_cleaned() {
        assert_eq!(validate_account_number("1234 5678").unwrap(), "12345678");
        assert_eq!(validate_account_number("12-3456").unwrap(), "123456");
    }

    #[test]
    fn account_number_length_and_presence() {
        assert_eq!(validate_account_number("  "), Err(BankingError::AccountNumberMissing));
        assert_eq!(validate_account_number("123"), Err(BankingError::AccountNumberFormat));
        assert_eq!(
            validate_account_number("12345678901"),
            Err(BankingError::AccountNumberFormat)
        );
        assert_eq!(validate_account_number("12a456"), Err(BankingError::AccountNumberFormat));
    }
}
