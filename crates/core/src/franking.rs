//! Dividend imputation: grossing up a cash dividend by the franking credit attached to it.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::money::round2;

/// Australian company tax rate used for the statutory gross-up.
pub const COMPANY_TAX_RATE: Decimal = Decimal::from_parts(30, 0, 0, false, 2);

const MAX_FRANKING_PERCENTAGE: Decimal = Decimal::ONE_HUNDRED;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum FrankingError {
    #[error("Franking percentage cannot exceed 100% (got {0})")]
    PercentageAboveMaximum(Decimal),
    #[error("Franking percentage cannot be negative (got {0})")]
    NegativePercentage(Decimal),
    #[error("Dividend amount cannot be negative (got {0})")]
    NegativeDividend(Decimal),
    #[error("Company tax rate must be at least 0 and below 1 (got {0})")]
    InvalidCompanyRate(Decimal),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FrankingResult {
    #[serde(with = "rust_decimal::serde::float")]
    pub cash_dividend: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub franked_portion: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub unfranked_portion: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub franking_credit: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub grossed_up_dividend: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub total_assessable_income: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub franking_percentage: Decimal,
}

pub struct FrankingCalculator;

impl FrankingCalculator {
    pub fn calculate(dividend: Decimal, percentage: Decimal) -> Result<FrankingResult, FrankingError> {
        Self::calculate_with_company_rate(dividend, percentage, COMPANY_TAX_RATE)
    }

    /// Same formula with the company tax rate passed in rather than read from the constant.
    pub fn calculate_with_company_rate(
        dividend: Decimal,
        percentage: Decimal,
        company_tax_rate: Decimal,
    ) -> Result<FrankingResult, FrankingError> {
        if percentage > MAX_FRANKING_PERCENTAGE {
            return Err(FrankingError::PercentageAboveMaximum(percentage));
        }
        if percentage.is_sign_negative() && !percentage.is_zero() {
            return Err(FrankingError::NegativePercentage(percentage));
        }
        if dividend.is_sign_negative() && !dividend.is_zero() {
            return Err(FrankingError::NegativeDividend(dividend));
        }
        if company_tax_rate.is_sign_negative() || company_tax_rate >= Decimal::ONE {
            return Err(FrankingError::InvalidCompanyRate(company_tax_rate));
        }

        let franking_rate = percentage / Decimal::ONE_HUNDRED;
        let franked_portion = dividend * franking_rate;
        let grossed_up_dividend = franked_portion / (Decimal::ONE - company_tax_rate);
        let franking_credit = round2(grossed_up_dividend - franked_portion);

        Ok(FrankingResult {
            cash_dividend: round2(dividend),
            franked_portion: round2(franked_portion),
            unfranked_portion: round2(dividend * (Decimal::ONE - franking_rate)),
            franking_credit,
            grossed_up_dividend: round2(grossed_up_dividend),
            total_assessable_income: round2(dividend + franking_credit),
            franking_percentage: percentage,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    #[test]
    fn fully_franked_thousand() {
        let r = FrankingCalculator::calculate(dec("1000"), dec("100")).unwrap();
        assert_eq!(r.cash_dividend, dec("1000"));
        assert_eq!(r.franked_portion, dec("1000"));
        assert_eq!(r.unfranked_portion, Decimal::ZERO);
        assert_eq!(r.franking_credit, dec("428.57"));
        assert_eq!(r.grossed_up_dividend, dec("1428.57"));
        assert_eq!(r.total_assessable_income, dec("1428.57"));
        assert_eq!(r.franking_percentage, dec("100"));
    }

    #[test]
    fn unfranked_dividend_has_no_credit() {
        let r = FrankingCalculator::calculate(dec("1000"), Decimal::ZERO).unwrap();
        assert_eq!(r.franking_credit, Decimal::ZERO);
        assert_eq!(r.unfranked_portion, dec("1000"));
        assert_eq!(r.grossed_up_dividend, Decimal::ZERO);
        assert_eq!(r.total_assessable_income, dec("1000"));
    }

    #[test]
    fn partially_franked_splits_portions() {
        let r = FrankingCalculator::calculate(dec("500"), dec("50")).unwrap();
        assert_eq!(r.franked_portion, dec("250"));
        assert_eq!(r.unfranked_portion, dec("250"));
        // 250 / 0.7 - 250 = 107.142857...
        assert_eq!(r.franking_credit, dec("107.14"));
        assert_eq!(r.total_assessable_income, dec("607.14"));
    }

    #[test]
    fn cash_dividend_is_rounded_to_cents() {
        let r = FrankingCalculator::calculate(dec("70.005"), dec("100")).unwrap();
        assert_eq!(r.cash_dividend, dec("70.01"));
        assert_eq!(r.franked_portion, dec("70.01"));
    }

    #[test]
    fn percentage_is_echoed_unrounded() {
        let r = FrankingCalculator::calculate(dec("100"), dec("33.333")).unwrap();
        assert_eq!(r.franking_percentage, dec("33.333"));
    }

    #[test]
    fn percentage_above_100_fails() {
        let err = FrankingCalculator::calculate(dec("1000"), dec("101")).unwrap_err();
        assert!(matches!(err, FrankingError::PercentageAboveMaximum(_)));
        assert!(err.to_string().contains("cannot exceed 100%"));
    }

    #[test]
    fn negative_inputs_fail() {
        assert!(matches!(
            FrankingCalculator::calculate(dec("1000"), dec("-1")),
            Err(FrankingError::NegativePercentage(_))
        ));
        assert!(matches!(
            FrankingCalculator::calculate(dec("-1000"), dec("100")),
            Err(FrankingError::NegativeDividend(_))
        ));
    }

    #[test]
    fn explicit_company_rate_is_threaded_through() {
        // Base rate entity at 25%: 750 / 0.75 - 750 = 250
        let r = FrankingCalculator::calculate_with_company_rate(dec("750"), dec("100"), dec("0.25"))
            .unwrap();
        assert_eq!(r.franking_credit, dec("250"));
        assert!(matches!(
            FrankingCalculator::calculate_with_company_rate(dec("1"), dec("100"), Decimal::ONE),
            Err(FrankingError::InvalidCompanyRate(_))
        ));
    }

    #[test]
    fn result_serializes_camel_case() {
        let r = FrankingCalculator::calculate(dec("1000"), dec("100")).unwrap();
        let json = serde_json::to_value(r).unwrap();
        assert_eq!(json["frankingCredit"], serde_json::json!(428.57));
        assert_eq!(json["totalAssessableIncome"], serde_json::json!(1428.57));
        assert_eq!(json["frankingPercentage"], serde_json::json!(100.0));
    }
}
