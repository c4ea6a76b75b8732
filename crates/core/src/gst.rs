//! Australian GST (10%) extraction and addition.
//!
//! Two entry families with different failure policies:
//! - [`GstCalculator::calculate_from_total`] / [`GstCalculator::add_gst_to_net`] fail hard and
//!   back the API and any persisted figures.
//! - [`GstCalculator::preview_from_total`] never fails and degrades to zeros, for live previews
//!   of partially typed input.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::money::round2;

/// 10% expressed exactly.
pub const GST_RATE: Decimal = Decimal::from_parts(10, 0, 0, false, 2);

/// `total × rate / (1 + rate)` with a 10% rate reduces to `total / 11`.
const GST_INCLUSIVE_DIVISOR: Decimal = Decimal::from_parts(11, 0, 0, false, 0);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GstTreatment {
    #[default]
    GstInclusive,
    GstFree,
    InputTaxed,
    NotApplicable,
}

impl fmt::Display for GstTreatment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GstTreatment::GstInclusive => write!(f, "GST_INCLUSIVE"),
            GstTreatment::GstFree => write!(f, "GST_FREE"),
            GstTreatment::InputTaxed => write!(f, "INPUT_TAXED"),
            GstTreatment::NotApplicable => write!(f, "NOT_APPLICABLE"),
        }
    }
}

impl FromStr for GstTreatment {
    type Err = GstError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "GST_INCLUSIVE" => Ok(GstTreatment::GstInclusive),
            "GST_FREE" => Ok(GstTreatment::GstFree),
            "INPUT_TAXED" => Ok(GstTreatment::InputTaxed),
            "NOT_APPLICABLE" => Ok(GstTreatment::NotApplicable),
            other => Err(GstError::UnknownTreatment(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum GstError {
    #[error("Invalid or negative amount provided ({0}). Amount must be a non-negative number.")]
    NegativeAmount(Decimal),
    #[error("Unknown GST treatment: '{0}'")]
    UnknownTreatment(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GstCalculation {
    #[serde(with = "rust_decimal::serde::float")]
    pub total_amount: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub net_amount: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub gst_amount: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub gst_rate: Decimal,
}

impl GstCalculation {
    pub fn zero() -> Self {
        GstCalculation {
            total_amount: Decimal::ZERO,
            net_amount: Decimal::ZERO,
            gst_amount: Decimal::ZERO,
            gst_rate: Decimal::ZERO,
        }
    }
}

pub struct GstCalculator;

impl GstCalculator {
    /// Splits a GST-inclusive total into its net and tax components.
    pub fn calculate_from_total(
        total: Decimal,
        treatment: GstTreatment,
    ) -> Result<GstCalculation, GstError> {
        if total.is_sign_negative() && !total.is_zero() {
            return Err(GstError::NegativeAmount(total));
        }
        let total = round2(total);

        Ok(match treatment {
            GstTreatment::GstInclusive => {
                let gst_amount = round2(total / GST_INCLUSIVE_DIVISOR);
                GstCalculation {
                    total_amount: total,
                    net_amount: round2(total - gst_amount),
                    gst_amount,
                    gst_rate: GST_RATE,
                }
            }
            GstTreatment::GstFree | GstTreatment::InputTaxed | GstTreatment::NotApplicable => {
                GstCalculation {
                    total_amount: total,
                    net_amount: total,
                    gst_amount: Decimal::ZERO,
                    gst_rate: Decimal::ZERO,
                }
            }
        })
    }

    /// Adds 10% GST on top of a net amount.
    pub fn add_gst_to_net(net: Decimal) -> Result<GstCalculation, GstError> {
        if net.is_sign_negative() && !net.is_zero() {
            return Err(GstError::NegativeAmount(net));
        }
        let net = round2(net);

        let gst_amount = round2(net * GST_RATE);
        Ok(GstCalculation {
            total_amount: round2(net + gst_amount),
            net_amount: net,
            gst_amount,
            gst_rate: GST_RATE,
        })
    }

    /// Lenient variant for previews: anything unparseable or negative yields an all-zero result.
    pub fn preview_from_total(raw: &str, treatment: GstTreatment) -> GstCalculation {
        let parsed = raw
            .trim()
            .trim_start_matches('$')
            .replace(',', "")
            .parse::<Decimal>();

        match parsed {
            Ok(total) => Self::calculate_from_total(total, treatment)
                .unwrap_or_else(|_| GstCalculation::zero()),
            Err(_) => GstCalculation::zero(),
        }
    }
}
