//! Turns free statement text into dated, signed transactions.

use chrono::{Datelike, Local};
use ozbooks_core::ParsedTransaction;

use crate::bank::{BankFormat, BankRegistry};
use crate::normalize::{parse_amount, parse_date_in_year};

/// The three tokens a bank pattern captured from one line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawTransactionLine {
    pub date_text: String,
    pub description_text: String,
    pub amount_text: String,
}

/// Runs the format's pattern over each line; lines that do not match are skipped.
pub fn match_lines(text: &str, format: &BankFormat) -> Vec<RawTransactionLine> {
    text.lines()
        .filter_map(|line| {
            let caps = format.pattern().captures(line)?;
            Some(RawTransactionLine {
                date_text: caps.get(1)?.as_str().to_string(),
                description_text: caps.get(2)?.as_str().to_string(),
                amount_text: caps.get(3)?.as_str().to_string(),
            })
        })
        .collect()
}

pub fn parse_statement(text: &str, bank: &str, registry: &BankRegistry) -> Vec<ParsedTransaction> {
    parse_statement_in_year(text, bank, registry, Local::now().year())
}

/// Parses a statement whose `DD Mon` dates belong to `year`.
///
/// Lines with an unreadable date are dropped. Unreadable amounts become zero rather than
/// dropping the line. Output keeps statement order.
pub fn parse_statement_in_year(
    text: &str,
    bank: &str,
    registry: &BankRegistry,
    year: i32,
) -> Vec<ParsedTransaction> {
    let format = registry.get(bank);
    let raw = match_lines(text, format);
    let matched = raw.len();

    let parsed: Vec<ParsedTransaction> = raw
        .into_iter()
        .filter_map(|line| {
            let Some(date) = parse_date_in_year(&line.date_text, year) else {
                tracing::trace!(date = %line.date_text, "dropping line with unreadable date");
                return None;
            };
            Some(ParsedTransaction::new(
                date,
                &line.description_text,
                parse_amount(&line.amount_text),
            ))
        })
        .collect();

    tracing::debug!(
        bank = format.id(),
        matched,
        parsed = parsed.len(),
        dropped = matched - parsed.len(),
        "statement parsed"
    );
    parsed
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rust_decimal::Decimal;

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    #[test]
    fn commbank_snippet_with_header_yields_one_transaction() {
        let registry = BankRegistry::builtin();
        let text = "Date Transaction Details Amount\n05 Jan Salary Aris Zinc Pty Ltd 8,490.02\n";
        let txs = parse_statement_in_year(text, "commbank", &registry, 2024);
        assert_eq!(txs.len(), 1);
        assert_eq!(txs[0].amount, dec("8490.02"));
        assert_eq!(txs[0].description, "Salary Aris Zinc Pty Ltd");
        assert_eq!(txs[0].date, NaiveDate::from_ymd_opt(2024, 1, 5).unwrap());
    }

    #[test]
    fn preserves_order_and_signs() {
        let registry = BankRegistry::builtin();
        let text = "\
Opening balance
12/01/2024 Woolworths Metro (45.10)
11/01/2024 Interest credit 1.23
13/01/2024 Opal top up 20.00-
";
        let txs = parse_statement(text, "default", &registry);
        let got: Vec<(&str, Decimal)> =
            txs.iter().map(|t| (t.description.as_str(), t.amount)).collect();
        assert_eq!(
            got,
            vec![
                ("Woolworths Metro", dec("-45.10")),
                ("Interest credit", dec("1.23")),
                ("Opal top up", dec("-20.00")),
            ]
        );
    }

    #[test]
    fn unreadable_dates_are_dropped() {
        let registry = BankRegistry::builtin();
        // 32/13/2024 fits the line shape but is not a calendar date.
        let text = "32/13/2024 Ghost 10.00\n01/02/2024 Real 10.00";
        let txs = parse_statement(text, "default", &registry);
        assert_eq!(txs.len(), 1);
        assert_eq!(txs[0].description, "Real");
    }

    #[test]
    fn tolerates_crlf_line_endings() {
        let registry = BankRegistry::builtin();
        let text = "05 Jan Coffee 4.50\r\n06 Jan Train 3.20\r\n";
        let txs = parse_statement_in_year(text, "cba", &registry, 2024);
        assert_eq!(txs.len(), 2);
        assert_eq!(txs[1].amount, dec("3.20"));
    }

    #[test]
    fn unknown_bank_uses_default_format() {
        let registry = BankRegistry::builtin();
        let txs = parse_statement("2024-03-01 Rent 1,200.00-", "bank of nowhere", &registry);
        assert_eq!(txs.len(), 1);
        assert_eq!(txs[0].amount, dec("-1200.00"));
    }

    #[test]
    fn empty_text_yields_nothing() {
        let registry = BankRegistry::builtin();
        assert!(parse_statement("", "commbank", &registry).is_empty());
        assert!(match_lines("just a header", registry.get("commbank")).is_empty());
    }

    #[test]
    fn match_lines_exposes_raw_tokens() {
        let registry = BankRegistry::builtin();
        let raw = match_lines("05 Jan Salary 8,490.02", registry.get("commbank"));
        assert_eq!(
            raw,
            vec![RawTransactionLine {
                date_text: "05 Jan".into(),
                description_text: "Salary".into(),
                amount_text: "8,490.02".into(),
            }]
        );
    }
}
