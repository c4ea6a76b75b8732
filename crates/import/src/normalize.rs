//! Best-effort conversion of statement tokens into dates and amounts.
//!
//! Nothing here fails: an unreadable date is `None` and an unreadable amount is zero, so one
//! noisy line never stops the rest of a document from importing.

use chrono::{DateTime, Datelike, Local, NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use std::str::FromStr;

/// Shapes statements are known to use, tried first.
const HINT_FORMATS: &[&str] = &["%d/%m/%Y", "%Y-%m-%d", "%d %b %Y"];

/// Everything else a date token might plausibly be.
const FALLBACK_FORMATS: &[&str] = &[
    "%d %B %Y",
    "%d-%m-%Y",
    "%d.%m.%Y",
    "%Y/%m/%d",
    "%d/%m/%y",
    "%d %b %y",
    "%b %d, %Y",
    "%B %d, %Y",
    "%b %d %Y",
    "%d-%b-%Y",
];

re!(re_day_month, r"^(\d{1,2}) ([A-Za-z]{3,9})$");
re!(re_numeric_prefix, r"^(?:\d+(?:\.\d*)?|\.\d+)");

/// Parses a date token, filling in the current year for `DD Mon` tokens.
pub fn parse_date(text: &str) -> Option<NaiveDate> {
    parse_date_in_year(text, Local::now().year())
}

/// Parses a date token, using `year` for tokens that carry only a day and month.
pub fn parse_date_in_year(text: &str, year: i32) -> Option<NaiveDate> {
    let token = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if token.is_empty() {
        return None;
    }

    if let Some(d) = try_formats(&token, HINT_FORMATS) {
        return Some(d);
    }
    if re_day_month().is_match(&token) {
        if let Some(d) = try_formats(&format!("{token} {year}"), &["%d %b %Y"]) {
            return Some(d);
        }
    }

    try_formats(&token, FALLBACK_FORMATS)
        .or_else(|| DateTime::parse_from_rfc3339(&token).ok().map(|dt| dt.date_naive()))
        .or_else(|| {
            NaiveDateTime::parse_from_str(&token, "%Y-%m-%dT%H:%M:%S")
                .ok()
                .map(|dt| dt.date())
        })
}

fn try_formats(token: &str, formats: &[&str]) -> Option<NaiveDate> {
    formats
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(token, fmt).ok())
}

/// Parses an amount token. Negative amounts may be written `-12.50`, `12.50-` or `(12.50)`;
/// any of these (or several at once) make the result negative. Unreadable input is zero.
pub fn parse_amount(text: &str) -> Decimal {
    let cleaned: String = text
        .chars()
        .filter(|c| c.is_ascii_digit() || matches!(c, ',' | '.' | '-' | '(' | ')'))
        .collect();

    let mut negative = false;
    let mut body = cleaned.as_str();
    if body.len() >= 2 && body.starts_with('(') && body.ends_with(')') {
        negative = true;
        body = &body[1..body.len() - 1];
    }

    let without_separators = body.replace(',', "");
    let mut body = without_separators.as_str();
    if let Some(rest) = body.strip_suffix('-') {
        negative = true;
        body = rest;
    }
    if let Some(rest) = body.strip_prefix('-') {
        negative = true;
        body = rest;
    }

    let Some(number) = re_numeric_prefix().find(body) else {
        return Decimal::ZERO;
    };
    let value = match Decimal::from_str(number.as_str().trim_end_matches('.')) {
        Ok(v) => v,
        Err(_) => return Decimal::ZERO,
    };

    if value.is_zero() {
        Decimal::ZERO
    } else if negative {
        -value
    } else {
        value
    }
}
