use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;

/// An Australian financial year, named by the calendar year it ends in:
/// FY2024 runs 1 July 2023 to 30 June 2024.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FiscalYear {
    year: i32,
    range: DateRange,
}

impl fmt::Display for FiscalYear {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FY{}", self.year)
    }
}

impl FiscalYear {
    pub fn new(year: i32) -> Option<Self> {
        let start = NaiveDate::from_ymd_opt(year - 1, 7, 1)?;
        let end = NaiveDate::from_ymd_opt(year, 6, 30)?;
        Some(FiscalYear {
            year,
            range: DateRange::new(start, end),
        })
    }

    /// The financial year a date falls in.
    pub fn containing(date: NaiveDate) -> Option<Self> {
        if date.month() >= 7 {
            Self::new(date.year() + 1)
        } else {
            Self::new(date.year())
        }
    }

    pub fn year(self) -> i32 {
        self.year
    }

    pub fn start_date(self) -> NaiveDate {
        self.range.start
    }

    pub fn end_date(self) -> NaiveDate {
        self.range.end
    }

    pub fn range(self) -> DateRange {
        self.range
    }

    /// Date range of a BAS quarter within this financial year.
    pub fn quarter(self, quarter: Quarter) -> Option<DateRange> {
        let (y, start_month, end_month, end_day) = match quarter {
            Quarter::Q1 => (self.year - 1, 7, 9, 30),
            Quarter::Q2 => (self.year - 1, 10, 12, 31),
            Quarter::Q3 => (self.year, 1, 3, 31),
            Quarter::Q4 => (self.year, 4, 6, 30),
        };
        Some(DateRange::new(
            NaiveDate::from_ymd_opt(y, start_month, 1)?,
            NaiveDate::from_ymd_opt(y, end_month, end_day)?,
        ))
    }
}

/// BAS reporting quarters, numbered from the start of the financial year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Quarter {
    Q1,
    Q2,
    Q3,
    Q4,
}

impl fmt::Display for Quarter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Quarter::Q1 => write!(f, "Q1"),
            Quarter::Q2 => write!(f, "Q2"),
            Quarter::Q3 => write!(f, "Q3"),
            Quarter::Q4 => write!(f, "Q4"),
        }
    }
}

impl Quarter {
    pub fn new(n: u8) -> Option<Self> {
        match n {
            1 => Some(Quarter::Q1),
            2 => Some(Quarter::Q2),
            3 => Some(Quarter::Q3),
            4 => Some(Quarter::Q4),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl fmt::Display for DateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} to {}", self.start, self.end)
    }
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        DateRange { start, end }
    }

    pub fn contains(self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }
}
