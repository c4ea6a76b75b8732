//! Per-bank line patterns for statement text.
//!
//! Every pattern has exactly three capture groups: date token, description, amount token.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

pub const DEFAULT_BANK: &str = "default";

const COMMBANK_PATTERN: &str =
    r"^\s*(\d{2}\s[A-Za-z]{3})\s+(.+?)\s+([-(]?\$?\(?[\d,]+\.\d{2}\)?-?)\s*$";

const DEFAULT_PATTERN: &str = r"^\s*(\d{2}/\d{2}/\d{4}|\d{4}-\d{2}-\d{2}|\d{2}\s[A-Za-z]{3}\s\d{4}|\d{2}\s[A-Za-z]{3})\s+(.+?)\s+([-(]?\$?\(?[\d,]+\.\d{2}\)?-?)\s*$";

#[derive(Debug, Error)]
pub enum BankFormatError {
    #[error("Invalid pattern for bank '{id}': {source}")]
    InvalidPattern {
        id: String,
        #[source]
        source: regex::Error,
    },
    #[error("Pattern for bank '{id}' must have exactly 3 capture groups, found {found}")]
    CaptureCount { id: String, found: usize },
    #[error("Bank id must not be empty")]
    EmptyId,
}

/// A bank format as written in configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BankFormatConfig {
    pub id: String,
    pub pattern: String,
    #[serde(default)]
    pub aliases: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct BankFormat {
    id: String,
    aliases: Vec<String>,
    pattern: Regex,
}

impl BankFormat {
    pub fn new(id: &str, pattern: &str) -> Result<Self, BankFormatError> {
        let id = normalize_id(id);
        if id.is_empty() {
            return Err(BankFormatError::EmptyId);
        }
        let pattern = Regex::new(pattern).map_err(|source| BankFormatError::InvalidPattern {
            id: id.clone(),
            source,
        })?;
        // captures_len counts the implicit whole-match group.
        let found = pattern.captures_len() - 1;
        if found != 3 {
            return Err(BankFormatError::CaptureCount { id, found });
        }
        Ok(Self {
            id,
            aliases: Vec::new(),
            pattern,
        })
    }

    pub fn with_aliases<I, S>(mut self, aliases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.aliases = aliases
            .into_iter()
            .map(|a| normalize_id(a.as_ref()))
            .filter(|a| !a.is_empty())
            .collect();
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn aliases(&self) -> &[String] {
        &self.aliases
    }

    pub fn pattern(&self) -> &Regex {
        &self.pattern
    }
}

impl TryFrom<&BankFormatConfig> for BankFormat {
    type Error = BankFormatError;

    fn try_from(cfg: &BankFormatConfig) -> Result<Self, Self::Error> {
        Ok(BankFormat::new(&cfg.id, &cfg.pattern)?.with_aliases(&cfg.aliases))
    }
}

fn normalize_id(id: &str) -> String {
    id.trim().to_lowercase()
}

/// Immutable lookup from bank id (or alias) to its line pattern.
#[derive(Debug, Clone)]
pub struct BankRegistry {
    formats: Vec<BankFormat>,
    index: HashMap<String, usize>,
    default_idx: usize,
}

impl BankRegistry {
    /// The built-in formats: `commbank` and `default`.
    pub fn builtin() -> Self {
        let formats = builtin_formats();
        // Built-in patterns are literals covered by tests.
        Self::from_formats(formats.into_iter().flatten().collect())
    }

    /// Built-ins plus the configured formats. A configured id replaces a built-in of the same id.
    pub fn with_configured(configs: &[BankFormatConfig]) -> Result<Self, BankFormatError> {
        let mut formats: Vec<BankFormat> = builtin_formats().into_iter().collect::<Result<_, _>>()?;
        for cfg in configs {
            let format = BankFormat::try_from(cfg)?;
            formats.retain(|f| f.id != format.id);
            formats.push(format);
        }
        tracing::debug!(count = formats.len(), "bank formats registered");
        Ok(Self::from_formats(formats))
    }

    fn from_formats(formats: Vec<BankFormat>) -> Self {
        let mut index = HashMap::new();
        for (i, f) in formats.iter().enumerate() {
            for alias in &f.aliases {
                index.insert(alias.clone(), i);
            }
        }
        // Ids win over aliases of other formats.
        for (i, f) in formats.iter().enumerate() {
            index.insert(f.id.clone(), i);
        }
        let default_idx = index.get(DEFAULT_BANK).copied().unwrap_or(0);
        Self {
            formats,
            index,
            default_idx,
        }
    }

    /// Looks up a format, returning `None` for unknown ids.
    pub fn find(&self, bank: &str) -> Option<&BankFormat> {
        self.index.get(&normalize_id(bank)).map(|&i| &self.formats[i])
    }

    /// Looks up a format; unknown ids fall back to `default`.
    pub fn get(&self, bank: &str) -> &BankFormat {
        self.find(bank).unwrap_or_else(|| {
            tracing::debug!(bank, "unknown bank, using default format");
            &self.formats[self.default_idx]
        })
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.formats.iter().map(|f| f.id.as_str())
    }
}

impl Default for BankRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

fn builtin_formats() -> Vec<Result<BankFormat, BankFormatError>> {
    vec![
        BankFormat::new("commbank", COMMBANK_PATTERN)
            .map(|f| f.with_aliases(["commonwealth", "cba"])),
        BankFormat::new(DEFAULT_BANK, DEFAULT_PATTERN),
    ]
}
