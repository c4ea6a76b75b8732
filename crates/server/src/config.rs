use anyhow::Context;
use ozbooks_import::{BankFormatConfig, BankFormatError, BankRegistry, RuleSet};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::str::FromStr;

pub const CONFIG_ENV: &str = "OZBOOKS_CONFIG";
pub const DEFAULT_CONFIG_PATH: &str = "ozbooks.toml";

/// Slack on top of the file payloads for multipart framing and form fields.
const MULTIPART_OVERHEAD_BYTES: usize = 64 * 1024;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Bunyan,
}

impl FromStr for LogFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pretty" => Ok(LogFormat::Pretty),
            "bunyan" | "json" => Ok(LogFormat::Bunyan),
            other => anyhow::bail!("Unknown log format '{other}' (expected pretty or bunyan)"),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    pub bind: String,
    pub database: PathBuf,
    pub max_connections: u32,
    /// Per-file upload limit.
    pub max_file_bytes: usize,
    pub max_files_per_upload: usize,
    pub allowed_content_types: Vec<String>,
    /// Optional TOML file of `[[rules]]` tried ahead of the built-in category rules.
    pub rules_file: Option<PathBuf>,
    /// Categories shared by every user, created at startup.
    pub system_categories: Vec<String>,
    /// Extra statement formats, `[[banks]]` tables of `{id, pattern, aliases}`.
    pub banks: Vec<BankFormatConfig>,
    pub log_format: LogFormat,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1:8080".to_string(),
            database: PathBuf::from("ozbooks.db"),
            max_connections: ozbooks_storage::DEFAULT_MAX_CONNECTIONS,
            max_file_bytes: 5 * 1024 * 1024,
            max_files_per_upload: 10,
            allowed_content_types: [
                "text/plain",
                "text/csv",
                "application/pdf",
                "application/octet-stream",
            ]
            .into_iter()
            .map(String::from)
            .collect(),
            rules_file: None,
            system_categories: [
                "Housing",
                "Food",
                "Transportation",
                "Income",
                "Investments",
                "Debts",
                "Transfers",
                "Other",
            ]
            .into_iter()
            .map(String::from)
            .collect(),
            banks: Vec::new(),
            log_format: LogFormat::Pretty,
        }
    }
}

impl Config {
    /// Reads `$OZBOOKS_CONFIG` (or `ozbooks.toml` if present), then applies environment
    /// overrides. A missing default file is fine; a missing explicit file is not.
    pub fn load() -> anyhow::Result<Self> {
        let explicit = std::env::var(CONFIG_ENV).ok();
        let path = PathBuf::from(explicit.as_deref().unwrap_or(DEFAULT_CONFIG_PATH));

        let mut config = if path.exists() {
            Self::from_file(&path)?
        } else if explicit.is_some() {
            anyhow::bail!("Config file {} does not exist", path.display());
        } else {
            Self::default()
        };

        config.apply_env(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        Self::from_toml_str(&raw).with_context(|| format!("parsing config {}", path.display()))
    }

    pub fn from_toml_str(raw: &str) -> anyhow::Result<Self> {
        Ok(toml::from_str(raw)?)
    }

    /// Applies `OZBOOKS_BIND`, `OZBOOKS_DATABASE` and `OZBOOKS_LOG_FORMAT` from `get`.
    pub fn apply_env<F>(&mut self, get: F) -> anyhow::Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(bind) = get("OZBOOKS_BIND") {
            self.bind = bind;
        }
        if let Some(db) = get("OZBOOKS_DATABASE") {
            self.database = PathBuf::from(db);
        }
        if let Some(fmt) = get("OZBOOKS_LOG_FORMAT") {
            self.log_format = fmt.parse()?;
        }
        Ok(())
    }

    pub fn bank_registry(&self) -> Result<BankRegistry, BankFormatError> {
        BankRegistry::with_configured(&self.banks)
    }

    pub fn rule_set(&self) -> anyhow::Result<RuleSet> {
        match &self.rules_file {
            Some(path) => {
                let raw = std::fs::read_to_string(path)
                    .with_context(|| format!("reading rules {}", path.display()))?;
                Ok(RuleSet::from_toml(&raw)?)
            }
            None => Ok(RuleSet::builtin()),
        }
    }

    /// Whole-request limit for statement uploads.
    pub fn upload_body_limit(&self) -> usize {
        self.max_file_bytes
            .saturating_mul(self.max_files_per_upload.max(1))
            .saturating_add(MULTIPART_OVERHEAD_BYTES)
    }

    /// Content types are compared without parameters, case-insensitively.
    pub fn is_allowed_content_type(&self, content_type: &str) -> bool {
        let essence = content_type
            .split(';')
            .next()
            .unwrap_or_default()
            .trim()
            .to_lowercase();
        self.allowed_content_types
            .iter()
            .any(|allowed| allowed.eq_ignore_ascii_case(&essence))
    }
}
