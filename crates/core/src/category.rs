use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque id of the authenticated user, issued by the external auth layer.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub String);

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for UserId {
    fn from(s: &str) -> Self {
        UserId(s.to_string())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CategoryId(pub i64);

impl fmt::Display for CategoryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A persisted category. User-owned rows carry `user_id`; system rows are shared by everyone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
    pub user_id: Option<UserId>,
    pub is_system: bool,
    pub parent_category_id: Option<CategoryId>,
}

/// The `(category, subcategory)` pair a transaction is filed under.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CategoryAssignment {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subcategory: Option<String>,
}

impl CategoryAssignment {
    pub const FALLBACK_NAME: &'static str = "Other";
    pub const FALLBACK_SUBCATEGORY: &'static str = "Uncategorized";

    pub fn new(name: &str, subcategory: Option<&str>) -> Self {
        CategoryAssignment {
            name: name.to_string(),
            subcategory: subcategory.map(str::to_string),
        }
    }

    /// Where a transaction goes when no rule claims it.
    pub fn uncategorized() -> Self {
        Self::new(Self::FALLBACK_NAME, Some(Self::FALLBACK_SUBCATEGORY))
    }

    pub fn is_uncategorized(&self) -> bool {
        self.name == Self::FALLBACK_NAME
            && self.subcategory.as_deref() == Some(Self::FALLBACK_SUBCATEGORY)
    }
}

impl fmt::Display for CategoryAssignment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.subcategory {
            Some(sub) => write!(f, "{} / {}", self.name, sub),
            None => write!(f, "{}", self.name),
        }
    }
}
