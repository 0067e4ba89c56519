//! Record types persisted by the store.
//!
//! [`Touchpoint`] is one entry of `touchpoints.json`, [`TouchpointInput`] is
//! what callers submit on create/update, and [`Metadata`] is the contents of
//! `metadata.json`.

use serde::{Deserialize, Serialize};

/// A dated achievement or interaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Touchpoint {
    /// UUID v7 assigned at creation, never reassigned.
    pub id: String,
    /// RFC 3339 UTC creation timestamp, e.g. `2024-06-01T09:30:00Z`.
    pub date: String,
    pub description: String,
    /// Must name a registered category at the time of the write.
    pub category: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub people_involved: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

/// Caller-supplied fields for create and update.
///
/// Absent lists deserialize to `None` and are normalized to empty before
/// anything is persisted.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct TouchpointInput {
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub tags: Option<Vec<String>>,
    #[serde(default)]
    pub people_involved: Option<Vec<String>>,
    #[serde(default)]
    pub url: Option<String>,
}

/// Optional filters for listing touchpoints. Empty strings mean "no filter".
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TouchpointFilter {
    pub category: Option<String>,
    pub tag: Option<String>,
    pub start_date: Option<String>,
}

impl TouchpointFilter {
    pub fn category(&self) -> Option<&str> {
        non_empty(self.category.as_deref())
    }

    pub fn tag(&self) -> Option<&str> {
        non_empty(self.tag.as_deref())
    }

    pub fn start_date(&self) -> Option<&str> {
        non_empty(self.start_date.as_deref())
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

/// The controlled vocabulary touchpoints are validated against.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Metadata {
    #[serde(default)]
    pub categories: Vec<String>,
    #[serde(default)]
    pub tags: Vec<String>,
}

impl Metadata {
    /// Vocabulary written on first start when no metadata file exists.
    pub fn seed() -> Self {
        let categories = [
            "Mentorship",
            "Tools and infrastructure maintenance",
            "Aiding engineering team",
            "Providing engagement guidance and support",
            "Feedbacks I am giving",
            "Feedback I have received",
            "Methodology improvements",
            "Process improvement",
            "Open Source & Community",
            "Knowledge Sharing",
        ];
        let tags = ["go", "docker", "security", "code-review"];
        Self {
            categories: categories.iter().map(|s| s.to_string()).collect(),
            tags: tags.iter().map(|s| s.to_string()).collect(),
        }
    }

    pub fn has_category(&self, name: &str) -> bool {
        self.categories.iter().any(|c| c == name)
    }

    pub fn has_tag(&self, name: &str) -> bool {
        self.tags.iter().any(|t| t == name)
    }
}
