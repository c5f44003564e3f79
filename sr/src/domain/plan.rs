//! Plan domain type
//!
//! A single drone survey project as listed by the catalog.

use serde::{Deserialize, Serialize};
use tracing::debug;

/// Immutable catalog entry for a survey plan
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Plan {
    /// Unique identifier (e.g. "plan_001")
    pub id: String,

    /// Display name
    pub name: String,

    /// Survey date as reported by the provider (YYYY-MM-DD)
    pub date: String,

    /// Human-readable site location
    pub location: String,

    /// Provider status string (e.g. "completed")
    pub status: String,
}

impl Plan {
    /// Create a new plan entry
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        date: impl Into<String>,
        location: impl Into<String>,
        status: impl Into<String>,
    ) -> Self {
        let id = id.into();
        debug!(%id, "Plan::new: called");
        Self {
            id,
            name: name.into(),
            date: date.into(),
            location: location.into(),
            status: status.into(),
        }
    }

    /// Case-insensitive substring match on name or location
    ///
    /// An empty (or whitespace-only) query matches every plan.
    pub fn matches(&self, query: &str) -> bool {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return true;
        }
        self.name.to_lowercase().contains(&needle) || self.location.to_lowercase().contains(&needle)
    }
}

impl std::fmt::Display for Plan {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.name, self.id)
    }
}
