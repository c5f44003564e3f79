//! PlanDataBundle and report categories

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use super::records::{Annotation, FlightLog, Imagery, Measurement};

/// One of the four data kinds a user may include in a report
///
/// Variant order is the fixed rendering order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Category {
    FlightLogs,
    Measurements,
    Annotations,
    Imagery,
}

impl Category {
    /// All categories in rendering order
    pub const ALL: [Category; 4] = [
        Category::FlightLogs,
        Category::Measurements,
        Category::Annotations,
        Category::Imagery,
    ];

    /// Identifier used on the wire and in the CLI
    pub fn id(&self) -> &'static str {
        match self {
            Self::FlightLogs => "flightLogs",
            Self::Measurements => "measurements",
            Self::Annotations => "annotations",
            Self::Imagery => "imagery",
        }
    }

    /// Display name
    pub fn name(&self) -> &'static str {
        match self {
            Self::FlightLogs => "Flight Logs",
            Self::Measurements => "Measurements",
            Self::Annotations => "Annotations",
            Self::Imagery => "Imagery",
        }
    }

    /// One-line description for the explore step
    pub fn description(&self) -> &'static str {
        match self {
            Self::FlightLogs => "Flight data including duration, altitude, and coverage",
            Self::Measurements => "Area, volume, and distance calculations",
            Self::Annotations => "Markers, polygons, and site annotations",
            Self::Imagery => "Orthomosaics, 3D models, and high-res imagery",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.id())
    }
}

/// Error for unrecognized category names
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown category '{0}'. Expected one of: flightLogs, measurements, annotations, imagery")]
pub struct ParseCategoryError(pub String);

impl FromStr for Category {
    type Err = ParseCategoryError;

    /// Accepts the wire id plus a few loose spellings ("flight-logs", "flights")
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .trim()
            .chars()
            .filter(|c| !matches!(c, '-' | '_' | ' '))
            .collect::<String>()
            .to_lowercase();
        debug!(input = %s, %normalized, "Category::from_str: called");
        match normalized.as_str() {
            "flightlogs" | "flightlog" | "flights" | "flight" => Ok(Self::FlightLogs),
            "measurements" | "measurement" => Ok(Self::Measurements),
            "annotations" | "annotation" => Ok(Self::Annotations),
            "imagery" | "images" => Ok(Self::Imagery),
            _ => Err(ParseCategoryError(s.to_string())),
        }
    }
}

/// All site records for one plan
///
/// Every list is always present (possibly empty); the provider JSON must
/// carry all four keys.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanDataBundle {
    pub flight_logs: Vec<FlightLog>,
    pub measurements: Vec<Measurement>,
    pub annotations: Vec<Annotation>,
    pub imagery: Vec<Imagery>,
}

impl PlanDataBundle {
    /// Number of records in a category
    pub fn count(&self, category: Category) -> usize {
        match category {
            Category::FlightLogs => self.flight_logs.len(),
            Category::Measurements => self.measurements.len(),
            Category::Annotations => self.annotations.len(),
            Category::Imagery => self.imagery.len(),
        }
    }

    /// Categories with at least one record, in rendering order
    pub fn non_empty_categories(&self) -> Vec<Category> {
        Category::ALL.into_iter().filter(|c| self.count(*c) > 0).collect()
    }

    /// True when every category is empty
    pub fn is_empty(&self) -> bool {
        Category::ALL.iter().all(|c| self.count(*c) == 0)
    }
}
