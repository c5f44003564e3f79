//! Site record types
//!
//! Flight logs, measurements, annotations and imagery belonging to a plan.
//! Quantities stay as the provider's display strings ("45min", "120m");
//! numeric helpers parse the leading number when arithmetic is needed.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::debug;

/// Parse the leading decimal number of a display string ("120m" -> 120.0)
fn leading_number(s: &str) -> Option<f64> {
    let trimmed = s.trim();
    let end = trimmed
        .char_indices()
        .find(|(i, c)| !(c.is_ascii_digit() || *c == '.' || (*i == 0 && *c == '-')))
        .map(|(i, _)| i)
        .unwrap_or(trimmed.len());
    trimmed[..end].parse().ok()
}

/// A single drone flight
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlightLog {
    pub id: String,
    pub date: String,
    /// Flight time, e.g. "45min"
    pub duration: String,
    /// Flight altitude, e.g. "120m"
    pub altitude: String,
    /// Target-area coverage, e.g. "100%"
    pub coverage: String,
}

impl FlightLog {
    /// Altitude in meters, if the display string starts with a number
    pub fn altitude_meters(&self) -> Option<f64> {
        let value = leading_number(&self.altitude);
        debug!(%self.id, altitude = %self.altitude, ?value, "FlightLog::altitude_meters: called");
        value
    }

    /// Duration in minutes, if the display string starts with a number
    pub fn duration_minutes(&self) -> Option<f64> {
        let value = leading_number(&self.duration);
        debug!(%self.id, duration = %self.duration, ?value, "FlightLog::duration_minutes: called");
        value
    }

    /// Coverage percentage, if the display string starts with a number
    pub fn coverage_percent(&self) -> Option<f64> {
        leading_number(&self.coverage)
    }
}

/// Kind of measurement taken on the site model
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MeasurementKind {
    Area,
    Volume,
    Distance,
}

impl MeasurementKind {
    /// Wire name as used by the provider
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Area => "area",
            Self::Volume => "volume",
            Self::Distance => "distance",
        }
    }
}

impl std::fmt::Display for MeasurementKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// An area, volume or distance measurement
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Measurement {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: MeasurementKind,
    /// Value with unit, e.g. "2.5 acres"
    pub value: String,
    /// "lat,lon"
    pub coordinates: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Kind of site annotation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnnotationKind {
    Marker,
    Polygon,
    Line,
}

impl AnnotationKind {
    /// Wire name as used by the provider
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Marker => "marker",
            Self::Polygon => "polygon",
            Self::Line => "line",
        }
    }
}

impl std::fmt::Display for AnnotationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A marker, polygon or line drawn on the site map
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Annotation {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: AnnotationKind,
    pub description: String,
    pub coordinates: String,
    /// Free-form provider properties
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub properties: Option<Map<String, Value>>,
}

/// Kind of processed imagery product
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ImageryKind {
    #[serde(rename = "orthomosaic")]
    Orthomosaic,
    #[serde(rename = "3d_model")]
    Model3d,
    #[serde(rename = "point_cloud")]
    PointCloud,
}

impl ImageryKind {
    /// Wire name as used by the provider
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Orthomosaic => "orthomosaic",
            Self::Model3d => "3d_model",
            Self::PointCloud => "point_cloud",
        }
    }
}

impl std::fmt::Display for ImageryKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// An orthomosaic, 3D model or point cloud
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Imagery {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: ImageryKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resolution: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quality: Option<String>,
    pub date: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

impl Imagery {
    /// Resolution, else quality, else "Standard quality"
    pub fn quality_label(&self) -> &str {
        self.resolution
            .as_deref()
            .or(self.quality.as_deref())
            .unwrap_or("Standard quality")
    }
}
