//! Domain types for SiteReport
//!
//! Core domain types: Plan, the four site record kinds, PlanDataBundle and
//! GeneratedReport. Records deserialize from the survey provider's camelCase
//! JSON shape; enum-typed fields reject unknown kinds at the boundary.

mod bundle;
mod plan;
mod records;
mod report;

pub use bundle::{Category, ParseCategoryError, PlanDataBundle};
pub use plan::Plan;
pub use records::{Annotation, AnnotationKind, FlightLog, Imagery, ImageryKind, Measurement, MeasurementKind};
pub use report::{GeneratedReport, ReportMode, SummarySource};
