//! Prompt rendering for category data

use std::collections::BTreeSet;

use tracing::debug;

use super::REPORT_SECTIONS;
use crate::domain::{Category, PlanDataBundle};

/// Categories that will appear in a prompt, in fixed order
///
/// Empty selection means all; zero-record categories never appear.
pub fn included_categories(bundle: &PlanDataBundle, selected: &BTreeSet<Category>) -> Vec<Category> {
    Category::ALL
        .into_iter()
        .filter(|c| selected.is_empty() || selected.contains(c))
        .filter(|c| bundle.count(*c) > 0)
        .collect()
}

fn render_section(bundle: &PlanDataBundle, category: Category) -> String {
    let (title, lines): (&str, Vec<String>) = match category {
        Category::FlightLogs => (
            "Flight Data",
            bundle
                .flight_logs
                .iter()
                .map(|log| {
                    format!(
                        "- Flight {}: {}, Duration: {}, Altitude: {}, Coverage: {}",
                        log.id, log.date, log.duration, log.altitude, log.coverage
                    )
                })
                .collect(),
        ),
        Category::Measurements => (
            "Measurements",
            bundle
                .measurements
                .iter()
                .map(|m| {
                    let desc = m.description.as_deref().map(|d| format!(" ({})", d)).unwrap_or_default();
                    format!("- {}: {}{}", m.kind.as_str().to_uppercase(), m.value, desc)
                })
                .collect(),
        ),
        Category::Annotations => (
            "Annotations",
            bundle
                .annotations
                .iter()
                .map(|a| format!("- {}: {}", a.kind.as_str().to_uppercase(), a.description))
                .collect(),
        ),
        Category::Imagery => (
            "Imagery",
            bundle
                .imagery
                .iter()
                .map(|img| format!("- {}: {} ({})", img.kind.as_str().to_uppercase(), img.quality_label(), img.date))
                .collect(),
        ),
    };

    format!("## {}\n{}", title, lines.join("\n"))
}

/// Render the selected categories of a bundle as Markdown sections
///
/// Sections are separated by a blank line; records keep catalog order.
pub fn compose_prompt(bundle: &PlanDataBundle, selected: &BTreeSet<Category>) -> String {
    let categories = included_categories(bundle, selected);
    debug!(?selected, ?categories, "compose_prompt: called");
    categories
        .into_iter()
        .map(|c| render_section(bundle, c))
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Numbered list of the required report sections
pub fn report_structure() -> String {
    REPORT_SECTIONS
        .iter()
        .enumerate()
        .map(|(i, s)| format!("{}. {}", i + 1, s))
        .collect::<Vec<_>>()
        .join("\n")
}
