//! Offline report synthesis
//!
//! Builds a report from simple arithmetic over the bundle and templated
//! prose, without any network call. Section headers match the LLM path.

use std::collections::BTreeSet;

use async_trait::async_trait;
use chrono::NaiveDate;
use tracing::debug;

use super::{ComposeError, REPORT_SECTIONS, ReportComposer};
use crate::domain::{Category, GeneratedReport, PlanDataBundle, ReportMode, SummarySource};

const RECOMMENDATIONS: [&str; 5] = [
    "Continue monitoring construction progress weekly",
    "Consider additional flights for detailed 3D modeling",
    "Update safety protocols based on current site conditions",
    "Document all measurements for future reference",
    "Maintain regular quality checks on imagery data",
];

/// Mean of the parsed values, None for an empty list
fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        None
    } else {
        Some(values.iter().sum::<f64>() / values.len() as f64)
    }
}

fn is_wanted(selected: &BTreeSet<Category>, category: Category) -> bool {
    selected.is_empty() || selected.contains(&category)
}

fn section_lines(bundle: &PlanDataBundle, category: Category, selected: &BTreeSet<Category>) -> String {
    if !is_wanted(selected, category) {
        return "- Not included in this report".to_string();
    }
    if bundle.count(category) == 0 {
        return "- No data available".to_string();
    }

    let lines: Vec<String> = match category {
        Category::Measurements => bundle
            .measurements
            .iter()
            .map(|m| {
                let desc = m.description.as_deref().map(|d| format!(" - {}", d)).unwrap_or_default();
                format!("- **{}**: {}{}", m.kind.as_str().to_uppercase(), m.value, desc)
            })
            .collect(),
        Category::Annotations => bundle
            .annotations
            .iter()
            .map(|a| format!("- **{}**: {}", a.kind.as_str().to_uppercase(), a.description))
            .collect(),
        Category::Imagery => bundle
            .imagery
            .iter()
            .map(|img| format!("- **{}**: {} - {}", img.kind.as_str().to_uppercase(), img.quality_label(), img.date))
            .collect(),
        Category::FlightLogs => Vec::new(),
    };
    lines.join("\n")
}

/// Flight statistics; zero logs still render, with `N/A` averages
fn flight_analysis(bundle: &PlanDataBundle, selected: &BTreeSet<Category>) -> String {
    if !is_wanted(selected, Category::FlightLogs) {
        return "- Not included in this report".to_string();
    }

    let logs = &bundle.flight_logs;
    let altitudes: Vec<f64> = logs.iter().filter_map(|l| l.altitude_meters()).collect();
    let minutes = logs.iter().filter_map(|l| l.duration_minutes()).fold(0.0, |acc, m| acc + m);
    let coverages: Vec<f64> = logs.iter().filter_map(|l| l.coverage_percent()).collect();

    let altitude = mean(&altitudes).map(|a| format!("{}m", a)).unwrap_or_else(|| "N/A".to_string());
    let coverage = mean(&coverages)
        .map(|c| format!("{}% average across flights", c))
        .unwrap_or_else(|| "N/A".to_string());

    format!(
        "- **Total Flights**: {} flights completed\n\
         - **Coverage**: {}\n\
         - **Average Altitude**: {}\n\
         - **Total Flight Time**: {} minutes",
        logs.len(),
        coverage,
        altitude,
        minutes
    )
}

/// Synthesize a report without the network
///
/// Deterministic for a given input; `generated_on` is the date printed in
/// the footer. Flight arithmetic with zero logs reports `N/A`.
pub fn generate_mock_report(
    plan_name: &str,
    plan_id: &str,
    bundle: &PlanDataBundle,
    selected: &BTreeSet<Category>,
    generated_on: NaiveDate,
) -> GeneratedReport {
    debug!(%plan_name, %plan_id, ?selected, "generate_mock_report: called");

    let [executive, flights, measurements, annotations, imagery, recommendations] = REPORT_SECTIONS;

    let text = format!(
        "# Site Report for {name}\n\
         \n\
         **Plan ID**: {id}\n\
         \n\
         ## {executive}\n\
         This report provides a comprehensive analysis of the site data collected for {name}. \
         The site shows active construction activity with well-documented measurements and annotations.\n\
         \n\
         ## {flights}\n\
         {flight_body}\n\
         \n\
         ## {measurements}\n\
         {measurement_body}\n\
         \n\
         ## {annotations}\n\
         {annotation_body}\n\
         \n\
         ## {imagery}\n\
         {imagery_body}\n\
         \n\
         ## {recommendations}\n\
         {recommendation_body}\n\
         \n\
         *Report generated on {date}*",
        name = plan_name,
        id = plan_id,
        flight_body = flight_analysis(bundle, selected),
        measurement_body = section_lines(bundle, Category::Measurements, selected),
        annotation_body = section_lines(bundle, Category::Annotations, selected),
        imagery_body = section_lines(bundle, Category::Imagery, selected),
        recommendation_body = RECOMMENDATIONS
            .iter()
            .enumerate()
            .map(|(i, r)| format!("{}. {}", i + 1, r))
            .collect::<Vec<_>>()
            .join("\n"),
        date = generated_on.format("%Y-%m-%d"),
    );

    GeneratedReport {
        text,
        summary: format!(
            "Comprehensive analysis of {} showing {} flights, {} measurements, and {} annotations.",
            plan_name,
            bundle.flight_logs.len(),
            bundle.measurements.len(),
            bundle.annotations.len()
        ),
        recommendations: RECOMMENDATIONS[..3].iter().map(|r| r.to_string()).collect(),
        summary_source: SummarySource::Structured,
        mode: ReportMode::Offline,
        truncated: false,
    }
}

/// [`ReportComposer`] that never touches the network
#[derive(Debug, Clone, Default)]
pub struct OfflineComposer {
    /// Fixed footer date; today's local date when None
    generated_on: Option<NaiveDate>,
}

impl OfflineComposer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pin the footer date (for reproducible output)
    pub fn with_date(generated_on: NaiveDate) -> Self {
        Self {
            generated_on: Some(generated_on),
        }
    }
}

#[async_trait]
impl ReportComposer for OfflineComposer {
    async fn generate_report(
        &self,
        plan_name: &str,
        plan_id: &str,
        bundle: &PlanDataBundle,
        selected: &BTreeSet<Category>,
    ) -> Result<GeneratedReport, ComposeError> {
        let date = self
            .generated_on
            .unwrap_or_else(|| chrono::Local::now().date_naive());
        Ok(generate_mock_report(plan_name, plan_id, bundle, selected, date))
    }
}
