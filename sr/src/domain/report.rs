//! GeneratedReport domain type

use serde::{Deserialize, Serialize};

/// Which path produced the report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ReportMode {
    /// Text came from the LLM endpoint
    #[default]
    Network,
    /// Text was synthesized offline from the bundle
    Offline,
}

/// How the summary and recommendations were obtained
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SummarySource {
    /// Parsed from a JSON object in the summary response
    #[default]
    Structured,
    /// First line plus bullet lines of an unstructured response
    Extracted,
}

/// A narrative report for one plan
///
/// Derived, never persisted; lives only as long as the session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratedReport {
    /// Full Markdown report
    pub text: String,

    /// Short executive summary
    pub summary: String,

    /// Key recommendations
    pub recommendations: Vec<String>,

    pub summary_source: SummarySource,

    pub mode: ReportMode,

    /// The model stopped at its token limit, so the text may end early
    #[serde(default)]
    pub truncated: bool,
}
