//! Report composition
//!
//! Turns a plan's [`PlanDataBundle`] into a prompt and then into a
//! [`GeneratedReport`]. Two implementations of [`ReportComposer`] exist:
//!
//! - [`LlmReportComposer`] - sends the prompt to an OpenAI-compatible endpoint
//! - [`OfflineComposer`] - synthesizes the report locally from the bundle
//!
//! Both produce the same six section headers, so callers never need to know
//! which one ran.

use std::collections::BTreeSet;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;
use tracing::debug;

use crate::config::Config;
use crate::domain::{Category, GeneratedReport, PlanDataBundle};
use crate::llm::{LlmError, create_client};
use crate::prompts::PromptLoader;

mod llm;
mod offline;
mod prompt;
mod summary;

pub use llm::LlmReportComposer;
pub use offline::{OfflineComposer, generate_mock_report};
pub use prompt::{compose_prompt, included_categories, report_structure};
pub use summary::{SummaryExtraction, extract_fallback, parse_summary};

/// Required report sections, in order
pub const REPORT_SECTIONS: [&str; 6] = [
    "Executive Summary",
    "Flight Data Analysis",
    "Key Measurements & Findings",
    "Site Annotations & Markers",
    "Imagery Quality Assessment",
    "Recommendations & Next Steps",
];

/// Section names from [`REPORT_SECTIONS`] that do not appear in `text`
pub fn missing_sections(text: &str) -> Vec<&'static str> {
    REPORT_SECTIONS.iter().copied().filter(|s| !text.contains(s)).collect()
}

/// Errors from report generation
#[derive(Debug, Error)]
pub enum ComposeError {
    /// Credential for the endpoint is missing; nothing was sent
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Endpoint answered with a non-success status
    #[error("Upstream error {status}: {message}")]
    Upstream { status: u16, message: String },

    #[error("Report request timed out after {0:?}")]
    Timeout(Duration),

    #[error("Report request failed: {0}")]
    Request(#[source] LlmError),

    #[error("Prompt template error: {0}")]
    Template(String),
}

impl ComposeError {
    /// HTTP status for upstream failures
    pub fn status(&self) -> Option<u16> {
        match self {
            ComposeError::Upstream { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<LlmError> for ComposeError {
    fn from(e: LlmError) -> Self {
        match e {
            LlmError::MissingApiKey { .. } | LlmError::UnknownProvider(_) => ComposeError::Configuration(e.to_string()),
            LlmError::ApiError { status, message } => ComposeError::Upstream { status, message },
            LlmError::Timeout(d) => ComposeError::Timeout(d),
            other => ComposeError::Request(other),
        }
    }
}

/// Produces a report for a plan's data
///
/// `selected` empty means every non-empty category.
#[async_trait]
pub trait ReportComposer: Send + Sync {
    async fn generate_report(
        &self,
        plan_name: &str,
        plan_id: &str,
        bundle: &PlanDataBundle,
        selected: &BTreeSet<Category>,
    ) -> Result<GeneratedReport, ComposeError>;
}

/// Build the composer for this run
///
/// `offline` selects [`OfflineComposer`]; otherwise an LLM client is built
/// from `config.llm` and prompts may be overridden from the working directory.
pub fn create_composer(config: &Config, offline: bool) -> Result<Arc<dyn ReportComposer>, ComposeError> {
    debug!(%offline, provider = %config.llm.provider, "create_composer: called");
    if offline {
        return Ok(Arc::new(OfflineComposer::new()));
    }

    let client = create_client(&config.llm)?;
    let root = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    Ok(Arc::new(LlmReportComposer::new(client, PromptLoader::new(root), &config.llm)))
}
