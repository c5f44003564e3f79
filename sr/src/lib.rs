//! SiteReport - AI site reports for drone survey plans
//!
//! SiteReport turns the site data of a drone survey plan (flight logs,
//! measurements, annotations and imagery) into a professional Markdown
//! report, either through an OpenAI-compatible chat completions endpoint or
//! with a deterministic offline composer.
//!
//! # Core Concepts
//!
//! - **Catalog**: read-only source of plans and their data bundles
//! - **Composer**: renders a bundle into a prompt, then into a report
//! - **Workflow**: the Select -> Explore -> Generate -> View session
//! - **Export**: clipboard, Markdown download, share link
//!
//! # Modules
//!
//! - [`domain`] - Plan, record, bundle and report types
//! - [`catalog`] - PlanCatalog trait and the in-memory catalog
//! - [`llm`] - LLM client trait and OpenAI-compatible implementation
//! - [`prompts`] - Handlebars prompt templates
//! - [`composer`] - Report generation (network and offline)
//! - [`workflow`] - Session state machine
//! - [`export`] - Report export actions
//! - [`wizard`] - Interactive terminal wizard
//! - [`config`] - Configuration types and loading
//! - [`cli`] - Command-line interface

pub mod catalog;
pub mod cli;
pub mod composer;
pub mod config;
pub mod domain;
pub mod export;
pub mod llm;
pub mod prompts;
pub mod wizard;
pub mod workflow;

// Re-export commonly used types
pub use catalog::{CatalogError, InMemoryCatalog, PlanCatalog, filter_plans, open_catalog};
pub use composer::{
    ComposeError, LlmReportComposer, OfflineComposer, REPORT_SECTIONS, ReportComposer, compose_prompt,
    create_composer, generate_mock_report,
};
pub use config::{CatalogConfig, Config, ExportConfig, LlmConfig};
pub use domain::{Category, GeneratedReport, Plan, PlanDataBundle, ReportMode, SummarySource};
pub use export::ExportError;
pub use llm::{CompletionRequest, CompletionResponse, LlmClient, LlmError, OpenAIClient, create_client};
pub use workflow::{GenerationJob, SessionState, Step, WorkflowController, WorkflowError};
