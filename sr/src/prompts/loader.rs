//! Prompt Loader
//!
//! Loads prompt templates from files or falls back to embedded defaults.

use std::path::{Path, PathBuf};

use eyre::{Result, eyre};
use handlebars::Handlebars;
use serde::Serialize;
use tracing::debug;

use super::embedded;

/// Context for the full-report template
#[derive(Debug, Clone, Serialize)]
pub struct ReportPromptContext {
    pub plan_name: String,
    pub plan_id: String,
    /// Rendered category sections
    pub data_summary: String,
    /// Numbered list of required report sections
    pub structure: String,
}

/// Context for the summary template
#[derive(Debug, Clone, Serialize)]
pub struct SummaryPromptContext {
    /// Full report text to summarize
    pub report: String,
}

/// Loads and renders prompt templates
pub struct PromptLoader {
    /// Handlebars template engine
    hbs: Handlebars<'static>,
    /// User override directory (e.g., `.sitereport/prompts/`)
    user_dir: Option<PathBuf>,
}

impl PromptLoader {
    /// Create a loader that checks `<root>/.sitereport/prompts/` before the embedded prompts
    pub fn new(root: impl AsRef<Path>) -> Self {
        let user_dir = root.as_ref().join(".sitereport").join("prompts");
        let user_dir_exists = user_dir.exists();
        debug!(?user_dir, %user_dir_exists, "PromptLoader::new: called");

        Self {
            hbs: Self::engine(),
            user_dir: if user_dir_exists { Some(user_dir) } else { None },
        }
    }

    /// Create a loader that only uses embedded prompts
    pub fn embedded_only() -> Self {
        debug!("PromptLoader::embedded_only: called");
        Self {
            hbs: Self::engine(),
            user_dir: None,
        }
    }

    /// Prompts are plain text, never HTML: disable escaping
    fn engine() -> Handlebars<'static> {
        let mut hbs = Handlebars::new();
        hbs.register_escape_fn(handlebars::no_escape);
        hbs
    }

    /// Load a template by name
    ///
    /// Checks in order:
    /// 1. User override: `.sitereport/prompts/{name}.pmt`
    /// 2. Embedded fallback
    fn load_template(&self, name: &str) -> Result<String> {
        debug!(%name, "PromptLoader::load_template: called");
        if let Some(ref user_dir) = self.user_dir {
            let path = user_dir.join(format!("{}.pmt", name));
            if path.exists() {
                debug!(?path, "PromptLoader::load_template: found in user override");
                return std::fs::read_to_string(&path)
                    .map_err(|e| eyre!("Failed to read user prompt {}: {}", path.display(), e));
            }
        }

        embedded::get_embedded(name)
            .map(str::to_string)
            .ok_or_else(|| eyre!("Prompt template not found: {}", name))
    }

    /// Render a template with the given context, trailing whitespace trimmed
    pub fn render<T: Serialize>(&self, template_name: &str, context: &T) -> Result<String> {
        debug!(%template_name, "PromptLoader::render: called");
        let template = self.load_template(template_name)?;
        self.hbs
            .render_template(&template, context)
            .map(|s| s.trim_end().to_string())
            .map_err(|e| eyre!("Failed to render template {}: {}", template_name, e))
    }

    /// The system role instruction
    pub fn system_prompt(&self) -> Result<String> {
        debug!("PromptLoader::system_prompt: called");
        self.load_template("system").map(|s| s.trim_end().to_string())
    }
}
