//! SiteReport configuration types and loading

use eyre::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::llm::LlmError;

/// Main SiteReport configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Log level (TRACE, DEBUG, INFO, WARN, ERROR)
    #[serde(rename = "log-level")]
    pub log_level: Option<String>,

    /// LLM provider configuration
    pub llm: LlmConfig,

    /// Plan catalog source
    pub catalog: CatalogConfig,

    /// Report export settings
    pub export: ExportConfig,
}

impl Config {
    /// Validate configuration before use
    ///
    /// Checks that the LLM API key environment variable is set. Only needed
    /// for network report generation; offline mode skips it.
    pub fn validate(&self) -> Result<()> {
        self.llm.api_key()?;
        Ok(())
    }

    /// Load configuration with fallback chain
    pub fn load(config_path: Option<&PathBuf>) -> Result<Self> {
        // If explicit config path provided, try to load it
        if let Some(path) = config_path {
            return Self::load_from_file(path).context(format!("Failed to load config from {}", path.display()));
        }

        // Try project-local config: .sitereport.yml
        let local_config = PathBuf::from(".sitereport.yml");
        if local_config.exists() {
            match Self::load_from_file(&local_config) {
                Ok(config) => return Ok(config),
                Err(e) => {
                    tracing::warn!("Failed to load config from {}: {}", local_config.display(), e);
                }
            }
        }

        // Try user config: ~/.config/sitereport/sitereport.yml
        if let Some(config_dir) = dirs::config_dir() {
            let user_config = config_dir.join("sitereport").join("sitereport.yml");
            if user_config.exists() {
                match Self::load_from_file(&user_config) {
                    Ok(config) => return Ok(config),
                    Err(e) => {
                        tracing::warn!("Failed to load config from {}: {}", user_config.display(), e);
                    }
                }
            }
        }

        // No config file found, use defaults
        tracing::info!("No config file found, using defaults");
        Ok(Self::default())
    }

    /// Read only the log level, before logging is set up
    ///
    /// Errors are swallowed: the full load reports them once logging works.
    pub fn load_log_level(config_path: Option<&PathBuf>) -> Option<String> {
        Self::load(config_path).ok().and_then(|c| c.log_level)
    }

    fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path).context("Failed to read config file")?;

        let config: Self = serde_yaml::from_str(&content).context("Failed to parse config file")?;

        tracing::info!("Loaded config from: {}", path.as_ref().display());
        Ok(config)
    }
}

/// LLM provider configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    /// Provider name (only OpenAI-compatible "openai" is supported)
    pub provider: String,

    /// Model identifier
    pub model: String,

    /// Environment variable containing the API key
    #[serde(rename = "api-key-env")]
    pub api_key_env: String,

    /// API base URL; `/chat/completions` is appended
    #[serde(rename = "base-url")]
    pub base_url: String,

    /// Maximum tokens per response
    #[serde(rename = "max-tokens")]
    pub max_tokens: u32,

    /// Sampling temperature
    pub temperature: f32,

    /// Request timeout in milliseconds
    #[serde(rename = "timeout-ms")]
    pub timeout_ms: u64,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: "openai".to_string(),
            model: "llama3-8b-8192".to_string(),
            api_key_env: "GROQ_API_KEY".to_string(),
            base_url: "https://api.groq.com/openai/v1".to_string(),
            max_tokens: 2000,
            temperature: 0.7,
            timeout_ms: 120_000,
        }
    }
}

impl LlmConfig {
    /// Read the API key from the configured environment variable
    ///
    /// An empty value counts as missing.
    pub fn api_key(&self) -> Result<String, LlmError> {
        match std::env::var(&self.api_key_env) {
            Ok(key) if !key.trim().is_empty() => Ok(key),
            _ => Err(LlmError::MissingApiKey {
                env: self.api_key_env.clone(),
            }),
        }
    }
}

/// Where plans come from
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    /// "builtin" or a path to a JSON catalog file
    pub source: String,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            source: "builtin".to_string(),
        }
    }
}

impl CatalogConfig {
    /// Path of the catalog file, None for the built-in catalog
    pub fn file_path(&self) -> Option<PathBuf> {
        let source = self.source.trim();
        if source.is_empty() || source == "builtin" {
            None
        } else if let Some(rest) = source.strip_prefix("~/") {
            dirs::home_dir().map(|home| home.join(rest))
        } else {
            Some(PathBuf::from(source))
        }
    }
}

/// Report export settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    /// Directory that downloads are written to
    pub dir: PathBuf,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self { dir: PathBuf::from(".") }
    }
}
