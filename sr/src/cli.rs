//! CLI command definitions and subcommands

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::debug;

use crate::config::LlmConfig;
use crate::domain::Category;

/// SiteReport - AI site reports for drone survey plans
#[derive(Parser)]
#[command(
    name = "sr",
    about = "Generate AI site reports from drone survey plan data",
    version = env!("CARGO_PKG_VERSION"),
)]
pub struct Cli {
    /// Path to config file
    #[arg(long, global = true, help = "Path to config file")]
    pub config: Option<PathBuf>,

    /// Log level (TRACE, DEBUG, INFO, WARN, ERROR)
    #[arg(
        short = 'l',
        long = "log-level",
        global = true,
        help = "Log level (TRACE, DEBUG, INFO, WARN, ERROR)"
    )]
    pub log_level: Option<String>,

    /// Synthesize reports locally instead of calling the LLM endpoint
    #[arg(long, global = true)]
    pub mock: bool,

    /// Subcommand to execute; the interactive wizard when omitted
    #[command(subcommand)]
    pub command: Option<Command>,
}

/// CLI subcommands
#[derive(Debug, Subcommand)]
pub enum Command {
    /// List survey plans
    Plans {
        /// Only plans whose name or location contains TEXT
        #[arg(short, long, value_name = "TEXT")]
        search: Option<String>,

        /// Output format
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,
    },

    /// Show a plan's site data
    Show {
        /// Plan ID (e.g. plan_001)
        plan_id: String,

        /// Output format
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,
    },

    /// Print the data section of the report prompt
    Prompt {
        /// Plan ID (e.g. plan_001)
        plan_id: String,

        /// Include only these categories (repeatable; default: all with data)
        #[arg(short = 'c', long = "category", value_name = "CATEGORY")]
        categories: Vec<Category>,
    },

    /// Generate a report without the wizard
    Report {
        /// Plan ID (e.g. plan_001)
        plan_id: String,

        /// Include only these categories (repeatable; default: all with data)
        #[arg(short = 'c', long = "category", value_name = "CATEGORY")]
        categories: Vec<Category>,

        /// Write the report text to PATH instead of stdout
        #[arg(short, long, value_name = "PATH")]
        output: Option<PathBuf>,
    },
}

/// Get the log file path
pub fn get_log_path() -> PathBuf {
    debug!("get_log_path: called");
    let path = dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("sitereport")
        .join("logs")
        .join("sitereport.log");
    debug!(?path, "get_log_path: returning path");
    path
}

/// Generate the after_help text with credential status and log location
pub fn generate_after_help() -> String {
    debug!("generate_after_help: called");
    let llm = LlmConfig::default();
    let key_set = llm.api_key().is_ok();

    let mut help = String::new();

    help.push_str("Credentials:\n");
    let icon = if key_set { "\u{2705}" } else { "\u{274C}" };
    let status = if key_set { "set" } else { "not set (use --mock for offline reports)" };
    help.push_str(&format!("  {} {:<14} {}\n", icon, llm.api_key_env, status));

    help.push('\n');
    help.push_str("Categories: flightLogs, measurements, annotations, imagery\n");

    help.push('\n');
    help.push_str(&format!("Logs are written to: {}\n", get_log_path().display()));

    help
}

/// Output format for listing commands
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        debug!(%s, "OutputFormat::from_str: called");
        match s.to_lowercase().as_str() {
            "text" | "plain" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            _ => Err(format!("Unknown format: {}. Use: text or json", s)),
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Text => write!(f, "text"),
            Self::Json => write!(f, "json"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parse_no_command() {
        let cli = Cli::parse_from(["sr"]);
        assert!(cli.command.is_none());
        assert!(!cli.mock);
    }

    #[test]
    fn test_cli_parse_plans_with_search() {
        let cli = Cli::parse_from(["sr", "plans", "--search", "austin", "--format", "json"]);
        match cli.command {
            Some(Command::Plans { search, format }) => {
                assert_eq!(search.as_deref(), Some("austin"));
                assert_eq!(format, OutputFormat::Json);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_cli_parse_report_categories() {
        let cli = Cli::parse_from([
            "sr",
            "report",
            "plan_001",
            "-c",
            "measurements",
            "--category",
            "flight-logs",
            "--mock",
        ]);
        assert!(cli.mock);
        match cli.command {
            Some(Command::Report {
                plan_id,
                categories,
                output,
            }) => {
                assert_eq!(plan_id, "plan_001");
                assert_eq!(categories, vec![Category::Measurements, Category::FlightLogs]);
                assert!(output.is_none());
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_cli_rejects_unknown_category() {
        let result = Cli::try_parse_from(["sr", "prompt", "plan_001", "-c", "weather"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_cli_parse_global_flags() {
        let cli = Cli::parse_from(["sr", "show", "plan_002", "-l", "debug", "--config", "x.yml"]);
        assert_eq!(cli.log_level.as_deref(), Some("debug"));
        assert_eq!(cli.config, Some(PathBuf::from("x.yml")));
    }

    #[test]
    fn test_cli_definition_is_consistent() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn test_cli_config_and_category_together() {
        let cli = Cli::parse_from(["sr", "--config", "x.yml", "prompt", "plan_001", "-c", "imagery"]);
        assert_eq!(cli.config, Some(PathBuf::from("x.yml")));
        match cli.command {
            Some(Command::Prompt { categories, .. }) => assert_eq!(categories, vec![Category::Imagery]),
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_output_format_from_str() {
        assert_eq!("JSON".parse::<OutputFormat>().unwrap(), OutputFormat::Json);
        assert_eq!("plain".parse::<OutputFormat>().unwrap(), OutputFormat::Text);
        assert!("table".parse::<OutputFormat>().is_err());
    }

    #[test]
    fn test_log_path() {
        assert!(get_log_path().ends_with("sitereport/logs/sitereport.log"));
    }
}
