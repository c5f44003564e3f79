//! SiteReport - AI site reports for drone survey plans
//!
//! CLI entry point: the interactive wizard plus non-interactive commands.

use std::collections::BTreeSet;
use std::fs;
use std::path::PathBuf;

use clap::{CommandFactory, FromArgMatches};
use colored::Colorize;
use eyre::{Context, Result};
use tracing::{debug, info};

use sitereport::catalog::open_catalog;
use sitereport::cli::{Cli, Command, OutputFormat, generate_after_help, get_log_path};
use sitereport::composer::{compose_prompt, create_composer};
use sitereport::config::Config;
use sitereport::domain::{Category, Plan};
use sitereport::wizard;
use sitereport::workflow::WorkflowController;

fn setup_logging(cli_log_level: Option<&str>, config_log_level: Option<&str>) -> Result<()> {
    // Note: Can't log params here since logging isn't initialized yet
    let log_path = get_log_path();
    let log_dir = log_path.parent().map(PathBuf::from).unwrap_or_else(|| PathBuf::from("."));

    fs::create_dir_all(&log_dir).context("Failed to create log directory")?;

    // Determine log level with priority: CLI --log-level > config file > default (INFO)
    let level = match cli_log_level.or(config_log_level) {
        Some(s) => match s.to_uppercase().as_str() {
            "TRACE" => tracing::Level::TRACE,
            "DEBUG" => tracing::Level::DEBUG,
            "INFO" => tracing::Level::INFO,
            "WARN" | "WARNING" => tracing::Level::WARN,
            "ERROR" => tracing::Level::ERROR,
            _ => {
                eprintln!("Warning: Unknown log-level '{}', defaulting to INFO", s);
                tracing::Level::INFO
            }
        },
        None => tracing::Level::INFO,
    };

    let log_file = fs::File::create(&log_path).context("Failed to create log file")?;

    tracing_subscriber::fmt()
        .with_writer(log_file)
        .with_ansi(false)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()))
        .init();

    info!("Logging initialized (level: {:?})", level);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    // Build command with dynamic after_help that shows credential status
    let cmd = Cli::command().after_help(generate_after_help());
    let cli = Cli::from_arg_matches(&cmd.get_matches())?;

    // Load log level from config file early (before full config load)
    let config_log_level = Config::load_log_level(cli.config.as_ref());

    setup_logging(cli.log_level.as_deref(), config_log_level.as_deref()).context("Failed to setup logging")?;

    let config = Config::load(cli.config.as_ref()).context("Failed to load configuration")?;
    info!(model = %config.llm.model, catalog = %config.catalog.source, mock = cli.mock, "SiteReport loaded config");

    debug!(command = ?cli.command, "main: dispatching command");
    match cli.command {
        Some(Command::Plans { search, format }) => cmd_plans(&config, search.as_deref(), format).await,
        Some(Command::Show { plan_id, format }) => cmd_show(&config, &plan_id, format).await,
        Some(Command::Prompt { plan_id, categories }) => cmd_prompt(&config, &plan_id, &categories).await,
        Some(Command::Report {
            plan_id,
            categories,
            output,
        }) => cmd_report(&config, cli.mock, &plan_id, &categories, output).await,
        None => {
            debug!("main: no command specified, launching wizard");
            wizard::run_interactive(&config, cli.mock).await
        }
    }
}

fn print_plan_line(plan: &Plan) {
    println!(
        "{:<10} {:<28} {:<20} {} {}",
        plan.id,
        plan.name,
        plan.location,
        plan.date,
        plan.status.dimmed()
    );
}

/// List plans, optionally filtered
async fn cmd_plans(config: &Config, search: Option<&str>, format: OutputFormat) -> Result<()> {
    debug!(?search, %format, "cmd_plans: called");
    let catalog = open_catalog(&config.catalog).context("Failed to open plan catalog")?;
    let plans = sitereport::catalog::filter_plans(&catalog.list_plans().await, search.unwrap_or(""));

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&plans)?),
        OutputFormat::Text => {
            if plans.is_empty() {
                println!("No plans found.");
            }
            for plan in &plans {
                print_plan_line(plan);
            }
        }
    }
    Ok(())
}

/// Show one plan and its site data
async fn cmd_show(config: &Config, plan_id: &str, format: OutputFormat) -> Result<()> {
    debug!(%plan_id, %format, "cmd_show: called");
    let catalog = open_catalog(&config.catalog).context("Failed to open plan catalog")?;
    let plan = catalog.get_plan(plan_id).await?;
    let bundle = catalog.get_plan_data(plan_id).await?;

    match format {
        OutputFormat::Json => {
            let value = serde_json::json!({ "plan": plan, "data": bundle });
            println!("{}", serde_json::to_string_pretty(&value)?);
        }
        OutputFormat::Text => {
            println!("{} ({})", plan.name.bold(), plan.id);
            println!("{} - {} - {}", plan.location, plan.date, plan.status);
            println!();
            for category in Category::ALL {
                println!("  {:14} {:>3}", category.name(), bundle.count(category));
            }
            let data = compose_prompt(&bundle, &BTreeSet::new());
            if !data.is_empty() {
                println!();
                println!("{}", data);
            }
        }
    }
    Ok(())
}

/// Print the rendered category sections
async fn cmd_prompt(config: &Config, plan_id: &str, categories: &[Category]) -> Result<()> {
    debug!(%plan_id, ?categories, "cmd_prompt: called");
    let catalog = open_catalog(&config.catalog).context("Failed to open plan catalog")?;
    let bundle = catalog.get_plan_data(plan_id).await?;
    let selected: BTreeSet<Category> = categories.iter().copied().collect();
    println!("{}", compose_prompt(&bundle, &selected));
    Ok(())
}

/// Run the workflow non-interactively and print or write the report
async fn cmd_report(
    config: &Config,
    offline: bool,
    plan_id: &str,
    categories: &[Category],
    output: Option<PathBuf>,
) -> Result<()> {
    debug!(%plan_id, ?categories, %offline, ?output, "cmd_report: called");
    let catalog = open_catalog(&config.catalog).context("Failed to open plan catalog")?;
    let composer = create_composer(config, offline).context("Failed to create report composer")?;
    let mut workflow = WorkflowController::new(catalog, composer);

    workflow.select_plan(plan_id).await?;
    let selected: BTreeSet<Category> = categories.iter().copied().collect();
    for category in selected {
        workflow.toggle_category(category)?;
    }
    workflow.generate().await?;

    let report = workflow
        .report()
        .ok_or_else(|| eyre::eyre!("Report generation finished without a report"))?;

    match output {
        Some(path) => {
            fs::write(&path, report.text.as_bytes()).context(format!("Failed to write {}", path.display()))?;
            eprintln!("Report written to {}", path.display());
        }
        None => println!("{}", report.text),
    }

    if report.truncated {
        eprintln!("{}", "Warning: report reached the token limit and may be incomplete".yellow());
    }
    eprintln!();
    eprintln!("{} {}", "Summary:".bright_cyan(), report.summary);
    for rec in &report.recommendations {
        eprintln!("  - {}", rec);
    }
    Ok(())
}
