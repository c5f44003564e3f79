//! Wizard session: the line-editor loop over a [`WorkflowController`]

use std::io;
use std::path::PathBuf;

use colored::Colorize;
use eyre::Result;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use tracing::debug;

use super::command::{WizardCommand, parse_command, resolve_choice};
use crate::domain::{Category, Plan};
use crate::export;
use crate::workflow::{Step, WorkflowController};

/// Interactive report wizard
pub struct WizardSession {
    workflow: WorkflowController,
    export_dir: PathBuf,
    /// Plans from the last listing, numbered from 1
    listing: Vec<Plan>,
    last_download: Option<PathBuf>,
}

impl WizardSession {
    pub fn new(workflow: WorkflowController, export_dir: PathBuf) -> Self {
        debug!(?export_dir, "WizardSession::new: called");
        Self {
            workflow,
            export_dir,
            listing: Vec::new(),
            last_download: None,
        }
    }

    /// Run the wizard main loop
    pub async fn run(&mut self) -> Result<()> {
        self.print_welcome();
        self.search("").await;

        let mut rl = DefaultEditor::new().map_err(|e| eyre::eyre!("Failed to initialize readline: {}", e))?;

        loop {
            let prompt = format!("{} {} ", self.workflow.step().to_string().dimmed(), ">".bright_green());
            match rl.readline(&prompt) {
                Ok(line) => {
                    let input = line.trim();
                    if input.is_empty() {
                        continue;
                    }
                    let _ = rl.add_history_entry(input);

                    let command = parse_command(self.workflow.step(), input);
                    debug!(?command, "WizardSession::run: parsed input");
                    if command == WizardCommand::Quit {
                        break;
                    }
                    self.handle(command).await;
                }
                Err(ReadlineError::Interrupted) => {
                    println!("^C");
                    continue;
                }
                Err(ReadlineError::Eof) => {
                    println!();
                    break;
                }
                Err(err) => {
                    return Err(eyre::eyre!("Readline error: {}", err));
                }
            }
        }

        println!("Goodbye!");
        Ok(())
    }

    async fn handle(&mut self, command: WizardCommand) {
        match command {
            WizardCommand::Help => self.print_help(),
            WizardCommand::Quit => {}
            WizardCommand::Search(query) => {
                if self.workflow.step() == Step::Select {
                    self.search(&query).await;
                } else {
                    println!("{} Go {} to the plan list to search", "?".yellow(), "back".yellow());
                }
            }
            WizardCommand::Choose(choice) => self.choose(&choice).await,
            WizardCommand::Toggle(category) => match self.workflow.toggle_category(category) {
                Ok(_) => self.print_bundle(),
                Err(e) => print_error(e),
            },
            WizardCommand::BadCategory(name) => {
                println!(
                    "{} Unknown category '{}'. Try one of: {}",
                    "?".yellow(),
                    name,
                    Category::ALL.map(|c| c.id()).join(", ")
                );
            }
            WizardCommand::Generate => self.generate().await,
            WizardCommand::Back => match self.workflow.back() {
                Ok(()) => self.show(),
                Err(e) => print_error(e),
            },
            WizardCommand::Show => self.show(),
            WizardCommand::Copy => self.copy(),
            WizardCommand::Download => self.download(),
            WizardCommand::Share => self.share(),
            WizardCommand::Unknown(input) => {
                println!("{} Unknown command: {}", "?".yellow(), input);
                println!("Type {} for available commands", "/help".yellow());
            }
        }
    }

    async fn search(&mut self, query: &str) {
        self.listing = self.workflow.search_plans(query).await;
        if self.listing.is_empty() {
            println!("{}", "No plans match your search.".dimmed());
            return;
        }

        println!();
        println!("{}", "Plans:".bright_cyan());
        for (i, plan) in self.listing.iter().enumerate() {
            println!(
                "  {:>2}. {} {} {} {}",
                i + 1,
                plan.name.bright_white(),
                format!("({})", plan.id).dimmed(),
                plan.location,
                format!("[{}, {}]", plan.date, plan.status).dimmed()
            );
        }
        println!();
        println!("Enter a number or plan id to explore its data");
    }

    async fn choose(&mut self, choice: &str) {
        let Some(plan_id) = resolve_choice(&self.listing, choice) else {
            println!("{} No plan number {} in the list", "?".yellow(), choice);
            return;
        };

        match self.workflow.select_plan(&plan_id).await {
            Ok(()) => {
                self.last_download = None;
                self.print_bundle();
            }
            Err(e) => print_error(e),
        }
    }

    async fn generate(&mut self) {
        let job = match self.workflow.begin_generation() {
            Ok(job) => job,
            Err(e) => return print_error(e),
        };
        println!("{}", format!("Generating report for {}...", job.plan().name).dimmed());
        let result = job.run().await;
        match self.workflow.finish_generation(result) {
            Ok(()) => self.print_report(),
            Err(e) => {
                print_error(e);
                println!("Adjust categories or try {} again", "generate".yellow());
            }
        }
    }

    fn copy(&self) {
        let Some(report) = self.workflow.report() else {
            return;
        };
        match export::copy_to_clipboard(&mut io::stdout(), &report.text) {
            Ok(()) => println!("{}", "Report copied to clipboard.".green()),
            Err(e) => print_error(e),
        }
    }

    fn download(&mut self) {
        let Some(report) = self.workflow.report() else {
            return;
        };
        let today = chrono::Local::now().date_naive();
        match export::download(report, &self.export_dir, today) {
            Ok(path) => {
                println!("{} {}", "Saved".green(), path.display());
                self.last_download = Some(path);
            }
            Err(e) => print_error(e),
        }
    }

    fn share(&self) {
        let Some(plan) = self.workflow.plan() else {
            return;
        };
        match export::share(&mut io::stdout(), &plan.id, self.last_download.as_deref()) {
            Ok(link) => println!("{} {}", "Link copied to clipboard:".green(), link),
            Err(e) => print_error(e),
        }
    }

    /// Re-print the view for the current step
    fn show(&self) {
        match self.workflow.step() {
            Step::Select => {
                println!();
                println!("{}", "Plans:".bright_cyan());
                for (i, plan) in self.listing.iter().enumerate() {
                    println!("  {:>2}. {} {}", i + 1, plan.name.bright_white(), format!("({})", plan.id).dimmed());
                }
                println!();
            }
            Step::Explore => self.print_bundle(),
            Step::View => self.print_report(),
            Step::Generate => {}
        }
    }

    fn print_bundle(&self) {
        let (Some(plan), Some(bundle)) = (self.workflow.plan(), self.workflow.bundle()) else {
            return;
        };
        let selection = self.workflow.selected_categories();

        println!();
        println!("{} {}", plan.name.bright_cyan().bold(), format!("({})", plan.id).dimmed());
        println!("{} - {}", plan.location, plan.date);
        println!();
        for category in Category::ALL {
            let count = bundle.count(category);
            let mark = if count == 0 {
                "-".dimmed()
            } else if selection.is_empty() || selection.contains(&category) {
                "x".green()
            } else {
                " ".normal()
            };
            println!(
                "  [{}] {:14} {:>3}  {}",
                mark,
                category.name(),
                count,
                category.description().dimmed()
            );
        }
        println!();
        if selection.is_empty() {
            println!("{}", "No categories toggled: every category with data is included.".dimmed());
        }
        println!(
            "Commands: {} {} {}",
            "toggle <category>".yellow(),
            "generate".yellow(),
            "back".yellow()
        );
    }

    fn print_report(&self) {
        let Some(report) = self.workflow.report() else {
            return;
        };
        println!();
        println!("{}", report.text);
        if report.truncated {
            println!("{}", "(report reached the token limit and may be incomplete)".yellow());
        }
        println!();
        println!("{}", "Summary:".bright_cyan());
        println!("  {}", report.summary);
        if !report.recommendations.is_empty() {
            println!("{}", "Recommendations:".bright_cyan());
            for rec in &report.recommendations {
                println!("  - {}", rec);
            }
        }
        println!();
        println!(
            "Commands: {} {} {} {}",
            "copy".yellow(),
            "download".yellow(),
            "share".yellow(),
            "back".yellow()
        );
    }

    fn print_welcome(&self) {
        println!();
        println!("{}", "SiteReport".bright_cyan().bold());
        println!("AI site reports for drone survey plans");
        println!("Type {} for help, {} to quit", "/help".yellow(), "/quit".yellow());
    }

    fn print_help(&self) {
        println!();
        println!("{}", "Anywhere:".bright_cyan());
        println!("  {:20} Show this help", "/help".yellow());
        println!("  {:20} Exit the wizard", "/quit".yellow());
        println!("  {:20} Filter plans by name or location", "/search TEXT".yellow());
        println!();
        println!("{}", "Choosing a plan:".bright_cyan());
        println!("  {:20} Explore a plan from the list", "NUMBER | PLAN_ID".yellow());
        println!();
        println!("{}", "Exploring data:".bright_cyan());
        println!("  {:20} Include or exclude a category", "toggle CATEGORY".yellow());
        println!("  {:20} Generate the report", "generate".yellow());
        println!("  {:20} Back to the plan list", "back".yellow());
        println!();
        println!("{}", "Viewing a report:".bright_cyan());
        println!("  {:20} Copy the report to the clipboard", "copy".yellow());
        println!("  {:20} Save as ai-report-DATE.md", "download".yellow());
        println!("  {:20} Copy a link to the report", "share".yellow());
        println!("  {:20} Back to the plan data", "back".yellow());
        println!();
    }
}

fn print_error(e: impl std::fmt::Display) {
    println!("{} {}", "Error:".red(), e);
}
