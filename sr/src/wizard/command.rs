//! Wizard input parsing

use crate::domain::{Category, Plan};
use crate::workflow::Step;

/// One line of wizard input, interpreted for the current step
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WizardCommand {
    Help,
    Quit,
    /// `/search TEXT`; empty text lists every plan
    Search(String),
    /// A list number or plan id typed in Select
    Choose(String),
    Toggle(Category),
    /// `toggle` with a name that is not a category
    BadCategory(String),
    Generate,
    Back,
    /// Re-print the current step's view
    Show,
    Copy,
    Download,
    Share,
    Unknown(String),
}

/// Parse a trimmed, non-empty input line
pub fn parse_command(step: Step, input: &str) -> WizardCommand {
    let mut parts = input.splitn(2, char::is_whitespace);
    let head = parts.next().unwrap_or("");
    let rest = parts.next().unwrap_or("").trim();

    if head.starts_with('/') {
        return match head {
            "/help" | "/h" => WizardCommand::Help,
            "/quit" | "/q" | "/exit" => WizardCommand::Quit,
            "/search" | "/s" => WizardCommand::Search(rest.to_string()),
            _ => WizardCommand::Unknown(head.to_string()),
        };
    }

    match (step, head.to_lowercase().as_str()) {
        (Step::Select, _) => WizardCommand::Choose(input.to_string()),
        (Step::Explore, "toggle" | "t") => match rest.parse::<Category>() {
            Ok(category) => WizardCommand::Toggle(category),
            Err(_) => WizardCommand::BadCategory(rest.to_string()),
        },
        (Step::Explore, "generate" | "g") => WizardCommand::Generate,
        (Step::View, "copy" | "c") => WizardCommand::Copy,
        (Step::View, "download" | "d") => WizardCommand::Download,
        (Step::View, "share") => WizardCommand::Share,
        (Step::Explore | Step::View, "back" | "b") => WizardCommand::Back,
        (Step::Explore | Step::View, "show") => WizardCommand::Show,
        _ => WizardCommand::Unknown(input.to_string()),
    }
}

/// Resolve a Select-step choice to a plan id
///
/// An exact id from the listing wins over a list number, so numeric ids stay
/// selectable. Other text passes through for the catalog to look up. `None`
/// means a list number outside the listing.
pub fn resolve_choice(listing: &[Plan], choice: &str) -> Option<String> {
    if let Some(plan) = listing.iter().find(|p| p.id == choice) {
        return Some(plan.id.clone());
    }
    match choice.parse::<usize>() {
        Ok(n) if (1..=listing.len()).contains(&n) => Some(listing[n - 1].id.clone()),
        Ok(_) => None,
        Err(_) => Some(choice.to_string()),
    }
}
