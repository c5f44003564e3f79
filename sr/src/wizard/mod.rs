//! Interactive report wizard
//!
//! Walks a user through the workflow steps in the terminal: search and pick
//! a plan, toggle data categories, generate, then copy, download or share.

mod command;
mod session;

pub use command::{WizardCommand, parse_command, resolve_choice};
pub use session::WizardSession;

use eyre::{Context, Result};
use tracing::{debug, warn};

use crate::catalog::open_catalog;
use crate::composer::create_composer;
use crate::config::Config;
use crate::workflow::WorkflowController;

/// Run the interactive wizard
///
/// This is the entry point for `sr` with no subcommand.
pub async fn run_interactive(config: &Config, offline: bool) -> Result<()> {
    debug!(%offline, "run_interactive: called");
    if !offline {
        if let Err(e) = config.validate() {
            warn!(error = %e, "run_interactive: network reports will fail");
            eprintln!("Warning: {} Use --mock for offline reports.", e);
        }
    }

    let catalog = open_catalog(&config.catalog).context("Failed to open plan catalog")?;
    let composer = create_composer(config, offline).context("Failed to create report composer")?;

    let mut session = WizardSession::new(WorkflowController::new(catalog, composer), config.export.dir.clone());
    session.run().await
}
