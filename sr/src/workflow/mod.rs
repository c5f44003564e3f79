//! Report workflow
//!
//! A four-step sequencer: pick a plan, explore its data, generate a report,
//! view the result. [`WorkflowController`] owns the [`SessionState`] and is
//! the only thing that mutates it.
//!
//! ```text
//! Select --select_plan--> Explore --generate--> Generate --ok--> View
//!   ^                       |  ^                   |              |
//!   +--------back-----------+  +------error--------+              |
//!                              +--------------back----------------+
//! ```

use thiserror::Error;

use crate::catalog::CatalogError;
use crate::composer::ComposeError;

mod controller;
mod session;

pub use controller::{GenerationJob, WorkflowController};
pub use session::SessionState;

/// Workflow step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Step {
    /// Choosing a plan (initial)
    #[default]
    Select,
    /// Plan data loaded, choosing categories
    Explore,
    /// Report generation in flight
    Generate,
    /// Report available for reading and export
    View,
}

impl Step {
    /// Whether `next` is reachable from this step in one transition
    pub fn can_transition_to(&self, next: Step) -> bool {
        matches!(
            (self, next),
            (Step::Select, Step::Explore)
                | (Step::Explore, Step::Generate)
                | (Step::Explore, Step::Select)
                | (Step::Generate, Step::View)
                | (Step::Generate, Step::Explore)
                | (Step::View, Step::Explore)
        )
    }
}

impl std::fmt::Display for Step {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Select => write!(f, "select"),
            Self::Explore => write!(f, "explore"),
            Self::Generate => write!(f, "generate"),
            Self::View => write!(f, "view"),
        }
    }
}

/// Errors from workflow transitions
///
/// Every error leaves the session in its pre-transition step.
#[derive(Debug, Error)]
pub enum WorkflowError {
    /// Report generation is in flight; no input is accepted
    #[error("A report is being generated; please wait")]
    Busy,

    #[error("Cannot {action} while in the {from} step")]
    IllegalTransition { from: Step, action: &'static str },

    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error(transparent)]
    Report(#[from] ComposeError),
}

impl WorkflowError {
    /// Check if the error is an unknown plan id
    pub fn is_not_found(&self) -> bool {
        matches!(self, WorkflowError::Catalog(e) if e.is_not_found())
    }
}
