//! WorkflowController - drives the session through its steps

use std::collections::BTreeSet;
use std::sync::Arc;

use tracing::{debug, info, warn};

use super::{SessionState, Step, WorkflowError};
use crate::catalog::{PlanCatalog, filter_plans};
use crate::composer::{ComposeError, ReportComposer};
use crate::domain::{Category, GeneratedReport, Plan, PlanDataBundle};

/// A report generation detached from the controller
///
/// Produced by [`WorkflowController::begin_generation`]; the controller
/// stays in [`Step::Generate`] until the result is handed back through
/// [`WorkflowController::finish_generation`].
pub struct GenerationJob {
    composer: Arc<dyn ReportComposer>,
    plan: Plan,
    bundle: PlanDataBundle,
    selection: BTreeSet<Category>,
}

impl GenerationJob {
    pub fn plan(&self) -> &Plan {
        &self.plan
    }

    /// Run the composer; may be awaited without borrowing the controller
    pub async fn run(&self) -> Result<GeneratedReport, ComposeError> {
        debug!(plan_id = %self.plan.id, selection = ?self.selection, "GenerationJob::run: called");
        self.composer
            .generate_report(&self.plan.name, &self.plan.id, &self.bundle, &self.selection)
            .await
    }
}

/// Owns the session state and applies transitions
pub struct WorkflowController {
    catalog: Arc<dyn PlanCatalog>,
    composer: Arc<dyn ReportComposer>,
    state: SessionState,
}

impl WorkflowController {
    pub fn new(catalog: Arc<dyn PlanCatalog>, composer: Arc<dyn ReportComposer>) -> Self {
        debug!("WorkflowController::new: called");
        Self {
            catalog,
            composer,
            state: SessionState::new(),
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn step(&self) -> Step {
        self.state.step
    }

    pub fn plan(&self) -> Option<&Plan> {
        self.state.plan.as_ref()
    }

    pub fn bundle(&self) -> Option<&PlanDataBundle> {
        self.state.bundle.as_ref()
    }

    pub fn report(&self) -> Option<&GeneratedReport> {
        self.state.report.as_ref()
    }

    pub fn selected_categories(&self) -> &BTreeSet<Category> {
        &self.state.selection
    }

    /// Message of the most recent failure, cleared by the next success
    pub fn last_error(&self) -> Option<&str> {
        self.state.last_error.as_deref()
    }

    /// Plans matching `query` (all plans for an empty query)
    pub async fn search_plans(&self, query: &str) -> Vec<Plan> {
        debug!(%query, "search_plans: called");
        filter_plans(&self.catalog.list_plans().await, query)
    }

    fn fail<T>(&mut self, err: WorkflowError) -> Result<T, WorkflowError> {
        warn!(step = %self.state.step, error = %err, "workflow: input refused");
        self.state.last_error = Some(err.to_string());
        Err(err)
    }

    /// Refuse the input unless the session is in `expected`
    fn guard(&mut self, expected: Step, action: &'static str) -> Result<(), WorkflowError> {
        let step = self.state.step;
        match step {
            Step::Generate => self.fail(WorkflowError::Busy),
            _ if step != expected => self.fail(WorkflowError::IllegalTransition { from: step, action }),
            _ => Ok(()),
        }
    }

    fn move_to(&mut self, next: Step) {
        debug_assert!(self.state.step.can_transition_to(next));
        info!(from = %self.state.step, to = %next, "workflow: transition");
        self.state.step = next;
    }

    /// Select -> Explore: load a plan and its data
    ///
    /// On failure the session stays in Select with nothing stored.
    pub async fn select_plan(&mut self, plan_id: &str) -> Result<(), WorkflowError> {
        debug!(%plan_id, "select_plan: called");
        self.guard(Step::Select, "select a plan")?;

        let plan = match self.catalog.get_plan(plan_id).await {
            Ok(plan) => plan,
            Err(e) => return self.fail(e.into()),
        };
        let bundle = match self.catalog.get_plan_data(plan_id).await {
            Ok(bundle) => bundle,
            Err(e) => return self.fail(e.into()),
        };

        self.state.clear_plan();
        self.state.plan = Some(plan);
        self.state.bundle = Some(bundle);
        self.state.last_error = None;
        self.move_to(Step::Explore);
        Ok(())
    }

    /// Add or remove a category from the selection; returns whether it is now selected
    pub fn toggle_category(&mut self, category: Category) -> Result<bool, WorkflowError> {
        debug!(%category, "toggle_category: called");
        self.guard(Step::Explore, "change categories")?;

        let selected = if self.state.selection.remove(&category) {
            false
        } else {
            self.state.selection.insert(category);
            true
        };
        self.state.last_error = None;
        Ok(selected)
    }

    /// Explore -> Generate: snapshot the inputs for the composer
    pub fn begin_generation(&mut self) -> Result<GenerationJob, WorkflowError> {
        debug!("begin_generation: called");
        self.guard(Step::Explore, "generate a report")?;

        let (Some(plan), Some(bundle)) = (self.state.plan.clone(), self.state.bundle.clone()) else {
            return self.fail(WorkflowError::IllegalTransition {
                from: Step::Explore,
                action: "generate a report without a plan",
            });
        };

        self.move_to(Step::Generate);
        Ok(GenerationJob {
            composer: self.composer.clone(),
            plan,
            bundle,
            selection: self.state.selection.clone(),
        })
    }

    /// Generate -> View on success, Generate -> Explore on failure
    pub fn finish_generation(&mut self, result: Result<GeneratedReport, ComposeError>) -> Result<(), WorkflowError> {
        debug!(ok = result.is_ok(), "finish_generation: called");
        if self.state.step != Step::Generate {
            let from = self.state.step;
            return self.fail(WorkflowError::IllegalTransition {
                from,
                action: "finish a report",
            });
        }

        match result {
            Ok(report) => {
                self.state.report = Some(report);
                self.state.last_error = None;
                self.move_to(Step::View);
                Ok(())
            }
            Err(e) => {
                self.state.report = None;
                self.move_to(Step::Explore);
                self.fail(e.into())
            }
        }
    }

    /// Explore -> Generate -> View (or back to Explore on failure)
    pub async fn generate(&mut self) -> Result<(), WorkflowError> {
        let job = self.begin_generation()?;
        let result = job.run().await;
        self.finish_generation(result)
    }

    /// Explore -> Select or View -> Explore
    pub fn back(&mut self) -> Result<(), WorkflowError> {
        debug!(step = %self.state.step, "back: called");
        match self.state.step {
            Step::Explore => {
                self.state.clear_plan();
                self.state.last_error = None;
                self.move_to(Step::Select);
                Ok(())
            }
            Step::View => {
                self.state.report = None;
                self.state.last_error = None;
                self.move_to(Step::Explore);
                Ok(())
            }
            Step::Generate => self.fail(WorkflowError::Busy),
            Step::Select => self.fail(WorkflowError::IllegalTransition {
                from: Step::Select,
                action: "go back",
            }),
        }
    }
}
