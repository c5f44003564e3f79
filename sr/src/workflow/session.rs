//! Session state owned by the controller

use std::collections::BTreeSet;

use super::Step;
use crate::domain::{Category, GeneratedReport, Plan, PlanDataBundle};

/// Transient state of one wizard session
///
/// Never persisted. `bundle` is present exactly when a plan is selected.
#[derive(Debug, Clone, Default)]
pub struct SessionState {
    pub step: Step,
    pub plan: Option<Plan>,
    pub bundle: Option<PlanDataBundle>,
    /// Categories toggled on in Explore; empty means all
    pub selection: BTreeSet<Category>,
    pub report: Option<GeneratedReport>,
    /// Message of the most recent failed input
    pub last_error: Option<String>,
}

impl SessionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn selected_plan_id(&self) -> Option<&str> {
        self.plan.as_ref().map(|p| p.id.as_str())
    }

    /// Forget the plan and everything derived from it
    pub fn clear_plan(&mut self) {
        self.plan = None;
        self.bundle = None;
        self.selection.clear();
        self.report = None;
    }
}
