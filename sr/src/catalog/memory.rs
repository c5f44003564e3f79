//! In-memory catalog implementation

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::{CatalogError, PlanCatalog, fixtures};
use crate::domain::{Plan, PlanDataBundle};

/// On-disk catalog shape
///
/// `data` is keyed by plan id; every key must name a plan in `plans`.
/// Plans without an entry in `data` get an empty bundle.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CatalogFile {
    pub plans: Vec<Plan>,
    #[serde(default)]
    pub data: HashMap<String, PlanDataBundle>,
}

/// Catalog held entirely in memory, never mutated after construction
#[derive(Debug, Clone)]
pub struct InMemoryCatalog {
    plans: Vec<Plan>,
    data: HashMap<String, PlanDataBundle>,
}

impl InMemoryCatalog {
    /// Build a catalog, validating ids
    pub fn new(plans: Vec<Plan>, mut data: HashMap<String, PlanDataBundle>) -> Result<Self, CatalogError> {
        debug!(plan_count = plans.len(), data_count = data.len(), "InMemoryCatalog::new: called");

        let mut seen = std::collections::HashSet::new();
        for plan in &plans {
            if plan.id.trim().is_empty() {
                return Err(CatalogError::Invalid("plan with empty id".to_string()));
            }
            if !seen.insert(plan.id.as_str()) {
                return Err(CatalogError::Invalid(format!("duplicate plan id '{}'", plan.id)));
            }
        }

        if let Some(orphan) = data.keys().find(|id| !seen.contains(id.as_str())) {
            return Err(CatalogError::Invalid(format!("data for unknown plan id '{}'", orphan)));
        }

        for plan in &plans {
            data.entry(plan.id.clone()).or_default();
        }

        Ok(Self { plans, data })
    }

    /// The built-in sample catalog
    pub fn builtin() -> Self {
        debug!("InMemoryCatalog::builtin: called");
        Self {
            plans: fixtures::plans(),
            data: fixtures::plan_data(),
        }
    }

    /// Parse a catalog from JSON text
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        debug!(len = json.len(), "InMemoryCatalog::from_json: called");
        let file: CatalogFile = serde_json::from_str(json)?;
        Self::new(file.plans, file.data)
    }

    /// Load a catalog from a JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, CatalogError> {
        let path = path.as_ref();
        debug!(path = %path.display(), "InMemoryCatalog::from_file: called");
        let content = fs::read_to_string(path).map_err(|source| CatalogError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let catalog = Self::from_json(&content)?;
        info!(path = %path.display(), plans = catalog.plans.len(), "Loaded catalog");
        Ok(catalog)
    }

    /// Number of plans
    pub fn len(&self) -> usize {
        self.plans.len()
    }

    pub fn is_empty(&self) -> bool {
        self.plans.is_empty()
    }
}

#[async_trait]
impl PlanCatalog for InMemoryCatalog {
    async fn list_plans(&self) -> Vec<Plan> {
        debug!(count = self.plans.len(), "InMemoryCatalog::list_plans: called");
        self.plans.clone()
    }

    async fn get_plan(&self, plan_id: &str) -> Result<Plan, CatalogError> {
        debug!(%plan_id, "InMemoryCatalog::get_plan: called");
        self.plans
            .iter()
            .find(|p| p.id == plan_id)
            .cloned()
            .ok_or_else(|| CatalogError::NotFound(plan_id.to_string()))
    }

    async fn get_plan_data(&self, plan_id: &str) -> Result<PlanDataBundle, CatalogError> {
        debug!(%plan_id, "InMemoryCatalog::get_plan_data: called");
        self.data
            .get(plan_id)
            .cloned()
            .ok_or_else(|| CatalogError::NotFound(plan_id.to_string()))
    }
}
