//! Plan catalog
//!
//! Read-only source of survey plans and their site data. The controller
//! depends on the [`PlanCatalog`] trait so tests can substitute fakes; the
//! shipped implementation is [`InMemoryCatalog`], loaded from the built-in
//! fixtures or a JSON file.

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;
use tracing::{debug, info};

use crate::config::CatalogConfig;
use crate::domain::{Annotation, FlightLog, Imagery, Measurement, Plan, PlanDataBundle};

pub mod fixtures;
mod memory;

pub use memory::{CatalogFile, InMemoryCatalog};

/// Errors from catalog operations
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Plan data not found for plan ID: {0}")]
    NotFound(String),

    #[error("Invalid catalog: {0}")]
    Invalid(String),

    #[error("Failed to read catalog {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse catalog: {0}")]
    Json(#[from] serde_json::Error),
}

impl CatalogError {
    /// Check if this is an unknown-plan error
    pub fn is_not_found(&self) -> bool {
        matches!(self, CatalogError::NotFound(_))
    }
}

/// Read-only plan provider
#[async_trait]
pub trait PlanCatalog: Send + Sync {
    /// All plans in catalog order
    async fn list_plans(&self) -> Vec<Plan>;

    /// The catalog entry for a plan
    async fn get_plan(&self, plan_id: &str) -> Result<Plan, CatalogError>;

    /// The full record bundle for a plan; no partial results
    async fn get_plan_data(&self, plan_id: &str) -> Result<PlanDataBundle, CatalogError>;

    async fn flight_logs(&self, plan_id: &str) -> Result<Vec<FlightLog>, CatalogError> {
        Ok(self.get_plan_data(plan_id).await?.flight_logs)
    }

    async fn measurements(&self, plan_id: &str) -> Result<Vec<Measurement>, CatalogError> {
        Ok(self.get_plan_data(plan_id).await?.measurements)
    }

    async fn annotations(&self, plan_id: &str) -> Result<Vec<Annotation>, CatalogError> {
        Ok(self.get_plan_data(plan_id).await?.annotations)
    }

    async fn imagery(&self, plan_id: &str) -> Result<Vec<Imagery>, CatalogError> {
        Ok(self.get_plan_data(plan_id).await?.imagery)
    }
}

/// Open the catalog named by the configuration
pub fn open_catalog(config: &CatalogConfig) -> Result<Arc<dyn PlanCatalog>, CatalogError> {
    debug!(source = %config.source, "open_catalog: called");
    let catalog = match config.file_path() {
        Some(path) => InMemoryCatalog::from_file(&path)?,
        None => InMemoryCatalog::builtin(),
    };
    info!(plans = catalog.len(), source = %config.source, "open_catalog: catalog loaded");
    Ok(Arc::new(catalog))
}

/// Filter plans by a search query (name or location, case-insensitive)
///
/// Pure transform over `list_plans()` output; order is preserved.
pub fn filter_plans(plans: &[Plan], query: &str) -> Vec<Plan> {
    debug!(plan_count = plans.len(), %query, "filter_plans: called");
    plans.iter().filter(|p| p.matches(query)).cloned().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_filter_by_name_and_location() {
        let plans = fixtures::plans();

        let by_name = filter_plans(&plans, "residential");
        assert_eq!(by_name.len(), 1);
        assert_eq!(by_name[0].id, "plan_002");

        let by_location = filter_plans(&plans, "chicago");
        assert_eq!(by_location.len(), 1);
        assert_eq!(by_location[0].id, "plan_003");

        assert!(filter_plans(&plans, "nowhere").is_empty());
    }

    #[test]
    fn test_filter_empty_query_keeps_order() {
        let plans = fixtures::plans();
        let ids: Vec<_> = filter_plans(&plans, "").into_iter().map(|p| p.id).collect();
        assert_eq!(ids, vec!["plan_001", "plan_002", "plan_003"]);
    }

    #[tokio::test]
    async fn test_open_catalog_builtin_and_missing_file() {
        let catalog = open_catalog(&CatalogConfig::default()).unwrap();
        assert_eq!(catalog.list_plans().await.len(), 3);

        let config = CatalogConfig {
            source: "/definitely/not/here/catalog.json".to_string(),
        };
        assert!(matches!(open_catalog(&config).err().unwrap(), CatalogError::Io { .. }));
    }

    #[tokio::test]
    async fn test_category_getters_delegate() {
        let catalog = InMemoryCatalog::builtin();
        assert_eq!(catalog.flight_logs("plan_001").await.unwrap().len(), 2);
        assert_eq!(catalog.measurements("plan_003").await.unwrap().len(), 2);
        assert_eq!(catalog.annotations("plan_002").await.unwrap().len(), 1);
        assert_eq!(catalog.imagery("plan_003").await.unwrap().len(), 2);
        assert!(catalog.imagery("plan_999").await.unwrap_err().is_not_found());
    }

    proptest! {
        #[test]
        fn prop_filter_is_subsequence(query in "[a-zA-Z ,]{0,8}") {
            let plans = fixtures::plans();
            let filtered = filter_plans(&plans, &query);

            prop_assert!(filtered.len() <= plans.len());
            let mut it = plans.iter();
            for p in &filtered {
                prop_assert!(p.matches(&query));
                prop_assert!(it.any(|orig| orig == p));
            }
        }

        #[test]
        fn prop_filter_ignores_case(query in "[a-zA-Z]{0,6}") {
            let plans = fixtures::plans();
            prop_assert_eq!(
                filter_plans(&plans, &query.to_uppercase()),
                filter_plans(&plans, &query.to_lowercase())
            );
        }
    }
}
