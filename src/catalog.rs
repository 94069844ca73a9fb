//! The named rules library: CRUD over reusable eligibility criteria.
//!
//! The trait is the boundary the editor consumes; production backends live
//! elsewhere. [`InMemoryCatalog`] is the reference implementation and the
//! test double. Every write path validates first, so a criteria that fails
//! validation is never stored, not even partially.

use std::collections::HashMap;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

use crate::types::{CatalogError, EligibilityCriteria, FieldRegistry};
use crate::validate::validate_named;

/// The `list()` projection of a catalog entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CriteriaSummary {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub is_active: bool,
    pub rule_count: usize,
}

impl CriteriaSummary {
    #[must_use]
    pub fn of(criteria: &EligibilityCriteria) -> Self {
        Self {
            id: criteria.id.clone(),
            name: criteria.name.clone(),
            description: criteria.description.clone(),
            is_active: criteria.is_active,
            rule_count: criteria.rule_count(),
        }
    }
}

/// Async CRUD surface over named criteria.
#[async_trait]
pub trait CriteriaCatalog: Send + Sync {
    /// Summaries of every entry, sorted by name.
    async fn list(&self) -> Result<Vec<CriteriaSummary>, CatalogError>;

    /// The full criteria for an id.
    async fn get(&self, id: &str) -> Result<EligibilityCriteria, CatalogError>;

    /// Store a new entry. Fails without storing anything if validation
    /// rejects the criteria.
    async fn create(&self, criteria: EligibilityCriteria) -> Result<(), CatalogError>;

    /// Replace an existing entry, matched by id.
    async fn update(&self, criteria: EligibilityCriteria) -> Result<(), CatalogError>;

    /// Remove an entry.
    async fn delete(&self, id: &str) -> Result<(), CatalogError>;
}

/// Reference catalog backed by a map behind an async lock.
#[derive(Debug)]
pub struct InMemoryCatalog {
    registry: FieldRegistry,
    entries: RwLock<HashMap<String, EligibilityCriteria>>,
}

impl InMemoryCatalog {
    #[must_use]
    pub fn new(registry: FieldRegistry) -> Self {
        Self {
            registry,
            entries: RwLock::new(HashMap::new()),
        }
    }

    fn check(&self, criteria: &EligibilityCriteria) -> Result<(), CatalogError> {
        validate_named(criteria, &self.registry)
            .map_err(|errors| CatalogError::Invalid { errors })
    }
}

#[async_trait]
impl CriteriaCatalog for InMemoryCatalog {
    async fn list(&self) -> Result<Vec<CriteriaSummary>, CatalogError> {
        let entries = self.entries.read().await;
        let mut summaries: Vec<CriteriaSummary> =
            entries.values().map(CriteriaSummary::of).collect();
        summaries.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(summaries)
    }

    async fn get(&self, id: &str) -> Result<EligibilityCriteria, CatalogError> {
        let entries = self.entries.read().await;
        entries
            .get(id)
            .cloned()
            .ok_or_else(|| CatalogError::NotFound { id: id.to_owned() })
    }

    async fn create(&self, criteria: EligibilityCriteria) -> Result<(), CatalogError> {
        self.check(&criteria)?;
        let mut entries = self.entries.write().await;
        entries.insert(criteria.id.clone(), criteria);
        Ok(())
    }

    async fn update(&self, criteria: EligibilityCriteria) -> Result<(), CatalogError> {
        self.check(&criteria)?;
        let mut entries = self.entries.write().await;
        if !entries.contains_key(&criteria.id) {
            return Err(CatalogError::NotFound {
                id: criteria.id.clone(),
            });
        }
        entries.insert(criteria.id.clone(), criteria);
        Ok(())
    }

    async fn delete(&self, id: &str) -> Result<(), CatalogError> {
        let mut entries = self.entries.write().await;
        entries
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| CatalogError::NotFound { id: id.to_owned() })
    }
}
