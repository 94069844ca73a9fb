//! Attaching criteria to templates, task groups, and tasks.
//!
//! An entity either references a shared catalog entry by id or embeds a
//! private tree it owns outright. The two are mutually exclusive by
//! construction; the wire shape is `{namedCriteriaId}` or
//! `{embeddedCriteria}`.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::catalog::CriteriaCatalog;
use crate::types::{CatalogError, EligibilityCriteria};

/// What kind of entity a binding hangs off. Display labels only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EntityKind {
    Template,
    TaskGroup,
    Task,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntityKind::Template => f.write_str("Template"),
            EntityKind::TaskGroup => f.write_str("Task Group"),
            EntityKind::Task => f.write_str("Task"),
        }
    }
}

/// The eligibility attachment persisted on an entity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EntityBinding {
    /// A reference into the named rules library. The criteria's lifetime
    /// belongs to the catalog; deleting the catalog entry dangles the
    /// reference (which then fails closed at evaluation time).
    Named {
        #[serde(rename = "namedCriteriaId")]
        named_criteria_id: String,
    },
    /// A private tree owned by the entity, never shared.
    Embedded {
        #[serde(rename = "embeddedCriteria")]
        embedded_criteria: EligibilityCriteria,
    },
}

impl EntityBinding {
    #[must_use]
    pub fn named(id: &str) -> Self {
        EntityBinding::Named {
            named_criteria_id: id.to_owned(),
        }
    }

    #[must_use]
    pub fn embedded(criteria: EligibilityCriteria) -> Self {
        EntityBinding::Embedded {
            embedded_criteria: criteria,
        }
    }

    /// Dereference this binding to a concrete criteria. Named bindings go
    /// through the catalog; embedded trees are returned as-is.
    pub async fn resolve(
        &self,
        catalog: &dyn CriteriaCatalog,
    ) -> Result<EligibilityCriteria, CatalogError> {
        match self {
            EntityBinding::Named { named_criteria_id } => catalog.get(named_criteria_id).await,
            EntityBinding::Embedded { embedded_criteria } => Ok(embedded_criteria.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::InMemoryCatalog;
    use crate::types::{FieldRegistry, FieldRule, Operator, RuleNode, Value};

    fn welder_criteria() -> EligibilityCriteria {
        let mut criteria = EligibilityCriteria::new("Welders Only");
        criteria.root_group.children.push(RuleNode::Field(FieldRule {
            field_id: "trade".to_owned(),
            operator: Operator::Equals,
            value: Some(Value::Text("WELDER".into())),
            ..FieldRule::empty()
        }));
        criteria
    }

    #[tokio::test]
    async fn named_binding_resolves_through_catalog() {
        let catalog = InMemoryCatalog::new(FieldRegistry::builtin());
        let criteria = welder_criteria();
        let id = criteria.id.clone();
        catalog.create(criteria.clone()).await.unwrap();

        let binding = EntityBinding::named(&id);
        let resolved = binding.resolve(&catalog).await.unwrap();
        assert_eq!(resolved, criteria);
    }

    #[tokio::test]
    async fn dangling_named_binding_errors() {
        let catalog = InMemoryCatalog::new(FieldRegistry::builtin());
        let binding = EntityBinding::named("criteria-gone");
        assert!(matches!(
            binding.resolve(&catalog).await,
            Err(CatalogError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn embedded_binding_resolves_to_its_own_tree() {
        let catalog = InMemoryCatalog::new(FieldRegistry::builtin());
        let criteria = welder_criteria();
        let binding = EntityBinding::embedded(criteria.clone());
        let resolved = binding.resolve(&catalog).await.unwrap();
        assert_eq!(resolved, criteria);
    }

    #[test]
    fn wire_shapes_are_mutually_exclusive() {
        let named = EntityBinding::named("criteria-1");
        let json = serde_json::to_value(&named).unwrap();
        assert_eq!(json["namedCriteriaId"], "criteria-1");
        assert!(json.get("embeddedCriteria").is_none());

        let embedded = EntityBinding::embedded(welder_criteria());
        let json = serde_json::to_value(&embedded).unwrap();
        assert!(json.get("embeddedCriteria").is_some());
        assert!(json.get("namedCriteriaId").is_none());
    }

    #[test]
    fn wire_round_trip() {
        let embedded = EntityBinding::embedded(welder_criteria());
        let json = serde_json::to_string(&embedded).unwrap();
        let back: EntityBinding = serde_json::from_str(&json).unwrap();
        assert_eq!(back, embedded);

        let named = EntityBinding::named("criteria-1");
        let json = serde_json::to_string(&named).unwrap();
        let back: EntityBinding = serde_json::from_str(&json).unwrap();
        assert_eq!(back, named);
    }

    #[test]
    fn entity_kind_labels() {
        assert_eq!(EntityKind::Template.to_string(), "Template");
        assert_eq!(EntityKind::TaskGroup.to_string(), "Task Group");
        assert_eq!(EntityKind::Task.to_string(), "Task");
    }
}
