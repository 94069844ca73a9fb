use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::node::{fresh_id, Group};

/// Wire codec for the root group. Standalone `Group` values serialize
/// without the `kind` discriminator (that tag lives on `RuleNode`), but the
/// persisted shape tags every group including the root, so external
/// consumers can walk the tree uniformly.
mod root_node {
    use serde::de::Error as _;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    use crate::types::node::{Group, RuleNode};

    pub fn serialize<S: Serializer>(group: &Group, serializer: S) -> Result<S::Ok, S::Error> {
        #[derive(Serialize)]
        #[serde(tag = "kind")]
        enum Tagged<'a> {
            #[serde(rename = "GROUP")]
            Group(&'a Group),
        }
        Tagged::Group(group).serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Group, D::Error> {
        match RuleNode::deserialize(deserializer)? {
            RuleNode::Group(group) => Ok(group),
            other => Err(D::Error::custom(format!(
                "root must be a GROUP node, got {}",
                match other {
                    RuleNode::Field(_) => "FIELD_RULE",
                    RuleNode::Sql(_) => "SQL_RULE",
                    RuleNode::Group(_) => unreachable!(),
                }
            ))),
        }
    }
}

/// A named, persisted rule set: one root group plus catalog metadata.
///
/// Catalog entries carry a user-facing name; embedded (local) criteria keep
/// the same shape with a blank or placeholder name. The root group is always
/// present, even when empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EligibilityCriteria {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub is_active: bool,
    #[serde(with = "root_node")]
    pub root_group: Group,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl EligibilityCriteria {
    /// A fresh, active criteria with an empty AND root.
    #[must_use]
    pub fn new(name: &str) -> Self {
        let now = Utc::now();
        Self {
            id: fresh_id("criteria"),
            name: name.to_owned(),
            description: None,
            is_active: true,
            root_group: Group::empty_root(),
            created_at: now,
            updated_at: now,
        }
    }

    /// A fresh local (embedded) criteria. Name starts blank; the editor
    /// substitutes a placeholder at save time.
    #[must_use]
    pub fn local() -> Self {
        Self::new("")
    }

    /// Bump the modification timestamp. Called after every edit.
    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }

    /// Replace the root group and touch the timestamp.
    pub fn set_root_group(&mut self, root_group: Group) {
        self.root_group = root_group;
        self.touch();
    }

    /// Number of leaf rules across the whole tree.
    #[must_use]
    pub fn rule_count(&self) -> usize {
        self.root_group.rule_count()
    }

    /// Clone this criteria as a new catalog entry: fresh id, `(Copy)`
    /// suffix, `is_active` preserved, fresh timestamps.
    #[must_use]
    pub fn duplicate(&self) -> Self {
        let now = Utc::now();
        Self {
            id: fresh_id("criteria"),
            name: format!("{} (Copy)", self.name),
            description: self.description.clone(),
            is_active: self.is_active,
            root_group: self.root_group.clone(),
            created_at: now,
            updated_at: now,
        }
    }
}
