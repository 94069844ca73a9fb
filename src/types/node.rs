use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{Operator, Value};

/// Combinator applied to a group's children.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum GroupLogic {
    And,
    Or,
}

impl GroupLogic {
    /// The other logic. New nested groups default to the opposite of their
    /// parent, so "an OR inside an AND" is one click away.
    #[must_use]
    pub fn opposite(self) -> Self {
        match self {
            GroupLogic::And => GroupLogic::Or,
            GroupLogic::Or => GroupLogic::And,
        }
    }
}

impl fmt::Display for GroupLogic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GroupLogic::And => f.write_str("AND"),
            GroupLogic::Or => f.write_str("OR"),
        }
    }
}

/// One node of the eligibility rule tree.
///
/// The tree is acyclic and finite by construction: children are owned
/// values, never references to ancestors. The `kind` tag discriminates the
/// wire shape and is stable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum RuleNode {
    #[serde(rename = "GROUP")]
    Group(Group),
    #[serde(rename = "FIELD_RULE")]
    Field(FieldRule),
    #[serde(rename = "SQL_RULE")]
    Sql(SqlRule),
}

impl RuleNode {
    /// The node's opaque id.
    #[must_use]
    pub fn id(&self) -> &str {
        match self {
            RuleNode::Group(g) => &g.id,
            RuleNode::Field(r) => &r.id,
            RuleNode::Sql(r) => &r.id,
        }
    }

    #[must_use]
    pub fn as_group(&self) -> Option<&Group> {
        match self {
            RuleNode::Group(g) => Some(g),
            _ => None,
        }
    }
}

/// An AND/OR container. Children may be empty; an empty group evaluates
/// vacuously true.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Group {
    pub id: String,
    pub logic: GroupLogic,
    pub children: Vec<RuleNode>,
}

impl Group {
    /// A new empty group with the given logic and a fresh id.
    #[must_use]
    pub fn new(logic: GroupLogic) -> Self {
        Self {
            id: fresh_id("group"),
            logic,
            children: Vec::new(),
        }
    }

    /// A new empty AND group, the default root for fresh criteria.
    #[must_use]
    pub fn empty_root() -> Self {
        Self::new(GroupLogic::And)
    }

    /// Number of leaf rules in this group, recursing into nested groups.
    /// Groups themselves are not counted.
    #[must_use]
    pub fn rule_count(&self) -> usize {
        self.children
            .iter()
            .map(|child| match child {
                RuleNode::Group(g) => g.rule_count(),
                RuleNode::Field(_) | RuleNode::Sql(_) => 1,
            })
            .sum()
    }
}

/// A leaf comparing one registered attribute against a value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldRule {
    pub id: String,
    pub field_id: String,
    pub operator: Operator,
    pub value: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value_end: Option<Value>,
}

impl FieldRule {
    /// The editor's blank starting point: no field, `equals`, no value.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            id: fresh_id("rule"),
            field_id: String::new(),
            operator: Operator::Equals,
            value: None,
            value_end: None,
        }
    }
}

/// A leaf whose truth value comes from executing a parameterized query
/// against an external store. The query text is opaque to this crate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SqlRule {
    pub id: String,
    pub name: String,
    pub description: String,
    pub query: String,
}

impl SqlRule {
    /// The editor's blank starting point: empty name, description, query.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            id: fresh_id("sql"),
            name: String::new(),
            description: String::new(),
            query: String::new(),
        }
    }
}

/// Generate a prefixed opaque id for a new node or criteria.
pub(crate) fn fresh_id(prefix: &str) -> String {
    format!("{prefix}-{}", Uuid::new_v4())
}
