//! Copy-on-write mutations over the rule tree.
//!
//! Every operation takes a borrowed node and returns a new one; nothing is
//! mutated in place, so callers holding an earlier snapshot are never
//! surprised by a later edit. Path-addressed updates rebuild only the
//! ancestors along the path and reuse untouched siblings by clone.

use crate::types::{FieldDef, FieldRule, Group, Operator, RuleNode, SqlRule};

/// Flip a group's logic between AND and OR. Children are untouched, so the
/// operation is its own inverse.
#[must_use]
pub fn toggle_logic(group: &Group) -> Group {
    Group {
        id: group.id.clone(),
        logic: group.logic.opposite(),
        children: group.children.clone(),
    }
}

/// Append a blank field rule (no field, `equals`, no value).
#[must_use]
pub fn add_field_rule(group: &Group) -> Group {
    with_appended(group, RuleNode::Field(FieldRule::empty()))
}

/// Append an empty nested group. Its logic defaults to the opposite of the
/// parent's, making "an OR inside an AND" the zero-click case.
#[must_use]
pub fn add_group(group: &Group) -> Group {
    with_appended(group, RuleNode::Group(Group::new(group.logic.opposite())))
}

/// Append a blank SQL rule (empty name, description, and query).
#[must_use]
pub fn add_sql_rule(group: &Group) -> Group {
    with_appended(group, RuleNode::Sql(SqlRule::empty()))
}

/// Replace the child at `index`. Returns `None` if the index is out of
/// range.
#[must_use]
pub fn replace_child_at(group: &Group, index: usize, node: RuleNode) -> Option<Group> {
    if index >= group.children.len() {
        return None;
    }
    let mut children = group.children.clone();
    children[index] = node;
    Some(Group {
        id: group.id.clone(),
        logic: group.logic,
        children,
    })
}

/// Remove the child at `index`, preserving the order of the rest. Returns
/// `None` if the index is out of range.
#[must_use]
pub fn remove_child_at(group: &Group, index: usize) -> Option<Group> {
    if index >= group.children.len() {
        return None;
    }
    let mut children = group.children.clone();
    children.remove(index);
    Some(Group {
        id: group.id.clone(),
        logic: group.logic,
        children,
    })
}

/// The group reached by following `path` (child indices through nested
/// groups) from `root`. An empty path is the root itself.
#[must_use]
pub fn group_at<'a>(root: &'a Group, path: &[usize]) -> Option<&'a Group> {
    match path {
        [] => Some(root),
        [first, rest @ ..] => match root.children.get(*first)? {
            RuleNode::Group(child) => group_at(child, rest),
            _ => None,
        },
    }
}

/// The node reached by following `path` from `root`. The path must be
/// non-empty (the root group is not a `RuleNode`).
#[must_use]
pub fn node_at<'a>(root: &'a Group, path: &[usize]) -> Option<&'a RuleNode> {
    match path {
        [] => None,
        [only] => root.children.get(*only),
        [first, rest @ ..] => match root.children.get(*first)? {
            RuleNode::Group(child) => node_at(child, rest),
            _ => None,
        },
    }
}

/// Rebuild the tree with `f` applied to the group at `path`. Every ancestor
/// along the path is replaced; siblings are carried over unchanged. Returns
/// `None` if the path does not lead to a group.
#[must_use]
pub fn update_group_at(
    root: &Group,
    path: &[usize],
    f: impl FnOnce(&Group) -> Group,
) -> Option<Group> {
    match path {
        [] => Some(f(root)),
        [first, rest @ ..] => {
            let child = match root.children.get(*first)? {
                RuleNode::Group(child) => child,
                _ => return None,
            };
            let rebuilt = update_group_at(child, rest, f)?;
            replace_child_at(root, *first, RuleNode::Group(rebuilt))
        }
    }
}

/// Re-target a field rule at a new field. The operator is kept if the new
/// field still allows it, otherwise reset to the field's first allowed
/// operator; both values are cleared either way.
#[must_use]
pub fn set_field(rule: &FieldRule, field: &FieldDef) -> FieldRule {
    let operator = if field.allows(rule.operator) {
        rule.operator
    } else {
        field.default_operator()
    };
    FieldRule {
        id: rule.id.clone(),
        field_id: field.id.clone(),
        operator,
        value: None,
        value_end: None,
    }
}

/// Switch a field rule's operator. The value is cleared when the new
/// operator takes none; the range end is cleared unless the new operator is
/// `between`.
#[must_use]
pub fn set_operator(rule: &FieldRule, operator: Operator) -> FieldRule {
    FieldRule {
        id: rule.id.clone(),
        field_id: rule.field_id.clone(),
        operator,
        value: if operator.requires_value() {
            rule.value.clone()
        } else {
            None
        },
        value_end: if operator.requires_second_value() {
            rule.value_end.clone()
        } else {
            None
        },
    }
}

fn with_appended(group: &Group, node: RuleNode) -> Group {
    let mut children = group.children.clone();
    children.push(node);
    Group {
        id: group.id.clone(),
        logic: group.logic,
        children,
    }
}
