//! Pre-save structural checks.
//!
//! Validation walks the whole tree and collects every defect before
//! returning, so the editor can surface the full list at once. A failed
//! validation means nothing is persisted.

use crate::types::{EligibilityCriteria, FieldRegistry, Group, RuleNode, ValidationError};

/// Validate a named catalog entry. Named entries must carry a non-blank
/// name on top of the structural checks.
pub fn validate_named(
    criteria: &EligibilityCriteria,
    registry: &FieldRegistry,
) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();
    if criteria.name.trim().is_empty() {
        errors.push(ValidationError::MissingName);
    }
    check_root(criteria, registry, &mut errors);
    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Validate an embedded (local) criteria. Same structural checks, but the
/// name may be blank; the editor substitutes a placeholder at save time.
pub fn validate_embedded(
    criteria: &EligibilityCriteria,
    registry: &FieldRegistry,
) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();
    check_root(criteria, registry, &mut errors);
    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn check_root(
    criteria: &EligibilityCriteria,
    registry: &FieldRegistry,
    errors: &mut Vec<ValidationError>,
) {
    // An empty root evaluates vacuously true at runtime, but a standalone
    // criteria with zero rules is a no-op submission and is refused.
    if criteria.root_group.children.is_empty() {
        errors.push(ValidationError::EmptyRootGroup);
    }
    check_group(&criteria.root_group, registry, errors);
}

fn check_group(group: &Group, registry: &FieldRegistry, errors: &mut Vec<ValidationError>) {
    for child in &group.children {
        match child {
            RuleNode::Group(nested) => check_group(nested, registry, errors),
            RuleNode::Field(rule) => {
                if rule.field_id.is_empty() {
                    errors.push(ValidationError::MissingField {
                        rule_id: rule.id.clone(),
                    });
                    continue;
                }
                match registry.get(&rule.field_id) {
                    None => {
                        errors.push(ValidationError::UnknownField {
                            rule_id: rule.id.clone(),
                            field_id: rule.field_id.clone(),
                        });
                    }
                    Some(field) => {
                        if !field.allows(rule.operator) {
                            errors.push(ValidationError::OperatorNotAllowed {
                                rule_id: rule.id.clone(),
                                field_id: rule.field_id.clone(),
                                operator: rule.operator.token().to_owned(),
                            });
                        }
                    }
                }
                if rule.operator.requires_value() && rule.value.is_none() {
                    errors.push(ValidationError::MissingValue {
                        rule_id: rule.id.clone(),
                    });
                }
                if rule.operator.requires_second_value() && rule.value_end.is_none() {
                    errors.push(ValidationError::MissingSecondValue {
                        rule_id: rule.id.clone(),
                    });
                }
            }
            RuleNode::Sql(rule) => {
                if rule.query.trim().is_empty() {
                    errors.push(ValidationError::EmptySqlQuery {
                        rule_id: rule.id.clone(),
                    });
                }
            }
        }
    }
}
