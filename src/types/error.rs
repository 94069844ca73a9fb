use std::time::Duration;

use thiserror::Error;

/// A structural defect caught before persistence. The validator collects
/// every defect in one pass; callers surface the list and refuse to save.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("criteria name is required")]
    MissingName,

    #[error("at least one rule is required")]
    EmptyRootGroup,

    #[error("rule '{rule_id}' has no field selected")]
    MissingField { rule_id: String },

    #[error("rule '{rule_id}' references unknown field '{field_id}'")]
    UnknownField { rule_id: String, field_id: String },

    #[error("rule '{rule_id}' uses operator '{operator}' not allowed for field '{field_id}'")]
    OperatorNotAllowed {
        rule_id: String,
        field_id: String,
        operator: String,
    },

    #[error("rule '{rule_id}' requires a value")]
    MissingValue { rule_id: String },

    #[error("rule '{rule_id}' requires a range end value")]
    MissingSecondValue { rule_id: String },

    #[error("SQL rule '{rule_id}' has an empty query")]
    EmptySqlQuery { rule_id: String },

    #[error("select a rule from the library")]
    NoSelection,
}

/// Errors from the criteria catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("criteria '{id}' not found")]
    NotFound { id: String },

    #[error("criteria failed validation: {}", errors.iter().map(ToString::to_string).collect::<Vec<_>>().join("; "))]
    Invalid { errors: Vec<ValidationError> },
}

/// Errors from the external SQL executor. The evaluator converts these into
/// a fail-closed `false` after logging them.
#[derive(Debug, Error)]
pub enum SqlError {
    #[error("query execution failed: {0}")]
    Execution(String),

    #[error("query timed out after {budget:?}")]
    Timeout { budget: Duration },
}
