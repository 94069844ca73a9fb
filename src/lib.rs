//! Recursive boolean eligibility rules for worker-to-project matching.
//!
//! A criteria is a tree of AND/OR groups over field comparisons and
//! row-count SQL probes. This crate provides the tree and its wire format,
//! a structural validator, a fail-closed async evaluator, a named rules
//! catalog, entity bindings, and the select-or-create editor state machine
//! that ties them together.

mod binding;
mod catalog;
mod editor;
mod evaluate;
pub mod mutate;
mod types;
mod validate;

pub use binding::{EntityBinding, EntityKind};
pub use catalog::{CriteriaCatalog, CriteriaSummary, InMemoryCatalog};
pub use editor::{CriteriaEditor, EditorMode, LoadToken, SaveOutcome};
pub use evaluate::{Evaluator, NullSqlExecutor, SqlExecutor, DEFAULT_SQL_TIMEOUT};
pub use types::{
    CatalogError, EligibilityCriteria, EvalContext, FieldCategory, FieldDataType, FieldDef,
    FieldOption, FieldRegistry, FieldRule, Group, GroupLogic, Operator, Placeholder, RuleNode,
    SqlBindings, SqlError, SqlRule, ValidationError, Value,
};
pub use validate::{validate_embedded, validate_named};
