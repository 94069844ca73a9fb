//! Recursive, fail-closed evaluation of rule trees.
//!
//! Evaluation never errors: an unresolved field, a malformed rule, a SQL
//! failure, or a timeout all evaluate to `false` and emit a `tracing`
//! event. Eligibility gating must degrade to "not eligible" rather than
//! crash the surrounding workflow, and a systematically failing rule must
//! still be visible to operators.

use std::cmp::Ordering;
use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::binding::EntityBinding;
use crate::catalog::CriteriaCatalog;
use crate::types::{
    EligibilityCriteria, EvalContext, FieldDataType, FieldDef, FieldRegistry, FieldRule, Group,
    GroupLogic, Operator, RuleNode, SqlBindings, SqlError, SqlRule, Value,
};

/// Wall-clock budget applied to each SQL leaf independently.
pub const DEFAULT_SQL_TIMEOUT: Duration = Duration::from_secs(5);

/// The opaque query capability SQL rules delegate to.
///
/// The executor binds the recognized placeholders from `bindings` and runs
/// the query; truthiness is "row count >= 1". Implementations live outside
/// this crate (a real database pool in production, fakes in tests).
#[async_trait]
pub trait SqlExecutor: Send + Sync {
    async fn row_count(&self, query: &str, bindings: &SqlBindings) -> Result<u64, SqlError>;
}

/// Executor for deployments without SQL support. Every query errors, so
/// SQL leaves fail closed.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSqlExecutor;

#[async_trait]
impl SqlExecutor for NullSqlExecutor {
    async fn row_count(&self, _query: &str, _bindings: &SqlBindings) -> Result<u64, SqlError> {
        Err(SqlError::Execution("no SQL executor configured".to_owned()))
    }
}

/// Walks a rule tree against a concrete context and produces a boolean.
///
/// Evaluation is pure given `(tree, context)`; one evaluator can serve
/// concurrent evaluations of different contexts without coordination.
#[derive(Debug)]
pub struct Evaluator<E> {
    registry: FieldRegistry,
    executor: E,
    sql_timeout: Duration,
}

impl<E: SqlExecutor> Evaluator<E> {
    #[must_use]
    pub fn new(registry: FieldRegistry, executor: E) -> Self {
        Self {
            registry,
            executor,
            sql_timeout: DEFAULT_SQL_TIMEOUT,
        }
    }

    /// Override the per-leaf SQL budget.
    #[must_use]
    pub fn with_sql_timeout(mut self, timeout: Duration) -> Self {
        self.sql_timeout = timeout;
        self
    }

    /// The field registry this evaluator resolves rules against.
    #[must_use]
    pub fn registry(&self) -> &FieldRegistry {
        &self.registry
    }

    /// Evaluate a whole criteria. Inactive criteria gate nothing and
    /// evaluate to `true` without walking the tree.
    pub async fn evaluate_criteria(
        &self,
        criteria: &EligibilityCriteria,
        ctx: &EvalContext,
    ) -> bool {
        if !criteria.is_active {
            debug!(criteria_id = %criteria.id, "criteria inactive, skipping evaluation");
            return true;
        }
        self.eval_group(&criteria.root_group, ctx).await
    }

    /// Evaluate a single node of the tree.
    pub async fn evaluate(&self, node: &RuleNode, ctx: &EvalContext) -> bool {
        self.eval_node(node, ctx).await
    }

    /// Resolve an entity binding and evaluate the result. A dangling named
    /// reference is a resolution error and fails closed.
    pub async fn evaluate_binding(
        &self,
        binding: &EntityBinding,
        catalog: &dyn CriteriaCatalog,
        ctx: &EvalContext,
    ) -> bool {
        match binding.resolve(catalog).await {
            Ok(criteria) => self.evaluate_criteria(&criteria, ctx).await,
            Err(err) => {
                warn!(%err, "failed to resolve criteria binding, failing closed");
                false
            }
        }
    }

    /// Empty groups are vacuously true for both logics: an empty gate
    /// blocks nothing. Children evaluate left to right with short-circuit;
    /// each SQL leaf carries its own wall-clock budget, so a hanging leaf
    /// cannot consume a sibling's.
    async fn eval_group(&self, group: &Group, ctx: &EvalContext) -> bool {
        match group.logic {
            GroupLogic::And => {
                for child in &group.children {
                    if !self.eval_node(child, ctx).await {
                        return false;
                    }
                }
                true
            }
            GroupLogic::Or => {
                if group.children.is_empty() {
                    return true;
                }
                for child in &group.children {
                    if self.eval_node(child, ctx).await {
                        return true;
                    }
                }
                false
            }
        }
    }

    fn eval_node<'a>(
        &'a self,
        node: &'a RuleNode,
        ctx: &'a EvalContext,
    ) -> Pin<Box<dyn Future<Output = bool> + Send + 'a>> {
        Box::pin(async move {
            match node {
                RuleNode::Group(group) => self.eval_group(group, ctx).await,
                RuleNode::Field(rule) => self.eval_field_rule(rule, ctx),
                RuleNode::Sql(rule) => self.eval_sql_rule(rule, ctx).await,
            }
        })
    }

    fn eval_field_rule(&self, rule: &FieldRule, ctx: &EvalContext) -> bool {
        let Some(field) = self.registry.get(&rule.field_id) else {
            warn!(
                rule_id = %rule.id,
                field_id = %rule.field_id,
                "field rule references unknown field, failing closed"
            );
            return false;
        };
        let actual = ctx.get(&rule.field_id);
        match rule.operator {
            // Emptiness operators are exactly the test for an absent or
            // empty attribute, so a missing value answers them directly.
            Operator::IsEmpty => actual.map_or(true, Value::is_empty_value),
            Operator::IsNotEmpty => actual.is_some_and(|v| !v.is_empty_value()),
            op => {
                let Some(actual) = actual else {
                    return false;
                };
                apply_operator(op, field, actual, rule.value.as_ref(), rule.value_end.as_ref())
            }
        }
    }

    async fn eval_sql_rule(&self, rule: &SqlRule, ctx: &EvalContext) -> bool {
        let fut = self.executor.row_count(&rule.query, ctx.bindings());
        match tokio::time::timeout(self.sql_timeout, fut).await {
            Ok(Ok(rows)) => rows >= 1,
            Ok(Err(err)) => {
                warn!(
                    rule_id = %rule.id,
                    rule_name = %rule.name,
                    %err,
                    "SQL rule failed, failing closed"
                );
                false
            }
            Err(_) => {
                warn!(
                    rule_id = %rule.id,
                    rule_name = %rule.name,
                    budget = ?self.sql_timeout,
                    "SQL rule timed out, failing closed"
                );
                false
            }
        }
    }
}

/// Apply a comparison operator. Any type mismatch or missing expected value
/// yields `false`.
fn apply_operator(
    op: Operator,
    field: &FieldDef,
    actual: &Value,
    expected: Option<&Value>,
    expected_end: Option<&Value>,
) -> bool {
    match op {
        Operator::Equals => {
            compare(field.data_type, actual, expected) == Some(Ordering::Equal)
        }
        Operator::NotEquals => {
            matches!(compare(field.data_type, actual, expected), Some(ord) if ord != Ordering::Equal)
        }
        Operator::GreaterThan => {
            compare(field.data_type, actual, expected) == Some(Ordering::Greater)
        }
        Operator::LessThan => compare(field.data_type, actual, expected) == Some(Ordering::Less),
        Operator::GreaterThanOrEqual => {
            matches!(compare(field.data_type, actual, expected), Some(ord) if ord != Ordering::Less)
        }
        Operator::LessThanOrEqual => {
            matches!(compare(field.data_type, actual, expected), Some(ord) if ord != Ordering::Greater)
        }
        Operator::Between => {
            let lower = compare(field.data_type, actual, expected);
            let upper = compare(field.data_type, actual, expected_end);
            matches!(lower, Some(ord) if ord != Ordering::Less)
                && matches!(upper, Some(ord) if ord != Ordering::Greater)
        }
        Operator::Contains => text_test(actual, expected, |a, b| a.contains(b)),
        Operator::NotContains => {
            text_pair(actual, expected).is_some_and(|(a, b)| !a.contains(b))
        }
        Operator::StartsWith => text_test(actual, expected, |a, b| a.starts_with(b)),
        Operator::EndsWith => text_test(actual, expected, |a, b| a.ends_with(b)),
        Operator::In => membership(actual, expected).unwrap_or(false),
        Operator::NotIn => membership(actual, expected).map(|found| !found).unwrap_or(false),
        // handled by the caller
        Operator::IsEmpty | Operator::IsNotEmpty => false,
    }
}

/// Type-aware ordering: DATE fields compare as calendar dates, everything
/// else through `Value` ordering.
fn compare(data_type: FieldDataType, actual: &Value, expected: Option<&Value>) -> Option<Ordering> {
    let expected = expected?;
    if data_type == FieldDataType::Date {
        return actual.as_date()?.partial_cmp(&expected.as_date()?);
    }
    actual.partial_cmp_value(expected)
}

fn text_pair<'a>(actual: &'a Value, expected: Option<&'a Value>) -> Option<(&'a str, &'a str)> {
    match (actual, expected?) {
        (Value::Text(a), Value::Text(b)) => Some((a, b)),
        _ => None,
    }
}

fn text_test(
    actual: &Value,
    expected: Option<&Value>,
    test: impl FnOnce(&str, &str) -> bool,
) -> bool {
    text_pair(actual, expected).is_some_and(|(a, b)| test(a, b))
}

/// Whether the context value appears in the rule's list value. `None` when
/// either side has no membership form (fail closed for both in/not_in).
fn membership(actual: &Value, expected: Option<&Value>) -> Option<bool> {
    let Value::List(items) = expected? else {
        return None;
    };
    let key = actual.membership_key()?;
    Some(items.iter().any(|item| *item == key))
}
