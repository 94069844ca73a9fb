use std::collections::HashMap;

use super::Value;

/// Named placeholder tokens an eligibility SQL query may mention. The
/// executor binds these from the evaluation context.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Placeholder {
    WorkerId,
    ProjectId,
    TemplateId,
    AssignmentId,
}

impl Placeholder {
    pub const ALL: [Placeholder; 4] = [
        Placeholder::WorkerId,
        Placeholder::ProjectId,
        Placeholder::TemplateId,
        Placeholder::AssignmentId,
    ];

    /// The token as it appears in query text.
    #[must_use]
    pub fn token(self) -> &'static str {
        match self {
            Placeholder::WorkerId => ":worker_id",
            Placeholder::ProjectId => ":project_id",
            Placeholder::TemplateId => ":template_id",
            Placeholder::AssignmentId => ":assignment_id",
        }
    }

    /// Which recognized placeholders appear in a query. Duplicates are
    /// reported once, in declaration order.
    #[must_use]
    pub fn scan(query: &str) -> Vec<Placeholder> {
        Self::ALL
            .into_iter()
            .filter(|p| query.contains(p.token()))
            .collect()
    }
}

/// Identifiers the executor substitutes for the named placeholders.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SqlBindings {
    pub worker_id: Option<String>,
    pub project_id: Option<String>,
    pub template_id: Option<String>,
    pub assignment_id: Option<String>,
}

impl SqlBindings {
    /// The bound identifier for a placeholder, if any.
    #[must_use]
    pub fn get(&self, placeholder: Placeholder) -> Option<&str> {
        match placeholder {
            Placeholder::WorkerId => self.worker_id.as_deref(),
            Placeholder::ProjectId => self.project_id.as_deref(),
            Placeholder::TemplateId => self.template_id.as_deref(),
            Placeholder::AssignmentId => self.assignment_id.as_deref(),
        }
    }
}

/// Concrete attribute values for one candidate/context, keyed by field id,
/// plus the identifiers SQL rules are bound with.
///
/// Purely data: evaluation is a pure function of `(tree, context)`, so
/// contexts can be built and evaluated concurrently without coordination.
#[derive(Debug, Clone, Default)]
pub struct EvalContext {
    values: HashMap<String, Value>,
    bindings: SqlBindings,
}

impl EvalContext {
    /// Create an empty context.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a field value, builder style.
    #[must_use]
    pub fn set(mut self, field_id: &str, value: impl Into<Value>) -> Self {
        self.insert(field_id, value.into());
        self
    }

    /// Insert a field value (mutable reference version).
    pub fn insert(&mut self, field_id: &str, value: Value) {
        self.values.insert(field_id.to_owned(), value);
    }

    /// Look up a field value.
    #[must_use]
    pub fn get(&self, field_id: &str) -> Option<&Value> {
        self.values.get(field_id)
    }

    /// Bind the worker (employee/candidate) identifier.
    #[must_use]
    pub fn worker(mut self, id: &str) -> Self {
        self.bindings.worker_id = Some(id.to_owned());
        self
    }

    /// Bind the project identifier.
    #[must_use]
    pub fn project(mut self, id: &str) -> Self {
        self.bindings.project_id = Some(id.to_owned());
        self
    }

    /// Bind the template identifier.
    #[must_use]
    pub fn template(mut self, id: &str) -> Self {
        self.bindings.template_id = Some(id.to_owned());
        self
    }

    /// Bind the assignment identifier.
    #[must_use]
    pub fn assignment(mut self, id: &str) -> Self {
        self.bindings.assignment_id = Some(id.to_owned());
        self
    }

    /// The SQL placeholder bindings for this context.
    #[must_use]
    pub fn bindings(&self) -> &SqlBindings {
        &self.bindings
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_and_get() {
        let ctx = EvalContext::new().set("trade", "WELDER");
        assert_eq!(ctx.get("trade"), Some(&Value::Text("WELDER".to_owned())));
        assert_eq!(ctx.get("missing"), None);
    }

    #[test]
    fn overwrite_value() {
        let ctx = EvalContext::new()
            .set("years_experience", 3_i64)
            .set("years_experience", 7_i64);
        assert_eq!(ctx.get("years_experience"), Some(&Value::Int(7)));
    }

    #[test]
    fn insert_mutable_ref() {
        let mut ctx = EvalContext::new();
        ctx.insert("union_member", Value::Bool(true));
        assert_eq!(ctx.get("union_member"), Some(&Value::Bool(true)));
    }

    #[test]
    fn bindings_flow_through() {
        let ctx = EvalContext::new()
            .worker("w-1")
            .project("p-2")
            .template("t-3")
            .assignment("a-4");
        let bindings = ctx.bindings();
        assert_eq!(bindings.get(Placeholder::WorkerId), Some("w-1"));
        assert_eq!(bindings.get(Placeholder::ProjectId), Some("p-2"));
        assert_eq!(bindings.get(Placeholder::TemplateId), Some("t-3"));
        assert_eq!(bindings.get(Placeholder::AssignmentId), Some("a-4"));
    }

    #[test]
    fn unbound_placeholders_are_none() {
        let ctx = EvalContext::new().worker("w-1");
        assert_eq!(ctx.bindings().get(Placeholder::ProjectId), None);
    }

    #[test]
    fn scan_finds_recognized_tokens() {
        let query = "SELECT 1 FROM certs WHERE worker_id = :worker_id AND project = :project_id";
        assert_eq!(
            Placeholder::scan(query),
            vec![Placeholder::WorkerId, Placeholder::ProjectId]
        );
        assert!(Placeholder::scan("SELECT 1").is_empty());
    }
}
