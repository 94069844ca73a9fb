use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::Operator;

/// Data source a field is read from. Used for grouping in editor surfaces;
/// not semantically load-bearing during evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FieldCategory {
    PpmProject,
    EmployeeCandidate,
    Assignment,
}

impl FieldCategory {
    /// Display label for editor grouping.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            FieldCategory::PpmProject => "Project",
            FieldCategory::EmployeeCandidate => "Employee / Candidate",
            FieldCategory::Assignment => "Assignment",
        }
    }
}

/// Declared type of a field's values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FieldDataType {
    Text,
    Number,
    Date,
    Enum,
}

/// One choice in an enumerated field's fixed option list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldOption {
    pub value: String,
    pub label: String,
}

impl FieldOption {
    #[must_use]
    pub fn new(value: &str, label: &str) -> Self {
        Self {
            value: value.to_owned(),
            label: label.to_owned(),
        }
    }
}

/// Definition of one evaluable attribute: its type, the operators it
/// accepts, and (for enums) the allowed values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldDef {
    pub id: String,
    pub label: String,
    pub category: FieldCategory,
    pub data_type: FieldDataType,
    pub operators: Vec<Operator>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<FieldOption>,
}

impl FieldDef {
    /// Whether this field accepts the given operator.
    #[must_use]
    pub fn allows(&self, operator: Operator) -> bool {
        self.operators.contains(&operator)
    }

    /// The field's first declared operator, the editor default after a
    /// field switch invalidates the previous operator.
    #[must_use]
    pub fn default_operator(&self) -> Operator {
        self.operators.first().copied().unwrap_or(Operator::Equals)
    }
}

/// Insertion-ordered catalog of evaluable fields, keyed by field id.
#[derive(Debug, Clone, Default)]
pub struct FieldRegistry {
    fields: Vec<FieldDef>,
    index: HashMap<String, usize>,
}

impl FieldRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a field definition. A field with the same id replaces the
    /// earlier entry in place, keeping its position.
    pub fn register(&mut self, field: FieldDef) {
        if let Some(&idx) = self.index.get(&field.id) {
            self.fields[idx] = field;
        } else {
            self.index.insert(field.id.clone(), self.fields.len());
            self.fields.push(field);
        }
    }

    /// Look up a field definition by id.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&FieldDef> {
        self.index.get(id).map(|&idx| &self.fields[idx])
    }

    /// Iterate over all fields in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &FieldDef> {
        self.fields.iter()
    }

    /// The number of registered fields.
    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Whether the registry is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// The built-in HR onboarding field catalog.
    #[must_use]
    pub fn builtin() -> Self {
        use FieldCategory::{Assignment, EmployeeCandidate, PpmProject};
        use FieldDataType::{Date, Enum, Number, Text};
        use Operator::{
            Between, Contains, EndsWith, Equals, GreaterThan, GreaterThanOrEqual, In, IsEmpty,
            IsNotEmpty, LessThan, LessThanOrEqual, NotContains, NotEquals, NotIn, StartsWith,
        };

        let mut registry = Self::new();
        registry.register(FieldDef {
            id: "trade".to_owned(),
            label: "Trade".to_owned(),
            category: EmployeeCandidate,
            data_type: Enum,
            operators: vec![Equals, NotEquals, In, NotIn, IsEmpty, IsNotEmpty],
            options: vec![
                FieldOption::new("WELDER", "Welder"),
                FieldOption::new("ELECTRICIAN", "Electrician"),
                FieldOption::new("PIPEFITTER", "Pipefitter"),
                FieldOption::new("CARPENTER", "Carpenter"),
                FieldOption::new("LABORER", "Laborer"),
            ],
        });
        registry.register(FieldDef {
            id: "years_experience".to_owned(),
            label: "Years of Experience".to_owned(),
            category: EmployeeCandidate,
            data_type: Number,
            operators: vec![
                Equals,
                NotEquals,
                GreaterThan,
                LessThan,
                GreaterThanOrEqual,
                LessThanOrEqual,
                Between,
            ],
            options: vec![],
        });
        registry.register(FieldDef {
            id: "hire_date".to_owned(),
            label: "Hire Date".to_owned(),
            category: EmployeeCandidate,
            data_type: Date,
            operators: vec![GreaterThan, LessThan, Between, IsEmpty, IsNotEmpty],
            options: vec![],
        });
        registry.register(FieldDef {
            id: "home_state".to_owned(),
            label: "Home State".to_owned(),
            category: EmployeeCandidate,
            data_type: Text,
            operators: vec![Equals, NotEquals, In, NotIn, IsEmpty, IsNotEmpty],
            options: vec![],
        });
        registry.register(FieldDef {
            id: "security_clearance".to_owned(),
            label: "Security Clearance".to_owned(),
            category: EmployeeCandidate,
            data_type: Enum,
            operators: vec![Equals, NotEquals, In, NotIn, IsEmpty, IsNotEmpty],
            options: vec![
                FieldOption::new("NONE", "None"),
                FieldOption::new("CONFIDENTIAL", "Confidential"),
                FieldOption::new("SECRET", "Secret"),
                FieldOption::new("TOP_SECRET", "Top Secret"),
            ],
        });
        registry.register(FieldDef {
            id: "certifications".to_owned(),
            label: "Certifications".to_owned(),
            category: EmployeeCandidate,
            data_type: Text,
            operators: vec![
                Contains,
                NotContains,
                StartsWith,
                EndsWith,
                IsEmpty,
                IsNotEmpty,
            ],
            options: vec![],
        });
        registry.register(FieldDef {
            id: "project_type".to_owned(),
            label: "Project Type".to_owned(),
            category: PpmProject,
            data_type: Enum,
            operators: vec![Equals, NotEquals, In, NotIn],
            options: vec![
                FieldOption::new("DOD", "Department of Defense"),
                FieldOption::new("COMMERCIAL", "Commercial"),
                FieldOption::new("INDUSTRIAL", "Industrial"),
                FieldOption::new("INFRASTRUCTURE", "Infrastructure"),
            ],
        });
        registry.register(FieldDef {
            id: "project_state".to_owned(),
            label: "Project State".to_owned(),
            category: PpmProject,
            data_type: Text,
            operators: vec![Equals, NotEquals, In, NotIn],
            options: vec![],
        });
        registry.register(FieldDef {
            id: "project_start_date".to_owned(),
            label: "Project Start Date".to_owned(),
            category: PpmProject,
            data_type: Date,
            operators: vec![GreaterThan, LessThan, Between],
            options: vec![],
        });
        registry.register(FieldDef {
            id: "assignment_role".to_owned(),
            label: "Assignment Role".to_owned(),
            category: Assignment,
            data_type: Enum,
            operators: vec![Equals, NotEquals, In, NotIn],
            options: vec![
                FieldOption::new("FOREMAN", "Foreman"),
                FieldOption::new("JOURNEYMAN", "Journeyman"),
                FieldOption::new("APPRENTICE", "Apprentice"),
                FieldOption::new("SUPERINTENDENT", "Superintendent"),
            ],
        });
        registry.register(FieldDef {
            id: "assignment_start_date".to_owned(),
            label: "Assignment Start Date".to_owned(),
            category: Assignment,
            data_type: Date,
            operators: vec![GreaterThan, LessThan, Between, IsEmpty, IsNotEmpty],
            options: vec![],
        });
        registry
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn register_and_get() {
        let mut registry = FieldRegistry::new();
        registry.register(FieldDef {
            id: "trade".to_owned(),
            label: "Trade".to_owned(),
            category: FieldCategory::EmployeeCandidate,
            data_type: FieldDataType::Enum,
            operators: vec![Operator::Equals],
            options: vec![FieldOption::new("WELDER", "Welder")],
        });
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.get("trade").unwrap().label, "Trade");
        assert!(registry.get("nonexistent").is_none());
    }

    #[test]
    fn duplicate_register_replaces_in_place() {
        let mut registry = FieldRegistry::new();
        let mut field = FieldDef {
            id: "trade".to_owned(),
            label: "Trade".to_owned(),
            category: FieldCategory::EmployeeCandidate,
            data_type: FieldDataType::Enum,
            operators: vec![Operator::Equals],
            options: vec![],
        };
        registry.register(field.clone());
        field.label = "Trade (updated)".to_owned();
        registry.register(field);
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.get("trade").unwrap().label, "Trade (updated)");
    }

    #[test]
    fn empty_registry() {
        let registry = FieldRegistry::new();
        assert!(registry.is_empty());
        assert_eq!(registry.len(), 0);
    }

    #[test]
    fn builtin_has_core_fields() {
        let registry = FieldRegistry::builtin();
        assert!(registry.get("trade").is_some());
        assert!(registry.get("years_experience").is_some());
        let trade = registry.get("trade").unwrap();
        assert_eq!(trade.data_type, FieldDataType::Enum);
        assert!(trade.allows(Operator::Equals));
        assert!(!trade.allows(Operator::Between));
    }

    #[test]
    fn builtin_enum_fields_carry_options() {
        let registry = FieldRegistry::builtin();
        for field in registry.iter() {
            if field.data_type == FieldDataType::Enum {
                assert!(!field.options.is_empty(), "enum field {} has no options", field.id);
            } else {
                assert!(field.options.is_empty(), "non-enum field {} has options", field.id);
            }
        }
    }

    #[test]
    fn builtin_operators_respect_arity_sanity() {
        // between only appears on fields with an ordered data type
        let registry = FieldRegistry::builtin();
        for field in registry.iter() {
            if field.allows(Operator::Between) {
                assert!(matches!(
                    field.data_type,
                    FieldDataType::Number | FieldDataType::Date
                ));
            }
            assert!(!field.operators.is_empty());
        }
    }

    #[test]
    fn default_operator_is_first_declared() {
        let registry = FieldRegistry::builtin();
        let hire_date = registry.get("hire_date").unwrap();
        assert_eq!(hire_date.default_operator(), Operator::GreaterThan);
    }

    #[test]
    fn category_wire_tokens() {
        assert_eq!(
            serde_json::to_string(&FieldCategory::PpmProject).unwrap(),
            "\"PPM_PROJECT\""
        );
        assert_eq!(
            serde_json::to_string(&FieldDataType::Text).unwrap(),
            "\"TEXT\""
        );
        assert_eq!(FieldCategory::EmployeeCandidate.label(), "Employee / Candidate");
    }
}
