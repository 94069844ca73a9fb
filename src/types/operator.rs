use std::fmt;

use serde::{Deserialize, Serialize};

/// Comparison operators available to field rules.
///
/// Each operator declares its value arity: the emptiness checks take no
/// value at all, `between` takes a second one, everything else takes one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Operator {
    Equals,
    NotEquals,
    Contains,
    NotContains,
    StartsWith,
    EndsWith,
    In,
    NotIn,
    GreaterThan,
    LessThan,
    GreaterThanOrEqual,
    LessThanOrEqual,
    Between,
    IsEmpty,
    IsNotEmpty,
}

impl Operator {
    /// Every operator, in display order.
    pub const ALL: [Operator; 15] = [
        Operator::Equals,
        Operator::NotEquals,
        Operator::Contains,
        Operator::NotContains,
        Operator::StartsWith,
        Operator::EndsWith,
        Operator::In,
        Operator::NotIn,
        Operator::GreaterThan,
        Operator::LessThan,
        Operator::GreaterThanOrEqual,
        Operator::LessThanOrEqual,
        Operator::Between,
        Operator::IsEmpty,
        Operator::IsNotEmpty,
    ];

    /// Whether the operator needs a comparison value at all.
    #[must_use]
    pub fn requires_value(self) -> bool {
        !matches!(self, Operator::IsEmpty | Operator::IsNotEmpty)
    }

    /// Whether the operator needs a second value (range end).
    #[must_use]
    pub fn requires_second_value(self) -> bool {
        matches!(self, Operator::Between)
    }

    /// Human-readable label for editor surfaces.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Operator::Equals => "equals",
            Operator::NotEquals => "does not equal",
            Operator::Contains => "contains",
            Operator::NotContains => "does not contain",
            Operator::StartsWith => "starts with",
            Operator::EndsWith => "ends with",
            Operator::In => "is one of",
            Operator::NotIn => "is not one of",
            Operator::GreaterThan => "is greater than",
            Operator::LessThan => "is less than",
            Operator::GreaterThanOrEqual => "is at least",
            Operator::LessThanOrEqual => "is at most",
            Operator::Between => "is between",
            Operator::IsEmpty => "is empty",
            Operator::IsNotEmpty => "is not empty",
        }
    }

    /// The wire token (`snake_case`, matching the serde representation).
    #[must_use]
    pub fn token(self) -> &'static str {
        match self {
            Operator::Equals => "equals",
            Operator::NotEquals => "not_equals",
            Operator::Contains => "contains",
            Operator::NotContains => "not_contains",
            Operator::StartsWith => "starts_with",
            Operator::EndsWith => "ends_with",
            Operator::In => "in",
            Operator::NotIn => "not_in",
            Operator::GreaterThan => "greater_than",
            Operator::LessThan => "less_than",
            Operator::GreaterThanOrEqual => "greater_than_or_equal",
            Operator::LessThanOrEqual => "less_than_or_equal",
            Operator::Between => "between",
            Operator::IsEmpty => "is_empty",
            Operator::IsNotEmpty => "is_not_empty",
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn emptiness_checks_take_no_value() {
        for op in Operator::ALL {
            let expected = !matches!(op, Operator::IsEmpty | Operator::IsNotEmpty);
            assert_eq!(op.requires_value(), expected, "arity wrong for {op}");
        }
    }

    #[test]
    fn only_between_takes_a_second_value() {
        for op in Operator::ALL {
            assert_eq!(op.requires_second_value(), op == Operator::Between);
        }
    }

    #[test]
    fn wire_tokens_round_trip() {
        for op in Operator::ALL {
            let json = serde_json::to_string(&op).unwrap();
            assert_eq!(json, format!("\"{}\"", op.token()));
            let back: Operator = serde_json::from_str(&json).unwrap();
            assert_eq!(back, op);
        }
    }

    #[test]
    fn stable_tokens() {
        assert_eq!(Operator::GreaterThanOrEqual.token(), "greater_than_or_equal");
        assert_eq!(Operator::In.token(), "in");
        assert_eq!(Operator::IsNotEmpty.token(), "is_not_empty");
    }

    #[test]
    fn labels_are_human_readable() {
        assert_eq!(Operator::In.label(), "is one of");
        assert_eq!(Operator::Between.label(), "is between");
    }
}
