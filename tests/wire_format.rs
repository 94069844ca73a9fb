//! Golden tests for the persisted JSON shape. Criteria documents written by
//! other services must parse here, and what we emit must keep the `kind`
//! tags and camelCase keys stable.

use eligibility::{
    EligibilityCriteria, EntityBinding, FieldRule, Group, GroupLogic, Operator, RuleNode, SqlRule,
    Value,
};
use pretty_assertions::assert_eq;
use serde_json::json;

const WELDER_GATE: &str = r#"{
  "id": "criteria-7c2f",
  "name": "Certified Welders",
  "description": "DOD welding gate",
  "isActive": true,
  "rootGroup": {
    "kind": "GROUP",
    "id": "group-root",
    "logic": "AND",
    "children": [
      {
        "kind": "FIELD_RULE",
        "id": "rule-1",
        "fieldId": "trade",
        "operator": "equals",
        "value": "WELDER"
      },
      {
        "kind": "GROUP",
        "id": "group-exp",
        "logic": "OR",
        "children": [
          {
            "kind": "FIELD_RULE",
            "id": "rule-2",
            "fieldId": "years_experience",
            "operator": "between",
            "value": 2,
            "valueEnd": 10
          },
          {
            "kind": "SQL_RULE",
            "id": "sql-1",
            "name": "Active welding cert",
            "description": "",
            "query": "SELECT 1 FROM certs WHERE worker_id = :worker_id"
          }
        ]
      }
    ]
  },
  "createdAt": "2024-03-01T12:00:00Z",
  "updatedAt": "2024-03-02T09:30:00Z"
}"#;

#[test]
fn parses_handwritten_criteria_document() {
    let criteria: EligibilityCriteria = serde_json::from_str(WELDER_GATE).unwrap();

    assert_eq!(criteria.id, "criteria-7c2f");
    assert_eq!(criteria.name, "Certified Welders");
    assert_eq!(criteria.description.as_deref(), Some("DOD welding gate"));
    assert!(criteria.is_active);
    assert_eq!(criteria.root_group.logic, GroupLogic::And);
    assert_eq!(criteria.root_group.children.len(), 2);
    assert_eq!(criteria.rule_count(), 3);

    match &criteria.root_group.children[0] {
        RuleNode::Field(rule) => {
            assert_eq!(rule.field_id, "trade");
            assert_eq!(rule.operator, Operator::Equals);
            assert_eq!(rule.value, Some(Value::Text("WELDER".to_owned())));
            assert_eq!(rule.value_end, None);
        }
        other => panic!("expected field rule, got {other:?}"),
    }

    let nested = criteria.root_group.children[1].as_group().unwrap();
    assert_eq!(nested.logic, GroupLogic::Or);
    match &nested.children[0] {
        RuleNode::Field(rule) => {
            assert_eq!(rule.operator, Operator::Between);
            assert_eq!(rule.value, Some(Value::Int(2)));
            assert_eq!(rule.value_end, Some(Value::Int(10)));
        }
        other => panic!("expected field rule, got {other:?}"),
    }
    match &nested.children[1] {
        RuleNode::Sql(sql) => {
            assert_eq!(sql.name, "Active welding cert");
            assert!(sql.query.contains(":worker_id"));
        }
        other => panic!("expected SQL rule, got {other:?}"),
    }
}

#[test]
fn criteria_document_round_trips_losslessly() {
    let criteria: EligibilityCriteria = serde_json::from_str(WELDER_GATE).unwrap();
    let emitted = serde_json::to_value(&criteria).unwrap();
    // every group carries its discriminator, the root included
    assert_eq!(emitted["rootGroup"]["kind"], "GROUP");
    let original: serde_json::Value = serde_json::from_str(WELDER_GATE).unwrap();
    assert_eq!(emitted, original);
}

#[test]
fn emitted_tree_shape() {
    let tree = RuleNode::Group(Group {
        id: "group-1".to_owned(),
        logic: GroupLogic::Or,
        children: vec![RuleNode::Field(FieldRule {
            id: "rule-1".to_owned(),
            field_id: "home_state".to_owned(),
            operator: Operator::In,
            value: Some(Value::List(vec!["TX".to_owned(), "LA".to_owned()])),
            value_end: None,
        })],
    });

    let expected = json!({
        "kind": "GROUP",
        "id": "group-1",
        "logic": "OR",
        "children": [
            {
                "kind": "FIELD_RULE",
                "id": "rule-1",
                "fieldId": "home_state",
                "operator": "in",
                "value": ["TX", "LA"]
            }
        ]
    });
    assert_eq!(serde_json::to_value(&tree).unwrap(), expected);
}

#[test]
fn scalar_values_distinguish_int_and_float() {
    let rule: FieldRule = serde_json::from_value(json!({
        "id": "rule-1",
        "fieldId": "years_experience",
        "operator": "equals",
        "value": 5
    }))
    .unwrap();
    assert_eq!(rule.value, Some(Value::Int(5)));

    let rule: FieldRule = serde_json::from_value(json!({
        "id": "rule-1",
        "fieldId": "years_experience",
        "operator": "equals",
        "value": 5.5
    }))
    .unwrap();
    assert_eq!(rule.value, Some(Value::Float(5.5)));

    let rule: FieldRule = serde_json::from_value(json!({
        "id": "rule-1",
        "fieldId": "union_member",
        "operator": "equals",
        "value": true
    }))
    .unwrap();
    assert_eq!(rule.value, Some(Value::Bool(true)));
}

#[test]
fn operator_tokens_are_snake_case() {
    for (op, token) in [
        (Operator::Equals, "equals"),
        (Operator::NotEquals, "not_equals"),
        (Operator::GreaterThanOrEqual, "greater_than_or_equal"),
        (Operator::StartsWith, "starts_with"),
        (Operator::IsNotEmpty, "is_not_empty"),
    ] {
        assert_eq!(serde_json::to_value(op).unwrap(), json!(token));
    }
}

#[test]
fn binding_wire_shapes() {
    let named: EntityBinding =
        serde_json::from_value(json!({ "namedCriteriaId": "criteria-7c2f" })).unwrap();
    assert_eq!(named, EntityBinding::named("criteria-7c2f"));

    let criteria: EligibilityCriteria = serde_json::from_str(WELDER_GATE).unwrap();
    let doc: serde_json::Value = serde_json::from_str(WELDER_GATE).unwrap();
    let embedded: EntityBinding =
        serde_json::from_value(json!({ "embeddedCriteria": doc })).unwrap();
    assert_eq!(embedded, EntityBinding::embedded(criteria));
}

#[test]
fn blank_sql_rule_keeps_all_fields_on_the_wire() {
    let sql = RuleNode::Sql(SqlRule {
        id: "sql-1".to_owned(),
        name: String::new(),
        description: String::new(),
        query: String::new(),
    });
    let expected = json!({
        "kind": "SQL_RULE",
        "id": "sql-1",
        "name": "",
        "description": "",
        "query": ""
    });
    assert_eq!(serde_json::to_value(&sql).unwrap(), expected);
}
