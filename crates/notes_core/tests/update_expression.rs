use notes_core::update::apply_update;
use notes_core::{Item, UpdateBuildError, UpdateExpressionBuilder};
use serde_json::{json, Value};

fn payload(value: Value) -> Item {
    value.as_object().cloned().expect("payload should be an object")
}

#[test]
fn identifier_is_stripped_even_when_supplied() {
    let plan = UpdateExpressionBuilder::default()
        .build(&payload(json!({"id": "forged", "text": "a"})))
        .unwrap();

    assert_eq!(plan.directive.len(), 1);
    assert!(plan.bindings.names.values().all(|name| name != "id"));
    assert!(plan.bindings.values.values().all(|value| value != "forged"));
    assert!(!plan.directive.expression().contains("id"));
}

#[test]
fn identifier_only_payload_is_rejected() {
    let err = UpdateExpressionBuilder::default()
        .build(&payload(json!({"id": "x"})))
        .unwrap_err();
    assert_eq!(err, UpdateBuildError::NoMutableFields);
}

#[test]
fn empty_and_protected_only_payloads_are_rejected() {
    let builder = UpdateExpressionBuilder::default();
    assert!(builder.build(&Item::new()).is_err());
    assert!(builder
        .build(&payload(json!({"id": "x", "createdAt": "2020-01-01T00:00:00.000Z"})))
        .is_err());
}

#[test]
fn one_clause_per_field_with_matching_bound_values() {
    let patch = payload(json!({
        "text": "hi",
        "done": true,
        "priority": 3,
        "tags": ["a", "b"],
        "meta": {"color": "red"},
        "archived": null,
        "id": "ignored"
    }));

    let plan = UpdateExpressionBuilder::default().build(&patch).unwrap();
    assert_eq!(plan.directive.len(), 6);
    assert_eq!(plan.bindings.names.len(), 6);
    assert_eq!(plan.bindings.values.len(), 6);

    for clause in plan.directive.assignments() {
        let field = plan.bindings.name(&clause.name_placeholder).unwrap();
        let value = plan.bindings.value(&clause.value_placeholder).unwrap();
        assert_eq!(Some(value), patch.get(field), "field {field}");
    }
}

#[test]
fn clauses_follow_payload_order() {
    let plan = UpdateExpressionBuilder::default()
        .build(&payload(json!({"zeta": 1, "alpha": 2})))
        .unwrap();
    assert_eq!(
        plan.directive.expression(),
        "SET #f_zeta = :f_zeta, #f_alpha = :f_alpha"
    );
}

#[test]
fn directive_text_contains_placeholders_only() {
    let plan = UpdateExpressionBuilder::default()
        .build(&payload(json!({"text": "x = :y, id = :z", "weird key": "v"})))
        .unwrap();

    let expression = plan.directive.expression();
    assert_eq!(
        expression,
        "SET #f_text = :f_text, #h_7765697264206b6579 = :h_7765697264206b6579"
    );
    assert!(!expression.contains(":y"));
    assert_eq!(
        plan.bindings.name("#h_7765697264206b6579"),
        Some("weird key")
    );
}

#[test]
fn repeated_builds_are_identical() {
    let patch = payload(json!({"text": "a", "count": 2}));
    let builder = UpdateExpressionBuilder::default();
    assert_eq!(builder.build(&patch).unwrap(), builder.build(&patch).unwrap());
}

#[test]
fn custom_protected_list_is_honored() {
    let builder = UpdateExpressionBuilder::new(&["id"]);
    let plan = builder
        .build(&payload(json!({"id": "x", "createdAt": "now"})))
        .unwrap();
    assert_eq!(plan.directive.len(), 1);
    assert_eq!(plan.bindings.name("#f_createdAt"), Some("createdAt"));
}

#[test]
fn plan_applies_only_named_fields() {
    let mut item = payload(json!({"id": "n1", "text": "hello", "pinned": false}));
    let plan = UpdateExpressionBuilder::default()
        .build(&payload(json!({"text": "bye", "id": "ignored", "color": "blue"})))
        .unwrap();

    apply_update(&mut item, &plan.directive, &plan.bindings).unwrap();
    assert_eq!(
        Value::Object(item),
        json!({"id": "n1", "text": "bye", "pinned": false, "color": "blue"})
    );
}
