//! End-to-end conformance suite over the public API: parse documents, build
//! environments, check values, inspect the reported errors.

use json_conform::{validate, DefinitionError, Schema, ShapeError, TypeEnv, Value};
use serde_json::json;

fn check(value: serde_json::Value, schema: serde_json::Value) -> Result<(), ShapeError> {
    check_with(value, schema, json!({}))
}

fn check_with(
    value: serde_json::Value,
    schema: serde_json::Value,
    types: serde_json::Value,
) -> Result<(), ShapeError> {
    let env = TypeEnv::parse(&Value::from(types))?;
    let schema = Schema::parse(&Value::from(schema))?;
    validate(&Value::from(value), &schema, &env)
}

#[test]
fn anything_accepts_every_value() {
    let values = [
        json!("x"),
        json!(0),
        json!(-1.25),
        json!(true),
        json!(false),
        json!(null),
        json!([1, [2, "three"]]),
        json!({"nested": {"deeply": [null]}}),
    ];
    for v in values {
        assert!(check(v, json!("anything")).is_ok());
    }
}

#[test]
fn literal_succeeds_exactly_on_deep_equality() {
    let samples = [
        json!("x"),
        json!(false),
        json!([1, "a", null]),
        json!({"x": {"y": [1, 2]}}),
    ];
    for v in samples {
        assert!(check(v.clone(), json!(["literal", v])).is_ok());
    }
    assert!(check(json!(true), json!(["literal", false])).is_err());
    assert!(check(json!(1), json!(["literal", "1"])).is_err());
    assert!(check(json!([1, 2]), json!(["literal", [2, 1]])).is_err());
}

#[test]
fn integer_and_number_tags() {
    assert!(check(json!(1), json!("integer")).is_ok());
    assert!(check(json!(1.0), json!("integer")).is_err());
    assert!(check(json!(1), json!("number")).is_ok());
    assert!(check(json!(1.0), json!("number")).is_ok());
}

#[test]
fn bounds_are_inclusive() {
    assert!(check(json!(9000), json!(["integer", {"min": 9000}])).is_ok());
    assert!(check(json!(8999.9), json!(["number", {"min": 9000}])).is_err());
    assert!(check(json!(3), json!(["number", {"max": 3}])).is_ok());
    assert!(check(json!(0), json!(["integer", {"min": 0, "max": 0}])).is_ok());
}

#[test]
fn tuple_optionality_window() {
    let schema = json!(["tuple", {"elements": [
        "string", "integer", ["optional", "array"]
    ]}]);
    assert!(check(json!(["a", 1]), schema.clone()).is_ok());
    assert!(check(json!(["a", 1, []]), schema.clone()).is_ok());
    assert!(check(json!(["a"]), schema.clone()).is_err());
    assert!(check(json!(["a", 1, [], 4]), schema.clone()).is_err());
    assert!(check(json!(["a", 1, "not-an-array"]), schema).is_err());
}

#[test]
fn object_exactness_and_optional_members() {
    assert!(check(json!({"a": 1}), json!(["object", {"members": {"a": "integer"}}])).is_ok());
    assert!(check(json!({"a": 1, "b": 2}), json!(["object", {"members": {"a": "integer"}}])).is_err());
    assert!(check(
        json!({"a": 1, "b": 2}),
        json!(["object", {"members": {"a": "integer", "b": "integer"}}])
    )
    .is_ok());
    assert!(check(
        json!({"a": 1}),
        json!(["object", {"members": {"a": "integer", "b": "undefined"}}])
    )
    .is_ok());
    assert!(check(
        json!({"a": 1}),
        json!(["object", {"members": {"a": "integer", "b": ["optional", "integer"]}}])
    )
    .is_ok());
}

#[test]
fn relaxed_objects_via_allow_flags() {
    assert!(check(
        json!({"a": 1, "extra": "ignored"}),
        json!(["object", {"members": {"a": "integer"}, "allow_extra": true}])
    )
    .is_ok());
    assert!(check(
        json!({}),
        json!(["object", {"members": {"a": "integer"}, "allow_missing": true}])
    )
    .is_ok());
    assert!(check(
        json!({"a": 1, "extra": 2}),
        json!(["object", {"members": {"a": "integer"}, "allow_missing": true}])
    )
    .is_err());
}

#[test]
fn restrict_composes_requirements_and_rejections() {
    let schema = json!(["restrict", {
        "require": ["integer", ["integer", {"min": -2, "max": 2}]],
        "reject": [["enum", {"values": [0]}]]
    }]);
    assert!(check(json!(2), schema.clone()).is_ok());
    assert!(check(json!(3), schema.clone()).is_err());
    assert!(check(json!(0), schema.clone()).is_err());
    assert!(check(json!(1.5), schema).is_err());
}

#[test]
fn named_type_resolution_is_transitive() {
    let types = json!({"foo": "bar", "bar": ["integer", {"min": -1, "max": 2}]});
    assert!(check_with(json!(2), json!("foo"), types.clone()).is_ok());
    assert!(check_with(json!(3), json!("foo"), types).is_err());
}

#[test]
fn undefined_names_are_definition_errors_regardless_of_value() {
    for v in [json!(2), json!("x"), json!(null)] {
        let err = check_with(v, json!("bar"), json!({"foo": "integer"})).unwrap_err();
        assert!(matches!(
            err,
            ShapeError::Definition(DefinitionError::UnknownType(_))
        ));
    }
}

#[test]
fn alias_cycles_are_definition_errors() {
    let err = check_with(json!(1), json!("a"), json!({"a": "b", "b": "a"})).unwrap_err();
    assert!(matches!(
        err,
        ShapeError::Definition(DefinitionError::AliasCycle(_))
    ));
}

#[test]
fn dictionary_constraints_are_independent() {
    let both = json!(["dictionary", {"keys": "[a-z]+", "contents": "integer"}]);
    assert!(check(json!({"abc": 1}), both.clone()).is_ok());
    assert!(check(json!({"ABC": 1}), both.clone()).is_err());
    assert!(check(json!({"abc": "one"}), both).is_err());
    // lifting one constraint keeps the other
    assert!(check(json!({"ABC": 1}), json!(["dictionary", {"contents": "integer"}])).is_ok());
    assert!(check(json!({"abc": "one"}), json!(["dictionary", {"keys": "[a-z]+"}])).is_ok());
}

#[test]
fn whole_string_regex_semantics() {
    assert!(check(json!("abc"), json!(["string", {"matches": "b"}])).is_err());
    assert!(check(json!("abc"), json!(["string", {"matches": "a.c"}])).is_ok());
    assert!(check(json!({"ab": 0}), json!(["dictionary", {"keys": "a"}])).is_err());
}

#[test]
fn one_element_form_is_the_bare_atom() {
    assert!(check(json!(5), json!(["integer"])).is_ok());
    assert!(check(json!(5.5), json!(["integer"])).is_err());
    assert!(check(json!(true), json!(["boolean"])).is_ok());
}

#[test]
fn failures_locate_the_offending_subvalue() {
    let schema = json!(["object", {"members": {
        "rows": ["array", {"contents": ["tuple", {"elements": ["string", "integer"]}]}]
    }}]);
    let err = check(json!({"rows": [["a", 1], ["b", "two"]]}), schema).unwrap_err();
    let message = err.to_string();
    assert!(message.starts_with("$.rows[1][1]:"), "got: {message}");
    assert!(message.contains("expected integer"), "got: {message}");
}

#[test]
fn validation_is_deterministic_across_repeated_calls() {
    let types = json!({"row": ["tuple", {"elements": ["string", ["optional", "number"]]}]});
    let env = TypeEnv::parse(&Value::from(types)).unwrap();
    let schema = Schema::parse(&Value::from(json!(["array", {"contents": "row"}]))).unwrap();
    let good = Value::from(json!([["a", 1.5], ["b"]]));
    let bad = Value::from(json!([["a", 1.5], [2]]));
    for _ in 0..3 {
        assert!(validate(&good, &schema, &env).is_ok());
        assert!(validate(&bad, &schema, &env).is_err());
    }
}
