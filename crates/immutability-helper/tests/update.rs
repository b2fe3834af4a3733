//! Resolver behavior: structural sharing, command ordering and spec shape
//! checks.

use immutability_helper::{update, update_value, Directives, Spec, Splice, UpdateError, Updater, Value};
use serde_json::json;

fn v(json: serde_json::Value) -> Value {
    Value::from(json)
}

// ----------------------------------------------------------------- Sharing

#[test]
fn test_untouched_object_is_returned_as_is() {
    let object = v(json!({"a": {"x": 1}, "b": [1, 2]}));
    let specs = [
        Spec::Directives(Directives::new()),
        Spec::path("a", Spec::merge(v(json!({"x": 1})))),
        Spec::path("b", Spec::push(Vec::<Value>::new())),
        Spec::path("a", Spec::unset(["missing"])),
        Spec::path("b", Spec::splice([])),
    ];
    for spec in &specs {
        let result = update(&object, spec).unwrap();
        assert!(Value::same(&result, &object), "spec: {spec:?}");
    }
}

#[test]
fn test_partial_sharing() {
    let object = v(json!({"a": {"x": 1}, "b": {"y": 2}}));
    let result = update(&object, &Spec::path("a", Spec::set(v(json!({"x": 9}))))).unwrap();

    assert!(Value::same(&result.get("b"), &object.get("b")));
    assert!(!Value::same(&result.get("a"), &object.get("a")));
    assert_eq!(result.get("a"), v(json!({"x": 9})));
    assert_eq!(object, v(json!({"a": {"x": 1}, "b": {"y": 2}})));
}

#[test]
fn test_deep_path_copies_only_the_spine() {
    let object = v(json!({
        "left": {"deep": {"leaf": 1}, "side": [1]},
        "right": {"other": true}
    }));
    let spec = Spec::path("left", Spec::path("deep", Spec::path("leaf", Spec::set(2))));
    let result = update(&object, &spec).unwrap();

    assert_eq!(result.get("left").get("deep").get("leaf"), Value::from(2));
    assert!(Value::same(&result.get("right"), &object.get("right")));
    assert!(Value::same(&result.get("left").get("side"), &object.get("left").get("side")));
    assert!(!Value::same(&result.get("left"), &object.get("left")));
}

#[test]
fn test_push_of_nothing_keeps_reference() {
    let object = Value::array([1, 2]);
    let result = update(&object, &Spec::push(Vec::<Value>::new())).unwrap();
    assert!(Value::same(&result, &object));
}

#[test]
fn test_set_same_value_keeps_parent() {
    let object = v(json!({"a": 1, "b": {"c": 2}}));
    let result = update(&object, &Spec::path("a", Spec::set(1))).unwrap();
    assert!(Value::same(&result, &object));
}

#[test]
fn test_array_index_paths() {
    let object = v(json!([{"n": 1}, {"n": 2}]));
    let spec: Spec = Directives::new().index(1, Spec::path("n", Spec::set(20))).into();
    let result = update(&object, &spec).unwrap();
    assert_eq!(result, v(json!([{"n": 1}, {"n": 20}])));
    assert!(Value::same(&result.get("0"), &object.get("0")));
}

#[test]
fn test_map_paths() {
    let inner = v(json!({"count": 1}));
    let object = Value::map([("k", inner.clone()), ("other", v(json!({})))]);
    let result = update(&object, &Spec::path("k", Spec::path("count", Spec::set(2)))).unwrap();
    assert_eq!(result.get("k"), v(json!({"count": 2})));
    assert!(Value::same(&result.get("other"), &object.get("other")));
    assert_eq!(inner, v(json!({"count": 1})));
}

#[test]
fn test_class_tag_survives_copy() {
    let object = Value::object_with_class("Point", [("x", 1), ("y", 2)]);
    let result = update(&object, &Spec::path("x", Spec::set(5))).unwrap();
    let point = result.as_object().unwrap();
    assert_eq!(point.class(), Some("Point"));
    assert_eq!(point.get("x"), Some(&Value::from(5)));
}

// ----------------------------------------------------------------- Commands in one frame

#[test]
fn test_commands_apply_in_key_order() {
    let object = v(json!({"a": 1, "b": 2}));
    let spec: Spec = Directives::new()
        .command("$unset", Value::array(["a"]))
        .command("$merge", v(json!({"c": 3})))
        .into();
    let result = update(&object, &spec).unwrap();
    assert_eq!(result, v(json!({"b": 2, "c": 3})));
    assert_eq!(result.as_object().unwrap().keys().collect::<Vec<_>>(), vec!["b", "c"]);
}

#[test]
fn test_command_and_path_in_one_frame() {
    let object = v(json!({"list": [1], "meta": {"n": 0}}));
    let spec: Spec = Directives::new()
        .command("$merge", v(json!({"flag": true})))
        .at("list", Spec::push([2]))
        .into();
    let result = update(&object, &spec).unwrap();
    assert_eq!(result, v(json!({"list": [1, 2], "meta": {"n": 0}, "flag": true})));
    assert!(Value::same(&result.get("meta"), &object.get("meta")));
}

#[test]
fn test_splice_is_cumulative() {
    let object = v(json!([1, 2, 3, 4]));
    let spec = Spec::splice([Splice::new(1, 2).insert("a"), Splice::new(0, 0).insert("b")]);
    let result = update(&object, &spec).unwrap();
    assert_eq!(result, v(json!(["b", 1, "a", 4])));
    assert_eq!(object, v(json!([1, 2, 3, 4])));
}

#[test]
fn test_merge_writes_only_changed_keys() {
    let shared = v(json!({"deep": true}));
    let object = Value::object([("a", Value::from(1)), ("b", shared.clone())]);
    let result = update(&object, &Spec::merge(v(json!({"a": 1, "c": 3})))).unwrap();
    assert!(!Value::same(&result, &object));
    assert_eq!(result, Value::object([("a", Value::from(1)), ("b", shared.clone()), ("c", Value::from(3))]));
    assert!(Value::same(&result.get("b"), &shared));
}

#[test]
fn test_toggle() {
    let result = update(&v(json!({"done": false})), &Spec::toggle(["done"])).unwrap();
    assert_eq!(result, v(json!({"done": true})));
}

#[test]
fn test_apply() {
    let double = Spec::apply(|x| Value::from(x.as_f64().unwrap_or(0.0) * 2.0));
    assert_eq!(update(&Value::from(5), &double).unwrap(), Value::from(10));
}

#[test]
fn test_transform_spec() {
    let object = v(json!({"a": 1}));
    let result = update(&object, &Spec::transform(|_| Value::from("replaced"))).unwrap();
    assert_eq!(result, Value::from("replaced"));

    let identity = update(&object, &Spec::transform(|x| x.clone())).unwrap();
    assert!(Value::same(&identity, &object));
}

#[test]
fn test_transform_at_path() {
    let object = v(json!({"count": 1}));
    let spec = Spec::path("count", Spec::transform(|x| Value::from(x.as_f64().unwrap_or(0.0) + 1.0)));
    assert_eq!(update(&object, &spec).unwrap(), v(json!({"count": 2})));
}

// ----------------------------------------------------------------- Errors

#[test]
fn test_set_with_siblings_is_ambiguous() {
    let err = update_value(&v(json!({"a": 1})), &v(json!({"$set": {"x": 1}, "b": 2}))).unwrap_err();
    assert_eq!(err, UpdateError::AmbiguousSet);

    let spec: Spec = Directives::new().command("$set", 1).at("b", Spec::set(2)).into();
    assert_eq!(update(&v(json!({})), &spec).unwrap_err(), UpdateError::AmbiguousSet);
}

#[test]
fn test_push_on_number() {
    let err = update(&Value::from(5), &Spec::push([1])).unwrap_err();
    assert_eq!(
        err,
        UpdateError::InvalidTargetType {
            command: "$push".to_string(),
            expected: "Array",
            got: "Number",
        }
    );
}

#[test]
fn test_scalar_spec_is_invalid() {
    let err = update_value(&v(json!({"a": 1})), &Value::from(3)).unwrap_err();
    assert!(matches!(err, UpdateError::InvalidSpec(_)));

    let err = update_value(&v(json!({"a": 1})), &v(json!({"a": 3}))).unwrap_err();
    let UpdateError::InvalidSpec(message) = err else {
        panic!("expected InvalidSpec");
    };
    assert!(message.contains("must be plain objects"), "got: {message}");
}

#[test]
fn test_array_spec_requires_array_target() {
    let err = update_value(&v(json!({"a": 1})), &v(json!([{"$set": 1}]))).unwrap_err();
    let UpdateError::InvalidSpec(message) = err else {
        panic!("expected InvalidSpec");
    };
    assert!(message.contains("may not contain an array"), "got: {message}");

    let result = update_value(&v(json!([1, 2])), &v(json!([{"$set": 10}]))).unwrap();
    assert_eq!(result, v(json!([10, 2])));
}

#[test]
fn test_errors_surface_in_key_order() {
    let updater = Updater::new();
    let spec = v(json!({"a": {"$push": [1]}, "b": {"$set": 1}}));
    let err = updater.update_value(&v(json!({"a": 1, "b": 2})), &spec).unwrap_err();
    assert!(matches!(err, UpdateError::InvalidTargetType { .. }));

    // The malformed entry is only reached after the failing command above.
    let spec = v(json!({"a": {"$push": 1}, "b": 7}));
    let err = updater.update_value(&v(json!({"a": []})), &spec).unwrap_err();
    assert!(matches!(err, UpdateError::InvalidCommandPayload { .. }));
}

#[test]
fn test_path_into_undefined_fails() {
    let err = update(&v(json!({})), &Spec::path("a", Spec::path("b", Spec::set(1)))).unwrap_err();
    assert_eq!(
        err,
        UpdateError::InvalidTargetType {
            command: "key \"b\"".to_string(),
            expected: "Object, Array or Map",
            got: "undefined",
        }
    );
}

#[test]
fn test_out_of_range_array_keys_fail_cleanly() {
    let updater = Updater::new();
    let err = updater.update_json(&json!([]), &json!({"18446744073709551615": {"$set": 1}})).unwrap_err();
    assert!(matches!(err, UpdateError::InvalidSpec(_)), "got: {err}");

    let err = updater.update_json(&json!([1]), &json!({"$merge": {"18446744073709551615": 2}})).unwrap_err();
    assert!(matches!(err, UpdateError::InvalidSpec(_)), "got: {err}");

    let err = updater.update_json(&json!([true]), &json!({"$toggle": ["1000000000000"]})).unwrap_err();
    assert!(matches!(err, UpdateError::InvalidSpec(_)), "got: {err}");

    let err = updater.update_json(&json!([]), &json!({"4294967294": {"$set": 1}})).unwrap_err();
    assert!(matches!(err, UpdateError::InvalidSpec(_)), "got: {err}");
}

#[test]
fn test_untouched_floats_round_trip() {
    let doc = json!({"x": 2.0, "y": [1.0, 2], "z": {"w": 0.25}});
    let result = Updater::new().update_json(&doc, &json!({"z": {"q": {"$set": 3}}})).unwrap();
    assert_eq!(result, json!({"x": 2.0, "y": [1.0, 2], "z": {"w": 0.25, "q": 3}}));
    assert_eq!(Updater::new().update_json(&doc, &json!({})).unwrap(), doc);
}

// ----------------------------------------------------------------- Threads

fn assert_send_sync<T: Send + Sync>() {}

#[test]
fn test_core_types_are_send_and_sync() {
    assert_send_sync::<Value>();
    assert_send_sync::<Spec>();
    assert_send_sync::<Updater>();
    assert_send_sync::<UpdateError>();
}

#[test]
fn test_shared_updater_across_threads() {
    let updater = Updater::new();
    let state = v(json!({"a": [1], "b": {"n": 0}}));
    let (left, right) = std::thread::scope(|s| {
        let left = s.spawn(|| updater.update(&state, &Spec::path("a", Spec::push([2]))));
        let right = s.spawn(|| updater.update(&state, &Spec::path("b", Spec::merge(v(json!({"n": 1}))))));
        (left.join().unwrap(), right.join().unwrap())
    });
    let (left, right) = (left.unwrap(), right.unwrap());
    assert_eq!(left, v(json!({"a": [1, 2], "b": {"n": 0}})));
    assert_eq!(right, v(json!({"a": [1], "b": {"n": 1}})));
    assert!(Value::same(&left.get("b"), &state.get("b")));
    assert!(Value::same(&right.get("a"), &state.get("a")));
}
