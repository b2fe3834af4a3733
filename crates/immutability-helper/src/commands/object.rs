//! Keyed commands: `$merge`, `$unset` and `$toggle`.
//!
//! Keys address object entries, array indices, and string-keyed map
//! entries alike.

use super::{array_payload, CommandFn};
use crate::copy::Draft;
use crate::error::{UpdateError, UpdateResult};
use crate::spec::Directives;
use crate::value::{Kind, Value};
use std::sync::Arc;

fn ensure_keyed_target(command: &str, target: &Value) -> UpdateResult<()> {
    match target.kind() {
        kind if kind.is_keyed() => Ok(()),
        other => Err(UpdateError::target(command, "object", other.name())),
    }
}

/// Own `(key, value)` entries of a `$merge` payload.
fn merge_entries(payload: &Value) -> UpdateResult<Vec<(String, Value)>> {
    match payload {
        Value::Object(object) => Ok(object.iter().map(|(k, v)| (k.to_string(), v.clone())).collect()),
        Value::Array(items) => Ok(items
            .iter()
            .enumerate()
            .map(|(i, v)| (i.to_string(), v.clone()))
            .collect()),
        Value::Map(map) => Ok(map.iter().map(|(k, v)| (k.to_key(), v.clone())).collect()),
        other => Err(UpdateError::payload("$merge", "an object", other)),
    }
}

fn merge(payload: &Value, working: Value, _spec: &Directives, original: &Value) -> UpdateResult<Value> {
    let entries = merge_entries(payload)?;
    ensure_keyed_target("$merge", &working)?;
    let mut draft = Draft::resume(original, working);
    for (key, value) in entries {
        // Only write what actually differs so untouched keys stay shared.
        if !Value::same(&value, &draft.current().get(&key)) {
            draft.assign("$merge", &key, value)?;
        }
    }
    Ok(draft.finish())
}

fn unset(payload: &Value, working: Value, _spec: &Directives, original: &Value) -> UpdateResult<Value> {
    let keys = array_payload("$unset", payload)?;
    if !keys.is_empty() && matches!(working.kind(), Kind::Undefined | Kind::Null) {
        return Err(UpdateError::target("$unset", "object", working.kind().name()));
    }
    let mut draft = Draft::resume(original, working);
    for key in keys {
        draft.delete("$unset", &key.to_key())?;
    }
    Ok(draft.finish())
}

fn toggle(payload: &Value, working: Value, _spec: &Directives, original: &Value) -> UpdateResult<Value> {
    let keys = array_payload("$toggle", payload)?;
    if keys.is_empty() {
        return Ok(working);
    }
    ensure_keyed_target("$toggle", &working)?;
    // Every key reads the value from before this command, so a key listed
    // twice ends up toggled once.
    let before = working.clone();
    let mut draft = Draft::resume(original, working);
    for key in keys {
        let key = key.to_key();
        let flipped = !before.get(&key).is_truthy();
        draft.assign("$toggle", &key, Value::Bool(flipped))?;
    }
    Ok(draft.finish())
}

pub fn commands() -> Vec<(&'static str, CommandFn)> {
    vec![
        ("$merge", Arc::new(merge) as CommandFn),
        ("$unset", Arc::new(unset) as CommandFn),
        ("$toggle", Arc::new(toggle) as CommandFn),
    ]
}
