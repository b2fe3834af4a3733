//! Set and map commands: `$add` and `$remove`.

use super::{array_payload, CommandFn};
use crate::copy::Draft;
use crate::error::{UpdateError, UpdateResult};
use crate::spec::Directives;
use crate::value::{Kind, Value};
use std::sync::Arc;

fn ensure_collection_target(command: &str, target: &Value) -> UpdateResult<Kind> {
    match target.kind() {
        kind @ (Kind::SetLike | Kind::MapLike) => Ok(kind),
        other => Err(UpdateError::target(command, "Set or Map", other.name())),
    }
}

fn add(payload: &Value, working: Value, _spec: &Directives, original: &Value) -> UpdateResult<Value> {
    let kind = ensure_collection_target("$add", &working)?;
    let items = array_payload("$add", payload)?;
    let mut draft = Draft::resume(original, working);
    for item in items {
        if kind == Kind::MapLike {
            let (key, value) = entry_pair(item)?;
            let unchanged = draft
                .current()
                .as_map()
                .and_then(|map| map.get(&key))
                .is_some_and(|current| Value::same(current, &value));
            if !unchanged {
                draft.map_mut("$add")?.insert(key, value);
            }
        } else {
            let present = draft.current().as_set().is_some_and(|set| set.contains(item));
            if !present {
                draft.set_mut("$add")?.insert(item.clone());
            }
        }
    }
    Ok(draft.finish())
}

fn remove(payload: &Value, working: Value, _spec: &Directives, original: &Value) -> UpdateResult<Value> {
    let kind = ensure_collection_target("$remove", &working)?;
    let items = array_payload("$remove", payload)?;
    let mut draft = Draft::resume(original, working);
    for item in items {
        if kind == Kind::MapLike {
            if draft.current().as_map().is_some_and(|map| map.contains_key(item)) {
                draft.map_mut("$remove")?.shift_remove(item);
            }
        } else if draft.current().as_set().is_some_and(|set| set.contains(item)) {
            draft.set_mut("$remove")?.shift_remove(item);
        }
    }
    Ok(draft.finish())
}

/// Splits a `[key, value]` pair. Missing elements read as `undefined`.
fn entry_pair(item: &Value) -> UpdateResult<(Value, Value)> {
    let pair = item
        .as_array()
        .ok_or_else(|| UpdateError::payload("$add", "an array of [key, value] pairs", item))?;
    let key = pair.first().cloned().unwrap_or_default();
    let value = pair.get(1).cloned().unwrap_or_default();
    Ok((key, value))
}

pub fn commands() -> Vec<(&'static str, CommandFn)> {
    vec![
        ("$add", Arc::new(add) as CommandFn),
        ("$remove", Arc::new(remove) as CommandFn),
    ]
}
