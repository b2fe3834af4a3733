//! Array commands: `$push`, `$unshift` and `$splice`.

use super::{array_payload, CommandFn};
use crate::copy::Draft;
use crate::error::{UpdateError, UpdateResult};
use crate::spec::Directives;
use crate::value::{Kind, Value};
use std::sync::Arc;

fn ensure_array_target(command: &str, target: &Value) -> UpdateResult<()> {
    match target.kind() {
        Kind::Sequence => Ok(()),
        other => Err(UpdateError::target(command, "Array", other.name())),
    }
}

fn push(payload: &Value, working: Value, _spec: &Directives, original: &Value) -> UpdateResult<Value> {
    ensure_array_target("$push", &working)?;
    let items = array_payload("$push", payload)?;
    if items.is_empty() {
        return Ok(working);
    }
    let mut draft = Draft::resume(original, working);
    draft.array_mut("$push")?.extend(items.iter().cloned());
    Ok(draft.finish())
}

fn unshift(payload: &Value, working: Value, _spec: &Directives, original: &Value) -> UpdateResult<Value> {
    ensure_array_target("$unshift", &working)?;
    let items = array_payload("$unshift", payload)?;
    if items.is_empty() {
        return Ok(working);
    }
    let mut draft = Draft::resume(original, working);
    draft.array_mut("$unshift")?.splice(0..0, items.iter().cloned());
    Ok(draft.finish())
}

fn splice(payload: &Value, working: Value, _spec: &Directives, original: &Value) -> UpdateResult<Value> {
    ensure_array_target("$splice", &working)?;
    let steps = payload
        .as_array()
        .ok_or_else(|| UpdateError::payload("$splice", "an array of arrays", payload))?;
    let mut draft = Draft::resume(original, working);
    for step in steps {
        let args = step
            .as_array()
            .ok_or_else(|| UpdateError::payload("$splice", "an array of arrays", step))?;
        if args.is_empty() {
            continue;
        }
        apply_splice(draft.array_mut("$splice")?, args);
    }
    Ok(draft.finish())
}

/// Applies `[start, deleteCount?, ...items]` to `target`.
///
/// `start` counts from the end when negative and is clamped to the array.
/// A missing `deleteCount` removes the rest of the array; an explicit
/// `undefined` removes nothing.
fn apply_splice(target: &mut Vec<Value>, args: &[Value]) {
    let len = target.len() as f64;
    let start = splice_integer(&args[0]);
    let start = if start < 0.0 {
        (len + start).max(0.0)
    } else {
        start.min(len)
    };
    let start = start as usize;
    let remaining = target.len() - start;
    let delete_count = match args.get(1) {
        None => remaining,
        Some(count) => splice_integer(count).clamp(0.0, remaining as f64) as usize,
    };
    let items = args.iter().skip(2).cloned();
    target.splice(start..start + delete_count, items);
}

/// Integer conversion of a splice argument: `NaN` is 0, fractions
/// truncate, infinities stay and get clamped by the caller.
fn splice_integer(arg: &Value) -> f64 {
    let n = arg.to_number();
    if n.is_nan() {
        0.0
    } else {
        n.trunc()
    }
}

pub fn commands() -> Vec<(&'static str, CommandFn)> {
    vec![
        ("$push", Arc::new(push) as CommandFn),
        ("$unshift", Arc::new(unshift) as CommandFn),
        ("$splice", Arc::new(splice) as CommandFn),
    ]
}
