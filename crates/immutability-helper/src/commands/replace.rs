//! Whole-value commands: `$set` and `$apply`.

use super::CommandFn;
use crate::error::{UpdateError, UpdateResult};
use crate::spec::Directives;
use crate::value::Value;
use std::sync::Arc;

fn set(payload: &Value, _working: Value, spec: &Directives, _original: &Value) -> UpdateResult<Value> {
    if spec.len() != 1 {
        return Err(UpdateError::AmbiguousSet);
    }
    Ok(payload.clone())
}

fn apply(payload: &Value, working: Value, _spec: &Directives, _original: &Value) -> UpdateResult<Value> {
    match payload {
        Value::Function(f) => Ok(f(&working)),
        other => Err(UpdateError::payload("$apply", "a function", other)),
    }
}

pub fn commands() -> Vec<(&'static str, CommandFn)> {
    vec![
        ("$set", Arc::new(set) as CommandFn),
        ("$apply", Arc::new(apply) as CommandFn),
    ]
}
