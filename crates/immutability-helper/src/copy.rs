//! Shallow copies and the copy-on-write working value of a resolution frame.

use crate::error::{UpdateError, UpdateResult};
use crate::value::{array_index, Kind, Object, Value};
use indexmap::{IndexMap, IndexSet};
use std::sync::Arc;

/// How many `Undefined` holes an assignment past the end of an array may
/// create.
pub const MAX_ARRAY_PADDING: usize = 1 << 16;

/// Produces a shallow structural clone of `value`.
///
/// Containers get a fresh allocation holding the same children (which stay
/// shared). Objects keep their class tag. Scalars and functions are
/// returned as they are.
pub fn shallow_copy(value: &Value) -> Value {
    match value {
        Value::Array(items) => Value::Array(Arc::new(Vec::clone(items))),
        Value::Object(object) => Value::Object(Arc::new(Object::clone(object))),
        Value::Map(map) => Value::Map(Arc::new(IndexMap::clone(map))),
        Value::Set(set) => Value::Set(Arc::new(IndexSet::clone(set))),
        other => other.clone(),
    }
}

/// The working value of one resolution frame, paired with the frame's
/// original.
///
/// The mutable accessors copy the original the first time they are called
/// while the working value is still the original. Later calls reuse that
/// copy, so a frame copies at most once no matter how many writes follow.
pub struct Draft<'a> {
    original: &'a Value,
    current: Value,
}

impl<'a> Draft<'a> {
    pub fn new(original: &'a Value) -> Self {
        Draft {
            original,
            current: original.clone(),
        }
    }

    /// Continues from a working value produced earlier in the same frame.
    pub fn resume(original: &'a Value, current: Value) -> Self {
        Draft { original, current }
    }

    pub fn original(&self) -> &'a Value {
        self.original
    }

    pub fn current(&self) -> &Value {
        &self.current
    }

    /// Whether nothing has been copied or replaced yet.
    pub fn is_original(&self) -> bool {
        Value::same(&self.current, self.original)
    }

    pub fn replace(&mut self, value: Value) {
        self.current = value;
    }

    /// Moves the working value out, leaving `Undefined` until `replace`.
    pub fn take(&mut self) -> Value {
        std::mem::take(&mut self.current)
    }

    pub fn finish(self) -> Value {
        self.current
    }

    fn detach(&mut self) {
        if self.is_original() {
            self.current = shallow_copy(self.original);
        }
    }

    pub fn array_mut(&mut self, command: &str) -> UpdateResult<&mut Vec<Value>> {
        if !matches!(self.current, Value::Array(_)) {
            return Err(UpdateError::target(command, "Array", self.current.kind().name()));
        }
        self.detach();
        match &mut self.current {
            Value::Array(items) => Ok(Arc::make_mut(items)),
            _ => unreachable!("checked above"),
        }
    }

    pub fn object_mut(&mut self, command: &str) -> UpdateResult<&mut Object> {
        if !matches!(self.current, Value::Object(_)) {
            return Err(UpdateError::target(command, "Object", self.current.kind().name()));
        }
        self.detach();
        match &mut self.current {
            Value::Object(object) => Ok(Arc::make_mut(object)),
            _ => unreachable!("checked above"),
        }
    }

    pub fn map_mut(&mut self, command: &str) -> UpdateResult<&mut IndexMap<Value, Value>> {
        if !matches!(self.current, Value::Map(_)) {
            return Err(UpdateError::target(command, "Map", self.current.kind().name()));
        }
        self.detach();
        match &mut self.current {
            Value::Map(map) => Ok(Arc::make_mut(map)),
            _ => unreachable!("checked above"),
        }
    }

    pub fn set_mut(&mut self, command: &str) -> UpdateResult<&mut IndexSet<Value>> {
        if !matches!(self.current, Value::Set(_)) {
            return Err(UpdateError::target(command, "Set", self.current.kind().name()));
        }
        self.detach();
        match &mut self.current {
            Value::Set(set) => Ok(Arc::make_mut(set)),
            _ => unreachable!("checked above"),
        }
    }

    /// Writes `value` at a property key of an object, array or map.
    ///
    /// Array writes past the end pad the gap with `Undefined`.
    pub fn assign(&mut self, command: &str, key: &str, value: Value) -> UpdateResult<()> {
        match self.current.kind() {
            Kind::Mapping => {
                self.object_mut(command)?.insert(key, value);
            }
            Kind::Sequence => {
                let idx = array_index(key).ok_or_else(|| {
                    UpdateError::InvalidSpec(format!("\"{key}\" is not a valid index for an Array target."))
                })?;
                let len = self.current.as_array().map_or(0, <[Value]>::len);
                if idx > len.saturating_add(MAX_ARRAY_PADDING) {
                    return Err(UpdateError::InvalidSpec(format!(
                        "Index {idx} is too far past the end of an Array of length {len}."
                    )));
                }
                let items = self.array_mut(command)?;
                if idx >= items.len() {
                    let new_len = idx.checked_add(1).ok_or_else(|| {
                        UpdateError::InvalidSpec(format!("Index {idx} is out of range."))
                    })?;
                    items.resize(new_len, Value::Undefined);
                }
                items[idx] = value;
            }
            Kind::MapLike => {
                self.map_mut(command)?.insert(Value::from(key), value);
            }
            other => {
                return Err(UpdateError::target(
                    command,
                    "Object, Array or Map",
                    other.name(),
                ))
            }
        }
        Ok(())
    }

    /// Deletes an owned key. Array entries become `Undefined` holes so that
    /// later indices keep their positions.
    pub fn delete(&mut self, command: &str, key: &str) -> UpdateResult<()> {
        if !self.current.has_own(key) {
            return Ok(());
        }
        match self.current.kind() {
            Kind::Mapping => {
                self.object_mut(command)?.remove(key);
            }
            Kind::Sequence => {
                if let Some(idx) = array_index(key) {
                    self.array_mut(command)?[idx] = Value::Undefined;
                }
            }
            Kind::MapLike => {
                self.map_mut(command)?.shift_remove(&Value::from(key));
            }
            _ => {}
        }
        Ok(())
    }
}
