//! Update specs: what should change, expressed declaratively.
//!
//! A [`Spec`] is either a whole-value transform or an ordered list of
//! [`Directives`]. Each directive key names a registered command (such as
//! `$push`) or a child to recurse into.
//!
//! # Example
//!
//! ```
//! use immutability_helper::{Directives, Spec, Value};
//!
//! // {a: {b: {$push: [3]}}, count: {$apply: n => n + 1}}
//! let spec: Spec = Directives::new()
//!     .at("a", Spec::path("b", Spec::push([3])))
//!     .at("count", Spec::apply(|n| Value::from(n.as_f64().unwrap_or(0.0) + 1.0)))
//!     .into();
//! assert!(matches!(spec, Spec::Directives(_)));
//! ```

use crate::commands::Commands;
use crate::error::{UpdateError, UpdateResult};
use crate::value::{Func, Value};
use std::fmt;
use std::sync::Arc;

/// Describes how to derive a new value from an existing one.
#[derive(Clone)]
pub enum Spec {
    /// Replaces the whole value with the function's output.
    Transform(Func),
    /// Applies commands and nested specs in order.
    Directives(Directives),
}

/// One entry of a [`Directives`] list.
#[derive(Clone, Debug)]
pub enum Directive {
    /// Runs the registered command of the same name with this payload.
    Command(Value),
    /// Resolves the nested spec against the child at this key.
    Path(Spec),
    /// A path entry whose value is not a spec. Resolution fails with
    /// `InvalidSpec` when it reaches this entry.
    Malformed(Value),
}

/// Ordered `key -> directive` entries of a spec object.
///
/// Keys are unique. Writing an existing key replaces its directive in place.
#[derive(Clone, Debug, Default)]
pub struct Directives {
    entries: Vec<(String, Directive)>,
    sequence: bool,
}

impl Directives {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a command entry.
    pub fn command(mut self, name: impl Into<String>, payload: impl Into<Value>) -> Self {
        self.put(name.into(), Directive::Command(payload.into()));
        self
    }

    /// Adds a nested spec for the child at `key`.
    pub fn at(mut self, key: impl Into<String>, spec: impl Into<Spec>) -> Self {
        self.put(key.into(), Directive::Path(spec.into()));
        self
    }

    /// Adds a nested spec for the array element at `index`.
    pub fn index(self, index: usize, spec: impl Into<Spec>) -> Self {
        self.at(index.to_string(), spec)
    }

    fn put(&mut self, key: String, directive: Directive) {
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = directive,
            None => self.entries.push((key, directive)),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, key: &str) -> Option<&Directive> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, d)| d)
    }

    /// Payload of the command entry named `name`, if any.
    pub fn payload(&self, name: &str) -> Option<&Value> {
        match self.get(name) {
            Some(Directive::Command(payload)) => Some(payload),
            _ => None,
        }
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Directive)> {
        self.entries.iter().map(|(k, d)| (k.as_str(), d))
    }

    /// Whether these directives were written as an array, which is only
    /// valid against an array target.
    pub fn is_sequence(&self) -> bool {
        self.sequence
    }
}

impl Spec {
    /// `{$set: value}`
    pub fn set(value: impl Into<Value>) -> Self {
        Self::command("$set", value)
    }

    /// `{$push: [items]}`
    pub fn push<V: Into<Value>>(items: impl IntoIterator<Item = V>) -> Self {
        Self::command("$push", Value::array(items))
    }

    /// `{$unshift: [items]}`
    pub fn unshift<V: Into<Value>>(items: impl IntoIterator<Item = V>) -> Self {
        Self::command("$unshift", Value::array(items))
    }

    /// `{$splice: [[start, deleteCount, ...items], ...]}`
    pub fn splice(splices: impl IntoIterator<Item = Splice>) -> Self {
        Self::command("$splice", Value::array(splices))
    }

    /// `{$merge: value}`
    pub fn merge(value: impl Into<Value>) -> Self {
        Self::command("$merge", value)
    }

    /// `{$unset: [keys]}`
    pub fn unset<V: Into<Value>>(keys: impl IntoIterator<Item = V>) -> Self {
        Self::command("$unset", Value::array(keys))
    }

    /// `{$toggle: [keys]}`
    pub fn toggle<V: Into<Value>>(keys: impl IntoIterator<Item = V>) -> Self {
        Self::command("$toggle", Value::array(keys))
    }

    /// `{$add: [values]}` for set targets.
    pub fn add<V: Into<Value>>(values: impl IntoIterator<Item = V>) -> Self {
        Self::command("$add", Value::array(values))
    }

    /// `{$add: [[key, value], ...]}` for map targets.
    pub fn add_entries<K: Into<Value>, V: Into<Value>>(entries: impl IntoIterator<Item = (K, V)>) -> Self {
        let pairs = entries
            .into_iter()
            .map(|(k, v)| Value::array([k.into(), v.into()]));
        Self::command("$add", Value::array(pairs))
    }

    /// `{$remove: [keys or values]}`
    pub fn remove<V: Into<Value>>(items: impl IntoIterator<Item = V>) -> Self {
        Self::command("$remove", Value::array(items))
    }

    /// `{$apply: f}`
    pub fn apply(f: impl Fn(&Value) -> Value + Send + Sync + 'static) -> Self {
        Self::command("$apply", Value::function(f))
    }

    /// A bare function spec.
    pub fn transform(f: impl Fn(&Value) -> Value + Send + Sync + 'static) -> Self {
        Spec::Transform(Arc::new(f))
    }

    /// A spec holding a single command.
    pub fn command(name: impl Into<String>, payload: impl Into<Value>) -> Self {
        Spec::Directives(Directives::new().command(name, payload))
    }

    /// A spec holding a single nested spec at `key`.
    pub fn path(key: impl Into<String>, spec: impl Into<Spec>) -> Self {
        Spec::Directives(Directives::new().at(key, spec))
    }

    /// Interprets an untyped value as a spec.
    ///
    /// Object keys registered in `commands` become command entries and every
    /// other key is parsed recursively as a nested spec. Arrays become
    /// index-keyed directives that only apply to array targets, and
    /// functions become transforms.
    ///
    /// Only the top level is rejected here. A nested path value that is not
    /// a spec becomes [`Directive::Malformed`], so errors keep surfacing in
    /// key order, after the entries before them have run.
    pub fn parse(value: &Value, commands: &Commands) -> UpdateResult<Spec> {
        Self::parse_nested(value, commands)
            .ok_or_else(|| UpdateError::InvalidSpec(not_an_object_message(commands)))
    }

    fn parse_nested(value: &Value, commands: &Commands) -> Option<Spec> {
        let path = |child: &Value| match Self::parse_nested(child, commands) {
            Some(spec) => Directive::Path(spec),
            None => Directive::Malformed(child.clone()),
        };
        match value {
            Value::Function(f) => Some(Spec::Transform(f.clone())),
            Value::Object(object) => {
                let mut directives = Directives::new();
                for (key, child) in object.iter() {
                    let directive = if commands.contains(key) {
                        Directive::Command(child.clone())
                    } else {
                        path(child)
                    };
                    directives.put(key.to_string(), directive);
                }
                Some(Spec::Directives(directives))
            }
            Value::Array(items) => {
                let mut directives = Directives {
                    sequence: true,
                    ..Directives::default()
                };
                for (i, child) in items.iter().enumerate() {
                    directives.put(i.to_string(), path(child));
                }
                Some(Spec::Directives(directives))
            }
            _ => None,
        }
    }
}

impl From<Directives> for Spec {
    fn from(directives: Directives) -> Self {
        Spec::Directives(directives)
    }
}

impl fmt::Debug for Spec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Spec::Transform(_) => f.write_str("Transform(..)"),
            Spec::Directives(directives) => f.debug_tuple("Directives").field(directives).finish(),
        }
    }
}

pub(crate) fn not_an_object_message(commands: &Commands) -> String {
    format!(
        "The spec and every included key path must be plain objects containing one of the following commands: {}.",
        commands.names().join(", ")
    )
}

pub(crate) fn sequence_spec_message() -> String {
    "The spec may not contain an array except as the value of $set, $push, $unshift, \
     $splice or any custom command allowing an array value."
        .to_string()
}

/// How many elements a `$splice` step removes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteCount {
    /// Everything from `start` to the end.
    Rest,
    Exactly(usize),
}

/// Arguments of one `$splice` step: remove elements at `start`, then insert
/// `items` there. A negative `start` counts from the end.
#[derive(Debug, Clone, PartialEq)]
pub struct Splice {
    pub start: i64,
    pub delete_count: DeleteCount,
    pub items: Vec<Value>,
}

impl Splice {
    pub fn new(start: i64, delete_count: usize) -> Self {
        Splice {
            start,
            delete_count: DeleteCount::Exactly(delete_count),
            items: Vec::new(),
        }
    }

    /// Removes every element from `start` to the end.
    pub fn truncate(start: i64) -> Self {
        Splice {
            start,
            delete_count: DeleteCount::Rest,
            items: Vec::new(),
        }
    }

    pub fn insert(mut self, item: impl Into<Value>) -> Self {
        self.items.push(item.into());
        self
    }
}

impl From<Splice> for Value {
    fn from(splice: Splice) -> Self {
        let mut args = vec![Value::from(splice.start)];
        match splice.delete_count {
            DeleteCount::Exactly(count) => args.push(Value::from(count)),
            // An infinite count is clamped to the remaining length.
            DeleteCount::Rest if !splice.items.is_empty() => args.push(Value::from(f64::INFINITY)),
            DeleteCount::Rest => {}
        }
        args.extend(splice.items);
        Value::from(args)
    }
}
