//! The recursive resolver.

use crate::commands::{CommandFn, Commands};
use crate::copy::Draft;
use crate::error::{UpdateError, UpdateResult};
use crate::spec::{not_an_object_message, sequence_spec_message, Directive, Directives, Spec};
use crate::value::{Kind, Value};
use std::fmt;
use std::sync::Arc;
use tracing::{debug, trace};

/// Decides whether a path key's new value differs from the current one.
pub type EqualityFn = Arc<dyn Fn(&Value, &Value) -> bool + Send + Sync>;

/// Resolves specs against values using its own command registry and
/// equality hook.
///
/// Independent `Updater`s share nothing, so tests and concurrent callers can
/// each build one with the commands they need. The free functions at the
/// crate root use a process-wide default instance.
///
/// # Example
///
/// ```
/// use immutability_helper::{Spec, Updater, Value};
/// use serde_json::json;
///
/// let updater = Updater::new();
/// let state = Value::from(json!({"a": {"x": 1}, "b": {"y": 2}}));
/// let next = updater.update(&state, &Spec::path("a", Spec::set(Value::from(json!({"x": 9}))))).unwrap();
///
/// assert_eq!(next.to_json(), json!({"a": {"x": 9}, "b": {"y": 2}}));
/// assert!(Value::same(&next.get("b"), &state.get("b")));
/// ```
#[derive(Clone)]
pub struct Updater {
    commands: Commands,
    equals: EqualityFn,
}

impl Default for Updater {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Updater {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Updater")
            .field("commands", &self.commands)
            .finish_non_exhaustive()
    }
}

impl Updater {
    /// An updater with the built-in commands and identity equality.
    pub fn new() -> Self {
        Self::with_commands(Commands::builtin())
    }

    /// An updater that knows no commands.
    pub fn empty() -> Self {
        Self::with_commands(Commands::empty())
    }

    pub fn with_commands(commands: Commands) -> Self {
        Updater {
            commands,
            equals: Arc::new(Value::same),
        }
    }

    pub fn commands(&self) -> &Commands {
        &self.commands
    }

    /// Adds or overwrites a command.
    pub fn register<F>(&mut self, name: impl Into<String>, handler: F)
    where
        F: Fn(&Value, Value, &Directives, &Value) -> UpdateResult<Value> + Send + Sync + 'static,
    {
        self.register_fn(name, Arc::new(handler));
    }

    /// Adds or overwrites a command from an already shared handler.
    pub fn register_fn(&mut self, name: impl Into<String>, handler: CommandFn) {
        let name = name.into();
        let replaced = self.commands.insert(name.clone(), handler).is_some();
        debug!(command = %name, replaced, "registered update command");
    }

    pub fn with_command<F>(mut self, name: impl Into<String>, handler: F) -> Self
    where
        F: Fn(&Value, Value, &Directives, &Value) -> UpdateResult<Value> + Send + Sync + 'static,
    {
        self.register(name, handler);
        self
    }

    /// Replaces the hook that decides whether a path key changed.
    pub fn set_equality(&mut self, equals: impl Fn(&Value, &Value) -> bool + Send + Sync + 'static) {
        self.equals = Arc::new(equals);
        debug!("replaced update equality hook");
    }

    pub fn with_equality(mut self, equals: impl Fn(&Value, &Value) -> bool + Send + Sync + 'static) -> Self {
        self.set_equality(equals);
        self
    }

    /// Restores identity equality.
    pub fn reset_equality(&mut self) {
        self.equals = Arc::new(Value::same);
        debug!("reset update equality hook");
    }

    pub fn is_equal(&self, a: &Value, b: &Value) -> bool {
        (self.equals)(a, b)
    }

    /// Parses an untyped spec against this updater's commands.
    pub fn parse(&self, spec: &Value) -> UpdateResult<Spec> {
        Spec::parse(spec, &self.commands)
    }

    /// Returns `object` with `spec` applied.
    ///
    /// Every part of `object` the spec does not touch is shared with the
    /// result, and when nothing changes the result is `object` itself.
    pub fn update(&self, object: &Value, spec: &Spec) -> UpdateResult<Value> {
        match spec {
            Spec::Transform(f) => Ok(f(object)),
            Spec::Directives(directives) => self.resolve(object, directives),
        }
    }

    /// Parses `spec` and applies it.
    pub fn update_value(&self, object: &Value, spec: &Value) -> UpdateResult<Value> {
        let spec = self.parse(spec)?;
        self.update(object, &spec)
    }

    /// Applies a JSON spec to a JSON document.
    pub fn update_json(&self, document: &serde_json::Value, spec: &serde_json::Value) -> UpdateResult<serde_json::Value> {
        let result = self.update_value(&Value::from(document), &Value::from(spec))?;
        Ok(result.to_json())
    }

    fn resolve(&self, object: &Value, directives: &Directives) -> UpdateResult<Value> {
        if directives.is_sequence() && object.kind() != Kind::Sequence {
            return Err(UpdateError::InvalidSpec(sequence_spec_message()));
        }

        let mut draft = Draft::new(object);
        for (key, directive) in directives.iter() {
            match directive {
                Directive::Command(payload) => {
                    let handler = self.commands.get(key).ok_or_else(|| {
                        UpdateError::InvalidSpec(format!("Unknown command {key}."))
                    })?;
                    trace!(command = key, target = %draft.current().kind(), "applying update command");
                    let was_original = draft.is_original();
                    let next = handler(payload, draft.take(), directives, object)?;
                    if was_original && self.is_equal(&next, object) {
                        draft.replace(object.clone());
                    } else {
                        draft.replace(next);
                    }
                }
                Directive::Path(spec) => {
                    if matches!(object.kind(), Kind::Undefined | Kind::Null) {
                        return Err(UpdateError::target(
                            &format!("key \"{key}\""),
                            "Object, Array or Map",
                            object.kind().name(),
                        ));
                    }
                    let next = self.update(&object.get(key), spec)?;
                    let changed = !self.is_equal(&next, &draft.current().get(key))
                        || (next.is_undefined() && !object.has_own(key));
                    if changed {
                        trace!(key, "writing updated child");
                        draft.assign(&format!("key \"{key}\""), key, next)?;
                    }
                }
                Directive::Malformed(_) => {
                    return Err(UpdateError::InvalidSpec(not_an_object_message(&self.commands)));
                }
            }
        }
        Ok(draft.finish())
    }
}
