//! Command handlers and the registry that maps command names to them.
//!
//! Built-ins are grouped by the kind of target they work on:
//! - [`replace`]: `$set`, `$apply`
//! - [`sequence`]: `$push`, `$unshift`, `$splice`
//! - [`object`]: `$merge`, `$unset`, `$toggle`
//! - [`collection`]: `$add`, `$remove`

pub mod collection;
pub mod object;
pub mod replace;
pub mod sequence;

use crate::error::{UpdateError, UpdateResult};
use crate::spec::Directives;
use crate::value::Value;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// A command handler.
///
/// Called as `handler(payload, working, spec, original)`: the command's
/// payload, the frame's working value so far, the directives the command
/// appears in, and the frame's original value. Returns the new working
/// value, which may be `working` itself when nothing changed.
///
/// Handlers must not mutate `original`. To change a container, resume a
/// [`Draft`](crate::Draft) from `original` and `working` so the original is
/// copied before the first write.
pub type CommandFn =
    Arc<dyn Fn(&Value, Value, &Directives, &Value) -> UpdateResult<Value> + Send + Sync>;

/// Registry of commands available to an [`Updater`](crate::Updater).
#[derive(Clone, Default)]
pub struct Commands {
    map: HashMap<String, CommandFn>,
}

impl Commands {
    /// A registry with no commands at all.
    pub fn empty() -> Self {
        Self::default()
    }

    /// A registry holding the built-in commands.
    pub fn builtin() -> Self {
        let mut commands = Self::empty();
        for (name, handler) in all_commands() {
            commands.insert(name, handler);
        }
        commands
    }

    /// Adds or overwrites a command.
    pub fn register<F>(&mut self, name: impl Into<String>, handler: F)
    where
        F: Fn(&Value, Value, &Directives, &Value) -> UpdateResult<Value> + Send + Sync + 'static,
    {
        self.insert(name, Arc::new(handler));
    }

    /// Adds or overwrites a command, returning the handler it replaced.
    pub fn insert(&mut self, name: impl Into<String>, handler: CommandFn) -> Option<CommandFn> {
        self.map.insert(name.into(), handler)
    }

    pub fn get(&self, name: &str) -> Option<&CommandFn> {
        self.map.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.map.contains_key(name)
    }

    /// Registered names in sorted order.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.map.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

impl fmt::Debug for Commands {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.names()).finish()
    }
}

/// All built-in commands.
pub fn all_commands() -> Vec<(&'static str, CommandFn)> {
    let mut commands = Vec::new();
    commands.extend(replace::commands());
    commands.extend(sequence::commands());
    commands.extend(object::commands());
    commands.extend(collection::commands());
    commands
}

/// Borrows an array payload or fails with `InvalidCommandPayload`.
pub(crate) fn array_payload<'v>(command: &str, payload: &'v Value) -> UpdateResult<&'v [Value]> {
    payload
        .as_array()
        .ok_or_else(|| UpdateError::payload(command, "an array", payload))
}
