//! The process-wide default [`Updater`] behind the crate-root functions.
//!
//! Registration swaps in a modified copy under a write lock. Each update
//! call only holds the read lock long enough to grab the current instance,
//! so handlers may call back into these functions.

use crate::error::UpdateResult;
use crate::spec::{Directives, Spec};
use crate::update::Updater;
use crate::value::Value;
use std::sync::{Arc, OnceLock, PoisonError, RwLock};

static DEFAULT: OnceLock<RwLock<Arc<Updater>>> = OnceLock::new();

fn slot() -> &'static RwLock<Arc<Updater>> {
    DEFAULT.get_or_init(|| RwLock::new(Arc::new(Updater::new())))
}

fn current() -> Arc<Updater> {
    slot().read().unwrap_or_else(PoisonError::into_inner).clone()
}

fn modify(f: impl FnOnce(&mut Updater)) {
    let mut guard = slot().write().unwrap_or_else(PoisonError::into_inner);
    f(Arc::make_mut(&mut *guard));
}

/// Applies `spec` to `object` with the default updater.
pub fn update(object: &Value, spec: &Spec) -> UpdateResult<Value> {
    current().update(object, spec)
}

/// Parses an untyped spec and applies it with the default updater.
pub fn update_value(object: &Value, spec: &Value) -> UpdateResult<Value> {
    current().update_value(object, spec)
}

/// Applies a JSON spec to a JSON document with the default updater.
pub fn update_json(document: &serde_json::Value, spec: &serde_json::Value) -> UpdateResult<serde_json::Value> {
    current().update_json(document, spec)
}

/// Adds or overwrites a command of the default updater for the rest of the
/// process.
pub fn register_command<F>(name: impl Into<String>, handler: F)
where
    F: Fn(&Value, Value, &Directives, &Value) -> UpdateResult<Value> + Send + Sync + 'static,
{
    modify(|updater| updater.register(name, handler));
}

/// Replaces the default updater's equality hook.
pub fn set_equality_fn(equals: impl Fn(&Value, &Value) -> bool + Send + Sync + 'static) {
    modify(|updater| updater.set_equality(equals));
}

/// Restores identity equality on the default updater.
pub fn reset_equality_fn() {
    modify(Updater::reset_equality);
}

/// Runs `f` with the default updater, e.g. to parse a spec with its
/// registry.
pub fn with_default<R>(f: impl FnOnce(&Updater) -> R) -> R {
    f(&current())
}
