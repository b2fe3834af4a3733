//! Declarative structural updates for immutable nested values.
//!
//! # Overview
//!
//! [`update`] takes a [`Value`] and a [`Spec`] describing what should change,
//! and returns a new value with those changes. Containers are shared through
//! `Arc`: everything the spec does not touch is the *same* allocation in the
//! input and the output, and a touched container is copied once, right
//! before its first write.
//!
//! Specs hold commands (`$set`, `$push`, `$unshift`, `$splice`, `$merge`,
//! `$unset`, `$toggle`, `$add`, `$remove`, `$apply`) and nested specs for
//! children. Custom commands can be registered on an [`Updater`] or, for
//! the crate-root functions, with [`register_command`].
//!
//! # Example
//!
//! ```
//! use immutability_helper::{update, update_json, Spec, Value};
//! use serde_json::json;
//!
//! let state = Value::from(json!({"todos": [{"done": false}], "filter": "all"}));
//! let spec = Spec::path("todos", Spec::path("0", Spec::toggle(["done"])));
//! let next = update(&state, &spec).unwrap();
//!
//! assert_eq!(next.to_json(), json!({"todos": [{"done": true}], "filter": "all"}));
//! assert!(Value::same(&next.get("filter"), &state.get("filter")));
//!
//! let doc = update_json(&json!({"list": [1, 2]}), &json!({"list": {"$push": [3]}})).unwrap();
//! assert_eq!(doc, json!({"list": [1, 2, 3]}));
//! ```

pub mod commands;
pub mod copy;
pub mod error;
pub mod global;
pub mod spec;
pub mod update;
pub mod value;

pub use commands::{CommandFn, Commands};
pub use copy::{shallow_copy, Draft};
pub use error::{UpdateError, UpdateResult};
pub use global::{
    register_command, reset_equality_fn, set_equality_fn, update, update_json, update_value, with_default,
};
pub use spec::{DeleteCount, Directive, Directives, Spec, Splice};
pub use update::{EqualityFn, Updater};
pub use value::{deep_equals, Func, Kind, Number, Object, Value};
