//! # hookwire hooks
//!
//! A host event system in the style of a plugin platform's hook dispatcher.
//! Callbacks are registered under a tag with a priority and an accepted
//! argument count, and fire when the host runs that tag.
//!
//! ```
//! use hookwire_hooks::{filter, EventHost, Hooks};
//! use serde_json::{json, Value};
//!
//! let hooks = Hooks::new();
//! hooks.add_filter(
//!   "title",
//!   filter(|args| Ok(Value::from(format!("[{}]", args[0].as_str().unwrap_or_default())))),
//!   10,
//!   1,
//! );
//!
//! let title = hooks.apply_filters("title", json!("hello"), &[]).unwrap();
//! assert_eq!(title, json!("[hello]"));
//! ```

mod error;
mod hooks;
mod host;

pub use error::{CallbackError, HookError, Result};
pub use hooks::Hooks;
pub use host::{action, filter, truncate_args, Action, CallbackId, EventHost, Filter};
