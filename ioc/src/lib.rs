//! # hookwire IoC
//!
//! A small, thread-safe service container keyed by abstract identifiers.
//!
//! ## Core Concepts
//!
//! - **Container**: the registry mapping an abstract identifier to a binding.
//! - **Bindings**: `singleton` (built once, lazily), `bind` (built on every
//!   resolution) and `instance` (already built).
//! - **Resolver**: what a factory receives; it can resolve further services and
//!   read the parameters passed to [`Container::make_with`].
//! - **Traits**: services can be bound as trait objects and resolved as
//!   `Arc<dyn Trait>`.
//!
//! ## Quick Start
//!
//! ```
//! use hookwire_ioc::Container;
//! use std::sync::Arc;
//!
//! trait Greeter: Send + Sync {
//!   fn greet(&self) -> String;
//! }
//!
//! struct EnglishGreeter {
//!   message: String,
//! }
//!
//! impl Greeter for EnglishGreeter {
//!   fn greet(&self) -> String {
//!     self.message.clone()
//!   }
//! }
//!
//! let container = Container::new();
//! container.instance("greeting_message", String::from("Hello, World!"));
//!
//! // The factory can itself resolve other dependencies.
//! container.singleton_trait::<dyn Greeter, _>("greeter", |r| {
//!   let message = r.make::<String>("greeting_message")?;
//!   Ok(Arc::new(EnglishGreeter { message: (*message).clone() }) as Arc<dyn Greeter>)
//! });
//!
//! let greeter = container.make::<dyn Greeter>("greeter").unwrap();
//! assert_eq!(greeter.greet(), "Hello, World!");
//! ```

mod container;
mod core;
mod error;
mod resolver;

pub use container::Container;
pub use error::{ContainerError, Result};
pub use resolver::{Parameters, Resolver};
