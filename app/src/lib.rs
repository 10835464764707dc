//! # hookwire
//!
//! Service-provider bootstrapping and lazy hook binding for plugin-style hosts.
//!
//! - [`Application`] owns a service container and forwards the everyday
//!   container operations to it.
//! - [`ServiceProvider`]s are added by class identifier and loaded in two
//!   passes: every provider's `register`, then every provider's `boot`.
//! - [`HookBinder`] attaches a class-method pair to a host hook; the class is
//!   resolved from the container only when the hook fires.
//!
//! ```
//! use hookwire::{AppConfig, Application, ProviderError, ServiceProvider};
//! use hookwire_hooks::Hooks;
//!
//! #[derive(Default)]
//! struct SettingsProvider;
//!
//! impl ServiceProvider for SettingsProvider {
//!   fn register(&mut self, app: &Application) -> Result<(), ProviderError> {
//!     app.instance("site_name", String::from("Example"));
//!     Ok(())
//!   }
//!
//!   fn boot(&mut self, app: &Application) -> Result<(), ProviderError> {
//!     let name = app.make::<String>("site_name")?;
//!     assert_eq!(*name, "Example");
//!     Ok(())
//!   }
//! }
//!
//! let hooks = Hooks::shared();
//! let app = Application::bootstrap(hooks.clone(), AppConfig::default()).unwrap();
//! app.provider_class::<SettingsProvider>("settings");
//! app.add_service_provider("settings").unwrap();
//!
//! // The host decides when providers load.
//! hooks.do_action("plugins_loaded", &[]).unwrap();
//! assert!(app.providers_loaded());
//! ```

mod application;
mod binder;
mod class;
pub mod config;
mod error;
mod provider;

pub use application::Application;
pub use binder::{BindOptions, HookBinder, HookBinding, HookKind};
pub use class::{ClassBuilder, Classes};
pub use config::{AppConfig, DuplicatePolicy, HookDefaults, LoadStrategy};
pub use error::{Error, Result};
pub use provider::{Phase, ProviderError, ServiceProvider};
