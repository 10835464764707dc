//! The class catalog: string identifiers for Rust types.
//!
//! Providers and hook targets are referred to by identifier, so the catalog
//! records, per identifier, whether the type is a service provider and which
//! named methods hooks may call on it. Both may be declared for the same
//! identifier, in either order.

use crate::application::Application;
use crate::provider::ServiceProvider;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use hookwire_hooks::CallbackError;
use hookwire_ioc::Resolver;
use serde_json::Value;
use std::any::{type_name, Any};
use std::collections::HashMap;
use std::sync::Arc;

pub(crate) type ProviderConstructor = fn() -> Box<dyn ServiceProvider>;

/// Resolves the class through the application's container, then calls one
/// method on the instance.
pub(crate) type Invoker = Arc<dyn Fn(&Application, &[Value]) -> Result<Value, CallbackError> + Send + Sync>;

type ClassFactory<T> = Box<dyn Fn(&Resolver<'_>) -> hookwire_ioc::Result<T> + Send + Sync>;

pub(crate) struct ClassEntry {
  type_name: &'static str,
  provider: Option<ProviderConstructor>,
  methods: HashMap<String, Invoker>,
}

impl ClassEntry {
  /// Layers a later declaration over this one. Methods of the same name and
  /// the provider constructor are replaced; everything else is kept.
  fn merged_with(&self, later: ClassEntry) -> ClassEntry {
    let mut methods = self.methods.clone();
    methods.extend(later.methods);
    ClassEntry {
      type_name: later.type_name,
      provider: later.provider.or(self.provider),
      methods,
    }
  }
}

fn construct_provider<P: ServiceProvider + Default + 'static>() -> Box<dyn ServiceProvider> {
  Box::new(P::default())
}

/// Every class an application knows by identifier.
#[derive(Default)]
pub struct Classes {
  entries: DashMap<String, Arc<ClassEntry>>,
}

impl Classes {
  pub(crate) fn insert(&self, class_id: &str, entry: ClassEntry) {
    tracing::debug!(
      class_id,
      type_name = entry.type_name,
      provider = entry.provider.is_some(),
      methods = entry.methods.len(),
      "class declared"
    );
    match self.entries.entry(class_id.to_owned()) {
      Entry::Occupied(mut existing) => {
        let merged = existing.get().merged_with(entry);
        existing.insert(Arc::new(merged));
      }
      Entry::Vacant(slot) => {
        slot.insert(Arc::new(entry));
      }
    }
  }

  pub(crate) fn insert_provider<P: ServiceProvider + Default + 'static>(&self, class_id: &str) {
    self.insert(
      class_id,
      ClassEntry {
        type_name: type_name::<P>(),
        provider: Some(construct_provider::<P> as ProviderConstructor),
        methods: HashMap::new(),
      },
    );
  }

  pub(crate) fn provider_constructor(&self, class_id: &str) -> Option<ProviderConstructor> {
    self.entries.get(class_id).and_then(|entry| entry.provider)
  }

  pub(crate) fn invoker(&self, class_id: &str, method: &str) -> Option<Invoker> {
    self
      .entries
      .get(class_id)
      .and_then(|entry| entry.methods.get(method).cloned())
  }

  pub fn contains(&self, class_id: &str) -> bool {
    self.entries.contains_key(class_id)
  }

  pub fn is_service_provider(&self, class_id: &str) -> bool {
    self.provider_constructor(class_id).is_some()
  }

  pub fn has_method(&self, class_id: &str, method: &str) -> bool {
    self
      .entries
      .get(class_id)
      .is_some_and(|entry| entry.methods.contains_key(method))
  }

  /// The Rust type declared under `class_id`.
  pub fn type_name(&self, class_id: &str) -> Option<&'static str> {
    self.entries.get(class_id).map(|entry| entry.type_name)
  }

  pub fn len(&self) -> usize {
    self.entries.len()
  }

  pub fn is_empty(&self) -> bool {
    self.entries.is_empty()
  }
}

/// Declares a hook-callable class. Obtained from [`Application::class`] or
/// [`Application::class_with`]; nothing is stored until [`ClassBuilder::declare`].
#[must_use = "a class is only known to the application once `declare` is called"]
pub struct ClassBuilder<'a, T> {
  app: &'a Application,
  class_id: String,
  factory: ClassFactory<T>,
  methods: HashMap<String, Invoker>,
}

impl<'a, T: Any + Send + Sync> ClassBuilder<'a, T> {
  pub(crate) fn new(app: &'a Application, class_id: &str, factory: ClassFactory<T>) -> Self {
    Self {
      app,
      class_id: class_id.to_owned(),
      factory,
      methods: HashMap::new(),
    }
  }

  /// Exposes `f` to hooks as `name`. The instance is resolved from the
  /// container on every call.
  pub fn method<F>(mut self, name: &str, f: F) -> Self
  where
    F: Fn(&T, &[Value]) -> Result<Value, CallbackError> + Send + Sync + 'static,
  {
    let class_id = self.class_id.clone();
    let invoker: Invoker = Arc::new(move |app: &Application, args: &[Value]| -> Result<Value, CallbackError> {
      tracing::trace!(class_id = %class_id, "resolving hook target");
      let instance = app.make::<T>(&class_id)?;
      f(&instance, args)
    });
    self.methods.insert(name.to_owned(), invoker);
    self
  }

  /// Stores the class. Unless the identifier is already bound in the
  /// container, it is bound to the class factory, building a fresh instance
  /// per resolution.
  pub fn declare(self) {
    let ClassBuilder {
      app,
      class_id,
      factory,
      methods,
    } = self;

    if !app.has(&class_id) {
      app.bind(&class_id, move |r| factory(r));
    }

    app.classes().insert(
      &class_id,
      ClassEntry {
        type_name: type_name::<T>(),
        provider: None,
        methods,
      },
    );
  }
}
