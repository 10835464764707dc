//! The main `Container` struct and its associated methods.

use crate::core::{Binding, ErasedFactory, ErasedValue, ResolutionGuard};
use crate::error::{ContainerError, Result};
use crate::resolver::{Parameters, Resolver};
use dashmap::DashMap;
use std::any::{type_name, Any};
use std::sync::Arc;

/// The service container.
///
/// Maps abstract identifiers to bindings. It is thread-safe and allows
/// registration and resolution at any point; binding an abstract twice
/// replaces the earlier binding.
#[derive(Default)]
pub struct Container {
  bindings: DashMap<String, Arc<Binding>>,
}

impl Container {
  /// Creates a new, empty `Container`.
  pub fn new() -> Self {
    Self::default()
  }

  // --- PRIVATE HELPERS ---

  fn insert(&self, abstract_id: &str, binding: Binding) {
    tracing::debug!(
      abstract_id,
      shared = binding.is_shared(),
      "binding service"
    );
    self.bindings.insert(abstract_id.to_owned(), Arc::new(binding));
  }

  fn erase<T, F>(factory: F) -> ErasedFactory
  where
    T: Any + Send + Sync,
    F: Fn(&Resolver<'_>) -> Result<T> + Send + Sync + 'static,
  {
    Box::new(move |resolver: &Resolver<'_>| -> Result<ErasedValue> {
      Ok(Box::new(Arc::new(factory(resolver)?)))
    })
  }

  // --- PUBLIC API ---

  // --- Registration ---

  /// Binds `abstract_id` to a value built once, on first resolution.
  pub fn singleton<T, F>(&self, abstract_id: &str, factory: F)
  where
    T: Any + Send + Sync,
    F: Fn(&Resolver<'_>) -> Result<T> + Send + Sync + 'static,
  {
    self.insert(abstract_id, Binding::shared(Self::erase(factory)));
  }

  /// Binds `abstract_id` to a factory that runs on every resolution.
  pub fn bind<T, F>(&self, abstract_id: &str, factory: F)
  where
    T: Any + Send + Sync,
    F: Fn(&Resolver<'_>) -> Result<T> + Send + Sync + 'static,
  {
    self.insert(abstract_id, Binding::factory(Self::erase(factory)));
  }

  /// Binds `abstract_id` to an already-built value.
  pub fn instance<T: Any + Send + Sync>(&self, abstract_id: &str, value: T) {
    self.insert(abstract_id, Binding::instance(Box::new(Arc::new(value))));
  }

  /// Binds `abstract_id` to a shared trait object, resolved with
  /// `make::<dyn Trait>(..)`.
  pub fn singleton_trait<I, F>(&self, abstract_id: &str, factory: F)
  where
    I: ?Sized + Any + Send + Sync,
    F: Fn(&Resolver<'_>) -> Result<Arc<I>> + Send + Sync + 'static,
  {
    let erased: ErasedFactory = Box::new(move |resolver: &Resolver<'_>| -> Result<ErasedValue> {
      Ok(Box::new(factory(resolver)?))
    });
    self.insert(abstract_id, Binding::shared(erased));
  }

  /// Removes a binding. Returns whether one existed.
  pub fn forget(&self, abstract_id: &str) -> bool {
    self.bindings.remove(abstract_id).is_some()
  }

  // --- Inspection ---

  pub fn has(&self, abstract_id: &str) -> bool {
    self.bindings.contains_key(abstract_id)
  }

  pub fn len(&self) -> usize {
    self.bindings.len()
  }

  pub fn is_empty(&self) -> bool {
    self.bindings.is_empty()
  }

  // --- Resolution ---

  /// Resolves `abstract_id` as a `T`.
  pub fn make<T: ?Sized + Any + Send + Sync>(&self, abstract_id: &str) -> Result<Arc<T>> {
    self.make_with(abstract_id, &Parameters::new())
  }

  /// Resolves `abstract_id` as a `T`, handing `parameters` to its factory.
  pub fn make_with<T: ?Sized + Any + Send + Sync>(
    &self,
    abstract_id: &str,
    parameters: &Parameters,
  ) -> Result<Arc<T>> {
    // Entered before the factory runs, released when this call returns.
    let _guard = ResolutionGuard::enter(abstract_id)?;

    // Clone the binding out so no shard lock is held while user code runs.
    let binding = self
      .bindings
      .get(abstract_id)
      .map(|entry| Arc::clone(entry.value()))
      .ok_or_else(|| ContainerError::NotBound {
        abstract_id: abstract_id.to_owned(),
      })?;

    tracing::trace!(abstract_id, expected = type_name::<T>(), "resolving service");

    let resolver = Resolver::new(self, parameters, abstract_id);
    let mismatch = || ContainerError::TypeMismatch {
      abstract_id: abstract_id.to_owned(),
      expected: type_name::<T>(),
    };

    if let Some(shared) = binding.get_shared(&resolver) {
      return shared?
        .downcast_ref::<Arc<T>>()
        .cloned()
        .ok_or_else(mismatch);
    }

    match binding.build_owned(&resolver) {
      Some(built) => built?
        .downcast::<Arc<T>>()
        .map(|boxed| *boxed)
        .map_err(|_| mismatch()),
      None => Err(mismatch()),
    }
  }

  /// Property-style access: resolves `abstract_id` without parameters.
  pub fn get<T: ?Sized + Any + Send + Sync>(&self, abstract_id: &str) -> Result<Arc<T>> {
    self.make(abstract_id)
  }
}
