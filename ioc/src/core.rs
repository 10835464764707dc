//! Core, non-public data structures for the container.

use crate::error::{ContainerError, Result};
use crate::resolver::Resolver;
use once_cell::sync::OnceCell;
use std::any::Any;
use std::cell::RefCell;
use std::collections::HashSet;

thread_local! {
  // Abstracts currently being resolved on this thread. Re-entering one of
  // them means a factory (directly or transitively) depends on itself.
  static RESOLVING: RefCell<HashSet<String>> = RefCell::new(HashSet::new());
}

/// An RAII guard that marks an abstract as "being resolved" on this thread.
///
/// Entering an abstract that is already marked fails with
/// [`ContainerError::CircularDependency`]. Dropping the guard unmarks it.
pub(crate) struct ResolutionGuard {
  abstract_id: String,
}

impl ResolutionGuard {
  pub(crate) fn enter(abstract_id: &str) -> Result<Self> {
    let inserted = RESOLVING.with(|set| set.borrow_mut().insert(abstract_id.to_owned()));
    if !inserted {
      return Err(ContainerError::CircularDependency {
        abstract_id: abstract_id.to_owned(),
      });
    }
    Ok(Self {
      abstract_id: abstract_id.to_owned(),
    })
  }
}

impl Drop for ResolutionGuard {
  fn drop(&mut self) {
    RESOLVING.with(|set| {
      set.borrow_mut().remove(&self.abstract_id);
    });
  }
}

pub(crate) type ErasedValue = Box<dyn Any + Send + Sync>;

pub(crate) type ErasedFactory = Box<dyn Fn(&Resolver<'_>) -> Result<ErasedValue> + Send + Sync>;

/// How an abstract turns into a value.
///
/// Values are always stored as `Box<Arc<T>>` erased to `Box<dyn Any>`, which
/// lets `T` be unsized (`dyn Trait`) while still downcasting safely.
pub(crate) enum Binding {
  /// Built at most once, then handed out as clones of the same `Arc`.
  /// `factory` is `None` for pre-built instances.
  Shared {
    cell: OnceCell<ErasedValue>,
    factory: Option<ErasedFactory>,
  },
  /// Built anew on every resolution.
  Factory { factory: ErasedFactory },
}

impl Binding {
  pub(crate) fn shared(factory: ErasedFactory) -> Self {
    Binding::Shared {
      cell: OnceCell::new(),
      factory: Some(factory),
    }
  }

  pub(crate) fn instance(value: ErasedValue) -> Self {
    Binding::Shared {
      cell: OnceCell::with_value(value),
      factory: None,
    }
  }

  pub(crate) fn factory(factory: ErasedFactory) -> Self {
    Binding::Factory { factory }
  }

  pub(crate) fn is_shared(&self) -> bool {
    matches!(self, Binding::Shared { .. })
  }

  /// Returns the cached value, building it first if needed. A failing factory
  /// leaves the cell empty.
  pub(crate) fn get_shared(&self, resolver: &Resolver<'_>) -> Option<Result<&ErasedValue>> {
    match self {
      Binding::Shared { cell, factory } => Some(cell.get_or_try_init(|| match factory {
        Some(factory) => factory(resolver),
        None => Err(ContainerError::NotBound {
          abstract_id: resolver.abstract_id().to_owned(),
        }),
      })),
      Binding::Factory { .. } => None,
    }
  }

  pub(crate) fn build_owned(&self, resolver: &Resolver<'_>) -> Option<Result<ErasedValue>> {
    match self {
      Binding::Factory { factory } => Some(factory(resolver)),
      Binding::Shared { .. } => None,
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn guard_rejects_reentry_and_releases_on_drop() {
    let outer = ResolutionGuard::enter("svc").unwrap();
    assert!(matches!(
      ResolutionGuard::enter("svc"),
      Err(ContainerError::CircularDependency { .. })
    ));
    drop(outer);
    assert!(ResolutionGuard::enter("svc").is_ok());
  }

  #[test]
  fn guard_allows_distinct_abstracts() {
    let _a = ResolutionGuard::enter("a").unwrap();
    let _b = ResolutionGuard::enter("b").unwrap();
  }
}
