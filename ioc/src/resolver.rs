//! What a factory sees while it builds a value.

use crate::container::Container;
use crate::error::{ContainerError, Result};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::any::Any;
use std::collections::BTreeMap;
use std::sync::Arc;

/// Named arguments passed to a factory through [`Container::make_with`].
///
/// Shared bindings only see the parameters of the call that first builds them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Parameters {
  values: BTreeMap<String, Value>,
}

impl Parameters {
  pub fn new() -> Self {
    Self::default()
  }

  /// Builder-style insert.
  pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
    self.insert(name, value);
    self
  }

  pub fn insert(&mut self, name: impl Into<String>, value: impl Into<Value>) {
    self.values.insert(name.into(), value.into());
  }

  pub fn get(&self, name: &str) -> Option<&Value> {
    self.values.get(name)
  }

  pub fn len(&self) -> usize {
    self.values.len()
  }

  pub fn is_empty(&self) -> bool {
    self.values.is_empty()
  }

  pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
    self.values.iter().map(|(k, v)| (k.as_str(), v))
  }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Parameters {
  fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
    let mut parameters = Parameters::new();
    for (name, value) in iter {
      parameters.insert(name, value);
    }
    parameters
  }
}

/// Handed to every factory. Gives access to the container for further
/// resolution and to the parameters of the current `make` call.
pub struct Resolver<'a> {
  container: &'a Container,
  parameters: &'a Parameters,
  abstract_id: &'a str,
}

impl<'a> Resolver<'a> {
  pub(crate) fn new(container: &'a Container, parameters: &'a Parameters, abstract_id: &'a str) -> Self {
    Self {
      container,
      parameters,
      abstract_id,
    }
  }

  /// The abstract being built.
  pub fn abstract_id(&self) -> &str {
    self.abstract_id
  }

  pub fn container(&self) -> &Container {
    self.container
  }

  pub fn parameters(&self) -> &Parameters {
    self.parameters
  }

  /// Resolves a dependency. Parameters are not forwarded.
  pub fn make<T: ?Sized + Any + Send + Sync>(&self, abstract_id: &str) -> Result<Arc<T>> {
    self.container.make::<T>(abstract_id)
  }

  /// Reads an optional parameter, deserializing it into `V`.
  pub fn parameter<V: DeserializeOwned>(&self, name: &str) -> Result<Option<V>> {
    match self.parameters.get(name) {
      None => Ok(None),
      Some(value) => serde_json::from_value(value.clone())
        .map(Some)
        .map_err(|e| ContainerError::InvalidParameter {
          name: name.to_owned(),
          reason: e.to_string(),
        }),
    }
  }

  /// Like [`Resolver::parameter`], but a missing parameter is an error.
  pub fn require<V: DeserializeOwned>(&self, name: &str) -> Result<V> {
    self
      .parameter(name)?
      .ok_or_else(|| ContainerError::InvalidParameter {
        name: name.to_owned(),
        reason: format!("required by '{}' but not supplied", self.abstract_id),
      })
  }
}
