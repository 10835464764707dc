//! Binding class-method pairs to host hooks without building the class first.

use crate::application::Application;
use crate::class::Invoker;
use crate::error::{Error, Result};
use hookwire_hooks::{action, filter, truncate_args, CallbackId};
use serde_json::Value;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HookKind {
  Action,
  Filter,
}

impl fmt::Display for HookKind {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      HookKind::Action => f.write_str("action"),
      HookKind::Filter => f.write_str("filter"),
    }
  }
}

/// What was handed to the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HookBinding {
  pub kind: HookKind,
  pub tag: String,
  pub class_id: String,
  pub method: String,
  pub priority: i32,
  pub accepted_args: usize,
  pub id: CallbackId,
}

/// Overrides for the configured hook defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BindOptions {
  method: Option<String>,
  priority: Option<i32>,
  accepted_args: Option<usize>,
}

impl BindOptions {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn method(mut self, method: impl Into<String>) -> Self {
    self.method = Some(method.into());
    self
  }

  pub fn priority(mut self, priority: i32) -> Self {
    self.priority = Some(priority);
    self
  }

  pub fn accepted_args(mut self, accepted_args: usize) -> Self {
    self.accepted_args = Some(accepted_args);
    self
  }
}

/// Registers deferred callbacks on the application's host.
///
/// Binding checks that the class is declared with the named method and fails
/// with [`Error::InvalidArgument`] otherwise. The class itself is resolved
/// through the container each time the hook fires, never at binding time.
pub struct HookBinder<'a> {
  app: &'a Application,
}

impl<'a> HookBinder<'a> {
  pub(crate) fn new(app: &'a Application) -> Self {
    Self { app }
  }

  pub fn add_action(
    &self,
    tag: &str,
    class_id: &str,
    method: &str,
    priority: i32,
    accepted_args: usize,
  ) -> Result<HookBinding> {
    self.bind_hook(HookKind::Action, tag, class_id, method, priority, accepted_args)
  }

  pub fn add_filter(
    &self,
    tag: &str,
    class_id: &str,
    method: &str,
    priority: i32,
    accepted_args: usize,
  ) -> Result<HookBinding> {
    self.bind_hook(HookKind::Filter, tag, class_id, method, priority, accepted_args)
  }

  /// `add_action` with the configured defaults.
  pub fn action(&self, tag: &str, class_id: &str) -> Result<HookBinding> {
    self.bind(HookKind::Action, tag, class_id, BindOptions::new())
  }

  /// `add_filter` with the configured defaults.
  pub fn filter(&self, tag: &str, class_id: &str) -> Result<HookBinding> {
    self.bind(HookKind::Filter, tag, class_id, BindOptions::new())
  }

  /// Binds with the configured defaults, overridden by `options`.
  pub fn bind(&self, kind: HookKind, tag: &str, class_id: &str, options: BindOptions) -> Result<HookBinding> {
    let defaults = &self.app.config().hooks;
    let method = options.method.unwrap_or_else(|| defaults.method.clone());
    self.bind_hook(
      kind,
      tag,
      class_id,
      &method,
      options.priority.unwrap_or(defaults.priority),
      options.accepted_args.unwrap_or(defaults.accepted_args),
    )
  }

  fn bind_hook(
    &self,
    kind: HookKind,
    tag: &str,
    class_id: &str,
    method: &str,
    priority: i32,
    accepted_args: usize,
  ) -> Result<HookBinding> {
    let invoker = self
      .app
      .classes()
      .invoker(class_id, method)
      .ok_or_else(|| Error::InvalidArgument {
        class_id: class_id.to_owned(),
        method: method.to_owned(),
      })?;

    let host = self.app.host();
    let id = match kind {
      HookKind::Action => host.add_action(tag, self.action_callback(invoker, accepted_args), priority, accepted_args),
      // A filter always needs the filtered value, even when the method takes
      // no arguments.
      HookKind::Filter => host.add_filter(
        tag,
        self.filter_callback(invoker, accepted_args),
        priority,
        accepted_args.max(1),
      ),
    };

    tracing::debug!(%kind, tag, class_id, method, priority, accepted_args, "hook bound");
    Ok(HookBinding {
      kind,
      tag: tag.to_owned(),
      class_id: class_id.to_owned(),
      method: method.to_owned(),
      priority,
      accepted_args,
      id,
    })
  }

  // Arguments are truncated here as well as by the host, so a host that
  // ignores the accepted count still delivers the right arity.

  fn action_callback(&self, invoker: Invoker, accepted_args: usize) -> hookwire_hooks::Action {
    let app = self.app.weak();
    action(move |args| {
      let Some(app) = app.upgrade() else {
        tracing::warn!("action fired after the application was dropped");
        return Ok(());
      };
      invoker(&app, truncate_args(args, accepted_args)).map(drop)
    })
  }

  fn filter_callback(&self, invoker: Invoker, accepted_args: usize) -> hookwire_hooks::Filter {
    let app = self.app.weak();
    filter(move |args| {
      let Some(app) = app.upgrade() else {
        tracing::warn!("filter fired after the application was dropped");
        return Ok(args.first().cloned().unwrap_or(Value::Null));
      };
      invoker(&app, truncate_args(args, accepted_args))
    })
  }
}
