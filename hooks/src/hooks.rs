//! The in-process dispatcher.

use crate::error::{HookError, Result};
use crate::host::{truncate_args, Action, CallbackId, EventHost, Filter};
use parking_lot::{Mutex, RwLock};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::thread::{self, ThreadId};

#[derive(Clone)]
enum Callback {
  Action(Action),
  Filter(Filter),
}

#[derive(Clone)]
struct Registered {
  id: CallbackId,
  priority: i32,
  accepted_args: usize,
  callback: Callback,
}

/// Callbacks grouped by tag.
///
/// Within a tag callbacks run by ascending priority, then in the order they
/// were added. Actions and filters share one table, so `do_action` also runs
/// filters registered on the tag (their results are dropped) and
/// `apply_filters` also runs actions (the value passes through unchanged).
///
/// Dispatch works on a snapshot of the tag's callbacks: callbacks added while
/// a tag is firing run from the next dispatch on.
#[derive(Default)]
pub struct Hooks {
  next_id: AtomicU64,
  table: RwLock<HashMap<String, Vec<Registered>>>,
  fired: Mutex<HashMap<String, usize>>,
  dispatching: Mutex<Vec<(ThreadId, String)>>,
}

/// Marks `tag` as firing on the calling thread until dropped.
///
/// Dispatches on other threads interleave in the shared stack, so a guard
/// removes its own entry rather than the last one.
struct DispatchGuard<'a> {
  stack: &'a Mutex<Vec<(ThreadId, String)>>,
  thread: ThreadId,
}

impl<'a> DispatchGuard<'a> {
  fn enter(stack: &'a Mutex<Vec<(ThreadId, String)>>, tag: &str) -> Self {
    let thread = thread::current().id();
    stack.lock().push((thread, tag.to_owned()));
    Self { stack, thread }
  }
}

impl Drop for DispatchGuard<'_> {
  fn drop(&mut self) {
    let mut stack = self.stack.lock();
    if let Some(at) = stack.iter().rposition(|(thread, _)| *thread == self.thread) {
      stack.remove(at);
    }
  }
}

impl Hooks {
  pub fn new() -> Self {
    Self::default()
  }

  /// Shared handle, the usual way a host is passed around.
  pub fn shared() -> Arc<Self> {
    Arc::new(Self::new())
  }

  fn insert(&self, tag: &str, priority: i32, accepted_args: usize, callback: Callback) -> CallbackId {
    let id = CallbackId(self.next_id.fetch_add(1, Ordering::Relaxed));
    let mut table = self.table.write();
    let entries = table.entry(tag.to_owned()).or_default();
    let at = entries.partition_point(|r| r.priority <= priority);
    entries.insert(
      at,
      Registered {
        id,
        priority,
        accepted_args,
        callback,
      },
    );
    tracing::debug!(tag, %id, priority, accepted_args, "hook callback added");
    id
  }

  fn snapshot(&self, tag: &str) -> Vec<Registered> {
    self.table.read().get(tag).cloned().unwrap_or_default()
  }

  fn record_fired(&self, tag: &str) {
    *self.fired.lock().entry(tag.to_owned()).or_insert(0) += 1;
  }

  /// Runs every callback on `tag`. The first failing callback stops the
  /// dispatch.
  pub fn do_action(&self, tag: &str, args: &[Value]) -> Result<()> {
    self.record_fired(tag);
    let callbacks = self.snapshot(tag);
    tracing::trace!(tag, callbacks = callbacks.len(), "doing action");
    let _guard = DispatchGuard::enter(&self.dispatching, tag);

    for registered in callbacks {
      let args = truncate_args(args, registered.accepted_args);
      let outcome = match &registered.callback {
        Callback::Action(action) => action(args),
        Callback::Filter(filter) => filter(args).map(drop),
      };
      outcome.map_err(|source| HookError::Callback {
        tag: tag.to_owned(),
        id: registered.id.get(),
        source,
      })?;
    }
    Ok(())
  }

  /// Threads `value` through every callback on `tag`. Each callback receives
  /// `[value, extra..]`, truncated to its accepted argument count.
  pub fn apply_filters(&self, tag: &str, value: Value, extra: &[Value]) -> Result<Value> {
    let callbacks = self.snapshot(tag);
    tracing::trace!(tag, callbacks = callbacks.len(), "applying filters");
    let _guard = DispatchGuard::enter(&self.dispatching, tag);

    let mut value = value;
    for registered in callbacks {
      let mut args = Vec::with_capacity(extra.len() + 1);
      args.push(value.clone());
      args.extend_from_slice(extra);
      let args = truncate_args(&args, registered.accepted_args);

      let outcome = match &registered.callback {
        Callback::Filter(filter) => filter(args),
        Callback::Action(action) => action(args).map(|()| value.clone()),
      };
      value = outcome.map_err(|source| HookError::Callback {
        tag: tag.to_owned(),
        id: registered.id.get(),
        source,
      })?;
    }
    Ok(value)
  }

  /// Removes one callback. Returns whether it was registered on `tag`.
  pub fn remove(&self, tag: &str, id: CallbackId) -> bool {
    let mut table = self.table.write();
    let Some(entries) = table.get_mut(tag) else {
      return false;
    };
    let before = entries.len();
    entries.retain(|r| r.id != id);
    before != entries.len()
  }

  /// Removes every callback on `tag`.
  pub fn remove_all(&self, tag: &str) {
    self.table.write().remove(tag);
  }

  pub fn has(&self, tag: &str) -> bool {
    self.table.read().get(tag).is_some_and(|entries| !entries.is_empty())
  }

  /// How many times `do_action` ran for `tag`.
  pub fn did_action(&self, tag: &str) -> usize {
    self.fired.lock().get(tag).copied().unwrap_or(0)
  }

  /// The innermost tag being dispatched on the calling thread, if any.
  pub fn current(&self) -> Option<String> {
    let me = thread::current().id();
    self
      .dispatching
      .lock()
      .iter()
      .rev()
      .find(|(thread, _)| *thread == me)
      .map(|(_, tag)| tag.clone())
  }
}

impl EventHost for Hooks {
  fn add_action(&self, tag: &str, callback: Action, priority: i32, accepted_args: usize) -> CallbackId {
    self.insert(tag, priority, accepted_args, Callback::Action(callback))
  }

  fn add_filter(&self, tag: &str, callback: Filter, priority: i32, accepted_args: usize) -> CallbackId {
    self.insert(tag, priority, accepted_args, Callback::Filter(callback))
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::host::action;

  #[test]
  fn same_priority_keeps_insertion_order() {
    let hooks = Hooks::new();
    let a = hooks.add_action("t", action(|_| Ok(())), 10, 0);
    let b = hooks.add_action("t", action(|_| Ok(())), 5, 0);
    let c = hooks.add_action("t", action(|_| Ok(())), 10, 0);

    let order: Vec<_> = hooks.snapshot("t").iter().map(|r| r.id).collect();
    assert_eq!(order, vec![b, a, c]);
  }

  #[test]
  fn current_is_cleared_after_dispatch() {
    let hooks = Hooks::new();
    assert_eq!(hooks.current(), None);
    hooks.do_action("nothing", &[]).unwrap();
    assert_eq!(hooks.current(), None);
  }
}
