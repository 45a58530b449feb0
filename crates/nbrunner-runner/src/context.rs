//! Scoped binding of the run's config path into the process environment.

use std::collections::HashSet;
use std::ffi::OsStr;
use std::sync::{LazyLock, Mutex, PoisonError};

use tracing::debug;

use crate::error::ContextError;

/// Keys currently owned by a live [`RunContext`].
static BOUND_KEYS: LazyLock<Mutex<HashSet<String>>> = LazyLock::new(|| Mutex::new(HashSet::new()));

/// Exposes one environment variable for the lifetime of a run.
///
/// Binding sets the variable; dropping the guard removes it again, on every
/// exit path. A key can only be held by one guard at a time, so a second run
/// trying to bind the same key while the first is still live gets
/// [`ContextError::AlreadyBound`] instead of silently clobbering it.
///
/// Mutating the environment is only sound while no other thread reads it.
/// Callers must bind from a single-threaded runtime (the `nbrunner` binary
/// runs batches on tokio's `current_thread` flavor) and must not read the
/// environment from other threads while a guard is alive.
#[derive(Debug)]
pub struct RunContext {
  key: String,
}

impl RunContext {
  pub fn bind(key: impl Into<String>, value: impl AsRef<OsStr>) -> Result<Self, ContextError> {
    let key = key.into();
    if key.is_empty() || key.contains(['=', '\0']) {
      return Err(ContextError::InvalidKey { key });
    }

    let mut bound = BOUND_KEYS.lock().unwrap_or_else(PoisonError::into_inner);
    if !bound.insert(key.clone()) {
      return Err(ContextError::AlreadyBound { key });
    }

    // SAFETY: the key is reserved in BOUND_KEYS, so this guard is its only
    // writer, and callers bind from a single thread with no concurrent readers.
    unsafe { std::env::set_var(&key, value) };
    debug!(key = %key, "execution context bound");

    Ok(Self { key })
  }

  pub fn key(&self) -> &str {
    &self.key
  }
}

impl Drop for RunContext {
  fn drop(&mut self) {
    let mut bound = BOUND_KEYS.lock().unwrap_or_else(PoisonError::into_inner);
    // SAFETY: still reserved by this guard until the remove below; the same
    // single-thread, no-concurrent-reader contract as `bind` applies.
    unsafe { std::env::remove_var(&self.key) };
    bound.remove(&self.key);
    debug!(key = %self.key, "execution context released");
  }
}
