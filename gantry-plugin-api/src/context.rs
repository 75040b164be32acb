//! Execution context passed to hook handlers.
//!
//! The engine never exposes ambient state: everything a handler may need —
//! the fired event, the resolved command path, the shared options, and a
//! handle for dispatching further commands — travels in a [`HookContext`]
//! argument.

use std::fmt;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;
use serde_json::{Map, Value};

/// Shared, mutable option set for one dispatch run.
///
/// Cloning is cheap and every clone refers to the same underlying map, so
/// a mutation made by one handler is visible to every later handler and to
/// the caller once the run completes.
#[derive(Debug, Clone, Default)]
pub struct Options {
    inner: Arc<RwLock<Map<String, Value>>>,
}

impl Options {
    /// Create an empty option set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an option set from an existing map.
    pub fn from_map(map: Map<String, Value>) -> Self {
        Self {
            inner: Arc::new(RwLock::new(map)),
        }
    }

    /// Get a copy of the value stored under `key`.
    pub fn get(&self, key: &str) -> Option<Value> {
        self.read().get(key).cloned()
    }

    /// Store `value` under `key`, returning the previous value if any.
    pub fn insert(&self, key: impl Into<String>, value: Value) -> Option<Value> {
        self.write().insert(key.into(), value)
    }

    /// Remove the value stored under `key`.
    pub fn remove(&self, key: &str) -> Option<Value> {
        self.write().remove(key)
    }

    /// Whether a value is stored under `key`.
    pub fn contains(&self, key: &str) -> bool {
        self.read().contains_key(key)
    }

    /// Number of stored options.
    pub fn len(&self) -> usize {
        self.read().len()
    }

    /// Whether no options are stored.
    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    /// A point-in-time copy of the full map.
    pub fn snapshot(&self) -> Map<String, Value> {
        self.read().clone()
    }

    // A poisoned lock only means a handler panicked mid-write; the map
    // itself is still usable, so recover it instead of propagating the
    // panic to unrelated handlers.
    fn read(&self) -> RwLockReadGuard<'_, Map<String, Value>> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Map<String, Value>> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl From<Map<String, Value>> for Options {
    fn from(map: Map<String, Value>) -> Self {
        Self::from_map(map)
    }
}

/// Entry point for dispatching a command through a running engine.
///
/// The host's dispatcher implements this; handlers reach it through
/// [`HookContext::invoke`] to trigger a full command lifecycle from inside
/// another one. Re-entrant invocations share only the read-only command
/// tree and hook registry, never executor state.
#[async_trait]
pub trait CommandRunner: Send + Sync {
    /// Run the full lifecycle for `commands` with the given options.
    async fn run_command(&self, commands: &[String], options: Options) -> anyhow::Result<()>;
}

/// A runner that ignores dispatch requests.
///
/// Useful for exercising handlers in contexts detached from an engine,
/// such as plugin unit tests.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopRunner;

#[async_trait]
impl CommandRunner for NoopRunner {
    async fn run_command(&self, _commands: &[String], _options: Options) -> anyhow::Result<()> {
        Ok(())
    }
}

/// Context handed to every hook invocation.
#[derive(Clone)]
pub struct HookContext {
    event: String,
    command_path: Arc<Vec<String>>,
    options: Options,
    runner: Arc<dyn CommandRunner>,
}

impl HookContext {
    /// Create a context for one dispatch run. The event name starts empty;
    /// the executor stamps it per invocation via [`HookContext::for_event`].
    pub fn new(
        command_path: Vec<String>,
        options: Options,
        runner: Arc<dyn CommandRunner>,
    ) -> Self {
        Self {
            event: String::new(),
            command_path: Arc::new(command_path),
            options,
            runner,
        }
    }

    /// A copy of this context stamped with the event being fired.
    pub fn for_event(&self, event: impl Into<String>) -> Self {
        let mut ctx = self.clone();
        ctx.event = event.into();
        ctx
    }

    /// The fully-qualified event name this handler was invoked for.
    pub fn event(&self) -> &str {
        &self.event
    }

    /// The resolved command path tokens, root first.
    pub fn command_path(&self) -> &[String] {
        &self.command_path
    }

    /// The shared option set for this run.
    pub fn options(&self) -> &Options {
        &self.options
    }

    /// Dispatch another command through the engine that invoked this hook.
    pub async fn invoke(&self, commands: &[String], options: Options) -> anyhow::Result<()> {
        self.runner.run_command(commands, options).await
    }
}

impl fmt::Debug for HookContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HookContext")
            .field("event", &self.event)
            .field("command_path", &self.command_path)
            .finish()
    }
}
