//! Hook storage boundary
//!
//! The engine does not own hook persistence. It reads the loaded hook collection
//! through [`HookRegistry`] and reports the dispatch bookkeeping
//! (`executionCount`, `lastExecutedAt`) back through it.
//!
//! # Examples
//!
//! ```ignore
//! use gatomia_hooks::registry::{HookRegistry, InMemoryHookRegistry};
//!
//! let registry = InMemoryHookRegistry::new();
//! let hook_id = registry.register_hook(hook)?;
//!
//! registry.disable_hook(&hook_id)?;
//! assert!(!registry.get_hook(&hook_id)?.enabled);
//!
//! registry.record_execution(&hook_id, chrono::Utc::now())?;
//! assert_eq!(registry.get_hook(&hook_id)?.execution_count, 1);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod storage;

pub use storage::InMemoryHookRegistry;

use chrono::{DateTime, Utc};

use crate::{error::Result, types::Hook};

/// Hook collection keyed by id
///
/// Implementations must be thread-safe: the engine shares one registry between
/// concurrently running dispatches.
pub trait HookRegistry: Send + Sync {
    /// Store a new hook and return its id
    ///
    /// A hook with an empty id is assigned a fresh one.
    fn register_hook(&self, hook: Hook) -> Result<String>;

    /// Remove a hook
    ///
    /// # Errors
    ///
    /// Returns [`HooksError::HookNotFound`](crate::HooksError::HookNotFound) if no hook has this id
    fn unregister_hook(&self, hook_id: &str) -> Result<()>;

    fn get_hook(&self, hook_id: &str) -> Result<Hook>;

    /// All hooks, oldest first
    fn list_hooks(&self) -> Result<Vec<Hook>>;

    /// Replace a hook's user-editable fields and bump `modifiedAt`
    ///
    /// `createdAt`, `executionCount` and `lastExecutedAt` keep their stored values.
    fn update_hook(&self, hook: Hook) -> Result<Hook>;

    fn enable_hook(&self, hook_id: &str) -> Result<()>;

    fn disable_hook(&self, hook_id: &str) -> Result<()>;

    /// Count one dispatch that reached its backend
    fn record_execution(&self, hook_id: &str, at: DateTime<Utc>) -> Result<Hook>;
}
