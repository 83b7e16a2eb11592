//! Action dispatch
//!
//! Routes a fired hook's action to the backend executor registered for its kind,
//! after resolving every template-bearing parameter against the firing context.
//!
//! Backends are supplied by the host at construction time:
//!
//! ```ignore
//! let executors = ExecutorRegistry::new()
//!     .with(ActionKind::Git, Arc::new(GitBackend::new(repo)))
//!     .with(ActionKind::GitHub, Arc::new(GitHubBackend::new(token)));
//! let dispatcher = ActionDispatcher::new(executors, ExecutionStatusTracker::new());
//! let outcome = dispatcher.dispatch(&hook, &context).await;
//! ```
//!
//! [`ActionDispatcher::dispatch`] never returns an error. Template, routing and
//! backend failures all come back as a `failed` [`ExecutionOutcome`](crate::types::ExecutionOutcome)
//! whose [`FailureKind`](crate::types::FailureKind) tells them apart.

pub mod action;
pub mod resolver;

pub use action::ActionDispatcher;
pub use resolver::ActionResolver;

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;

use crate::action::{ActionConfig, ActionKind};
use crate::types::BackendResponse;

/// Backend capability for one action kind
///
/// Receives the action with every template already resolved. Implementations own
/// their own time limits and retries; the dispatcher applies neither.
#[async_trait]
pub trait ActionExecutor: Send + Sync {
    async fn execute(&self, action: &ActionConfig) -> BackendResponse;
}

/// Executors keyed by the action kind they serve
#[derive(Clone, Default)]
pub struct ExecutorRegistry {
    executors: HashMap<ActionKind, Arc<dyn ActionExecutor>>,
}

impl ExecutorRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of [`register`](Self::register)
    pub fn with(mut self, kind: ActionKind, executor: Arc<dyn ActionExecutor>) -> Self {
        self.register(kind, executor);
        self
    }

    /// Register `executor` for `kind`, returning the one it replaces
    pub fn register(
        &mut self,
        kind: ActionKind,
        executor: Arc<dyn ActionExecutor>,
    ) -> Option<Arc<dyn ActionExecutor>> {
        self.executors.insert(kind, executor)
    }

    pub fn get(&self, kind: ActionKind) -> Option<Arc<dyn ActionExecutor>> {
        self.executors.get(&kind).cloned()
    }

    pub fn contains(&self, kind: ActionKind) -> bool {
        self.executors.contains_key(&kind)
    }

    /// Registered kinds in declaration order
    pub fn kinds(&self) -> Vec<ActionKind> {
        let mut kinds: Vec<ActionKind> = self.executors.keys().copied().collect();
        kinds.sort();
        kinds
    }
}

impl fmt::Debug for ExecutorRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExecutorRegistry")
            .field("kinds", &self.kinds())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct StaticExecutor(bool);

    #[async_trait]
    impl ActionExecutor for StaticExecutor {
        async fn execute(&self, _action: &ActionConfig) -> BackendResponse {
            if self.0 {
                BackendResponse::ok()
            } else {
                BackendResponse::failure("static failure")
            }
        }
    }

    #[test]
    fn test_registry_lookup() {
        let registry = ExecutorRegistry::new()
            .with(ActionKind::Mcp, Arc::new(StaticExecutor(true)))
            .with(ActionKind::Git, Arc::new(StaticExecutor(true)));

        assert!(registry.contains(ActionKind::Git));
        assert!(registry.get(ActionKind::GitHub).is_none());
        assert_eq!(registry.kinds(), vec![ActionKind::Git, ActionKind::Mcp]);
    }

    #[tokio::test]
    async fn test_register_replaces_existing() {
        let mut registry = ExecutorRegistry::new();
        assert!(registry
            .register(ActionKind::Agent, Arc::new(StaticExecutor(true)))
            .is_none());
        assert!(registry
            .register(ActionKind::Agent, Arc::new(StaticExecutor(false)))
            .is_some());

        let executor = registry.get(ActionKind::Agent).unwrap();
        let response = executor
            .execute(&ActionConfig::default_for(ActionKind::Agent))
            .await;
        assert!(!response.success);
    }
}
