//! Single-hook dispatch

use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Instant;

use futures::FutureExt;
use tracing::{debug, error, info, warn};

use super::{ActionResolver, ExecutorRegistry};
use crate::error::HooksError;
use crate::status::ExecutionStatusTracker;
use crate::template::TemplateEngine;
use crate::types::{
    BackendResponse, ExecutionOutcome, ExecutionStatus, FailureKind, Hook, VariableContext,
};

/// Resolves, routes and executes hook actions, recording each step in the tracker
#[derive(Debug, Clone)]
pub struct ActionDispatcher {
    executors: Arc<ExecutorRegistry>,
    resolver: ActionResolver,
    tracker: ExecutionStatusTracker,
}

impl ActionDispatcher {
    pub fn new(executors: ExecutorRegistry, tracker: ExecutionStatusTracker) -> Self {
        Self::with_engine(executors, tracker, TemplateEngine::new())
    }

    pub fn with_engine(
        executors: ExecutorRegistry,
        tracker: ExecutionStatusTracker,
        engine: TemplateEngine,
    ) -> Self {
        Self {
            executors: Arc::new(executors),
            resolver: ActionResolver::new(engine),
            tracker,
        }
    }

    pub fn tracker(&self) -> &ExecutionStatusTracker {
        &self.tracker
    }

    pub fn executors(&self) -> &ExecutorRegistry {
        &self.executors
    }

    /// Run `hook`'s action with `context`
    ///
    /// The hook is `executing` in the tracker for the duration and `completed` or
    /// `failed` once the returned outcome is available. A missing required variable
    /// or a missing executor fails the dispatch without calling any backend.
    pub async fn dispatch(&self, hook: &Hook, context: &VariableContext) -> ExecutionOutcome {
        let start = Instant::now();
        let kind = hook.action.kind();

        self.tracker.mark_executing(&hook.id).await;
        debug!(
            hook_id = %hook.id,
            hook_name = %hook.name,
            action = %kind,
            trigger = %hook.trigger.label(),
            "Dispatching hook action"
        );

        let result = self.run(hook, context).await;
        let duration_ms = start.elapsed().as_millis() as u64;

        match result {
            Ok(response) => {
                self.tracker.mark_completed(&hook.id).await;
                info!(
                    hook_id = %hook.id,
                    action = %kind,
                    duration_ms = duration_ms,
                    "Hook action completed"
                );
                ExecutionOutcome {
                    hook_id: hook.id.clone(),
                    status: ExecutionStatus::Completed,
                    message: response.message,
                    error_message: None,
                    failure: None,
                    duration_ms,
                }
            }
            Err((failure, err)) => {
                let error_message = err.to_string();
                self.tracker.mark_failed(&hook.id, error_message.clone()).await;
                match failure {
                    FailureKind::Backend => error!(
                        hook_id = %hook.id,
                        action = %kind,
                        error = %error_message,
                        duration_ms = duration_ms,
                        "Hook action failed"
                    ),
                    _ => warn!(
                        hook_id = %hook.id,
                        action = %kind,
                        error = %error_message,
                        "Hook action not executed"
                    ),
                }
                ExecutionOutcome {
                    hook_id: hook.id.clone(),
                    status: ExecutionStatus::Failed,
                    message: None,
                    error_message: Some(error_message),
                    failure: Some(failure),
                    duration_ms,
                }
            }
        }
    }

    async fn run(
        &self,
        hook: &Hook,
        context: &VariableContext,
    ) -> Result<BackendResponse, (FailureKind, HooksError)> {
        let resolved = self.resolver.resolve(&hook.action, context).map_err(|e| {
            let failure = match e {
                HooksError::MissingVariable(_) => FailureKind::MissingVariable,
                _ => FailureKind::Configuration,
            };
            (failure, e)
        })?;

        let kind = resolved.kind();
        let executor = self.executors.get(kind).ok_or_else(|| {
            (
                FailureKind::Configuration,
                HooksError::Configuration(format!("No executor registered for action type '{}'", kind)),
            )
        })?;

        let response = AssertUnwindSafe(executor.execute(&resolved))
            .catch_unwind()
            .await
            .map_err(|_| {
                (
                    FailureKind::Backend,
                    HooksError::Backend(format!("{} executor panicked", kind)),
                )
            })?;

        if response.success {
            Ok(response)
        } else {
            let message = response
                .message
                .unwrap_or_else(|| format!("{} executor reported failure", kind));
            Err((FailureKind::Backend, HooksError::Backend(message)))
        }
    }
}
