//! Hook engine
//!
//! Wires the registry, trigger evaluator, dispatcher and status tracker together.
//! Every collaborator is passed in at construction; the engine holds no global state.
//!
//! ```ignore
//! let engine = HookEngine::new(
//!     Arc::new(InMemoryHookRegistry::from_hooks(ConfigLoader::load()?)),
//!     ExecutorRegistry::new().with(ActionKind::Git, git_backend),
//! );
//!
//! let event = OperationEvent::new(AgentType::SpecKit, OperationType::Specify, HookTiming::After)
//!     .with_variable("feature", "login");
//! let outcomes = engine.run_event(&event).await?;
//! ```

use std::sync::Arc;

use chrono::Utc;
use futures::future::join_all;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::dispatcher::{ActionDispatcher, ExecutorRegistry};
use crate::error::Result;
use crate::registry::HookRegistry;
use crate::status::ExecutionStatusTracker;
use crate::trigger::TriggerEvaluator;
use crate::types::{ExecutionOutcome, Hook, OperationEvent, VariableContext};

/// Outcome of [`HookEngine::process_event`]
#[derive(Debug)]
pub struct EventDispatch {
    /// Outcomes of the hooks the operation had to wait for
    pub blocking: Vec<ExecutionOutcome>,

    /// Hooks still running in the background
    pub background: Vec<JoinHandle<ExecutionOutcome>>,
}

impl EventDispatch {
    /// Whether every blocking hook completed, i.e. the operation may proceed
    pub fn blocking_succeeded(&self) -> bool {
        self.blocking.iter().all(ExecutionOutcome::is_success)
    }
}

/// Entry point for operation events
#[derive(Clone)]
pub struct HookEngine {
    registry: Arc<dyn HookRegistry>,
    dispatcher: ActionDispatcher,
}

impl HookEngine {
    /// Engine with a fresh status tracker and the built-in variable catalog
    pub fn new(registry: Arc<dyn HookRegistry>, executors: ExecutorRegistry) -> Self {
        Self::with_dispatcher(
            registry,
            ActionDispatcher::new(executors, ExecutionStatusTracker::new()),
        )
    }

    pub fn with_dispatcher(registry: Arc<dyn HookRegistry>, dispatcher: ActionDispatcher) -> Self {
        Self {
            registry,
            dispatcher,
        }
    }

    pub fn registry(&self) -> &Arc<dyn HookRegistry> {
        &self.registry
    }

    pub fn tracker(&self) -> &ExecutionStatusTracker {
        self.dispatcher.tracker()
    }

    pub fn dispatcher(&self) -> &ActionDispatcher {
        &self.dispatcher
    }

    /// Hooks `event` fires, oldest first
    pub fn matching_hooks(&self, event: &OperationEvent) -> Result<Vec<Hook>> {
        let hooks = self.registry.list_hooks()?;
        Ok(TriggerEvaluator::match_hooks(&hooks, event))
    }

    /// Dispatch every matching hook concurrently and wait for all of them
    ///
    /// Outcomes are returned in match order. A failing hook never affects its
    /// siblings. Only dispatches that reached a backend are counted in the
    /// registry.
    ///
    /// # Errors
    ///
    /// Only when the registry cannot list hooks.
    pub async fn run_event(&self, event: &OperationEvent) -> Result<Vec<ExecutionOutcome>> {
        let matched = self.matching_hooks(event)?;
        if matched.is_empty() {
            debug!(
                agent = %event.agent,
                operation = %event.operation,
                timing = %event.timing,
                "No hooks registered for event"
            );
            return Ok(Vec::new());
        }

        info!(
            agent = %event.agent,
            operation = %event.operation,
            timing = %event.timing,
            hook_count = matched.len(),
            "Found hooks for event"
        );

        let context = VariableContext::for_event(event);
        let outcomes = join_all(
            matched
                .iter()
                .map(|hook| run_hook(&self.dispatcher, &self.registry, hook, &context)),
        )
        .await;

        Ok(outcomes)
    }

    /// Dispatch matching hooks, waiting only for those that block the operation
    ///
    /// Hooks with `timing = before` and `waitForCompletion` are awaited; all others
    /// are spawned on the tokio runtime and returned as handles the caller may
    /// await or drop.
    pub async fn process_event(&self, event: &OperationEvent) -> Result<EventDispatch> {
        let matched = self.matching_hooks(event)?;
        let context = VariableContext::for_event(event);

        let (blocking, detached): (Vec<Hook>, Vec<Hook>) = matched
            .into_iter()
            .partition(|hook| hook.trigger.blocks_operation());

        let background = detached
            .into_iter()
            .map(|hook| {
                let dispatcher = self.dispatcher.clone();
                let registry = Arc::clone(&self.registry);
                let context = context.clone();
                tokio::spawn(async move { run_hook(&dispatcher, &registry, &hook, &context).await })
            })
            .collect();

        let blocking = join_all(
            blocking
                .iter()
                .map(|hook| run_hook(&self.dispatcher, &self.registry, hook, &context)),
        )
        .await;

        Ok(EventDispatch {
            blocking,
            background,
        })
    }
}

async fn run_hook(
    dispatcher: &ActionDispatcher,
    registry: &Arc<dyn HookRegistry>,
    hook: &Hook,
    context: &VariableContext,
) -> ExecutionOutcome {
    let outcome = dispatcher.dispatch(hook, context).await;

    if outcome.backend_invoked() {
        if let Err(e) = registry.record_execution(&hook.id, Utc::now()) {
            warn!(hook_id = %hook.id, error = %e, "Failed to record hook execution");
        }
    }

    outcome
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    use async_trait::async_trait;

    use super::*;
    use crate::action::{ActionConfig, ActionKind, AgentActionParams};
    use crate::dispatcher::ActionExecutor;
    use crate::registry::InMemoryHookRegistry;
    use crate::types::{
        AgentType, BackendResponse, ExecutionStatus, HookTiming, OperationType, TriggerCondition,
    };

    struct CountingExecutor {
        calls: AtomicUsize,
        delay: Duration,
    }

    #[async_trait]
    impl ActionExecutor for CountingExecutor {
        async fn execute(&self, _action: &ActionConfig) -> BackendResponse {
            tokio::time::sleep(self.delay).await;
            self.calls.fetch_add(1, Ordering::SeqCst);
            BackendResponse::ok()
        }
    }

    fn agent_hook(id: &str, timing: HookTiming, wait: bool) -> Hook {
        let mut trigger = TriggerCondition::new(AgentType::SpecKit, OperationType::Plan, timing);
        trigger.wait_for_completion = wait;
        let mut hook = Hook::new(
            format!("Hook {}", id),
            trigger,
            ActionConfig::Agent(AgentActionParams {
                command: "/speckit.clarify".to_string(),
            }),
        );
        hook.id = id.to_string();
        hook
    }

    fn engine(hooks: Vec<Hook>, delay: Duration) -> (HookEngine, Arc<CountingExecutor>) {
        let executor = Arc::new(CountingExecutor {
            calls: AtomicUsize::new(0),
            delay,
        });
        let engine = HookEngine::new(
            Arc::new(InMemoryHookRegistry::from_hooks(hooks)),
            ExecutorRegistry::new().with(ActionKind::Agent, executor.clone()),
        );
        (engine, executor)
    }

    #[tokio::test]
    async fn test_run_event_without_matches() {
        let (engine, executor) = engine(vec![], Duration::ZERO);
        let event = OperationEvent::new(AgentType::SpecKit, OperationType::Plan, HookTiming::After);

        assert!(engine.run_event(&event).await.unwrap().is_empty());
        assert_eq!(executor.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_run_event_records_executions() {
        let (engine, executor) = engine(
            vec![agent_hook("a", HookTiming::After, false)],
            Duration::ZERO,
        );
        let event = OperationEvent::new(AgentType::SpecKit, OperationType::Plan, HookTiming::After);

        let outcomes = engine.run_event(&event).await.unwrap();
        assert_eq!(outcomes.len(), 1);
        assert!(outcomes[0].is_success());
        assert_eq!(executor.calls.load(Ordering::SeqCst), 1);

        let hook = engine.registry().get_hook("a").unwrap();
        assert_eq!(hook.execution_count, 1);
        assert!(hook.last_executed_at.is_some());
    }

    #[tokio::test]
    async fn test_process_event_waits_only_for_blocking_hooks() {
        let (engine, executor) = engine(
            vec![
                agent_hook("blocking", HookTiming::Before, true),
                agent_hook("detached", HookTiming::Before, false),
            ],
            Duration::from_millis(20),
        );
        let event =
            OperationEvent::new(AgentType::SpecKit, OperationType::Plan, HookTiming::Before);

        let dispatch = engine.process_event(&event).await.unwrap();
        assert_eq!(dispatch.blocking.len(), 1);
        assert_eq!(dispatch.blocking[0].hook_id, "blocking");
        assert!(dispatch.blocking_succeeded());
        assert_eq!(dispatch.background.len(), 1);

        for handle in dispatch.background {
            let outcome = handle.await.unwrap();
            assert_eq!(outcome.hook_id, "detached");
        }
        assert_eq!(executor.calls.load(Ordering::SeqCst), 2);
        assert_eq!(
            engine.tracker().get("detached").await.map(|e| e.status),
            Some(ExecutionStatus::Completed)
        );
    }

    #[tokio::test]
    async fn test_wait_flag_ignored_for_after_hooks() {
        let (engine, _) = engine(
            vec![agent_hook("after", HookTiming::After, true)],
            Duration::ZERO,
        );
        let event = OperationEvent::new(AgentType::SpecKit, OperationType::Plan, HookTiming::After);

        let dispatch = engine.process_event(&event).await.unwrap();
        assert!(dispatch.blocking.is_empty());
        assert_eq!(dispatch.background.len(), 1);
    }

    #[tokio::test]
    async fn test_overlapping_dispatches_share_one_status_entry() {
        let (engine, executor) = engine(
            vec![agent_hook("shared", HookTiming::After, false)],
            Duration::from_millis(50),
        );
        let mut updates = engine.tracker().subscribe();
        let event = OperationEvent::new(AgentType::SpecKit, OperationType::Plan, HookTiming::After);

        let (first, second) = tokio::join!(engine.run_event(&event), engine.run_event(&event));
        assert!(first.unwrap()[0].is_success());
        assert!(second.unwrap()[0].is_success());
        assert_eq!(executor.calls.load(Ordering::SeqCst), 2);

        // Both runs were executing before either finished
        let mut statuses = Vec::new();
        while let Ok(entry) = updates.try_recv() {
            assert_eq!(entry.hook_id, "shared");
            statuses.push(entry.status);
        }
        assert_eq!(
            statuses,
            vec![
                ExecutionStatus::Executing,
                ExecutionStatus::Executing,
                ExecutionStatus::Completed,
                ExecutionStatus::Completed,
            ]
        );

        let entries = engine.tracker().all().await;
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].status, ExecutionStatus::Completed);
        assert_eq!(engine.registry().get_hook("shared").unwrap().execution_count, 2);
    }
}
