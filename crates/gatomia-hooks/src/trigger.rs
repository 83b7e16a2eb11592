//! Trigger evaluation
//!
//! Selects the hooks an operation event fires. Matching is exact equality on agent,
//! operation and timing; there are no wildcards.

use tracing::debug;

use crate::types::{AgentType, Hook, HookTiming, OperationEvent, OperationType};

/// The (agent, operation, timing) part of an event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TriggerKey {
    pub agent: AgentType,
    pub operation: OperationType,
    pub timing: HookTiming,
}

impl From<&OperationEvent> for TriggerKey {
    fn from(event: &OperationEvent) -> Self {
        Self {
            agent: event.agent,
            operation: event.operation,
            timing: event.timing,
        }
    }
}

pub struct TriggerEvaluator;

impl TriggerEvaluator {
    /// Whether `hook` fires for `key`
    pub fn matches(hook: &Hook, key: &TriggerKey) -> bool {
        hook.enabled
            && hook.trigger.agent == key.agent
            && hook.trigger.operation == key.operation
            && hook.trigger.timing == key.timing
    }

    /// Enabled hooks whose trigger equals the event, oldest first
    ///
    /// Hooks created at the same instant are ordered by id so the result does not
    /// depend on the order the storage returned them in.
    pub fn match_hooks(hooks: &[Hook], event: &OperationEvent) -> Vec<Hook> {
        let key = TriggerKey::from(event);
        let mut matched: Vec<Hook> = hooks
            .iter()
            .filter(|hook| Self::matches(hook, &key))
            .cloned()
            .collect();
        matched.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.id.cmp(&b.id)));

        debug!(
            agent = %key.agent,
            operation = %key.operation,
            timing = %key.timing,
            candidates = hooks.len(),
            matched = matched.len(),
            "Evaluated triggers"
        );

        matched
    }

    /// Matched hooks the caller must wait for before running the operation
    pub fn blocking(matched: &[Hook]) -> Vec<&Hook> {
        matched
            .iter()
            .filter(|hook| hook.trigger.blocks_operation())
            .collect()
    }
}
