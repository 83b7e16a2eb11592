//! Core data types for the hooks engine
//!
//! Hooks, their trigger conditions, the operation events that fire them, and the
//! records produced when an action is dispatched. The action payloads themselves
//! live in [`crate::action`].
//!
//! # Examples
//!
//! ```ignore
//! use gatomia_hooks::*;
//!
//! let hook = Hook::new(
//!     "Commit after specify",
//!     TriggerCondition::new(AgentType::SpecKit, OperationType::Specify, HookTiming::After),
//!     ActionConfig::Git(GitActionParams {
//!         operation: GitOperation::Commit,
//!         message_template: Some("feat({feature})".to_string()),
//!         ..Default::default()
//!     }),
//! );
//! ```

use std::collections::HashMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::action::ActionConfig;

/// A persisted trigger → action automation rule
///
/// Owned by the storage collaborator ([`crate::registry::HookRegistry`]). The engine
/// only reads hooks and reports `execution_count` / `last_executed_at` updates back.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Hook {
    /// Opaque unique identifier
    pub id: String,

    /// Human-readable name (required, at most 100 characters)
    pub name: String,

    /// Whether the hook is evaluated at all
    pub enabled: bool,

    /// Operation the hook listens for
    pub trigger: TriggerCondition,

    /// Action performed when the trigger fires
    pub action: ActionConfig,

    pub created_at: DateTime<Utc>,

    /// Never earlier than `created_at`
    pub modified_at: DateTime<Utc>,

    /// Monotonic count of dispatches that reached a backend
    #[serde(default)]
    pub execution_count: u64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_executed_at: Option<DateTime<Utc>>,
}

impl Hook {
    /// Create an enabled hook with a fresh id and timestamps
    pub fn new(name: impl Into<String>, trigger: TriggerCondition, action: ActionConfig) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            name: name.into(),
            enabled: true,
            trigger,
            action,
            created_at: now,
            modified_at: now,
            execution_count: 0,
            last_executed_at: None,
        }
    }

    /// Bump `modified_at` after an edit
    pub fn touch(&mut self) {
        self.modified_at = Utc::now().max(self.created_at);
    }

    /// Record a dispatch that reached a backend
    pub fn record_execution(&mut self, at: DateTime<Utc>) {
        self.execution_count = self.execution_count.saturating_add(1);
        self.last_executed_at = Some(at);
    }
}

/// Workflow system that emits operation events
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AgentType {
    #[serde(rename = "speckit")]
    SpecKit,
    #[serde(rename = "openspec")]
    OpenSpec,
}

impl AgentType {
    pub fn as_str(&self) -> &'static str {
        match self {
            AgentType::SpecKit => "speckit",
            AgentType::OpenSpec => "openspec",
        }
    }
}

impl fmt::Display for AgentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Workflow operation a hook can listen for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OperationType {
    Research,
    Datamodel,
    Design,
    Specify,
    Clarify,
    Plan,
    Tasks,
    Analyze,
    Checklist,
    Constitution,
    Implement,
    #[serde(rename = "taskstoissues")]
    TasksToIssues,
}

impl OperationType {
    pub const ALL: [OperationType; 12] = [
        OperationType::Research,
        OperationType::Datamodel,
        OperationType::Design,
        OperationType::Specify,
        OperationType::Clarify,
        OperationType::Plan,
        OperationType::Tasks,
        OperationType::Analyze,
        OperationType::Checklist,
        OperationType::Constitution,
        OperationType::Implement,
        OperationType::TasksToIssues,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            OperationType::Research => "research",
            OperationType::Datamodel => "datamodel",
            OperationType::Design => "design",
            OperationType::Specify => "specify",
            OperationType::Clarify => "clarify",
            OperationType::Plan => "plan",
            OperationType::Tasks => "tasks",
            OperationType::Analyze => "analyze",
            OperationType::Checklist => "checklist",
            OperationType::Constitution => "constitution",
            OperationType::Implement => "implement",
            OperationType::TasksToIssues => "taskstoissues",
        }
    }
}

impl fmt::Display for OperationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Whether a hook runs before or after its operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HookTiming {
    Before,
    After,
}

impl HookTiming {
    pub fn as_str(&self) -> &'static str {
        match self {
            HookTiming::Before => "before",
            HookTiming::After => "after",
        }
    }
}

impl fmt::Display for HookTiming {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The (agent, operation, timing) tuple a hook listens for
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TriggerCondition {
    pub agent: AgentType,
    pub operation: OperationType,
    pub timing: HookTiming,

    /// Only meaningful for `before` hooks; an `after` operation has already finished
    #[serde(default)]
    pub wait_for_completion: bool,
}

impl TriggerCondition {
    pub fn new(agent: AgentType, operation: OperationType, timing: HookTiming) -> Self {
        Self {
            agent,
            operation,
            timing,
            wait_for_completion: false,
        }
    }

    /// Whether the caller should hold the operation until this hook's dispatch ends
    pub fn blocks_operation(&self) -> bool {
        self.timing == HookTiming::Before && self.wait_for_completion
    }

    /// Trigger label used for the `triggerType` variable, e.g. `after-specify`
    pub fn label(&self) -> String {
        format!("{}-{}", self.timing, self.operation)
    }
}

/// An operation event produced by the workflow layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OperationEvent {
    pub agent: AgentType,
    pub operation: OperationType,
    pub timing: HookTiming,

    /// Values for template variables
    #[serde(default)]
    pub variables: HashMap<String, String>,
}

impl OperationEvent {
    pub fn new(agent: AgentType, operation: OperationType, timing: HookTiming) -> Self {
        Self {
            agent,
            operation,
            timing,
            variables: HashMap::new(),
        }
    }

    pub fn with_variable(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.variables.insert(name.into(), value.into());
        self
    }
}

/// Named values available to template resolution for one firing
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariableContext {
    values: HashMap<String, String>,
}

impl VariableContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the context for an event
    ///
    /// Seeds `timestamp`, `triggerType` and `agentType` when the event does not
    /// supply them. Event-supplied values always win.
    pub fn for_event(event: &OperationEvent) -> Self {
        let mut values = event.variables.clone();
        values
            .entry("timestamp".to_string())
            .or_insert_with(|| Utc::now().to_rfc3339());
        values
            .entry("triggerType".to_string())
            .or_insert_with(|| format!("{}-{}", event.timing, event.operation));
        values
            .entry("agentType".to_string())
            .or_insert_with(|| event.agent.to_string());
        Self { values }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(String::as_str)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.values.insert(name.into(), value.into());
    }

    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(name, value);
        self
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl From<HashMap<String, String>> for VariableContext {
    fn from(values: HashMap<String, String>) -> Self {
        Self { values }
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for VariableContext {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            values: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

/// Lifecycle state of a hook's most recent dispatch
///
/// `idle` is represented by the absence of an entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExecutionStatus {
    Executing,
    Completed,
    Failed,
}

impl fmt::Display for ExecutionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ExecutionStatus::Executing => "executing",
            ExecutionStatus::Completed => "completed",
            ExecutionStatus::Failed => "failed",
        };
        f.write_str(label)
    }
}

/// Transient record of a hook's most recent dispatch
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecutionStatusEntry {
    pub hook_id: String,
    pub status: ExecutionStatus,
    pub updated_at: DateTime<Utc>,

    /// Present only when `status` is `failed`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
}

/// What a backend executor reports back
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackendResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl BackendResponse {
    pub fn ok() -> Self {
        Self {
            success: true,
            message: None,
        }
    }

    pub fn ok_with(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: Some(message.into()),
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: Some(message.into()),
        }
    }
}

/// Why a dispatch failed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// A required template variable was not supplied; no backend was called
    MissingVariable,

    /// No executor for the action type, or the action could not be prepared
    Configuration,

    /// The backend executor reported failure
    Backend,
}

/// Result of dispatching one hook's action
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecutionOutcome {
    pub hook_id: String,

    /// Either `completed` or `failed`
    pub status: ExecutionStatus,

    /// Message from the backend, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub failure: Option<FailureKind>,

    pub duration_ms: u64,
}

impl ExecutionOutcome {
    pub fn is_success(&self) -> bool {
        self.status == ExecutionStatus::Completed
    }

    /// Whether the dispatch got as far as calling a backend
    pub fn backend_invoked(&self) -> bool {
        matches!(self.failure, None | Some(FailureKind::Backend))
    }
}
