//! GatomIA Hooks
//!
//! Trigger → action automation for spec-driven workflow operations.
//!
//! # Overview
//!
//! A hook listens for one workflow operation (for example "after speckit specify")
//! and, when it fires, performs an action: a workflow agent command, a git or GitHub
//! operation, a custom agent, a tool-catalog prompt or an ACP agent task. Action
//! parameters may reference per-firing values with `{name}` templates.
//!
//! # Architecture
//!
//! 1. **Template engine** (`template`): syntax validation, variable catalog and scope,
//!    resolution
//! 2. **Trigger evaluator** (`trigger`): selects the enabled hooks an event fires
//! 3. **Action dispatcher** (`dispatcher`): resolves templates and routes each action
//!    to the backend executor registered for its kind
//! 4. **Status tracker** (`status`): in-memory per-hook execution state
//! 5. **Tool grouping** (`tools`): provider/tool view for tool selection
//! 6. **Registry** (`registry`) and **configuration** (`config`): hook storage,
//!    YAML loading, validation
//! 7. **Engine** (`engine`): wires the above together
//!
//! # Quick Start
//!
//! ```ignore
//! use std::sync::Arc;
//! use gatomia_hooks::{
//!     ActionKind, AgentType, ExecutorRegistry, HookEngine, HookTiming, InMemoryHookRegistry,
//!     OperationEvent, OperationType,
//! };
//!
//! let registry = Arc::new(InMemoryHookRegistry::from_hooks(ConfigLoader::load()?));
//! let engine = HookEngine::new(
//!     registry,
//!     ExecutorRegistry::new().with(ActionKind::Git, Arc::new(MyGitBackend)),
//! );
//!
//! let event = OperationEvent::new(AgentType::SpecKit, OperationType::Specify, HookTiming::After)
//!     .with_variable("feature", "login");
//! for outcome in engine.run_event(&event).await? {
//!     println!("{}: {}", outcome.hook_id, outcome.status);
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! # Configuration
//!
//! Hooks live in `.gatomia/hooks.yaml` (project) and `~/.gatomia/hooks.yaml` (user):
//!
//! ```yaml
//! hooks:
//!   - id: commit-spec
//!     name: Commit spec
//!     enabled: true
//!     trigger: { agent: speckit, operation: specify, timing: after }
//!     action:
//!       type: git
//!       parameters:
//!         operation: commit
//!         messageTemplate: "feat({feature})"
//!     createdAt: 2025-01-01T00:00:00Z
//!     modifiedAt: 2025-01-01T00:00:00Z
//! ```

pub mod action;
pub mod cli;
pub mod config;
pub mod dispatcher;
pub mod engine;
pub mod error;
pub mod registry;
pub mod status;
pub mod template;
pub mod tools;
pub mod trigger;
pub mod types;

pub use action::{
    AcpActionParams, AcpMode, ActionConfig, ActionKind, AgentActionParams, CliOptionValue,
    CustomActionParams, CustomAgentType, GitActionParams, GitHubActionParams, GitHubOperation,
    GitOperation, McpActionParams, MergeMethod, SelectedTool,
};
pub use cli::{HookCli, HookCommand, OutputFormat};
pub use config::{ConfigLoader, HookValidator};
pub use dispatcher::{ActionDispatcher, ActionExecutor, ActionResolver, ExecutorRegistry};
pub use engine::{EventDispatch, HookEngine};
pub use error::{HooksError, Result, SyntaxErrorKind, TemplateSyntaxError};
pub use registry::{HookRegistry, InMemoryHookRegistry};
pub use status::ExecutionStatusTracker;
pub use template::{TemplateCatalog, TemplateEngine, TemplateVariable};
pub use tools::{group_tools_by_provider, Provider, ProviderGroup, ProviderTool, ToolOption};
pub use trigger::TriggerEvaluator;
pub use types::{
    AgentType, BackendResponse, ExecutionOutcome, ExecutionStatus, ExecutionStatusEntry,
    FailureKind, Hook, HookTiming, OperationEvent, OperationType, TriggerCondition,
    VariableContext,
};
