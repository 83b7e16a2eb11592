//! CLI commands for hook management
//!
//! Listing, inspecting, enabling, disabling and deleting hooks, plus a view of the
//! execution status tracker.

pub mod commands;
pub mod formatter;

pub use commands::{
    delete_hook, disable_hook, enable_hook, hook_status, inspect_hook, list_hooks,
    list_hooks_json, HookCommand, OutputFormat,
};
pub use formatter::{
    format_hook_json, format_hook_table, format_hooks_json, format_hooks_table,
    format_status_json, format_status_table,
};

use std::sync::Arc;

use crate::{
    config::HookValidator, error::Result, registry::HookRegistry, status::ExecutionStatusTracker,
};

/// Hook management CLI interface
pub struct HookCli {
    registry: Arc<dyn HookRegistry>,
    tracker: ExecutionStatusTracker,
    validator: HookValidator,
}

impl HookCli {
    pub fn new(registry: Arc<dyn HookRegistry>, tracker: ExecutionStatusTracker) -> Self {
        Self {
            registry,
            tracker,
            validator: HookValidator::default(),
        }
    }

    /// Execute a hook command, returning the text to print
    pub async fn execute(&self, command: HookCommand) -> Result<String> {
        match command {
            HookCommand::List { format } => {
                let hooks = self.registry.list_hooks()?;
                match format {
                    OutputFormat::Json => format_hooks_json(&hooks),
                    OutputFormat::Table => Ok(format_hooks_table(&hooks)),
                }
            }
            HookCommand::Inspect { id, format } => {
                let hook = self.registry.get_hook(&id)?;
                match format {
                    OutputFormat::Json => format_hook_json(&hook),
                    OutputFormat::Table => {
                        let hints = self.validator.scope_hints(&hook);
                        Ok(format_hook_table(&hook, &hints))
                    }
                }
            }
            HookCommand::Enable { id } => {
                self.registry.enable_hook(&id)?;
                Ok(format!("Hook '{}' enabled", id))
            }
            HookCommand::Disable { id } => {
                self.registry.disable_hook(&id)?;
                Ok(format!("Hook '{}' disabled", id))
            }
            HookCommand::Delete { id } => {
                self.registry.unregister_hook(&id)?;
                self.tracker.clear(&id).await;
                Ok(format!("Hook '{}' deleted", id))
            }
            HookCommand::Status { id, format } => {
                let entries = match id {
                    Some(id) => {
                        self.registry.get_hook(&id)?;
                        self.tracker.get(&id).await.into_iter().collect()
                    }
                    None => self.tracker.all().await,
                };
                match format {
                    OutputFormat::Json => format_status_json(&entries),
                    OutputFormat::Table => Ok(format_status_table(&entries)),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        action::{ActionConfig, AgentActionParams},
        error::HooksError,
        registry::InMemoryHookRegistry,
        types::{AgentType, Hook, HookTiming, OperationType, TriggerCondition},
    };

    fn create_test_hook(id: &str, name: &str) -> Hook {
        let mut hook = Hook::new(
            name,
            TriggerCondition::new(AgentType::OpenSpec, OperationType::Tasks, HookTiming::After),
            ActionConfig::Agent(AgentActionParams {
                command: "/openspec.apply".to_string(),
            }),
        );
        hook.id = id.to_string();
        hook
    }

    fn cli_with(hooks: Vec<Hook>) -> HookCli {
        HookCli::new(
            Arc::new(InMemoryHookRegistry::from_hooks(hooks)),
            ExecutionStatusTracker::new(),
        )
    }

    #[tokio::test]
    async fn test_list_hooks() {
        let cli = cli_with(vec![
            create_test_hook("hook1", "Hook 1"),
            create_test_hook("hook2", "Hook 2"),
        ]);
        let result = cli.execute(list_hooks()).await.unwrap();

        assert!(result.contains("Hook 1"));
        assert!(result.contains("Hook 2"));
    }

    #[tokio::test]
    async fn test_inspect_hook() {
        let cli = cli_with(vec![create_test_hook("hook1", "Hook 1")]);
        let result = cli.execute(inspect_hook("hook1")).await.unwrap();
        assert!(result.contains("Hook 1"));
        assert!(result.contains("/openspec.apply"));
    }

    #[tokio::test]
    async fn test_enable_disable_delete() {
        let cli = cli_with(vec![create_test_hook("hook1", "Hook 1")]);

        let result = cli.execute(disable_hook("hook1")).await.unwrap();
        assert!(result.contains("disabled"));
        assert!(!cli.registry.get_hook("hook1").unwrap().enabled);

        let result = cli.execute(enable_hook("hook1")).await.unwrap();
        assert!(result.contains("enabled"));

        let result = cli.execute(delete_hook("hook1")).await.unwrap();
        assert!(result.contains("deleted"));
        assert!(cli.registry.get_hook("hook1").is_err());
    }

    #[tokio::test]
    async fn test_unknown_hook_errors() {
        let cli = cli_with(vec![]);
        let result = cli.execute(enable_hook("ghost")).await;
        assert!(matches!(result, Err(HooksError::HookNotFound(_))));
        let result = cli.execute(hook_status(Some("ghost".to_string()))).await;
        assert!(matches!(result, Err(HooksError::HookNotFound(_))));
    }

    #[tokio::test]
    async fn test_status_reports_tracker_entries() {
        let cli = cli_with(vec![create_test_hook("hook1", "Hook 1")]);
        cli.tracker.mark_failed("hook1", "Backend error: offline").await;

        let result = cli.execute(hook_status(None)).await.unwrap();
        assert!(result.contains("hook1"));
        assert!(result.contains("failed"));

        let json = cli
            .execute(HookCommand::Status {
                id: Some("hook1".to_string()),
                format: OutputFormat::Json,
            })
            .await
            .unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value[0]["status"], "failed");
        assert_eq!(value[0]["errorMessage"], "Backend error: offline");
    }
}
