//! Hook validation
//!
//! Checks run before a hook is persisted or loaded. A hook that fails here never
//! reaches the dispatcher.

use tracing::debug;

use crate::action::{
    AcpActionParams, ActionConfig, AgentActionParams, CustomActionParams, GitActionParams,
    GitHubActionParams, GitHubOperation, GitOperation, McpActionParams,
};
use crate::error::{HooksError, Result};
use crate::template::TemplateEngine;
use crate::types::Hook;

pub const MAX_NAME_LENGTH: usize = 100;
pub const MAX_COMMAND_LENGTH: usize = 200;
pub const MAX_COMMIT_MESSAGE_LENGTH: usize = 500;
pub const MAX_PROMPT_LENGTH: usize = 1000;

/// Workflow command prefixes an agent action may use
pub const COMMAND_PREFIXES: [&str; 2] = ["/speckit.", "/openspec."];

/// Form-level validator for hooks
#[derive(Debug, Clone, Default)]
pub struct HookValidator {
    engine: TemplateEngine,
}

impl HookValidator {
    pub fn new(engine: TemplateEngine) -> Self {
        Self { engine }
    }

    /// Validate a hook, returning the first problem found
    ///
    /// # Errors
    ///
    /// [`HooksError::Validation`] for a missing or oversized field and
    /// [`HooksError::Syntax`] for a malformed template.
    pub fn validate_hook(&self, hook: &Hook) -> Result<()> {
        if hook.id.trim().is_empty() {
            return Err(invalid("Hook ID cannot be empty"));
        }

        let name = hook.name.trim();
        if name.is_empty() {
            return Err(invalid("Hook name cannot be empty"));
        }
        if name.chars().count() > MAX_NAME_LENGTH {
            return Err(invalid(format!(
                "Hook name must be at most {} characters",
                MAX_NAME_LENGTH
            )));
        }

        if hook.modified_at < hook.created_at {
            return Err(invalid("Hook modifiedAt cannot be earlier than createdAt"));
        }

        self.validate_action(&hook.action)
    }

    /// Validate an action's parameters and every template it carries
    pub fn validate_action(&self, action: &ActionConfig) -> Result<()> {
        match action {
            ActionConfig::Agent(params) => validate_agent(params)?,
            ActionConfig::Git(params) => validate_git(params)?,
            ActionConfig::GitHub(params) => validate_github(params)?,
            ActionConfig::Custom(params) => validate_custom(params)?,
            ActionConfig::Mcp(params) => validate_mcp(params)?,
            ActionConfig::Acp(params) => validate_acp(params)?,
        }

        for (field, template) in action.template_fields() {
            self.engine.validate_syntax(&template).map_err(|e| {
                debug!(field = field, error = %e, "Template field has invalid syntax");
                HooksError::Syntax(e)
            })?;
        }

        Ok(())
    }

    /// Referenced variables the hook's trigger operation does not provide
    ///
    /// These are informational only; they never make a hook invalid.
    pub fn scope_hints(&self, hook: &Hook) -> Vec<String> {
        let mut hints: Vec<String> = Vec::new();
        for (_, template) in hook.action.template_fields() {
            for name in self.engine.scope_hints(&template, hook.trigger.operation) {
                if !hints.contains(&name) {
                    hints.push(name);
                }
            }
        }
        hints
    }
}

fn invalid(message: impl Into<String>) -> HooksError {
    HooksError::Validation(message.into())
}

fn is_blank(value: Option<&str>) -> bool {
    value.map(|v| v.trim().is_empty()).unwrap_or(true)
}

fn validate_agent(params: &AgentActionParams) -> Result<()> {
    let command = params.command.trim();
    if command.is_empty() {
        return Err(invalid("Agent action: command cannot be empty"));
    }
    if command.chars().count() > MAX_COMMAND_LENGTH {
        return Err(invalid(format!(
            "Agent action: command must be at most {} characters",
            MAX_COMMAND_LENGTH
        )));
    }
    if !COMMAND_PREFIXES.iter().any(|p| command.starts_with(p)) {
        return Err(invalid(format!(
            "Agent action: command must start with one of {}",
            COMMAND_PREFIXES.join(", ")
        )));
    }
    Ok(())
}

fn validate_git(params: &GitActionParams) -> Result<()> {
    if params.operation == GitOperation::Commit {
        let message = params.message_template.as_deref().unwrap_or_default();
        if message.trim().is_empty() {
            return Err(invalid("Git action: commit message is required"));
        }
        if message.chars().count() > MAX_COMMIT_MESSAGE_LENGTH {
            return Err(invalid(format!(
                "Git action: commit message must be at most {} characters",
                MAX_COMMIT_MESSAGE_LENGTH
            )));
        }
    }
    if params.operation.needs_branch() && is_blank(params.branch_name.as_deref()) {
        return Err(invalid("Git action: branch name is required"));
    }
    if params.operation == GitOperation::Tag && is_blank(params.tag_name.as_deref()) {
        return Err(invalid("Git action: tag name is required"));
    }
    Ok(())
}

fn validate_github(params: &GitHubActionParams) -> Result<()> {
    let op = params.operation;
    if op.needs_issue_number() && params.issue_number.is_none() {
        return Err(invalid("GitHub action: issue number is required"));
    }
    if op.needs_pr_number() && params.pr_number.is_none() {
        return Err(invalid("GitHub action: pull request number is required"));
    }
    if op.needs_title() && is_blank(params.title_template.as_deref()) {
        return Err(invalid("GitHub action: title is required"));
    }
    if op == GitHubOperation::AddComment && is_blank(params.body_template.as_deref()) {
        return Err(invalid("GitHub action: comment body is required"));
    }
    if op.needs_labels() && params.labels.is_empty() {
        return Err(invalid("GitHub action: at least one label is required"));
    }
    if op == GitHubOperation::AssignIssue && params.assignees.is_empty() {
        return Err(invalid("GitHub action: at least one assignee is required"));
    }
    if op == GitHubOperation::RequestReview && params.reviewers.is_empty() {
        return Err(invalid("GitHub action: at least one reviewer is required"));
    }
    if op == GitHubOperation::CreateRelease && is_blank(params.tag_name.as_deref()) {
        return Err(invalid("GitHub action: release tag is required"));
    }
    Ok(())
}

fn validate_custom(params: &CustomActionParams) -> Result<()> {
    if params.agent_ref().is_none() {
        return Err(invalid("Custom action: agent id or name is required"));
    }
    Ok(())
}

fn validate_mcp(params: &McpActionParams) -> Result<()> {
    let prompt = params.prompt.trim();
    if prompt.is_empty() {
        return Err(invalid("MCP action: prompt cannot be empty"));
    }
    if prompt.chars().count() > MAX_PROMPT_LENGTH {
        return Err(invalid(format!(
            "MCP action: prompt must be at most {} characters",
            MAX_PROMPT_LENGTH
        )));
    }
    if params.effective_tools().is_empty() {
        return Err(invalid("MCP action: at least one tool must be selected"));
    }
    Ok(())
}

fn validate_acp(params: &AcpActionParams) -> Result<()> {
    if params.agent_command.trim().is_empty() {
        return Err(invalid("ACP action: agent command cannot be empty"));
    }
    if params.task_instruction.trim().is_empty() {
        return Err(invalid("ACP action: task instruction cannot be empty"));
    }
    Ok(())
}
