//! Output formatting for hook commands

use crate::error::Result;
use crate::types::{ExecutionStatusEntry, Hook};

fn truncate(value: &str, width: usize) -> String {
    if value.chars().count() > width {
        let kept: String = value.chars().take(width.saturating_sub(3)).collect();
        format!("{}...", kept)
    } else {
        value.to_string()
    }
}

/// Format a single hook as a table
///
/// `hints` lists referenced variables the trigger operation does not provide.
pub fn format_hook_table(hook: &Hook, hints: &[String]) -> String {
    let status = if hook.enabled {
        "✓ Enabled"
    } else {
        "✗ Disabled"
    };

    let mut output = String::new();
    output.push_str(&format!("ID:          {}\n", hook.id));
    output.push_str(&format!("Name:        {}\n", hook.name));
    output.push_str(&format!("Agent:       {}\n", hook.trigger.agent));
    output.push_str(&format!("Trigger:     {}\n", hook.trigger.label()));
    if hook.trigger.blocks_operation() {
        output.push_str("Blocking:    yes\n");
    }
    output.push_str(&format!("Action:      {}\n", hook.action.kind()));
    for (field, template) in hook.action.template_fields() {
        output.push_str(&format!("  {}: {}\n", field, template));
    }
    output.push_str(&format!("Status:      {}\n", status));
    output.push_str(&format!("Executions:  {}\n", hook.execution_count));
    if let Some(at) = hook.last_executed_at {
        output.push_str(&format!("Last run:    {}\n", at.to_rfc3339()));
    }
    if !hints.is_empty() {
        output.push_str(&format!(
            "Note:        not provided by {}: {}\n",
            hook.trigger.operation,
            hints.join(", ")
        ));
    }

    output
}

/// Format multiple hooks as a table
pub fn format_hooks_table(hooks: &[Hook]) -> String {
    if hooks.is_empty() {
        return "No hooks found".to_string();
    }

    let mut output = String::new();
    output.push_str("ID                                   | Name                     | Trigger              | Status   | Action\n");
    output.push_str("-------------------------------------|--------------------------|----------------------|----------|-------\n");

    for hook in hooks {
        let status = if hook.enabled { "Enabled" } else { "Disabled" };
        output.push_str(&format!(
            "{:<36} | {:<24} | {:<20} | {:<8} | {}\n",
            truncate(&hook.id, 36),
            truncate(&hook.name, 24),
            truncate(&hook.trigger.label(), 20),
            status,
            hook.action.kind()
        ));
    }

    output
}

/// Format status entries as a table
pub fn format_status_table(entries: &[ExecutionStatusEntry]) -> String {
    if entries.is_empty() {
        return "No executions recorded".to_string();
    }

    let mut output = String::new();
    output.push_str("Hook                                 | Status    | Updated                   | Error\n");
    output.push_str("-------------------------------------|-----------|---------------------------|------\n");

    for entry in entries {
        output.push_str(&format!(
            "{:<36} | {:<9} | {:<25} | {}\n",
            truncate(&entry.hook_id, 36),
            entry.status.to_string(),
            entry.updated_at.to_rfc3339(),
            entry.error_message.as_deref().unwrap_or("")
        ));
    }

    output
}

pub fn format_hook_json(hook: &Hook) -> Result<String> {
    Ok(serde_json::to_string_pretty(hook)?)
}

pub fn format_hooks_json(hooks: &[Hook]) -> Result<String> {
    Ok(serde_json::to_string_pretty(hooks)?)
}

pub fn format_status_json(entries: &[ExecutionStatusEntry]) -> Result<String> {
    Ok(serde_json::to_string_pretty(entries)?)
}
