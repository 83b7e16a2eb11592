//! Hook management commands

use std::fmt;
use std::str::FromStr;

use crate::error::HooksError;

/// Rendering for command output
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
}

impl FromStr for OutputFormat {
    type Err = HooksError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "table" => Ok(OutputFormat::Table),
            "json" => Ok(OutputFormat::Json),
            other => Err(HooksError::Validation(format!(
                "Unknown output format '{}', expected table or json",
                other
            ))),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputFormat::Table => f.write_str("table"),
            OutputFormat::Json => f.write_str("json"),
        }
    }
}

/// Hook management commands
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HookCommand {
    /// List all hooks
    List { format: OutputFormat },

    /// Show one hook, with scope hints for its templates
    Inspect { id: String, format: OutputFormat },

    Enable { id: String },

    Disable { id: String },

    Delete { id: String },

    /// Execution status of one hook, or of every hook seen since start-up
    Status {
        id: Option<String>,
        format: OutputFormat,
    },
}

pub fn list_hooks() -> HookCommand {
    HookCommand::List {
        format: OutputFormat::Table,
    }
}

pub fn list_hooks_json() -> HookCommand {
    HookCommand::List {
        format: OutputFormat::Json,
    }
}

pub fn inspect_hook(id: impl Into<String>) -> HookCommand {
    HookCommand::Inspect {
        id: id.into(),
        format: OutputFormat::Table,
    }
}

pub fn enable_hook(id: impl Into<String>) -> HookCommand {
    HookCommand::Enable { id: id.into() }
}

pub fn disable_hook(id: impl Into<String>) -> HookCommand {
    HookCommand::Disable { id: id.into() }
}

pub fn delete_hook(id: impl Into<String>) -> HookCommand {
    HookCommand::Delete { id: id.into() }
}

pub fn hook_status(id: Option<String>) -> HookCommand {
    HookCommand::Status {
        id,
        format: OutputFormat::Table,
    }
}
