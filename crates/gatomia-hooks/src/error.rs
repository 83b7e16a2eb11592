//! Error types for the hooks engine
//!
//! The taxonomy follows where an error can surface:
//!
//! 1. **Edit time**: [`HooksError::Syntax`] and [`HooksError::Validation`] are raised
//!    while a hook is being saved. They block persistence and never reach the dispatcher.
//!
//! 2. **Dispatch time**: [`HooksError::MissingVariable`], [`HooksError::Configuration`]
//!    and [`HooksError::Backend`] are recovered by the dispatcher into a `failed`
//!    execution status. They never cross the dispatch boundary and never abort
//!    sibling hooks fired by the same event.
//!
//! 3. **Storage**: [`HooksError::HookNotFound`], [`HooksError::StorageError`] and the
//!    wrapped serde/IO errors come from the registry and the configuration loader.
//!
//! # Examples
//!
//! ```ignore
//! match resolver.resolve(&template, &context) {
//!     Ok(text) => println!("{}", text),
//!     Err(HooksError::MissingVariable(name)) => eprintln!("set '{}' first", name),
//!     Err(e) => eprintln!("Error: {}", e),
//! }
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur in the hooks engine
#[derive(Debug, Error)]
pub enum HooksError {
    /// Malformed template (unbalanced braces, empty or invalid variable name)
    #[error("Template syntax error: {0}")]
    Syntax(TemplateSyntaxError),

    /// A required template variable was absent from the variable context
    ///
    /// The string is the variable name, without braces.
    #[error("Missing required template variable: {0}")]
    MissingVariable(String),

    /// Form-level validation failure (e.g. a commit action without a message)
    #[error("Validation error: {0}")]
    Validation(String),

    /// Failure reported by a backend executor
    ///
    /// Not retried by the engine. The hook stays enabled and runs again on the
    /// next matching event.
    #[error("Backend error: {0}")]
    Backend(String),

    /// Action type and parameter shape disagree, or no executor is registered
    /// for the action type
    #[error("Invalid hook configuration: {0}")]
    Configuration(String),

    /// Hook not found in the registry
    #[error("Hook not found: {0}")]
    HookNotFound(String),

    /// Storage or registry error
    ///
    /// Common causes:
    /// - Lock poisoning
    /// - Unreadable configuration file
    #[error("Storage error: {0}")]
    StorageError(String),

    /// YAML (de)serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_yaml::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<TemplateSyntaxError> for HooksError {
    fn from(error: TemplateSyntaxError) -> Self {
        HooksError::Syntax(error)
    }
}

/// Kind of template syntax error
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SyntaxErrorKind {
    /// `{` without a matching `}`
    UnclosedDelimiter,

    /// `}` without a preceding `{`
    UnexpectedClosingDelimiter,

    /// `{` opened inside another reference
    NestedDelimiter,

    /// `{}` with nothing between the braces
    EmptyVariable,

    /// Name does not match `[A-Za-z_][A-Za-z0-9_]*`
    InvalidVariableName(String),
}

impl SyntaxErrorKind {
    /// Stable machine-readable code, used by form layers to pick a message
    pub fn code(&self) -> &'static str {
        match self {
            SyntaxErrorKind::UnclosedDelimiter => "UNCLOSED_VARIABLE",
            SyntaxErrorKind::UnexpectedClosingDelimiter => "UNEXPECTED_CLOSING_BRACE",
            SyntaxErrorKind::NestedDelimiter => "NESTED_VARIABLE",
            SyntaxErrorKind::EmptyVariable => "EMPTY_VARIABLE",
            SyntaxErrorKind::InvalidVariableName(_) => "INVALID_VARIABLE_NAME",
        }
    }
}

/// A syntax error located in a template string
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateSyntaxError {
    /// What went wrong
    pub kind: SyntaxErrorKind,

    /// Byte offset of the offending delimiter
    pub position: usize,
}

impl TemplateSyntaxError {
    pub fn new(kind: SyntaxErrorKind, position: usize) -> Self {
        Self { kind, position }
    }

    pub fn code(&self) -> &'static str {
        self.kind.code()
    }
}

impl fmt::Display for TemplateSyntaxError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            SyntaxErrorKind::UnclosedDelimiter => {
                write!(f, "unclosed '{{' at position {}", self.position)
            }
            SyntaxErrorKind::UnexpectedClosingDelimiter => {
                write!(f, "unexpected '}}' at position {}", self.position)
            }
            SyntaxErrorKind::NestedDelimiter => {
                write!(f, "nested '{{' at position {}", self.position)
            }
            SyntaxErrorKind::EmptyVariable => {
                write!(f, "empty variable name at position {}", self.position)
            }
            SyntaxErrorKind::InvalidVariableName(name) => write!(
                f,
                "invalid variable name '{}' at position {}",
                name, self.position
            ),
        }
    }
}

impl std::error::Error for TemplateSyntaxError {}

/// Result type for hooks operations
pub type Result<T> = std::result::Result<T, HooksError>;
