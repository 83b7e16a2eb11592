//! Template variable engine
//!
//! Action parameters may reference per-firing values with `{name}`:
//!
//! ```ignore
//! use gatomia_hooks::template::TemplateEngine;
//! use gatomia_hooks::VariableContext;
//!
//! let engine = TemplateEngine::new();
//! let context = VariableContext::new().with("feature", "login");
//! assert_eq!(engine.resolve("feat({feature})", &context)?, "feat(login)");
//! ```
//!
//! Scope is decided by the firing operation: standard variables are always legal,
//! spec and output variables only for the operations that produce them. Using an
//! out-of-scope variable is only a hint at edit time ([`TemplateEngine::scope_hints`]);
//! at resolution time what matters is whether a *required* variable has a value.

pub mod catalog;
pub mod parser;
pub mod resolver;

pub use catalog::{TemplateCatalog, TemplateVariable, VariableCategory, VariableValueType};
pub use parser::{extract_variables, syntax_errors, validate_syntax, Segment};

use crate::error::{Result, TemplateSyntaxError};
use crate::types::{OperationType, VariableContext};

/// Template validation and resolution over a variable catalog
#[derive(Debug, Clone, Default)]
pub struct TemplateEngine {
    catalog: TemplateCatalog,
}

impl TemplateEngine {
    /// Engine over the built-in catalog
    pub fn new() -> Self {
        Self::with_catalog(TemplateCatalog::builtin())
    }

    pub fn with_catalog(catalog: TemplateCatalog) -> Self {
        Self { catalog }
    }

    pub fn catalog(&self) -> &TemplateCatalog {
        &self.catalog
    }

    pub fn validate_syntax(&self, template: &str) -> std::result::Result<(), TemplateSyntaxError> {
        parser::validate_syntax(template)
    }

    pub fn extract_variables(&self, template: &str) -> Vec<String> {
        parser::extract_variables(template)
    }

    pub fn resolve(&self, template: &str, context: &VariableContext) -> Result<String> {
        resolver::resolve(template, context, &self.catalog)
    }

    /// Referenced variables that are not legal for `operation`
    pub fn scope_hints(&self, template: &str, operation: OperationType) -> Vec<String> {
        parser::extract_variables(template)
            .into_iter()
            .filter(|name| !self.catalog.is_in_scope(name, operation))
            .collect()
    }
}
