//! Template variable catalog
//!
//! Describes which variables exist, which operations make them available and
//! whether a template that references them may resolve without a value.

use serde::{Deserialize, Serialize};

use crate::types::OperationType;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VariableCategory {
    /// Available for every operation
    Standard,
    /// Available for document-producing operations
    Spec,
    /// Available for artifact-producing operations
    Output,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VariableValueType {
    String,
    Number,
    Boolean,
    Timestamp,
    Path,
}

/// Catalog entry for one template variable
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateVariable {
    pub name: String,
    pub description: String,
    pub value_type: VariableValueType,

    /// Operations exposing this variable; empty means every operation
    #[serde(default)]
    pub available_for: Vec<OperationType>,

    /// Resolution fails when a referenced required variable has no value
    #[serde(default)]
    pub required: bool,

    pub category: VariableCategory,
}

impl TemplateVariable {
    /// Whether the variable is legal in hooks triggered by `operation`
    pub fn is_available_for(&self, operation: OperationType) -> bool {
        self.category == VariableCategory::Standard
            || self.available_for.is_empty()
            || self.available_for.contains(&operation)
    }
}

const DOCUMENT_OPERATIONS: [OperationType; 10] = [
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
];

const ARTIFACT_OPERATIONS: [OperationType; 7] = [
    OperationType::Research,
    OperationType::Datamodel,
    OperationType::Design,
    OperationType::Specify,
    OperationType::Plan,
    OperationType::Tasks,
    OperationType::Implement,
];

/// Set of known template variables
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateCatalog {
    variables: Vec<TemplateVariable>,
}

impl TemplateCatalog {
    pub fn new(variables: Vec<TemplateVariable>) -> Self {
        Self { variables }
    }

    /// The variables every workflow operation event can carry
    pub fn builtin() -> Self {
        use VariableCategory::{Output, Spec, Standard};
        use VariableValueType as T;

        let standard = [
            ("timestamp", "ISO 8601 time the trigger fired", T::Timestamp, true),
            ("triggerType", "Timing and operation, e.g. after-specify", T::String, true),
            ("user", "Git user name", T::String, false),
            ("branch", "Current git branch", T::String, false),
            ("feature", "Active feature name", T::String, true),
            ("workspacePath", "Workspace root folder", T::Path, false),
            ("repoOwner", "Repository owner", T::String, false),
            ("repoName", "Repository name", T::String, false),
            ("agentId", "Identifier of the agent that ran the operation", T::String, false),
            ("agentType", "Workflow system (speckit or openspec)", T::String, false),
        ];
        let spec = [
            ("specId", "Specification identifier", T::String, false),
            ("specPath", "Path of the specification document", T::Path, false),
            ("oldStatus", "Status before the change", T::String, false),
            ("newStatus", "Status after the change", T::String, false),
            ("changeAuthor", "Author of the change", T::String, false),
            ("useCaseId", "Use case identifier", T::String, false),
            ("taskId", "Task identifier", T::String, false),
            ("requirementId", "Requirement identifier", T::String, false),
        ];
        let output = [
            ("agentOutput", "Text produced by the agent", T::String, false),
            ("clipboardContent", "Clipboard content at trigger time", T::String, false),
            ("outputPath", "Path of the produced artifact", T::Path, false),
        ];

        type Entry = (&'static str, &'static str, VariableValueType, bool);

        let mut variables = Vec::new();
        let groups: [(&[Entry], VariableCategory, &[OperationType]); 3] = [
            (&standard, Standard, &[]),
            (&spec, Spec, &DOCUMENT_OPERATIONS),
            (&output, Output, &ARTIFACT_OPERATIONS),
        ];
        for (entries, category, operations) in groups {
            for (name, description, value_type, required) in entries.iter().copied() {
                variables.push(TemplateVariable {
                    name: name.to_string(),
                    description: description.to_string(),
                    value_type,
                    available_for: operations.to_vec(),
                    required,
                    category,
                });
            }
        }

        Self { variables }
    }

    pub fn get(&self, name: &str) -> Option<&TemplateVariable> {
        self.variables.iter().find(|v| v.name == name)
    }

    pub fn all(&self) -> &[TemplateVariable] {
        &self.variables
    }

    /// Unknown variables are never required
    pub fn is_required(&self, name: &str) -> bool {
        self.get(name).map(|v| v.required).unwrap_or(false)
    }

    /// Variables legal in hooks triggered by `operation`
    pub fn available_for(&self, operation: OperationType) -> Vec<&TemplateVariable> {
        self.variables
            .iter()
            .filter(|v| v.is_available_for(operation))
            .collect()
    }

    /// Unknown names are out of scope everywhere
    pub fn is_in_scope(&self, name: &str, operation: OperationType) -> bool {
        self.get(name)
            .map(|v| v.is_available_for(operation))
            .unwrap_or(false)
    }
}

impl Default for TemplateCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}
