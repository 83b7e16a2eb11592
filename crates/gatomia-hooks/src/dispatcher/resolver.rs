//! Template resolution over whole actions

use tracing::debug;

use crate::action::ActionConfig;
use crate::error::Result;
use crate::template::TemplateEngine;
use crate::types::{OperationType, VariableContext};

/// Resolves every template-bearing field of an action
#[derive(Debug, Clone, Default)]
pub struct ActionResolver {
    engine: TemplateEngine,
}

impl ActionResolver {
    pub fn new(engine: TemplateEngine) -> Self {
        Self { engine }
    }

    pub fn engine(&self) -> &TemplateEngine {
        &self.engine
    }

    /// Copy of `action` with all templates substituted
    ///
    /// Stops at the first field that fails to resolve.
    pub fn resolve(&self, action: &ActionConfig, context: &VariableContext) -> Result<ActionConfig> {
        action.try_map_templates(|field, template| {
            self.engine.resolve(template, context).map_err(|e| {
                debug!(field = field, action = %action.kind(), error = %e, "Template resolution failed");
                e
            })
        })
    }

    /// Variables referenced by `action` that `operation` does not provide
    pub fn scope_hints(&self, action: &ActionConfig, operation: OperationType) -> Vec<String> {
        let mut hints: Vec<String> = Vec::new();
        for (_, template) in action.template_fields() {
            for name in self.engine.scope_hints(&template, operation) {
                if !hints.contains(&name) {
                    hints.push(name);
                }
            }
        }
        hints
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;
    use crate::action::{
        CliOptionValue, CustomActionParams, GitActionParams, GitHubActionParams, GitHubOperation,
        GitOperation,
    };
    use crate::error::HooksError;

    #[test]
    fn test_resolves_git_fields() {
        let action = ActionConfig::Git(GitActionParams {
            operation: GitOperation::Commit,
            message_template: Some("feat({feature}): {specId}".to_string()),
            push_to_remote: Some(true),
            ..Default::default()
        });
        let context = VariableContext::new()
            .with("feature", "login")
            .with("specId", "001");

        let resolved = ActionResolver::default().resolve(&action, &context).unwrap();
        match resolved {
            ActionConfig::Git(params) => {
                assert_eq!(params.message_template.as_deref(), Some("feat(login): 001"));
                assert_eq!(params.push_to_remote, Some(true));
                assert_eq!(params.operation, GitOperation::Commit);
            }
            other => panic!("unexpected action: {:?}", other),
        }
    }

    #[test]
    fn test_resolves_github_lists_and_keeps_numbers() {
        let action = ActionConfig::GitHub(GitHubActionParams {
            operation: GitHubOperation::AddLabel,
            issue_number: Some(42),
            labels: vec!["spec:{feature}".to_string(), "auto".to_string()],
            ..Default::default()
        });
        let context = VariableContext::new().with("feature", "login");

        let resolved = ActionResolver::default().resolve(&action, &context).unwrap();
        match resolved {
            ActionConfig::GitHub(params) => {
                assert_eq!(params.labels, vec!["spec:login", "auto"]);
                assert_eq!(params.issue_number, Some(42));
            }
            other => panic!("unexpected action: {:?}", other),
        }
    }

    #[test]
    fn test_resolves_custom_cli_options() {
        let mut cli_options = BTreeMap::new();
        cli_options.insert("verbose".to_string(), CliOptionValue::Flag(true));
        cli_options.insert(
            "branch".to_string(),
            CliOptionValue::Value("{branch}".to_string()),
        );
        let action = ActionConfig::Custom(CustomActionParams {
            agent_name: Some("reviewer".to_string()),
            arguments: Some("review {feature}".to_string()),
            cli_options,
            ..Default::default()
        });
        let context = VariableContext::new()
            .with("feature", "login")
            .with("branch", "001-login");

        let resolved = ActionResolver::default().resolve(&action, &context).unwrap();
        match resolved {
            ActionConfig::Custom(params) => {
                assert_eq!(params.arguments.as_deref(), Some("review login"));
                assert_eq!(
                    params.cli_options.get("branch"),
                    Some(&CliOptionValue::Value("001-login".to_string()))
                );
                assert_eq!(
                    params.cli_options.get("verbose"),
                    Some(&CliOptionValue::Flag(true))
                );
            }
            other => panic!("unexpected action: {:?}", other),
        }
    }

    #[test]
    fn test_missing_required_variable_names_it() {
        let action = ActionConfig::Git(GitActionParams {
            operation: GitOperation::Commit,
            message_template: Some("feat({feature})".to_string()),
            ..Default::default()
        });
        let err = ActionResolver::default()
            .resolve(&action, &VariableContext::new())
            .unwrap_err();
        assert!(matches!(err, HooksError::MissingVariable(ref name) if name == "feature"));
    }

    #[test]
    fn test_scope_hints_across_fields() {
        let action = ActionConfig::GitHub(GitHubActionParams {
            operation: GitHubOperation::OpenIssue,
            title_template: Some("{specId}: {feature}".to_string()),
            body_template: Some("{agentOutput} {specId}".to_string()),
            ..Default::default()
        });
        let hints = ActionResolver::default().scope_hints(&action, OperationType::TasksToIssues);
        assert_eq!(hints, vec!["specId", "agentOutput"]);
    }
}
