//! Action configurations
//!
//! An action is a closed, tagged variant: the `type` selects exactly one parameter
//! shape and nothing is shared between shapes. Persisted as
//! `{ "type": "git", "parameters": { ... } }`.
//!
//! # Examples
//!
//! ```ignore
//! let mut action = ActionConfig::default_for(ActionKind::Git);
//! action.switch_kind(ActionKind::Mcp); // git parameters are dropped entirely
//! assert_eq!(action.kind(), ActionKind::Mcp);
//! ```

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Discriminant of [`ActionConfig`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActionKind {
    Agent,
    Git,
    GitHub,
    Custom,
    Mcp,
    Acp,
}

impl ActionKind {
    pub const ALL: [ActionKind; 6] = [
        ActionKind::Agent,
        ActionKind::Git,
        ActionKind::GitHub,
        ActionKind::Custom,
        ActionKind::Mcp,
        ActionKind::Acp,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ActionKind::Agent => "agent",
            ActionKind::Git => "git",
            ActionKind::GitHub => "github",
            ActionKind::Custom => "custom",
            ActionKind::Mcp => "mcp",
            ActionKind::Acp => "acp",
        }
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Action to perform when a hook fires
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "parameters", rename_all = "lowercase")]
pub enum ActionConfig {
    /// Run a workflow agent command such as `/speckit.plan`
    Agent(AgentActionParams),

    /// Version-control operation
    Git(GitActionParams),

    /// Issue-tracker / pull-request operation
    GitHub(GitHubActionParams),

    /// Invoke a named external or in-process agent
    Custom(CustomActionParams),

    /// Invoke tools from the tool catalog with a prompt
    Mcp(McpActionParams),

    /// Run an agent over the agent client protocol
    Acp(AcpActionParams),
}

impl ActionConfig {
    pub fn kind(&self) -> ActionKind {
        match self {
            ActionConfig::Agent(_) => ActionKind::Agent,
            ActionConfig::Git(_) => ActionKind::Git,
            ActionConfig::GitHub(_) => ActionKind::GitHub,
            ActionConfig::Custom(_) => ActionKind::Custom,
            ActionConfig::Mcp(_) => ActionKind::Mcp,
            ActionConfig::Acp(_) => ActionKind::Acp,
        }
    }

    /// Default parameters for a kind, as a fresh form would show them
    pub fn default_for(kind: ActionKind) -> Self {
        match kind {
            ActionKind::Agent => ActionConfig::Agent(AgentActionParams::default()),
            ActionKind::Git => ActionConfig::Git(GitActionParams::default()),
            ActionKind::GitHub => ActionConfig::GitHub(GitHubActionParams::default()),
            ActionKind::Custom => ActionConfig::Custom(CustomActionParams::default()),
            ActionKind::Mcp => ActionConfig::Mcp(McpActionParams::default()),
            ActionKind::Acp => ActionConfig::Acp(AcpActionParams::default()),
        }
    }

    /// Switch to another kind, replacing the whole payload
    ///
    /// Switching to the current kind keeps the parameters.
    pub fn switch_kind(&mut self, kind: ActionKind) {
        if self.kind() != kind {
            *self = Self::default_for(kind);
        }
    }

    /// Rebuild the action with every template-bearing field passed through `f`
    ///
    /// `f` receives the field name and its current value. Non-template fields
    /// (operations, numbers, ids) are copied unchanged.
    pub fn try_map_templates<E, F>(&self, mut f: F) -> Result<ActionConfig, E>
    where
        F: FnMut(&'static str, &str) -> Result<String, E>,
    {
        let mapped = match self {
            ActionConfig::Agent(params) => ActionConfig::Agent(AgentActionParams {
                command: f("command", &params.command)?,
            }),
            ActionConfig::Git(params) => ActionConfig::Git(GitActionParams {
                operation: params.operation,
                message_template: map_opt("messageTemplate", &params.message_template, &mut f)?,
                push_to_remote: params.push_to_remote,
                branch_name: map_opt("branchName", &params.branch_name, &mut f)?,
                tag_name: map_opt("tagName", &params.tag_name, &mut f)?,
                tag_message: map_opt("tagMessage", &params.tag_message, &mut f)?,
                stash_message: map_opt("stashMessage", &params.stash_message, &mut f)?,
            }),
            ActionConfig::GitHub(params) => ActionConfig::GitHub(GitHubActionParams {
                operation: params.operation,
                repository: map_opt("repository", &params.repository, &mut f)?,
                title_template: map_opt("titleTemplate", &params.title_template, &mut f)?,
                body_template: map_opt("bodyTemplate", &params.body_template, &mut f)?,
                issue_number: params.issue_number,
                pr_number: params.pr_number,
                labels: map_list("labels", &params.labels, &mut f)?,
                assignees: map_list("assignees", &params.assignees, &mut f)?,
                reviewers: map_list("reviewers", &params.reviewers, &mut f)?,
                merge_method: params.merge_method,
                head_branch: map_opt("headBranch", &params.head_branch, &mut f)?,
                base_branch: map_opt("baseBranch", &params.base_branch, &mut f)?,
                tag_name: map_opt("tagName", &params.tag_name, &mut f)?,
            }),
            ActionConfig::Custom(params) => {
                let mut cli_options = BTreeMap::new();
                for (key, value) in &params.cli_options {
                    let mapped = match value {
                        CliOptionValue::Flag(flag) => CliOptionValue::Flag(*flag),
                        CliOptionValue::Value(text) => CliOptionValue::Value(f("cliOptions", text)?),
                        CliOptionValue::List(items) => {
                            CliOptionValue::List(map_list("cliOptions", items, &mut f)?)
                        }
                    };
                    cli_options.insert(key.clone(), mapped);
                }
                ActionConfig::Custom(CustomActionParams {
                    agent_id: params.agent_id.clone(),
                    agent_name: params.agent_name.clone(),
                    agent_type: params.agent_type,
                    arguments: map_opt("arguments", &params.arguments, &mut f)?,
                    selected_tools: params.selected_tools.clone(),
                    cli_options,
                })
            }
            ActionConfig::Mcp(params) => ActionConfig::Mcp(McpActionParams {
                prompt: f("prompt", &params.prompt)?,
                ..params.clone()
            }),
            ActionConfig::Acp(params) => ActionConfig::Acp(AcpActionParams {
                task_instruction: f("taskInstruction", &params.task_instruction)?,
                cwd: map_opt("cwd", &params.cwd, &mut f)?,
                ..params.clone()
            }),
        };
        Ok(mapped)
    }

    /// Every template-bearing field as `(field name, value)`
    pub fn template_fields(&self) -> Vec<(&'static str, String)> {
        let mut fields = Vec::new();
        let _ = self.try_map_templates::<std::convert::Infallible, _>(|name, value| {
            fields.push((name, value.to_string()));
            Ok(value.to_string())
        });
        fields
    }
}

fn map_opt<E, F>(name: &'static str, value: &Option<String>, f: &mut F) -> Result<Option<String>, E>
where
    F: FnMut(&'static str, &str) -> Result<String, E>,
{
    value.as_deref().map(|v| f(name, v)).transpose()
}

fn map_list<E, F>(name: &'static str, values: &[String], f: &mut F) -> Result<Vec<String>, E>
where
    F: FnMut(&'static str, &str) -> Result<String, E>,
{
    values.iter().map(|v| f(name, v)).collect()
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentActionParams {
    /// Workflow command, e.g. `/speckit.clarify`
    pub command: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum GitOperation {
    #[default]
    Commit,
    Push,
    CreateBranch,
    CheckoutBranch,
    Pull,
    Merge,
    Tag,
    Stash,
}

impl GitOperation {
    /// Operations that act on a named branch
    pub fn needs_branch(&self) -> bool {
        matches!(
            self,
            GitOperation::CreateBranch | GitOperation::CheckoutBranch | GitOperation::Merge
        )
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GitActionParams {
    #[serde(default)]
    pub operation: GitOperation,

    /// Commit message; required for `commit`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message_template: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub push_to_remote: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub branch_name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tag_name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tag_message: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stash_message: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum GitHubOperation {
    #[default]
    OpenIssue,
    CloseIssue,
    AddComment,
    AssignIssue,
    CreatePr,
    MergePr,
    ClosePr,
    RequestReview,
    AddLabel,
    RemoveLabel,
    CreateRelease,
}

impl GitHubOperation {
    pub fn needs_issue_number(&self) -> bool {
        matches!(
            self,
            GitHubOperation::CloseIssue | GitHubOperation::AddComment | GitHubOperation::AssignIssue
        )
    }

    pub fn needs_pr_number(&self) -> bool {
        matches!(
            self,
            GitHubOperation::MergePr | GitHubOperation::ClosePr | GitHubOperation::RequestReview
        )
    }

    pub fn needs_title(&self) -> bool {
        matches!(
            self,
            GitHubOperation::OpenIssue | GitHubOperation::CreatePr | GitHubOperation::CreateRelease
        )
    }

    pub fn needs_labels(&self) -> bool {
        matches!(self, GitHubOperation::AddLabel | GitHubOperation::RemoveLabel)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MergeMethod {
    Merge,
    Squash,
    Rebase,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GitHubActionParams {
    #[serde(default)]
    pub operation: GitHubOperation,

    /// `owner/name`; the backend falls back to the workspace repository
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repository: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title_template: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body_template: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub issue_number: Option<u64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pr_number: Option<u64>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub labels: Vec<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub assignees: Vec<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub reviewers: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub merge_method: Option<MergeMethod>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub head_branch: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_branch: Option<String>,

    /// Release tag for `create-release`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tag_name: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CustomAgentType {
    /// Runs in-process
    Local,
    /// Spawned as an external CLI
    Background,
}

/// Value in a custom agent's CLI option bag
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CliOptionValue {
    /// `--name` when true, omitted when false
    Flag(bool),

    /// `--name value`
    Value(String),

    /// `--name a --name b`
    List(Vec<String>),
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomActionParams {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub agent_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub agent_name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub agent_type: Option<CustomAgentType>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub arguments: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub selected_tools: Vec<SelectedTool>,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub cli_options: BTreeMap<String, CliOptionValue>,
}

impl CustomActionParams {
    /// Identifier used to look the agent up: id first, then name
    pub fn agent_ref(&self) -> Option<&str> {
        self.agent_id
            .as_deref()
            .filter(|id| !id.trim().is_empty())
            .or_else(|| self.agent_name.as_deref().filter(|n| !n.trim().is_empty()))
    }

    /// Render the option bag as command-line arguments, keys in sorted order
    pub fn cli_args(&self) -> Vec<String> {
        let mut args = Vec::new();
        for (key, value) in &self.cli_options {
            let flag = format!("--{}", key);
            match value {
                CliOptionValue::Flag(true) => args.push(flag),
                CliOptionValue::Flag(false) => {}
                CliOptionValue::Value(text) => {
                    args.push(flag);
                    args.push(text.clone());
                }
                CliOptionValue::List(items) => {
                    for item in items {
                        args.push(flag.clone());
                        args.push(item.clone());
                    }
                }
            }
        }
        args
    }
}

/// A tool chosen from the tool catalog
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectedTool {
    #[serde(alias = "serverId")]
    pub provider_id: String,

    pub tool_name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_display_name: Option<String>,
}

impl SelectedTool {
    pub fn new(provider_id: impl Into<String>, tool_name: impl Into<String>) -> Self {
        Self {
            provider_id: provider_id.into(),
            tool_name: tool_name.into(),
            tool_display_name: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct McpActionParams {
    /// Instruction sent with the tool invocation (at most 1000 characters)
    pub prompt: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model_id: Option<String>,

    #[serde(default)]
    pub selected_tools: Vec<SelectedTool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub agent_id: Option<String>,

    /// Legacy single-tool format
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub server_id: Option<String>,

    /// Legacy single-tool format
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_name: Option<String>,
}

impl McpActionParams {
    /// The legacy tool, when both legacy fields are set
    pub fn legacy_tool(&self) -> Option<SelectedTool> {
        match (self.server_id.as_deref(), self.tool_name.as_deref()) {
            (Some(server), Some(tool)) if !server.is_empty() && !tool.is_empty() => {
                Some(SelectedTool::new(server, tool))
            }
            _ => None,
        }
    }

    /// Selected tools with the legacy tool folded in (without duplicates)
    pub fn effective_tools(&self) -> Vec<SelectedTool> {
        let mut tools = self.selected_tools.clone();
        if let Some(legacy) = self.legacy_tool() {
            let known = tools
                .iter()
                .any(|t| t.provider_id == legacy.provider_id && t.tool_name == legacy.tool_name);
            if !known {
                tools.push(legacy);
            }
        }
        tools
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AcpMode {
    #[default]
    Local,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AcpActionParams {
    #[serde(default)]
    pub mode: AcpMode,

    /// Command that starts the agent process, e.g. `npx my-agent --acp`
    pub agent_command: String,

    pub task_instruction: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub agent_display_name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cwd: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn commit_action(message: &str) -> ActionConfig {
        ActionConfig::Git(GitActionParams {
            operation: GitOperation::Commit,
            message_template: Some(message.to_string()),
            ..Default::default()
        })
    }

    #[test]
    fn test_serializes_as_type_and_parameters() {
        let json = serde_json::to_value(commit_action("feat({feature})")).unwrap();
        assert_eq!(json["type"], "git");
        assert_eq!(json["parameters"]["operation"], "commit");
        assert_eq!(json["parameters"]["messageTemplate"], "feat({feature})");
    }

    #[test]
    fn test_github_tag_is_lowercase() {
        let json = serde_json::to_value(ActionConfig::default_for(ActionKind::GitHub)).unwrap();
        assert_eq!(json["type"], "github");
        assert_eq!(json["parameters"]["operation"], "open-issue");
    }

    #[test]
    fn test_rejects_parameters_of_another_shape() {
        let value = json!({ "type": "acp", "parameters": { "command": "/speckit.plan" } });
        let parsed: Result<ActionConfig, _> = serde_json::from_value(value);
        assert!(parsed.is_err());
    }

    #[test]
    fn test_switch_kind_replaces_payload() {
        let mut action = commit_action("feat: something");
        action.switch_kind(ActionKind::Git);
        assert_eq!(action, commit_action("feat: something"));

        action.switch_kind(ActionKind::Mcp);
        assert_eq!(action, ActionConfig::Mcp(McpActionParams::default()));

        action.switch_kind(ActionKind::Git);
        assert_eq!(action, ActionConfig::Git(GitActionParams::default()));
    }

    #[test]
    fn test_template_fields_git() {
        let action = ActionConfig::Git(GitActionParams {
            operation: GitOperation::Tag,
            tag_name: Some("v{version}".to_string()),
            tag_message: Some("Release {feature}".to_string()),
            ..Default::default()
        });
        let fields = action.template_fields();
        assert_eq!(
            fields,
            vec![
                ("tagName", "v{version}".to_string()),
                ("tagMessage", "Release {feature}".to_string()),
            ]
        );
    }

    #[test]
    fn test_try_map_templates_keeps_non_template_fields() {
        let action = ActionConfig::GitHub(GitHubActionParams {
            operation: GitHubOperation::AddLabel,
            issue_number: Some(7),
            labels: vec!["{feature}".to_string(), "spec".to_string()],
            ..Default::default()
        });
        let mapped = action
            .try_map_templates::<(), _>(|_, v| Ok(v.replace("{feature}", "login")))
            .unwrap();
        match mapped {
            ActionConfig::GitHub(params) => {
                assert_eq!(params.operation, GitHubOperation::AddLabel);
                assert_eq!(params.issue_number, Some(7));
                assert_eq!(params.labels, vec!["login".to_string(), "spec".to_string()]);
            }
            other => panic!("unexpected action: {:?}", other),
        }
    }

    #[test]
    fn test_try_map_templates_stops_on_error() {
        let action = ActionConfig::Acp(AcpActionParams {
            agent_command: "agent --acp".to_string(),
            task_instruction: "Review {specPath}".to_string(),
            ..Default::default()
        });
        let result = action.try_map_templates(|name, _| Err(name));
        assert_eq!(result.unwrap_err(), "taskInstruction");
    }

    #[test]
    fn test_cli_args_rendering() {
        let mut params = CustomActionParams::default();
        params
            .cli_options
            .insert("verbose".to_string(), CliOptionValue::Flag(true));
        params
            .cli_options
            .insert("dry-run".to_string(), CliOptionValue::Flag(false));
        params.cli_options.insert(
            "model".to_string(),
            CliOptionValue::Value("sonnet".to_string()),
        );
        params.cli_options.insert(
            "add-dir".to_string(),
            CliOptionValue::List(vec!["a".to_string(), "b".to_string()]),
        );

        assert_eq!(
            params.cli_args(),
            vec!["--add-dir", "a", "--add-dir", "b", "--model", "sonnet", "--verbose"]
        );
    }

    #[test]
    fn test_cli_option_values_deserialize_untagged() {
        let params: CustomActionParams = serde_json::from_value(json!({
            "agentName": "reviewer",
            "cliOptions": { "yes": true, "model": "x", "tools": ["a"] }
        }))
        .unwrap();
        assert_eq!(params.cli_options["yes"], CliOptionValue::Flag(true));
        assert_eq!(params.cli_options["model"], CliOptionValue::Value("x".to_string()));
        assert_eq!(
            params.cli_options["tools"],
            CliOptionValue::List(vec!["a".to_string()])
        );
        assert_eq!(params.agent_ref(), Some("reviewer"));
    }

    #[test]
    fn test_mcp_effective_tools_folds_legacy() {
        let params = McpActionParams {
            prompt: "summarize".to_string(),
            server_id: Some("fs".to_string()),
            tool_name: Some("read".to_string()),
            ..Default::default()
        };
        assert_eq!(params.effective_tools(), vec![SelectedTool::new("fs", "read")]);

        let both = McpActionParams {
            selected_tools: vec![SelectedTool::new("fs", "read")],
            ..params
        };
        assert_eq!(both.effective_tools().len(), 1);
    }

    #[test]
    fn test_selected_tool_accepts_server_id_alias() {
        let tool: SelectedTool =
            serde_json::from_value(json!({ "serverId": "fs", "toolName": "read" })).unwrap();
        assert_eq!(tool.provider_id, "fs");
    }
}
