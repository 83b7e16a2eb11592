//! Tool catalog grouping
//!
//! Builds the provider/tool view used when picking tools for `mcp` and `custom`
//! actions: providers sorted by name, tools sorted by display name, each tool flagged
//! with whether it is already selected. Selections pointing at a provider that is no
//! longer available are kept visible in one trailing "Other" group.

use std::cmp::Ordering;
use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::action::SelectedTool;

/// Display name of the group holding selections for unknown providers
pub const OTHER_GROUP_NAME: &str = "Other";

/// An external tool source and the tools it exposes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Provider {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub tools: Vec<ProviderTool>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderTool {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl ProviderTool {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            title: None,
            description: None,
        }
    }

    /// Title when the provider gives one, otherwise the tool name
    pub fn display_name(&self) -> &str {
        self.title.as_deref().unwrap_or(&self.name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolOption {
    pub provider_id: String,
    pub name: String,
    pub display_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub is_selected: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderGroup {
    /// Empty for the "Other" group
    pub provider_id: String,
    pub provider_name: String,
    pub tools: Vec<ToolOption>,
    pub is_other: bool,
}

/// Case-insensitive order; names equal ignoring case put lowercase first, as
/// locale collation does (`"b"` before `"B"`)
pub fn compare_names(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| b.cmp(a))
}

/// Group `providers` for display, marking tools found in `selected`
pub fn group_tools_by_provider(
    providers: &[Provider],
    selected: &[SelectedTool],
) -> Vec<ProviderGroup> {
    let chosen: HashSet<(&str, &str)> = selected
        .iter()
        .map(|s| (s.provider_id.as_str(), s.tool_name.as_str()))
        .collect();

    let mut groups: Vec<ProviderGroup> = providers
        .iter()
        .map(|provider| {
            let mut tools: Vec<ToolOption> = provider
                .tools
                .iter()
                .map(|tool| ToolOption {
                    provider_id: provider.id.clone(),
                    name: tool.name.clone(),
                    display_name: tool.display_name().to_string(),
                    description: tool.description.clone(),
                    is_selected: chosen.contains(&(provider.id.as_str(), tool.name.as_str())),
                })
                .collect();
            sort_tools(&mut tools);

            ProviderGroup {
                provider_id: provider.id.clone(),
                provider_name: provider.name.clone(),
                tools,
                is_other: false,
            }
        })
        .collect();
    groups.sort_by(|a, b| {
        compare_names(&a.provider_name, &b.provider_name)
            .then_with(|| a.provider_id.cmp(&b.provider_id))
    });

    if let Some(other) = other_group(providers, selected) {
        groups.push(other);
    }

    groups
}

fn other_group(providers: &[Provider], selected: &[SelectedTool]) -> Option<ProviderGroup> {
    let known: HashSet<&str> = providers.iter().map(|p| p.id.as_str()).collect();
    let mut seen: HashSet<(&str, &str)> = HashSet::new();

    let mut tools: Vec<ToolOption> = selected
        .iter()
        .filter(|s| !known.contains(s.provider_id.as_str()))
        .filter(|s| seen.insert((s.provider_id.as_str(), s.tool_name.as_str())))
        .map(|s| ToolOption {
            provider_id: s.provider_id.clone(),
            name: s.tool_name.clone(),
            display_name: s
                .tool_display_name
                .clone()
                .unwrap_or_else(|| s.tool_name.clone()),
            description: None,
            is_selected: true,
        })
        .collect();

    if tools.is_empty() {
        return None;
    }
    sort_tools(&mut tools);

    Some(ProviderGroup {
        provider_id: String::new(),
        provider_name: OTHER_GROUP_NAME.to_string(),
        tools,
        is_other: true,
    })
}

fn sort_tools(tools: &mut [ToolOption]) {
    tools.sort_by(|a, b| {
        compare_names(&a.display_name, &b.display_name)
            .then_with(|| a.name.cmp(&b.name))
            .then_with(|| a.provider_id.cmp(&b.provider_id))
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    fn provider(id: &str, name: &str, tools: &[&str]) -> Provider {
        Provider {
            id: id.to_string(),
            name: name.to_string(),
            tools: tools.iter().map(|t| ProviderTool::new(*t)).collect(),
        }
    }

    #[test]
    fn test_empty_inputs_yield_no_groups() {
        assert!(group_tools_by_provider(&[], &[]).is_empty());
    }

    #[test]
    fn test_groups_and_tools_are_sorted() {
        let providers = vec![
            provider("gh", "github", &["search", "create_issue"]),
            provider("fs", "Filesystem", &["write", "Read"]),
        ];
        let groups = group_tools_by_provider(&providers, &[]);

        let names: Vec<&str> = groups.iter().map(|g| g.provider_name.as_str()).collect();
        assert_eq!(names, vec!["Filesystem", "github"]);

        let fs_tools: Vec<&str> = groups[0].tools.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(fs_tools, vec!["Read", "write"]);
        let gh_tools: Vec<&str> = groups[1].tools.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(gh_tools, vec!["create_issue", "search"]);
    }

    #[test]
    fn test_tools_sort_by_title_when_present() {
        let mut tools = vec![ProviderTool::new("a_tool"), ProviderTool::new("b_tool")];
        tools[0].title = Some("Zeta".to_string());
        let providers = vec![Provider {
            id: "p".to_string(),
            name: "P".to_string(),
            tools,
        }];
        let groups = group_tools_by_provider(&providers, &[]);
        let names: Vec<&str> = groups[0].tools.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["b_tool", "a_tool"]);
        assert_eq!(groups[0].tools[1].display_name, "Zeta");
    }

    #[test]
    fn test_selection_flags() {
        let providers = vec![
            provider("fs", "Filesystem", &["read", "write"]),
            provider("db", "Database", &["read"]),
        ];
        let selected = vec![SelectedTool::new("fs", "read")];
        let groups = group_tools_by_provider(&providers, &selected);

        let flags: Vec<(String, String, bool)> = groups
            .iter()
            .flat_map(|g| g.tools.iter())
            .map(|t| (t.provider_id.clone(), t.name.clone(), t.is_selected))
            .collect();
        assert_eq!(
            flags,
            vec![
                ("db".to_string(), "read".to_string(), false),
                ("fs".to_string(), "read".to_string(), true),
                ("fs".to_string(), "write".to_string(), false),
            ]
        );
        assert!(groups.iter().all(|g| !g.is_other));
    }

    #[test]
    fn test_orphaned_selections_form_trailing_other_group() {
        let providers = vec![provider("fs", "Filesystem", &["read"])];
        let mut gone = SelectedTool::new("old", "zap");
        gone.tool_display_name = Some("Zap".to_string());
        let selected = vec![
            gone,
            SelectedTool::new("older", "alpha"),
            SelectedTool::new("old", "zap"),
            SelectedTool::new("fs", "read"),
        ];
        let groups = group_tools_by_provider(&providers, &selected);

        assert_eq!(groups.len(), 2);
        let other = &groups[1];
        assert!(other.is_other);
        assert_eq!(other.provider_name, OTHER_GROUP_NAME);
        let names: Vec<&str> = other.tools.iter().map(|t| t.display_name.as_str()).collect();
        assert_eq!(names, vec!["alpha", "Zap"]);
        assert!(other.tools.iter().all(|t| t.is_selected));
    }

    #[test]
    fn test_only_orphans_without_providers() {
        let groups = group_tools_by_provider(&[], &[SelectedTool::new("x", "y")]);
        assert_eq!(groups.len(), 1);
        assert!(groups[0].is_other);
    }

    #[test]
    fn test_compare_names_is_total() {
        assert_eq!(compare_names("abc", "ABD"), Ordering::Less);
        assert_eq!(compare_names("b", "B"), Ordering::Less);
        assert_eq!(compare_names("B", "b"), Ordering::Greater);
        assert_eq!(compare_names("same", "same"), Ordering::Equal);
    }

    #[test]
    fn test_compare_names_puts_lowercase_first() {
        let mut names = vec!["Search", "search", "apply", "SEARCH", "Apply"];
        names.sort_by(|a, b| compare_names(a, b));
        assert_eq!(names, vec!["apply", "Apply", "search", "Search", "SEARCH"]);
    }
}
