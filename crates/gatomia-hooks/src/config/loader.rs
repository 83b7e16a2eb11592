//! Configuration loader for hooks
//!
//! Reads hook collections from YAML files. JSON files load too, JSON being a YAML
//! subset. Two locations are consulted: the project file `.gatomia/hooks.yaml` and
//! the user file `~/.gatomia/hooks.yaml`; project hooks win over user hooks with the
//! same id.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::HookValidator;
use crate::error::{HooksError, Result};
use crate::types::Hook;

/// Directory holding hook configuration, relative to a project root or home
pub const CONFIG_DIR: &str = ".gatomia";

/// Hook configuration file name
pub const CONFIG_FILE: &str = "hooks.yaml";

#[derive(Debug, Default, Serialize, Deserialize)]
struct HooksFile {
    #[serde(default)]
    hooks: Vec<Hook>,
}

/// Configuration loader for hooks
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load hooks for the current directory and the user's home
    pub fn load() -> Result<Vec<Hook>> {
        let project_root = std::env::current_dir()?;
        Self::load_from_dirs(&project_root, dirs::home_dir().as_deref())
    }

    /// Load and merge the project and user configuration files
    ///
    /// Missing files contribute nothing. The result is ordered oldest first.
    pub fn load_from_dirs(project_root: &Path, home: Option<&Path>) -> Result<Vec<Hook>> {
        let mut merged: HashMap<String, Hook> = HashMap::new();

        if let Some(home) = home {
            let user_path = Self::config_path(home);
            merged.extend(Self::load_from_path(&user_path)?.into_iter().map(|h| (h.id.clone(), h)));
        }

        let project_path = Self::config_path(project_root);
        merged.extend(
            Self::load_from_path(&project_path)?
                .into_iter()
                .map(|h| (h.id.clone(), h)),
        );

        let mut hooks: Vec<Hook> = merged.into_values().collect();
        hooks.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.id.cmp(&b.id)));
        Ok(hooks)
    }

    /// `<root>/.gatomia/hooks.yaml`
    pub fn config_path(root: &Path) -> PathBuf {
        root.join(CONFIG_DIR).join(CONFIG_FILE)
    }

    /// Load hooks from one file; a missing file yields no hooks
    pub fn load_from_path(path: &Path) -> Result<Vec<Hook>> {
        if !path.exists() {
            debug!(path = %path.display(), "Hook configuration not found");
            return Ok(Vec::new());
        }

        let content = fs::read_to_string(path)?;
        let hooks = Self::parse_yaml(&content)?;
        debug!(path = %path.display(), count = hooks.len(), "Loaded hook configuration");
        Ok(hooks)
    }

    /// Parse a `hooks:` document and validate every hook in it
    ///
    /// Expected format:
    /// ```yaml
    /// hooks:
    ///   - id: commit-spec
    ///     name: Commit spec
    ///     enabled: true
    ///     trigger:
    ///       agent: speckit
    ///       operation: specify
    ///       timing: after
    ///     action:
    ///       type: git
    ///       parameters:
    ///         operation: commit
    ///         messageTemplate: "feat({feature})"
    ///     createdAt: 2025-01-01T00:00:00Z
    ///     modifiedAt: 2025-01-01T00:00:00Z
    /// ```
    pub fn parse_yaml(content: &str) -> Result<Vec<Hook>> {
        if content.trim().is_empty() {
            return Ok(Vec::new());
        }

        let file: HooksFile = serde_yaml::from_str(content)
            .map_err(|e| HooksError::Configuration(format!("Invalid hooks file: {}", e)))?;

        let validator = HookValidator::default();
        for hook in &file.hooks {
            validator.validate_hook(hook).map_err(|e| {
                warn!(hook_id = %hook.id, error = %e, "Rejected hook from configuration");
                e
            })?;
        }

        Ok(file.hooks)
    }

    /// Serialise hooks into the document shape [`parse_yaml`](Self::parse_yaml) reads
    pub fn to_yaml(hooks: &[Hook]) -> Result<String> {
        let file = HooksFile {
            hooks: hooks.to_vec(),
        };
        Ok(serde_yaml::to_string(&file)?)
    }

    /// Write hooks to `path`, creating parent directories
    pub fn save_to_path(path: &Path, hooks: &[Hook]) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, Self::to_yaml(hooks)?)?;
        debug!(path = %path.display(), count = hooks.len(), "Saved hook configuration");
        Ok(())
    }
}
