//! In-memory hook storage implementation

use std::{
    collections::HashMap,
    sync::{Arc, RwLock},
};

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::{
    error::{HooksError, Result},
    types::Hook,
};

/// In-memory hook registry implementation
#[derive(Debug, Clone)]
pub struct InMemoryHookRegistry {
    hooks: Arc<RwLock<HashMap<String, Hook>>>,
}

impl InMemoryHookRegistry {
    /// Create a new in-memory hook registry
    pub fn new() -> Self {
        Self {
            hooks: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Registry holding `hooks`; a later hook replaces an earlier one with the same id
    pub fn from_hooks(hooks: Vec<Hook>) -> Self {
        let map = hooks
            .into_iter()
            .map(|hook| (hook.id.clone(), hook))
            .collect();
        Self {
            hooks: Arc::new(RwLock::new(map)),
        }
    }

    fn modify<T>(&self, hook_id: &str, f: impl FnOnce(&mut Hook) -> T) -> Result<T> {
        let mut hooks = self.hooks.write().map_err(|e| {
            HooksError::StorageError(format!("Failed to acquire write lock: {}", e))
        })?;

        let hook = hooks
            .get_mut(hook_id)
            .ok_or_else(|| HooksError::HookNotFound(hook_id.to_string()))?;

        Ok(f(hook))
    }
}

impl Default for InMemoryHookRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl super::HookRegistry for InMemoryHookRegistry {
    fn register_hook(&self, mut hook: Hook) -> Result<String> {
        if hook.id.is_empty() {
            hook.id = Uuid::new_v4().to_string();
        }

        let hook_id = hook.id.clone();
        let mut hooks = self.hooks.write().map_err(|e| {
            HooksError::StorageError(format!("Failed to acquire write lock: {}", e))
        })?;

        hooks.insert(hook_id.clone(), hook);
        Ok(hook_id)
    }

    fn unregister_hook(&self, hook_id: &str) -> Result<()> {
        let mut hooks = self.hooks.write().map_err(|e| {
            HooksError::StorageError(format!("Failed to acquire write lock: {}", e))
        })?;

        hooks
            .remove(hook_id)
            .ok_or_else(|| HooksError::HookNotFound(hook_id.to_string()))?;

        Ok(())
    }

    fn get_hook(&self, hook_id: &str) -> Result<Hook> {
        let hooks = self
            .hooks
            .read()
            .map_err(|e| HooksError::StorageError(format!("Failed to acquire read lock: {}", e)))?;

        hooks
            .get(hook_id)
            .cloned()
            .ok_or_else(|| HooksError::HookNotFound(hook_id.to_string()))
    }

    fn list_hooks(&self) -> Result<Vec<Hook>> {
        let hooks = self
            .hooks
            .read()
            .map_err(|e| HooksError::StorageError(format!("Failed to acquire read lock: {}", e)))?;

        let mut list: Vec<Hook> = hooks.values().cloned().collect();
        list.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.id.cmp(&b.id)));
        Ok(list)
    }

    fn update_hook(&self, hook: Hook) -> Result<Hook> {
        let hook_id = hook.id.clone();
        self.modify(&hook_id, move |stored| {
            let mut updated = hook;
            updated.created_at = stored.created_at;
            updated.execution_count = stored.execution_count;
            updated.last_executed_at = stored.last_executed_at;
            updated.touch();
            *stored = updated.clone();
            updated
        })
    }

    fn enable_hook(&self, hook_id: &str) -> Result<()> {
        self.modify(hook_id, |hook| hook.enabled = true)
    }

    fn disable_hook(&self, hook_id: &str) -> Result<()> {
        self.modify(hook_id, |hook| hook.enabled = false)
    }

    fn record_execution(&self, hook_id: &str, at: DateTime<Utc>) -> Result<Hook> {
        self.modify(hook_id, |hook| {
            hook.record_execution(at);
            hook.clone()
        })
    }
}
