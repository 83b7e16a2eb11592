//! Execution status tracking
//!
//! Keeps the most recent dispatch state of every hook in memory. A hook with no entry
//! is idle. Each transition replaces the previous entry for that hook, so two
//! overlapping dispatches of the same hook race and whichever writes last is what
//! observers see.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use tokio::sync::{broadcast, RwLock};
use tracing::debug;

use crate::types::{ExecutionStatus, ExecutionStatusEntry};

const CHANNEL_CAPACITY: usize = 256;

/// In-memory per-hook status map with change notifications
#[derive(Debug, Clone)]
pub struct ExecutionStatusTracker {
    entries: Arc<RwLock<HashMap<String, ExecutionStatusEntry>>>,
    sender: broadcast::Sender<ExecutionStatusEntry>,
}

impl ExecutionStatusTracker {
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(CHANNEL_CAPACITY);
        Self {
            entries: Arc::new(RwLock::new(HashMap::new())),
            sender,
        }
    }

    pub async fn mark_executing(&self, hook_id: &str) -> ExecutionStatusEntry {
        self.set(hook_id, ExecutionStatus::Executing, None).await
    }

    pub async fn mark_completed(&self, hook_id: &str) -> ExecutionStatusEntry {
        self.set(hook_id, ExecutionStatus::Completed, None).await
    }

    pub async fn mark_failed(
        &self,
        hook_id: &str,
        error_message: impl Into<String>,
    ) -> ExecutionStatusEntry {
        self.set(hook_id, ExecutionStatus::Failed, Some(error_message.into()))
            .await
    }

    /// Current entry for `hook_id`; `None` means idle
    pub async fn get(&self, hook_id: &str) -> Option<ExecutionStatusEntry> {
        self.entries.read().await.get(hook_id).cloned()
    }

    /// Every tracked entry, least recently updated first
    pub async fn all(&self) -> Vec<ExecutionStatusEntry> {
        let mut entries: Vec<ExecutionStatusEntry> =
            self.entries.read().await.values().cloned().collect();
        entries.sort_by(|a, b| {
            a.updated_at
                .cmp(&b.updated_at)
                .then_with(|| a.hook_id.cmp(&b.hook_id))
        });
        entries
    }

    /// Return `hook_id` to idle, returning the entry that was dropped
    pub async fn clear(&self, hook_id: &str) -> Option<ExecutionStatusEntry> {
        self.entries.write().await.remove(hook_id)
    }

    /// Receive every transition recorded after this call
    ///
    /// Slow receivers lose the oldest notifications rather than blocking dispatch.
    pub fn subscribe(&self) -> broadcast::Receiver<ExecutionStatusEntry> {
        self.sender.subscribe()
    }

    async fn set(
        &self,
        hook_id: &str,
        status: ExecutionStatus,
        error_message: Option<String>,
    ) -> ExecutionStatusEntry {
        let entry = ExecutionStatusEntry {
            hook_id: hook_id.to_string(),
            status,
            updated_at: Utc::now(),
            error_message,
        };

        self.entries
            .write()
            .await
            .insert(hook_id.to_string(), entry.clone());

        debug!(hook_id = %hook_id, status = %status, "Execution status changed");

        // No receivers is not an error
        let _ = self.sender.send(entry.clone());
        entry
    }
}

impl Default for ExecutionStatusTracker {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_unknown_hook_is_idle() {
        let tracker = ExecutionStatusTracker::new();
        assert!(tracker.get("missing").await.is_none());
        assert!(tracker.all().await.is_empty());
    }

    #[tokio::test]
    async fn test_lifecycle_overwrites_entry() {
        let tracker = ExecutionStatusTracker::new();

        tracker.mark_executing("hook1").await;
        let entry = tracker.get("hook1").await.unwrap();
        assert_eq!(entry.status, ExecutionStatus::Executing);
        assert!(entry.error_message.is_none());

        tracker.mark_failed("hook1", "Backend error: boom").await;
        let entry = tracker.get("hook1").await.unwrap();
        assert_eq!(entry.status, ExecutionStatus::Failed);
        assert_eq!(entry.error_message.as_deref(), Some("Backend error: boom"));

        tracker.mark_executing("hook1").await;
        tracker.mark_completed("hook1").await;
        let entry = tracker.get("hook1").await.unwrap();
        assert_eq!(entry.status, ExecutionStatus::Completed);
        assert!(entry.error_message.is_none());
        assert_eq!(tracker.all().await.len(), 1);
    }

    #[tokio::test]
    async fn test_clear_returns_to_idle() {
        let tracker = ExecutionStatusTracker::new();
        tracker.mark_completed("hook1").await;

        let removed = tracker.clear("hook1").await;
        assert_eq!(removed.map(|e| e.status), Some(ExecutionStatus::Completed));
        assert!(tracker.get("hook1").await.is_none());
        assert!(tracker.clear("hook1").await.is_none());
    }

    #[tokio::test]
    async fn test_all_is_ordered_by_update_time() {
        let tracker = ExecutionStatusTracker::new();
        tracker.mark_executing("b").await;
        tokio::time::sleep(std::time::Duration::from_millis(2)).await;
        tracker.mark_executing("a").await;
        tokio::time::sleep(std::time::Duration::from_millis(2)).await;
        tracker.mark_completed("b").await;

        let ids: Vec<String> = tracker.all().await.into_iter().map(|e| e.hook_id).collect();
        assert_eq!(ids, vec!["a".to_string(), "b".to_string()]);
    }

    #[tokio::test]
    async fn test_subscribers_see_transitions() {
        let tracker = ExecutionStatusTracker::new();
        let mut receiver = tracker.subscribe();

        tracker.mark_executing("hook1").await;
        tracker.mark_failed("hook1", "nope").await;

        let first = receiver.recv().await.unwrap();
        let second = receiver.recv().await.unwrap();
        assert_eq!(first.status, ExecutionStatus::Executing);
        assert_eq!(second.status, ExecutionStatus::Failed);
        assert_eq!(second.error_message.as_deref(), Some("nope"));
    }

    #[tokio::test]
    async fn test_clones_share_state() {
        let tracker = ExecutionStatusTracker::new();
        let other = tracker.clone();
        other.mark_completed("hook1").await;
        assert!(tracker.get("hook1").await.is_some());
    }
}
