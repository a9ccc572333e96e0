//! Seen-id lists for announcements and promos.
//!
//! Ids are stored as a JSON array under `READ_<KIND>_<user id>` (or
//! `READ_<KIND>` when nobody is signed in). Pruning drops ids the server
//! no longer serves and runs at most once per 24 hours, tracked under
//! `<key>_LAST_PRUNE` as epoch milliseconds.

use std::collections::HashSet;
use std::sync::Arc;

use chrono::Duration;
use solesync_core::types::Timestamp;

use crate::error::ClientResult;
use crate::models::Identified;
use crate::storage::KeyValueStore;

const PRUNE_INTERVAL_HOURS: i64 = 24;

/// Which content list is tracked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadKind {
    Announcements,
    Promos,
}

impl ReadKind {
    fn as_str(self) -> &'static str {
        match self {
            Self::Announcements => "ANNOUNCEMENTS",
            Self::Promos => "PROMOS",
        }
    }
}

/// Outcome of [`ReadTracker::prune`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PruneOutcome {
    /// Pruned less than 24 hours ago; nothing done.
    Skipped,
    /// Ran; `removed` stale ids were dropped.
    Pruned { removed: usize },
}

pub struct ReadTracker {
    store: Arc<dyn KeyValueStore>,
    key: String,
}

impl ReadTracker {
    pub fn new(store: Arc<dyn KeyValueStore>, kind: ReadKind, user_id: Option<&str>) -> Self {
        let key = match user_id {
            Some(user) => format!("READ_{}_{user}", kind.as_str()),
            None => format!("READ_{}", kind.as_str()),
        };
        Self { store, key }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    fn prune_key(&self) -> String {
        format!("{}_LAST_PRUNE", self.key)
    }

    /// Stored ids, in the order they were read. A corrupt entry reads as
    /// empty.
    pub async fn read_ids(&self) -> ClientResult<Vec<String>> {
        let Some(raw) = self.store.get(&self.key).await? else {
            return Ok(Vec::new());
        };
        match serde_json::from_str(&raw) {
            Ok(ids) => Ok(ids),
            Err(e) => {
                tracing::warn!(key = %self.key, error = %e, "Discarding unreadable read-id list");
                Ok(Vec::new())
            }
        }
    }

    async fn write_ids(&self, ids: &[String]) -> ClientResult<()> {
        self.store.set(&self.key, &serde_json::to_string(ids)?).await
    }

    /// Record `id` as read. Returns `false` if it already was.
    pub async fn mark_as_read(&self, id: &str) -> ClientResult<bool> {
        let mut ids = self.read_ids().await?;
        if ids.iter().any(|seen| seen == id) {
            return Ok(false);
        }
        ids.push(id.to_string());
        self.write_ids(&ids).await?;
        tracing::debug!(key = %self.key, id, "Marked as read");
        Ok(true)
    }

    pub async fn is_read(&self, id: &str) -> ClientResult<bool> {
        Ok(self.read_ids().await?.iter().any(|seen| seen == id))
    }

    /// Number of `items` not yet read.
    pub async fn unread_count<T: Identified>(&self, items: &[T]) -> ClientResult<usize> {
        let seen: HashSet<String> = self.read_ids().await?.into_iter().collect();
        Ok(items.iter().filter(|item| !seen.contains(item.id())).count())
    }

    /// Drop stored ids that are not in `served`.
    ///
    /// An empty `served` list never prunes, so a failed fetch cannot wipe
    /// the read state.
    pub async fn prune<T: Identified>(
        &self,
        served: &[T],
        now: Timestamp,
    ) -> ClientResult<PruneOutcome> {
        let prune_key = self.prune_key();
        let last = self
            .store
            .get(&prune_key)
            .await?
            .and_then(|raw| raw.parse::<i64>().ok());
        if let Some(last_ms) = last {
            let elapsed = now.timestamp_millis() - last_ms;
            if elapsed < Duration::hours(PRUNE_INTERVAL_HOURS).num_milliseconds() {
                return Ok(PruneOutcome::Skipped);
            }
        }

        let ids = self.read_ids().await?;
        let mut removed = 0;
        if !ids.is_empty() && !served.is_empty() {
            let valid: HashSet<&str> = served.iter().map(|item| item.id()).collect();
            let kept: Vec<String> = ids
                .iter()
                .filter(|id| valid.contains(id.as_str()))
                .cloned()
                .collect();
            removed = ids.len() - kept.len();
            if removed > 0 {
                self.write_ids(&kept).await?;
            }
        }

        self.store
            .set(&prune_key, &now.timestamp_millis().to_string())
            .await?;
        tracing::debug!(key = %self.key, removed, "Pruned read ids");
        Ok(PruneOutcome::Pruned { removed })
    }
}
