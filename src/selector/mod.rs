//! Backend selection.
//!
//! # Data Flow
//! ```text
//! request needs a backend
//!     → store.cas_advance (atomic rotation: distinct starting index
//!       per concurrent caller, across every process sharing the store)
//!     → failover walk (bounded loop over the snapshot, probing when due,
//!       skipping unhealthy entries, wrapping through entry order)
//!     → healthy base URL, or PoolEmpty / NoHealthyBackend
//!
//! store unreachable
//!     → throttled STORAGE_DISCONNECTED alert
//!     → walk the static fallback pool from a process-local counter
//! ```
//!
//! # Design Decisions
//! - Rotation fairness is guaranteed at the cursor, not at the backend:
//!   two concurrent callers get distinct starting indices but may converge
//!   on one backend when a failover walk skips past unhealthy entries
//! - Every entry is tried at most once per selection, so the walk
//!   terminates after `entries.len()` candidates
//! - Unhealthy entries stay in rotation; a recovered backend rejoins on
//!   its next turn without manual intervention
//! - Health results are persisted best-effort; a failed write is logged
//!   and never blocks the selection

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::SystemTime;
use thiserror::Error;

use crate::alert::{AlertEvent, AlertThrottle};
use crate::health::Probe;
use crate::pool::{Pool, PoolEntry};
use crate::store::PoolStore;

#[derive(Debug, Error)]
pub enum SelectError {
    #[error("pool `{0}` has no entries")]
    PoolEmpty(String),

    #[error("no healthy backend in pool `{0}`")]
    NoHealthyBackend(String),
}

/// Turns a rotation position into a usable backend URL.
pub struct BackendSelector {
    store: Arc<dyn PoolStore>,
    probe: Arc<dyn Probe>,
    alerts: Arc<AlertThrottle>,
    pool_name: String,
    /// Static pool served while the store is unreachable.
    fallback: Pool,
    /// Rotation counter for the fallback pool only.
    fallback_cursor: AtomicUsize,
}

impl BackendSelector {
    pub fn new(
        store: Arc<dyn PoolStore>,
        probe: Arc<dyn Probe>,
        alerts: Arc<AlertThrottle>,
        pool_name: &str,
        fallback: Pool,
    ) -> Self {
        Self {
            store,
            probe,
            alerts,
            pool_name: pool_name.to_string(),
            fallback,
            fallback_cursor: AtomicUsize::new(0),
        }
    }

    /// Select a healthy backend base URL for one request.
    pub async fn select(&self) -> Result<String, SelectError> {
        match self.store.cas_advance(&self.pool_name).await {
            Ok(rotation) => {
                self.walk(rotation.entries, rotation.selected, true).await
            }
            Err(err) => {
                tracing::warn!(
                    pool = %self.pool_name,
                    error = %err,
                    "pool store unavailable, serving from static fallback pool"
                );
                self.alerts
                    .notify(
                        AlertEvent::StorageDisconnected,
                        "Pool store disconnected",
                        &format!("Pool store unreachable, serving from fallback pool: {err}"),
                    )
                    .await;
                let start = self.fallback_cursor.fetch_add(1, Ordering::Relaxed);
                let entries = self.fallback.entries.clone();
                if entries.is_empty() {
                    return Err(SelectError::PoolEmpty(self.pool_name.clone()));
                }
                let start = start % entries.len();
                self.walk(entries, start, false).await
            }
        }
    }

    /// Bounded failover walk: try each entry at most once, starting at
    /// `start` and advancing through entry order with wraparound.
    async fn walk(
        &self,
        entries: Vec<PoolEntry>,
        start: usize,
        persist: bool,
    ) -> Result<String, SelectError> {
        let len = entries.len();
        if len == 0 {
            return Err(SelectError::PoolEmpty(self.pool_name.clone()));
        }

        let mut index = start % len;
        for _ in 0..len {
            let entry = &entries[index];
            let now = SystemTime::now();

            let healthy = if entry.due_for_probe(now) {
                let healthy = self.probe.probe(&entry.url).await;
                if persist {
                    if let Err(err) = self
                        .store
                        .set_entry_health(&self.pool_name, index, &entry.url, healthy, now)
                        .await
                    {
                        tracing::debug!(
                            pool = %self.pool_name,
                            url = %entry.url,
                            error = %err,
                            "failed to persist health result"
                        );
                    }
                }
                healthy
            } else {
                entry.healthy
            };

            if healthy {
                return Ok(entry.url.clone());
            }

            index = (index + 1) % len;
        }

        let attempted: Vec<&str> = entries.iter().map(|e| e.url.as_str()).collect();
        tracing::error!(
            pool = %self.pool_name,
            attempted = ?attempted,
            "every backend in rotation failed its health check"
        );
        Err(SelectError::NoHealthyBackend(self.pool_name.clone()))
    }
}
