//! Pool storage subsystem.
//!
//! # Data Flow
//! ```text
//! selector / admin handlers
//!     → PoolStore trait (get, cas_advance, mutations)
//!         → memory.rs   (in-process map, advance atomic under one lock)
//!         → document.rs (JSON document per pool, durable across restarts)
//! ```
//!
//! # Design Decisions
//! - `cas_advance` is the single operation that must be atomic: it reads
//!   the cursor, advances it with wraparound, persists, and returns the
//!   pre-advance snapshot in one indivisible step
//! - Health writes are best-effort and last-write-wins; entry identity is
//!   verified by URL so a racing removal cannot flip the wrong entry
//! - Every mutation re-clamps the cursor before the pool is persisted
//! - A store that cannot be reached reports `Unavailable`; callers fall
//!   back to the static default pool instead of failing the request

pub mod document;
pub mod memory;

use async_trait::async_trait;
use std::sync::Arc;
use std::time::SystemTime;
use thiserror::Error;

use crate::config::schema::{ProxyConfig, StoreKind};
use crate::pool::{Pool, PoolEntry};

/// Errors surfaced by a pool store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// No pool with this name exists in the store.
    #[error("pool `{0}` not found")]
    NotFound(String),

    /// The storage backend could not be reached or is corrupt.
    #[error("pool store unavailable: {0}")]
    Unavailable(String),
}

/// Result of an atomic rotation advance: the pre-advance entry snapshot
/// and the index handed to this caller.
#[derive(Debug, Clone)]
pub struct Rotation {
    pub entries: Vec<PoolEntry>,
    pub selected: usize,
}

/// Authoritative storage for backend pools.
///
/// Implementations own the persistent copy; callers hold only transient
/// snapshots and write every change back through this interface.
#[async_trait]
pub trait PoolStore: Send + Sync {
    /// Snapshot read of a pool.
    async fn get(&self, pool: &str) -> Result<Pool, StoreError>;

    /// Atomically claim the current cursor position and advance the cursor
    /// with wraparound. An empty pool yields an empty snapshot and index 0.
    async fn cas_advance(&self, pool: &str) -> Result<Rotation, StoreError>;

    /// Record a probe result for one entry. Best-effort: the write is
    /// skipped when the entry no longer exists, and races with concurrent
    /// writers are acceptable.
    async fn set_entry_health(
        &self,
        pool: &str,
        index: usize,
        url: &str,
        healthy: bool,
        checked_at: SystemTime,
    ) -> Result<(), StoreError>;

    /// Append a URL. A URL already present is a no-op. Returns the updated
    /// URL list.
    async fn add_url(&self, pool: &str, url: &str) -> Result<Vec<String>, StoreError>;

    /// Remove every entry matching a URL (exact match after trailing-slash
    /// normalization). A URL not present is a no-op. Returns the updated
    /// URL list.
    async fn remove_url(&self, pool: &str, url: &str) -> Result<Vec<String>, StoreError>;

    /// Replace the entire entry list with fresh unknown-health entries and
    /// reset the cursor to 0. Returns the updated URL list.
    async fn replace_urls(&self, pool: &str, urls: &[String]) -> Result<Vec<String>, StoreError>;
}

/// Build the store selected by configuration, seeded lazily with the
/// static default pool.
pub fn build(config: &ProxyConfig) -> Arc<dyn PoolStore> {
    let interval = config.health_check.min_interval();
    let seed = config.pool.seed_pool(interval);
    match config.pool.store {
        StoreKind::Memory => Arc::new(memory::MemoryPoolStore::new(seed, interval)),
        StoreKind::Document => Arc::new(document::DocumentPoolStore::new(
            &config.pool.document_dir,
            seed,
            interval,
        )),
    }
}
