//! In-process pool store.
//!
//! One lock guards the pool map, so `cas_advance` is atomic with respect
//! to every concurrent task in this process. State does not survive a
//! restart; the document store covers that.

use async_trait::async_trait;
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::time::{Duration, SystemTime};
use tokio::sync::Mutex;

use crate::pool::{normalize_base, Pool, PoolEntry};
use crate::store::{PoolStore, Rotation, StoreError};

pub struct MemoryPoolStore {
    pools: Mutex<HashMap<String, Pool>>,
    seed: Pool,
    min_check_interval: Duration,
}

impl MemoryPoolStore {
    pub fn new(seed: Pool, min_check_interval: Duration) -> Self {
        Self {
            pools: Mutex::new(HashMap::new()),
            seed,
            min_check_interval,
        }
    }

    /// Run a closure against a pool under the store lock, seeding the
    /// default pool on first access.
    async fn with_pool<T>(
        &self,
        name: &str,
        f: impl FnOnce(&mut Pool) -> T + Send,
    ) -> Result<T, StoreError> {
        let mut pools = self.pools.lock().await;
        match pools.entry(name.to_string()) {
            Entry::Occupied(mut occupied) => Ok(f(occupied.get_mut())),
            Entry::Vacant(vacant) => {
                if name == self.seed.name {
                    Ok(f(vacant.insert(self.seed.clone())))
                } else {
                    Err(StoreError::NotFound(name.to_string()))
                }
            }
        }
    }
}

#[async_trait]
impl PoolStore for MemoryPoolStore {
    async fn get(&self, pool: &str) -> Result<Pool, StoreError> {
        self.with_pool(pool, |p| p.clone()).await
    }

    async fn cas_advance(&self, pool: &str) -> Result<Rotation, StoreError> {
        self.with_pool(pool, |p| {
            p.clamp_cursor();
            let selected = p.cursor;
            if !p.entries.is_empty() {
                p.cursor = (p.cursor + 1) % p.entries.len();
            }
            Rotation {
                entries: p.entries.clone(),
                selected,
            }
        })
        .await
    }

    async fn set_entry_health(
        &self,
        pool: &str,
        index: usize,
        url: &str,
        healthy: bool,
        checked_at: SystemTime,
    ) -> Result<(), StoreError> {
        self.with_pool(pool, |p| {
            // The index is a hint; verify identity by URL in case the
            // entry list was mutated since the snapshot was taken.
            let target = match p.entries.get(index) {
                Some(entry) if entry.url == url => Some(index),
                _ => p.entries.iter().position(|e| e.url == url),
            };
            if let Some(i) = target {
                p.entries[i].healthy = healthy;
                p.entries[i].last_checked_at = Some(checked_at);
            }
        })
        .await
    }

    async fn add_url(&self, pool: &str, url: &str) -> Result<Vec<String>, StoreError> {
        let interval = self.min_check_interval;
        self.with_pool(pool, move |p| {
            if !p.contains_url(url) {
                p.entries.push(PoolEntry::new(url, interval));
            }
            p.clamp_cursor();
            p.urls()
        })
        .await
    }

    async fn remove_url(&self, pool: &str, url: &str) -> Result<Vec<String>, StoreError> {
        let url = normalize_base(url);
        self.with_pool(pool, move |p| {
            p.entries.retain(|e| e.url != url);
            p.clamp_cursor();
            p.urls()
        })
        .await
    }

    async fn replace_urls(&self, pool: &str, urls: &[String]) -> Result<Vec<String>, StoreError> {
        let interval = self.min_check_interval;
        self.with_pool(pool, move |p| {
            p.entries = urls
                .iter()
                .filter(|u| !u.trim().is_empty())
                .map(|u| PoolEntry::new(u, interval))
                .collect();
            p.cursor = 0;
            p.urls()
        })
        .await
    }
}
