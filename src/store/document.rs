//! Document-backed pool store.
//!
//! Each pool is one JSON document on disk, keyed by pool name. Updates are
//! read-modify-write serialized by an in-process lock, so the store is
//! consistent within a single process and survives restarts. Separate
//! processes sharing the directory do not get cross-process atomicity;
//! deployments that scale out horizontally need a store whose
//! `cas_advance` is atomic at the backend itself.

use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};
use tokio::fs;
use tokio::sync::Mutex;

use crate::pool::{normalize_base, Pool, PoolEntry};
use crate::store::{PoolStore, Rotation, StoreError};

pub struct DocumentPoolStore {
    dir: PathBuf,
    seed: Pool,
    min_check_interval: Duration,
    // Serializes every read-modify-write cycle.
    lock: Mutex<()>,
}

impl DocumentPoolStore {
    pub fn new(dir: impl AsRef<Path>, seed: Pool, min_check_interval: Duration) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
            seed,
            min_check_interval,
            lock: Mutex::new(()),
        }
    }

    fn document_path(&self, pool: &str) -> PathBuf {
        self.dir.join(format!("{pool}.json"))
    }

    /// Load a pool document, seeding the default pool on first access.
    /// Callers must hold the store lock.
    async fn load(&self, pool: &str) -> Result<Pool, StoreError> {
        match fs::read(self.document_path(pool)).await {
            Ok(bytes) => serde_json::from_slice(&bytes)
                .map_err(|e| StoreError::Unavailable(format!("corrupt pool document: {e}"))),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                if pool == self.seed.name {
                    self.persist(&self.seed).await?;
                    Ok(self.seed.clone())
                } else {
                    Err(StoreError::NotFound(pool.to_string()))
                }
            }
            Err(e) => Err(StoreError::Unavailable(e.to_string())),
        }
    }

    async fn persist(&self, pool: &Pool) -> Result<(), StoreError> {
        fs::create_dir_all(&self.dir)
            .await
            .map_err(|e| StoreError::Unavailable(e.to_string()))?;
        let bytes = serde_json::to_vec_pretty(pool)
            .map_err(|e| StoreError::Unavailable(e.to_string()))?;
        fs::write(self.document_path(&pool.name), bytes)
            .await
            .map_err(|e| StoreError::Unavailable(e.to_string()))
    }

    async fn update<T>(
        &self,
        pool: &str,
        f: impl FnOnce(&mut Pool) -> T + Send,
    ) -> Result<T, StoreError> {
        let _guard = self.lock.lock().await;
        let mut doc = self.load(pool).await?;
        let out = f(&mut doc);
        self.persist(&doc).await?;
        Ok(out)
    }
}

#[async_trait]
impl PoolStore for DocumentPoolStore {
    async fn get(&self, pool: &str) -> Result<Pool, StoreError> {
        let _guard = self.lock.lock().await;
        self.load(pool).await
    }

    async fn cas_advance(&self, pool: &str) -> Result<Rotation, StoreError> {
        self.update(pool, |p| {
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
        self.update(pool, |p| {
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
        self.update(pool, move |p| {
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
        self.update(pool, move |p| {
            p.entries.retain(|e| e.url != url);
            p.clamp_cursor();
            p.urls()
        })
        .await
    }

    async fn replace_urls(&self, pool: &str, urls: &[String]) -> Result<Vec<String>, StoreError> {
        let interval = self.min_check_interval;
        self.update(pool, move |p| {
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
