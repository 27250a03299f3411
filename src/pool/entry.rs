//! Pool and entry value types.

use serde::{Deserialize, Serialize};
use std::time::{Duration, SystemTime};

use crate::pool::url::normalize_base;

/// A single backend in a pool's rotation order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PoolEntry {
    /// Absolute base URL, trailing slash normalized away.
    pub url: String,

    /// Last-known health. Advisory only; re-checked on selection when the
    /// probe interval has elapsed.
    #[serde(default)]
    pub healthy: bool,

    /// When this entry was last probed, if ever.
    #[serde(default)]
    pub last_checked_at: Option<SystemTime>,

    /// Minimum time between probes of this entry.
    #[serde(default = "default_min_check_interval")]
    pub min_check_interval: Duration,

    /// Reserved for weighted rotation; the selector treats every entry as
    /// weight 1.
    #[serde(default = "default_weight")]
    pub weight: u32,
}

fn default_min_check_interval() -> Duration {
    Duration::from_secs(10)
}

fn default_weight() -> u32 {
    1
}

impl PoolEntry {
    /// Create a fresh entry with unknown health.
    pub fn new(url: &str, min_check_interval: Duration) -> Self {
        Self {
            url: normalize_base(url),
            healthy: false,
            last_checked_at: None,
            min_check_interval,
            weight: 1,
        }
    }

    /// Whether a live probe is due.
    ///
    /// An entry that has never been probed is probed now, not assumed
    /// healthy. A `last_checked_at` in the future (clock adjustment) also
    /// forces a probe.
    pub fn due_for_probe(&self, now: SystemTime) -> bool {
        match self.last_checked_at {
            None => true,
            Some(last) => match now.duration_since(last) {
                Ok(elapsed) => elapsed >= self.min_check_interval,
                Err(_) => true,
            },
        }
    }
}

/// An ordered set of backends plus the shared rotation cursor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pool {
    /// Pool identifier.
    pub name: String,

    /// Rotation order. An empty list is legal and means "no backend
    /// available".
    pub entries: Vec<PoolEntry>,

    /// Index of the next entry to be offered by rotation.
    /// Invariant: `0 <= cursor < entries.len()` when non-empty, `0` when
    /// empty.
    #[serde(default)]
    pub cursor: usize,
}

impl Pool {
    /// Create an empty pool.
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            entries: Vec::new(),
            cursor: 0,
        }
    }

    /// Build a pool from a list of URLs, all entries starting with unknown
    /// health and the cursor at 0.
    pub fn seeded(name: &str, urls: &[String], min_check_interval: Duration) -> Self {
        Self {
            name: name.to_string(),
            entries: urls
                .iter()
                .filter(|u| !u.trim().is_empty())
                .map(|u| PoolEntry::new(u, min_check_interval))
                .collect(),
            cursor: 0,
        }
    }

    /// Re-establish the cursor invariant after a mutation. Wraps to 0 when
    /// the cursor fell out of range.
    pub fn clamp_cursor(&mut self) {
        if self.entries.is_empty() || self.cursor >= self.entries.len() {
            self.cursor = 0;
        }
    }

    /// The entry URLs in rotation order.
    pub fn urls(&self) -> Vec<String> {
        self.entries.iter().map(|e| e.url.clone()).collect()
    }

    /// Whether an entry with this URL (after normalization) exists.
    pub fn contains_url(&self, url: &str) -> bool {
        let url = normalize_base(url);
        self.entries.iter().any(|e| e.url == url)
    }
}
