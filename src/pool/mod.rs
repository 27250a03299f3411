//! Backend pool data model.
//!
//! # Data Flow
//! ```text
//! startup config (comma-separated URLs)
//!     → entry.rs (Pool seeded with normalized entries)
//!     → store (authoritative copy, one per pool name)
//!     → selector (transient per-request snapshot)
//! ```
//!
//! # Design Decisions
//! - Entry order is rotation order; entries are never reordered by health
//! - The cursor invariant (`0 <= cursor < len` when non-empty) is
//!   re-established by `clamp_cursor` after every mutation
//! - URLs are stored with the trailing slash stripped so admin matching
//!   and target joining are exact

pub mod entry;
pub mod url;

pub use entry::{Pool, PoolEntry};
pub use url::{join_target, normalize_base};
