//! Health checking subsystem.
//!
//! # Data Flow
//! ```text
//! selector walks a candidate
//!     → entry.due_for_probe? (min interval gate, in pool::entry)
//!         yes → probe.rs (GET base + route, bounded by timeout)
//!         no  → trust the cached health flag
//!     → result persisted best-effort through the store
//! ```
//!
//! # Design Decisions
//! - A probe is a boolean signal, never an error: connection failures,
//!   non-2xx statuses, and timeouts all read as unhealthy
//! - Probes are rate-limited per entry so a hot request path does not
//!   hammer a backend's health route

pub mod probe;

pub use probe::{HttpProbe, Probe};
