//! Infrastructure alerting subsystem.
//!
//! # Data Flow
//! ```text
//! failure observed (store unreachable, ...)
//!     → throttle.rs (per-category cooldown gate)
//!     → notifier.rs (delivery collaborator)
//! ```
//!
//! # Design Decisions
//! - One notification per event category per cooldown window, so a flapping
//!   dependency cannot cause a notification storm
//! - The cooldown timestamp is stamped before delivery starts, so two
//!   concurrent triggers on the same failure cannot both send
//! - Delivery failures are logged and swallowed; alerting never raises into
//!   the request path

pub mod notifier;
pub mod throttle;

pub use notifier::{LogNotifier, Notifier, NotifyError};
pub use throttle::{AlertEvent, AlertThrottle};
