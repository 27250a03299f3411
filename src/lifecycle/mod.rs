//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup:
//!     load config → validate → build store → bind listener → serve
//!
//! Shutdown:
//!     Ctrl+C / broadcast trigger → stop accepting → drain in-flight → exit
//! ```
//!
//! # Design Decisions
//! - One broadcast channel fans the shutdown signal out to every
//!   long-running task
//! - Draining is handled by axum's graceful shutdown; no separate
//!   bookkeeping

pub mod shutdown;

pub use shutdown::Shutdown;
