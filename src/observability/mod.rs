//! Observability subsystem.
//!
//! # Design Decisions
//! - Structured logging through `tracing`; every swallowed failure
//!   (best-effort health writes, alert delivery, store fallbacks) emits an
//!   event so intentional error-swallowing stays observable
//! - Request IDs are attached by middleware and carried on every proxy
//!   log line

pub mod logging;
