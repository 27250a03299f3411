//! HTTP proxy subsystem.
//!
//! # Data Flow
//! ```text
//! inbound request
//!     → server.rs (Axum router: health-check path, pool-management path,
//!       everything else proxied)
//!     → selector (atomic rotation + failover walk)
//!     → forwarder.rs (join target URL, relay method/headers/body)
//!     → backend response relayed verbatim to the client
//! ```
//!
//! # Design Decisions
//! - Backend status codes are never interpreted: a 404 from the backend
//!   is a 404 to the client
//! - Transport failures are distinct from backend errors: 502 for network
//!   failures, 504 for forward timeouts, 503 when no backend is usable
//! - Selection and forwarding errors are converted to responses at the
//!   handler; nothing propagates far enough to take the process down

pub mod forwarder;
pub mod server;

pub use forwarder::{ForwardError, Forwarder};
pub use server::HttpServer;
