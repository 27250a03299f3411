//! Round-robin reverse-proxy load balancer.
//!
//! # Architecture Overview
//!
//! ```text
//!     Client Request ──▶ proxy::server ──▶ selector ──▶ store (cursor,
//!                             │                │          atomic advance)
//!                             │                └──▶ health (probe when due)
//!                             ▼
//!                       proxy::forwarder ──▶ selected backend
//!
//!     Admin Request  ──▶ admin (GET/POST/DELETE/PUT on the pool)
//!
//!     Cross-cutting: config · alert (throttled notifications) ·
//!                    observability · lifecycle
//! ```
//!
//! Inbound requests are forwarded to a healthy backend chosen by
//! round-robin rotation over a shared pool. The rotation cursor advances
//! atomically in the pool store, so concurrent requests get distinct
//! starting positions; a bounded failover walk then skips unhealthy
//! entries. The pool is administered over HTTP, and infrastructure
//! failures raise cooldown-throttled alerts.

// Core subsystems
pub mod config;
pub mod pool;
pub mod proxy;
pub mod selector;
pub mod store;

// Traffic management
pub mod admin;
pub mod health;

// Cross-cutting concerns
pub mod alert;
pub mod lifecycle;
pub mod observability;

pub use config::ProxyConfig;
pub use lifecycle::Shutdown;
pub use proxy::HttpServer;
