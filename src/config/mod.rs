//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → ProxyConfig (validated, immutable)
//!     → consumed once at startup
//! ```
//!
//! # Design Decisions
//! - All fields have defaults so a minimal (or absent) config works
//! - Validation separates syntactic (serde) from semantic checks and
//!   reports every error, not just the first
//! - No hot reload: the pool changes through the admin surface, everything
//!   else through a restart

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::load_config;
pub use schema::ProxyConfig;
