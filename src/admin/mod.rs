//! Pool administration subsystem.
//!
//! # Data Flow
//! ```text
//! request hits the pool-management path
//!     → command.rs (method + body parsed into a closed PoolCommand)
//!     → handlers.rs (command executed against the pool store)
//!     → JSON response (pool snapshot or updated URL list)
//! ```
//!
//! # Design Decisions
//! - The four supported methods form a closed enum; anything else is
//!   rejected at the boundary with 405 and no mutation
//! - Malformed payloads are rejected with 400 before any store call
//! - Reads fall back to the static default pool when the store is down;
//!   mutations do not (a lost mutation must be visible to the operator)

pub mod command;
pub mod handlers;

pub use command::{CommandError, PoolCommand};
