//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Operation table (registry.rs, static)
//!     → http/server.rs mounts one gateway route per row under /api
//!     → target.rs builds the backend URL for a call
//! ```
//!
//! # Design Decisions
//! - Operations are data, not code: the forwarder and relay never branch
//!   on which operation they serve
//! - The gateway route mirrors the backend path under `/api`
//! - Deterministic: same input always yields the same backend URL

pub mod registry;
pub mod target;

pub use registry::{lookup, OperationSpec, OPERATIONS};
