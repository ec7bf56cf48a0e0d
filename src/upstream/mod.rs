//! Upstream (backend control-plane) subsystem.
//!
//! # Data Flow
//! ```text
//! InboundCall (path params, query, body, request id)
//!     → routing/target.rs (backend URL)
//!     → body.rs (JSON body or {})
//!     → client.rs (auth header, single reqwest call)
//!     → http/response.rs (relay)
//! ```

pub mod body;
pub mod client;

pub use client::{InboundCall, UpstreamClient, X_AUTH_TOKEN};
