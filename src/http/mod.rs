//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! Browser request
//!     → server.rs (Axum router generated from the operation registry)
//!     → request.rs (request ID assigned / kept)
//!     → upstream client (one backend call)
//!     → response.rs (relay: same status, JSON body)
//!     → Browser
//! ```

pub mod request;
pub mod response;
pub mod server;

pub use request::X_REQUEST_ID;
pub use response::{relay, RelayEnvelope};
pub use server::{build_router, AppState, GatewayServer};
