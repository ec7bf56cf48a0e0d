//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML, optional)
//!     → loader.rs (parse & deserialize)
//!     → loader.rs (API_BASE / TOGGLE_SECRET / GATEWAY_BIND overrides)
//!     → validation.rs (semantic checks)
//!     → GatewayConfig (validated, immutable)
//!     → resolver.rs (base URL + credential, once at startup)
//!     → shared via Arc to all handlers
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; changes require a restart
//! - All fields have defaults to allow minimal configs
//! - Leaf logic never reads the process environment

pub mod loader;
pub mod resolver;
pub mod schema;
pub mod validation;

pub use loader::{load_config, ConfigError};
pub use resolver::{resolve, Credential, ResolvedUpstream, DEFAULT_API_BASE};
pub use schema::{GatewayConfig, ListenerConfig, LogFormat, ObservabilityConfig, UpstreamConfig};
