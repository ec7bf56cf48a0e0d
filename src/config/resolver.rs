//! Upstream target and credential resolution.
//!
//! Turns the optional `[upstream]` settings into the concrete base URL and
//! credential used by every forwarded call. Resolution cannot fail: a missing
//! base URL falls back to the local control-plane port and a missing secret
//! becomes an empty token, which is still sent.

use crate::config::schema::UpstreamConfig;

/// Base URL used when none is configured.
pub const DEFAULT_API_BASE: &str = "http://127.0.0.1:35073";

/// Shared-secret credential forwarded as `X-Auth-Token`.
///
/// Debug output is redacted so the value cannot leak through logs.
#[derive(Clone, PartialEq, Eq, Default)]
pub struct Credential(String);

impl Credential {
    pub fn new(secret: impl Into<String>) -> Self {
        Self(secret.into())
    }

    /// Raw token value, for building the outbound header only.
    pub fn expose(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl std::fmt::Debug for Credential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.0.is_empty() {
            f.write_str("Credential(<empty>)")
        } else {
            f.write_str("Credential(<redacted>)")
        }
    }
}

/// Concrete upstream target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedUpstream {
    pub base_url: String,
    pub credential: Credential,
}

/// Resolve the upstream target from configuration.
pub fn resolve(config: &UpstreamConfig) -> ResolvedUpstream {
    let base_url = config
        .api_base
        .as_deref()
        .map(str::trim)
        .filter(|base| !base.is_empty())
        .unwrap_or(DEFAULT_API_BASE)
        .to_string();

    let credential = Credential::new(config.toggle_secret.clone().unwrap_or_default());

    ResolvedUpstream {
        base_url,
        credential,
    }
}
