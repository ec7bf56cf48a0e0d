//! Backend URL construction.
//!
//! # Responsibilities
//! - Join the configured base URL with an operation's path template
//! - Fill `{param}` segments, percent-encoded as a single segment
//! - Append query parameters, substituting per-operation defaults
//!
//! # Design Decisions
//! - Segments go through `url`'s segment encoder, so a `/` inside a value
//!   never becomes a path separator
//! - Empty inbound values count as absent (default applies, or nothing is sent)
//! - Inbound parameters not declared on the operation are dropped

use std::collections::HashMap;

use url::Url;

use crate::error::{GatewayError, GatewayResult};
use crate::routing::registry::OperationSpec;

/// Build the backend URL for one call.
pub fn build_url(
    base_url: &str,
    spec: &OperationSpec,
    path_params: &HashMap<String, String>,
    query: &HashMap<String, String>,
) -> GatewayResult<Url> {
    let mut url = Url::parse(base_url)
        .map_err(|e| GatewayError::InvalidTarget(format!("{}: {}", base_url, e)))?;

    {
        let mut segments = url
            .path_segments_mut()
            .map_err(|_| GatewayError::InvalidTarget(format!("{}: cannot carry a path", base_url)))?;
        segments.pop_if_empty();

        for segment in spec.path.split('/').filter(|s| !s.is_empty()) {
            match segment.strip_prefix('{').and_then(|s| s.strip_suffix('}')) {
                Some(param) => {
                    let value = path_params.get(param).ok_or_else(|| {
                        GatewayError::InvalidTarget(format!(
                            "missing path parameter '{}' for {}",
                            param, spec.name
                        ))
                    })?;
                    segments.push(value);
                }
                None => {
                    segments.push(segment);
                }
            }
        }
    }

    let pairs: Vec<(&str, &str)> = spec
        .query_params()
        .filter_map(|param| {
            query
                .get(param.name)
                .map(String::as_str)
                .filter(|v| !v.is_empty())
                .or(param.default)
                .map(|value| (param.name, value))
        })
        .collect();

    if !pairs.is_empty() {
        url.query_pairs_mut().extend_pairs(pairs);
    }

    Ok(url)
}
