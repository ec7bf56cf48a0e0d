//! The operation table.
//!
//! One row per supported operation. The gateway route, the outbound method,
//! path, parameters and body handling are all derived from the row, so adding
//! an operation is adding a row here.

use axum::http::Method;
use axum::routing::MethodFilter;

/// HTTP verb used for both the gateway route and the backend call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Verb {
    Get,
    Post,
}

impl Verb {
    pub fn method(self) -> Method {
        match self {
            Verb::Get => Method::GET,
            Verb::Post => Method::POST,
        }
    }

    pub fn method_filter(self) -> MethodFilter {
        match self {
            Verb::Get => MethodFilter::GET,
            Verb::Post => MethodFilter::POST,
        }
    }
}

/// Where an inbound parameter lands on the backend call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamKind {
    /// Appended to the backend query string.
    Query,
    /// Substituted into a `{name}` path segment.
    Path,
}

/// A parameter forwarded from the inbound request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParamSpec {
    pub name: &'static str,
    pub kind: ParamKind,
    /// Used when the inbound request omits the parameter or leaves it empty.
    pub default: Option<&'static str>,
}

impl ParamSpec {
    const fn query(name: &'static str) -> Self {
        Self {
            name,
            kind: ParamKind::Query,
            default: None,
        }
    }

    const fn query_or(name: &'static str, default: &'static str) -> Self {
        Self {
            name,
            kind: ParamKind::Query,
            default: Some(default),
        }
    }

    const fn path(name: &'static str) -> Self {
        Self {
            name,
            kind: ParamKind::Path,
            default: None,
        }
    }
}

/// How the outbound request body is produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyPolicy {
    /// No body is sent.
    Empty,
    /// The inbound JSON body is sent as-is, `{}` when it is missing or invalid.
    Json,
}

/// A single operation row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OperationSpec {
    /// Stable identifier, used in logs and metric labels.
    pub name: &'static str,
    pub verb: Verb,
    /// Backend path template; `{param}` segments are filled from path params.
    pub path: &'static str,
    pub params: &'static [ParamSpec],
    pub body: BodyPolicy,
}

/// Prefix of every gateway route.
pub const API_PREFIX: &str = "/api";

impl OperationSpec {
    /// Gateway route for this operation, e.g. `/api/graphs/{name}`.
    pub fn gateway_route(&self) -> String {
        format!("{}{}", API_PREFIX, self.path)
    }

    pub fn has_path_params(&self) -> bool {
        self.params.iter().any(|p| p.kind == ParamKind::Path)
    }

    pub fn query_params(&self) -> impl Iterator<Item = &ParamSpec> {
        self.params.iter().filter(|p| p.kind == ParamKind::Query)
    }
}

pub static OPERATIONS: &[OperationSpec] = &[
    OperationSpec {
        name: "health",
        verb: Verb::Get,
        path: "/health",
        params: &[],
        body: BodyPolicy::Empty,
    },
    OperationSpec {
        name: "ops-listing",
        verb: Verb::Get,
        path: "/ops",
        params: &[ParamSpec::query_or("limit", "100")],
        body: BodyPolicy::Empty,
    },
    OperationSpec {
        name: "graph-listing",
        verb: Verb::Get,
        path: "/graphs",
        params: &[],
        body: BodyPolicy::Empty,
    },
    OperationSpec {
        name: "graph-fetch",
        verb: Verb::Get,
        path: "/graphs/{name}",
        params: &[ParamSpec::path("name")],
        body: BodyPolicy::Empty,
    },
    OperationSpec {
        name: "metric-aggregate-fetch",
        verb: Verb::Get,
        path: "/metrics/agg",
        params: &[ParamSpec::query("name")],
        body: BodyPolicy::Empty,
    },
    OperationSpec {
        name: "metric-raw-fetch",
        verb: Verb::Get,
        path: "/metrics/raw",
        params: &[ParamSpec::query_or("limit", "10")],
        body: BodyPolicy::Empty,
    },
    OperationSpec {
        name: "haproxy-state",
        verb: Verb::Get,
        path: "/haproxy/state",
        params: &[ParamSpec::query("backend")],
        body: BodyPolicy::Empty,
    },
    OperationSpec {
        name: "haproxy-toggle",
        verb: Verb::Post,
        path: "/haproxy/toggle",
        params: &[],
        body: BodyPolicy::Json,
    },
    OperationSpec {
        name: "queue-retry",
        verb: Verb::Post,
        path: "/queue/retry",
        params: &[],
        body: BodyPolicy::Empty,
    },
    OperationSpec {
        name: "disk-check",
        verb: Verb::Get,
        path: "/checks/disk",
        params: &[],
        body: BodyPolicy::Empty,
    },
    OperationSpec {
        name: "services-check",
        verb: Verb::Get,
        path: "/checks/services",
        params: &[],
        body: BodyPolicy::Empty,
    },
    OperationSpec {
        name: "ports-check",
        verb: Verb::Get,
        path: "/checks/ports",
        params: &[],
        body: BodyPolicy::Empty,
    },
    OperationSpec {
        name: "jboss-check",
        verb: Verb::Get,
        path: "/checks/jboss",
        params: &[],
        body: BodyPolicy::Empty,
    },
    OperationSpec {
        name: "system-check",
        verb: Verb::Get,
        path: "/checks/system",
        params: &[],
        body: BodyPolicy::Empty,
    },
];

/// Look up an operation by name.
pub fn lookup(name: &str) -> Option<&'static OperationSpec> {
    OPERATIONS.iter().find(|op| op.name == name)
}
