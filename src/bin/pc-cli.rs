use clap::{Parser, Subcommand, ValueEnum};
use reqwest::header::{HeaderMap, HeaderValue};
use serde_json::{json, Value};

use pattern_gateway::routing::{lookup, OperationSpec};

#[derive(Parser)]
#[command(name = "pc-cli")]
#[command(about = "Operator CLI for the pattern_controller gateway", long_about = None)]
struct Cli {
    /// Gateway base URL.
    #[arg(short, long, default_value = "http://127.0.0.1:3000", env = "PC_GATEWAY_URL")]
    url: String,

    /// Request ID to attach, for correlating with gateway/backend logs.
    #[arg(long)]
    request_id: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Cluster health
    Health,
    /// Recent controller operations
    Ops {
        #[arg(short, long, default_value_t = 100)]
        limit: u32,
    },
    /// List graph snapshots
    Graphs,
    /// Fetch one graph snapshot
    Graph { name: String },
    /// Fetch a metric aggregate
    Agg {
        #[arg(default_value = "agg_5m.json")]
        name: String,
    },
    /// Drain, disable or enable an HAProxy server
    Toggle {
        #[arg(value_enum)]
        action: ToggleAction,
        #[arg(short, long, default_value = "Jboss_client")]
        backend: String,
        #[arg(short, long)]
        server: String,
    },
    /// Requeue failed jobs
    Retry,
}

#[derive(Clone, Copy, ValueEnum)]
enum ToggleAction {
    Drain,
    Disable,
    Enable,
}

impl ToggleAction {
    fn as_str(self) -> &'static str {
        match self {
            ToggleAction::Drain => "drain",
            ToggleAction::Disable => "disable",
            ToggleAction::Enable => "enable",
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();

    let mut headers = HeaderMap::new();
    if let Some(id) = &cli.request_id {
        headers.insert("x-request-id", HeaderValue::from_str(id)?);
    }

    let (name, path_param, query, body) = match cli.command {
        Commands::Health => ("health", None, vec![], None),
        Commands::Ops { limit } => ("ops-listing", None, vec![("limit", limit.to_string())], None),
        Commands::Graphs => ("graph-listing", None, vec![], None),
        Commands::Graph { name } => ("graph-fetch", Some(name), vec![], None),
        Commands::Agg { name } => ("metric-aggregate-fetch", None, vec![("name", name)], None),
        Commands::Toggle {
            action,
            backend,
            server,
        } => (
            "haproxy-toggle",
            None,
            vec![],
            Some(json!({
                "action": action.as_str(),
                "backend": backend,
                "server": server,
            })),
        ),
        Commands::Retry => ("queue-retry", None, vec![], None),
    };

    let spec = lookup(name).ok_or_else(|| format!("unknown operation {}", name))?;
    let url = gateway_url(&cli.url, spec, path_param.as_deref())?;

    let mut request = client.request(spec.verb.method(), url).headers(headers);
    if !query.is_empty() {
        request = request.query(&query);
    }
    if let Some(body) = body {
        request = request.json(&body);
    }

    let res = request.send().await?;
    print_response(res).await
}

/// Gateway URL for an operation; a `{param}` segment takes `path_param`, encoded.
fn gateway_url(
    base: &str,
    spec: &OperationSpec,
    path_param: Option<&str>,
) -> Result<reqwest::Url, Box<dyn std::error::Error>> {
    let mut url = reqwest::Url::parse(base)?;
    {
        let mut segments = url
            .path_segments_mut()
            .map_err(|_| "gateway URL cannot carry a path")?;
        segments.pop_if_empty();
        for segment in spec.gateway_route().split('/').filter(|s| !s.is_empty()) {
            if segment.starts_with('{') {
                segments.push(path_param.ok_or("missing path parameter")?);
            } else {
                segments.push(segment);
            }
        }
    }
    Ok(url)
}

async fn print_response(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    let text = res.text().await?;

    if !status.is_success() {
        eprintln!("Error: gateway returned status {}", status);
    }

    match serde_json::from_str::<Value>(&text) {
        Ok(json) => println!("{}", serde_json::to_string_pretty(&json)?),
        Err(_) => println!("{}", text),
    }

    if !status.is_success() {
        std::process::exit(1);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gateway_url_from_registry() {
        let url = gateway_url("http://127.0.0.1:3000/", lookup("queue-retry").unwrap(), None).unwrap();
        assert_eq!(url.as_str(), "http://127.0.0.1:3000/api/queue/retry");

        let graph = lookup("graph-fetch").unwrap();
        let url = gateway_url("http://127.0.0.1:3000", graph, Some("cpu load/a.json")).unwrap();
        assert_eq!(url.as_str(), "http://127.0.0.1:3000/api/graphs/cpu%20load%2Fa.json");
        assert!(gateway_url("http://127.0.0.1:3000", graph, None).is_err());
    }
}
