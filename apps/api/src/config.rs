use std::path::PathBuf;
use std::time::Duration;

use anyhow::{bail, Context, Result};

use crate::graph_client::GraphClientSettings;

/// Application configuration loaded from environment variables.
/// Fails at startup if a required variable is missing or a number does not parse.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub rust_log: String,
    pub graph: GraphSource,
}

/// Where snapshots come from.
#[derive(Debug, Clone)]
pub enum GraphSource {
    /// Live graph store over HTTP.
    Store(GraphClientSettings),
    /// JSON snapshot file, re-read per request.
    File(PathBuf),
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a config from any key lookup. `from_env` passes the process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let port = lookup("PORT")
            .unwrap_or_else(|| "8080".to_string())
            .parse::<u16>()
            .context("PORT must be a valid port number")?;

        let graph = match lookup("GRAPH_SNAPSHOT_PATH").filter(|p| !p.trim().is_empty()) {
            Some(path) => GraphSource::File(PathBuf::from(path)),
            None => {
                let timeout_secs = lookup("GRAPH_TIMEOUT_SECS")
                    .unwrap_or_else(|| "10".to_string())
                    .parse::<u64>()
                    .context("GRAPH_TIMEOUT_SECS must be a whole number of seconds")?;
                if timeout_secs == 0 {
                    bail!("GRAPH_TIMEOUT_SECS must be greater than zero");
                }
                GraphSource::Store(GraphClientSettings {
                    base_url: lookup("GRAPH_URL")
                        .unwrap_or_else(|| "http://localhost:7474".to_string()),
                    database: lookup("GRAPH_DATABASE").unwrap_or_else(|| "neo4j".to_string()),
                    user: lookup("GRAPH_USER").unwrap_or_else(|| "neo4j".to_string()),
                    password: require(&lookup, "GRAPH_PASSWORD")?,
                    timeout: Duration::from_secs(timeout_secs),
                })
            }
        };

        Ok(Config {
            port,
            rust_log: lookup("RUST_LOG").unwrap_or_else(|| "info".to_string()),
            graph,
        })
    }
}

fn require<F>(lookup: &F, key: &str) -> Result<String>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}
