/// Graph client — HTTP adapter to the taxonomy graph store (Neo4j transactional endpoint).
///
/// Implements `GraphSnapshotProvider`. One `reqwest::Client` is shared by all requests;
/// it owns connection pooling and the per-request timeout. The matching core never sees it.
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

use crate::matching::provider::{GraphSnapshotProvider, SnapshotError};
use crate::matching::taxonomy::{edge_from_value, DomainNode, GraphSnapshot};

pub mod queries;

const MAX_RETRIES: u32 = 3;
const BASE_BACKOFF_MS: u64 = 250;

/// Connection settings for the graph store.
#[derive(Debug, Clone)]
pub struct GraphClientSettings {
    pub base_url: String,
    pub database: String,
    pub user: String,
    pub password: String,
    pub timeout: Duration,
}

#[derive(Debug, Serialize)]
struct TxRequest<'a> {
    statements: Vec<TxStatement<'a>>,
}

#[derive(Debug, Serialize)]
struct TxStatement<'a> {
    statement: &'a str,
}

#[derive(Debug, Deserialize)]
struct TxResponse {
    #[serde(default)]
    results: Vec<TxResult>,
    #[serde(default)]
    errors: Vec<TxError>,
}

#[derive(Debug, Deserialize)]
struct TxResult {
    #[serde(default)]
    data: Vec<TxRow>,
}

#[derive(Debug, Deserialize)]
struct TxRow {
    row: Vec<Value>,
}

#[derive(Debug, Deserialize)]
struct TxError {
    code: String,
    message: String,
}

#[derive(Clone)]
pub struct GraphClient {
    client: Client,
    commit_url: String,
    user: String,
    password: String,
}

impl GraphClient {
    pub fn new(settings: GraphClientSettings) -> Result<Self, SnapshotError> {
        let client = Client::builder().timeout(settings.timeout).build()?;
        let commit_url = format!(
            "{}/db/{}/tx/commit",
            settings.base_url.trim_end_matches('/'),
            settings.database
        );
        Ok(Self {
            client,
            commit_url,
            user: settings.user,
            password: settings.password,
        })
    }

    /// Runs one Cypher statement in an auto-commit transaction and returns its rows.
    /// Retries transport failures and 5xx responses with exponential backoff.
    /// Timeouts are not retried: the configured timeout is the caller's whole budget.
    pub async fn run(&self, statement: &str) -> Result<Vec<Vec<Value>>, SnapshotError> {
        let body = TxRequest {
            statements: vec![TxStatement { statement }],
        };

        let mut last_error: Option<SnapshotError> = None;

        for attempt in 0..MAX_RETRIES {
            if attempt > 0 {
                // 250ms, 500ms
                let delay = Duration::from_millis(BASE_BACKOFF_MS * (1 << (attempt - 1)));
                warn!(
                    "Graph store attempt {} failed, retrying after {}ms...",
                    attempt,
                    delay.as_millis()
                );
                tokio::time::sleep(delay).await;
            }

            let response = self
                .client
                .post(&self.commit_url)
                .basic_auth(&self.user, Some(&self.password))
                .header("accept", "application/json")
                .json(&body)
                .send()
                .await;

            let response = match response {
                Ok(r) => r,
                Err(e) if e.is_timeout() => return Err(SnapshotError::Timeout),
                Err(e) => {
                    last_error = Some(SnapshotError::Http(e));
                    continue;
                }
            };

            let status = response.status();

            if status.is_server_error() {
                let message = response.text().await.unwrap_or_default();
                warn!("Graph store returned {}: {}", status, message);
                last_error = Some(SnapshotError::Api {
                    status: status.as_u16(),
                    message,
                });
                continue;
            }

            if !status.is_success() {
                let message = response.text().await.unwrap_or_default();
                return Err(SnapshotError::Api {
                    status: status.as_u16(),
                    message,
                });
            }

            let tx: TxResponse = response.json().await.map_err(|e| {
                if e.is_timeout() {
                    SnapshotError::Timeout
                } else {
                    SnapshotError::Malformed(format!("unreadable transaction response: {e}"))
                }
            })?;

            if let Some(err) = tx.errors.into_iter().next() {
                return Err(SnapshotError::Api {
                    status: status.as_u16(),
                    message: format!("{}: {}", err.code, err.message),
                });
            }

            let rows: Vec<Vec<Value>> = tx
                .results
                .into_iter()
                .next()
                .map(|result| result.data.into_iter().map(|r| r.row).collect())
                .unwrap_or_default();

            debug!("Graph statement returned {} rows", rows.len());
            return Ok(rows);
        }

        Err(last_error.unwrap_or(SnapshotError::Timeout))
    }
}

#[async_trait]
impl GraphSnapshotProvider for GraphClient {
    async fn fetch_snapshot(&self) -> Result<GraphSnapshot, SnapshotError> {
        let rows = self.run(queries::DOMAIN_SKILLS_QUERY).await?;
        let domains = rows
            .into_iter()
            .map(domain_from_row)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(GraphSnapshot::new(domains))
    }

    async fn ping(&self) -> Result<(), SnapshotError> {
        self.run(queries::PING_QUERY).await.map(|_| ())
    }
}

/// `[job_name, [edge, ..]]` → `DomainNode`. Row order is preserved by the caller.
fn domain_from_row(row: Vec<Value>) -> Result<DomainNode, SnapshotError> {
    let mut cells = row.into_iter();
    let name = match cells.next() {
        Some(Value::String(name)) => name,
        other => {
            return Err(SnapshotError::Malformed(format!(
                "domain name must be a string, got {other:?}"
            )))
        }
    };
    let skills = match cells.next() {
        Some(Value::Array(edges)) => edges.into_iter().map(edge_from_value).collect(),
        Some(Value::Null) => Vec::new(),
        other => {
            return Err(SnapshotError::Malformed(format!(
                "skills of domain '{name}' must be a list, got {other:?}"
            )))
        }
    };
    Ok(DomainNode { name, skills })
}
