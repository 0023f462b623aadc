use super::client::GraphqlClient;
use super::log_file::LogFile;
use crate::errors::job::JobError;
use chrono::{DateTime, Local};
use serde::Deserialize;
use serde_json::json;
use tracing::instrument;

const HELLO_QUERY: &str = "query Heartbeat { hello }";

#[derive(Deserialize)]
struct HelloData {
    hello: String,
}

/// Writes the liveness line and, when a client is given, probes the API.
///
/// A failed probe is logged but never fails the heartbeat; only a log write
/// failure does.
#[instrument(name = "CRM heartbeat", skip_all, fields(log = %log.path().display()))]
pub async fn log_crm_heartbeat(
    probe: Option<&GraphqlClient>,
    log: &LogFile,
    now: DateTime<Local>,
) -> Result<(), JobError> {
    let timestamp = now.format("%d/%m/%Y-%H:%M:%S");
    log.append(&format!("{} CRM is alive", timestamp))?;

    let Some(client) = probe else {
        return Ok(());
    };
    match client.execute::<HelloData>(HELLO_QUERY, json!({})).await {
        Ok(data) => log.append(&format!(
            "{} GraphQL endpoint responsive: {}",
            timestamp, data.hello
        ))?,
        Err(err) => {
            tracing::warn!(endpoint = client.endpoint(), error = %err, "GraphQL probe failed");
            log.append(&format!("{} GraphQL endpoint error: {}", timestamp, err))?;
        }
    }
    Ok(())
}
