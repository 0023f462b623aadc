use crate::config::configuration::JobSettings;
use crate::errors::job::JobError;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;
use tracing::instrument;

#[derive(Deserialize)]
struct GraphqlEnvelope<T> {
    data: Option<T>,
    #[serde(default)]
    errors: Vec<GraphqlErrorMessage>,
}

#[derive(Deserialize)]
struct GraphqlErrorMessage {
    message: String,
}

/// Minimal GraphQL-over-HTTP client used by the scheduled jobs.
#[derive(Debug, Clone)]
pub struct GraphqlClient {
    http: reqwest::Client,
    endpoint: String,
}

impl GraphqlClient {
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Result<Self, JobError> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            endpoint: endpoint.into(),
        })
    }

    pub fn from_settings(settings: &JobSettings) -> Result<Self, JobError> {
        Self::new(
            settings.graphql_endpoint.clone(),
            Duration::from_secs(settings.request_timeout_secs),
        )
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Posts `query` and decodes its `data` member. Any entry in `errors`
    /// turns the whole call into a [`JobError::GraphqlFailure`].
    #[instrument(name = "GraphQL call", skip(self, query, variables), fields(endpoint = %self.endpoint))]
    pub async fn execute<T: DeserializeOwned>(
        &self,
        query: &str,
        variables: serde_json::Value,
    ) -> Result<T, JobError> {
        let response = self
            .http
            .post(&self.endpoint)
            .json(&json!({ "query": query, "variables": variables }))
            .send()
            .await?
            .error_for_status()?;

        let envelope: GraphqlEnvelope<T> = response.json().await?;
        if !envelope.errors.is_empty() {
            let messages: Vec<String> = envelope.errors.into_iter().map(|e| e.message).collect();
            return Err(JobError::GraphqlFailure(messages.join("; ")));
        }
        envelope
            .data
            .ok_or_else(|| JobError::InvalidResponse("response carried no data".to_string()))
    }
}
