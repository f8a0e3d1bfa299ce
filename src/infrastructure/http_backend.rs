// HTTP backend client for the StableNet query endpoint
use crate::application::query_backend::QueryBackend;
use crate::domain::query::QueryRequest;
use crate::domain::response::QueryResponse;
use anyhow::{Context, Result};
use async_trait::async_trait;

#[derive(Debug, Clone)]
pub struct HttpQueryBackend {
    base_url: String,
}

impl HttpQueryBackend {
    pub fn new(base_url: String) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn query_url(&self) -> String {
        format!("{}/api/grafana/query", self.base_url)
    }
}

#[async_trait]
impl QueryBackend for HttpQueryBackend {
    async fn execute(&self, request: &QueryRequest) -> Result<QueryResponse> {
        let url = self.query_url();
        tracing::debug!("Executing batch of {} queries against {}", request.queries.len(), url);

        let client = reqwest::Client::new();
        let response = client
            .post(&url)
            .header("Accept", "application/json")
            .json(request)
            .send()
            .await
            .context("Failed to send request to StableNet backend")?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("StableNet query failed with status {}: {}", status, body);
        }

        let data = response
            .json::<QueryResponse>()
            .await
            .context("Failed to parse StableNet response")?;

        // Surface per-result backend errors as a failed batch
        if let Some(error) = data.results.values().find_map(|result| result.error.as_ref()) {
            anyhow::bail!("StableNet query error: {}", error);
        }

        Ok(data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_url_trims_trailing_slash() {
        let backend = HttpQueryBackend::new("https://stablenet.example/".to_string());
        assert_eq!(
            backend.query_url(),
            "https://stablenet.example/api/grafana/query"
        );
    }
}
