// Backend trait for query execution
use crate::domain::query::QueryRequest;
use crate::domain::response::QueryResponse;
use async_trait::async_trait;

/// The injected request collaborator: one call per query batch. Transport,
/// sessions, and retries all live behind this seam.
#[async_trait]
pub trait QueryBackend: Send + Sync {
    async fn execute(&self, request: &QueryRequest) -> anyhow::Result<QueryResponse>;
}
