//! Retrieval gateway - semantic search over a named service.
//!
//! Result rows are implementation-defined and passed through verbatim as
//! JSON values; the pipeline never interprets their contents beyond
//! forwarding them to the answer generator.

use anyhow::Result;
use async_trait::async_trait;
use serde_json::Value;

pub mod external;

pub use external::ExternalRetrieval;

/// Core trait for retrieval providers.
#[async_trait]
pub trait RetrievalGateway: Send + Sync {
    /// Run a ranked search against a fully-qualified service name.
    async fn search(
        &self,
        service_name: &str,
        query: &str,
        columns: &[String],
        limit: usize,
    ) -> Result<Vec<Value>>;
}
