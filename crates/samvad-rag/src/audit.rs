//! Append-only audit records, written as side effects of a pipeline run.
//!
//! Records are write-once and never read back by the pipeline. Sink
//! failures must be treated as best-effort by callers: the orchestrator
//! logs and swallows them, so they can never mask the run's own outcome.

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

/// Captured when a debug-enabled run reaches completion.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DebugRecord {
    pub id: Uuid,
    /// The service identifier from the request (numeric id or domain).
    pub service: String,
    /// The resolved fully-qualified retrieval service name.
    pub service_name: String,
    pub input: Value,
    pub question_summary: String,
    pub retrieval_results: Vec<Value>,
    pub llm_response: String,
    pub elapsed_ms: u64,
    pub created_at: DateTime<Utc>,
}

/// Captured when a run fails at any stage.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorRecord {
    pub id: Uuid,
    /// Entry-point identifier, e.g. "rag_respond".
    pub procedure: String,
    pub message: String,
    pub input: Value,
    pub created_at: DateTime<Utc>,
}

impl ErrorRecord {
    pub fn new(procedure: impl Into<String>, message: impl Into<String>, input: Value) -> Self {
        Self {
            id: Uuid::new_v4(),
            procedure: procedure.into(),
            message: message.into(),
            input,
            created_at: Utc::now(),
        }
    }
}

/// Append access to the audit store.
#[async_trait]
pub trait AuditSink: Send + Sync {
    async fn record_debug(&self, record: DebugRecord) -> Result<()>;

    async fn record_error(&self, record: ErrorRecord) -> Result<()>;
}

/// Embedded in-memory sink, for local use and tests.
#[derive(Default)]
pub struct MemoryAuditSink {
    debug_records: RwLock<Vec<DebugRecord>>,
    error_records: RwLock<Vec<ErrorRecord>>,
}

impl MemoryAuditSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn debug_records(&self) -> Vec<DebugRecord> {
        self.debug_records.read().clone()
    }

    pub fn error_records(&self) -> Vec<ErrorRecord> {
        self.error_records.read().clone()
    }
}

#[async_trait]
impl AuditSink for MemoryAuditSink {
    async fn record_debug(&self, record: DebugRecord) -> Result<()> {
        self.debug_records.write().push(record);
        Ok(())
    }

    async fn record_error(&self, record: ErrorRecord) -> Result<()> {
        self.error_records.write().push(record);
        Ok(())
    }
}
