//! samvad-rag - conversational question answering over a domain-partitioned
//! corpus.
//!
//! The crate is a decision-and-orchestration pipeline: it classifies whether
//! the latest question is self-contained, scans prior turns for relevant
//! context, refines follow-up questions, resolves the retrieval service for
//! a domain, summarizes the recent prompts, and composes retrieval +
//! generation into a grounded answer. Completion, retrieval, the service
//! registry, and the audit store are consumed behind traits.

pub mod audit;
pub mod config;
pub mod error;
pub mod llm;
pub mod pipeline;
pub mod rag;
pub mod registry;
pub mod request;
pub mod search;
pub mod templates;
pub mod types;

// Re-export primary types for convenience
pub use audit::{AuditSink, DebugRecord, ErrorRecord, MemoryAuditSink};
pub use config::PipelineConfig;
pub use error::PipelineError;
pub use llm::{ChatMessage, ChatRole, CompletionGateway, ExternalCompletion};
pub use pipeline::RagPipeline;
pub use registry::{MemoryRegistry, RegistryEntry, ServiceRegistry, ServiceResolver};
pub use request::{RawRespondRequest, RespondRequest, ServiceKey};
pub use search::{ExternalRetrieval, RetrievalGateway};
pub use types::{Conversation, RagResponse, RefinementResult, Turn};
