//! Pipeline orchestration.
//!
//! Two entry points over shared building blocks and injected gateways:
//! [`RagPipeline::respond`] runs validate -> resolve -> summarize ->
//! retrieve -> generate, and [`RagPipeline::refine_question`] runs
//! classify -> scan -> refine. Stages execute strictly in order because
//! later prompts embed earlier results; the first failing stage aborts the
//! run with no partial payload. Around both entry points the orchestrator
//! writes audit records: an error record on any failure, a debug record on
//! debug-enabled success. Audit writes are best-effort and never mask the
//! run's own outcome.

use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use std::time::Instant;
use uuid::Uuid;

use crate::audit::{AuditSink, DebugRecord, ErrorRecord};
use crate::config::PipelineConfig;
use crate::error::PipelineError;
use crate::llm::CompletionGateway;
use crate::rag::{
    HistoryScanner, QuestionRefiner, QuestionSummarizer, ResponseGenerator, SufficiencyClassifier,
};
use crate::registry::{ServiceRegistry, ServiceResolver};
use crate::request::{RawRespondRequest, RespondRequest};
use crate::search::RetrievalGateway;
use crate::templates;
use crate::types::{Conversation, RagResponse, RefinementResult};

/// Entry-point identifiers stamped on error records.
pub const PROC_RESPOND: &str = "rag_respond";
pub const PROC_REFINE: &str = "refine_question";

pub struct RagPipeline {
    config: PipelineConfig,
    retrieval: Arc<dyn RetrievalGateway>,
    resolver: ServiceResolver,
    audit: Arc<dyn AuditSink>,
    sufficiency: SufficiencyClassifier,
    scanner: HistoryScanner,
    refiner: QuestionRefiner,
    summarizer: QuestionSummarizer,
    generator: ResponseGenerator,
}

struct RespondRun {
    response: RagResponse,
    service: String,
    service_name: String,
    results: Vec<Value>,
    debug: bool,
}

impl RagPipeline {
    pub fn new(
        config: PipelineConfig,
        llm: Arc<dyn CompletionGateway>,
        retrieval: Arc<dyn RetrievalGateway>,
        registry: Arc<dyn ServiceRegistry>,
        audit: Arc<dyn AuditSink>,
    ) -> Self {
        let model = config.completion.model.clone();
        Self {
            sufficiency: SufficiencyClassifier::new(llm.clone(), model.clone()),
            scanner: HistoryScanner::new(
                llm.clone(),
                model.clone(),
                config.history.max_history_to_check,
            ),
            refiner: QuestionRefiner::new(llm.clone(), model.clone()),
            summarizer: QuestionSummarizer::new(llm.clone(), model.clone()),
            generator: ResponseGenerator::new(llm, model),
            resolver: ServiceResolver::new(registry),
            retrieval,
            audit,
            config,
        }
    }

    /// Answer the caller's latest question: resolve the retrieval service,
    /// summarize the recent prompts, search, and generate a grounded answer.
    pub async fn respond(&self, raw: &RawRespondRequest) -> Result<RagResponse, PipelineError> {
        let started = Instant::now();
        match self.respond_stages(raw).await {
            Ok(run) => {
                if run.debug {
                    let record = DebugRecord {
                        id: Uuid::new_v4(),
                        service: run.service,
                        service_name: run.service_name,
                        input: snapshot(raw),
                        question_summary: run.response.question_summary.clone(),
                        retrieval_results: run.results,
                        llm_response: run.response.llm_response.clone(),
                        elapsed_ms: started.elapsed().as_millis() as u64,
                        created_at: chrono::Utc::now(),
                    };
                    if let Err(err) = self.audit.record_debug(record).await {
                        tracing::warn!(error = %err, "Debug record write failed, continuing");
                    }
                }
                Ok(run.response)
            }
            Err(err) => {
                self.capture_error(PROC_RESPOND, &err, snapshot(raw)).await;
                Err(err)
            }
        }
    }

    async fn respond_stages(&self, raw: &RawRespondRequest) -> Result<RespondRun, PipelineError> {
        let request = RespondRequest::validate(raw)?;
        tracing::debug!(
            service = %request.service,
            prompt_count = request.prompts.len(),
            "Respond input validated"
        );

        let service_name = self.resolver.resolve(&request.service).await?;
        tracing::debug!(service_name = %service_name, "Retrieval service resolved");

        let summary = self
            .summarizer
            .summarize(&request.prompts)
            .await
            .map_err(PipelineError::completion)?;

        let results = self
            .retrieval
            .search(
                &service_name,
                &summary,
                &self.config.retrieval.columns,
                self.config.retrieval.limit,
            )
            .await
            .map_err(PipelineError::retrieval)?;
        if results.is_empty() {
            return Err(PipelineError::Retrieval(
                "search returned no results".to_string(),
            ));
        }

        let answer = self
            .generator
            .generate(&summary, &results, request.last_question())
            .await
            .map_err(PipelineError::completion)?;

        Ok(RespondRun {
            response: RagResponse {
                llm_response: answer,
                question_summary: summary,
            },
            service: request.service.to_string(),
            service_name,
            results,
            debug: request.debug,
        })
    }

    /// Rewrite the current question into a self-contained one, pulling
    /// context from the most recent relevant prior turn when needed.
    pub async fn refine_question(
        &self,
        conversation: &Conversation,
    ) -> Result<RefinementResult, PipelineError> {
        match self.refine_stages(conversation).await {
            Ok(result) => Ok(result),
            Err(err) => {
                self.capture_error(PROC_REFINE, &err, snapshot(conversation))
                    .await;
                Err(err)
            }
        }
    }

    async fn refine_stages(
        &self,
        conversation: &Conversation,
    ) -> Result<RefinementResult, PipelineError> {
        let question = conversation.current_question.question.as_str();

        let sufficient = self
            .sufficiency
            .is_self_contained(question)
            .await
            .map_err(PipelineError::completion)?;
        if sufficient {
            return Ok(RefinementResult {
                refined_question: question.to_string(),
                refined: false,
                message: None,
            });
        }

        let matched = self
            .scanner
            .find_relevant(question, &conversation.history)
            .await
            .map_err(PipelineError::completion)?;

        match matched {
            Some(turn) => {
                let refined = self
                    .refiner
                    .refine(turn, question)
                    .await
                    .map_err(PipelineError::completion)?;
                Ok(RefinementResult {
                    refined_question: refined,
                    refined: true,
                    message: None,
                })
            }
            None => Ok(RefinementResult {
                refined_question: question.to_string(),
                refined: false,
                message: Some(templates::MORE_CONTEXT_MESSAGE.to_string()),
            }),
        }
    }

    async fn capture_error(&self, procedure: &str, err: &PipelineError, input: Value) {
        tracing::error!(procedure, error = %err, "Pipeline stage failed");
        let record = ErrorRecord::new(procedure, err.to_string(), input);
        if let Err(audit_err) = self.audit.record_error(record).await {
            tracing::warn!(error = %audit_err, "Error record write failed; propagating the original error");
        }
    }
}

fn snapshot<T: Serialize>(value: &T) -> Value {
    serde_json::to_value(value).unwrap_or(Value::Null)
}
