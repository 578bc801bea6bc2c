//! Question refinement - rewrites a follow-up into a self-contained question
//! using one matched prior turn. Only invoked after the history scan finds a
//! match; the orchestrator handles the no-match path.

use anyhow::Result;
use std::sync::Arc;

use crate::llm::{ChatMessage, CompletionGateway};
use crate::templates;
use crate::types::Turn;

pub struct QuestionRefiner {
    llm: Arc<dyn CompletionGateway>,
    model: String,
}

impl QuestionRefiner {
    pub fn new(llm: Arc<dyn CompletionGateway>, model: impl Into<String>) -> Self {
        Self {
            llm,
            model: model.into(),
        }
    }

    /// Produce the rewritten question, trimmed. The system instruction
    /// restricts the model to the rewrite alone, no explanation.
    pub async fn refine(&self, prior: &Turn, question: &str) -> Result<String> {
        let messages = [
            ChatMessage::system(templates::REFINE_SYSTEM_PROMPT),
            ChatMessage::user(templates::build_refine_prompt(prior, question)),
        ];
        let refined = self.llm.complete(&self.model, &messages).await?;
        Ok(refined.trim().to_string())
    }
}
