//! Context sufficiency - decides whether a question stands on its own.

use anyhow::Result;
use std::sync::Arc;

use super::parse_yes;
use crate::llm::{ChatMessage, CompletionGateway};
use crate::templates;

pub struct SufficiencyClassifier {
    llm: Arc<dyn CompletionGateway>,
    model: String,
}

impl SufficiencyClassifier {
    pub fn new(llm: Arc<dyn CompletionGateway>, model: impl Into<String>) -> Self {
        Self {
            llm,
            model: model.into(),
        }
    }

    /// True iff the model judges the question answerable without prior turns.
    pub async fn is_self_contained(&self, question: &str) -> Result<bool> {
        let messages = [
            ChatMessage::system(templates::SUFFICIENCY_SYSTEM_PROMPT),
            ChatMessage::user(question),
        ];
        let reply = self.llm.complete(&self.model, &messages).await?;
        let sufficient = parse_yes(&reply);
        tracing::debug!(sufficient, "Context sufficiency classified");
        Ok(sufficient)
    }
}
