//! Grounded answer generation from the summary, the retrieved rows, and the
//! last question.

use anyhow::{anyhow, Result};
use serde_json::Value;
use std::sync::Arc;

use crate::llm::{ChatMessage, CompletionGateway};
use crate::templates;

pub struct ResponseGenerator {
    llm: Arc<dyn CompletionGateway>,
    model: String,
}

impl ResponseGenerator {
    pub fn new(llm: Arc<dyn CompletionGateway>, model: impl Into<String>) -> Self {
        Self {
            llm,
            model: model.into(),
        }
    }

    pub async fn generate(
        &self,
        summary: &str,
        results: &[Value],
        last_question: &str,
    ) -> Result<String> {
        let messages = [
            ChatMessage::system(templates::ANSWER_SYSTEM_PROMPT),
            ChatMessage::user(templates::build_answer_prompt(summary, results, last_question)),
        ];
        let answer = self.llm.complete(&self.model, &messages).await?;
        let answer = answer.trim();
        if answer.is_empty() {
            return Err(anyhow!("completion returned an empty answer"));
        }
        Ok(answer.to_string())
    }
}
