//! Multi-turn summarization - condenses the recent prompts into one query,
//! weighted toward the last prompt.

use anyhow::{anyhow, Result};
use std::sync::Arc;

use crate::llm::{ChatMessage, CompletionGateway};
use crate::templates;

pub struct QuestionSummarizer {
    llm: Arc<dyn CompletionGateway>,
    model: String,
}

impl QuestionSummarizer {
    pub fn new(llm: Arc<dyn CompletionGateway>, model: impl Into<String>) -> Self {
        Self {
            llm,
            model: model.into(),
        }
    }

    /// Summarize prompts already sorted in ascending epoch order (the
    /// validated request guarantees the ordering). An empty reply from the
    /// gateway is an error: the downstream search query would be useless.
    pub async fn summarize(&self, prompts: &[(i64, String)]) -> Result<String> {
        let messages = [
            ChatMessage::system(templates::SUMMARY_SYSTEM_PROMPT),
            ChatMessage::user(templates::build_summary_prompt(prompts)),
        ];
        let summary = self.llm.complete(&self.model, &messages).await?;
        let summary = summary.trim();
        if summary.is_empty() {
            return Err(anyhow!("completion returned an empty summary"));
        }
        Ok(summary.to_string())
    }
}
