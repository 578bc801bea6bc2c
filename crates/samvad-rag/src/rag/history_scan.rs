//! Bounded backward scan over conversation history.
//!
//! Probes the most recent turns first and stops at the first one the model
//! judges relevant - recency-biased, first-match-wins, no scoring across
//! candidates. A pure scan: history is never mutated.

use anyhow::Result;
use std::sync::Arc;

use super::parse_yes;
use crate::llm::{ChatMessage, CompletionGateway};
use crate::templates;
use crate::types::Turn;

pub struct HistoryScanner {
    llm: Arc<dyn CompletionGateway>,
    model: String,
    max_history_to_check: usize,
}

impl HistoryScanner {
    pub fn new(
        llm: Arc<dyn CompletionGateway>,
        model: impl Into<String>,
        max_history_to_check: usize,
    ) -> Self {
        Self {
            llm,
            model: model.into(),
            max_history_to_check,
        }
    }

    /// Find the most recent turn that provides context for the question.
    /// Probes at most `max_history_to_check` turns; `None` when the bound is
    /// exhausted without a match.
    pub async fn find_relevant<'a>(
        &self,
        question: &str,
        history: &'a [Turn],
    ) -> Result<Option<&'a Turn>> {
        for turn in history.iter().rev().take(self.max_history_to_check) {
            let messages = [
                ChatMessage::system(templates::RELEVANCE_SYSTEM_PROMPT),
                ChatMessage::user(templates::build_relevance_prompt(question, turn)),
            ];
            let reply = self.llm.complete(&self.model, &messages).await?;
            if parse_yes(&reply) {
                tracing::debug!(epoch_time = turn.epoch_time, "Relevant prior turn found");
                return Ok(Some(turn));
            }
        }
        tracing::debug!(
            checked = history.len().min(self.max_history_to_check),
            "No relevant prior turn within scan bound"
        );
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use parking_lot::Mutex;
    use std::collections::VecDeque;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct ScriptedReplies {
        replies: Mutex<VecDeque<&'static str>>,
        calls: AtomicUsize,
    }

    impl ScriptedReplies {
        fn new(replies: &[&'static str]) -> Self {
            Self {
                replies: Mutex::new(replies.iter().copied().collect()),
                calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl CompletionGateway for ScriptedReplies {
        async fn complete(&self, _model: &str, _messages: &[ChatMessage]) -> Result<String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.replies.lock().pop_front().unwrap_or("no").to_string())
        }
    }

    fn history(len: usize) -> Vec<Turn> {
        (1..=len as i64)
            .map(|i| Turn::new(i, format!("question {}", i), Some(format!("answer {}", i))))
            .collect()
    }

    #[tokio::test]
    async fn stops_at_first_relevant_turn() {
        // Most recent turn is irrelevant, second most recent matches.
        let llm = Arc::new(ScriptedReplies::new(&["no", "yes"]));
        let scanner = HistoryScanner::new(llm.clone(), "m", 5);
        let turns = history(4);

        let found = scanner.find_relevant("follow-up", &turns).await.unwrap();
        assert_eq!(found.unwrap().epoch_time, 3);
        assert_eq!(llm.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn never_probes_beyond_scan_bound() {
        let llm = Arc::new(ScriptedReplies::new(&["no"; 7]));
        let scanner = HistoryScanner::new(llm.clone(), "m", 5);
        let turns = history(7);

        let found = scanner.find_relevant("follow-up", &turns).await.unwrap();
        assert!(found.is_none());
        // 7 turns, bound of 5: the 2 oldest turns are never probed.
        assert_eq!(llm.calls.load(Ordering::SeqCst), 5);
    }

    #[tokio::test]
    async fn prefers_recent_over_older_relevant_turn() {
        // Both the 2nd and 4th most recent turns would match; the scan must
        // return the more recent one and never reach the older.
        let llm = Arc::new(ScriptedReplies::new(&["no", "yes", "yes", "yes"]));
        let scanner = HistoryScanner::new(llm.clone(), "m", 5);
        let turns = history(5);

        let found = scanner.find_relevant("follow-up", &turns).await.unwrap();
        assert_eq!(found.unwrap().epoch_time, 4);
        assert_eq!(llm.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn empty_history_yields_no_match_without_calls() {
        let llm = Arc::new(ScriptedReplies::new(&[]));
        let scanner = HistoryScanner::new(llm.clone(), "m", 5);

        let found = scanner.find_relevant("question", &[]).await.unwrap();
        assert!(found.is_none());
        assert_eq!(llm.calls.load(Ordering::SeqCst), 0);
    }
}
