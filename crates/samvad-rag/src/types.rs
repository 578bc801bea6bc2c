use serde::{Deserialize, Serialize};

/// One question/answer exchange in a conversation. Immutable once recorded;
/// `epoch_time` is the ordering key.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Turn {
    pub epoch_time: i64,
    pub question: String,
    pub answer: Option<String>,
}

impl Turn {
    pub fn new(epoch_time: i64, question: impl Into<String>, answer: Option<String>) -> Self {
        Self {
            epoch_time,
            question: question.into(),
            answer,
        }
    }

    /// An unanswered question, as submitted by the caller.
    pub fn question_only(epoch_time: i64, question: impl Into<String>) -> Self {
        Self::new(epoch_time, question, None)
    }
}

/// A multi-turn conversation as supplied by the caller. The pipeline only
/// reads it; history is append-only from the caller's side.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Conversation {
    pub conversation_id: String,
    pub history: Vec<Turn>,
    pub current_question: Turn,
}

/// Success payload of the respond entry point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RagResponse {
    pub llm_response: String,
    pub question_summary: String,
}

/// Outcome of the refine-question entry point. `refined` is false both when
/// the question was already self-contained and when no relevant prior turn
/// was found; the advisory `message` distinguishes the latter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefinementResult {
    pub refined_question: String,
    pub refined: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}
