//! Fixed prompt contracts for the pipeline's completion calls.
//!
//! These are deliberate constants, not configuration: downstream parsing
//! (the one-word yes/no classifiers, the rewrite-only refiner) depends on
//! their exact wording.

use serde_json::Value;

use crate::types::Turn;

/// Advisory returned when no relevant prior turn was found.
pub const MORE_CONTEXT_MESSAGE: &str = "Please provide more context in your question.";

pub const SUFFICIENCY_SYSTEM_PROMPT: &str = r#"You are a strict classifier. Decide whether the user's question can be answered on its own, without any earlier conversation. Reply with exactly one word: "yes" if the question is self-contained, otherwise "no". Do not explain."#;

pub const RELEVANCE_SYSTEM_PROMPT: &str = r#"You are a strict classifier. Given the user's current question and one earlier question/answer exchange, decide whether that exchange provides context needed to understand the current question. Reply with exactly one word: "yes" or "no". Do not explain."#;

pub const REFINE_SYSTEM_PROMPT: &str = r#"You rewrite follow-up questions so they stand on their own. Using the earlier exchange, produce a single self-contained version of the current question. Output only the rewritten question, with no explanation or preamble."#;

pub const SUMMARY_SYSTEM_PROMPT: &str = r#"Summarize the user's recent questions into one concise statement of what they want to know, giving the most weight to the final question. Output only the summary."#;

pub const ANSWER_SYSTEM_PROMPT: &str = r#"You answer the user's question using only the provided conversation summary and search results. Ground every claim in that material; if the answer is not there, say you do not know."#;

pub fn build_relevance_prompt(current_question: &str, prior: &Turn) -> String {
    format!(
        "Current question: {}\n\nEarlier question: {}\nEarlier answer: {}",
        current_question,
        prior.question,
        prior.answer.as_deref().unwrap_or("(no answer recorded)")
    )
}

pub fn build_refine_prompt(prior: &Turn, current_question: &str) -> String {
    format!(
        "Earlier question: {}\nEarlier answer: {}\n\nCurrent question: {}",
        prior.question,
        prior.answer.as_deref().unwrap_or("(no answer recorded)"),
        current_question
    )
}

/// Prompts must already be in ascending epoch order; the summary instruction
/// weights the final line.
pub fn build_summary_prompt(prompts: &[(i64, String)]) -> String {
    prompts
        .iter()
        .map(|(_, question)| question.as_str())
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn build_answer_prompt(summary: &str, results: &[Value], last_question: &str) -> String {
    let results_block = results
        .iter()
        .map(|row| row.to_string())
        .collect::<Vec<_>>()
        .join("\n");
    format!(
        "Conversation summary:\n{}\n\nSearch results:\n{}\n\nQuestion: {}",
        summary, results_block, last_question
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn summary_prompt_preserves_input_order() {
        let prompts = vec![
            (20, "B".to_string()),
            (100, "A".to_string()),
            (300, "C".to_string()),
        ];
        assert_eq!(build_summary_prompt(&prompts), "B\nA\nC");
    }

    #[test]
    fn answer_prompt_embeds_all_sections() {
        let rows = vec![json!({"chunk": "inflation is a rise in prices"})];
        let prompt = build_answer_prompt("summary text", &rows, "How does it affect savings?");
        assert!(prompt.contains("summary text"));
        assert!(prompt.contains("inflation is a rise in prices"));
        assert!(prompt.ends_with("How does it affect savings?"));
    }

    #[test]
    fn relevance_prompt_handles_unanswered_turn() {
        let prior = Turn::question_only(10, "What is GDP?");
        let prompt = build_relevance_prompt("And per capita?", &prior);
        assert!(prompt.contains("(no answer recorded)"));
    }
}
