use serde::{Deserialize, Serialize};
use std::path::Path;

/// Pipeline configuration. Model ids, retrieval parameters, and scan bounds
/// live here instead of being scattered across call sites.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    pub completion: CompletionConfig,
    pub retrieval: RetrievalConfig,
    pub history: HistoryConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletionConfig {
    /// Model id passed on every completion call.
    pub model: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrievalConfig {
    /// Column projection requested from the retrieval service.
    pub columns: Vec<String>,
    /// Result rows requested per search.
    pub limit: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryConfig {
    /// Upper bound on prior turns probed by the relevance scan.
    pub max_history_to_check: usize,
}

impl PipelineConfig {
    /// Validate config values, returning errors for clearly broken configurations.
    pub fn validate(&self) -> Result<(), String> {
        if self.completion.model.trim().is_empty() {
            return Err("completion.model must be non-empty".into());
        }
        if self.retrieval.columns.is_empty() {
            return Err("retrieval.columns must contain at least one column".into());
        }
        if self.retrieval.limit == 0 {
            return Err("retrieval.limit must be > 0".into());
        }
        if self.history.max_history_to_check == 0 {
            return Err("history.max_history_to_check must be > 0".into());
        }
        Ok(())
    }

    /// Load config from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self, String> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read config file: {}", e))?;
        let config: Self =
            serde_json::from_str(&content).map_err(|e| format!("Failed to parse config: {}", e))?;
        config.validate()?;
        Ok(config)
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            completion: CompletionConfig {
                model: "llama3.1-70b".to_string(),
            },
            retrieval: RetrievalConfig {
                columns: vec![
                    "chunk".to_string(),
                    "source".to_string(),
                    "category".to_string(),
                ],
                limit: 3,
            },
            history: HistoryConfig {
                max_history_to_check: 5,
            },
        }
    }
}
