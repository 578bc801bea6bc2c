//! Respond entry-point input and boundary validation.
//!
//! Callers submit a loosely-shaped [`RawRespondRequest`]; it is validated
//! exactly once into a [`RespondRequest`] and every internal component
//! consumes only the typed form. Nothing downstream re-checks these rules.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

use crate::error::PipelineError;

/// Hard cap on the number of prompts accepted per invocation.
pub const MAX_PROMPTS: usize = 20;

/// Input to the respond entry point, as received from the caller.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawRespondRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub domain_name: Option<String>,
    #[serde(default)]
    pub latest_prompts: HashMap<String, String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub debug: Option<bool>,
}

/// How the caller identified the retrieval service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServiceKey {
    Id(i64),
    Domain(String),
}

impl fmt::Display for ServiceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ServiceKey::Id(id) => write!(f, "{}", id),
            ServiceKey::Domain(domain) => write!(f, "{}", domain),
        }
    }
}

/// Validated respond input. `prompts` is in ascending epoch order.
#[derive(Debug, Clone)]
pub struct RespondRequest {
    pub service: ServiceKey,
    pub prompts: Vec<(i64, String)>,
    pub debug: bool,
}

impl RespondRequest {
    /// Validate a raw request, rejecting malformed input before any external
    /// call. A `serviceId` takes precedence over `domainName` when both are
    /// supplied.
    pub fn validate(raw: &RawRespondRequest) -> Result<Self, PipelineError> {
        let service = match (raw.service_id, raw.domain_name.as_deref()) {
            (Some(id), _) => {
                if id <= 0 {
                    return Err(PipelineError::validation(
                        "serviceId must be a positive integer",
                    ));
                }
                ServiceKey::Id(id)
            }
            (None, Some(domain)) => {
                let domain = domain.trim();
                if domain.is_empty() {
                    return Err(PipelineError::validation("domainName must be non-empty"));
                }
                ServiceKey::Domain(domain.to_string())
            }
            (None, None) => {
                return Err(PipelineError::validation(
                    "either serviceId or domainName is required",
                ));
            }
        };

        if raw.latest_prompts.is_empty() {
            return Err(PipelineError::validation(
                "latestPrompts must contain at least one entry",
            ));
        }
        if raw.latest_prompts.len() > MAX_PROMPTS {
            return Err(PipelineError::validation(format!(
                "latestPrompts is capped at {} entries",
                MAX_PROMPTS
            )));
        }

        let mut prompts = Vec::with_capacity(raw.latest_prompts.len());
        for (key, value) in &raw.latest_prompts {
            let epoch: i64 = key.trim().parse().map_err(|_| {
                PipelineError::validation(format!(
                    "latestPrompts key '{}' is not a numeric epoch",
                    key
                ))
            })?;
            if epoch <= 0 {
                return Err(PipelineError::validation(format!(
                    "latestPrompts key '{}' must be a positive epoch",
                    key
                )));
            }
            let value = value.trim();
            if value.is_empty() {
                return Err(PipelineError::validation(format!(
                    "latestPrompts value for key '{}' is blank",
                    key
                )));
            }
            prompts.push((epoch, value.to_string()));
        }
        prompts.sort_by_key(|(epoch, _)| *epoch);

        Ok(Self {
            service,
            prompts,
            debug: raw.debug.unwrap_or(false),
        })
    }

    /// The prompt with the numerically largest epoch key.
    pub fn last_question(&self) -> &str {
        // validate() guarantees at least one entry and ascending order
        self.prompts
            .last()
            .map(|(_, question)| question.as_str())
            .unwrap_or_default()
    }
}
