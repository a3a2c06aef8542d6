//! Contract with the external text-understanding service that grades
//! free-text quiz answers. One batched request per scoring submission.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt::Debug;
use tracing::debug;

/// Batched request covering every free-text answer in a submission, plus
/// the whitelist of dimension names the service may score against.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FreetextBatchRequest {
    pub items: Vec<FreetextItem>,
    pub allowed_dimensions: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FreetextItem {
    pub question_id: String,
    pub prompt: String,
    pub dimension: String,
    pub answer: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FreetextBatchResponse {
    pub results: Vec<FreetextQuestionScores>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FreetextQuestionScores {
    pub question_id: String,
    pub dimension_scores: Vec<FreetextDimensionScore>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FreetextDimensionScore {
    pub dimension: String,
    pub score: u8,
    pub rationale: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
}

/// Failures from the text-understanding boundary. Everything except budget
/// exhaustion is recoverable through the neutral-score fallback.
#[derive(Debug, thiserror::Error)]
pub enum TextServiceError {
    #[error("text service call failed: {0}")]
    Backend(String),
    #[error("text service returned malformed output: {0}")]
    Malformed(String),
    #[error("text service runtime unavailable: {0}")]
    Runtime(String),
    #[error("text service request budget exhausted ({spent}/{budget} requests used)")]
    BudgetExhausted { spent: u32, budget: u32 },
}

impl TextServiceError {
    /// Budget exhaustion is a billing boundary and must surface to the
    /// caller; every other failure downgrades to the neutral fallback.
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, Self::BudgetExhausted { .. })
    }
}

/// Abstraction over the external service so scoring stays testable and the
/// pipeline keeps working when no credential is configured.
pub trait TextUnderstanding: Debug + Send + Sync {
    fn score_batch(&self, request: &FreetextBatchRequest)
        -> Result<FreetextBatchResponse, TextServiceError>;
}

/// Stand-in used when no API key is configured; every free-text answer then
/// takes the neutral fallback path.
#[derive(Debug, Default, Clone, Copy)]
pub struct UnavailableTextService;

impl TextUnderstanding for UnavailableTextService {
    fn score_batch(
        &self,
        _request: &FreetextBatchRequest,
    ) -> Result<FreetextBatchResponse, TextServiceError> {
        Err(TextServiceError::Backend(
            "text-understanding service is not configured".to_string(),
        ))
    }
}

/// Drop dimension names outside the whitelist rather than failing the batch.
pub(crate) fn filter_whitelist(
    mut response: FreetextBatchResponse,
    allowed: &BTreeSet<String>,
) -> FreetextBatchResponse {
    for result in &mut response.results {
        result.dimension_scores.retain(|entry| {
            let keep = allowed.contains(&entry.dimension);
            if !keep {
                debug!(
                    dimension = %entry.dimension,
                    question = %result.question_id,
                    "dropping out-of-whitelist dimension from text service response"
                );
            }
            keep
        });
    }
    response
}
