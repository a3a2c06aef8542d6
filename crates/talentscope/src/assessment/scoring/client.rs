//! HTTP-backed implementation of [`TextUnderstanding`]. Built on the
//! blocking reqwest client so the synchronous scoring pipeline never sees
//! async plumbing; async callers must hop onto a blocking thread first
//! (the HTTP service wraps scoring in `spawn_blocking`). Enforces the BYOK
//! request budget before any network traffic happens.

use std::sync::atomic::{AtomicU32, Ordering};

use serde_json::json;

use super::freetext::{
    FreetextBatchRequest, FreetextBatchResponse, TextServiceError, TextUnderstanding,
};
use crate::config::TextServiceConfig;

const SCORING_INSTRUCTIONS: &str = "You grade free-text career-assessment answers. \
For each item, score how strongly the answer evidences the listed dimensions on a 0-100 scale. \
Only use dimension names from allowed_dimensions. \
Respond with strict JSON of the shape \
{\"results\":[{\"question_id\":\"...\",\"dimension_scores\":[{\"dimension\":\"...\",\"score\":0,\"rationale\":\"...\",\"confidence\":0.0}]}]}";

pub struct HttpTextClient {
    http: reqwest::blocking::Client,
    config: TextServiceConfig,
    requests_made: AtomicU32,
}

impl HttpTextClient {
    pub fn new(config: TextServiceConfig) -> Result<Self, TextServiceError> {
        let http = reqwest::blocking::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|err| TextServiceError::Runtime(err.to_string()))?;

        Ok(Self {
            http,
            config,
            requests_made: AtomicU32::new(0),
        })
    }

    fn check_budget(&self) -> Result<(), TextServiceError> {
        if let Some(budget) = self.config.request_budget {
            let spent = self.requests_made.load(Ordering::Acquire);
            if spent >= budget {
                return Err(TextServiceError::BudgetExhausted { spent, budget });
            }
        }
        self.requests_made.fetch_add(1, Ordering::AcqRel);
        Ok(())
    }
}

impl std::fmt::Debug for HttpTextClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpTextClient")
            .field("endpoint", &self.config.endpoint)
            .field("model", &self.config.model)
            .finish_non_exhaustive()
    }
}

impl TextUnderstanding for HttpTextClient {
    fn score_batch(
        &self,
        request: &FreetextBatchRequest,
    ) -> Result<FreetextBatchResponse, TextServiceError> {
        let api_key = self
            .config
            .api_key
            .as_deref()
            .ok_or_else(|| TextServiceError::Backend("no API key configured".to_string()))?;

        self.check_budget()?;

        let payload = serde_json::to_string(request)
            .map_err(|err| TextServiceError::Runtime(err.to_string()))?;
        let body = json!({
            "model": self.config.model,
            "response_format": { "type": "json_object" },
            "messages": [
                { "role": "system", "content": SCORING_INSTRUCTIONS },
                { "role": "user", "content": payload },
            ],
        });

        let envelope: serde_json::Value = self
            .http
            .post(&self.config.endpoint)
            .bearer_auth(api_key)
            .json(&body)
            .send()
            .and_then(|response| response.error_for_status())
            .and_then(|response| response.json())
            .map_err(|err| TextServiceError::Backend(err.to_string()))?;

        let content = envelope
            .pointer("/choices/0/message/content")
            .and_then(|value| value.as_str())
            .ok_or_else(|| {
                TextServiceError::Malformed("response carried no message content".to_string())
            })?;

        serde_json::from_str::<FreetextBatchResponse>(content)
            .map_err(|err| TextServiceError::Malformed(err.to_string()))
    }
}
