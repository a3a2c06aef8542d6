use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use talentscope::assessment::scoring::{
    HttpTextClient, ScoringError, TextUnderstanding, UnavailableTextService,
};
use talentscope::assessment::QuizScorer;
use talentscope::config::TextServiceConfig;
use talentscope::error::AppError;
use tracing::info;

#[derive(Clone)]
pub struct AppState {
    pub readiness: Arc<AtomicBool>,
    pub metrics: Arc<PrometheusHandle>,
    pub scorer: Arc<QuizScorer>,
}

/// Build the quiz scorer from configuration. Without an API key the scorer
/// runs degraded: free-text answers take the neutral fallback path instead
/// of calling out.
pub fn build_scorer(config: &TextServiceConfig) -> Result<QuizScorer, AppError> {
    let text: Arc<dyn TextUnderstanding> = if config.api_key.is_some() {
        let client = HttpTextClient::new(config.clone())
            .map_err(|err| AppError::from(ScoringError::from(err)))?;
        Arc::new(client)
    } else {
        info!("no text-service key configured; free-text scoring runs in fallback mode");
        Arc::new(UnavailableTextService)
    };

    Ok(QuizScorer::new(text))
}
