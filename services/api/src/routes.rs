use crate::infra::AppState;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Extension;
use axum::Json;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::json;
use talentscope::assessment::{
    build_computed_profile, build_confidence_profile, evaluate_state, identify_gaps, AgentAction,
    AgentState, ComputedProfile, ConfidenceProfile, ConfidenceSource, DimensionGap, ProfileInputs,
    QuizAnswer, QuizQuestion, QuizScoringOutcome, DEFAULT_TARGET_CONFIDENCE,
};
use talentscope::error::AppError;

#[derive(Debug, Deserialize)]
pub struct QuizScoreRequest {
    pub questions: Vec<QuizQuestion>,
    pub answers: Vec<QuizAnswer>,
}

#[derive(Debug, Deserialize)]
pub struct ProfileBuildRequest {
    /// Raw evidence atoms. When present the response carries the derived
    /// confidence profile and open gaps alongside the computed profile.
    #[serde(default)]
    pub evidence: Vec<ConfidenceSource>,
    #[serde(flatten)]
    pub inputs: ProfileInputs,
}

#[derive(Debug, Serialize)]
pub struct ProfileBuildResponse {
    pub profile: ComputedProfile,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confidence: Option<ConfidenceProfile>,
    pub gaps: Vec<DimensionGap>,
}

#[derive(Debug, Serialize)]
pub struct ActionPlanResponse {
    pub actions: Vec<AgentAction>,
}

pub fn router(state: AppState) -> axum::Router {
    axum::Router::new()
        .route("/health", axum::routing::get(healthcheck))
        .route("/ready", axum::routing::get(readiness_endpoint))
        .route("/metrics", axum::routing::get(metrics_endpoint))
        .route(
            "/api/v1/quiz/score",
            axum::routing::post(quiz_score_endpoint),
        )
        .route(
            "/api/v1/profile/build",
            axum::routing::post(profile_build_endpoint),
        )
        .route(
            "/api/v1/agent/actions",
            axum::routing::post(agent_actions_endpoint),
        )
        .layer(Extension(state))
}

pub async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

pub async fn quiz_score_endpoint(
    Extension(state): Extension<AppState>,
    Json(payload): Json<QuizScoreRequest>,
) -> Result<Json<QuizScoringOutcome>, AppError> {
    // Scoring is synchronous and may hold a thread on the text backend's
    // HTTP round trip, so it must not run on a serving worker.
    let scorer = state.scorer.clone();
    let outcome = tokio::task::spawn_blocking(move || {
        scorer.score_submission(&payload.questions, &payload.answers)
    })
    .await
    .map_err(|err| AppError::Io(std::io::Error::new(std::io::ErrorKind::Other, err)))??;
    Ok(Json(outcome))
}

pub async fn profile_build_endpoint(
    Json(payload): Json<ProfileBuildRequest>,
) -> Json<ProfileBuildResponse> {
    let ProfileBuildRequest {
        evidence,
        mut inputs,
    } = payload;

    let (confidence, gaps) = if evidence.is_empty() {
        (None, Vec::new())
    } else {
        let profile = build_confidence_profile(&evidence, Utc::now());
        let gaps = identify_gaps(&profile, DEFAULT_TARGET_CONFIDENCE);
        // Derived confidences feed the baseline blend unless the caller
        // already supplied a value for the dimension.
        for (dimension, entry) in &profile.dimensions {
            inputs
                .dimension_confidence
                .entry(dimension.clone())
                .or_insert(entry.confidence);
        }
        (Some(profile), gaps)
    };

    let profile = build_computed_profile(&inputs);

    Json(ProfileBuildResponse {
        profile,
        confidence,
        gaps,
    })
}

pub async fn agent_actions_endpoint(
    Json(state): Json<AgentState>,
) -> Json<ActionPlanResponse> {
    Json(ActionPlanResponse {
        actions: evaluate_state(&state),
    })
}
