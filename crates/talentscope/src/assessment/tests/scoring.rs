use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use crate::assessment::scoring::{
    AnswerValue, FreetextBatchRequest, FreetextBatchResponse, FreetextDimensionScore,
    FreetextQuestionScores, HttpTextClient, QuestionKind, QuizAnswer, QuizQuestion, QuizScorer,
    ScoringError, TextServiceError, TextUnderstanding, UnavailableTextService,
};
use crate::config::TextServiceConfig;

fn unreachable_backend() -> TextServiceConfig {
    TextServiceConfig {
        endpoint: "http://127.0.0.1:9/v1/chat/completions".to_string(),
        model: "test-model".to_string(),
        api_key: Some("sk-test".to_string()),
        request_budget: None,
        timeout: Duration::from_millis(250),
    }
}

#[derive(Debug)]
struct CannedTextService {
    response: FreetextBatchResponse,
}

impl TextUnderstanding for CannedTextService {
    fn score_batch(
        &self,
        _request: &FreetextBatchRequest,
    ) -> Result<FreetextBatchResponse, TextServiceError> {
        Ok(self.response.clone())
    }
}

#[derive(Debug)]
struct ExhaustedTextService;

impl TextUnderstanding for ExhaustedTextService {
    fn score_batch(
        &self,
        _request: &FreetextBatchRequest,
    ) -> Result<FreetextBatchResponse, TextServiceError> {
        Err(TextServiceError::BudgetExhausted { spent: 5, budget: 5 })
    }
}

fn multiple_choice(id: &str, dimension: &str) -> QuizQuestion {
    let mut rubric = BTreeMap::new();
    rubric.insert("strongly_agree".to_string(), 90);
    rubric.insert("neutral".to_string(), 50);
    rubric.insert("strongly_disagree".to_string(), 10);
    QuizQuestion {
        id: id.to_string(),
        kind: QuestionKind::MultipleChoice,
        prompt: "I enjoy building physical things.".to_string(),
        dimension: dimension.to_string(),
        scoring_rubric: rubric,
        options: vec![
            "strongly_agree".to_string(),
            "neutral".to_string(),
            "strongly_disagree".to_string(),
        ],
        slider_min: None,
        slider_max: None,
    }
}

fn slider(id: &str, dimension: &str) -> QuizQuestion {
    QuizQuestion {
        id: id.to_string(),
        kind: QuestionKind::Slider,
        prompt: "How much does detailed planning energize you?".to_string(),
        dimension: dimension.to_string(),
        scoring_rubric: BTreeMap::new(),
        options: Vec::new(),
        slider_min: Some(1.0),
        slider_max: Some(5.0),
    }
}

fn freetext(id: &str, dimension: &str) -> QuizQuestion {
    QuizQuestion {
        id: id.to_string(),
        kind: QuestionKind::Freetext,
        prompt: "Describe a project you are proud of.".to_string(),
        dimension: dimension.to_string(),
        scoring_rubric: BTreeMap::new(),
        options: Vec::new(),
        slider_min: None,
        slider_max: None,
    }
}

fn choice(question_id: &str, value: &str) -> QuizAnswer {
    QuizAnswer {
        question_id: question_id.to_string(),
        answer: AnswerValue::Text(value.to_string()),
    }
}

fn number(question_id: &str, value: f64) -> QuizAnswer {
    QuizAnswer {
        question_id: question_id.to_string(),
        answer: AnswerValue::Number(value),
    }
}

#[test]
fn structured_answers_score_without_the_text_service() {
    let scorer = QuizScorer::new(Arc::new(UnavailableTextService));
    let questions = vec![
        multiple_choice("q1", "Realistic"),
        slider("q2", "Conventional"),
    ];
    let answers = vec![choice("q1", "strongly_agree"), number("q2", 3.0)];

    let outcome = scorer
        .score_submission(&questions, &answers)
        .expect("structured scoring succeeds");

    assert_eq!(outcome.scores.len(), 2);
    assert_eq!(outcome.dimension_summary.get("Realistic"), Some(&90));
    assert_eq!(outcome.dimension_summary.get("Conventional"), Some(&50));
}

#[test]
fn failed_freetext_scoring_falls_back_to_neutral() {
    let scorer = QuizScorer::new(Arc::new(UnavailableTextService));
    let questions = vec![freetext("q1", "communication")];
    let answers = vec![choice("q1", "I rebuilt our team's onboarding docs.")];

    let outcome = scorer
        .score_submission(&questions, &answers)
        .expect("fallback keeps the pipeline alive");

    assert_eq!(outcome.scores.len(), 1);
    let atom = &outcome.scores[0];
    assert_eq!(atom.score, 50);
    assert_eq!(atom.confidence, 0.4);
    assert_eq!(atom.dimension, "communication");
    assert!(outcome.dimension_summary.contains_key("communication"));
}

#[tokio::test]
async fn http_client_reports_backend_errors_when_driven_from_a_server_runtime() {
    let client = HttpTextClient::new(unreachable_backend()).expect("client builds");
    let request = FreetextBatchRequest {
        items: Vec::new(),
        allowed_dimensions: vec!["communication".to_string()],
    };

    // Mirrors the HTTP service: the runtime stays responsive while the
    // scoring call blocks on a worker thread.
    let result = tokio::task::spawn_blocking(move || client.score_batch(&request))
        .await
        .expect("blocking task completes");

    match result {
        Err(TextServiceError::Backend(_)) => {}
        other => panic!("expected a recoverable backend error, got {other:?}"),
    }
}

#[test]
fn budget_exhaustion_is_a_hard_failure() {
    let scorer = QuizScorer::new(Arc::new(ExhaustedTextService));
    let questions = vec![freetext("q1", "communication")];
    let answers = vec![choice("q1", "some answer")];

    let result = scorer.score_submission(&questions, &answers);

    assert!(matches!(
        result,
        Err(ScoringError::TextService(
            TextServiceError::BudgetExhausted { .. }
        ))
    ));
}

#[test]
fn text_service_results_become_weighted_atoms() {
    let service = CannedTextService {
        response: FreetextBatchResponse {
            results: vec![FreetextQuestionScores {
                question_id: "q1".to_string(),
                dimension_scores: vec![
                    FreetextDimensionScore {
                        dimension: "communication".to_string(),
                        score: 80,
                        rationale: "clear structured narrative".to_string(),
                        confidence: Some(0.9),
                    },
                    FreetextDimensionScore {
                        dimension: "pyromancy".to_string(),
                        score: 99,
                        rationale: "not a real dimension".to_string(),
                        confidence: Some(0.9),
                    },
                ],
            }],
        },
    };
    let scorer = QuizScorer::new(Arc::new(service));
    let questions = vec![freetext("q1", "communication")];
    let answers = vec![choice("q1", "I led the migration writeup.")];

    let outcome = scorer
        .score_submission(&questions, &answers)
        .expect("scoring succeeds");

    // The out-of-whitelist dimension is dropped, not fatal.
    assert_eq!(outcome.scores.len(), 1);
    assert_eq!(outcome.scores[0].dimension, "communication");
    assert_eq!(outcome.scores[0].score, 80);
    assert_eq!(outcome.scores[0].weight, 0.8);
}

#[test]
fn unanswered_question_left_out_of_results_gets_the_fallback() {
    let service = CannedTextService {
        response: FreetextBatchResponse { results: vec![] },
    };
    let scorer = QuizScorer::new(Arc::new(service));
    let questions = vec![freetext("q1", "creativity")];
    let answers = vec![choice("q1", "an answer the service never scored")];

    let outcome = scorer
        .score_submission(&questions, &answers)
        .expect("scoring succeeds");

    assert_eq!(outcome.scores.len(), 1);
    assert_eq!(outcome.scores[0].score, 50);
    assert_eq!(outcome.scores[0].confidence, 0.4);
}

#[test]
fn unknown_question_ids_are_skipped_not_fatal() {
    let scorer = QuizScorer::new(Arc::new(UnavailableTextService));
    let questions = vec![multiple_choice("q1", "Social")];
    let answers = vec![choice("q1", "neutral"), choice("ghost", "strongly_agree")];

    let outcome = scorer
        .score_submission(&questions, &answers)
        .expect("partial credit beats a lost submission");

    assert_eq!(outcome.scores.len(), 1);
    assert_eq!(outcome.scores[0].question_id, "q1");
}

#[test]
fn mismatched_answer_values_are_skipped() {
    let scorer = QuizScorer::new(Arc::new(UnavailableTextService));
    let questions = vec![slider("q1", "Conventional")];
    let answers = vec![choice("q1", "three")];

    let outcome = scorer
        .score_submission(&questions, &answers)
        .expect("scoring succeeds");

    assert!(outcome.scores.is_empty());
    assert!(outcome.dimension_summary.is_empty());
}

#[test]
fn dimension_confidence_is_floored_at_twenty() {
    let scorer = QuizScorer::new(Arc::new(UnavailableTextService));
    let questions = vec![freetext("q1", "adaptability")];
    let answers = vec![choice("q1", "short answer")];

    let outcome = scorer
        .score_submission(&questions, &answers)
        .expect("scoring succeeds");

    let confidence = *outcome
        .dimension_confidence
        .get("adaptability")
        .expect("confidence present");
    assert!(confidence >= 20);
    assert!(confidence <= 100);
}

#[test]
fn multi_atom_dimensions_use_a_winsorized_weighted_mean() {
    let scorer = QuizScorer::new(Arc::new(UnavailableTextService));
    let questions = vec![
        multiple_choice("q1", "Social"),
        multiple_choice("q2", "Social"),
        multiple_choice("q3", "Social"),
        multiple_choice("q4", "Social"),
        multiple_choice("q5", "Social"),
    ];
    let answers = vec![
        choice("q1", "strongly_disagree"), // 10
        choice("q2", "neutral"),           // 50
        choice("q3", "neutral"),           // 50
        choice("q4", "neutral"),           // 50
        choice("q5", "strongly_agree"),    // 90
    ];

    let outcome = scorer
        .score_submission(&questions, &answers)
        .expect("scoring succeeds");

    // Winsorizing clamps 10 and 90 to 50 before the equal-weight mean.
    assert_eq!(outcome.dimension_summary.get("Social"), Some(&50));
    // Five same-kind atoms: coverage 1.0, diversity 1/3, confidence 0.95.
    assert_eq!(outcome.dimension_confidence.get("Social"), Some(&82));
}
