//! Quiz answer scoring: raw answers in, dimension-score atoms and a
//! calibrated per-dimension confidence map out.
//!
//! Structured answers are scored locally from the question rubric; free-text
//! answers go to the text-understanding service in one batched call. The
//! scorer always returns a complete result: any free-text item the service
//! fails to score receives the neutral fallback instead of leaving the
//! output partially populated.

mod client;
mod freetext;
mod rubric;

pub use client::HttpTextClient;
pub use freetext::{
    FreetextBatchRequest, FreetextBatchResponse, FreetextDimensionScore, FreetextItem,
    FreetextQuestionScores, TextServiceError, TextUnderstanding, UnavailableTextService,
};

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;
use tracing::{debug, warn};

use super::dimensions::canonical_dimension;
use super::profile::winsorize_scores;

pub(crate) const NEUTRAL_SCORE: u8 = 50;
const FALLBACK_CONFIDENCE: f64 = 0.4;
const DEFAULT_FREETEXT_CONFIDENCE: f64 = 0.7;

const MULTIPLE_CHOICE_WEIGHT: f64 = 1.0;
const SLIDER_WEIGHT: f64 = 0.9;
const FREETEXT_WEIGHT: f64 = 0.8;

const MULTIPLE_CHOICE_CONFIDENCE: f64 = 0.95;
const SLIDER_CONFIDENCE: f64 = 0.85;

/// Answer kinds a quiz question can declare.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionKind {
    MultipleChoice,
    Slider,
    Freetext,
}

/// Question definition as supplied by the quiz content layer. Field names
/// follow the external scoring contract.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizQuestion {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: QuestionKind,
    #[serde(rename = "question")]
    pub prompt: String,
    pub dimension: String,
    #[serde(default)]
    pub scoring_rubric: BTreeMap<String, u8>,
    #[serde(default)]
    pub options: Vec<String>,
    #[serde(default)]
    pub slider_min: Option<f64>,
    #[serde(default)]
    pub slider_max: Option<f64>,
}

/// Raw answer value; sliders submit numbers, everything else text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AnswerValue {
    Number(f64),
    Text(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizAnswer {
    pub question_id: String,
    pub answer: AnswerValue,
}

/// One dimension-score atom produced from an answered question.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerScore {
    pub question_id: String,
    pub dimension: String,
    pub score: u8,
    pub weight: f64,
    pub confidence: f64,
    pub rationale: String,
    pub kind: QuestionKind,
}

/// Complete scoring result: per-question atoms plus the aggregated
/// per-dimension summary and calibrated confidence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizScoringOutcome {
    pub scores: Vec<AnswerScore>,
    pub dimension_summary: BTreeMap<String, u8>,
    pub dimension_confidence: BTreeMap<String, u8>,
}

#[derive(Debug, thiserror::Error)]
pub enum ScoringError {
    #[error(transparent)]
    TextService(#[from] TextServiceError),
}

/// Stateless scorer holding only the text-understanding handle.
#[derive(Debug, Clone)]
pub struct QuizScorer {
    text: Arc<dyn TextUnderstanding>,
}

impl QuizScorer {
    pub fn new(text: Arc<dyn TextUnderstanding>) -> Self {
        Self { text }
    }

    /// Score a full submission. Answers referencing unknown question ids are
    /// skipped rather than failing the batch; only budget exhaustion on the
    /// text service propagates as an error.
    pub fn score_submission(
        &self,
        questions: &[QuizQuestion],
        answers: &[QuizAnswer],
    ) -> Result<QuizScoringOutcome, ScoringError> {
        let by_id: BTreeMap<&str, &QuizQuestion> = questions
            .iter()
            .map(|question| (question.id.as_str(), question))
            .collect();

        let mut atoms: Vec<AnswerScore> = Vec::new();
        let mut freetext_items: Vec<FreetextItem> = Vec::new();

        for answer in answers {
            let Some(question) = by_id.get(answer.question_id.as_str()) else {
                debug!(question_id = %answer.question_id, "skipping answer to unknown question");
                continue;
            };

            match (question.kind, &answer.answer) {
                (QuestionKind::MultipleChoice, AnswerValue::Text(choice)) => {
                    let (score, rationale) = rubric::score_multiple_choice(question, choice);
                    atoms.push(atom(question, score, MULTIPLE_CHOICE_WEIGHT,
                        MULTIPLE_CHOICE_CONFIDENCE, rationale));
                }
                (QuestionKind::Slider, AnswerValue::Number(value)) => {
                    let (score, rationale) = rubric::score_slider(question, *value);
                    atoms.push(atom(question, score, SLIDER_WEIGHT, SLIDER_CONFIDENCE, rationale));
                }
                (QuestionKind::Freetext, AnswerValue::Text(text)) => {
                    freetext_items.push(FreetextItem {
                        question_id: question.id.clone(),
                        prompt: question.prompt.clone(),
                        dimension: canonical_dimension(&question.dimension),
                        answer: text.clone(),
                    });
                }
                _ => {
                    debug!(
                        question_id = %answer.question_id,
                        "skipping answer whose value does not match the question kind"
                    );
                }
            }
        }

        if !freetext_items.is_empty() {
            let scored = self.score_freetext_batch(questions, &freetext_items)?;
            atoms.extend(scored);
        }

        let (dimension_summary, dimension_confidence) = aggregate(&atoms);

        Ok(QuizScoringOutcome {
            scores: atoms,
            dimension_summary,
            dimension_confidence,
        })
    }

    fn score_freetext_batch(
        &self,
        questions: &[QuizQuestion],
        items: &[FreetextItem],
    ) -> Result<Vec<AnswerScore>, ScoringError> {
        let allowed: BTreeSet<String> = questions
            .iter()
            .map(|question| canonical_dimension(&question.dimension))
            .collect();

        let request = FreetextBatchRequest {
            items: items.to_vec(),
            allowed_dimensions: allowed.iter().cloned().collect(),
        };

        let response = match self.text.score_batch(&request) {
            Ok(response) => freetext::filter_whitelist(response, &allowed),
            Err(err) if err.is_recoverable() => {
                warn!(error = %err, "free-text scoring degraded; applying neutral fallback");
                return Ok(items.iter().map(fallback_atom).collect());
            }
            Err(err) => return Err(err.into()),
        };

        let results: BTreeMap<&str, &FreetextQuestionScores> = response
            .results
            .iter()
            .map(|result| (result.question_id.as_str(), result))
            .collect();

        let mut atoms = Vec::new();
        for item in items {
            match results.get(item.question_id.as_str()) {
                Some(result) if !result.dimension_scores.is_empty() => {
                    for entry in &result.dimension_scores {
                        atoms.push(AnswerScore {
                            question_id: item.question_id.clone(),
                            dimension: canonical_dimension(&entry.dimension),
                            score: entry.score.min(100),
                            weight: FREETEXT_WEIGHT,
                            confidence: entry
                                .confidence
                                .unwrap_or(DEFAULT_FREETEXT_CONFIDENCE)
                                .clamp(0.0, 1.0),
                            rationale: entry.rationale.clone(),
                            kind: QuestionKind::Freetext,
                        });
                    }
                }
                _ => atoms.push(fallback_atom(item)),
            }
        }

        Ok(atoms)
    }
}

fn atom(
    question: &QuizQuestion,
    score: u8,
    weight: f64,
    confidence: f64,
    rationale: String,
) -> AnswerScore {
    AnswerScore {
        question_id: question.id.clone(),
        dimension: canonical_dimension(&question.dimension),
        score,
        weight,
        confidence,
        rationale,
        kind: question.kind,
    }
}

fn fallback_atom(item: &FreetextItem) -> AnswerScore {
    AnswerScore {
        question_id: item.question_id.clone(),
        dimension: item.dimension.clone(),
        score: NEUTRAL_SCORE,
        weight: FREETEXT_WEIGHT,
        confidence: FALLBACK_CONFIDENCE,
        rationale: "text scoring unavailable; neutral score applied".to_string(),
        kind: QuestionKind::Freetext,
    }
}

/// Winsorized weighted mean per dimension, plus the calibrated confidence:
/// `round(100 × (0.45·coverage + 0.25·diversity + 0.30·mean_confidence))`,
/// floored at 20.
fn aggregate(atoms: &[AnswerScore]) -> (BTreeMap<String, u8>, BTreeMap<String, u8>) {
    let mut grouped: BTreeMap<&str, Vec<&AnswerScore>> = BTreeMap::new();
    for atom in atoms {
        grouped.entry(atom.dimension.as_str()).or_default().push(atom);
    }

    let mut summary = BTreeMap::new();
    let mut confidence = BTreeMap::new();

    for (dimension, entries) in grouped {
        let mut scores: Vec<f64> = entries.iter().map(|entry| entry.score as f64).collect();
        winsorize_scores(&mut scores);

        let total_weight: f64 = entries.iter().map(|entry| entry.weight).sum();
        let weighted_sum: f64 = scores
            .iter()
            .zip(&entries)
            .map(|(score, entry)| score * entry.weight)
            .sum();
        let averaged = if total_weight > 0.0 {
            weighted_sum / total_weight
        } else {
            0.0
        };
        summary.insert(dimension.to_string(), averaged.clamp(0.0, 100.0).round() as u8);

        let coverage = (entries.len() as f64 / 3.0).min(1.0);
        let kinds: BTreeSet<QuestionKind> = entries.iter().map(|entry| entry.kind).collect();
        let diversity = kinds.len() as f64 / 3.0;
        let mean_confidence =
            entries.iter().map(|entry| entry.confidence).sum::<f64>() / entries.len() as f64;

        let calibrated =
            (100.0 * (0.45 * coverage + 0.25 * diversity + 0.30 * mean_confidence)).round() as u8;
        confidence.insert(dimension.to_string(), calibrated.max(20));
    }

    (summary, confidence)
}
