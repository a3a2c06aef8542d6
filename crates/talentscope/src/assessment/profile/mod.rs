//! Evidence aggregation: quiz scores, talent signals, and session insights
//! merged into a calibrated profile with a stable RIASEC code.

mod calibration;
mod insights;

pub use insights::SessionInsight;

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use super::dimensions::{canonical_dimension, Riasec};
use super::domain::ComputedProfile;
use calibration::{mean, round_score, std_deviation, winsorize, z_blend};

pub(crate) use calibration::winsorize as winsorize_scores;

/// A raw quiz-derived score for one dimension. Several may exist for the
/// same dimension across modules; the builder normalizes them per dimension.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuizDimensionScore {
    pub dimension: String,
    pub score: f64,
}

/// A talent signal extracted from connected data sources. Boosts every
/// dimension it declares.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TalentSignal {
    #[serde(default)]
    pub label: String,
    pub dimensions: Vec<String>,
    /// Accepted on either a 0-1 or 0-100 scale; normalized to 0-1.
    pub confidence: f64,
}

impl TalentSignal {
    fn unit_confidence(&self) -> f64 {
        let raw = if self.confidence > 1.0 {
            self.confidence / 100.0
        } else {
            self.confidence
        };
        raw.clamp(0.0, 1.0)
    }
}

/// Everything the profile builder consumes. All fields default to empty so
/// partial assessments still produce a complete profile.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProfileInputs {
    #[serde(default)]
    pub quiz_dimension_scores: Vec<QuizDimensionScore>,
    #[serde(default)]
    pub signals: Vec<TalentSignal>,
    #[serde(default)]
    pub session_insights: Vec<SessionInsight>,
    #[serde(default)]
    pub constraints: Option<serde_json::Value>,
    /// Externally computed confidence values to blend into the baseline.
    #[serde(default)]
    pub dimension_confidence: BTreeMap<String, u8>,
}

/// Build the computed profile: normalized quiz scores, signal and session
/// boosts, RIASEC z-score calibration, the 3-letter code, and per-dimension
/// confidence. Pure and deterministic; identical inputs always yield the
/// identical code.
pub fn build_computed_profile(inputs: &ProfileInputs) -> ComputedProfile {
    let mut scores: BTreeMap<String, f64> = BTreeMap::new();
    let mut quiz_covered: BTreeSet<String> = BTreeSet::new();
    let mut signal_support: BTreeMap<String, u32> = BTreeMap::new();
    let mut session_support: BTreeMap<String, u32> = BTreeMap::new();

    // Quiz scores: group per canonical dimension, winsorize, average, round.
    let mut grouped: BTreeMap<String, Vec<f64>> = BTreeMap::new();
    for entry in &inputs.quiz_dimension_scores {
        grouped
            .entry(canonical_dimension(&entry.dimension))
            .or_default()
            .push(entry.score);
    }
    for (dimension, mut values) in grouped {
        winsorize(&mut values);
        let averaged = mean(&values).clamp(0.0, 100.0).round();
        quiz_covered.insert(dimension.clone());
        scores.insert(dimension, averaged);
    }

    // Talent signals additively boost their declared dimensions.
    for signal in &inputs.signals {
        let boost = signal.unit_confidence() * 10.0;
        for dimension in &signal.dimensions {
            let dimension = canonical_dimension(dimension);
            let entry = scores.entry(dimension.clone()).or_insert(0.0);
            *entry = (*entry + boost).clamp(0.0, 100.0);
            *signal_support.entry(dimension).or_insert(0) += 1;
        }
    }

    // Session insights land through the fixed category→dimension table.
    for insight in &inputs.session_insights {
        for (dimension, boost) in insights::insight_boosts(insight) {
            let entry = scores.entry(dimension.to_string()).or_insert(0.0);
            *entry = (*entry + boost).clamp(0.0, 100.0);
            *session_support.entry(dimension.to_string()).or_insert(0) += 1;
        }
    }

    // RIASEC calibration: compress outliers across the six axes while
    // preserving rank order. Axes without evidence participate at zero so
    // the code is always derivable.
    let raw_riasec: Vec<f64> = Riasec::ordered()
        .iter()
        .map(|axis| scores.get(axis.label()).copied().unwrap_or(0.0))
        .collect();
    let riasec_mean = mean(&raw_riasec);
    let riasec_std = std_deviation(&raw_riasec);
    for (axis, raw) in Riasec::ordered().into_iter().zip(&raw_riasec) {
        scores.insert(
            axis.label().to_string(),
            z_blend(*raw, riasec_mean, riasec_std),
        );
    }

    let riasec_code = derive_riasec_code(&scores);

    let dimension_scores: BTreeMap<String, u8> = scores
        .iter()
        .map(|(dimension, value)| (dimension.clone(), round_score(*value)))
        .collect();

    let breadth_bonus = quiz_covered.len() >= 8;
    let confidence_scores: BTreeMap<String, u8> = scores
        .keys()
        .map(|dimension| {
            let baseline = confidence_baseline(
                quiz_covered.contains(dimension),
                signal_support.get(dimension).copied().unwrap_or(0),
                session_support.get(dimension).copied().unwrap_or(0),
                breadth_bonus,
            );
            let value = match inputs.dimension_confidence.get(dimension) {
                Some(supplied) => 0.6 * baseline + 0.4 * *supplied as f64,
                None => baseline,
            };
            (dimension.clone(), round_score(value))
        })
        .collect();

    ComputedProfile {
        riasec_code,
        dimension_scores,
        confidence_scores,
        constraints: inputs.constraints.clone(),
    }
}

/// Top three axes by calibrated score, descending. The stable sort breaks
/// exact ties by declaration order, never randomly.
fn derive_riasec_code(scores: &BTreeMap<String, f64>) -> String {
    let mut ranked: Vec<(Riasec, f64)> = Riasec::ordered()
        .into_iter()
        .map(|axis| (axis, scores.get(axis.label()).copied().unwrap_or(0.0)))
        .collect();
    ranked.sort_by(|a, b| b.1.total_cmp(&a.1));
    ranked
        .iter()
        .take(3)
        .map(|(axis, _)| axis.letter())
        .collect()
}

fn confidence_baseline(
    quiz_present: bool,
    signal_support: u32,
    session_support: u32,
    breadth_bonus: bool,
) -> f64 {
    let mut baseline = 15.0;
    if quiz_present {
        baseline += 45.0;
    }
    baseline += (signal_support as f64 * 5.0).min(15.0);
    baseline += (session_support as f64 * 5.0).min(15.0);
    if breadth_bonus {
        baseline += 10.0;
    }
    baseline.clamp(0.0, 100.0)
}
