//! Dimension confidence calculation: evidence atoms for one dimension in, a
//! single calibrated 0-100 value out.

use chrono::{DateTime, Utc};
use std::collections::{BTreeMap, BTreeSet};

use super::dimensions::{canonical_dimension, dimension_importance};
use super::domain::{ConfidenceProfile, ConfidenceSource, DimensionConfidence};

/// Sources agreeing within this absolute score range earn the agreement
/// bonus. Absolute points, not a percentage of the maximum.
const AGREEMENT_RANGE: u8 = 15;
const AGREEMENT_BONUS: f64 = 10.0;

/// Compute the calibrated confidence for one dimension's evidence list.
///
/// `mean(score) × diversity × evidence_factor + agreement_bonus`, where
/// diversity rewards distinct source types (1 type ×0.6, 2 ×0.8, 3 ×1.0),
/// the evidence factor saturates at three atoms, and the bonus applies when
/// multiple sources agree within [`AGREEMENT_RANGE`] points. Empty evidence
/// yields 0. Order of the input list never affects the result.
pub fn compute_dimension_confidence(sources: &[ConfidenceSource]) -> u8 {
    if sources.is_empty() {
        return 0;
    }

    let count = sources.len();
    let base = sources.iter().map(|s| s.score as f64).sum::<f64>() / count as f64;

    let distinct_types: BTreeSet<_> = sources.iter().map(|s| s.source_type).collect();
    let diversity = match distinct_types.len() {
        1 => 0.6,
        2 => 0.8,
        _ => 1.0,
    };

    let evidence_factor = (count as f64 / 3.0).min(1.0);

    let min = sources.iter().map(|s| s.score).min().unwrap_or(0);
    let max = sources.iter().map(|s| s.score).max().unwrap_or(0);
    let agreement = if count > 1 && max - min <= AGREEMENT_RANGE {
        AGREEMENT_BONUS
    } else {
        0.0
    };

    let confidence = base * diversity * evidence_factor + agreement;
    confidence.clamp(0.0, 100.0).round() as u8
}

/// Group evidence atoms by canonical dimension and derive the full
/// confidence profile, including the importance-weighted overall value.
pub fn build_confidence_profile(
    atoms: &[ConfidenceSource],
    now: DateTime<Utc>,
) -> ConfidenceProfile {
    let mut grouped: BTreeMap<String, Vec<ConfidenceSource>> = BTreeMap::new();
    for atom in atoms {
        let mut atom = atom.clone();
        atom.dimension = canonical_dimension(&atom.dimension);
        grouped
            .entry(atom.dimension.clone())
            .or_default()
            .push(atom);
    }

    let dimensions: BTreeMap<String, DimensionConfidence> = grouped
        .into_iter()
        .map(|(dimension, sources)| {
            let confidence = compute_dimension_confidence(&sources);
            let source_types: BTreeSet<_> = sources.iter().map(|s| s.source_type).collect();
            let entry = DimensionConfidence {
                dimension: dimension.clone(),
                confidence,
                source_count: sources.len(),
                source_types,
                sources,
            };
            (dimension, entry)
        })
        .collect();

    let overall_confidence = overall_confidence(&dimensions);

    ConfidenceProfile {
        dimensions,
        overall_confidence,
        last_updated: now,
    }
}

/// Importance-weighted mean over every dimension's confidence. Zero when no
/// dimensions exist.
pub(crate) fn overall_confidence(dimensions: &BTreeMap<String, DimensionConfidence>) -> u8 {
    if dimensions.is_empty() {
        return 0;
    }

    let mut weighted = 0.0;
    let mut total_weight = 0.0;
    for entry in dimensions.values() {
        let importance = dimension_importance(&entry.dimension);
        weighted += entry.confidence as f64 * importance;
        total_weight += importance;
    }

    if total_weight == 0.0 {
        return 0;
    }

    (weighted / total_weight).clamp(0.0, 100.0).round() as u8
}
