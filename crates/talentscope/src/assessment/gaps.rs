//! Gap analysis: which dimensions are under-evidenced, ranked so downstream
//! planners can take the head of the list.

use super::dimensions::dimension_importance;
use super::domain::{ConfidenceProfile, DimensionGap, SourceType};

pub const DEFAULT_TARGET_CONFIDENCE: u8 = 60;

/// Emit a gap for every dimension strictly below `target`, recording which
/// source types are absent from its evidence.
///
/// Ordering is importance descending, then current confidence ascending
/// (weakest first within equal importance). Consumers rely on this exact
/// order, so the sort is stable.
pub fn identify_gaps(profile: &ConfidenceProfile, target: u8) -> Vec<DimensionGap> {
    let mut gaps: Vec<DimensionGap> = profile
        .dimensions
        .values()
        .filter(|entry| entry.confidence < target)
        .map(|entry| {
            let missing_source_types: Vec<SourceType> = SourceType::ordered()
                .into_iter()
                .filter(|kind| !entry.source_types.contains(kind))
                .collect();

            DimensionGap {
                dimension: entry.dimension.clone(),
                current_confidence: entry.confidence,
                target_confidence: target,
                missing_source_types,
                importance: dimension_importance(&entry.dimension),
            }
        })
        .collect();

    gaps.sort_by(|a, b| {
        b.importance
            .total_cmp(&a.importance)
            .then(a.current_confidence.cmp(&b.current_confidence))
    });

    gaps
}
