use chrono::{DateTime, TimeZone, Utc};
use std::collections::{BTreeMap, BTreeSet};

use crate::assessment::domain::{
    AgentState, ConfidenceProfile, ConfidenceSource, DimensionConfidence, SourceType,
};

pub(super) fn ts() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 8, 1, 12, 0, 0)
        .single()
        .expect("valid timestamp")
}

pub(super) fn atom(source_type: SourceType, dimension: &str, score: u8) -> ConfidenceSource {
    ConfidenceSource::new(source_type, dimension, score, "test evidence", ts())
}

/// Hand-assemble a profile with fixed confidence values, bypassing the
/// calculator, for tests that pin gap ordering and orchestration inputs.
pub(super) fn profile_with_confidences(entries: &[(&str, u8)]) -> ConfidenceProfile {
    let dimensions: BTreeMap<String, DimensionConfidence> = entries
        .iter()
        .map(|(dimension, confidence)| {
            let sources = vec![atom(SourceType::Quiz, dimension, *confidence)];
            (
                dimension.to_string(),
                DimensionConfidence {
                    dimension: dimension.to_string(),
                    confidence: *confidence,
                    source_count: sources.len(),
                    source_types: BTreeSet::from([SourceType::Quiz]),
                    sources,
                },
            )
        })
        .collect();

    ConfidenceProfile {
        dimensions,
        overall_confidence: 0,
        last_updated: ts(),
    }
}

pub(super) fn base_state() -> AgentState {
    AgentState {
        connected_sources: vec!["resume".to_string()],
        ..AgentState::default()
    }
}
