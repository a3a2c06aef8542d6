//! Session-insight mapping: observation categories from the live session are
//! translated into score boosts through a fixed category→dimension table.

use serde::{Deserialize, Serialize};

use crate::assessment::dimensions::{is_behavioral, Riasec};

/// One observation distilled from the conversational session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionInsight {
    pub category: String,
    /// 0-1.
    pub confidence: f64,
    #[serde(default)]
    pub summary: String,
}

/// Session evidence lands harder on behavioral factors than on vocational
/// interest axes, so the two groups use different multipliers.
const BEHAVIORAL_MULTIPLIER: f64 = 100.0;
const RIASEC_MULTIPLIER: f64 = 12.0;

/// Fixed category→(dimension, weight) table. Unknown categories contribute
/// nothing.
fn category_weights(category: &str) -> &'static [(&'static str, f64)] {
    match category {
        "engagement" => &[("Enterprising", 0.6), ("Social", 0.5)],
        "clarity_structure" => &[("analytical_thinking", 0.7), ("Conventional", 0.5)],
        "creativity_expression" => &[("creativity", 0.7), ("Artistic", 0.6)],
        "empathy_connection" => &[("communication", 0.6), ("Social", 0.6)],
        "drive_initiative" => &[("leadership", 0.7), ("Enterprising", 0.6)],
        "reflection_depth" => &[("resilience", 0.5), ("Investigative", 0.6)],
        "hands_on_problem_solving" => &[("attention_to_detail", 0.5), ("Realistic", 0.6)],
        _ => &[],
    }
}

/// Score boosts an insight contributes, as `(dimension, boost)` pairs.
pub(crate) fn insight_boosts(insight: &SessionInsight) -> Vec<(&'static str, f64)> {
    let confidence = insight.confidence.clamp(0.0, 1.0);
    category_weights(insight.category.as_str())
        .iter()
        .map(|&(dimension, weight)| {
            let multiplier = if is_behavioral(dimension) {
                BEHAVIORAL_MULTIPLIER
            } else {
                debug_assert!(Riasec::from_name(dimension).is_some());
                RIASEC_MULTIPLIER
            };
            (dimension, confidence * weight * multiplier)
        })
        .collect()
}
