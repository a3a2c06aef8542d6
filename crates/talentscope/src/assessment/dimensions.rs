//! Dimension registry: the six RIASEC axes, the behavioral factors, and the
//! static importance table shared by gap analysis and orchestration.

use serde::{Deserialize, Serialize};

/// The six vocational-interest axes. Declaration order is the tie-break
/// order everywhere a stable ranking is required.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Riasec {
    Realistic,
    Investigative,
    Artistic,
    Social,
    Enterprising,
    Conventional,
}

impl Riasec {
    pub const fn ordered() -> [Self; 6] {
        [
            Self::Realistic,
            Self::Investigative,
            Self::Artistic,
            Self::Social,
            Self::Enterprising,
            Self::Conventional,
        ]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Realistic => "Realistic",
            Self::Investigative => "Investigative",
            Self::Artistic => "Artistic",
            Self::Social => "Social",
            Self::Enterprising => "Enterprising",
            Self::Conventional => "Conventional",
        }
    }

    pub const fn letter(self) -> char {
        match self {
            Self::Realistic => 'R',
            Self::Investigative => 'I',
            Self::Artistic => 'A',
            Self::Social => 'S',
            Self::Enterprising => 'E',
            Self::Conventional => 'C',
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        let trimmed = name.trim();
        Self::ordered()
            .into_iter()
            .find(|axis| axis.label().eq_ignore_ascii_case(trimmed))
    }
}

/// Behavioral factors tracked alongside the RIASEC axes. Session evidence is
/// a stronger direct signal for these than for vocational interests.
pub const BEHAVIORAL_DIMENSIONS: [&str; 8] = [
    "communication",
    "analytical_thinking",
    "creativity",
    "leadership",
    "collaboration",
    "resilience",
    "adaptability",
    "attention_to_detail",
];

/// Canonical form of a dimension name: RIASEC axes keep their capitalized
/// labels, everything else collapses to lowercase snake_case. Unknown names
/// pass through canonicalized rather than erroring.
pub fn canonical_dimension(raw: &str) -> String {
    if let Some(axis) = Riasec::from_name(raw) {
        return axis.label().to_string();
    }

    raw.trim()
        .to_ascii_lowercase()
        .split(|c: char| c.is_whitespace() || c == '-')
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("_")
}

/// Static per-dimension importance weight used for gap ranking and the
/// overall-confidence mean. Unlisted dimensions default to 0.5.
pub fn dimension_importance(dimension: &str) -> f64 {
    if Riasec::from_name(dimension).is_some() {
        return 0.9;
    }

    match dimension {
        "communication" | "analytical_thinking" => 0.8,
        "creativity" | "leadership" | "collaboration" => 0.7,
        "resilience" | "adaptability" | "attention_to_detail" => 0.6,
        _ => 0.5,
    }
}

pub fn is_behavioral(dimension: &str) -> bool {
    BEHAVIORAL_DIMENSIONS.contains(&dimension)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn riasec_names_canonicalize_to_labels() {
        assert_eq!(canonical_dimension("artistic"), "Artistic");
        assert_eq!(canonical_dimension(" ENTERPRISING "), "Enterprising");
    }

    #[test]
    fn free_form_names_collapse_to_snake_case() {
        assert_eq!(canonical_dimension("Attention to Detail"), "attention_to_detail");
        assert_eq!(canonical_dimension("analytical-thinking"), "analytical_thinking");
    }

    #[test]
    fn unlisted_dimensions_default_to_half_importance() {
        assert_eq!(dimension_importance("spatial_reasoning"), 0.5);
        assert_eq!(dimension_importance("Realistic"), 0.9);
    }

    #[test]
    fn behavioral_set_excludes_riasec() {
        assert!(is_behavioral("communication"));
        assert!(!is_behavioral("Artistic"));
    }
}
