//! Static coverage tables: which dimensions each quiz module exercises and
//! which dimensions each connectable data source speaks to, plus the
//! module/source recommendation sub-algorithms built on them.

use serde::{Deserialize, Serialize};

use crate::assessment::domain::DimensionGap;

/// A quiz module and the dimensions it covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuizModuleDef {
    pub id: &'static str,
    pub name: &'static str,
    pub dimensions: &'static [&'static str],
}

/// A connectable personal-data source and its dimension affinities.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DataSourceDef {
    pub id: &'static str,
    pub name: &'static str,
    pub affinities: &'static [(&'static str, f64)],
}

/// Catalog order doubles as the tie-break order for module recommendation.
pub const QUIZ_MODULES: [QuizModuleDef; 5] = [
    QuizModuleDef {
        id: "interests_core",
        name: "Core Interests",
        dimensions: &[
            "Realistic",
            "Investigative",
            "Artistic",
            "Social",
            "Enterprising",
            "Conventional",
        ],
    },
    QuizModuleDef {
        id: "work_style",
        name: "Work Style",
        dimensions: &["Conventional", "attention_to_detail", "collaboration", "adaptability"],
    },
    QuizModuleDef {
        id: "strengths_character",
        name: "Character Strengths",
        dimensions: &["leadership", "resilience", "communication"],
    },
    QuizModuleDef {
        id: "creativity_lab",
        name: "Creativity Lab",
        dimensions: &["creativity", "Artistic", "Investigative"],
    },
    QuizModuleDef {
        id: "people_situations",
        name: "People & Situations",
        dimensions: &["Social", "communication", "analytical_thinking"],
    },
];

pub const DATA_SOURCES: [DataSourceDef; 5] = [
    DataSourceDef {
        id: "resume",
        name: "Resume",
        affinities: &[
            ("leadership", 0.8),
            ("communication", 0.6),
            ("Enterprising", 0.6),
            ("Conventional", 0.4),
        ],
    },
    DataSourceDef {
        id: "linkedin",
        name: "LinkedIn",
        affinities: &[
            ("Enterprising", 0.7),
            ("Social", 0.6),
            ("communication", 0.6),
            ("leadership", 0.5),
        ],
    },
    DataSourceDef {
        id: "github",
        name: "GitHub",
        affinities: &[
            ("Investigative", 0.9),
            ("analytical_thinking", 0.8),
            ("Realistic", 0.6),
            ("attention_to_detail", 0.6),
        ],
    },
    DataSourceDef {
        id: "portfolio",
        name: "Portfolio",
        affinities: &[
            ("Artistic", 0.9),
            ("creativity", 0.8),
            ("attention_to_detail", 0.5),
        ],
    },
    DataSourceDef {
        id: "writing_samples",
        name: "Writing Samples",
        affinities: &[
            ("communication", 0.9),
            ("creativity", 0.6),
            ("Artistic", 0.5),
            ("analytical_thinking", 0.5),
        ],
    },
];

pub fn quiz_module(id: &str) -> Option<&'static QuizModuleDef> {
    QUIZ_MODULES.iter().find(|module| module.id == id)
}

pub fn data_source(id: &str) -> Option<&'static DataSourceDef> {
    DATA_SOURCES.iter().find(|source| source.id == id)
}

/// Outcome of the module recommendation sub-algorithm.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModuleRecommendation {
    pub module_id: String,
    pub module_name: String,
    pub covered_gaps: Vec<String>,
    pub expected_impact: u8,
}

/// Outcome of the source recommendation sub-algorithm.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceRecommendation {
    pub source_id: String,
    pub source_name: String,
    pub expected_impact: u8,
}

/// Pick the not-yet-taken module covering the most high-value gaps.
///
/// Score = Σ over covered gap dimensions of `importance × deficit`; the
/// first module in catalog order wins exact ties. Expected impact is
/// `min(round(score/2), 25)`. Returns `None` when no candidate remains or
/// no candidate covers any gap.
pub fn recommend_module(
    candidates: &[&'static QuizModuleDef],
    gaps: &[DimensionGap],
) -> Option<ModuleRecommendation> {
    let mut best: Option<(f64, &QuizModuleDef, Vec<String>)> = None;

    for module in candidates {
        let mut score = 0.0;
        let mut covered = Vec::new();
        for gap in gaps {
            if module.dimensions.contains(&gap.dimension.as_str()) {
                score += gap.importance * gap.deficit() as f64;
                covered.push(gap.dimension.clone());
            }
        }
        let better = match &best {
            Some((best_score, _, _)) => score > *best_score,
            None => score > 0.0,
        };
        if better {
            best = Some((score, module, covered));
        }
    }

    best.map(|(score, module, covered_gaps)| ModuleRecommendation {
        module_id: module.id.to_string(),
        module_name: module.name.to_string(),
        covered_gaps,
        expected_impact: ((score / 2.0).round() as u32).min(25) as u8,
    })
}

/// Rank unconnected sources by summed `affinity × importance × deficit`
/// across the open gaps. Expected impact is `min(round(score/3), 25)`.
pub fn recommend_sources(
    unconnected: &[&'static DataSourceDef],
    gaps: &[DimensionGap],
    limit: usize,
) -> Vec<SourceRecommendation> {
    let mut scored: Vec<(f64, &DataSourceDef)> = unconnected
        .iter()
        .map(|source| {
            let score: f64 = source
                .affinities
                .iter()
                .filter_map(|(dimension, affinity)| {
                    gaps.iter()
                        .find(|gap| gap.dimension == *dimension)
                        .map(|gap| affinity * gap.importance * gap.deficit() as f64)
                })
                .sum();
            (score, *source)
        })
        .filter(|(score, _)| *score > 0.0)
        .collect();

    scored.sort_by(|a, b| b.0.total_cmp(&a.0));

    scored
        .into_iter()
        .take(limit)
        .map(|(score, source)| SourceRecommendation {
            source_id: source.id.to_string(),
            source_name: source.name.to_string(),
            expected_impact: ((score / 3.0).round() as u32).min(25) as u8,
        })
        .collect()
}
