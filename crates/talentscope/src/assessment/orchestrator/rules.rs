//! The planner rule set. All rules run on every call, in fixed order; the
//! caller sorts the combined output by priority afterwards.

use serde_json::json;

use super::coverage::{self, QuizModuleDef, DATA_SOURCES, QUIZ_MODULES};
use crate::assessment::dimensions::is_behavioral;
use crate::assessment::domain::{
    ActionType, AgentAction, AgentState, Priority, SourceType,
};

const PROBE_THRESHOLD: u8 = 30;
const REPORT_THRESHOLD: u8 = 60;
const PROVISIONAL_REPORT_THRESHOLD: u8 = 50;
const REFINE_THRESHOLD: u8 = 70;

pub(crate) fn plan_actions(state: &AgentState) -> Vec<AgentAction> {
    let mut actions = Vec::new();

    request_additional_data(state, &mut actions);
    analyze_connected_sources(state, &mut actions);
    run_quiz_module(state, &mut actions);
    probe_weak_dimensions(state, &mut actions);
    start_session(state, &mut actions);
    generate_report(state, &mut actions);
    refine_report(state, &mut actions);
    connect_additional_sources(state, &mut actions);

    actions
}

/// Rule 1: with nothing connected the engine has no external evidence at
/// all, which caps every downstream confidence value.
fn request_additional_data(state: &AgentState, actions: &mut Vec<AgentAction>) {
    if state.connected_sources.is_empty() {
        actions.push(
            AgentAction::new(
                ActionType::RequestAdditionalData,
                Priority::Critical,
                "no data sources are connected; confidence cannot rise past quiz-only evidence",
            )
            .with_impact(20),
        );
    }
}

/// Rule 2: a connected source that has produced no data-source atoms is
/// sitting idle evidence.
fn analyze_connected_sources(state: &AgentState, actions: &mut Vec<AgentAction>) {
    for source_id in &state.connected_sources {
        if !source_analyzed(state, source_id) {
            let name = coverage::data_source(source_id)
                .map(|def| def.name)
                .unwrap_or(source_id.as_str());
            actions.push(
                AgentAction::new(
                    ActionType::AnalyzeSource,
                    Priority::High,
                    format!("{name} is connected but has not been analyzed yet"),
                )
                .with_impact(10)
                .with_meta("source_id", json!(source_id)),
            );
        }
    }
}

fn source_analyzed(state: &AgentState, source_id: &str) -> bool {
    let Some(profile) = &state.confidence_profile else {
        return false;
    };
    profile.dimensions.values().any(|entry| {
        entry.sources.iter().any(|atom| {
            atom.source_type == SourceType::DataSource && atom.origin.as_deref() == Some(source_id)
        })
    })
}

/// Rule 3: recommend the remaining quiz module that closes the most
/// important open gaps. Before any gap exists, fall back to the first
/// module in catalog order so a fresh assessment always has a next step.
fn run_quiz_module(state: &AgentState, actions: &mut Vec<AgentAction>) {
    let candidates: Vec<&'static QuizModuleDef> = QUIZ_MODULES
        .iter()
        .filter(|module| {
            !state.quiz_completed_modules.iter().any(|done| done == module.id)
                && !state.quiz_in_progress_modules.iter().any(|open| open == module.id)
        })
        .collect();

    if candidates.is_empty() {
        return;
    }

    let recommendation = coverage::recommend_module(&candidates, &state.gaps).or_else(|| {
        if state.quiz_completed_modules.is_empty() {
            let first = candidates[0];
            Some(coverage::ModuleRecommendation {
                module_id: first.id.to_string(),
                module_name: first.name.to_string(),
                covered_gaps: Vec::new(),
                expected_impact: 15,
            })
        } else {
            None
        }
    });

    let Some(recommendation) = recommendation else {
        return;
    };

    let priority = if state.quiz_completed_modules.is_empty() || state.overall_confidence < 30 {
        Priority::High
    } else if state.overall_confidence < 50 {
        Priority::Medium
    } else {
        Priority::Low
    };

    actions.push(
        AgentAction::new(
            ActionType::RunQuizModule,
            priority,
            format!(
                "the {} module covers the highest-value open gaps",
                recommendation.module_name
            ),
        )
        .with_impact(recommendation.expected_impact)
        .with_meta("module_id", json!(recommendation.module_id))
        .with_meta("covered_gaps", json!(recommendation.covered_gaps)),
    );
}

/// Rule 4: dimensions far below target with missing source types get a
/// targeted probe each.
fn probe_weak_dimensions(state: &AgentState, actions: &mut Vec<AgentAction>) {
    for gap in &state.gaps {
        if gap.current_confidence < PROBE_THRESHOLD && !gap.missing_source_types.is_empty() {
            let missing: Vec<&str> = gap
                .missing_source_types
                .iter()
                .map(|kind| kind.label())
                .collect();
            actions.push(
                AgentAction::new(
                    ActionType::ProbeDimension,
                    Priority::Medium,
                    format!(
                        "{} sits at {} confidence with no {} evidence",
                        gap.dimension,
                        gap.current_confidence,
                        missing.join(" or ")
                    ),
                )
                .with_impact(10)
                .with_meta("dimension", json!(gap.dimension)),
            );
        }
    }
}

/// Rule 5: once two modules are done and no session has happened, the live
/// session is the best next source, more urgently when behavioral gaps
/// remain.
fn start_session(state: &AgentState, actions: &mut Vec<AgentAction>) {
    if state.quiz_completed_modules.len() < 2
        || state.session_completed
        || state.session_insights_count > 0
    {
        return;
    }

    let behavioral_gaps = state
        .gaps
        .iter()
        .filter(|gap| is_behavioral(&gap.dimension))
        .count();

    let priority = match behavioral_gaps {
        n if n >= 2 => Priority::High,
        1 => Priority::Medium,
        _ => Priority::Low,
    };

    actions.push(
        AgentAction::new(
            ActionType::StartSession,
            priority,
            format!("{behavioral_gaps} behavioral dimension(s) lack session evidence"),
        )
        .with_impact(15),
    );
}

/// Rule 6: the report unlocks at 60 overall; between 50 and 60 it is
/// offered as a provisional draft.
fn generate_report(state: &AgentState, actions: &mut Vec<AgentAction>) {
    if state.report_generated {
        return;
    }

    if state.overall_confidence >= REPORT_THRESHOLD {
        actions.push(
            AgentAction::new(
                ActionType::GenerateReport,
                Priority::High,
                "overall confidence supports a full report",
            )
            .with_impact(5),
        );
    } else if state.overall_confidence >= PROVISIONAL_REPORT_THRESHOLD {
        actions.push(
            AgentAction::new(
                ActionType::GenerateReport,
                Priority::Low,
                "a provisional report is possible, though several dimensions remain weakly evidenced",
            )
            .with_impact(5),
        );
    }
}

/// Rule 7: high confidence on top of an existing report justifies a refresh.
fn refine_report(state: &AgentState, actions: &mut Vec<AgentAction>) {
    if state.report_generated && state.overall_confidence >= REFINE_THRESHOLD {
        actions.push(
            AgentAction::new(
                ActionType::RefineReport,
                Priority::Medium,
                "confidence has risen since the report was generated",
            )
            .with_impact(5),
        );
    }
}

/// Rule 8: with gaps open and at least one source already connected,
/// recommend up to two more sources by affinity-weighted deficit.
fn connect_additional_sources(state: &AgentState, actions: &mut Vec<AgentAction>) {
    if state.gaps.is_empty() || state.connected_sources.is_empty() {
        return;
    }

    let unconnected: Vec<_> = DATA_SOURCES
        .iter()
        .filter(|source| !state.connected_sources.iter().any(|id| id == source.id))
        .collect();
    if unconnected.is_empty() {
        return;
    }

    for recommendation in coverage::recommend_sources(&unconnected, &state.gaps, 2) {
        actions.push(
            AgentAction::new(
                ActionType::ConnectSource,
                Priority::Medium,
                format!(
                    "{} speaks directly to the weakest open dimensions",
                    recommendation.source_name
                ),
            )
            .with_impact(recommendation.expected_impact)
            .with_meta("source_id", json!(recommendation.source_id)),
        );
    }
}
