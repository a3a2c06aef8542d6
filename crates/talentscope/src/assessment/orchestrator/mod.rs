//! Action orchestration: a pure planner over the current assessment state.
//!
//! Despite the "agent" name in product copy, nothing here holds state
//! between calls. Every invocation re-derives the full ranked plan from the
//! snapshot it is handed; callers must not assume action lists are cached or
//! stable across calls as evidence accumulates.

mod coverage;
mod rules;

pub use coverage::{
    data_source, quiz_module, recommend_module, recommend_sources, DataSourceDef,
    ModuleRecommendation, QuizModuleDef, SourceRecommendation, DATA_SOURCES, QUIZ_MODULES,
};

use super::domain::{AgentAction, AgentState};

/// Evaluate the snapshot and return the ranked, deduplicated action plan.
///
/// All rules run; nothing short-circuits. The final sort is by priority
/// (critical > high > medium > low) and is stable, so equal-priority actions
/// keep their rule-emission order. The ordering is exact and reproducible
/// for a given state.
pub fn evaluate_state(state: &AgentState) -> Vec<AgentAction> {
    let mut actions = rules::plan_actions(state);
    actions.sort_by_key(|action| action.priority);
    actions
}
