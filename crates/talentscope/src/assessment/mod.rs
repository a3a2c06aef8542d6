//! Deterministic assessment core: evidence atoms in, calibrated scores and a
//! ranked action plan out.
//!
//! Every function in this module is a pure transformation over its arguments.
//! Nothing here performs I/O except the quiz scorer's single batched call to
//! the text-understanding service, which sits behind the [`scoring::TextUnderstanding`]
//! trait so tests and degraded deployments can swap it out.

pub mod confidence;
pub mod dimensions;
pub mod domain;
pub mod gaps;
pub mod orchestrator;
pub mod profile;
pub mod scoring;

#[cfg(test)]
mod tests;

pub use confidence::{build_confidence_profile, compute_dimension_confidence};
pub use dimensions::{canonical_dimension, dimension_importance, is_behavioral, Riasec};
pub use domain::{
    ActionType, AgentAction, AgentState, ComputedProfile, ConfidenceProfile, ConfidenceSource,
    DimensionConfidence, DimensionGap, Priority, SourceType,
};
pub use gaps::{identify_gaps, DEFAULT_TARGET_CONFIDENCE};
pub use orchestrator::{evaluate_state, recommend_module, recommend_sources};
pub use profile::{
    build_computed_profile, ProfileInputs, QuizDimensionScore, SessionInsight, TalentSignal,
};
pub use scoring::{AnswerValue, QuizAnswer, QuizQuestion, QuizScorer, QuizScoringOutcome};
