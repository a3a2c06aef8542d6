//! Evidence-weighted confidence and recommendation engine.
//!
//! The `assessment` module holds the deterministic core: confidence
//! calculation, profile building, gap analysis, action planning, and quiz
//! answer scoring. Everything else is configuration and telemetry plumbing
//! shared with the HTTP service in `services/api`.

pub mod assessment;
pub mod config;
pub mod error;
pub mod telemetry;
