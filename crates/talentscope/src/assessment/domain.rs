use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Where a piece of evidence came from. Used for diversity weighting only,
/// never for gating.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceType {
    Quiz,
    Session,
    DataSource,
}

impl SourceType {
    pub const fn ordered() -> [Self; 3] {
        [Self::Quiz, Self::Session, Self::DataSource]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Quiz => "quiz",
            Self::Session => "session",
            Self::DataSource => "data_source",
        }
    }
}

/// One scored observation tied to a dimension. Atoms are append-only:
/// re-scoring produces new atoms and the old ones persist as provenance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfidenceSource {
    pub source_type: SourceType,
    pub dimension: String,
    /// 0-100.
    pub score: u8,
    pub evidence: String,
    pub timestamp: DateTime<Utc>,
    /// Identifier of the connected data source that produced this atom,
    /// when the atom came from data-source analysis.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub origin: Option<String>,
}

impl ConfidenceSource {
    pub fn new(
        source_type: SourceType,
        dimension: impl Into<String>,
        score: u8,
        evidence: impl Into<String>,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            source_type,
            dimension: dimension.into(),
            score: score.min(100),
            evidence: evidence.into(),
            timestamp,
            origin: None,
        }
    }

    pub fn with_origin(mut self, origin: impl Into<String>) -> Self {
        self.origin = Some(origin.into());
        self
    }
}

/// Derived view over one dimension's evidence list. `confidence` is always a
/// pure function of `sources`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DimensionConfidence {
    pub dimension: String,
    pub confidence: u8,
    pub source_count: usize,
    pub source_types: BTreeSet<SourceType>,
    pub sources: Vec<ConfidenceSource>,
}

/// Full confidence picture across every dimension with evidence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfidenceProfile {
    pub dimensions: BTreeMap<String, DimensionConfidence>,
    pub overall_confidence: u8,
    pub last_updated: DateTime<Utc>,
}

impl ConfidenceProfile {
    pub fn empty(now: DateTime<Utc>) -> Self {
        Self {
            dimensions: BTreeMap::new(),
            overall_confidence: 0,
            last_updated: now,
        }
    }
}

/// A dimension whose confidence sits below the remediation target. Computed
/// on demand; never persisted as authoritative state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DimensionGap {
    pub dimension: String,
    pub current_confidence: u8,
    pub target_confidence: u8,
    pub missing_source_types: Vec<SourceType>,
    pub importance: f64,
}

impl DimensionGap {
    pub fn deficit(&self) -> u8 {
        self.target_confidence.saturating_sub(self.current_confidence)
    }
}

/// Calibrated assessment output: the aptitude code plus per-dimension scores
/// and confidence values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComputedProfile {
    pub riasec_code: String,
    pub dimension_scores: BTreeMap<String, u8>,
    pub confidence_scores: BTreeMap<String, u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub constraints: Option<serde_json::Value>,
}

/// Read-only snapshot the orchestrator plans against. Assembled fresh by the
/// caller on every call; the planner never mutates it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AgentState {
    pub connected_sources: Vec<String>,
    pub quiz_completed_modules: Vec<String>,
    pub quiz_in_progress_modules: Vec<String>,
    pub session_completed: bool,
    pub session_insights_count: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence_profile: Option<ConfidenceProfile>,
    pub gaps: Vec<DimensionGap>,
    pub report_generated: bool,
    pub overall_confidence: u8,
}

/// Urgency bucket for a recommended action. Declaration order is the sort
/// order: critical first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    Critical,
    High,
    Medium,
    Low,
}

impl Priority {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Critical => "critical",
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
        }
    }
}

/// What the planner is asking the outer layers to do next.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionType {
    RequestAdditionalData,
    AnalyzeSource,
    RunQuizModule,
    ProbeDimension,
    StartSession,
    GenerateReport,
    RefineReport,
    ConnectSource,
}

impl ActionType {
    pub const fn label(self) -> &'static str {
        match self {
            Self::RequestAdditionalData => "request_additional_data",
            Self::AnalyzeSource => "analyze_source",
            Self::RunQuizModule => "run_quiz_module",
            Self::ProbeDimension => "probe_dimension",
            Self::StartSession => "start_session",
            Self::GenerateReport => "generate_report",
            Self::RefineReport => "refine_report",
            Self::ConnectSource => "connect_source",
        }
    }
}

/// One recommended next step, produced fresh on every orchestration call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentAction {
    pub action: ActionType,
    pub priority: Priority,
    pub reason: String,
    /// Estimated overall-confidence gain, 0-30.
    pub confidence_impact: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub blocked_by: Option<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub metadata: BTreeMap<String, serde_json::Value>,
}

impl AgentAction {
    pub fn new(action: ActionType, priority: Priority, reason: impl Into<String>) -> Self {
        Self {
            action,
            priority,
            reason: reason.into(),
            confidence_impact: 0,
            blocked_by: None,
            metadata: BTreeMap::new(),
        }
    }

    pub fn with_impact(mut self, impact: u8) -> Self {
        self.confidence_impact = impact.min(30);
        self
    }

    pub fn with_meta(mut self, key: &str, value: serde_json::Value) -> Self {
        self.metadata.insert(key.to_string(), value);
        self
    }
}
