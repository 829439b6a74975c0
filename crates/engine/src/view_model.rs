use crate::error::EngineError;
use analytics::DerivedMetrics;
use core_types::{
    ContentBlock, Controls, DecisionInsuranceBlock, DecisionStatus, MetricColumn, ProvenanceBlock,
    ScenarioRow, StatusSource,
};
use decision::{DecisionReason, ProfileFamily};
use serde::Serialize;

/// The canonical, fully formatted structure handed to the presentation layer.
///
/// Built fresh by every normalization and never mutated afterwards; callers
/// replace it wholesale.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NormalizedViewModel {
    pub profile_id: Option<String>,
    pub profile_family: ProfileFamily,
    pub columns: Vec<MetricColumn>,
    pub rows: Vec<ScenarioRow>,
    pub decision_status: DecisionStatus,
    /// Which step of the cascade produced `decision_status`.
    pub status_source: StatusSource,
    /// The computed status, kept for cross-checking when an explicit one won.
    pub computed_status: Option<DecisionStatus>,
    pub decision_reason: DecisionReason,
    pub derived: DerivedMetrics,
    pub summary: SummaryDisplay,
    pub decision_insurance: DecisionInsuranceView,
    /// Deduplicated reasons for every unavailable Decision-Insurance field.
    pub unavailable_reasons: Vec<String>,
    pub provenance: ProvenanceBlock,
    pub content: ContentBlock,
    pub controls: Controls,
}

impl NormalizedViewModel {
    pub fn to_json(&self) -> Result<String, EngineError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Derived metrics as display strings, shared by the UI and exports.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SummaryDisplay {
    pub stabilized_value: String,
    pub total_cost: String,
    pub value_gap: String,
    pub value_gap_pct: String,
    pub yield_on_cost: String,
    pub market_cap_rate: String,
    pub yield_cap_spread: String,
    pub dscr: String,
    pub dscr_target: String,
    pub target_yield: String,
    pub noi: String,
    pub noi_shortfall: String,
}

/// The Decision-Insurance block together with its rendered strings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DecisionInsuranceView {
    pub block: DecisionInsuranceBlock,
    pub primary_control_variable: String,
    pub first_break_condition: String,
    /// e.g. `$250,000 (5.6% of total cost)`.
    pub first_break_threshold: String,
    /// e.g. `3.4% (Moderate)`.
    pub flex_before_break: String,
    pub exposure_concentration: String,
    pub ranked_likely_wrong: Vec<String>,
}
