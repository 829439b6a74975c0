use crate::enums::{AvailabilityStatus, DecisionInsuranceField};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// A raw cell or summary value after coercion, before any formatting.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum RawValue {
    #[default]
    Missing,
    Number(Decimal),
    /// The upstream explicitly marked this metric as not modeled.
    NotModeled,
    /// A non-numeric string that could not be coerced.
    Text(String),
}

impl RawValue {
    pub fn as_decimal(&self) -> Option<Decimal> {
        match self {
            RawValue::Number(value) => Some(*value),
            _ => None,
        }
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, RawValue::Missing)
    }
}

/// A column of the scenario comparison table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetricColumn {
    pub id: String,
    pub label: String,
    pub metric_ref: String,
}

/// A single value in a scenario row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetricCell {
    pub col_id: String,
    pub metric_ref: String,
    pub value: RawValue,
    /// Pre-formatted text supplied by the upstream service, if any.
    pub display: Option<String>,
    /// The engine's own rendering; filled in during view-model assembly.
    pub formatted: String,
}

impl MetricCell {
    /// The last dotted segment of the metric reference: `debt.dscr` is keyed `dscr`.
    pub fn metric_key(&self) -> &str {
        self.metric_ref.rsplit('.').next().unwrap_or(&self.metric_ref).trim()
    }
}

/// One scenario (base, downside, ...) with its metric cells.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScenarioRow {
    pub id: String,
    pub label: String,
    pub cells: Vec<MetricCell>,
}

impl ScenarioRow {
    /// Cells whose metric key (the last dotted segment of the reference,
    /// case-insensitive) is one of `keys`, in column order.
    pub fn matching_cells<'a, 'k>(&'a self, keys: &'k [&'k str]) -> impl Iterator<Item = &'a MetricCell> + use<'a, 'k> {
        self.cells.iter().filter(move |cell| {
            let key = cell.metric_key();
            keys.iter().any(|wanted| key.eq_ignore_ascii_case(wanted))
        })
    }

    pub fn find_cell(&self, keys: &[&str]) -> Option<&MetricCell> {
        self.matching_cells(keys).next()
    }

    /// The first matching cell that actually holds a number.
    pub fn find_decimal(&self, keys: &[&str]) -> Option<Decimal> {
        self.matching_cells(keys).find_map(|cell| cell.value.as_decimal())
    }
}

/// Top-level summary numbers read from the payload outside of the scenario table.
///
/// Every field is optional; the derived-metrics calculator falls back to base-row
/// cells where a summary value is absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummaryInputs {
    pub stabilized_value: Option<Decimal>,
    pub total_cost: Option<Decimal>,
    pub value_gap: Option<Decimal>,
    pub yield_on_cost: Option<Decimal>,
    pub market_cap_rate: Option<Decimal>,
    pub yield_cap_spread_bps: Option<Decimal>,
    pub dscr: Option<Decimal>,
    pub dscr_target: Option<Decimal>,
    pub target_yield: Option<Decimal>,
    pub noi: Option<Decimal>,
}

/// User-adjustable stress and anchor controls.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Controls {
    pub stress_band_pct: u8,
    pub use_cost_anchor: bool,
    pub anchor_total_cost: Option<Decimal>,
    pub use_revenue_anchor: bool,
    pub anchor_revenue: Option<Decimal>,
}

impl Default for Controls {
    fn default() -> Self {
        Self {
            stress_band_pct: 10,
            use_cost_anchor: false,
            anchor_total_cost: None,
            use_revenue_anchor: false,
            anchor_revenue: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrimaryControlVariable {
    pub label: String,
    pub impact_pct: Option<Decimal>,
    pub severity: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FirstBreakCondition {
    pub scenario_id: Option<String>,
    pub scenario_label: Option<String>,
    pub break_metric: String,
    pub operator: Option<String>,
    pub threshold: Option<Decimal>,
    pub observed_value: Option<Decimal>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LikelyWrongItem {
    pub id: String,
    pub text: String,
    pub why: Option<String>,
    pub impact_pct: Option<Decimal>,
    pub severity: Option<String>,
}

/// Sensitivity and risk-disclosure fields layered on top of the decision status.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecisionInsuranceBlock {
    pub primary_control_variable: Option<PrimaryControlVariable>,
    pub first_break_condition: Option<FirstBreakCondition>,
    pub flex_before_break_pct: Option<Decimal>,
    pub exposure_concentration_pct: Option<Decimal>,
    pub ranked_likely_wrong: Vec<LikelyWrongItem>,
}

/// Availability metadata for a single field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldProvenance {
    pub status: AvailabilityStatus,
    pub reason: Option<String>,
    pub source: Option<String>,
}

impl FieldProvenance {
    pub fn is_unavailable(&self) -> bool {
        self.status == AvailabilityStatus::Unavailable
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProvenanceBlock {
    /// `None` when the payload does not say whether Decision Insurance is enabled.
    pub enabled: Option<bool>,
    pub decision_insurance: BTreeMap<DecisionInsuranceField, FieldProvenance>,
    pub status_source: Option<String>,
    pub not_modeled_reason: Option<String>,
    pub metric_refs_used: Vec<String>,
    /// Passed through untouched; always an object.
    pub scenario_inputs: Value,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RedFlagAction {
    pub flag: String,
    pub action: Option<String>,
}

/// Narrative content blocks shown alongside the decision.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentBlock {
    pub fastest_change: Option<String>,
    pub most_likely_wrong: Vec<String>,
    pub question_bank: Vec<String>,
    pub red_flags_actions: Vec<RedFlagAction>,
}
