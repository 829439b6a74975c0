use core_types::FlexBand;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// The numeric comparison metrics derived from the base scenario and summary fields.
///
/// Every field is an `Option`: a metric whose inputs are missing is `None`,
/// never zero, so it renders as the missing placeholder downstream.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DerivedMetrics {
    /// The scenario the base-case inputs were read from.
    pub base_scenario_id: Option<String>,

    // I. Value vs. Cost
    pub stabilized_value: Option<Decimal>,
    pub total_cost: Option<Decimal>,
    pub value_gap: Option<Decimal>,
    /// Percent points, e.g. `5.56`.
    pub value_gap_pct: Option<Decimal>,

    // II. Yield and Coverage
    pub yield_on_cost: Option<Decimal>,
    pub market_cap_rate: Option<Decimal>,
    pub yield_cap_spread_bps: Option<Decimal>,
    pub dscr: Option<Decimal>,
    pub dscr_target: Option<Decimal>,
    pub target_yield: Option<Decimal>,
    pub noi: Option<Decimal>,
    /// Positive when NOI falls short of what the target yield requires.
    pub noi_shortfall: Option<Decimal>,

    // III. Decision Insurance
    pub flex_before_break_pct: Option<Decimal>,
    pub flex_band: Option<FlexBand>,
    pub exposure_concentration_pct: Option<Decimal>,
    /// The first-break threshold as percent points of base total cost.
    pub first_break_threshold_pct_of_cost: Option<Decimal>,
}
