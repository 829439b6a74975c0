use crate::error::AnalyticsError;
use crate::report::DerivedMetrics;
use configuration::EngineConfig;
use core_types::{DecisionInsuranceBlock, FlexBand, ScenarioRow, SummaryInputs};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

const STABILIZED_VALUE_REFS: &[&str] = &["stabilized_value", "stabilised_value"];
const TOTAL_COST_REFS: &[&str] = &["total_project_cost", "total_cost"];
const YIELD_ON_COST_REFS: &[&str] = &["yield_on_cost"];
const CAP_RATE_REFS: &[&str] = &["market_cap_rate", "exit_cap_rate", "cap_rate"];
const DSCR_REFS: &[&str] = &["dscr"];
const NOI_REFS: &[&str] = &["net_operating_income", "noi"];

/// The break metric whose threshold is an absolute currency amount.
const VALUE_GAP_METRIC: &str = "value_gap";

/// Picks the base scenario: `id == "base"`, else a row labelled `base`, else the first row.
pub fn select_base_row(rows: &[ScenarioRow]) -> Option<&ScenarioRow> {
    rows.iter()
        .find(|row| row.id == "base")
        .or_else(|| rows.iter().find(|row| row.label.to_lowercase() == "base"))
        .or_else(|| rows.first())
}

/// A stateless calculator for the comparison metrics shown next to the decision.
#[derive(Debug, Clone)]
pub struct DerivedMetricsCalculator {
    fraction_ceiling: Decimal,
    flex_tight_below_pct: Decimal,
    flex_flexible_from_pct: Decimal,
}

impl Default for DerivedMetricsCalculator {
    fn default() -> Self {
        Self::new(&EngineConfig::default())
    }
}

impl DerivedMetricsCalculator {
    pub fn new(config: &EngineConfig) -> Self {
        Self {
            fraction_ceiling: config.formatting.fraction_ceiling,
            flex_tight_below_pct: config.decision.flex_tight_below_pct,
            flex_flexible_from_pct: config.decision.flex_flexible_from_pct,
        }
    }

    /// The main entry point for deriving metrics.
    ///
    /// # Arguments
    ///
    /// * `rows` - The normalized scenario rows; the base row supplies fallbacks.
    /// * `summary` - Top-level summary numbers, which win over base-row cells.
    /// * `insurance` - The Decision-Insurance block (flex, break condition, drivers).
    pub fn calculate(
        &self,
        rows: &[ScenarioRow],
        summary: &SummaryInputs,
        insurance: &DecisionInsuranceBlock,
    ) -> DerivedMetrics {
        let base = select_base_row(rows);
        let from_base = |needles: &[&str]| base.and_then(|row| row.find_decimal(needles));

        let mut metrics = DerivedMetrics {
            base_scenario_id: base.map(|row| row.id.clone()),
            stabilized_value: summary.stabilized_value.or_else(|| from_base(STABILIZED_VALUE_REFS)),
            total_cost: summary.total_cost.or_else(|| from_base(TOTAL_COST_REFS)),
            yield_on_cost: summary.yield_on_cost.or_else(|| from_base(YIELD_ON_COST_REFS)),
            market_cap_rate: summary.market_cap_rate.or_else(|| from_base(CAP_RATE_REFS)),
            dscr: summary.dscr.or_else(|| from_base(DSCR_REFS)),
            dscr_target: summary.dscr_target,
            target_yield: summary.target_yield,
            noi: summary.noi.or_else(|| from_base(NOI_REFS)),
            flex_before_break_pct: insurance.flex_before_break_pct,
            ..DerivedMetrics::default()
        };

        self.calculate_value_gap(summary, &mut metrics);
        self.calculate_spread(summary, &mut metrics);
        self.calculate_noi_shortfall(&mut metrics);
        self.calculate_insurance_metrics(insurance, &mut metrics);

        tracing::debug!(
            base = ?metrics.base_scenario_id,
            value_gap = ?metrics.value_gap,
            spread_bps = ?metrics.yield_cap_spread_bps,
            flex_band = ?metrics.flex_band,
            "Derived metrics calculated."
        );
        metrics
    }

    /// Value gap (explicit wins) and value gap as a percent of total cost.
    fn calculate_value_gap(&self, summary: &SummaryInputs, metrics: &mut DerivedMetrics) {
        metrics.value_gap = summary.value_gap.or_else(|| {
            let value = metrics.stabilized_value?;
            let cost = metrics.total_cost?;
            value.checked_sub(cost)
        });

        metrics.value_gap_pct = match (metrics.value_gap, metrics.total_cost) {
            (Some(gap), Some(cost)) => log_failure(percent_of(gap, cost, "value_gap_pct")),
            _ => None,
        };
    }

    /// Yield/cap spread in basis points; an explicit spread wins over the derived one.
    fn calculate_spread(&self, summary: &SummaryInputs, metrics: &mut DerivedMetrics) {
        metrics.yield_cap_spread_bps = summary.yield_cap_spread_bps.or_else(|| {
            let yoc = self.to_fraction(metrics.yield_on_cost?);
            let cap = self.to_fraction(metrics.market_cap_rate?);
            log_failure(
                yoc.checked_sub(cap)
                    .and_then(|diff| diff.checked_mul(dec!(10000)))
                    .ok_or(AnalyticsError::Overflow("yield_cap_spread_bps")),
            )
        });
    }

    /// NOI required by the target yield minus actual NOI.
    fn calculate_noi_shortfall(&self, metrics: &mut DerivedMetrics) {
        metrics.noi_shortfall = self.noi_shortfall(metrics);
    }

    fn noi_shortfall(&self, metrics: &DerivedMetrics) -> Option<Decimal> {
        let target = self.to_fraction(metrics.target_yield?);
        let required = target.checked_mul(metrics.total_cost?)?;
        required.checked_sub(metrics.noi?)
    }

    fn calculate_insurance_metrics(
        &self,
        insurance: &DecisionInsuranceBlock,
        metrics: &mut DerivedMetrics,
    ) {
        metrics.flex_band = metrics.flex_before_break_pct.map(|pct| self.flex_band(pct));

        metrics.exposure_concentration_pct = insurance
            .exposure_concentration_pct
            .or_else(|| log_failure(exposure_concentration(insurance)));

        metrics.first_break_threshold_pct_of_cost = insurance
            .first_break_condition
            .as_ref()
            .filter(|condition| condition.break_metric.eq_ignore_ascii_case(VALUE_GAP_METRIC))
            .and_then(|condition| {
                let threshold = condition.threshold?;
                let cost = metrics.total_cost?;
                log_failure(percent_of(threshold, cost, "first_break_threshold_pct_of_cost"))
            });
    }

    /// Bands a flex-before-break percentage. The input is already in percent
    /// points and is never rescaled; each band includes its lower edge.
    pub fn flex_band(&self, pct: Decimal) -> FlexBand {
        if pct < self.flex_tight_below_pct {
            FlexBand::StructurallyTight
        } else if pct < self.flex_flexible_from_pct {
            FlexBand::Moderate
        } else {
            FlexBand::Flexible
        }
    }

    fn to_fraction(&self, rate: Decimal) -> Decimal {
        to_fraction(rate, self.fraction_ceiling)
    }
}

/// Brings a yield or cap rate to fraction scale (`8.0` becomes `0.08`).
///
/// Magnitudes above `fraction_ceiling` are taken to be percent points.
pub fn to_fraction(rate: Decimal, fraction_ceiling: Decimal) -> Decimal {
    if rate.abs() > fraction_ceiling {
        rate / dec!(100)
    } else {
        rate
    }
}

/// `part / whole * 100`, failing on a zero denominator.
pub fn percent_of(
    part: Decimal,
    whole: Decimal,
    metric: &'static str,
) -> Result<Decimal, AnalyticsError> {
    if whole.is_zero() {
        return Err(AnalyticsError::DivisionByZero(metric));
    }
    part.checked_div(whole)
        .and_then(|ratio| ratio.checked_mul(dec!(100)))
        .ok_or(AnalyticsError::Overflow(metric))
}

/// The largest driver's share of total absolute impact across the ranked likely-wrong list.
pub fn exposure_concentration(
    insurance: &DecisionInsuranceBlock,
) -> Result<Decimal, AnalyticsError> {
    let impacts: Vec<Decimal> = insurance
        .ranked_likely_wrong
        .iter()
        .filter_map(|item| item.impact_pct.map(|impact| impact.abs()))
        .collect();

    let largest = impacts
        .iter()
        .copied()
        .max()
        .ok_or(AnalyticsError::NotEnoughData("exposure_concentration_pct"))?;
    let total = impacts
        .iter()
        .try_fold(Decimal::ZERO, |acc, impact| acc.checked_add(*impact))
        .ok_or(AnalyticsError::Overflow("exposure_concentration_pct"))?;

    percent_of(largest, total, "exposure_concentration_pct")
}

fn log_failure(result: Result<Decimal, AnalyticsError>) -> Option<Decimal> {
    match result {
        Ok(value) => Some(value),
        Err(e) => {
            tracing::debug!(error = %e, "Derived metric left empty.");
            None
        }
    }
}
