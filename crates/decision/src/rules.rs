use crate::error::DecisionError;
use crate::DecisionRule;
use analytics::{to_fraction, DerivedMetrics};
use configuration::{DecisionSettings, EngineConfig, FormattingSettings};
use core_types::DecisionStatus;
use rust_decimal::Decimal;

/// The numbers the computed decision rules look at.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DecisionInputs {
    pub spread_bps: Option<Decimal>,
    pub dscr: Option<Decimal>,
    pub dscr_target: Option<Decimal>,
    pub yield_on_cost: Option<Decimal>,
    pub target_yield: Option<Decimal>,
}

impl From<&DerivedMetrics> for DecisionInputs {
    fn from(metrics: &DerivedMetrics) -> Self {
        Self {
            spread_bps: metrics.yield_cap_spread_bps,
            dscr: metrics.dscr,
            dscr_target: metrics.dscr_target,
            yield_on_cost: metrics.yield_on_cost,
            target_yield: metrics.target_yield,
        }
    }
}

/// The default computed rule: yield/cap spread in basis points plus DSCR coverage.
#[derive(Debug, Clone)]
pub struct CapRateSpreadRule {
    go_spread_bps: Decimal,
    default_dscr_target: Decimal,
}

impl CapRateSpreadRule {
    pub fn new(config: &EngineConfig) -> Result<Self, DecisionError> {
        let params = &config.decision;
        if params.go_spread_bps < Decimal::ZERO {
            return Err(DecisionError::InvalidParameters(
                "go_spread_bps must not be negative".to_string(),
            ));
        }
        if params.default_dscr_target <= Decimal::ZERO {
            return Err(DecisionError::InvalidParameters(
                "default_dscr_target must be greater than 0".to_string(),
            ));
        }
        Ok(Self {
            go_spread_bps: params.go_spread_bps,
            default_dscr_target: params.default_dscr_target,
        })
    }
}

impl Default for CapRateSpreadRule {
    fn default() -> Self {
        let params = DecisionSettings::default();
        Self {
            go_spread_bps: params.go_spread_bps,
            default_dscr_target: params.default_dscr_target,
        }
    }
}

impl DecisionRule for CapRateSpreadRule {
    fn name(&self) -> &'static str {
        "cap_rate_spread"
    }

    /// A negative spread is `NO_GO` whatever the coverage; otherwise both the
    /// spread and the DSCR must be known.
    fn evaluate(&self, inputs: &DecisionInputs) -> Option<DecisionStatus> {
        let spread = inputs.spread_bps?;
        if spread < Decimal::ZERO {
            return Some(DecisionStatus::NoGo);
        }

        let dscr = inputs.dscr?;
        let target = inputs.dscr_target.unwrap_or(self.default_dscr_target);
        let covered = dscr >= target;

        Some(if spread >= self.go_spread_bps && covered {
            DecisionStatus::Go
        } else if covered {
            DecisionStatus::NeedsWork
        } else {
            DecisionStatus::NoGo
        })
    }
}

/// Direct yield-on-cost vs. target-yield comparison used by operating-business profiles.
#[derive(Debug, Clone)]
pub struct TargetYieldRule {
    near_miss_ratio: Decimal,
    fraction_ceiling: Decimal,
}

impl TargetYieldRule {
    pub fn new(config: &EngineConfig) -> Result<Self, DecisionError> {
        let ratio = config.decision.near_miss_ratio;
        if ratio <= Decimal::ZERO || ratio > Decimal::ONE {
            return Err(DecisionError::InvalidParameters(
                "near_miss_ratio must be in (0, 1]".to_string(),
            ));
        }
        Ok(Self {
            near_miss_ratio: ratio,
            fraction_ceiling: config.formatting.fraction_ceiling,
        })
    }

    fn to_fraction(&self, rate: Decimal) -> Decimal {
        to_fraction(rate, self.fraction_ceiling)
    }
}

impl Default for TargetYieldRule {
    fn default() -> Self {
        Self {
            near_miss_ratio: DecisionSettings::default().near_miss_ratio,
            fraction_ceiling: FormattingSettings::default().fraction_ceiling,
        }
    }
}

impl DecisionRule for TargetYieldRule {
    fn name(&self) -> &'static str {
        "target_yield"
    }

    fn evaluate(&self, inputs: &DecisionInputs) -> Option<DecisionStatus> {
        let yoc = self.to_fraction(inputs.yield_on_cost?);
        let target = self.to_fraction(inputs.target_yield?);
        if target <= Decimal::ZERO {
            return None;
        }

        Some(if yoc >= target {
            DecisionStatus::Go
        } else if target.checked_mul(self.near_miss_ratio).is_some_and(|floor| yoc >= floor) {
            DecisionStatus::NeedsWork
        } else {
            DecisionStatus::NoGo
        })
    }
}
