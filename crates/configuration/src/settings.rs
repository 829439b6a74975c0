use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Deserialize;

/// The root configuration structure for the decision engine.
///
/// Every section has defaults, so an absent `dealshield.toml` yields the
/// standard behaviour.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub formatting: FormattingSettings,
    pub decision: DecisionSettings,
    pub controls: ControlsSettings,
}

/// Locale and unit-scale settings used by the value formatter.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct FormattingSettings {
    pub currency_symbol: String,
    pub thousands_separator: String,
    pub decimal_separator: String,
    /// Percent values with a magnitude at or below this are treated as fractions.
    pub fraction_ceiling: Decimal,
    /// Yield-on-cost values above this are outside every known scale and rendered as-is.
    pub yield_percent_ceiling: Decimal,
}

impl Default for FormattingSettings {
    fn default() -> Self {
        Self {
            currency_symbol: "$".to_string(),
            thousands_separator: ",".to_string(),
            decimal_separator: ".".to_string(),
            fraction_ceiling: dec!(1.5),
            yield_percent_ceiling: dec!(150),
        }
    }
}

/// Thresholds for the derived and profile-override decision rules.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct DecisionSettings {
    /// Minimum yield/cap spread for a `GO`.
    pub go_spread_bps: Decimal,
    /// DSCR target used when the payload does not supply one.
    pub default_dscr_target: Decimal,
    /// Fraction of target yield that still counts as a near miss (`NEEDS_WORK`).
    pub near_miss_ratio: Decimal,
    /// Flex-before-break below this is structurally tight.
    pub flex_tight_below_pct: Decimal,
    /// Flex-before-break at or above this is flexible.
    pub flex_flexible_from_pct: Decimal,
}

impl Default for DecisionSettings {
    fn default() -> Self {
        Self {
            go_spread_bps: dec!(200),
            default_dscr_target: dec!(1.25),
            near_miss_ratio: dec!(0.95),
            flex_tight_below_pct: dec!(2),
            flex_flexible_from_pct: dec!(5),
        }
    }
}

/// The allowed stress bands for controls updates.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ControlsSettings {
    pub stress_bands: Vec<u8>,
    /// Any requested band outside `stress_bands` snaps to this.
    pub default_stress_band: u8,
}

impl Default for ControlsSettings {
    fn default() -> Self {
        Self {
            stress_bands: vec![10, 7, 5, 3],
            default_stress_band: 10,
        }
    }
}
