use crate::classifier::{classify, is_yield_on_cost};
use configuration::FormattingSettings;
use core_types::{is_not_modeled, MetricCell, MetricType, RawValue, MISSING_PLACEHOLDER, NOT_MODELED_PLACEHOLDER};
use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;

/// How a percent-typed value was interpreted before rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PercentScale {
    /// A fraction such as `0.08`; multiplied by 100.
    Fraction,
    /// Already in percent points such as `8.0`.
    Points,
    /// Above every expected yield band; rendered as-is.
    Unbanded,
}

/// Renders metric values into display strings.
///
/// All rounding is half away from zero on `Decimal`s, so the same input always
/// yields the same string for the UI and for exports.
#[derive(Debug, Clone, Default)]
pub struct Formatter {
    settings: FormattingSettings,
}

impl Formatter {
    pub fn new(settings: FormattingSettings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &FormattingSettings {
        &self.settings
    }

    /// Formats a scenario cell: its raw value first, then the upstream display
    /// text when the raw value is missing or unparsable, then a placeholder.
    pub fn format_cell(&self, cell: &MetricCell) -> String {
        match &cell.value {
            RawValue::Number(_) | RawValue::NotModeled => self.format_raw(&cell.value, &cell.metric_ref),
            RawValue::Missing | RawValue::Text(_) => match cell.display.as_deref() {
                Some(display) if is_not_modeled(display) => NOT_MODELED_PLACEHOLDER.to_string(),
                Some(display) if !display.trim().is_empty() => display.trim().to_string(),
                _ => self.format_raw(&cell.value, &cell.metric_ref),
            },
        }
    }

    pub fn format_raw(&self, value: &RawValue, metric_ref: &str) -> String {
        match value {
            RawValue::Missing => MISSING_PLACEHOLDER.to_string(),
            RawValue::NotModeled => NOT_MODELED_PLACEHOLDER.to_string(),
            RawValue::Text(text) if is_not_modeled(text) => NOT_MODELED_PLACEHOLDER.to_string(),
            RawValue::Text(text) if text.trim().is_empty() => MISSING_PLACEHOLDER.to_string(),
            RawValue::Text(text) => text.trim().to_string(),
            RawValue::Number(number) => self.format_decimal(*number, metric_ref),
        }
    }

    /// Formats an optional number typed by its metric reference.
    pub fn format_value(&self, value: Option<Decimal>, metric_ref: &str) -> String {
        match value {
            Some(number) => self.format_decimal(number, metric_ref),
            None => MISSING_PLACEHOLDER.to_string(),
        }
    }

    pub fn format_decimal(&self, value: Decimal, metric_ref: &str) -> String {
        match classify(metric_ref) {
            MetricType::Currency => self.format_currency(value),
            MetricType::Ratio => self.format_ratio(value),
            MetricType::Percent if is_yield_on_cost(metric_ref) => self.format_yield_on_cost(value),
            MetricType::Percent => self.format_percent(value),
            MetricType::Number => self.format_number(value),
        }
    }

    /// Whole units from 1,000 upward, cents below.
    pub fn format_currency(&self, value: Decimal) -> String {
        let dp = if value.abs() >= dec!(1000) { 0 } else { 2 };
        let (negative, digits) = self.render(value, dp, dp);
        let sign = if negative { "-" } else { "" };
        format!("{}{}{}", sign, self.settings.currency_symbol, digits)
    }

    pub fn format_ratio(&self, value: Decimal) -> String {
        self.signed(value, 2, 2)
    }

    pub fn format_number(&self, value: Decimal) -> String {
        self.signed(value, 0, 2)
    }

    /// General percent rule: magnitudes at or below the fraction ceiling are fractions.
    pub fn format_percent(&self, value: Decimal) -> String {
        let points = if value.abs() <= self.settings.fraction_ceiling {
            value.checked_mul(dec!(100)).unwrap_or(value)
        } else {
            value
        };
        self.format_percent_points(points)
    }

    /// Yield-on-cost gets three magnitude bands instead of the general rule.
    pub fn format_yield_on_cost(&self, value: Decimal) -> String {
        match self.yield_on_cost_scale(value) {
            PercentScale::Fraction => match value.checked_mul(dec!(100)) {
                Some(points) => self.format_percent_points(points),
                None => {
                    tracing::debug!(%value, "Yield on cost overflowed when scaled; rendering as-is.");
                    self.format_percent_points(value)
                }
            },
            PercentScale::Points => self.format_percent_points(value),
            PercentScale::Unbanded => {
                tracing::debug!(%value, "Yield on cost is above every expected band; rendering as-is.");
                self.format_percent_points(value)
            }
        }
    }

    /// Bands by magnitude, so negative yields scale like their positive counterparts.
    pub fn yield_on_cost_scale(&self, value: Decimal) -> PercentScale {
        let magnitude = value.abs();
        if magnitude <= self.settings.fraction_ceiling {
            PercentScale::Fraction
        } else if magnitude <= self.settings.yield_percent_ceiling {
            PercentScale::Points
        } else {
            PercentScale::Unbanded
        }
    }

    /// Renders a number that is already in percent points, never rescaling it.
    pub fn format_percent_points(&self, points: Decimal) -> String {
        format!("{}%", self.signed(points, 1, 1))
    }

    pub fn format_optional_points(&self, points: Option<Decimal>) -> String {
        points
            .map(|p| self.format_percent_points(p))
            .unwrap_or_else(|| MISSING_PLACEHOLDER.to_string())
    }

    /// Basis points, whole numbers: `250 bps`.
    pub fn format_bps(&self, bps: Option<Decimal>) -> String {
        bps.map(|b| format!("{} bps", self.signed(b, 0, 0)))
            .unwrap_or_else(|| MISSING_PLACEHOLDER.to_string())
    }

    fn signed(&self, value: Decimal, min_dp: u32, max_dp: u32) -> String {
        let (negative, digits) = self.render(value, min_dp, max_dp);
        if negative { format!("-{}", digits) } else { digits }
    }

    /// Rounds to at most `max_dp` places, pads to at least `min_dp`, groups the
    /// integer digits, and returns the sign separately.
    fn render(&self, value: Decimal, min_dp: u32, max_dp: u32) -> (bool, String) {
        let rounded = value.round_dp_with_strategy(max_dp, RoundingStrategy::MidpointAwayFromZero);
        let negative = rounded.is_sign_negative() && !rounded.is_zero();

        let mut magnitude = rounded.abs().normalize();
        if magnitude.scale() < min_dp {
            magnitude.rescale(min_dp);
        }

        let text = magnitude.to_string();
        let (integer, fraction) = match text.split_once('.') {
            Some((integer, fraction)) => (integer, Some(fraction)),
            None => (text.as_str(), None),
        };

        let mut out = group_digits(integer, &self.settings.thousands_separator);
        if let Some(fraction) = fraction {
            out.push_str(&self.settings.decimal_separator);
            out.push_str(fraction);
        }
        (negative, out)
    }
}

fn group_digits(digits: &str, separator: &str) -> String {
    let len = digits.len();
    let mut out = String::with_capacity(len + len / 3 * separator.len());
    for (index, ch) in digits.chars().enumerate() {
        if index > 0 && (len - index) % 3 == 0 {
            out.push_str(separator);
        }
        out.push(ch);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn formatter() -> Formatter {
        Formatter::default()
    }

    #[test]
    fn currency_switches_decimals_at_one_thousand() {
        let f = formatter();
        assert_eq!(f.format_decimal(dec!(950), "totals.total_project_cost"), "$950.00");
        assert_eq!(f.format_decimal(dec!(950000), "totals.total_project_cost"), "$950,000");
        assert_eq!(f.format_currency(dec!(999.995)), "$1,000.00");
        assert_eq!(f.format_currency(dec!(1000.5)), "$1,001");
        assert_eq!(f.format_currency(dec!(-250000)), "-$250,000");
    }

    #[test]
    fn ratios_have_exactly_two_decimals() {
        let f = formatter();
        assert_eq!(f.format_decimal(dec!(1.418), "debt.dscr"), "1.42");
        assert_eq!(f.format_decimal(dec!(1.3), "debt.dscr"), "1.30");
        assert_eq!(f.format_decimal(dec!(2), "base.DSCR_min"), "2.00");
        assert_eq!(f.format_decimal(dec!(0.0575), "market.cap_rate"), "0.06");
    }

    #[test]
    fn yield_on_cost_bands() {
        let f = formatter();
        let yoc = "returns.yield_on_cost";
        assert_eq!(f.format_decimal(dec!(0.08), yoc), "8.0%");
        assert_eq!(f.format_decimal(dec!(8.0), yoc), "8.0%");
        assert_eq!(f.format_decimal(dec!(135.9), yoc), "135.9%");
        assert_eq!(f.format_decimal(dec!(1.5), yoc), "150.0%");
        assert_eq!(f.format_decimal(dec!(1.51), yoc), "1.5%");
        assert_eq!(f.format_decimal(dec!(150), yoc), "150.0%");
        assert_eq!(f.format_decimal(dec!(212.4), yoc), "212.4%");
        assert_eq!(f.yield_on_cost_scale(dec!(150.01)), PercentScale::Unbanded);
    }

    #[test]
    fn negative_yields_band_by_magnitude() {
        let f = formatter();
        let yoc = "returns.yield_on_cost";
        assert_eq!(f.format_decimal(dec!(-0.02), yoc), "-2.0%");
        assert_eq!(f.format_decimal(dec!(-4.5), yoc), "-4.5%");
        assert_eq!(f.yield_on_cost_scale(dec!(-200)), PercentScale::Unbanded);
        assert_eq!(f.yield_on_cost_scale(Decimal::MIN), PercentScale::Unbanded);

        for value in [Decimal::MIN, Decimal::MAX] {
            assert!(f.format_decimal(value, yoc).ends_with('%'));
            assert!(f.format_decimal(value, "occupancy_pct").ends_with('%'));
            assert!(f.format_decimal(value, "totals.total_project_cost").contains('$'));
            assert!(!f.format_decimal(value, "debt.dscr").is_empty());
        }
    }

    #[test]
    fn general_percent_uses_magnitude() {
        let f = formatter();
        assert_eq!(f.format_decimal(dec!(0.125), "occupancy_pct"), "12.5%");
        assert_eq!(f.format_decimal(dec!(-0.05), "growth_percent"), "-5.0%");
        assert_eq!(f.format_decimal(dec!(12.5), "occupancy_pct"), "12.5%");
        assert_eq!(f.format_decimal(dec!(1234.56), "occupancy_pct"), "1,234.6%");
    }

    #[test]
    fn plain_numbers_use_up_to_two_decimals() {
        let f = formatter();
        assert_eq!(f.format_decimal(dec!(1234567), "units.count"), "1,234,567");
        assert_eq!(f.format_decimal(dec!(12.5), "units.count"), "12.5");
        assert_eq!(f.format_decimal(dec!(12.345), "units.count"), "12.35");
        assert_eq!(f.format_decimal(dec!(-0.001), "units.count"), "0");
    }

    #[test]
    fn placeholders_are_distinct() {
        let f = formatter();
        assert_eq!(f.format_raw(&RawValue::Missing, "debt.dscr"), "\u{2014}");
        assert_eq!(f.format_raw(&RawValue::NotModeled, "debt.dscr"), "Not modeled");
        assert_eq!(f.format_raw(&RawValue::Text("NOT MODELED".into()), "debt.dscr"), "Not modeled");
        assert_eq!(f.format_value(None, "totals.total_project_cost"), "\u{2014}");
        assert_ne!(MISSING_PLACEHOLDER, NOT_MODELED_PLACEHOLDER);
    }

    #[test]
    fn cells_fall_back_to_upstream_display_only_when_raw_is_unusable() {
        let f = formatter();
        let mut cell = MetricCell {
            col_id: "yoc".into(),
            metric_ref: "returns.yield_on_cost".into(),
            value: RawValue::Number(dec!(0.08)),
            display: Some("8.00 %".into()),
            formatted: String::new(),
        };
        assert_eq!(f.format_cell(&cell), "8.0%");

        cell.value = RawValue::Missing;
        assert_eq!(f.format_cell(&cell), "8.00 %");

        cell.display = None;
        assert_eq!(f.format_cell(&cell), "\u{2014}");
    }

    #[test]
    fn bps_and_points() {
        let f = formatter();
        assert_eq!(f.format_bps(Some(dec!(250))), "250 bps");
        assert_eq!(f.format_bps(Some(dec!(-49.6))), "-50 bps");
        assert_eq!(f.format_bps(None), "\u{2014}");
        assert_eq!(f.format_optional_points(Some(dec!(5.5555))), "5.6%");
    }

    #[test]
    fn separators_follow_settings() {
        let f = Formatter::new(FormattingSettings {
            currency_symbol: "\u{20ac}".into(),
            thousands_separator: ".".into(),
            decimal_separator: ",".into(),
            ..FormattingSettings::default()
        });
        assert_eq!(f.format_currency(dec!(4750000)), "\u{20ac}4.750.000");
        assert_eq!(f.format_ratio(dec!(1.25)), "1,25");
    }
}
