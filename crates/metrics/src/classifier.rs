use core_types::MetricType;

const RATIO_MARKERS: &[&str] = &["dscr", "cap_rate"];
const PERCENT_MARKERS: &[&str] = &["yield_on_cost", "pct", "percent"];
const CURRENCY_MARKERS: &[&str] = &[
    "total_project_cost",
    "annual_revenue",
    "noi",
    "cost",
    "revenue",
    "income",
    "budget",
    "amount",
];

/// Infers the semantic type of a metric from its reference string.
///
/// The checks run in a fixed order (ratio, percent, currency), so
/// `returns.yield_on_cost` is a percent even though it contains `cost`.
/// Unknown references are plain numbers.
pub fn classify(metric_ref: &str) -> MetricType {
    let lowered = metric_ref.to_lowercase();
    let contains_any = |markers: &[&str]| markers.iter().any(|m| lowered.contains(m));

    if contains_any(RATIO_MARKERS) {
        MetricType::Ratio
    } else if contains_any(PERCENT_MARKERS) {
        MetricType::Percent
    } else if contains_any(CURRENCY_MARKERS) {
        MetricType::Currency
    } else {
        MetricType::Number
    }
}

/// True when the reference names yield-on-cost, which gets its own scale bands.
pub fn is_yield_on_cost(metric_ref: &str) -> bool {
    metric_ref.to_lowercase().contains("yield_on_cost")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_by_marker_priority() {
        assert_eq!(classify("debt.DSCR"), MetricType::Ratio);
        assert_eq!(classify("market.cap_rate"), MetricType::Ratio);
        assert_eq!(classify("returns.yield_on_cost"), MetricType::Percent);
        assert_eq!(classify("value_gap_pct"), MetricType::Percent);
        assert_eq!(classify("totals.total_project_cost"), MetricType::Currency);
        assert_eq!(classify("ops.net_operating_income"), MetricType::Currency);
        assert_eq!(classify("revenue.annual_revenue"), MetricType::Currency);
        assert_eq!(classify("units.count"), MetricType::Number);
        assert_eq!(classify(""), MetricType::Number);
    }

    #[test]
    fn ratio_markers_win_over_percent_markers() {
        assert_eq!(classify("cap_rate_pct"), MetricType::Ratio);
    }
}
