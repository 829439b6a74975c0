use crate::controls::controls_from_payload;
use crate::error::EngineError;
use crate::view_model::{DecisionInsuranceView, NormalizedViewModel, SummaryDisplay};
use analytics::{DerivedMetrics, DerivedMetricsCalculator};
use configuration::EngineConfig;
use core_types::{
    normalize_key, DecisionInsuranceBlock, FirstBreakCondition, LikelyWrongItem, MetricColumn,
    PrimaryControlVariable, ScenarioRow, MISSING_PLACEHOLDER,
};
use decision::{DecisionInputs, DecisionResolver, ProfileFamily, ReasonSignals};
use metrics::Formatter;
use normalizer::{canonicalize, humanize_metric_ref, CanonicalRecord};
use rust_decimal::Decimal;
use serde_json::Value;

/// Break metrics whose thresholds are absolute currency amounts.
const CURRENCY_BREAK_METRICS: &[&str] = &["value_gap", "noi", "total_cost", "stabilized_value"];

/// Wires the normalizer, formatter, calculator, resolver and provenance
/// reporter into a single pure `normalize` call.
pub struct ViewModelEngine {
    config: EngineConfig,
    formatter: Formatter,
    calculator: DerivedMetricsCalculator,
    resolver: DecisionResolver,
}

impl Default for ViewModelEngine {
    fn default() -> Self {
        let config = EngineConfig::default();
        Self {
            formatter: Formatter::new(config.formatting.clone()),
            calculator: DerivedMetricsCalculator::new(&config),
            resolver: DecisionResolver::default(),
            config,
        }
    }
}

impl ViewModelEngine {
    /// Validates `config` and builds every component from it.
    pub fn new(config: EngineConfig) -> Result<Self, EngineError> {
        configuration::validate(&config)?;
        Ok(Self {
            formatter: Formatter::new(config.formatting.clone()),
            calculator: DerivedMetricsCalculator::new(&config),
            resolver: DecisionResolver::new(&config)?,
            config,
        })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn formatter(&self) -> &Formatter {
        &self.formatter
    }

    /// Normalizes a raw analysis payload.
    ///
    /// Total: any payload, including `null` or a non-object, yields a view
    /// model. The same payload always yields an equal view model.
    pub fn normalize(&self, payload: &Value) -> NormalizedViewModel {
        let record = canonicalize(payload);
        self.assemble(record)
    }

    fn assemble(&self, record: CanonicalRecord) -> NormalizedViewModel {
        let profile_id = record
            .profile_id
            .clone()
            .or_else(|| record.tile_profile_id.clone())
            .or_else(|| record.content_profile_id.clone())
            .or_else(|| record.scope_items_profile_id.clone());
        let family = ProfileFamily::classify(profile_id.as_deref());

        let derived = self.calculator.calculate(&record.rows, &record.summary, &record.decision_insurance);

        let reason_signals = ReasonSignals {
            reason_text: record.reason_text.as_deref(),
            reason_code: record.reason_code.as_deref(),
            not_modeled_reason: record.provenance.not_modeled_reason.as_deref(),
        };
        let decision = self.resolver.resolve(
            &record.status_signals,
            family,
            &DecisionInputs::from(&derived),
            &reason_signals,
        );

        let unavailable_reasons = provenance::report(&record.provenance);
        let summary = self.summary_display(&derived);
        let decision_insurance = self.decision_insurance_view(record.decision_insurance, &derived);
        let controls = controls_from_payload(&record.controls, &self.config.controls);

        tracing::debug!(
            profile_id = ?profile_id,
            %family,
            status = %decision.resolution.status,
            unavailable = unavailable_reasons.len(),
            "View model assembled."
        );

        NormalizedViewModel {
            profile_id,
            profile_family: family,
            columns: relabel_columns(record.columns, family),
            rows: self.format_rows(record.rows),
            decision_status: decision.resolution.status,
            status_source: decision.resolution.source,
            computed_status: decision.resolution.computed,
            decision_reason: decision.reason,
            derived,
            summary,
            decision_insurance,
            unavailable_reasons,
            provenance: record.provenance,
            content: record.content,
            controls,
        }
    }

    fn format_rows(&self, mut rows: Vec<ScenarioRow>) -> Vec<ScenarioRow> {
        for cell in rows.iter_mut().flat_map(|row| row.cells.iter_mut()) {
            cell.formatted = self.formatter.format_cell(cell);
        }
        rows
    }

    fn summary_display(&self, derived: &DerivedMetrics) -> SummaryDisplay {
        let f = &self.formatter;
        let currency = |value: Option<Decimal>| self.currency(value);
        let percent = |value: Option<Decimal>| {
            value
                .map(|v| f.format_percent(v))
                .unwrap_or_else(|| MISSING_PLACEHOLDER.to_string())
        };
        let ratio = |value: Option<Decimal>| {
            value
                .map(|v| f.format_ratio(v))
                .unwrap_or_else(|| MISSING_PLACEHOLDER.to_string())
        };

        SummaryDisplay {
            stabilized_value: currency(derived.stabilized_value),
            total_cost: currency(derived.total_cost),
            value_gap: currency(derived.value_gap),
            value_gap_pct: f.format_optional_points(derived.value_gap_pct),
            yield_on_cost: f.format_value(derived.yield_on_cost, "yield_on_cost"),
            market_cap_rate: percent(derived.market_cap_rate),
            yield_cap_spread: f.format_bps(derived.yield_cap_spread_bps),
            dscr: ratio(derived.dscr),
            dscr_target: ratio(derived.dscr_target),
            target_yield: percent(derived.target_yield),
            noi: currency(derived.noi),
            noi_shortfall: currency(derived.noi_shortfall),
        }
    }

    fn decision_insurance_view(
        &self,
        block: DecisionInsuranceBlock,
        derived: &DerivedMetrics,
    ) -> DecisionInsuranceView {
        let f = &self.formatter;

        let flex_before_break = match (derived.flex_before_break_pct, derived.flex_band) {
            (Some(pct), Some(band)) => format!("{} ({})", f.format_percent_points(pct), band),
            (Some(pct), None) => f.format_percent_points(pct),
            _ => MISSING_PLACEHOLDER.to_string(),
        };

        DecisionInsuranceView {
            primary_control_variable: block
                .primary_control_variable
                .as_ref()
                .map(|pcv| self.primary_control_text(pcv))
                .unwrap_or_else(|| MISSING_PLACEHOLDER.to_string()),
            first_break_condition: block
                .first_break_condition
                .as_ref()
                .map(|condition| self.first_break_text(condition, derived))
                .unwrap_or_else(|| MISSING_PLACEHOLDER.to_string()),
            first_break_threshold: block
                .first_break_condition
                .as_ref()
                .map(|condition| self.first_break_threshold(condition, derived))
                .unwrap_or_else(|| MISSING_PLACEHOLDER.to_string()),
            flex_before_break,
            exposure_concentration: f.format_optional_points(derived.exposure_concentration_pct),
            ranked_likely_wrong: block
                .ranked_likely_wrong
                .iter()
                .enumerate()
                .map(|(index, item)| self.likely_wrong_text(index, item))
                .collect(),
            block,
        }
    }

    fn primary_control_text(&self, pcv: &PrimaryControlVariable) -> String {
        let mut details = Vec::new();
        if let Some(impact) = pcv.impact_pct {
            details.push(format!("{} impact", self.formatter.format_percent_points(impact)));
        }
        if let Some(severity) = pcv.severity.as_deref() {
            details.push(format!("{} severity", severity.to_lowercase()));
        }
        if details.is_empty() {
            pcv.label.clone()
        } else {
            format!("{} ({})", pcv.label, details.join(", "))
        }
    }

    /// `Value Gap <= $250,000 (5.6% of total cost) in Downside`.
    fn first_break_text(&self, condition: &FirstBreakCondition, derived: &DerivedMetrics) -> String {
        let operator = condition.operator.as_deref().unwrap_or("<=");
        let mut text = format!(
            "{} {} {}",
            humanize_metric_ref(&condition.break_metric),
            operator,
            self.first_break_threshold(condition, derived)
        );
        let scenario = condition.scenario_label.as_deref().or(condition.scenario_id.as_deref());
        if let Some(scenario) = scenario {
            text.push_str(" in ");
            text.push_str(scenario);
        }
        text
    }

    fn first_break_threshold(&self, condition: &FirstBreakCondition, derived: &DerivedMetrics) -> String {
        let Some(threshold) = condition.threshold else {
            return MISSING_PLACEHOLDER.to_string();
        };
        let key = normalize_key(&condition.break_metric);
        let rendered = if CURRENCY_BREAK_METRICS.contains(&key.as_str()) {
            self.formatter.format_currency(threshold)
        } else {
            self.formatter.format_decimal(threshold, &condition.break_metric)
        };
        match derived.first_break_threshold_pct_of_cost {
            Some(pct) => format!(
                "{} ({} of total cost)",
                rendered,
                self.formatter.format_percent_points(pct)
            ),
            None => rendered,
        }
    }

    fn likely_wrong_text(&self, index: usize, item: &LikelyWrongItem) -> String {
        let mut text = format!("{}. {}", index + 1, item.text);
        if let Some(impact) = item.impact_pct {
            text.push_str(&format!(" ({} impact)", self.formatter.format_percent_points(impact)));
        }
        text
    }

    fn currency(&self, value: Option<Decimal>) -> String {
        value
            .map(|v| self.formatter.format_currency(v))
            .unwrap_or_else(|| MISSING_PLACEHOLDER.to_string())
    }
}

/// Applies the family's label overrides to the column headers.
fn relabel_columns(columns: Vec<MetricColumn>, family: ProfileFamily) -> Vec<MetricColumn> {
    columns
        .into_iter()
        .map(|mut column| {
            if let Some(label) = family.label_override(&column.metric_ref) {
                column.label = label.to_string();
            }
            column
        })
        .collect()
}
