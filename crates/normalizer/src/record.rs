use crate::coerce::{
    as_array, as_object, coerce_bool, coerce_decimal, coerce_raw, coerce_string, NULL,
};
use crate::fields;
use crate::paths::{first_key, FieldSpec, PayloadScope};
use core_types::{
    AvailabilityStatus, ContentBlock, DecisionInsuranceBlock, DecisionInsuranceField,
    FieldProvenance, FirstBreakCondition, LikelyWrongItem, MetricCell, MetricColumn,
    PrimaryControlVariable, ProvenanceBlock, RedFlagAction, ScenarioRow, SummaryInputs,
};
use rust_decimal::Decimal;
use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::{BTreeMap, HashMap};

/// Controls exactly as the payload reported them; snapping happens later.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RawControls {
    pub stress_band_pct: Option<Decimal>,
    pub use_cost_anchor: bool,
    pub anchor_total_cost: Option<Decimal>,
    pub use_revenue_anchor: bool,
    pub anchor_revenue: Option<Decimal>,
}

/// The payload coalesced into one canonical shape.
///
/// Produced by `canonicalize`; every collection is present (possibly empty)
/// and every scalar is an `Option`, so consumers never check for existence.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CanonicalRecord {
    pub profile_id: Option<String>,
    pub tile_profile_id: Option<String>,
    pub content_profile_id: Option<String>,
    pub scope_items_profile_id: Option<String>,
    /// Every present status string, in candidate order.
    pub status_signals: Vec<String>,
    pub reason_code: Option<String>,
    pub reason_text: Option<String>,
    pub columns: Vec<MetricColumn>,
    pub rows: Vec<ScenarioRow>,
    pub summary: SummaryInputs,
    pub decision_insurance: DecisionInsuranceBlock,
    pub provenance: ProvenanceBlock,
    pub content: ContentBlock,
    pub controls: RawControls,
}

/// Coalesces an arbitrarily shaped payload into a `CanonicalRecord`.
///
/// This never fails: anything malformed is replaced by an empty default.
pub fn canonicalize(payload: &Value) -> CanonicalRecord {
    let scope = PayloadScope::new(payload);

    let columns = read_columns(&scope);
    let rows = read_rows(&scope, &columns);

    let record = CanonicalRecord {
        profile_id: string_field(&scope, &fields::PROFILE_ID),
        tile_profile_id: string_field(&scope, &fields::TILE_PROFILE_ID),
        content_profile_id: string_field(&scope, &fields::CONTENT_PROFILE_ID),
        scope_items_profile_id: string_field(&scope, &fields::SCOPE_ITEMS_PROFILE_ID),
        status_signals: scope
            .resolve_all(&fields::DECISION_STATUS)
            .into_iter()
            .filter_map(|(_, value)| coerce_string(value))
            .collect(),
        reason_code: string_field(&scope, &fields::DECISION_REASON_CODE),
        reason_text: string_field(&scope, &fields::DECISION_REASON_TEXT),
        columns,
        rows,
        summary: read_summary(&scope),
        decision_insurance: read_decision_insurance(&scope),
        provenance: read_provenance(&scope),
        content: read_content(&scope),
        controls: read_controls(&scope),
    };

    tracing::debug!(
        profile_id = ?record.profile_id,
        columns = record.columns.len(),
        rows = record.rows.len(),
        status_signals = record.status_signals.len(),
        "Payload canonicalized."
    );
    record
}

fn string_field(scope: &PayloadScope<'_>, field_spec: &FieldSpec) -> Option<String> {
    scope.resolve_with(field_spec, |v| coerce_string(v).is_some()).and_then(coerce_string)
}

/// The first present candidate decides; an unparsable value there is null, not a
/// reason to keep looking.
fn decimal_field(scope: &PayloadScope<'_>, field_spec: &FieldSpec) -> Option<Decimal> {
    scope.resolve(field_spec).and_then(coerce_decimal)
}

fn object_field<'a>(scope: &PayloadScope<'a>, field_spec: &FieldSpec) -> &'a Map<String, Value> {
    scope
        .resolve(field_spec)
        .map(|value| as_object(value, field_spec.name))
        .unwrap_or_else(|| as_object(&NULL, field_spec.name))
}

fn array_field<'a>(scope: &PayloadScope<'a>, field_spec: &FieldSpec) -> &'a [Value] {
    scope
        .resolve_with(field_spec, Value::is_array)
        .map(|value| as_array(value, field_spec.name))
        .unwrap_or(&[])
}

fn text_of(value: &Value, keys: &[&str]) -> Option<String> {
    match value {
        Value::Object(_) => first_key(value, keys).and_then(coerce_string),
        other => coerce_string(other),
    }
}

fn key_string(value: &Value, keys: &[&str]) -> Option<String> {
    first_key(value, keys).and_then(coerce_string)
}

fn key_decimal(value: &Value, keys: &[&str]) -> Option<Decimal> {
    first_key(value, keys).and_then(coerce_decimal)
}

/// `totals.total_project_cost` becomes `Total Project Cost`.
pub fn humanize_metric_ref(metric_ref: &str) -> String {
    let tail = metric_ref.rsplit('.').next().unwrap_or(metric_ref);
    tail.split(|c: char| c == '_' || c == '-' || c.is_whitespace())
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn read_columns(scope: &PayloadScope<'_>) -> Vec<MetricColumn> {
    array_field(scope, &fields::COLUMNS)
        .iter()
        .enumerate()
        .filter_map(|(index, column)| {
            if !column.is_object() {
                return None;
            }
            let metric_ref = key_string(column, &["metric_ref", "metricRef", "ref"]);
            let id = key_string(column, &["id", "col_id", "colId"])
                .or_else(|| metric_ref.clone())
                .unwrap_or_else(|| format!("col_{}", index + 1));
            let metric_ref = metric_ref.unwrap_or_else(|| id.clone());
            let label = key_string(column, &["label", "name", "title"])
                .unwrap_or_else(|| humanize_metric_ref(&metric_ref));
            Some(MetricColumn { id, label, metric_ref })
        })
        .collect()
}

fn read_rows(scope: &PayloadScope<'_>, columns: &[MetricColumn]) -> Vec<ScenarioRow> {
    let refs_by_col: HashMap<&str, &str> = columns
        .iter()
        .map(|c| (c.id.as_str(), c.metric_ref.as_str()))
        .collect();

    array_field(scope, &fields::ROWS)
        .iter()
        .enumerate()
        .filter(|(_, row)| row.is_object())
        .map(|(index, row)| {
            let id = key_string(row, &["scenario_id", "scenarioId", "id"])
                .unwrap_or_else(|| format!("scenario_{}", index + 1));
            let label = key_string(row, &["label", "name", "scenario_label"])
                .unwrap_or_else(|| id.clone());
            let cells = read_cells(row.get("cells").unwrap_or(&NULL), &refs_by_col);
            ScenarioRow { id, label, cells }
        })
        .collect()
}

fn read_cells(cells: &Value, refs_by_col: &HashMap<&str, &str>) -> Vec<MetricCell> {
    let build = |col_id: String, cell: &Value| -> MetricCell {
        let (value, metric_ref, display) = if cell.is_object() {
            (
                cell.get("value").map(coerce_raw).unwrap_or_default(),
                key_string(cell, &["metric_ref", "metricRef"]),
                key_string(cell, &["display", "display_value", "displayValue", "formatted"]),
            )
        } else {
            (coerce_raw(cell), None, None)
        };
        let metric_ref = metric_ref
            .or_else(|| refs_by_col.get(col_id.as_str()).map(|r| r.to_string()))
            .unwrap_or_else(|| col_id.clone());
        MetricCell {
            col_id,
            metric_ref,
            value,
            display,
            formatted: String::new(),
        }
    };

    match cells {
        Value::Array(items) => items
            .iter()
            .enumerate()
            .filter(|(_, cell)| cell.is_object())
            .map(|(index, cell)| {
                let col_id = key_string(cell, &["col_id", "colId", "column_id", "id"])
                    .or_else(|| key_string(cell, &["metric_ref", "metricRef"]))
                    .unwrap_or_else(|| format!("col_{}", index + 1));
                build(col_id, cell)
            })
            .collect(),
        // Cells keyed by column id: `{"cost": 4500000, "yoc": {"value": 0.08}}`.
        Value::Object(map) => map
            .iter()
            .map(|(col_id, cell)| build(col_id.clone(), cell))
            .collect(),
        _ => Vec::new(),
    }
}

fn read_summary(scope: &PayloadScope<'_>) -> SummaryInputs {
    SummaryInputs {
        stabilized_value: decimal_field(scope, &fields::STABILIZED_VALUE),
        total_cost: decimal_field(scope, &fields::TOTAL_COST),
        value_gap: decimal_field(scope, &fields::VALUE_GAP),
        yield_on_cost: decimal_field(scope, &fields::YIELD_ON_COST),
        market_cap_rate: decimal_field(scope, &fields::MARKET_CAP_RATE),
        yield_cap_spread_bps: decimal_field(scope, &fields::YIELD_CAP_SPREAD_BPS),
        dscr: decimal_field(scope, &fields::DSCR),
        dscr_target: decimal_field(scope, &fields::DSCR_TARGET),
        target_yield: decimal_field(scope, &fields::TARGET_YIELD),
        noi: decimal_field(scope, &fields::NOI),
    }
}

fn read_decision_insurance(scope: &PayloadScope<'_>) -> DecisionInsuranceBlock {
    let primary_control_variable = scope
        .resolve(&fields::PRIMARY_CONTROL_VARIABLE)
        .and_then(|value| {
            let label = text_of(value, &["label", "name", "variable"])?;
            Some(PrimaryControlVariable {
                label,
                impact_pct: key_decimal(value, &["impact_pct", "impactPct"]),
                severity: key_string(value, &["severity"]),
            })
        });

    let first_break_condition = scope
        .resolve_with(&fields::FIRST_BREAK_CONDITION, Value::is_object)
        .and_then(|value| {
            Some(FirstBreakCondition {
                scenario_id: key_string(value, &["scenario_id", "scenarioId"]),
                scenario_label: key_string(value, &["scenario_label", "scenarioLabel"]),
                break_metric: key_string(value, &["break_metric", "breakMetric", "metric"])?,
                operator: key_string(value, &["operator", "op"]),
                threshold: key_decimal(value, &["threshold"]),
                observed_value: key_decimal(value, &["observed_value", "observedValue"]),
            })
        });

    let ranked_likely_wrong = array_field(scope, &fields::RANKED_LIKELY_WRONG)
        .iter()
        .enumerate()
        .filter_map(|(index, item)| {
            let text = text_of(item, &["text", "label", "title"])?;
            Some(LikelyWrongItem {
                id: key_string(item, &["id"]).unwrap_or_else(|| format!("lw_{}", index + 1)),
                text,
                why: key_string(item, &["why", "reason"]),
                impact_pct: key_decimal(item, &["impact_pct", "impactPct"]),
                severity: key_string(item, &["severity"]),
            })
        })
        .collect();

    DecisionInsuranceBlock {
        primary_control_variable,
        first_break_condition,
        flex_before_break_pct: decimal_field(scope, &fields::FLEX_BEFORE_BREAK_PCT),
        exposure_concentration_pct: decimal_field(scope, &fields::EXPOSURE_CONCENTRATION_PCT),
        ranked_likely_wrong,
    }
}

fn read_field_provenance(value: &Value) -> FieldProvenance {
    match value {
        Value::Object(_) => FieldProvenance {
            status: key_string(value, &["status"])
                .map(|s| AvailabilityStatus::parse(&s))
                .unwrap_or_default(),
            reason: key_string(value, &["reason", "reason_code"]),
            source: key_string(value, &["source"]),
        },
        Value::String(status) => FieldProvenance {
            status: AvailabilityStatus::parse(status),
            ..FieldProvenance::default()
        },
        _ => FieldProvenance::default(),
    }
}

fn read_provenance(scope: &PayloadScope<'_>) -> ProvenanceBlock {
    let insurance = scope
        .resolve_with(&fields::DECISION_INSURANCE_PROVENANCE, Value::is_object)
        .unwrap_or(&NULL);

    let decision_insurance: BTreeMap<DecisionInsuranceField, FieldProvenance> =
        DecisionInsuranceField::ALL
            .into_iter()
            .filter_map(|field| {
                first_key(insurance, &[field.snake_key(), field.camel_key()])
                    .map(|value| (field, read_field_provenance(value)))
            })
            .collect();

    let general = object_field(scope, &fields::PROVENANCE);
    let status = scope
        .resolve_with(&fields::STATUS_PROVENANCE, Value::is_object)
        .unwrap_or(&NULL);

    let metric_refs_used = general
        .get("metric_refs_used")
        .map(|refs| {
            as_array(refs, "provenance.metric_refs_used")
                .iter()
                .filter_map(coerce_string)
                .collect()
        })
        .unwrap_or_default();

    let scenario_inputs = general
        .get("scenario_inputs")
        .filter(|v| v.is_object())
        .cloned()
        .unwrap_or_else(|| Value::Object(Map::new()));

    ProvenanceBlock {
        enabled: first_key(insurance, &["enabled"]).and_then(coerce_bool),
        decision_insurance,
        status_source: key_string(status, &["status_source", "statusSource"]),
        not_modeled_reason: key_string(status, &["not_modeled_reason", "notModeledReason"]),
        metric_refs_used,
        scenario_inputs,
    }
}

fn read_content(scope: &PayloadScope<'_>) -> ContentBlock {
    let content = object_field(scope, &fields::CONTENT);
    let list = |key: &str, text_keys: &[&str]| -> Vec<String> {
        content
            .get(key)
            .map(|items| {
                as_array(items, key)
                    .iter()
                    .filter_map(|item| text_of(item, text_keys))
                    .collect()
            })
            .unwrap_or_default()
    };

    let red_flags_actions = content
        .get("red_flags_actions")
        .map(|items| {
            as_array(items, "content.red_flags_actions")
                .iter()
                .filter_map(|item| {
                    Some(RedFlagAction {
                        flag: text_of(item, &["flag", "red_flag", "text", "label"])?,
                        action: key_string(item, &["action", "next_action"]),
                    })
                })
                .collect()
        })
        .unwrap_or_default();

    ContentBlock {
        fastest_change: content
            .get("fastest_change")
            .and_then(|v| text_of(v, &["text", "label", "summary", "description"])),
        most_likely_wrong: list("most_likely_wrong", &["text", "label", "title"]),
        question_bank: list("question_bank", &["question", "text", "label"]),
        red_flags_actions,
    }
}

fn read_controls(scope: &PayloadScope<'_>) -> RawControls {
    let controls = scope
        .resolve_with(&fields::CONTROLS, Value::is_object)
        .unwrap_or(&NULL);
    let flag = |keys: &[&str]| first_key(controls, keys).and_then(coerce_bool).unwrap_or(false);

    RawControls {
        stress_band_pct: key_decimal(controls, &["stress_band_pct", "stressBandPct"]),
        use_cost_anchor: flag(&["use_cost_anchor", "useCostAnchor"]),
        anchor_total_cost: key_decimal(controls, &["anchor_total_cost", "anchorTotalCost"]),
        use_revenue_anchor: flag(&["use_revenue_anchor", "useRevenueAnchor"]),
        anchor_revenue: key_decimal(controls, &["anchor_revenue", "anchorRevenue"]),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_types::RawValue;
    use rust_decimal_macros::dec;
    use serde_json::json;

    fn sample_payload() -> Value {
        json!({
            "profile_id": "multifamily_garden",
            "view_model": {
                "decision_status": "Needs Work",
                "decision_reason_code": "base_case_break_condition",
                "decision_status_provenance": {
                    "status_source": "dealshield_policy_v1",
                    "not_modeled_reason": "missing_market_cap_rate"
                },
                "columns": [
                    {"id": "cost", "label": "Total Cost", "metric_ref": "totals.total_project_cost"},
                    {"id": "yoc", "metric_ref": "returns.yield_on_cost"}
                ],
                "rows": [
                    {"scenario_id": "base", "label": "Base", "cells": [
                        {"col_id": "cost", "value": "$4,500,000"},
                        {"col_id": "yoc", "value": 0.08, "display": "8.0%"}
                    ]},
                    {"scenario_id": "downside", "cells": {"cost": 4950000, "yoc": "not modeled"}}
                ],
                "primary_control_variable": {"label": "Construction cost", "impact_pct": 12.5, "severity": "high"},
                "first_break_condition": {"scenario_id": "downside", "break_metric": "value_gap", "operator": "<=", "threshold": 0},
                "flex_before_break_pct": "3.4",
                "ranked_likely_wrong": [
                    {"id": "rlw1", "text": "Rents", "impact_pct": 6},
                    "Exit cap",
                    {"why": "no text, dropped"}
                ],
                "decision_insurance_provenance": {
                    "enabled": true,
                    "exposure_concentration_pct": {"status": "unavailable", "reason": "insufficient_driver_data"}
                },
                "provenance": {
                    "metric_refs_used": ["totals.total_project_cost", 7],
                    "dealshield_controls": {"stress_band_pct": 7, "use_cost_anchor": true, "anchor_total_cost": "4,400,000"}
                },
                "content": {
                    "fastest_change": {"text": "Cut hard costs 5%"},
                    "question_bank": [{"question": "Is the GMP signed?"}, "Who holds contingency?"],
                    "red_flags_actions": [{"flag": "Thin contingency", "action": "Add 3%"}]
                }
            }
        })
    }

    #[test]
    fn canonicalizes_nested_payload() {
        let record = canonicalize(&sample_payload());

        assert_eq!(record.profile_id.as_deref(), Some("multifamily_garden"));
        assert_eq!(record.status_signals, vec!["Needs Work".to_string()]);
        assert_eq!(record.reason_code.as_deref(), Some("base_case_break_condition"));

        assert_eq!(record.columns.len(), 2);
        assert_eq!(record.columns[1].label, "Yield On Cost");

        assert_eq!(record.rows.len(), 2);
        let base = &record.rows[0];
        assert_eq!(base.cells[0].metric_ref, "totals.total_project_cost");
        assert_eq!(base.cells[0].value, RawValue::Number(dec!(4500000)));
        assert_eq!(base.cells[1].display.as_deref(), Some("8.0%"));

        let downside = &record.rows[1];
        assert_eq!(downside.label, "downside");
        let yoc = downside.cells.iter().find(|c| c.col_id == "yoc").unwrap();
        assert_eq!(yoc.value, RawValue::NotModeled);
        assert_eq!(yoc.metric_ref, "returns.yield_on_cost");
    }

    #[test]
    fn reads_decision_insurance_and_provenance() {
        let record = canonicalize(&sample_payload());
        let insurance = &record.decision_insurance;

        assert_eq!(insurance.primary_control_variable.as_ref().unwrap().impact_pct, Some(dec!(12.5)));
        assert_eq!(insurance.first_break_condition.as_ref().unwrap().threshold, Some(dec!(0)));
        assert_eq!(insurance.flex_before_break_pct, Some(dec!(3.4)));
        assert_eq!(insurance.ranked_likely_wrong.len(), 2);
        assert_eq!(insurance.ranked_likely_wrong[1].id, "lw_2");

        let provenance = &record.provenance;
        assert_eq!(provenance.enabled, Some(true));
        assert!(provenance.decision_insurance[&DecisionInsuranceField::ExposureConcentrationPct].is_unavailable());
        assert_eq!(provenance.not_modeled_reason.as_deref(), Some("missing_market_cap_rate"));
        assert_eq!(provenance.metric_refs_used, vec!["totals.total_project_cost", "7"]);
        assert!(provenance.scenario_inputs.is_object());
    }

    #[test]
    fn reads_content_and_controls() {
        let record = canonicalize(&sample_payload());
        assert_eq!(record.content.fastest_change.as_deref(), Some("Cut hard costs 5%"));
        assert_eq!(record.content.question_bank.len(), 2);
        assert_eq!(record.content.red_flags_actions[0].action.as_deref(), Some("Add 3%"));

        assert_eq!(record.controls.stress_band_pct, Some(dec!(7)));
        assert!(record.controls.use_cost_anchor);
        assert_eq!(record.controls.anchor_total_cost, Some(dec!(4400000)));
        assert!(!record.controls.use_revenue_anchor);
    }

    #[test]
    fn garbage_yields_empty_defaults() {
        for payload in [
            Value::Null,
            json!({}),
            json!([1, 2, 3]),
            json!("view_model"),
            json!({"view_model": {"rows": "nope", "columns": {"a": 1}, "content": [1], "provenance": 5}}),
            json!({"view_model": {"rows": [null, 4, {"cells": [null, "x"]}]}}),
        ] {
            let record = canonicalize(&payload);
            assert!(record.columns.is_empty());
            assert!(record.status_signals.is_empty());
            assert_eq!(record.summary, SummaryInputs::default());
            assert!(record.provenance.scenario_inputs.is_object());
        }
    }

    #[test]
    fn first_present_candidate_decides_even_when_unparsable() {
        let payload = json!({"view_model": {
            "decision_summary": {"total_cost": "n/a"},
            "total_project_cost": "4,500,000"
        }});
        assert_eq!(canonicalize(&payload).summary.total_cost, None);

        let payload = json!({"view_model": {
            "decision_summary": {"total_cost": "  "},
            "total_project_cost": "4,500,000"
        }});
        assert_eq!(canonicalize(&payload).summary.total_cost, Some(dec!(4500000)));
    }

    #[test]
    fn extreme_numbers_coerce_without_failing() {
        for raw in [
            json!("79228162514264337593543950335"),
            json!("-79228162514264337593543950335"),
            json!("792281625142643375935439503350"),
            json!(1e30),
            json!(-1e300),
            json!("1e-99999"),
            json!("1e99999"),
            json!("-0.0000000000000000000000000001"),
            json!(u64::MAX),
            json!(i64::MIN),
        ] {
            let payload = json!({"view_model": {"yield_on_cost": raw.clone(), "total_cost": raw}});
            let record = canonicalize(&payload);
            assert_eq!(record.summary.yield_on_cost, record.summary.total_cost);
        }
    }
}
