//! # DealShield Provenance Reporter
//!
//! Turns per-field Decision-Insurance availability metadata into a single,
//! deduplicated list of human-readable reasons, surfaced once per view model.

use core_types::{to_sentence, DecisionInsuranceField, FieldProvenance, ProvenanceBlock};
use std::collections::HashSet;

/// Reported when the payload says Decision Insurance is switched off.
pub const DISABLED_REASON: &str = "Decision Insurance is not enabled for this profile.";

/// One unavailable field and the sentence explaining why.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnavailableField {
    pub field: DecisionInsuranceField,
    pub reason: String,
}

/// The sentence for a single field, or `None` when the field is available.
pub fn field_reason(field: DecisionInsuranceField, provenance: &FieldProvenance) -> Option<String> {
    if !provenance.is_unavailable() {
        return None;
    }
    let sentence = provenance
        .reason
        .as_deref()
        .map(to_sentence)
        .filter(|sentence| !sentence.is_empty())
        .unwrap_or_else(|| format!("{} is unavailable.", field.label()));
    Some(sentence)
}

/// Every unavailable field, in reporting order.
pub fn unavailable_fields(block: &ProvenanceBlock) -> Vec<UnavailableField> {
    block
        .decision_insurance
        .iter()
        .filter_map(|(field, provenance)| {
            field_reason(*field, provenance).map(|reason| UnavailableField { field: *field, reason })
        })
        .collect()
}

/// The consolidated, order-preserving, deduplicated reason list.
pub fn report(block: &ProvenanceBlock) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut reasons = Vec::new();

    let disabled = (block.enabled == Some(false)).then(|| DISABLED_REASON.to_string());
    let per_field = unavailable_fields(block).into_iter().map(|u| u.reason);

    for reason in disabled.into_iter().chain(per_field) {
        if seen.insert(reason.clone()) {
            reasons.push(reason);
        }
    }

    if !reasons.is_empty() {
        tracing::debug!(count = reasons.len(), "Decision Insurance gaps reported.");
    }
    reasons
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_types::AvailabilityStatus;

    fn unavailable(reason: Option<&str>) -> FieldProvenance {
        FieldProvenance {
            status: AvailabilityStatus::Unavailable,
            reason: reason.map(str::to_string),
            source: None,
        }
    }

    fn block(fields: Vec<(DecisionInsuranceField, FieldProvenance)>) -> ProvenanceBlock {
        ProvenanceBlock {
            decision_insurance: fields.into_iter().collect(),
            ..ProvenanceBlock::default()
        }
    }

    #[test]
    fn shared_reasons_surface_once() {
        let block = block(vec![
            (DecisionInsuranceField::FlexBeforeBreakPct, unavailable(Some("no_break_scenario_modeled"))),
            (DecisionInsuranceField::FirstBreakCondition, unavailable(Some("no_break_scenario_modeled"))),
        ]);
        assert_eq!(report(&block), vec!["No Break Scenario Modeled.".to_string()]);
    }

    #[test]
    fn order_follows_field_order_and_skips_available() {
        let block = block(vec![
            (DecisionInsuranceField::RankedLikelyWrong, unavailable(None)),
            (DecisionInsuranceField::PrimaryControlVariable, FieldProvenance::default()),
            (DecisionInsuranceField::ExposureConcentrationPct, unavailable(Some("Driver data missing"))),
        ]);
        assert_eq!(
            report(&block),
            vec![
                "Driver data missing.".to_string(),
                "Ranked likely-wrong list is unavailable.".to_string(),
            ]
        );
    }

    #[test]
    fn disabled_block_is_reported_first() {
        let mut block = block(vec![(DecisionInsuranceField::FirstBreakCondition, unavailable(Some("  ")))]);
        block.enabled = Some(false);
        assert_eq!(
            report(&block),
            vec![DISABLED_REASON.to_string(), "First break condition is unavailable.".to_string()]
        );
    }

    #[test]
    fn nothing_unavailable_is_empty() {
        assert!(report(&ProvenanceBlock::default()).is_empty());
    }
}
