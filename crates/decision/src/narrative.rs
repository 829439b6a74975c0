use crate::profile::ProfileFamily;
use core_types::{normalize_key, to_sentence, DecisionStatus};
use serde::{Deserialize, Serialize};

/// Canned copy shared by every profile family, keyed by normalized reason code.
const GENERIC_COPY: &[(&str, &str)] = &[
    (
        "base_case_break_condition",
        "The base case already meets its first-break condition; the deal does not clear its hurdle as underwritten.",
    ),
    (
        "low_flex_before_break",
        "Less than 2% of cushion remains before the base case breaks.",
    ),
    (
        "spread_below_threshold",
        "Yield on cost does not clear the market cap rate by the required spread.",
    ),
    (
        "dscr_below_target",
        "Debt service coverage is below the lender target.",
    ),
    (
        "yield_below_target",
        "Yield on cost falls short of the target yield.",
    ),
    (
        "near_target_yield",
        "Yield on cost is within 5% of target; modest improvements would clear the hurdle.",
    ),
    (
        "explicit_status",
        "The decision status was set explicitly by the valuation policy.",
    ),
];

/// Where the decision narrative came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReasonSource {
    Explicit,
    CannedCopy,
    NotModeledReason,
    Fallback,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecisionReason {
    pub text: String,
    pub source: ReasonSource,
    /// The normalized reason code, when one was supplied.
    pub code: Option<String>,
}

/// The upstream signals the narrative cascade reads.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReasonSignals<'a> {
    pub reason_text: Option<&'a str>,
    pub reason_code: Option<&'a str>,
    pub not_modeled_reason: Option<&'a str>,
}

/// Resolves the reason narrative for a status.
///
/// The cascade is independent of status resolution: explicit text, then
/// canned copy for the reason code (family first, then generic), then the
/// provenance not-modeled reason, then a per-status fallback sentence.
pub fn resolve_reason(
    status: DecisionStatus,
    family: ProfileFamily,
    signals: &ReasonSignals<'_>,
) -> DecisionReason {
    let code = signals.reason_code.map(normalize_key).filter(|key| !key.is_empty());

    if let Some(text) = explicit_text(signals) {
        return DecisionReason { text: to_sentence(text), source: ReasonSource::Explicit, code };
    }

    if let Some(key) = code.as_deref() {
        let canned = family.copy_override(key).or_else(|| generic_copy(key));
        if let Some(copy) = canned {
            return DecisionReason {
                text: copy.to_string(),
                source: ReasonSource::CannedCopy,
                code,
            };
        }
        tracing::debug!(reason_code = key, %family, "No canned copy for reason code.");
    }

    if let Some(reason) = signals.not_modeled_reason.filter(|r| !r.trim().is_empty()) {
        return DecisionReason {
            text: to_sentence(reason),
            source: ReasonSource::NotModeledReason,
            code,
        };
    }

    DecisionReason {
        text: fallback_copy(status).to_string(),
        source: ReasonSource::Fallback,
        code,
    }
}

/// Free-form reason text, or a reason "code" that is really prose.
fn explicit_text<'a>(signals: &ReasonSignals<'a>) -> Option<&'a str> {
    signals
        .reason_text
        .filter(|text| !text.trim().is_empty())
        .or_else(|| signals.reason_code.filter(|code| code.trim().contains(char::is_whitespace)))
}

fn generic_copy(key: &str) -> Option<&'static str> {
    GENERIC_COPY.iter().find(|(k, _)| *k == key).map(|(_, copy)| *copy)
}

pub fn fallback_copy(status: DecisionStatus) -> &'static str {
    match status {
        DecisionStatus::Go => "Base case clears the yield and coverage hurdles.",
        DecisionStatus::NeedsWork => {
            "Base case is close to its hurdles; targeted changes are needed before committing."
        }
        DecisionStatus::NoGo => "Base case does not clear its yield or coverage hurdles.",
        DecisionStatus::Pending => "Decision is pending until the required underwriting inputs are modeled.",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_text_wins() {
        let signals = ReasonSignals {
            reason_text: Some("sponsor withdrew"),
            reason_code: Some("base_case_break_condition"),
            not_modeled_reason: Some("missing_cap_rate"),
        };
        let reason = resolve_reason(DecisionStatus::NoGo, ProfileFamily::Generic, &signals);
        assert_eq!(reason.source, ReasonSource::Explicit);
        assert_eq!(reason.text, "Sponsor withdrew.");
        assert_eq!(reason.code.as_deref(), Some("base_case_break_condition"));
    }

    #[test]
    fn prose_reason_codes_are_used_verbatim() {
        let signals = ReasonSignals {
            reason_code: Some("Lender pulled the term sheet"),
            ..ReasonSignals::default()
        };
        let reason = resolve_reason(DecisionStatus::NoGo, ProfileFamily::Hospitality, &signals);
        assert_eq!(reason.source, ReasonSource::Explicit);
        assert_eq!(reason.text, "Lender pulled the term sheet.");
    }

    #[test]
    fn family_copy_beats_generic_copy() {
        let signals = ReasonSignals {
            reason_code: Some("base_case_break_condition"),
            ..ReasonSignals::default()
        };
        let hotel = resolve_reason(DecisionStatus::NoGo, ProfileFamily::Hospitality, &signals);
        let generic = resolve_reason(DecisionStatus::NoGo, ProfileFamily::Industrial, &signals);
        assert_eq!(hotel.source, ReasonSource::CannedCopy);
        assert!(hotel.text.contains("RevPAR"));
        assert_eq!(generic.source, ReasonSource::CannedCopy);
        assert!(generic.text.starts_with("The base case"));
    }

    #[test]
    fn unknown_code_falls_to_not_modeled_reason() {
        let signals = ReasonSignals {
            reason_code: Some("mystery_code"),
            not_modeled_reason: Some("market_cap_rate_not_supplied"),
            ..ReasonSignals::default()
        };
        let reason = resolve_reason(DecisionStatus::Pending, ProfileFamily::Generic, &signals);
        assert_eq!(reason.source, ReasonSource::NotModeledReason);
        assert_eq!(reason.text, "Market Cap Rate Not Supplied.");
    }

    #[test]
    fn fallback_per_status() {
        for status in DecisionStatus::ALL {
            let reason = resolve_reason(status, ProfileFamily::Generic, &ReasonSignals::default());
            assert_eq!(reason.source, ReasonSource::Fallback);
            assert_eq!(reason.text, fallback_copy(status));
            assert!(reason.code.is_none());
        }
    }
}
