use crate::error::CoreError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The canonical investment decision. Resolution always yields exactly one of these.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DecisionStatus {
    Go,
    NeedsWork,
    NoGo,
    Pending,
}

impl DecisionStatus {
    pub const ALL: [DecisionStatus; 4] = [
        DecisionStatus::Go,
        DecisionStatus::NeedsWork,
        DecisionStatus::NoGo,
        DecisionStatus::Pending,
    ];

    /// The wire code, e.g. `NEEDS_WORK`.
    pub fn code(&self) -> &'static str {
        match self {
            DecisionStatus::Go => "GO",
            DecisionStatus::NeedsWork => "NEEDS_WORK",
            DecisionStatus::NoGo => "NO_GO",
            DecisionStatus::Pending => "PENDING",
        }
    }

    /// The badge text shown to users.
    pub fn label(&self) -> &'static str {
        match self {
            DecisionStatus::Go => "GO",
            DecisionStatus::NeedsWork => "Needs Work",
            DecisionStatus::NoGo => "NO-GO",
            DecisionStatus::Pending => "Pending",
        }
    }
}

impl fmt::Display for DecisionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Strict parse of a wire code. Loose, keyword-based normalization of upstream
/// status strings lives in the decision crate.
impl FromStr for DecisionStatus {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DecisionStatus::ALL
            .into_iter()
            .find(|status| status.code().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| CoreError::UnknownStatus(s.to_string()))
    }
}

/// Which step of the resolution cascade produced the status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusSource {
    Explicit,
    ProfileOverride,
    Derived,
    Default,
}

/// The semantic type of a metric, inferred from its metric reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricType {
    Currency,
    Percent,
    Ratio,
    Number,
}

/// Risk band for the flex-before-break cushion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlexBand {
    StructurallyTight,
    Moderate,
    Flexible,
}

impl FlexBand {
    pub fn label(&self) -> &'static str {
        match self {
            FlexBand::StructurallyTight => "Structurally Tight",
            FlexBand::Moderate => "Moderate",
            FlexBand::Flexible => "Flexible",
        }
    }
}

impl fmt::Display for FlexBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AvailabilityStatus {
    #[default]
    Available,
    Unavailable,
}

impl AvailabilityStatus {
    /// Anything other than an explicit `unavailable` counts as available.
    pub fn parse(raw: &str) -> Self {
        if raw.trim().eq_ignore_ascii_case("unavailable") {
            AvailabilityStatus::Unavailable
        } else {
            AvailabilityStatus::Available
        }
    }
}

/// The five Decision-Insurance fields, in reporting order.
///
/// `Ord` follows declaration order, so a `BTreeMap` keyed by this enum iterates
/// in the order reasons must be surfaced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DecisionInsuranceField {
    PrimaryControlVariable,
    FirstBreakCondition,
    FlexBeforeBreakPct,
    ExposureConcentrationPct,
    RankedLikelyWrong,
}

impl DecisionInsuranceField {
    pub const ALL: [DecisionInsuranceField; 5] = [
        DecisionInsuranceField::PrimaryControlVariable,
        DecisionInsuranceField::FirstBreakCondition,
        DecisionInsuranceField::FlexBeforeBreakPct,
        DecisionInsuranceField::ExposureConcentrationPct,
        DecisionInsuranceField::RankedLikelyWrong,
    ];

    pub fn snake_key(&self) -> &'static str {
        match self {
            DecisionInsuranceField::PrimaryControlVariable => "primary_control_variable",
            DecisionInsuranceField::FirstBreakCondition => "first_break_condition",
            DecisionInsuranceField::FlexBeforeBreakPct => "flex_before_break_pct",
            DecisionInsuranceField::ExposureConcentrationPct => "exposure_concentration_pct",
            DecisionInsuranceField::RankedLikelyWrong => "ranked_likely_wrong",
        }
    }

    pub fn camel_key(&self) -> &'static str {
        match self {
            DecisionInsuranceField::PrimaryControlVariable => "primaryControlVariable",
            DecisionInsuranceField::FirstBreakCondition => "firstBreakCondition",
            DecisionInsuranceField::FlexBeforeBreakPct => "flexBeforeBreakPct",
            DecisionInsuranceField::ExposureConcentrationPct => "exposureConcentrationPct",
            DecisionInsuranceField::RankedLikelyWrong => "rankedLikelyWrong",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            DecisionInsuranceField::PrimaryControlVariable => "Primary control variable",
            DecisionInsuranceField::FirstBreakCondition => "First break condition",
            DecisionInsuranceField::FlexBeforeBreakPct => "Flex before break",
            DecisionInsuranceField::ExposureConcentrationPct => "Exposure concentration",
            DecisionInsuranceField::RankedLikelyWrong => "Ranked likely-wrong list",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_serializes_to_wire_codes() {
        let json = serde_json::to_string(&DecisionStatus::NeedsWork).unwrap();
        assert_eq!(json, "\"NEEDS_WORK\"");
        for status in DecisionStatus::ALL {
            assert_eq!(format!("\"{}\"", status.code()), serde_json::to_string(&status).unwrap());
        }
    }

    #[test]
    fn strict_parse_accepts_codes_only() {
        assert_eq!("no_go".parse::<DecisionStatus>(), Ok(DecisionStatus::NoGo));
        assert_eq!(" PENDING ".parse::<DecisionStatus>(), Ok(DecisionStatus::Pending));
        assert!("no-go".parse::<DecisionStatus>().is_err());
    }

    #[test]
    fn availability_only_flags_explicit_unavailable() {
        assert_eq!(AvailabilityStatus::parse(" Unavailable "), AvailabilityStatus::Unavailable);
        assert_eq!(AvailabilityStatus::parse("available"), AvailabilityStatus::Available);
        assert_eq!(AvailabilityStatus::parse("unknown"), AvailabilityStatus::Available);
    }

    #[test]
    fn insurance_fields_order_matches_reporting_order() {
        let mut sorted = DecisionInsuranceField::ALL;
        sorted.sort();
        assert_eq!(sorted, DecisionInsuranceField::ALL);
    }
}
