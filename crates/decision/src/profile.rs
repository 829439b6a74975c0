//! Profile-family classification and the per-family lookup table.
//!
//! A profile id is classified once into a `ProfileFamily`; everything that
//! varies by family (label overrides, canned copy, which computed rule to
//! use) is then a lookup in `PROFILE_TABLE`.

use crate::error::DecisionError;
use crate::rules::TargetYieldRule;
use crate::DecisionRule;
use configuration::EngineConfig;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProfileFamily {
    Multifamily,
    Office,
    Retail,
    Industrial,
    Hospitality,
    Healthcare,
    Restaurant,
    Generic,
}

/// Which computed rule a family uses in place of the cap-rate spread rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverrideRule {
    None,
    TargetYield,
}

/// Everything that varies by profile family.
#[derive(Debug)]
pub struct ProfileEntry {
    pub family: ProfileFamily,
    pub prefixes: &'static [&'static str],
    pub override_rule: OverrideRule,
    /// `(metric-ref substring, column label)` pairs applied to column headers.
    pub label_overrides: &'static [(&'static str, &'static str)],
    /// `(normalized reason code, narrative)` pairs checked before the generic copy.
    pub copy_overrides: &'static [(&'static str, &'static str)],
}

pub const PROFILE_TABLE: &[ProfileEntry] = &[
    ProfileEntry {
        family: ProfileFamily::Multifamily,
        prefixes: &["multifamily", "apartment", "residential"],
        override_rule: OverrideRule::None,
        label_overrides: &[("annual_revenue", "Gross Potential Rent")],
        copy_overrides: &[],
    },
    ProfileEntry {
        family: ProfileFamily::Office,
        prefixes: &["office"],
        override_rule: OverrideRule::None,
        label_overrides: &[],
        copy_overrides: &[(
            "base_case_break_condition",
            "Base-case lease-up and rent assumptions do not carry the office cost basis.",
        )],
    },
    ProfileEntry {
        family: ProfileFamily::Retail,
        prefixes: &["retail", "shopping"],
        override_rule: OverrideRule::None,
        label_overrides: &[("annual_revenue", "Base Rent + Recoveries")],
        copy_overrides: &[],
    },
    ProfileEntry {
        family: ProfileFamily::Industrial,
        prefixes: &["industrial", "warehouse", "logistics"],
        override_rule: OverrideRule::None,
        label_overrides: &[],
        copy_overrides: &[],
    },
    ProfileEntry {
        family: ProfileFamily::Hospitality,
        prefixes: &["hospitality", "hotel"],
        override_rule: OverrideRule::TargetYield,
        label_overrides: &[("annual_revenue", "Total Hotel Revenue")],
        copy_overrides: &[
            (
                "base_case_break_condition",
                "Base-case RevPAR and occupancy do not support the hotel's cost basis.",
            ),
            (
                "yield_below_target",
                "Stabilized hotel yield on cost falls short of the target yield.",
            ),
        ],
    },
    ProfileEntry {
        family: ProfileFamily::Healthcare,
        prefixes: &["healthcare", "medical", "senior_living"],
        override_rule: OverrideRule::TargetYield,
        label_overrides: &[("annual_revenue", "Net Patient Revenue")],
        copy_overrides: &[(
            "base_case_break_condition",
            "Base-case census and reimbursement do not cover the facility's cost basis.",
        )],
    },
    ProfileEntry {
        family: ProfileFamily::Restaurant,
        prefixes: &["restaurant", "food_service", "quick_service"],
        override_rule: OverrideRule::TargetYield,
        label_overrides: &[("annual_revenue", "Annual Sales")],
        copy_overrides: &[(
            "base_case_break_condition",
            "Base-case sales volume does not carry the build-out cost.",
        )],
    },
];

static GENERIC_ENTRY: ProfileEntry = ProfileEntry {
    family: ProfileFamily::Generic,
    prefixes: &[],
    override_rule: OverrideRule::None,
    label_overrides: &[],
    copy_overrides: &[],
};

impl ProfileFamily {
    /// Classifies a profile id by its prefix. Unknown or absent ids are `Generic`.
    pub fn classify(profile_id: Option<&str>) -> Self {
        let Some(id) = profile_id.map(|id| id.trim().to_lowercase()) else {
            return ProfileFamily::Generic;
        };
        PROFILE_TABLE
            .iter()
            .find(|entry| entry.prefixes.iter().any(|prefix| id.starts_with(prefix)))
            .map(|entry| entry.family)
            .unwrap_or(ProfileFamily::Generic)
    }

    pub fn entry(&self) -> &'static ProfileEntry {
        PROFILE_TABLE
            .iter()
            .find(|entry| entry.family == *self)
            .unwrap_or(&GENERIC_ENTRY)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ProfileFamily::Multifamily => "multifamily",
            ProfileFamily::Office => "office",
            ProfileFamily::Retail => "retail",
            ProfileFamily::Industrial => "industrial",
            ProfileFamily::Hospitality => "hospitality",
            ProfileFamily::Healthcare => "healthcare",
            ProfileFamily::Restaurant => "restaurant",
            ProfileFamily::Generic => "generic",
        }
    }

    /// The column label this family uses for a metric reference, if it overrides one.
    pub fn label_override(&self, metric_ref: &str) -> Option<&'static str> {
        let lowered = metric_ref.to_lowercase();
        self.entry()
            .label_overrides
            .iter()
            .find(|(needle, _)| lowered.contains(needle))
            .map(|(_, label)| *label)
    }

    /// Family-specific narrative for a normalized reason code.
    pub fn copy_override(&self, reason_key: &str) -> Option<&'static str> {
        self.entry()
            .copy_overrides
            .iter()
            .find(|(key, _)| *key == reason_key)
            .map(|(_, copy)| *copy)
    }
}

impl fmt::Display for ProfileFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProfileFamily {
    type Err = DecisionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lowered = s.trim().to_lowercase();
        PROFILE_TABLE
            .iter()
            .map(|entry| entry.family)
            .chain(std::iter::once(ProfileFamily::Generic))
            .find(|family| family.as_str() == lowered)
            .ok_or_else(|| DecisionError::UnknownProfileFamily(s.to_string()))
    }
}

/// Creates the override rule a family uses instead of the cap-rate spread rule.
///
/// Returns `Ok(None)` for families that keep the default computation.
pub fn create_override_rule(
    family: ProfileFamily,
    config: &EngineConfig,
) -> Result<Option<Box<dyn DecisionRule>>, DecisionError> {
    match family.entry().override_rule {
        OverrideRule::None => Ok(None),
        OverrideRule::TargetYield => Ok(Some(Box::new(TargetYieldRule::new(config)?))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_by_prefix() {
        assert_eq!(ProfileFamily::classify(Some("hospitality_limited_service")), ProfileFamily::Hospitality);
        assert_eq!(ProfileFamily::classify(Some("Hotel_Full_Service")), ProfileFamily::Hospitality);
        assert_eq!(ProfileFamily::classify(Some("multifamily_garden")), ProfileFamily::Multifamily);
        assert_eq!(ProfileFamily::classify(Some("restaurant_qsr")), ProfileFamily::Restaurant);
        assert_eq!(ProfileFamily::classify(Some("data_center")), ProfileFamily::Generic);
        assert_eq!(ProfileFamily::classify(None), ProfileFamily::Generic);
    }

    #[test]
    fn every_family_has_a_unique_entry() {
        for entry in PROFILE_TABLE {
            assert_eq!(entry.family.entry().family, entry.family);
            assert_eq!(entry.family.as_str().parse::<ProfileFamily>(), Ok(entry.family));
        }
        assert_eq!(ProfileFamily::Generic.entry().family, ProfileFamily::Generic);
        assert!("castle".parse::<ProfileFamily>().is_err());
    }

    #[test]
    fn overrides_are_table_lookups() {
        assert_eq!(
            ProfileFamily::Restaurant.label_override("revenue.annual_revenue"),
            Some("Annual Sales")
        );
        assert_eq!(ProfileFamily::Generic.label_override("revenue.annual_revenue"), None);
        assert!(ProfileFamily::Hospitality.copy_override("base_case_break_condition").is_some());
        assert!(ProfileFamily::Industrial.copy_override("base_case_break_condition").is_none());
    }

    #[test]
    fn factory_selects_override_rule() {
        let config = EngineConfig::default();
        let rule = create_override_rule(ProfileFamily::Healthcare, &config).unwrap();
        assert_eq!(rule.map(|r| r.name()), Some("target_yield"));
        assert!(create_override_rule(ProfileFamily::Office, &config).unwrap().is_none());
    }
}
