use crate::error::DecisionError;
use crate::keywords::normalize_status;
use crate::narrative::{resolve_reason, DecisionReason, ReasonSignals};
use crate::profile::{create_override_rule, OverrideRule, ProfileFamily, PROFILE_TABLE};
use crate::rules::{CapRateSpreadRule, DecisionInputs, TargetYieldRule};
use crate::DecisionRule;
use configuration::EngineConfig;
use core_types::{DecisionStatus, StatusSource};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// The outcome of the status cascade.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusResolution {
    pub status: DecisionStatus,
    pub source: StatusSource,
    /// The computed status (override or derived), kept as a cross-check when
    /// an explicit signal won.
    pub computed: Option<DecisionStatus>,
    /// The computed rule that produced `computed`, if any.
    pub rule: Option<String>,
}

/// The status plus its independently resolved narrative.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Decision {
    pub resolution: StatusResolution,
    pub reason: DecisionReason,
}

/// Resolves the canonical decision status through a priority-ordered cascade.
pub struct DecisionResolver {
    spread_rule: CapRateSpreadRule,
    overrides: HashMap<ProfileFamily, Box<dyn DecisionRule>>,
}

impl Default for DecisionResolver {
    /// The resolver with the built-in thresholds; cannot fail.
    fn default() -> Self {
        let overrides = PROFILE_TABLE
            .iter()
            .filter(|entry| entry.override_rule == OverrideRule::TargetYield)
            .map(|entry| {
                let rule: Box<dyn DecisionRule> = Box::new(TargetYieldRule::default());
                (entry.family, rule)
            })
            .collect();
        Self {
            spread_rule: CapRateSpreadRule::default(),
            overrides,
        }
    }
}

impl DecisionResolver {
    /// Builds the resolver and one override rule per family that declares one.
    pub fn new(config: &EngineConfig) -> Result<Self, DecisionError> {
        let mut overrides = HashMap::new();
        for entry in PROFILE_TABLE {
            if let Some(rule) = create_override_rule(entry.family, config)? {
                overrides.insert(entry.family, rule);
            }
        }
        Ok(Self {
            spread_rule: CapRateSpreadRule::new(config)?,
            overrides,
        })
    }

    /// Runs the cascade. Always yields one of the four statuses.
    ///
    /// 1. the first explicit status signal that normalizes,
    /// 2. the family's override rule, which replaces the derived rule,
    /// 3. the cap-rate spread rule,
    /// 4. `PENDING`.
    pub fn resolve_status(
        &self,
        signals: &[String],
        family: ProfileFamily,
        inputs: &DecisionInputs,
    ) -> StatusResolution {
        let (computed, rule) = match self.compute(family, inputs) {
            Some((status, rule)) => (Some(status), Some(rule.to_string())),
            None => (None, None),
        };

        if let Some(explicit) = signals.iter().find_map(|signal| normalize_status(signal)) {
            if let Some(computed) = computed.filter(|c| *c != explicit) {
                tracing::debug!(%explicit, %computed, "Explicit status disagrees with computed status.");
            }
            return StatusResolution {
                status: explicit,
                source: StatusSource::Explicit,
                computed,
                rule,
            };
        }

        match computed {
            Some(status) => {
                let source = if rule.as_deref() == Some(self.spread_rule.name()) {
                    StatusSource::Derived
                } else {
                    StatusSource::ProfileOverride
                };
                StatusResolution { status, source, computed, rule }
            }
            None => StatusResolution {
                status: DecisionStatus::Pending,
                source: StatusSource::Default,
                computed: None,
                rule: None,
            },
        }
    }

    /// Override rule first; its result replaces, never merges with, the derived rule.
    fn compute(
        &self,
        family: ProfileFamily,
        inputs: &DecisionInputs,
    ) -> Option<(DecisionStatus, &'static str)> {
        if let Some(rule) = self.overrides.get(&family) {
            if let Some(status) = rule.evaluate(inputs) {
                return Some((status, rule.name()));
            }
            tracing::debug!(%family, rule = rule.name(), "Override rule lacks inputs; using derived rule.");
        }
        self.spread_rule
            .evaluate(inputs)
            .map(|status| (status, self.spread_rule.name()))
    }

    /// Resolves the status and, independently, its reason narrative.
    pub fn resolve(
        &self,
        signals: &[String],
        family: ProfileFamily,
        inputs: &DecisionInputs,
        reason: &ReasonSignals<'_>,
    ) -> Decision {
        let resolution = self.resolve_status(signals, family, inputs);
        let reason = resolve_reason(resolution.status, family, reason);
        tracing::debug!(
            status = %resolution.status,
            source = ?resolution.source,
            reason_source = ?reason.source,
            "Decision resolved."
        );
        Decision { resolution, reason }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn resolver() -> DecisionResolver {
        DecisionResolver::new(&EngineConfig::default()).unwrap()
    }

    fn signals(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    fn go_inputs() -> DecisionInputs {
        DecisionInputs {
            spread_bps: Some(dec!(250)),
            dscr: Some(dec!(1.30)),
            dscr_target: Some(dec!(1.25)),
            ..DecisionInputs::default()
        }
    }

    #[test]
    fn default_resolver_matches_configured_defaults() {
        let inputs = DecisionInputs {
            yield_on_cost: Some(dec!(0.077)),
            target_yield: Some(dec!(0.08)),
            ..go_inputs()
        };
        for family in [ProfileFamily::Hospitality, ProfileFamily::Office, ProfileFamily::Generic] {
            assert_eq!(
                DecisionResolver::default().resolve_status(&[], family, &inputs),
                resolver().resolve_status(&[], family, &inputs)
            );
        }
    }

    #[test]
    fn derived_go_path() {
        let resolution = resolver().resolve_status(&[], ProfileFamily::Multifamily, &go_inputs());
        assert_eq!(resolution.status, DecisionStatus::Go);
        assert_eq!(resolution.source, StatusSource::Derived);
        assert_eq!(resolution.rule.as_deref(), Some("cap_rate_spread"));
    }

    #[test]
    fn derived_no_go_path() {
        let inputs = DecisionInputs { spread_bps: Some(dec!(-50)), ..DecisionInputs::default() };
        let resolution = resolver().resolve_status(&[], ProfileFamily::Generic, &inputs);
        assert_eq!(resolution.status, DecisionStatus::NoGo);
    }

    #[test]
    fn explicit_wins_over_computed() {
        let resolution = resolver().resolve_status(&signals(&["no-go"]), ProfileFamily::Generic, &go_inputs());
        assert_eq!(resolution.status, DecisionStatus::NoGo);
        assert_eq!(resolution.source, StatusSource::Explicit);
        assert_eq!(resolution.computed, Some(DecisionStatus::Go));
    }

    #[test]
    fn unrecognized_signals_are_skipped() {
        let resolution = resolver().resolve_status(
            &signals(&["base_case_break_condition", "Needs Work"]),
            ProfileFamily::Generic,
            &DecisionInputs::default(),
        );
        assert_eq!(resolution.status, DecisionStatus::NeedsWork);
        assert_eq!(resolution.source, StatusSource::Explicit);
    }

    #[test]
    fn profile_override_replaces_derived() {
        let inputs = DecisionInputs {
            yield_on_cost: Some(dec!(0.077)),
            target_yield: Some(dec!(0.08)),
            ..go_inputs()
        };
        let resolution = resolver().resolve_status(&[], ProfileFamily::Hospitality, &inputs);
        assert_eq!(resolution.status, DecisionStatus::NeedsWork);
        assert_eq!(resolution.source, StatusSource::ProfileOverride);
        assert_eq!(resolution.rule.as_deref(), Some("target_yield"));
    }

    #[test]
    fn override_without_inputs_defers_to_derived() {
        let resolution = resolver().resolve_status(&[], ProfileFamily::Hospitality, &go_inputs());
        assert_eq!(resolution.status, DecisionStatus::Go);
        assert_eq!(resolution.source, StatusSource::Derived);
    }

    #[test]
    fn nothing_known_is_pending() {
        let resolution = resolver().resolve_status(&[], ProfileFamily::Generic, &DecisionInputs::default());
        assert_eq!(resolution.status, DecisionStatus::Pending);
        assert_eq!(resolution.source, StatusSource::Default);
    }

    #[test]
    fn narrative_does_not_change_status() {
        let reason = ReasonSignals {
            reason_code: Some("base_case_break_condition"),
            ..ReasonSignals::default()
        };
        let decision = resolver().resolve(&[], ProfileFamily::Generic, &go_inputs(), &reason);
        assert_eq!(decision.resolution.status, DecisionStatus::Go);
        assert_eq!(decision.reason.code.as_deref(), Some("base_case_break_condition"));
    }
}
