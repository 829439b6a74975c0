//! # DealShield Decision Resolver
//!
//! Resolves the canonical investment decision (`GO`, `NEEDS_WORK`, `NO_GO`,
//! `PENDING`) and its reason narrative from the upstream signals and the
//! derived metrics.
//!
//! ## Architectural Principles
//!
//! - **Cascade:** explicit signal, then profile override, then the derived
//!   spread/DSCR rule, then `PENDING`. Each step short-circuits.
//! - **Table-driven profiles:** a profile id is classified once into a
//!   `ProfileFamily`; label overrides, canned copy and override-rule selection
//!   are lookups in `profile::PROFILE_TABLE`.
//! - **Independent narrative:** the reason text never influences the status.

pub mod error;
pub mod keywords;
pub mod narrative;
pub mod profile;
pub mod resolver;
pub mod rules;

pub use error::DecisionError;
pub use keywords::normalize_status;
pub use narrative::{resolve_reason, DecisionReason, ReasonSignals, ReasonSource};
pub use profile::{create_override_rule, ProfileFamily};
pub use resolver::{Decision, DecisionResolver, StatusResolution};
pub use rules::{CapRateSpreadRule, DecisionInputs, TargetYieldRule};

use core_types::DecisionStatus;

/// A computed decision rule.
///
/// Returns `None` when the rule lacks the inputs it needs, letting the
/// cascade fall through to the next step. The `Send + Sync` bounds let one
/// resolver be shared across threads.
pub trait DecisionRule: Send + Sync {
    fn name(&self) -> &'static str;

    fn evaluate(&self, inputs: &rules::DecisionInputs) -> Option<DecisionStatus>;
}
