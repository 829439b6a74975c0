pub mod enums;
pub mod error;
pub mod structs;
pub mod text;

// Re-export the core types to provide a clean public API.
pub use enums::{
    AvailabilityStatus, DecisionInsuranceField, DecisionStatus, FlexBand, MetricType, StatusSource,
};
pub use error::CoreError;
pub use structs::{
    ContentBlock, Controls, DecisionInsuranceBlock, FieldProvenance, FirstBreakCondition,
    LikelyWrongItem, MetricCell, MetricColumn, PrimaryControlVariable, ProvenanceBlock, RawValue,
    RedFlagAction, ScenarioRow, SummaryInputs,
};
pub use text::{normalize_key, to_sentence};

/// Rendered for null, undefined or empty values.
pub const MISSING_PLACEHOLDER: &str = "\u{2014}";

/// Rendered for values the upstream explicitly marked as not modeled.
pub const NOT_MODELED_PLACEHOLDER: &str = "Not modeled";

/// True for the literal `not modeled` marker, in any case, spelled with a space or underscore.
pub fn is_not_modeled(text: &str) -> bool {
    text.trim().to_lowercase().replace('_', " ") == "not modeled"
}
