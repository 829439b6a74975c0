//! # DealShield Analytics
//!
//! Derives the comparison metrics shown next to the decision: value gap, value
//! gap %, yield/cap spread, NOI shortfall, flex-before-break banding and
//! exposure concentration.
//!
//! ## Architectural Principles
//!
//! - **Pure logic:** depends only on `core-types` and `configuration`.
//! - **Stateless Calculation:** `DerivedMetricsCalculator` takes normalized rows
//!   and summary fields and produces a `DerivedMetrics` value.
//! - **Null propagation:** a metric with a missing input is `None`, never zero.

// Declare the modules that constitute this crate.
pub mod calculator;
pub mod error;
pub mod report;

// Re-export the key components to create a clean, public-facing API.
pub use calculator::{
    exposure_concentration, percent_of, select_base_row, to_fraction, DerivedMetricsCalculator,
};
pub use error::AnalyticsError;
pub use report::DerivedMetrics;
