//! # DealShield Metrics
//!
//! Heuristic metric-type classification and type-aware value formatting.
//!
//! Metric references are opaque strings; there is no registry of known refs.
//! `classify` inspects substrings, and `Formatter` renders values according to
//! the inferred `MetricType`, including the percent unit-scale heuristics.

pub mod classifier;
pub mod formatter;

pub use classifier::{classify, is_yield_on_cost};
pub use formatter::{Formatter, PercentScale};
