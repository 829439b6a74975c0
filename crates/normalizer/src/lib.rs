//! # DealShield Input Normalizer
//!
//! Coalesces the untyped analysis payload produced by the upstream valuation
//! service into a `CanonicalRecord`.
//!
//! ## Architectural Principles
//!
//! - **Total:** `canonicalize` accepts any JSON value and never fails. Malformed
//!   sub-objects are replaced by empty defaults and logged at `debug`.
//! - **Declarative lookups:** each logical field is a `FieldSpec` in `fields`,
//!   resolved by the single generic resolver in `paths`.

pub mod coerce;
pub mod error;
pub mod fields;
pub mod paths;
pub mod record;

pub use coerce::{coerce_decimal, coerce_raw, parse_decimal};
pub use error::NormalizerError;
pub use paths::{FieldSpec, PayloadScope};
pub use record::{canonicalize, humanize_metric_ref, CanonicalRecord, RawControls};
