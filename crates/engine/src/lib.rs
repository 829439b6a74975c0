//! # DealShield View-Model Engine
//!
//! The orchestration layer. It wires the normalizer, metric formatter,
//! derived-metrics calculator, decision resolver and provenance reporter into
//! a single `normalize(payload)` call, and provides the caller-side session
//! that sequences fetches.
//!
//! ## Architectural Principles
//!
//! - **Pure core:** `ViewModelEngine::normalize` is total and deterministic;
//!   it never fails and never mutates shared state.
//! - **Whole-value replacement:** the session swaps complete view models and
//!   never patches one in place.
//! - **Transport at the edge:** payloads arrive through the async
//!   `PayloadSource` trait, so the same session drives a file, a mock or an
//!   HTTP client.

pub mod assembler;
pub mod controls;
pub mod error;
pub mod session;
pub mod view_model;

pub use assembler::ViewModelEngine;
pub use controls::{snap_stress_band, ControlsUpdate};
pub use error::{EngineError, TransportError};
pub use session::{FetchTicket, PayloadSource, SessionSnapshot, ViewModelSession};
pub use view_model::{DecisionInsuranceView, NormalizedViewModel, SummaryDisplay};

use serde_json::Value;
use std::sync::OnceLock;

static DEFAULT_ENGINE: OnceLock<ViewModelEngine> = OnceLock::new();

/// Normalizes a payload with the built-in configuration.
pub fn normalize(payload: &Value) -> NormalizedViewModel {
    DEFAULT_ENGINE.get_or_init(ViewModelEngine::default).normalize(payload)
}
