use crate::assembler::ViewModelEngine;
use crate::controls::ControlsUpdate;
use crate::error::{EngineError, TransportError};
use crate::view_model::NormalizedViewModel;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use core_types::Controls;
use serde_json::Value;
use std::sync::Arc;
use tokio::sync::Mutex;
use uuid::Uuid;

/// The transport that produces analysis payloads for a project.
///
/// Retry and backoff belong to the implementation; the session treats every
/// error as final for that request.
#[async_trait]
pub trait PayloadSource: Send + Sync {
    async fn fetch(&self, project_id: &str, controls: &Controls) -> Result<Value, TransportError>;
}

/// Identifies one in-flight fetch.
///
/// A ticket is current only while no newer ticket has been issued.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchTicket {
    pub request_id: Uuid,
    pub project_id: String,
    generation: u64,
}

/// The view model currently on display and the request that produced it.
#[derive(Debug, Clone)]
pub struct SessionSnapshot {
    pub project_id: String,
    pub request_id: Uuid,
    pub fetched_at: DateTime<Utc>,
    pub view_model: Arc<NormalizedViewModel>,
}

#[derive(Debug, Default)]
struct SessionState {
    generation: u64,
    project_id: Option<String>,
    controls: Controls,
    current: Option<SessionSnapshot>,
}

/// Sequences fetches for the caller and owns the current view model.
///
/// Results for superseded requests are discarded, and a failed fetch leaves
/// the previous view model in place.
pub struct ViewModelSession {
    source: Arc<dyn PayloadSource>,
    engine: Arc<ViewModelEngine>,
    state: Mutex<SessionState>,
}

impl ViewModelSession {
    pub fn new(source: Arc<dyn PayloadSource>, engine: Arc<ViewModelEngine>) -> Self {
        let controls = Controls {
            stress_band_pct: engine.config().controls.default_stress_band,
            ..Controls::default()
        };
        Self {
            source,
            engine,
            state: Mutex::new(SessionState { controls, ..SessionState::default() }),
        }
    }

    /// Fetches and normalizes the payload for `project_id` with the current controls.
    pub async fn load(&self, project_id: &str) -> Result<Arc<NormalizedViewModel>, EngineError> {
        let (ticket, controls) = self.begin(project_id, None).await;
        tracing::info!(request_id = %ticket.request_id, project_id, "Loading view model.");
        let result = self.source.fetch(project_id, &controls).await;
        self.complete(ticket, result).await
    }

    /// Applies a controls change and re-fetches. The stress band is snapped first.
    pub async fn update_controls(
        &self,
        project_id: &str,
        update: ControlsUpdate,
    ) -> Result<Arc<NormalizedViewModel>, EngineError> {
        let controls = update.snapped(&self.engine.config().controls);
        let (ticket, controls) = self.begin(project_id, Some(controls)).await;
        tracing::info!(
            request_id = %ticket.request_id,
            project_id,
            stress_band_pct = controls.stress_band_pct,
            "Controls updated; re-fetching."
        );
        let result = self.source.fetch(project_id, &controls).await;
        self.complete(ticket, result).await
    }

    /// Issues a new ticket, superseding every earlier one.
    pub async fn begin(&self, project_id: &str, controls: Option<Controls>) -> (FetchTicket, Controls) {
        let mut state = self.state.lock().await;
        state.generation += 1;
        if state.project_id.as_deref() != Some(project_id) {
            tracing::debug!(project_id, "Session switched project.");
            state.project_id = Some(project_id.to_string());
        }
        if let Some(controls) = controls {
            state.controls = controls;
        }
        let ticket = FetchTicket {
            request_id: Uuid::new_v4(),
            project_id: project_id.to_string(),
            generation: state.generation,
        };
        (ticket, state.controls.clone())
    }

    /// Resolves a ticket with its fetch result.
    ///
    /// Stale tickets are discarded without touching the current view model.
    /// Transport failures are returned and also leave it untouched. The lock is
    /// not held while normalizing.
    pub async fn complete(
        &self,
        ticket: FetchTicket,
        result: Result<Value, TransportError>,
    ) -> Result<Arc<NormalizedViewModel>, EngineError> {
        self.ensure_current(&ticket).await?;

        let payload = match result {
            Ok(payload) => payload,
            Err(e) => {
                tracing::warn!(
                    request_id = %ticket.request_id,
                    project_id = %ticket.project_id,
                    retryable = e.retryable,
                    error = %e,
                    "Fetch failed; keeping the previous view model."
                );
                return Err(EngineError::Transport(e));
            }
        };

        let view_model = Arc::new(self.engine.normalize(&payload));

        let mut state = self.state.lock().await;
        if !is_current(&state, &ticket) {
            return Err(stale(&ticket));
        }
        state.current = Some(SessionSnapshot {
            project_id: ticket.project_id.clone(),
            request_id: ticket.request_id,
            fetched_at: Utc::now(),
            view_model: Arc::clone(&view_model),
        });
        tracing::info!(
            request_id = %ticket.request_id,
            project_id = %ticket.project_id,
            status = %view_model.decision_status,
            "View model replaced."
        );
        Ok(view_model)
    }

    /// The snapshot on display, if any fetch has succeeded.
    pub async fn current(&self) -> Option<SessionSnapshot> {
        self.state.lock().await.current.clone()
    }

    pub async fn controls(&self) -> Controls {
        self.state.lock().await.controls.clone()
    }

    async fn ensure_current(&self, ticket: &FetchTicket) -> Result<(), EngineError> {
        let state = self.state.lock().await;
        if is_current(&state, ticket) { Ok(()) } else { Err(stale(ticket)) }
    }
}

fn is_current(state: &SessionState, ticket: &FetchTicket) -> bool {
    state.generation == ticket.generation && state.project_id.as_deref() == Some(ticket.project_id.as_str())
}

fn stale(ticket: &FetchTicket) -> EngineError {
    tracing::warn!(
        request_id = %ticket.request_id,
        project_id = %ticket.project_id,
        "Discarding result for a superseded request."
    );
    EngineError::StaleRequest {
        request_id: ticket.request_id,
        project_id: ticket.project_id.clone(),
    }
}
