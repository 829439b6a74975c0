use async_trait::async_trait;
use core_types::Controls;
use engine::{PayloadSource, TransportError};
use serde_json::Value;
use std::io::ErrorKind;
use std::path::PathBuf;

/// Serves a single analysis payload from a JSON file on disk.
///
/// The file is re-read on every fetch, so edits show up on the next
/// controls update.
pub struct FilePayloadSource {
    path: PathBuf,
}

impl FilePayloadSource {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }
}

#[async_trait]
impl PayloadSource for FilePayloadSource {
    async fn fetch(&self, project_id: &str, controls: &Controls) -> Result<Value, TransportError> {
        tracing::debug!(
            path = %self.path.display(),
            project_id,
            stress_band_pct = controls.stress_band_pct,
            "Reading payload file."
        );

        let bytes = tokio::fs::read(&self.path).await.map_err(|e| {
            let retryable = matches!(e.kind(), ErrorKind::Interrupted | ErrorKind::WouldBlock);
            TransportError::new(format!("{}: {}", self.path.display(), e), retryable)
        })?;

        serde_json::from_slice(&bytes).map_err(|e| {
            TransportError::new(format!("{} is not valid JSON: {}", self.path.display(), e), false)
        })
    }
}
