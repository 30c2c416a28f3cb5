//! Progress-channel WebSocket message types and parser.
//!
//! The backend pushes JSON frames of the shape
//! `{"type": "processing_update", "step": "...", "progress": 42}` while a
//! prediction is running. This module deserializes them into a typed
//! [`ProgressMessage`] enum.

use serde::Deserialize;

/// All known progress-channel message types.
///
/// Deserialized via the internally-tagged `"type"` field.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type")]
pub enum ProgressMessage {
    /// The backend moved to a new processing step.
    #[serde(rename = "processing_update")]
    ProcessingUpdate(ProcessingUpdate),
}

/// Payload for `processing_update` messages.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ProcessingUpdate {
    /// Human-readable step name, e.g. "Analyzing style".
    #[serde(default)]
    pub step: String,
    /// Completion percentage as sent by the backend (not validated).
    #[serde(default)]
    pub progress: f64,
}

impl ProcessingUpdate {
    /// Completion percentage clamped to `0..=100`.
    pub fn percent(&self) -> u8 {
        if self.progress.is_nan() {
            return 0;
        }
        self.progress.clamp(0.0, 100.0).round() as u8
    }
}

/// Parse a progress-channel text frame into a typed enum.
///
/// Returns `Err` for malformed JSON or unknown `type` values.
/// Callers should log unknown types and continue.
pub fn parse_message(text: &str) -> Result<ProgressMessage, serde_json::Error> {
    serde_json::from_str(text)
}
