//! WebSocket message processing loop.
//!
//! Reads raw frames from the progress channel, parses them into typed
//! [`ProgressMessage`] variants and emits [`ProgressEvent`]s to the
//! broadcast channel.

use futures::StreamExt;
use tokio::sync::broadcast;
use tokio_tungstenite::tungstenite::Message;

use crate::client::ProgressStream;
use crate::events::ProgressEvent;
use crate::messages::{parse_message, ProgressMessage};

/// Process WebSocket messages from the progress channel.
///
/// Loops until the WebSocket closes, encounters a receive error, or the
/// stream is exhausted. Malformed and unknown frames are logged and
/// skipped; the channel carries no delivery guarantees.
pub async fn process_messages(
    ws_stream: &mut ProgressStream,
    event_tx: &broadcast::Sender<ProgressEvent>,
) {
    while let Some(msg_result) = ws_stream.next().await {
        match msg_result {
            Ok(Message::Text(text)) => {
                handle_text_message(&text, event_tx);
            }
            Ok(Message::Binary(_)) => {
                tracing::trace!("Ignoring binary progress frame");
            }
            Ok(Message::Ping(_) | Message::Pong(_)) => {
                // Handled automatically by tungstenite.
            }
            Ok(Message::Close(frame)) => {
                tracing::info!(?frame, "Progress channel closed");
                break;
            }
            Ok(Message::Frame(_)) => {}
            Err(e) => {
                tracing::warn!(error = %e, "Progress channel receive error");
                break;
            }
        }
    }
}

/// Dispatch a single text frame.
pub fn handle_text_message(text: &str, event_tx: &broadcast::Sender<ProgressEvent>) {
    match parse_message(text) {
        Ok(ProgressMessage::ProcessingUpdate(data)) => {
            let percent = data.percent();
            tracing::debug!(step = %data.step, percent, "Processing update");
            // No receivers is fine: progress is cosmetic.
            let _ = event_tx.send(ProgressEvent::Update {
                step: data.step,
                percent,
            });
        }
        Err(e) => {
            tracing::warn!(
                error = %e,
                raw_message = %text,
                "Failed to parse progress message",
            );
        }
    }
}
