//! Background listener for the progress channel.
//!
//! [`ProgressListener`] owns a single connection task (connect -> process
//! -> exit). Events are broadcast via a [`tokio::sync::broadcast`]
//! channel; call [`ProgressListener::subscribe`] to receive them. There
//! is no reconnection: when the channel drops, progress simply stops.

use std::time::Duration;

use tokio::sync::broadcast;
use tokio_util::sync::CancellationToken;

use crate::client::ProgressClient;
use crate::events::ProgressEvent;
use crate::processor::process_messages;

/// Broadcast channel capacity for progress events.
const EVENT_CHANNEL_CAPACITY: usize = 64;

/// How long [`ProgressListener::shutdown`] waits for the task to exit.
const SHUTDOWN_GRACE: Duration = Duration::from_secs(2);

pub struct ProgressListener {
    event_tx: broadcast::Sender<ProgressEvent>,
    task_handle: tokio::task::JoinHandle<()>,
    cancel: CancellationToken,
}

impl ProgressListener {
    /// Spawn the connection task.
    ///
    /// Subscribers created by the caller right after `start` may miss the
    /// `ChannelConnected` event if the handshake is very fast; use
    /// [`start_with_receiver`](Self::start_with_receiver) to avoid that.
    pub fn start(client: ProgressClient) -> Self {
        Self::start_with_receiver(client).0
    }

    /// Spawn the connection task and return a receiver subscribed before
    /// the connection attempt begins.
    pub fn start_with_receiver(
        client: ProgressClient,
    ) -> (Self, broadcast::Receiver<ProgressEvent>) {
        let (event_tx, event_rx) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        let cancel = CancellationToken::new();

        let task_tx = event_tx.clone();
        let task_cancel = cancel.clone();
        let task_handle = tokio::spawn(async move {
            tokio::select! {
                _ = task_cancel.cancelled() => {
                    tracing::debug!("Progress listener cancelled");
                }
                _ = run_listener(&client, &task_tx) => {}
            }
            let _ = task_tx.send(ProgressEvent::ChannelClosed);
        });

        let listener = Self {
            event_tx,
            task_handle,
            cancel,
        };
        (listener, event_rx)
    }

    pub fn subscribe(&self) -> broadcast::Receiver<ProgressEvent> {
        self.event_tx.subscribe()
    }

    pub fn is_finished(&self) -> bool {
        self.task_handle.is_finished()
    }

    /// Stop the connection task, waiting briefly for a clean exit.
    pub async fn shutdown(self) {
        self.cancel.cancel();
        let _ = tokio::time::timeout(SHUTDOWN_GRACE, self.task_handle).await;
        tracing::debug!("Progress listener shut down");
    }
}

async fn run_listener(client: &ProgressClient, event_tx: &broadcast::Sender<ProgressEvent>) {
    let mut conn = match client.connect().await {
        Ok(conn) => conn,
        Err(e) => {
            tracing::warn!(error = %e, "Progress channel unavailable, continuing without it");
            return;
        }
    };

    let _ = event_tx.send(ProgressEvent::ChannelConnected);
    process_messages(&mut conn.ws_stream, event_tx).await;
    tracing::info!(client_id = %conn.client_id, "Progress channel ended");
}
