//! WebSocket client for the progress channel.
//!
//! [`ProgressClient`] holds the channel URL. Call
//! [`ProgressClient::connect`] to establish a live [`ProgressConnection`].

use tokio_tungstenite::{connect_async, MaybeTlsStream};

/// Stream type of an open progress connection.
pub type ProgressStream = tokio_tungstenite::WebSocketStream<MaybeTlsStream<tokio::net::TcpStream>>;

/// Configuration handle for the progress channel.
#[derive(Debug, Clone)]
pub struct ProgressClient {
    ws_url: String,
}

/// A live WebSocket connection to the progress channel.
pub struct ProgressConnection {
    /// Unique client ID sent during the WebSocket handshake.
    pub client_id: String,
    /// The raw WebSocket stream for reading frames.
    pub ws_stream: ProgressStream,
}

impl ProgressClient {
    /// * `ws_url` - full channel URL, e.g. `ws://localhost:5000/ws`.
    pub fn new(ws_url: impl Into<String>) -> Self {
        Self {
            ws_url: ws_url.into(),
        }
    }

    pub fn ws_url(&self) -> &str {
        &self.ws_url
    }

    /// Connect to the progress channel.
    ///
    /// Generates a unique `client_id` (UUID v4) and appends it as a query
    /// parameter so the backend can address updates to this client.
    pub async fn connect(&self) -> Result<ProgressConnection, ProgressClientError> {
        let client_id = uuid::Uuid::new_v4().to_string();
        let separator = if self.ws_url.contains('?') { '&' } else { '?' };
        let url = format!("{}{separator}clientId={client_id}", self.ws_url);

        let (ws_stream, _response) = connect_async(&url).await.map_err(|e| {
            ProgressClientError::Connection(format!(
                "Failed to connect to progress channel at {}: {e}",
                self.ws_url
            ))
        })?;

        tracing::info!(client_id = %client_id, "Connected to progress channel at {}", self.ws_url);

        Ok(ProgressConnection {
            client_id,
            ws_stream,
        })
    }
}

/// Errors that can occur when working with the progress channel.
#[derive(Debug, thiserror::Error)]
pub enum ProgressClientError {
    /// Failed to establish the WebSocket connection.
    #[error("Connection error: {0}")]
    Connection(String),
}
