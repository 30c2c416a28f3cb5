//! Events emitted by the progress listener.
//!
//! These are the interpreted form of raw WebSocket frames and the
//! connection lifecycle; the controller consumes them to animate its
//! progress indicator.

#[derive(Debug, Clone, PartialEq)]
pub enum ProgressEvent {
    /// The WebSocket connection was established.
    ChannelConnected,

    /// The WebSocket connection closed or could not be opened.
    ChannelClosed,

    /// The backend reported progress on the running prediction.
    Update {
        step: String,
        /// Completion percentage (0-100).
        percent: u8,
    },
}
