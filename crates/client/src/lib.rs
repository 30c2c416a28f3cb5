//! StyleScope backend client library.
//!
//! Provides the typed REST client for the style-prediction backend, the
//! environment-driven configuration, and the best-effort WebSocket
//! progress channel used to animate the loading indicator.

pub mod api;
pub mod client;
pub mod config;
pub mod events;
pub mod listener;
pub mod messages;
pub mod processor;
