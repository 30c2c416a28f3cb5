//! Domain layer for the StyleScope client.
//!
//! Upload validation, the prediction wire model, the pure rendering
//! projection and the error taxonomy shared by the client and controller
//! crates.

pub mod error;
pub mod prediction;
pub mod render;
pub mod status;
pub mod types;
pub mod upload;
