use crate::state::{Action, ControllerState};

/// Why a controller action did not complete.
///
/// The user-facing text is also recorded in the view; these values exist
/// so callers can react (exit codes, retries) without inspecting it.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ControllerError {
    /// The action is not available in the current state.
    #[error("{action} is not available while {state}")]
    NotAllowed {
        action: Action,
        state: ControllerState,
    },

    /// Local validation failed; nothing was sent.
    #[error("{0}")]
    Rejected(String),

    /// The backend call failed.
    #[error("{0}")]
    Failed(String),
}
