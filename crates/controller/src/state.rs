//! Controller states and the actions each one enables.

use std::fmt;

/// Where the page is in the upload -> predict -> render cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ControllerState {
    /// No image selected.
    #[default]
    Idle,
    /// An image is selected and previewed; ready to submit.
    Previewing,
    /// A prediction request is in flight.
    Submitting,
    /// The last prediction rendered successfully.
    Rendered,
    /// The last prediction failed.
    Error,
}

/// User-triggerable actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    SelectFile,
    RemoveSelection,
    Submit,
    Favorite,
    Feedback,
    Reset,
}

impl ControllerState {
    /// Whether `action` may start in this state.
    ///
    /// Data preconditions (a selection for submit, a prediction id for
    /// favorite/feedback) are checked separately by the controller.
    pub fn allows(self, action: Action) -> bool {
        use ControllerState::*;
        match action {
            Action::SelectFile | Action::Reset | Action::Favorite | Action::Feedback => {
                self != Submitting
            }
            Action::RemoveSelection | Action::Submit => {
                matches!(self, Previewing | Rendered | Error)
            }
        }
    }
}

impl fmt::Display for ControllerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ControllerState::Idle => "idle",
            ControllerState::Previewing => "previewing",
            ControllerState::Submitting => "submitting",
            ControllerState::Rendered => "rendered",
            ControllerState::Error => "error",
        };
        f.write_str(label)
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Action::SelectFile => "select file",
            Action::RemoveSelection => "remove selection",
            Action::Submit => "submit",
            Action::Favorite => "save to favorites",
            Action::Feedback => "feedback",
            Action::Reset => "reset",
        };
        f.write_str(label)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn submitting_blocks_everything() {
        for action in [
            Action::SelectFile,
            Action::RemoveSelection,
            Action::Submit,
            Action::Favorite,
            Action::Feedback,
            Action::Reset,
        ] {
            assert!(!ControllerState::Submitting.allows(action), "{action}");
        }
    }

    #[test]
    fn idle_cannot_submit() {
        assert!(!ControllerState::Idle.allows(Action::Submit));
        assert!(ControllerState::Idle.allows(Action::SelectFile));
    }

    #[test]
    fn resubmit_after_outcome() {
        assert!(ControllerState::Rendered.allows(Action::Submit));
        assert!(ControllerState::Error.allows(Action::Submit));
        assert!(ControllerState::Previewing.allows(Action::Submit));
    }
}
