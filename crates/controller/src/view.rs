//! View-model standing in for the page's DOM.
//!
//! The controller rewrites these fields on every transition; a front end
//! (the CLI printer, or any other renderer) only reads them.

use stylescope_core::render::ResultsView;
use stylescope_core::status::ServiceStatus;
use stylescope_core::upload::ImagePreview;

/// Everything visible on the page.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PageView {
    pub upload: UploadAreaView,
    pub submit_enabled: bool,
    pub loading: bool,
    /// Cosmetic progress while a prediction is in flight.
    pub progress: Option<ProgressView>,
    /// Generic error banner for the last prediction attempt.
    pub error_banner: Option<String>,
    /// Upstream key/quota problems and explicit status refreshes.
    pub service_status: Option<ServiceStatus>,
    /// `None` keeps the results card hidden.
    pub results: Option<ResultsView>,
    /// Set when results were just rendered and should be scrolled to.
    pub scroll_to_results: bool,
    pub favorite: FavoriteButton,
    pub feedback: FeedbackPanel,
    /// Transient acknowledgment or failure of a secondary action.
    pub notice: Option<Notice>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct UploadAreaView {
    pub highlighted: bool,
    pub file_name: Option<String>,
    pub preview: Option<ImagePreview>,
    /// Inline validation message under the drop zone.
    pub message: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProgressView {
    pub step: String,
    pub percent: u8,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FavoriteButton {
    /// No prediction to save.
    #[default]
    Hidden,
    /// "Save to Favorites", clickable.
    Ready,
    /// "Saved to Favorites", disabled.
    Saved,
}

impl FavoriteButton {
    pub fn label(self) -> &'static str {
        match self {
            FavoriteButton::Hidden | FavoriteButton::Ready => "Save to Favorites",
            FavoriteButton::Saved => "Saved to Favorites",
        }
    }

    pub fn enabled(self) -> bool {
        self == FavoriteButton::Ready
    }
}

/// The accurate / inaccurate button pair.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FeedbackPanel {
    pub visible: bool,
    pub enabled: bool,
    /// The choice submitted, highlighted while pending or after success.
    pub selected: Option<bool>,
    pub thanks_visible: bool,
}

impl FeedbackPanel {
    pub fn ready() -> Self {
        Self {
            visible: true,
            enabled: true,
            selected: None,
            thanks_visible: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub text: String,
}

impl Notice {
    pub fn success(text: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Success,
            text: text.into(),
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Error,
            text: text.into(),
        }
    }
}
