//! The upload -> predict -> render state machine.

use stylescope_client::api::StyleApiError;
use stylescope_client::events::ProgressEvent;
use stylescope_core::error::CoreError;
use stylescope_core::prediction::FeedbackRecord;
use stylescope_core::render::render_results;
use stylescope_core::status::{is_service_issue, ServiceStatus};
use stylescope_core::upload::{prepare_preview, UploadLimits, UploadSelection};
use tokio::sync::{broadcast, watch};

use crate::backend::StyleBackend;
use crate::error::ControllerError;
use crate::state::{Action, ControllerState};
use crate::view::{FavoriteButton, FeedbackPanel, Notice, PageView, ProgressView};

pub const SELECT_IMAGE_FIRST: &str = "Please select an image first";
pub const GENERIC_PREDICT_ERROR: &str = "An error occurred during analysis. Please try again.";
pub const UNREADABLE_IMAGE: &str = "Could not read the selected image. Please choose another file.";
pub const GENERIC_FAVORITE_ERROR: &str = "Error saving to favorites. Please try again.";
pub const GENERIC_FEEDBACK_ERROR: &str = "Could not submit feedback. Please try again.";
pub const FAVORITE_SAVED: &str = "Saved to your favorites!";

/// The prediction that favorite and feedback apply to.
#[derive(Debug, Clone)]
struct PredictionContext {
    prediction_id: Option<String>,
    style: String,
}

/// Drives one page view.
///
/// All methods take `&mut self`, so events are handled strictly one at a
/// time; the state enum decides which of them may start.
pub struct PageController<B> {
    backend: B,
    limits: UploadLimits,
    state: ControllerState,
    selection: Option<UploadSelection>,
    prediction: Option<PredictionContext>,
    progress_rx: Option<broadcast::Receiver<ProgressEvent>>,
    progress_tx: watch::Sender<Option<ProgressView>>,
    view: PageView,
}

impl<B: StyleBackend> PageController<B> {
    pub fn new(backend: B, limits: UploadLimits) -> Self {
        let (progress_tx, _) = watch::channel(None);
        Self {
            backend,
            limits,
            state: ControllerState::Idle,
            selection: None,
            prediction: None,
            progress_rx: None,
            progress_tx,
            view: PageView::default(),
        }
    }

    pub fn state(&self) -> ControllerState {
        self.state
    }

    pub fn view(&self) -> &PageView {
        &self.view
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn selection(&self) -> Option<&UploadSelection> {
        self.selection.as_ref()
    }

    pub fn prediction_id(&self) -> Option<&str> {
        self.prediction
            .as_ref()
            .and_then(|p| p.prediction_id.as_deref())
    }

    /// Feed progress-channel events into the view while a prediction is in
    /// flight. The receiver is dropped once the channel closes.
    pub fn attach_progress(&mut self, rx: broadcast::Receiver<ProgressEvent>) {
        self.progress_rx = Some(rx);
    }

    /// Follow `view().progress` from outside, including while `submit`
    /// holds the controller.
    pub fn watch_progress(&self) -> watch::Receiver<Option<ProgressView>> {
        self.progress_tx.subscribe()
    }

    // ---- upload area ----

    pub fn drag_over(&mut self) {
        self.view.upload.highlighted = true;
    }

    pub fn drag_leave(&mut self) {
        self.view.upload.highlighted = false;
    }

    /// Handle a file dropped on the upload area.
    ///
    /// The highlight is cleared whether or not the file is accepted.
    pub async fn drop_file(&mut self, selection: UploadSelection) -> Result<(), ControllerError> {
        self.view.upload.highlighted = false;
        self.select_file(selection).await
    }

    /// Validate, decode and preview a newly chosen file.
    ///
    /// Any previous selection is discarded first. Submit is enabled only
    /// once decoding succeeds.
    pub async fn select_file(&mut self, selection: UploadSelection) -> Result<(), ControllerError> {
        self.ensure_allowed(Action::SelectFile)?;
        self.clear_selection();

        let file_name = selection.file_name.clone();
        match prepare_preview(selection, self.limits).await {
            Ok((selection, preview)) => {
                tracing::info!(
                    file_name = %file_name,
                    width = preview.width,
                    height = preview.height,
                    "Image previewed",
                );
                self.view.upload.file_name = Some(file_name);
                self.view.upload.preview = Some(preview);
                self.selection = Some(selection);
                self.transition(ControllerState::Previewing);
                Ok(())
            }
            Err(e) => {
                tracing::warn!(file_name = %file_name, error = %e, "Image rejected");
                let message = upload_message(&e);
                self.view.upload.message = Some(message.clone());
                let next = self.state_without_selection();
                self.transition(next);
                Err(ControllerError::Rejected(message))
            }
        }
    }

    pub fn remove_selection(&mut self) -> Result<(), ControllerError> {
        self.ensure_allowed(Action::RemoveSelection)?;
        self.clear_selection();
        let next = self.state_without_selection();
        self.transition(next);
        Ok(())
    }

    // ---- prediction ----

    /// Submit the current selection for prediction.
    ///
    /// Without a selection this records "select an image first" and makes
    /// no request.
    pub async fn submit(&mut self, comment: Option<&str>) -> Result<(), ControllerError> {
        if self.state == ControllerState::Submitting {
            return Err(self.not_allowed(Action::Submit));
        }
        if self.selection.is_none() {
            self.view.upload.message = Some(SELECT_IMAGE_FIRST.to_string());
            return Err(ControllerError::Rejected(SELECT_IMAGE_FIRST.to_string()));
        }
        self.ensure_allowed(Action::Submit)?;

        self.prediction = None;
        self.view.upload.message = None;
        self.view.results = None;
        self.view.error_banner = None;
        self.view.notice = None;
        self.view.scroll_to_results = false;
        self.view.favorite = FavoriteButton::Hidden;
        self.view.feedback = FeedbackPanel::default();
        self.transition(ControllerState::Submitting);

        let mut channel_open = true;
        let outcome = {
            let Some(selection) = self.selection.as_ref() else {
                return Err(ControllerError::Rejected(SELECT_IMAGE_FIRST.to_string()));
            };
            let predict = self.backend.predict(selection, comment);
            tokio::pin!(predict);

            loop {
                let Some(rx) = self.progress_rx.as_mut().filter(|_| channel_open) else {
                    break predict.await;
                };
                tokio::select! {
                    outcome = &mut predict => break outcome,
                    event = rx.recv() => match event {
                        Ok(ProgressEvent::ChannelClosed) | Err(broadcast::error::RecvError::Closed) => {
                            channel_open = false;
                        }
                        Ok(event) => {
                            if let Some(progress) = progress_view(&event) {
                                self.view.progress = Some(progress);
                                self.progress_tx.send_replace(self.view.progress.clone());
                            }
                        }
                        Err(broadcast::error::RecvError::Lagged(skipped)) => {
                            tracing::debug!(skipped, "Progress receiver lagged");
                        }
                    },
                }
            }
        };
        if !channel_open {
            tracing::debug!("Progress channel closed, detaching");
            self.progress_rx = None;
        }

        match outcome {
            Ok(result) => {
                let results = render_results(&result);
                let prediction_id = results.prediction_id.clone();
                tracing::info!(
                    prediction_id = prediction_id.as_deref().unwrap_or("<none>"),
                    style = %results.style_label,
                    "Prediction rendered",
                );

                if prediction_id.is_some() {
                    self.view.favorite = FavoriteButton::Ready;
                    self.view.feedback = FeedbackPanel::ready();
                }
                self.prediction = Some(PredictionContext {
                    prediction_id,
                    style: result
                        .primary_style
                        .clone()
                        .unwrap_or_else(|| results.style_label.clone()),
                });
                self.view.results = Some(results);
                self.view.scroll_to_results = true;
                self.transition(ControllerState::Rendered);
                Ok(())
            }
            Err(e) => {
                let message = e.user_message(GENERIC_PREDICT_ERROR);
                tracing::warn!(error = %e, "Prediction failed");

                if matches!(e, StyleApiError::Application(_)) && is_service_issue(&message) {
                    self.view.service_status = Some(ServiceStatus::degraded(message.clone()));
                } else {
                    self.view.error_banner = Some(message.clone());
                }
                self.transition(ControllerState::Error);
                Err(ControllerError::Failed(message))
            }
        }
    }

    /// Apply a progress-channel event. Ignored unless a request is in flight.
    pub fn apply_progress(&mut self, event: &ProgressEvent) {
        if self.state != ControllerState::Submitting {
            return;
        }
        if let Some(progress) = progress_view(event) {
            self.view.progress = Some(progress);
            self.progress_tx.send_replace(self.view.progress.clone());
        }
    }

    /// The front end has scrolled the results into view.
    pub fn acknowledge_scroll(&mut self) {
        self.view.scroll_to_results = false;
    }

    // ---- secondary actions ----

    /// Mark the current prediction as a favorite.
    ///
    /// Success leaves the button disabled in its "saved" state; failure
    /// leaves it clickable.
    pub async fn save_favorite(&mut self) -> Result<(), ControllerError> {
        self.ensure_allowed(Action::Favorite)?;

        let Some(prediction_id) = self.prediction_id().map(str::to_string) else {
            tracing::warn!("No prediction ID found, not saving favorite");
            return Err(ControllerError::Rejected("No prediction to save".to_string()));
        };
        if self.view.favorite == FavoriteButton::Saved {
            return Err(self.not_allowed(Action::Favorite));
        }

        match self.backend.add_favorite(&prediction_id).await {
            Ok(response) if response.is_success() => {
                tracing::info!(prediction_id = %prediction_id, "Saved to favorites");
                self.view.favorite = FavoriteButton::Saved;
                self.view.notice = Some(Notice::success(FAVORITE_SAVED));
                Ok(())
            }
            Ok(response) => {
                let message = format!(
                    "Error saving to favorites: {}",
                    response.message.as_deref().unwrap_or("Unknown error")
                );
                tracing::warn!(prediction_id = %prediction_id, %message, "Favorite rejected");
                self.view.favorite = FavoriteButton::Ready;
                self.view.notice = Some(Notice::error(message.clone()));
                Err(ControllerError::Failed(message))
            }
            Err(e) => {
                tracing::error!(prediction_id = %prediction_id, error = %e, "Error saving favorite");
                let message = e.user_message(GENERIC_FAVORITE_ERROR);
                self.view.favorite = FavoriteButton::Ready;
                self.view.notice = Some(Notice::error(message.clone()));
                Err(ControllerError::Failed(message))
            }
        }
    }

    /// Submit an accuracy judgment for the current prediction.
    ///
    /// Both buttons are disabled while the request runs and stay disabled
    /// after success. On failure they are re-enabled so the user may retry.
    pub async fn submit_feedback(&mut self, is_accurate: bool) -> Result<(), ControllerError> {
        self.ensure_allowed(Action::Feedback)?;

        let Some((prediction_id, style)) = self.prediction.as_ref().and_then(|p| {
            p.prediction_id
                .clone()
                .map(|id| (id, p.style.clone()))
        }) else {
            tracing::warn!("No prediction ID found, not submitting feedback");
            return Err(ControllerError::Rejected(
                "No prediction to give feedback on".to_string(),
            ));
        };
        if !self.view.feedback.enabled {
            return Err(self.not_allowed(Action::Feedback));
        }

        self.view.feedback.enabled = false;
        self.view.feedback.selected = Some(is_accurate);
        self.view.feedback.thanks_visible = false;

        let record = FeedbackRecord {
            prediction_id,
            style,
            is_accurate,
        };

        match self.backend.submit_feedback(&record).await {
            Ok(ack) => {
                tracing::debug!(?ack, "Feedback submitted");
                self.view.feedback.thanks_visible = true;
                Ok(())
            }
            Err(e) => {
                tracing::error!(error = %e, "Error submitting feedback");
                let message = e.user_message(GENERIC_FEEDBACK_ERROR);
                self.view.feedback.enabled = true;
                self.view.feedback.selected = None;
                self.view.notice = Some(Notice::error(message.clone()));
                Err(ControllerError::Failed(message))
            }
        }
    }

    /// Refresh the upstream service-status banner.
    pub async fn refresh_status(&mut self) -> Result<(), ControllerError> {
        match self.backend.check_status().await {
            Ok(response) => {
                let status = ServiceStatus::from(response);
                tracing::info!(health = ?status.health, message = %status.message, "Service status");
                self.view.service_status = Some(status);
                Ok(())
            }
            Err(e) => {
                tracing::warn!(error = %e, "Status check failed");
                let message = format!("Could not check service status: {e}");
                self.view.service_status = Some(ServiceStatus::unreachable(message.clone()));
                Err(ControllerError::Failed(message))
            }
        }
    }

    /// "Try another": clear selection, results and banners.
    ///
    /// The service-status banner survives, it describes the backend rather
    /// than this attempt.
    pub fn reset(&mut self) -> Result<(), ControllerError> {
        self.ensure_allowed(Action::Reset)?;
        self.selection = None;
        self.prediction = None;
        self.view = PageView {
            service_status: self.view.service_status.take(),
            ..PageView::default()
        };
        self.transition(ControllerState::Idle);
        Ok(())
    }

    // ---- private helpers ----

    fn ensure_allowed(&self, action: Action) -> Result<(), ControllerError> {
        if self.state.allows(action) {
            Ok(())
        } else {
            Err(self.not_allowed(action))
        }
    }

    fn not_allowed(&self, action: Action) -> ControllerError {
        ControllerError::NotAllowed {
            action,
            state: self.state,
        }
    }

    fn clear_selection(&mut self) {
        self.selection = None;
        self.view.upload.file_name = None;
        self.view.upload.preview = None;
        self.view.upload.message = None;
    }

    /// Previewing falls back to Idle once its selection is gone; outcome
    /// states keep showing their outcome.
    fn state_without_selection(&self) -> ControllerState {
        match self.state {
            ControllerState::Previewing => ControllerState::Idle,
            other => other,
        }
    }

    fn transition(&mut self, next: ControllerState) {
        if self.state != next {
            tracing::debug!(from = %self.state, to = %next, "Controller state change");
        }
        self.state = next;
        self.sync_controls();
    }

    /// Re-derive the controls that depend only on state and selection.
    fn sync_controls(&mut self) {
        self.view.submit_enabled =
            self.state.allows(Action::Submit) && self.selection.is_some();
        self.view.loading = self.state == ControllerState::Submitting;
        if !self.view.loading {
            self.view.progress = None;
            self.progress_tx.send_if_modified(|current| current.take().is_some());
        }
    }
}

fn progress_view(event: &ProgressEvent) -> Option<ProgressView> {
    match event {
        ProgressEvent::Update { step, percent } => Some(ProgressView {
            step: step.clone(),
            percent: *percent,
        }),
        _ => None,
    }
}

fn upload_message(err: &CoreError) -> String {
    match err {
        CoreError::Validation(msg) => msg.clone(),
        _ => UNREADABLE_IMAGE.to_string(),
    }
}
