//! The backend seam the controller talks through.
//!
//! [`StyleApi`] is the production implementation; tests substitute
//! in-memory fakes.

use async_trait::async_trait;
use stylescope_client::api::{StyleApi, StyleApiError};
use stylescope_core::prediction::{FavoriteResponse, FeedbackRecord, PredictionResult};
use stylescope_core::status::StatusResponse;
use stylescope_core::upload::UploadSelection;

#[async_trait]
pub trait StyleBackend: Send + Sync {
    async fn predict(
        &self,
        selection: &UploadSelection,
        comment: Option<&str>,
    ) -> Result<PredictionResult, StyleApiError>;

    async fn add_favorite(&self, prediction_id: &str) -> Result<FavoriteResponse, StyleApiError>;

    async fn submit_feedback(
        &self,
        record: &FeedbackRecord,
    ) -> Result<serde_json::Value, StyleApiError>;

    async fn check_status(&self) -> Result<StatusResponse, StyleApiError>;
}

#[async_trait]
impl StyleBackend for StyleApi {
    async fn predict(
        &self,
        selection: &UploadSelection,
        comment: Option<&str>,
    ) -> Result<PredictionResult, StyleApiError> {
        StyleApi::predict(self, selection, comment).await
    }

    async fn add_favorite(&self, prediction_id: &str) -> Result<FavoriteResponse, StyleApiError> {
        StyleApi::add_favorite(self, prediction_id).await
    }

    async fn submit_feedback(
        &self,
        record: &FeedbackRecord,
    ) -> Result<serde_json::Value, StyleApiError> {
        StyleApi::submit_feedback(self, record).await
    }

    async fn check_status(&self) -> Result<StatusResponse, StyleApiError> {
        StyleApi::check_status(self).await
    }
}
