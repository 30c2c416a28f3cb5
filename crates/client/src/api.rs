//! REST API client for the style-prediction backend.
//!
//! Wraps the backend's HTTP endpoints (prediction, favorites, feedback,
//! status, statistics) using [`reqwest`].

use std::time::Duration;

use serde::de::DeserializeOwned;
use stylescope_core::prediction::{
    application_error, FavoriteResponse, FeedbackRecord, FeedbackStats, PredictionResult,
};
use stylescope_core::status::StatusResponse;
use stylescope_core::upload::UploadSelection;

use crate::config::ClientConfig;

/// Header the favorites blueprint checks before answering with JSON
/// instead of a redirect.
const REQUESTED_WITH_HEADER: &str = "X-Requested-With";
const REQUESTED_WITH_VALUE: &str = "XMLHttpRequest";

/// HTTP client for one backend instance.
#[derive(Debug, Clone)]
pub struct StyleApi {
    client: reqwest::Client,
    api_url: String,
    feedback_path: String,
    status_path: String,
}

/// Errors from the REST API layer.
#[derive(Debug, thiserror::Error)]
pub enum StyleApiError {
    /// The HTTP request itself failed (network, DNS, TLS, timeout).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The backend returned a non-2xx status without an error message.
    #[error("Backend error ({status}): {body}")]
    ApiError {
        /// HTTP status code.
        status: u16,
        /// Raw response body for debugging.
        body: String,
    },

    /// The backend answered with an `error` field.
    #[error("{0}")]
    Application(String),

    /// The body could not be decoded into the expected shape.
    #[error("Malformed response: {0}")]
    Decode(String),

    /// The configured base URL cannot carry path segments.
    #[error("Invalid API URL: {0}")]
    InvalidUrl(String),
}

impl StyleApiError {
    /// Message to show the user for this failure.
    ///
    /// Application errors are surfaced verbatim; everything else maps to
    /// `fallback`.
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            StyleApiError::Application(msg) => msg.clone(),
            _ => fallback.to_string(),
        }
    }
}

impl StyleApi {
    /// Create a new API client with default endpoint paths.
    ///
    /// * `api_url` - Base HTTP URL, e.g. `http://localhost:5000`.
    pub fn new(api_url: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), api_url)
    }

    /// Create an API client reusing an existing [`reqwest::Client`].
    pub fn with_client(client: reqwest::Client, api_url: impl Into<String>) -> Self {
        let defaults = ClientConfig::default();
        Self {
            client,
            api_url: api_url.into().trim_end_matches('/').to_string(),
            feedback_path: defaults.feedback_path,
            status_path: defaults.status_path,
        }
    }

    /// Build a client honouring the configured timeout and endpoint paths.
    pub fn from_config(config: &ClientConfig) -> Result<Self, StyleApiError> {
        let mut builder = reqwest::Client::builder();
        if let Some(secs) = config.request_timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }

        Ok(Self {
            client: builder.build()?,
            api_url: config.api_url.trim_end_matches('/').to_string(),
            feedback_path: config.feedback_path.clone(),
            status_path: config.status_path.clone(),
        })
    }

    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    /// Submit an image for style prediction.
    ///
    /// Sends a multipart `POST /predict` with the `image` part and, when
    /// non-blank, a `user_comments` text part.
    pub async fn predict(
        &self,
        selection: &UploadSelection,
        comment: Option<&str>,
    ) -> Result<PredictionResult, StyleApiError> {
        let image = reqwest::multipart::Part::bytes(selection.bytes.clone())
            .file_name(selection.file_name.clone())
            .mime_str(&selection.mime_type)?;

        let mut form = reqwest::multipart::Form::new().part("image", image);
        if let Some(comment) = comment.map(str::trim).filter(|c| !c.is_empty()) {
            form = form.text("user_comments", comment.to_string());
        }

        tracing::info!(
            file_name = %selection.file_name,
            size = selection.size(),
            mime_type = %selection.mime_type,
            has_comment = comment.is_some_and(|c| !c.trim().is_empty()),
            "Submitting image for prediction",
        );

        let response = self
            .client
            .post(self.url("/predict"))
            .multipart(form)
            .send()
            .await?;

        let result: PredictionResult = Self::parse_response(response).await?;

        tracing::info!(
            prediction_id = result.prediction_id.as_deref().unwrap_or("<none>"),
            primary_style = result.primary_style.as_deref().unwrap_or("<none>"),
            products = result.recommendations.len(),
            outfits = result.outfit_combinations.len(),
            "Prediction received",
        );

        Ok(result)
    }

    /// Mark a prediction as a favorite.
    ///
    /// Sends `POST /favorites/add/{prediction_id}` with no body.
    pub async fn add_favorite(
        &self,
        prediction_id: &str,
    ) -> Result<FavoriteResponse, StyleApiError> {
        let response = self
            .client
            .post(self.segment_url(&["favorites", "add", prediction_id])?)
            .header(REQUESTED_WITH_HEADER, REQUESTED_WITH_VALUE)
            .send()
            .await?;

        Self::parse_favorite_response(response).await
    }

    /// Remove a saved favorite.
    pub async fn remove_favorite(
        &self,
        favorite_id: &str,
    ) -> Result<FavoriteResponse, StyleApiError> {
        let response = self
            .client
            .post(self.segment_url(&["favorites", "remove", favorite_id])?)
            .header(REQUESTED_WITH_HEADER, REQUESTED_WITH_VALUE)
            .send()
            .await?;

        Self::parse_favorite_response(response).await
    }

    /// Replace the notes stored with a favorite.
    pub async fn update_favorite_notes(
        &self,
        favorite_id: &str,
        notes: &str,
    ) -> Result<FavoriteResponse, StyleApiError> {
        let response = self
            .client
            .post(self.segment_url(&["favorites", "update", favorite_id])?)
            .header(REQUESTED_WITH_HEADER, REQUESTED_WITH_VALUE)
            .form(&[("notes", notes)])
            .send()
            .await?;

        Self::parse_favorite_response(response).await
    }

    /// Submit an accuracy judgment for a prediction.
    ///
    /// The acknowledgment body is returned as-is.
    pub async fn submit_feedback(
        &self,
        record: &FeedbackRecord,
    ) -> Result<serde_json::Value, StyleApiError> {
        tracing::info!(
            prediction_id = %record.prediction_id,
            style = %record.style,
            is_accurate = record.is_accurate,
            "Submitting feedback",
        );

        let response = self
            .client
            .post(self.url(&self.feedback_path))
            .json(record)
            .send()
            .await?;

        Self::parse_response(response).await
    }

    /// Query upstream connectivity.
    pub async fn check_status(&self) -> Result<StatusResponse, StyleApiError> {
        let response = self.client.get(self.url(&self.status_path)).send().await?;
        Self::parse_response(response).await
    }

    /// Retrieve aggregate feedback statistics (`GET /stats`).
    ///
    /// A 2xx body that carries counters is returned even when it also has
    /// an `error` field; the message stays reachable through
    /// [`FeedbackStats::backend_error`].
    pub async fn stats(&self) -> Result<FeedbackStats, StyleApiError> {
        let response = self.client.get(self.url("/stats")).send().await?;
        let (status, body, json) = Self::read_body(response).await?;

        if status.is_success() {
            let partial = json
                .as_ref()
                .and_then(|v| serde_json::from_value::<FeedbackStats>(v.clone()).ok())
                .filter(FeedbackStats::has_counters);
            if let Some(stats) = partial {
                if let Some(message) = stats.backend_error() {
                    tracing::warn!(error = %message, "Statistics returned with a backend error");
                }
                return Ok(stats);
            }
        }

        Self::classify(status, body, json)
    }

    // ---- private helpers ----

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.api_url, path)
    }

    /// Append `segments` to the base URL, percent-encoding each one so
    /// ids containing `/`, `?` or `#` stay a single path segment.
    fn segment_url(&self, segments: &[&str]) -> Result<reqwest::Url, StyleApiError> {
        let mut url = reqwest::Url::parse(&self.api_url)
            .map_err(|e| StyleApiError::InvalidUrl(format!("{}: {e}", self.api_url)))?;
        url.path_segments_mut()
            .map_err(|()| StyleApiError::InvalidUrl(self.api_url.clone()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Read the body and split it into status, raw text and parsed JSON.
    async fn read_body(
        response: reqwest::Response,
    ) -> Result<(reqwest::StatusCode, String, Option<serde_json::Value>), StyleApiError> {
        let status = response.status();
        let body = response.text().await?;
        let json = serde_json::from_str::<serde_json::Value>(&body).ok();
        Ok((status, body, json))
    }

    /// Parse a JSON response into the expected type.
    ///
    /// An `error` field wins over the status code, so a 4xx/5xx carrying a
    /// message surfaces that message instead of the raw body.
    async fn parse_response<T: DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, StyleApiError> {
        let (status, body, json) = Self::read_body(response).await?;
        Self::classify(status, body, json)
    }

    fn classify<T: DeserializeOwned>(
        status: reqwest::StatusCode,
        body: String,
        json: Option<serde_json::Value>,
    ) -> Result<T, StyleApiError> {
        if let Some(message) = json.as_ref().and_then(application_error) {
            tracing::warn!(status = status.as_u16(), error = %message, "Backend reported an error");
            return Err(StyleApiError::Application(message));
        }

        if !status.is_success() {
            return Err(StyleApiError::ApiError {
                status: status.as_u16(),
                body,
            });
        }

        let json = json.ok_or_else(|| StyleApiError::Decode("response body is not JSON".into()))?;
        serde_json::from_value(json).map_err(|e| StyleApiError::Decode(e.to_string()))
    }

    /// Favorites answer `{status, message}` even on 4xx, so any body that
    /// carries one of the result fields is returned regardless of status.
    async fn parse_favorite_response(
        response: reqwest::Response,
    ) -> Result<FavoriteResponse, StyleApiError> {
        let (status, body, json) = Self::read_body(response).await?;

        let parsed = json
            .filter(|v| v.get("success").is_some() || v.get("status").is_some())
            .and_then(|v| serde_json::from_value::<FavoriteResponse>(v).ok());

        match parsed {
            Some(favorite) => Ok(favorite),
            None if !status.is_success() => Err(StyleApiError::ApiError {
                status: status.as_u16(),
                body,
            }),
            None => Err(StyleApiError::Decode(
                "favorite response has neither 'success' nor 'status'".into(),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trailing_slash_is_trimmed() {
        let api = StyleApi::new("http://localhost:5000/");
        assert_eq!(api.api_url(), "http://localhost:5000");
        assert_eq!(api.url("/predict"), "http://localhost:5000/predict");
    }

    #[test]
    fn from_config_uses_configured_paths() {
        let config = ClientConfig {
            feedback_path: "/submit-feedback".into(),
            request_timeout_secs: Some(5),
            ..ClientConfig::default()
        };
        let api = StyleApi::from_config(&config).unwrap();
        assert_eq!(api.url(&api.feedback_path), "http://localhost:5000/submit-feedback");
    }

    #[test]
    fn ids_are_encoded_as_single_segments() {
        let api = StyleApi::new("http://localhost:5000/app/");
        let url = api
            .segment_url(&["favorites", "add", "look/42?x#y"])
            .unwrap();
        assert_eq!(
            url.as_str(),
            "http://localhost:5000/app/favorites/add/look%2F42%3Fx%23y"
        );

        let bare = StyleApi::new("http://localhost:5000");
        assert_eq!(
            bare.segment_url(&["favorites", "remove", "abc"]).unwrap().as_str(),
            "http://localhost:5000/favorites/remove/abc"
        );
    }

    #[test]
    fn relative_base_url_is_rejected() {
        let api = StyleApi::new("localhost");
        assert_matches::assert_matches!(
            api.segment_url(&["favorites", "add", "abc"]),
            Err(StyleApiError::InvalidUrl(_))
        );
    }

    #[test]
    fn user_message_prefers_application_text() {
        let app = StyleApiError::Application("Quota exceeded".into());
        let http = StyleApiError::ApiError {
            status: 502,
            body: "<html>".into(),
        };
        assert_eq!(app.user_message("fallback"), "Quota exceeded");
        assert_eq!(http.user_message("fallback"), "fallback");
    }
}
