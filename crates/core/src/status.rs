//! Upstream service status and classification of service-level failures.
//!
//! Prediction failures caused by the backend's own upstream (a missing or
//! revoked API key, an exhausted quota) are shown in a dedicated status
//! banner rather than the generic error banner.

use serde::{Deserialize, Serialize};

/// Phrases that identify an upstream key or quota problem.
const SERVICE_ISSUE_MARKERS: &[&str] = &[
    "api key",
    "api_key",
    "apikey",
    "quota",
    "insufficient_quota",
    "rate limit",
    "billing",
];

/// Body of the status-refresh endpoint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusResponse {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServiceHealth {
    Operational,
    Degraded,
    Unreachable,
}

/// The service-status banner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceStatus {
    pub health: ServiceHealth,
    pub message: String,
}

impl ServiceStatus {
    pub fn operational(message: impl Into<String>) -> Self {
        Self {
            health: ServiceHealth::Operational,
            message: message.into(),
        }
    }

    pub fn degraded(message: impl Into<String>) -> Self {
        Self {
            health: ServiceHealth::Degraded,
            message: message.into(),
        }
    }

    pub fn unreachable(message: impl Into<String>) -> Self {
        Self {
            health: ServiceHealth::Unreachable,
            message: message.into(),
        }
    }
}

impl From<StatusResponse> for ServiceStatus {
    fn from(response: StatusResponse) -> Self {
        let ok = response
            .status
            .as_deref()
            .is_some_and(|s| s.eq_ignore_ascii_case("success") || s.eq_ignore_ascii_case("ok"));

        match (ok, response.message) {
            (true, Some(msg)) => Self::operational(msg),
            (true, None) => Self::operational("Style analysis service is available"),
            (false, Some(msg)) => Self::degraded(msg),
            (false, None) => Self::degraded("Style analysis service reported a problem"),
        }
    }
}

/// Whether an error message describes an upstream key or quota problem.
pub fn is_service_issue(message: &str) -> bool {
    let lower = message.to_lowercase();
    SERVICE_ISSUE_MARKERS.iter().any(|m| lower.contains(m))
}
