//! Response bodies for the HTTP API.

use serde::{Deserialize, Serialize};

/// Successful answer response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AskResponse {
    /// The generated answer.
    pub answer: String,
}

/// Error response body.
///
/// Every failure surfaces as a single `detail` string describing the
/// server-side error.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Human-readable description of the failure.
    pub detail: String,
}

/// Health monitor response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Service status.
    pub status: String,
    /// Service name.
    pub name: String,
    /// Service version.
    pub version: String,
}
