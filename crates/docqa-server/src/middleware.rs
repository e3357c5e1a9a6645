//! Router middleware for observability and recovery.

use std::any::Any;
use std::time::Duration;

use axum::Router;
use axum::http::header;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::handler::ErrorKind;

/// Tracing target for panic recovery.
const TRACING_TARGET_PANIC: &str = "docqa_server::recovery::panic";

/// Configuration for recovery middleware behavior.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[must_use = "config does nothing unless you use it"]
pub struct RecoveryConfig {
    /// Maximum duration in seconds to wait for a request to complete.
    ///
    /// The completion service sits on this path, so the ceiling needs to
    /// leave room for several continuation rounds.
    pub request_timeout: u64,
}

impl Default for RecoveryConfig {
    fn default() -> Self {
        Self {
            request_timeout: 120,
        }
    }
}

impl RecoveryConfig {
    /// Creates a new configuration with the specified request timeout in seconds.
    pub fn with_timeout_secs(secs: u64) -> Self {
        Self {
            request_timeout: secs,
        }
    }

    /// Returns the request timeout as a Duration.
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout)
    }
}

/// Extension trait for `axum::`[`Router`] to apply observability middleware.
pub trait RouterObservabilityExt {
    /// Layers request-ID generation and propagation plus HTTP tracing spans.
    fn with_observability(self) -> Self;
}

impl RouterObservabilityExt for Router {
    fn with_observability(self) -> Self {
        self.layer(PropagateRequestIdLayer::new(header::HeaderName::from_static(
            "x-request-id",
        )))
        .layer(TraceLayer::new_for_http())
        .layer(SetRequestIdLayer::new(
            header::HeaderName::from_static("x-request-id"),
            MakeRequestUuid,
        ))
    }
}

/// Extension trait for `axum::`[`Router`] to apply recovery middleware.
pub trait RouterRecoveryExt {
    /// Layers panic recovery and request timeouts.
    fn with_recovery(self, config: &RecoveryConfig) -> Self;
}

impl RouterRecoveryExt for Router {
    fn with_recovery(self, config: &RecoveryConfig) -> Self {
        self.layer(CatchPanicLayer::custom(handle_panic))
            .layer(TimeoutLayer::new(config.request_timeout()))
    }
}

/// Converts a handler panic into the standard error response shape.
fn handle_panic(panic: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = panic.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    };

    tracing::error!(
        target: TRACING_TARGET_PANIC,
        panic = %detail,
        "handler panicked"
    );

    ErrorKind::InternalServerError
        .with_message("Server error")
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_timeout_leaves_room_for_continuations() {
        let config = RecoveryConfig::default();
        assert_eq!(config.request_timeout(), Duration::from_secs(120));
    }

    #[test]
    fn custom_timeout_round_trips() {
        let config = RecoveryConfig::with_timeout_secs(30);
        assert_eq!(config.request_timeout(), Duration::from_secs(30));
    }
}
