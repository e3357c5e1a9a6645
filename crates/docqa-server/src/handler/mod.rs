//! All `axum::`[`Router`]s with related handlers.
//!
//! [`Router`]: axum::Router

mod ask;
mod error;
mod monitors;
mod response;
mod upload;

use axum::Router;
use axum::response::IntoResponse;

pub use crate::handler::error::{Error, ErrorKind, Result};
pub use crate::handler::response::{AskResponse, ErrorResponse, HealthResponse};
pub use crate::handler::upload::TempUpload;
use crate::service::ServiceState;

#[inline]
async fn fallback() -> impl IntoResponse {
    ErrorKind::NotFound
}

/// Returns a [`Router`] with all routes.
pub fn routes() -> Router<ServiceState> {
    Router::new()
        .merge(ask::routes())
        .merge(monitors::routes())
        .fallback(fallback)
}

#[cfg(test)]
mod test {
    use std::sync::Arc;

    use axum::http::StatusCode;
    use axum_test::TestServer;
    use axum_test::multipart::{MultipartForm, Part};
    use docqa_opendal::ObjectStorage;
    use docqa_rag::generator::Completion;
    use docqa_rag::mock::ScriptedCompletion;
    use docqa_rag::provider::EmbeddingProvider;
    use docqa_rag::{GeneratorConfig, RagConfig, RagService};

    use crate::handler::response::{AskResponse, ErrorResponse, HealthResponse};
    use crate::handler::routes;
    use crate::service::ServiceState;

    /// Returns a new [`TestServer`] over a mocked service state.
    fn create_test_server(script: Vec<Completion>) -> TestServer {
        let rag = RagService::new(
            EmbeddingProvider::mock(64),
            Arc::new(ScriptedCompletion::new(script)),
            RagConfig::default(),
            GeneratorConfig::default(),
        )
        .expect("default config must be valid");

        let state = ServiceState::new(rag, ObjectStorage::disabled());
        let router = routes().with_state(state);
        TestServer::new(router).expect("failed to start test server")
    }

    #[tokio::test]
    async fn health_reports_ok() {
        let server = create_test_server(vec![]);

        let response = server.get("/health").await;
        response.assert_status(StatusCode::OK);

        let body: HealthResponse = response.json();
        assert_eq!(body.status, "ok");
    }

    #[tokio::test]
    async fn unknown_route_is_not_found() {
        let server = create_test_server(vec![]);

        let response = server.get("/nope").await;
        response.assert_status(StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn ask_without_file_is_rejected() {
        let server = create_test_server(vec![]);

        let form = MultipartForm::new().add_text("question", "What color is the sky?");
        let response = server.post("/ask").multipart(form).await;

        response.assert_status(StatusCode::BAD_REQUEST);
        let body: ErrorResponse = response.json();
        assert!(body.detail.contains("file"));
    }

    #[tokio::test]
    async fn ask_without_question_is_rejected() {
        let server = create_test_server(vec![]);

        let form = MultipartForm::new().add_part(
            "file",
            Part::bytes(b"%PDF-1.4".as_slice())
                .file_name("doc.pdf")
                .mime_type("application/pdf"),
        );
        let response = server.post("/ask").multipart(form).await;

        response.assert_status(StatusCode::BAD_REQUEST);
        let body: ErrorResponse = response.json();
        assert!(body.detail.contains("question"));
    }

    #[tokio::test]
    async fn unreadable_document_maps_to_server_error() {
        let server = create_test_server(vec![Completion::stopped("unused")]);

        let form = MultipartForm::new()
            .add_text("question", "What color is the sky?")
            .add_part(
                "file",
                Part::bytes(b"definitely not a pdf".as_slice())
                    .file_name("broken.pdf")
                    .mime_type("application/pdf"),
            );
        let response = server.post("/ask").multipart(form).await;

        response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
        let body: ErrorResponse = response.json();
        assert!(body.detail.contains("Failed to answer question"));
    }

    #[tokio::test]
    async fn answer_shape_matches_contract() {
        // Serialization contract check without a real PDF in the loop.
        let body = serde_json::to_value(AskResponse {
            answer: "Blue.".to_string(),
        })
        .unwrap();
        assert_eq!(body, serde_json::json!({"answer": "Blue."}));
    }
}
