//! Question answering handler.

use axum::Json;
use axum::extract::{DefaultBodyLimit, Multipart, State};
use axum::routing::post;
use axum::Router;
use docqa_opendal::ObjectStorage;
use docqa_rag::RagService;

use crate::handler::response::AskResponse;
use crate::handler::upload::TempUpload;
use crate::handler::{ErrorKind, Result};
use crate::service::ServiceState;

/// Tracing target for ask operations.
const TRACING_TARGET: &str = "docqa_server::handler::ask";

/// Maximum upload size: 25MB
const MAX_FILE_SIZE: usize = 25 * 1024 * 1024;

/// Returns the `/ask` routes.
pub fn routes() -> Router<ServiceState> {
    Router::new()
        .route("/ask", post(ask_question))
        // The multipart stream is capped manually below; the body limit
        // only needs to leave room for form overhead.
        .layer(DefaultBodyLimit::max(MAX_FILE_SIZE + 64 * 1024))
}

/// Answers a question about an uploaded PDF.
///
/// Form data:
/// - `question`: the question to answer
/// - `file`: the PDF document
#[tracing::instrument(skip_all)]
async fn ask_question(
    State(rag): State<RagService>,
    State(storage): State<ObjectStorage>,
    mut multipart: Multipart,
) -> Result<Json<AskResponse>> {
    let mut question: Option<String> = None;
    let mut upload: Option<TempUpload> = None;

    while let Some(field) = multipart.next_field().await.map_err(|err| {
        tracing::error!(target: TRACING_TARGET, error = %err, "failed to read multipart field");
        ErrorKind::BadRequest
            .with_message("Invalid multipart data")
            .with_context(err.to_string())
    })? {
        let name = field.name().map(|n| n.to_string());

        match name.as_deref() {
            Some("question") => {
                let text = field.text().await.map_err(|err| {
                    ErrorKind::BadRequest
                        .with_message("Invalid question field")
                        .with_context(err.to_string())
                })?;
                question = Some(text);
            }
            Some("file") => {
                let filename = field
                    .file_name()
                    .unwrap_or("document.pdf")
                    .to_string();

                tracing::debug!(
                    target: TRACING_TARGET,
                    filename = %filename,
                    "receiving file upload"
                );

                // Read file data with a size cap to bound memory use.
                let mut data = Vec::new();
                let mut stream = field;

                while let Some(chunk) = stream.chunk().await.map_err(|err| {
                    tracing::error!(
                        target: TRACING_TARGET,
                        error = %err,
                        filename = %filename,
                        "failed to read file chunk"
                    );
                    ErrorKind::BadRequest
                        .with_message("Failed to read file data")
                        .with_context(err.to_string())
                })? {
                    if data.len() + chunk.len() > MAX_FILE_SIZE {
                        return Err(ErrorKind::PayloadTooLarge.with_message(format!(
                            "File exceeds maximum size of {} MB",
                            MAX_FILE_SIZE / (1024 * 1024)
                        )));
                    }
                    data.extend_from_slice(&chunk);
                }

                upload = Some(TempUpload::write(&filename, &data)?);
            }
            _ => continue,
        }
    }

    let question = question
        .filter(|q| !q.trim().is_empty())
        .ok_or_else(|| ErrorKind::BadRequest.with_message("Missing question field"))?;
    let upload =
        upload.ok_or_else(|| ErrorKind::BadRequest.with_message("Missing file field"))?;

    let answer = rag
        .answer_document(upload.path(), &question)
        .await
        .map_err(|err| {
            tracing::error!(target: TRACING_TARGET, error = %err, "pipeline failed");
            ErrorKind::InternalServerError
                .with_message("Failed to answer question")
                .with_context(err.to_string())
        })?;

    // Best-effort mirror of the document to object storage; a failure here
    // never fails the answered request.
    if let Err(err) = storage.upload(upload.path(), upload.original_name()).await {
        tracing::warn!(
            target: TRACING_TARGET,
            error = %err,
            object = %upload.original_name(),
            "failed to mirror upload to object storage"
        );
    }

    Ok(Json(AskResponse { answer }))
}
