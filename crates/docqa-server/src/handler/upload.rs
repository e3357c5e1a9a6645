//! Scoped temporary storage for uploaded documents.

use std::io::Write;
use std::path::Path;

use tempfile::NamedTempFile;

use crate::handler::{ErrorKind, Result};

/// Tracing target for upload handling.
const TRACING_TARGET: &str = "docqa_server::handler::upload";

/// An uploaded document parked in a temporary file.
///
/// The file is deleted when the guard drops, which covers every exit path
/// of a request: success, pipeline failure, and unwinding. Nothing else in
/// the request may take ownership of the path.
#[derive(Debug)]
pub struct TempUpload {
    file: NamedTempFile,
    original_name: String,
}

impl TempUpload {
    /// Writes uploaded bytes to a fresh `temp_`-prefixed file.
    pub fn write(original_name: &str, data: &[u8]) -> Result<Self> {
        let mut file = tempfile::Builder::new()
            .prefix("temp_")
            .suffix(".pdf")
            .tempfile()
            .map_err(|err| {
                ErrorKind::InternalServerError
                    .with_message("Failed to store upload")
                    .with_context(err.to_string())
            })?;

        file.write_all(data).map_err(|err| {
            ErrorKind::InternalServerError
                .with_message("Failed to store upload")
                .with_context(err.to_string())
        })?;

        tracing::debug!(
            target: TRACING_TARGET,
            original_name = %original_name,
            path = %file.path().display(),
            size = data.len(),
            "upload parked in temporary file"
        );

        Ok(Self {
            file,
            original_name: original_name.to_string(),
        })
    }

    /// Returns the path of the temporary file.
    pub fn path(&self) -> &Path {
        self.file.path()
    }

    /// Returns the filename the client sent.
    pub fn original_name(&self) -> &str {
        &self.original_name
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_exists_while_guard_lives() {
        let upload = TempUpload::write("report.pdf", b"%PDF-1.4 stub").unwrap();
        assert!(upload.path().exists());
        assert_eq!(upload.original_name(), "report.pdf");

        let name = upload
            .path()
            .file_name()
            .unwrap()
            .to_string_lossy()
            .into_owned();
        assert!(name.starts_with("temp_"));
    }

    #[test]
    fn file_is_removed_on_drop() {
        let upload = TempUpload::write("report.pdf", b"data").unwrap();
        let path = upload.path().to_owned();
        assert!(path.exists());

        drop(upload);
        assert!(!path.exists());
    }

    #[test]
    fn file_is_removed_when_a_pipeline_stage_fails() {
        // Simulates a request that fails mid-pipeline: the guard goes out
        // of scope with the error and the file must be gone either way.
        fn failing_stage(upload: TempUpload) -> std::result::Result<(), std::path::PathBuf> {
            Err(upload.path().to_owned())
        }

        let upload = TempUpload::write("report.pdf", b"data").unwrap();
        let path = failing_stage(upload).unwrap_err();
        assert!(!path.exists());
    }
}
