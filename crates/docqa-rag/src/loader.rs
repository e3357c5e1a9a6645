//! Document text extraction.

use std::path::Path;

use crate::{Error, Result, TRACING_TARGET};

/// Extracts the text of a PDF document.
///
/// Extraction is delegated entirely to `pdf-extract`. An unreadable or
/// empty document is an extraction error, never retried.
pub fn extract_text(path: impl AsRef<Path>) -> Result<String> {
    let path = path.as_ref();

    let text = pdf_extract::extract_text(path)
        .map_err(|e| Error::extraction(format!("{}: {e}", path.display())))?;

    if text.trim().is_empty() {
        return Err(Error::extraction(format!(
            "{}: no text extracted",
            path.display()
        )));
    }

    tracing::debug!(
        target: TRACING_TARGET,
        path = %path.display(),
        chars = text.len(),
        "text extracted"
    );

    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_is_an_extraction_error() {
        let err = extract_text("/nonexistent/document.pdf").unwrap_err();
        assert!(matches!(err, Error::Extraction(_)));
    }

    #[test]
    fn garbage_bytes_are_an_extraction_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.pdf");
        std::fs::write(&path, b"definitely not a pdf").unwrap();

        let err = extract_text(&path).unwrap_err();
        assert!(matches!(err, Error::Extraction(_)));
    }
}
