//! PDF text extraction.
//!
//! Thin wrapper over `pdf-extract`. A PDF from which no text can be
//! pulled is the one hard failure in the upload path, so it maps to an
//! error here rather than an empty string.

use crate::error::{Result, SotagenError};
use std::path::Path;
use tracing::{debug, warn};

/// Extract text from in-memory PDF bytes.
pub fn extract_text(bytes: &[u8]) -> Result<String> {
    let text = pdf_extract::extract_text_from_mem(bytes).map_err(|e| {
        warn!(error = %e, "PDF text extraction failed");
        SotagenError::Pdf(format!("Failed to extract text: {}", e))
    })?;

    if text.trim().is_empty() {
        return Err(SotagenError::Pdf(
            "PDF contains no extractable text".to_string(),
        ));
    }

    debug!(chars = text.len(), "Extracted PDF text");
    Ok(text)
}

/// Extract text from a PDF file on disk.
pub fn extract_text_from_file(path: &Path) -> Result<String> {
    let bytes = std::fs::read(path)?;
    extract_text(&bytes)
}
