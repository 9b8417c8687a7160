//! Document text extraction
//!
//! Resumes arrive as PDF or plain text. PDFs are detected by their `%PDF-`
//! magic bytes rather than the file extension, so a misnamed upload still
//! extracts correctly.

use pdf_extract::extract_text_from_mem;
use std::panic;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("unable to read '{path}': {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("unable to extract text from the PDF document: {0}")]
    Pdf(String),

    #[error("unsupported document format; provide a PDF or plain text file")]
    Unsupported,

    #[error("document contains no extractable text")]
    Empty,
}

/// Turns document bytes into plain text
pub trait DocumentExtractor: Send + Sync {
    fn extract(&self, document: &[u8]) -> Result<String, ExtractionError>;
}

/// PDF extraction through `pdf-extract`
#[derive(Debug, Default, Clone, Copy)]
pub struct PdfExtractor;

impl DocumentExtractor for PdfExtractor {
    fn extract(&self, document: &[u8]) -> Result<String, ExtractionError> {
        // pdf-extract panics on some malformed inputs
        let extracted = panic::catch_unwind(|| extract_text_from_mem(document))
            .map_err(|_| ExtractionError::Pdf("document structure is corrupt".to_string()))?
            .map_err(|e| ExtractionError::Pdf(e.to_string()))?;
        non_empty(normalize_document_text(&extracted))
    }
}

/// UTF-8 text passthrough
#[derive(Debug, Default, Clone, Copy)]
pub struct PlainTextExtractor;

impl DocumentExtractor for PlainTextExtractor {
    fn extract(&self, document: &[u8]) -> Result<String, ExtractionError> {
        let text = std::str::from_utf8(document).map_err(|_| ExtractionError::Unsupported)?;
        non_empty(normalize_document_text(text))
    }
}

/// Chooses PDF or plain text extraction from the content itself
#[derive(Debug, Default, Clone, Copy)]
pub struct AutoExtractor;

impl DocumentExtractor for AutoExtractor {
    fn extract(&self, document: &[u8]) -> Result<String, ExtractionError> {
        if looks_like_pdf(document) {
            debug!(bytes = document.len(), "Extracting PDF document");
            PdfExtractor.extract(document)
        } else {
            debug!(bytes = document.len(), "Extracting plain text document");
            PlainTextExtractor.extract(document)
        }
    }
}

/// Read a file and extract its text with `extractor`
pub fn extract_file(
    extractor: &dyn DocumentExtractor,
    path: &Path,
) -> Result<String, ExtractionError> {
    let bytes = std::fs::read(path).map_err(|source| ExtractionError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    extractor.extract(&bytes)
}

/// Treat `input` as a file path when one exists, otherwise as the text itself
///
/// A single token with a file extension is always read as a path, so a
/// mistyped file name fails with [`ExtractionError::Read`].
pub fn text_or_file(extractor: &dyn DocumentExtractor, input: &str) -> Result<String, ExtractionError> {
    let trimmed = input.trim();
    let path = Path::new(trimmed);
    if !trimmed.is_empty() && (path.is_file() || looks_like_path(trimmed)) {
        extract_file(extractor, path)
    } else {
        Ok(input.to_string())
    }
}

fn looks_like_path(input: &str) -> bool {
    !input.chars().any(char::is_whitespace)
        && Path::new(input)
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| !ext.is_empty() && ext.chars().all(|c| c.is_ascii_alphanumeric()))
}

pub fn looks_like_pdf(document: &[u8]) -> bool {
    document.starts_with(b"%PDF-")
}

/// Strip NULs and a leading BOM, unify line endings, trim line ends
fn normalize_document_text(text: &str) -> String {
    let normalized = text
        .replace('\u{0000}', "")
        .trim_start_matches('\u{FEFF}')
        .replace("\r\n", "\n")
        .replace('\r', "\n");

    let lines: Vec<&str> = normalized.lines().map(str::trim_end).collect();
    lines.join("\n").trim().to_string()
}

fn non_empty(text: String) -> Result<String, ExtractionError> {
    if text.is_empty() {
        Err(ExtractionError::Empty)
    } else {
        Ok(text)
    }
}
