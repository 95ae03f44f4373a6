//! Document text extraction.
//!
//! Each supported format is handed to a library (or the `tesseract`
//! executable for images); this module only dispatches on MIME type, reports
//! progress and joins the results.

mod ocr;
mod office;
mod pdf;

use std::path::{Path, PathBuf};

use futures_util::future::try_join_all;
use tracing::{debug, info};

use crate::error::ExtractError;
use crate::status::StatusMessage;

pub const MIME_PDF: &str = "application/pdf";
pub const MIME_DOCX: &str = "application/vnd.openxmlformats-officedocument.wordprocessingml.document";
pub const MIME_PPTX: &str =
    "application/vnd.openxmlformats-officedocument.presentationml.presentation";
pub const MIME_TEXT: &str = "text/plain";

/// Placed between the texts of consecutive files.
pub const FILE_SEPARATOR: &str = "\n\n---\n\n";

/// Callback receiving progress updates.
pub type Progress<'a> = &'a dyn Fn(StatusMessage);

/// An uploaded document: its name, declared MIME type and raw bytes.
#[derive(Debug, Clone)]
pub struct DocumentSource {
    pub name: String,
    pub mime: String,
    pub bytes: Vec<u8>,
}

impl DocumentSource {
    pub fn new(name: impl Into<String>, mime: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            mime: mime.into(),
            bytes,
        }
    }
}

/// MIME type for a file, judged by its extension.
pub fn mime_for_path(path: &Path) -> &'static str {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .unwrap_or_default();

    match extension.as_str() {
        "pdf" => MIME_PDF,
        "docx" => MIME_DOCX,
        "pptx" => MIME_PPTX,
        "txt" => MIME_TEXT,
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "bmp" => "image/bmp",
        "webp" => "image/webp",
        "tif" | "tiff" => "image/tiff",
        "doc" => "application/msword",
        "ppt" => "application/vnd.ms-powerpoint",
        _ => "application/octet-stream",
    }
}

/// Read files from disk into sources.
pub async fn read_sources(paths: &[PathBuf]) -> Result<Vec<DocumentSource>, ExtractError> {
    let mut sources = Vec::with_capacity(paths.len());
    for path in paths {
        let bytes = tokio::fs::read(path)
            .await
            .map_err(|source| ExtractError::Read {
                path: path.clone(),
                source,
            })?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        sources.push(DocumentSource::new(name, mime_for_path(path), bytes));
    }
    Ok(sources)
}

/// Extract every source concurrently and join the texts with
/// [`FILE_SEPARATOR`]. The first failure fails the whole extraction.
pub async fn extract_all(
    sources: &[DocumentSource],
    progress: Progress<'_>,
) -> Result<String, ExtractError> {
    progress(StatusMessage::ReadingFiles {
        count: sources.len(),
    });

    let texts = try_join_all(sources.iter().map(|source| extract_one(source, progress))).await?;

    let joined = texts.join(FILE_SEPARATOR);
    info!(
        "Extracted {} characters from {} files",
        joined.chars().count(),
        sources.len()
    );
    Ok(joined)
}

/// Extract the text of a single source.
pub async fn extract_one(
    source: &DocumentSource,
    progress: Progress<'_>,
) -> Result<String, ExtractError> {
    debug!("Extracting {} ({})", source.name, source.mime);

    match source.mime.as_str() {
        mime if mime.starts_with("image/") => ocr::recognize(source, progress).await,
        MIME_PDF => pdf::extract(source, progress).await,
        MIME_DOCX => {
            progress(StatusMessage::ReadingDocx);
            office::extract_docx(source)
        }
        MIME_PPTX => {
            progress(StatusMessage::ReadingPptx);
            office::extract_pptx(source)
        }
        MIME_TEXT => {
            progress(StatusMessage::ReadingText);
            String::from_utf8(source.bytes.clone()).map_err(|e| ExtractError::Text {
                name: source.name.clone(),
                detail: e.to_string(),
            })
        }
        other => Err(ExtractError::UnsupportedFormat {
            mime: other.to_string(),
        }),
    }
}
