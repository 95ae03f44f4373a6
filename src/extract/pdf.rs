use lopdf::Document;

use crate::error::ExtractError;
use crate::status::StatusMessage;

use super::{DocumentSource, Progress};

/// Page texts joined with single spaces, reporting each page as it is read.
pub(super) async fn extract(
    source: &DocumentSource,
    progress: Progress<'_>,
) -> Result<String, ExtractError> {
    let fail = |detail: String| ExtractError::Pdf {
        name: source.name.clone(),
        detail,
    };

    let document = Document::load_mem(&source.bytes).map_err(|e| fail(e.to_string()))?;
    let pages: Vec<u32> = document.get_pages().keys().copied().collect();
    let total = pages.len();

    let mut texts = Vec::with_capacity(total);
    for (index, page) in pages.iter().enumerate() {
        progress(StatusMessage::ReadingPdfPage {
            page: index + 1,
            total,
        });
        let text = document
            .extract_text(&[*page])
            .map_err(|e| fail(format!("page {}: {}", page, e)))?;
        texts.push(text.trim().to_string());

        // Let the UI redraw between pages of long documents.
        tokio::task::yield_now().await;
    }

    Ok(texts.join(" "))
}
