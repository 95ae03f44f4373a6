//! Image text recognition through the `tesseract` executable.

use std::process::Stdio;

use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::warn;

use crate::error::ExtractError;
use crate::status::StatusMessage;

use super::{DocumentSource, Progress};

const TESSERACT: &str = "tesseract";
const OCR_LANGUAGES: &str = "eng+chi_tra";

pub(super) async fn recognize(
    source: &DocumentSource,
    progress: Progress<'_>,
) -> Result<String, ExtractError> {
    let fail = |detail: String| ExtractError::Ocr {
        name: source.name.clone(),
        detail,
    };

    progress(StatusMessage::RecognizingImage {
        name: source.name.clone(),
        percent: 0,
    });

    let mut child = Command::new(TESSERACT)
        .args(["stdin", "stdout", "-l", OCR_LANGUAGES])
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true)
        .spawn()
        .map_err(|e| fail(format!("could not start {}: {}", TESSERACT, e)))?;

    if let Some(mut stdin) = child.stdin.take() {
        stdin
            .write_all(&source.bytes)
            .await
            .map_err(|e| fail(e.to_string()))?;
    }

    let output = child
        .wait_with_output()
        .await
        .map_err(|e| fail(e.to_string()))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        warn!("tesseract failed on {}: {}", source.name, stderr.trim());
        return Err(fail(stderr.trim().to_string()));
    }

    progress(StatusMessage::RecognizingImage {
        name: source.name.clone(),
        percent: 100,
    });

    Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
}
