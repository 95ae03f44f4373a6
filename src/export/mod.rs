//! Printable exports of a finished quiz.

mod document;
mod pdf;

use std::path::{Path, PathBuf};

use tracing::info;

use crate::error::ExportError;
use crate::models::Question;

pub use document::{ExportDocument, ExportEntry, Glyphs, force_wrap, option_letter};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportKind {
    /// Questions and options only.
    Questions,
    /// Questions with correct answers and explanations.
    Answers,
}

impl ExportKind {
    pub fn title(self) -> &'static str {
        match self {
            ExportKind::Questions => "AI Quiz Questions",
            ExportKind::Answers => "AI Quiz Answers & Analysis",
        }
    }

    pub fn file_name(self) -> &'static str {
        match self {
            ExportKind::Questions => "quiz-questions.pdf",
            ExportKind::Answers => "quiz-answers.pdf",
        }
    }
}

/// Write the export into `dir` and return the file's path.
pub fn export(
    kind: ExportKind,
    questions: &[Question],
    dir: &Path,
    font: Option<&Path>,
) -> Result<PathBuf, ExportError> {
    std::fs::create_dir_all(dir).map_err(|source| ExportError::Write {
        path: dir.to_path_buf(),
        source,
    })?;

    let path = dir.join(kind.file_name());
    let glyphs = if font.is_some() {
        Glyphs::Unicode
    } else {
        Glyphs::Latin
    };
    let document = ExportDocument::build(kind, questions, glyphs);
    pdf::render(&document, &path, font)?;

    info!(
        "Exported {} questions to {}",
        questions.len(),
        path.display()
    );
    Ok(path)
}
