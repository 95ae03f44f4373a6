//! Error types for every layer of the application.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Input rejected before any work is done.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("請至少選擇一個檔案 / Please select at least one file.")]
    NoFiles,
    #[error("您一次最多只能上傳 {max} 個檔案 / You can only upload a maximum of {max} files at a time (got {count}).")]
    TooManyFiles { count: usize, max: usize },
    #[error("請至少選擇一種題型 / Please request at least one question.")]
    NoQuestionsRequested,
    #[error("所有檔案的總內容過短 / The total content from all files is too short to generate high-quality questions ({chars} < {min} characters).")]
    ContentTooShort { chars: usize, min: usize },
}

/// Failure while turning a document into text.
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("不支援的檔案格式: {mime} / Unsupported file format: {mime}.")]
    UnsupportedFormat { mime: String },
    #[error("讀取 PDF 檔案失敗 / Failed to read PDF file ({name}): {detail}")]
    Pdf { name: String, detail: String },
    #[error("讀取 DOCX 檔案失敗 / Failed to read DOCX file ({name}): {detail}")]
    Docx { name: String, detail: String },
    #[error("讀取 PPTX 檔案失敗 / Failed to read PPTX file ({name}): {detail}")]
    Pptx { name: String, detail: String },
    #[error("讀取 TXT 檔案失敗 / Failed to read TXT file ({name}): {detail}")]
    Text { name: String, detail: String },
    #[error("圖片文字辨識失敗 / Failed to recognize text from image ({name}): {detail}")]
    Ocr { name: String, detail: String },
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Failure of one generation attempt.
#[derive(Debug, Error)]
pub enum GenerateError {
    #[error("request to model {model} failed: {source}")]
    Transport {
        model: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("model {model} returned HTTP {status}: {body}")]
    Api {
        model: String,
        status: u16,
        body: String,
    },
    #[error("model {model} returned no text")]
    EmptyResponse { model: String },
    #[error("response for {kind} is not valid JSON: {source}")]
    MalformedJson {
        kind: &'static str,
        #[source]
        source: serde_json::Error,
    },
    #[error("invalid {kind} question #{index}: {reason}")]
    InvalidQuestion {
        kind: &'static str,
        index: usize,
        reason: String,
    },
    #[error("AI returned an empty list of questions. The document might not have enough content.")]
    EmptyQuiz,
}

/// Failure while writing an export document.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("PDF rendering failed: {0}")]
    Render(String),
    #[error("內建字型無法顯示「{glyph}」，請以 --font 或 QUIZ_EXPORT_FONT 指定字型 / The built-in PDF font cannot draw '{glyph}'. Pass --font or set QUIZ_EXPORT_FONT to a TTF/OTF font.")]
    MissingGlyph { glyph: char },
    #[error("failed to load font {path}: {source}")]
    Font {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Failure while persisting user preferences.
#[derive(Debug, Error)]
pub enum PreferencesError {
    #[error("failed to write preferences to {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to serialize preferences: {0}")]
    Serialize(#[from] toml::ser::Error),
}

/// Top-level error type for quiz operations.
#[derive(Debug, Error)]
pub enum QuizError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Extraction(#[from] ExtractError),
    #[error("AI 持續回傳無效的資料格式 / AI model failed to generate a valid quiz after {attempts} attempts. Details: {source}")]
    Generation {
        attempts: usize,
        #[source]
        source: GenerateError,
    },
    #[error(transparent)]
    Export(#[from] ExportError),
    #[error(transparent)]
    Preferences(#[from] PreferencesError),
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

pub type Result<T, E = QuizError> = std::result::Result<T, E>;
