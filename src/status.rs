//! Structured status and notice messages.
//!
//! State only ever holds these values; turning them into text is the view's
//! job, so nothing markup-like is stored.

use std::path::PathBuf;

/// Progress of a long-running operation, shown in the loading overlay.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatusMessage {
    ReadingFiles { count: usize },
    RecognizingImage { name: String, percent: u8 },
    ReadingPdfPage { page: usize, total: usize },
    ReadingDocx,
    ReadingPptx,
    ReadingText,
    Generating { percent: u8 },
    ProcessingQuestions,
    Retrying { attempt: usize, max: usize },
}

impl StatusMessage {
    /// Traditional Chinese headline and English subline.
    pub fn lines(&self) -> (String, String) {
        match self {
            StatusMessage::ReadingFiles { count } => (
                format!("正在讀取與分析 {} 個文件...", count),
                format!("Reading and analyzing {} documents...", count),
            ),
            StatusMessage::RecognizingImage { name, percent } => (
                format!("辨識進度 {}: {}%", name, percent),
                format!("Recognition progress for {}: {}%", name, percent),
            ),
            StatusMessage::ReadingPdfPage { page, total } => (
                format!("正在讀取 PDF 檔案: {}/{} 頁...", page, total),
                format!("Reading PDF: page {}/{}...", page, total),
            ),
            StatusMessage::ReadingDocx => (
                "正在讀取 DOCX 檔案...".to_string(),
                "Reading DOCX file...".to_string(),
            ),
            StatusMessage::ReadingPptx => (
                "正在讀取 PPTX 檔案...".to_string(),
                "Reading PPTX file...".to_string(),
            ),
            StatusMessage::ReadingText => (
                "正在讀取 TXT 檔案...".to_string(),
                "Reading TXT file...".to_string(),
            ),
            StatusMessage::Generating { percent } => (
                format!("AI 正在為您出題... ({}%)", percent),
                format!("AI is generating your quiz... ({}%)", percent),
            ),
            StatusMessage::ProcessingQuestions => (
                "正在處理題目...".to_string(),
                "Processing questions...".to_string(),
            ),
            StatusMessage::Retrying { attempt, max } => (
                format!("AI 回應格式有誤，正在重試 ({}/{})...", attempt, max),
                format!("Invalid AI response, retrying ({}/{})...", attempt, max),
            ),
        }
    }

    /// Completion percentage, when the operation reports one.
    pub fn percent(&self) -> Option<u8> {
        match self {
            StatusMessage::RecognizingImage { percent, .. }
            | StatusMessage::Generating { percent } => Some(*percent),
            StatusMessage::ReadingPdfPage { page, total } if *total > 0 => {
                Some(((page * 100) / total).min(100) as u8)
            }
            StatusMessage::ProcessingQuestions => Some(100),
            _ => None,
        }
    }
}

/// A blocking, dismissable message for the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    /// Something went wrong; `detail` is the underlying error text.
    Error { title: NoticeTitle, detail: String },
    /// An export was written.
    Exported { path: PathBuf },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeTitle {
    InvalidInput,
    ExtractionFailed,
    GenerationFailed,
    ExportFailed,
    PreferencesFailed,
}

impl NoticeTitle {
    pub fn text(self) -> &'static str {
        match self {
            NoticeTitle::InvalidInput => "無法開始 / Cannot Start",
            NoticeTitle::ExtractionFailed => "檔案讀取失敗 / File Error",
            NoticeTitle::GenerationFailed => "發生錯誤 / An Error Occurred",
            NoticeTitle::ExportFailed => "匯出失敗 / Export Failed",
            NoticeTitle::PreferencesFailed => "設定儲存失敗 / Settings Not Saved",
        }
    }
}

impl Notice {
    pub fn title(&self) -> &'static str {
        match self {
            Notice::Error { title, .. } => title.text(),
            Notice::Exported { .. } => "匯出完成 / Export Complete",
        }
    }

    pub fn body(&self) -> String {
        match self {
            Notice::Error { detail, .. } => detail.clone(),
            Notice::Exported { path } => format!("已儲存 / Saved to {}", path.display()),
        }
    }
}
