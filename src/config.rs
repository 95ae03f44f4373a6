use std::path::PathBuf;

pub const DEFAULT_API_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";

/// Program configuration.
#[derive(Clone, Debug)]
pub struct Config {
    /// Gemini API key.
    pub api_key: String,
    pub api_base_url: String,
    pub model_name: String,
    /// Directory the exported PDFs are written to.
    pub output_dir: PathBuf,
    /// Optional TTF/OTF font for exports. Built-in Helvetica otherwise.
    pub export_font: Option<PathBuf>,
    /// Where the theme preference is persisted.
    pub preferences_path: PathBuf,
    /// Log file; the terminal itself belongs to the UI.
    pub log_file: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        let preferences_path = std::env::var_os("HOME")
            .map(|home| PathBuf::from(home).join(".doc-quiz").join("preferences.toml"))
            .unwrap_or_else(|| PathBuf::from(".doc-quiz-preferences.toml"));

        Self {
            api_key: String::new(),
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            model_name: DEFAULT_MODEL.to_string(),
            output_dir: PathBuf::from("."),
            export_font: None,
            preferences_path,
            log_file: PathBuf::from("doc-quiz.log"),
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        let default = Self::default();
        Self {
            api_key: std::env::var("GEMINI_API_KEY")
                .or_else(|_| std::env::var("API_KEY"))
                .unwrap_or(default.api_key),
            api_base_url: std::env::var("GEMINI_API_BASE_URL").unwrap_or(default.api_base_url),
            model_name: std::env::var("GEMINI_MODEL").unwrap_or(default.model_name),
            output_dir: std::env::var_os("QUIZ_OUTPUT_DIR")
                .map(PathBuf::from)
                .unwrap_or(default.output_dir),
            export_font: std::env::var_os("QUIZ_EXPORT_FONT")
                .map(PathBuf::from)
                .or(default.export_font),
            preferences_path: std::env::var_os("QUIZ_PREFERENCES")
                .map(PathBuf::from)
                .unwrap_or(default.preferences_path),
            log_file: std::env::var_os("QUIZ_LOG_FILE")
                .map(PathBuf::from)
                .unwrap_or(default.log_file),
        }
    }
}
