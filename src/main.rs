use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use doc_quiz::generate::SUPPORTED_LANGUAGES;
use doc_quiz::{Config, QuestionKind, Quiz, QuizRequest, logging};
use tracing::info;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Documents to build the quiz from (PDF, DOCX, PPTX, TXT or images)
    files: Vec<PathBuf>,

    /// Initial number of multiple-choice questions
    #[arg(long, default_value_t = 5)]
    multiple_choice: u32,

    /// Initial number of true/false questions
    #[arg(long, default_value_t = 5)]
    true_false: u32,

    /// Initial number of multiple-answer questions
    #[arg(long, default_value_t = 0)]
    multiple_answer: u32,

    /// Language the quiz is written in
    #[arg(long, default_value = "繁體中文", value_parser = parse_language)]
    language: String,

    /// Gemini model name
    #[arg(long, env = "GEMINI_MODEL")]
    model: Option<String>,

    /// Gemini API key
    #[arg(long, env = "GEMINI_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// Directory for exported PDFs
    #[arg(long)]
    output_dir: Option<PathBuf>,

    /// TTF/OTF font used in exported PDFs
    #[arg(long)]
    font: Option<PathBuf>,

    /// Log file
    #[arg(long)]
    log_file: Option<PathBuf>,
}

fn parse_language(value: &str) -> Result<String, String> {
    SUPPORTED_LANGUAGES
        .iter()
        .find(|(name, english)| *name == value || english.eq_ignore_ascii_case(value))
        .map(|(name, _)| name.to_string())
        .ok_or_else(|| {
            let names: Vec<&str> = SUPPORTED_LANGUAGES.iter().map(|(name, _)| *name).collect();
            format!("expected one of: {}", names.join(", "))
        })
}

impl Args {
    fn config(&self) -> Config {
        let mut config = Config::from_env();
        if let Some(model) = &self.model {
            config.model_name = model.clone();
        }
        if let Some(api_key) = &self.api_key {
            config.api_key = api_key.clone();
        }
        if let Some(dir) = &self.output_dir {
            config.output_dir = dir.clone();
        }
        if let Some(font) = &self.font {
            config.export_font = Some(font.clone());
        }
        if let Some(log_file) = &self.log_file {
            config.log_file = log_file.clone();
        }
        config
    }

    fn request(&self) -> QuizRequest {
        let mut request = QuizRequest {
            language: self.language.clone(),
            ..QuizRequest::default()
        };
        request.set_count(QuestionKind::MultipleChoice, self.multiple_choice);
        request.set_count(QuestionKind::TrueFalse, self.true_false);
        request.set_count(QuestionKind::MultipleAnswer, self.multiple_answer);
        request
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let config = args.config();

    logging::init(&config.log_file)
        .with_context(|| format!("failed to open log file {}", config.log_file.display()))?;
    info!(
        "Starting with {} files, model {}",
        args.files.len(),
        config.model_name
    );

    if config.api_key.is_empty() {
        anyhow::bail!("no API key: set GEMINI_API_KEY or pass --api-key");
    }

    let quiz = Quiz::from_config(config, args.files.clone(), args.request());
    quiz.run().await.context("quiz terminated with an error")?;

    Ok(())
}
