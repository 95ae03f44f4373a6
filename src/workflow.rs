//! From uploaded files to a list of questions.
//!
//! Order of work:
//! 1. validate the inputs (file count, requested questions)
//! 2. extract text from every file
//! 3. reject content that is too short
//! 4. generate, retrying the whole attempt on failure

use std::path::PathBuf;

use tracing::{info, warn};

use crate::error::{QuizError, ValidationError};
use crate::extract::{self, Progress};
use crate::generate::{ModelClient, QuizGenerator, QuizRequest};
use crate::models::Question;
use crate::status::StatusMessage;

pub const MAX_FILES: usize = 3;
pub const MIN_CONTENT_CHARS: usize = 100;
pub const MAX_ATTEMPTS: usize = 3;

pub fn validate_inputs(files: &[PathBuf], request: &QuizRequest) -> Result<(), ValidationError> {
    if files.is_empty() {
        return Err(ValidationError::NoFiles);
    }
    if files.len() > MAX_FILES {
        return Err(ValidationError::TooManyFiles {
            count: files.len(),
            max: MAX_FILES,
        });
    }
    if request.total() == 0 {
        return Err(ValidationError::NoQuestionsRequested);
    }
    Ok(())
}

/// Extracted text must carry at least [`MIN_CONTENT_CHARS`] characters.
pub fn check_content(text: &str) -> Result<(), ValidationError> {
    let chars = text.trim().chars().count();
    if chars < MIN_CONTENT_CHARS {
        return Err(ValidationError::ContentTooShort {
            chars,
            min: MIN_CONTENT_CHARS,
        });
    }
    Ok(())
}

/// Generate with up to `max_attempts` end-to-end attempts.
///
/// Every attempt starts from scratch with the same input; nothing from a
/// failed attempt is kept. After the last failure the error carries the last
/// attempt's cause.
pub async fn generate_with_retry<C: ModelClient>(
    generator: &QuizGenerator<C>,
    text: &str,
    request: &QuizRequest,
    max_attempts: usize,
    progress: Progress<'_>,
) -> Result<Vec<Question>, QuizError> {
    let mut on_percent = |percent: u8| {
        if percent < 100 {
            progress(StatusMessage::Generating { percent });
        } else {
            progress(StatusMessage::ProcessingQuestions);
        }
    };

    let mut attempt = 0;
    loop {
        attempt += 1;
        match generator.generate(text, request, &mut on_percent).await {
            Ok(questions) => {
                info!(
                    "Generated {} questions on attempt {}/{}",
                    questions.len(),
                    attempt,
                    max_attempts
                );
                return Ok(questions);
            }
            Err(e) if attempt < max_attempts => {
                warn!("Attempt {}/{} failed: {}", attempt, max_attempts, e);
                progress(StatusMessage::Retrying {
                    attempt,
                    max: max_attempts,
                });
            }
            Err(e) => {
                warn!("Giving up after {} attempts: {}", attempt, e);
                return Err(QuizError::Generation {
                    attempts: attempt,
                    source: e,
                });
            }
        }
    }
}

/// Run the whole pipeline for a set of files.
pub async fn build_quiz<C: ModelClient>(
    files: &[PathBuf],
    request: &QuizRequest,
    generator: &QuizGenerator<C>,
    progress: Progress<'_>,
) -> Result<Vec<Question>, QuizError> {
    validate_inputs(files, request)?;

    let sources = extract::read_sources(files).await?;
    let text = extract::extract_all(&sources, progress).await?;
    check_content(&text)?;

    generate_with_retry(generator, &text, request, MAX_ATTEMPTS, progress).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::QuestionKind;

    #[test]
    fn test_validate_inputs() {
        let request = QuizRequest::default();
        let files: Vec<PathBuf> = (0..4).map(|i| PathBuf::from(format!("{}.txt", i))).collect();

        assert_eq!(
            validate_inputs(&[], &request),
            Err(ValidationError::NoFiles)
        );
        assert_eq!(
            validate_inputs(&files, &request),
            Err(ValidationError::TooManyFiles { count: 4, max: 3 })
        );
        assert!(validate_inputs(&files[..3], &request).is_ok());

        let mut empty = QuizRequest::default();
        for kind in QuestionKind::ALL {
            empty.set_count(kind, 0);
        }
        assert_eq!(
            validate_inputs(&files[..1], &empty),
            Err(ValidationError::NoQuestionsRequested)
        );
    }

    #[test]
    fn test_check_content_threshold() {
        assert!(check_content(&"a".repeat(MIN_CONTENT_CHARS)).is_ok());
        assert_eq!(
            check_content(&format!("   {}   ", "a".repeat(MIN_CONTENT_CHARS - 1))),
            Err(ValidationError::ContentTooShort {
                chars: MIN_CONTENT_CHARS - 1,
                min: MIN_CONTENT_CHARS
            })
        );
    }
}
