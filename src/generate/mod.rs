//! Quiz generation through a hosted generative model.
//!
//! One request is issued per requested question kind. The requests run
//! concurrently and are all awaited before the attempt is judged: a single
//! failed or malformed response fails the whole attempt.

mod gemini;
mod prompt;

use std::collections::{BTreeMap, BTreeSet};

use futures_util::stream::{FuturesUnordered, StreamExt};
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, info};

use crate::error::GenerateError;
use crate::models::{Question, QuestionKind};

pub use gemini::GeminiClient;
pub use prompt::{MAX_PROMPT_CHARS, build_prompt, response_schema};

/// Upper bound for the count of a single question kind.
pub const MAX_COUNT_PER_KIND: u32 = 20;

/// Languages the quiz can be written in.
pub const SUPPORTED_LANGUAGES: [(&str, &str); 6] = [
    ("繁體中文", "Traditional Chinese"),
    ("English", "English"),
    ("日本語", "Japanese"),
    ("Tiếng Việt", "Vietnamese"),
    ("Bahasa Indonesia", "Indonesian"),
    ("ภาษาไทย", "Thai"),
];

/// Transport to a generative model that answers a prompt with JSON text
/// following `schema`.
#[allow(async_fn_in_trait)]
pub trait ModelClient {
    fn model_name(&self) -> &str;

    async fn complete(&self, prompt: &str, schema: &Value) -> Result<String, GenerateError>;
}

/// What to generate: a count per question kind and the output language.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizRequest {
    pub counts: BTreeMap<QuestionKind, u32>,
    pub language: String,
}

impl Default for QuizRequest {
    fn default() -> Self {
        Self {
            counts: BTreeMap::from([
                (QuestionKind::MultipleChoice, 5),
                (QuestionKind::TrueFalse, 5),
                (QuestionKind::MultipleAnswer, 0),
            ]),
            language: SUPPORTED_LANGUAGES[0].0.to_string(),
        }
    }
}

impl QuizRequest {
    pub fn count(&self, kind: QuestionKind) -> u32 {
        self.counts.get(&kind).copied().unwrap_or(0)
    }

    /// Set a count, clamped to `0..=MAX_COUNT_PER_KIND`.
    pub fn set_count(&mut self, kind: QuestionKind, count: u32) {
        self.counts.insert(kind, count.min(MAX_COUNT_PER_KIND));
    }

    pub fn total(&self) -> u32 {
        self.counts.values().sum()
    }

    /// Kinds with a positive count, in kind order.
    pub fn requested(&self) -> impl Iterator<Item = (QuestionKind, u32)> + '_ {
        self.counts
            .iter()
            .filter(|(_, count)| **count > 0)
            .map(|(kind, count)| (*kind, *count))
    }
}

/// Builds quizzes from document text with a [`ModelClient`].
pub struct QuizGenerator<C> {
    client: C,
}

impl<C: ModelClient> QuizGenerator<C> {
    pub fn new(client: C) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    /// Run one generation attempt.
    ///
    /// `on_progress` receives the percentage of per-kind calls finished.
    /// Returns an empty list only when nothing was requested.
    pub async fn generate(
        &self,
        text: &str,
        request: &QuizRequest,
        on_progress: &mut dyn FnMut(u8),
    ) -> Result<Vec<Question>, GenerateError> {
        let calls: Vec<(QuestionKind, String, Value)> = request
            .requested()
            .map(|(kind, count)| {
                (
                    kind,
                    build_prompt(kind, count, &request.language, text),
                    response_schema(kind),
                )
            })
            .collect();

        on_progress(0);
        if calls.is_empty() {
            on_progress(100);
            return Ok(Vec::new());
        }

        info!(
            "Requesting {} question kinds from {}",
            calls.len(),
            self.client.model_name()
        );

        let client = &self.client;
        let mut pending: FuturesUnordered<_> = calls
            .iter()
            .enumerate()
            .map(|(index, (_, prompt, schema))| async move {
                (index, client.complete(prompt, schema).await)
            })
            .collect();

        let total = calls.len();
        let mut finished = Vec::with_capacity(total);
        while let Some((index, response)) = pending.next().await {
            finished.push((index, response));
            on_progress(rounded_percent(finished.len(), total));
        }
        finished.sort_by_key(|(index, _)| *index);

        let mut questions = Vec::new();
        for ((kind, _, _), (_, response)) in calls.iter().zip(finished) {
            let parsed = parse_response(*kind, &response?)?;
            debug!("Parsed {} {} questions", parsed.len(), kind.wire_id());
            questions.extend(parsed);
        }

        if questions.is_empty() {
            return Err(GenerateError::EmptyQuiz);
        }

        Ok(questions)
    }
}

/// `done` out of `total` as a percentage rounded to nearest.
fn rounded_percent(done: usize, total: usize) -> u8 {
    ((done * 100 + total / 2) / total).min(100) as u8
}

/// Remove markdown code fences the model sometimes wraps JSON in.
pub fn strip_code_fences(raw: &str) -> String {
    raw.replace("```json", "").replace("```", "").trim().to_string()
}

#[derive(Debug, Deserialize)]
struct RawMultipleChoice {
    question: String,
    options: Vec<String>,
    answer: String,
    explanation: String,
}

#[derive(Debug, Deserialize)]
struct RawTrueFalse {
    statement: String,
    answer: bool,
    explanation: String,
}

#[derive(Debug, Deserialize)]
struct RawMultipleAnswer {
    question: String,
    options: Vec<String>,
    answers: Vec<String>,
    explanation: String,
}

/// Parse and validate the questions of one kind from a model response.
///
/// A response object without the kind's key contributes no questions.
pub fn parse_response(kind: QuestionKind, raw: &str) -> Result<Vec<Question>, GenerateError> {
    let malformed = |source: serde_json::Error| GenerateError::MalformedJson {
        kind: kind.wire_id(),
        source,
    };

    let value: Value = serde_json::from_str(&strip_code_fences(raw)).map_err(malformed)?;
    let Some(items) = value.get(kind.wire_id()).cloned() else {
        return Ok(Vec::new());
    };

    let questions: Vec<Question> = match kind {
        QuestionKind::MultipleChoice => serde_json::from_value::<Vec<RawMultipleChoice>>(items)
            .map_err(malformed)?
            .into_iter()
            .map(|q| Question::SingleChoice {
                prompt: q.question,
                options: q.options,
                correct_option: q.answer,
                explanation: q.explanation,
            })
            .collect(),
        QuestionKind::TrueFalse => serde_json::from_value::<Vec<RawTrueFalse>>(items)
            .map_err(malformed)?
            .into_iter()
            .map(|q| Question::TrueFalse {
                statement: q.statement,
                correct_value: q.answer,
                explanation: q.explanation,
            })
            .collect(),
        QuestionKind::MultipleAnswer => {
            let records =
                serde_json::from_value::<Vec<RawMultipleAnswer>>(items).map_err(malformed)?;
            let mut questions = Vec::with_capacity(records.len());
            for (index, q) in records.into_iter().enumerate() {
                let answer_count = q.answers.len();
                let correct_options: BTreeSet<String> = q.answers.into_iter().collect();
                if correct_options.len() != answer_count {
                    return Err(GenerateError::InvalidQuestion {
                        kind: kind.wire_id(),
                        index,
                        reason: "duplicate correct answers".to_string(),
                    });
                }
                questions.push(Question::MultiAnswer {
                    prompt: q.question,
                    options: q.options,
                    correct_options,
                    explanation: q.explanation,
                });
            }
            questions
        }
    };

    for (index, question) in questions.iter().enumerate() {
        question
            .validate()
            .map_err(|reason| GenerateError::InvalidQuestion {
                kind: kind.wire_id(),
                index,
                reason,
            })?;
    }

    Ok(questions)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_progress_rounds_to_nearest() {
        assert_eq!(rounded_percent(1, 3), 33);
        assert_eq!(rounded_percent(2, 3), 67);
        assert_eq!(rounded_percent(1, 2), 50);
        assert_eq!(rounded_percent(3, 3), 100);
    }

    #[test]
    fn test_strip_code_fences() {
        assert_eq!(strip_code_fences("```json\n{\"a\":1}\n```"), "{\"a\":1}");
        assert_eq!(strip_code_fences("  {\"a\":1} "), "{\"a\":1}");
    }

    #[test]
    fn test_parse_fenced_multiple_choice() {
        let raw = r#"```json
        {"multiple_choice": [
            {"question": "2+2?", "options": ["3", "4", "5"], "answer": "4", "explanation": "Arithmetic."}
        ]}
        ```"#;

        let questions = parse_response(QuestionKind::MultipleChoice, raw).unwrap();

        assert_eq!(
            questions,
            vec![Question::SingleChoice {
                prompt: "2+2?".to_string(),
                options: vec!["3".into(), "4".into(), "5".into()],
                correct_option: "4".to_string(),
                explanation: "Arithmetic.".to_string(),
            }]
        );
    }

    #[test]
    fn test_parse_rejects_missing_field() {
        let raw = r#"{"true_false": [{"statement": "Sky is blue", "explanation": "."}]}"#;
        assert!(matches!(
            parse_response(QuestionKind::TrueFalse, raw),
            Err(GenerateError::MalformedJson { .. })
        ));
    }

    #[test]
    fn test_parse_rejects_answer_outside_options() {
        let raw = r#"{"multiple_answer": [
            {"question": "Pick", "options": ["a", "b"], "answers": ["a", "c"], "explanation": "."}
        ]}"#;
        assert!(matches!(
            parse_response(QuestionKind::MultipleAnswer, raw),
            Err(GenerateError::InvalidQuestion { index: 0, .. })
        ));
    }

    #[test]
    fn test_parse_rejects_empty_correct_answers() {
        let raw = r#"{"multiple_answer": [
            {"question": "Pick", "options": ["a", "b"], "answers": [], "explanation": "."}
        ]}"#;
        assert!(parse_response(QuestionKind::MultipleAnswer, raw).is_err());
    }

    #[test]
    fn test_parse_missing_key_is_empty() {
        assert!(parse_response(QuestionKind::TrueFalse, "{}").unwrap().is_empty());
    }

    #[test]
    fn test_parse_not_json() {
        assert!(matches!(
            parse_response(QuestionKind::TrueFalse, "Sorry, I cannot help."),
            Err(GenerateError::MalformedJson { .. })
        ));
    }

    #[test]
    fn test_request_counts() {
        let mut request = QuizRequest::default();
        assert_eq!(request.total(), 10);

        request.set_count(QuestionKind::MultipleAnswer, 99);
        assert_eq!(request.count(QuestionKind::MultipleAnswer), MAX_COUNT_PER_KIND);

        request.set_count(QuestionKind::TrueFalse, 0);
        let kinds: Vec<QuestionKind> = request.requested().map(|(k, _)| k).collect();
        assert_eq!(
            kinds,
            vec![QuestionKind::MultipleChoice, QuestionKind::MultipleAnswer]
        );
    }
}
