use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

/// The three kinds of question the generator can produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionKind {
    MultipleChoice,
    TrueFalse,
    MultipleAnswer,
}

impl QuestionKind {
    pub const ALL: [QuestionKind; 3] = [
        QuestionKind::MultipleChoice,
        QuestionKind::TrueFalse,
        QuestionKind::MultipleAnswer,
    ];

    /// Identifier used as the JSON key in model responses.
    pub fn wire_id(self) -> &'static str {
        match self {
            QuestionKind::MultipleChoice => "multiple_choice",
            QuestionKind::TrueFalse => "true_false",
            QuestionKind::MultipleAnswer => "multiple_answer",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            QuestionKind::MultipleChoice => "Multiple Choice",
            QuestionKind::TrueFalse => "True/False",
            QuestionKind::MultipleAnswer => "Multiple Answer",
        }
    }

    pub fn native_name(self) -> &'static str {
        match self {
            QuestionKind::MultipleChoice => "單選題",
            QuestionKind::TrueFalse => "是非題",
            QuestionKind::MultipleAnswer => "多選題",
        }
    }
}

impl fmt::Display for QuestionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// A generated quiz question.
///
/// Options are kept in canonical order, the order the model produced them in.
/// Grading and exports work from this order; the order shown on screen is a
/// separate permutation held by the session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Question {
    SingleChoice {
        prompt: String,
        options: Vec<String>,
        correct_option: String,
        explanation: String,
    },
    TrueFalse {
        statement: String,
        correct_value: bool,
        explanation: String,
    },
    MultiAnswer {
        prompt: String,
        options: Vec<String>,
        correct_options: BTreeSet<String>,
        explanation: String,
    },
}

impl Question {
    pub fn kind(&self) -> QuestionKind {
        match self {
            Question::SingleChoice { .. } => QuestionKind::MultipleChoice,
            Question::TrueFalse { .. } => QuestionKind::TrueFalse,
            Question::MultiAnswer { .. } => QuestionKind::MultipleAnswer,
        }
    }

    /// The question text: the prompt, or the statement for true/false.
    pub fn text(&self) -> &str {
        match self {
            Question::SingleChoice { prompt, .. } | Question::MultiAnswer { prompt, .. } => prompt,
            Question::TrueFalse { statement, .. } => statement,
        }
    }

    /// Options in canonical order. Empty for true/false questions.
    pub fn options(&self) -> &[String] {
        match self {
            Question::SingleChoice { options, .. } | Question::MultiAnswer { options, .. } => {
                options
            }
            Question::TrueFalse { .. } => &[],
        }
    }

    pub fn explanation(&self) -> &str {
        match self {
            Question::SingleChoice { explanation, .. }
            | Question::TrueFalse { explanation, .. }
            | Question::MultiAnswer { explanation, .. } => explanation,
        }
    }

    /// The canonical answer expressed as a user answer, for display.
    pub fn correct_answer(&self) -> UserAnswer {
        match self {
            Question::SingleChoice { correct_option, .. } => {
                UserAnswer::Choice(correct_option.clone())
            }
            Question::TrueFalse { correct_value, .. } => UserAnswer::Verdict(*correct_value),
            Question::MultiAnswer {
                correct_options, ..
            } => UserAnswer::Selection(correct_options.clone()),
        }
    }

    /// Checks the invariants every question must satisfy before it can be
    /// put in front of a user.
    pub fn validate(&self) -> Result<(), String> {
        if self.text().trim().is_empty() {
            return Err(format!("{} question has an empty prompt", self.kind()));
        }

        match self {
            Question::SingleChoice {
                options,
                correct_option,
                ..
            } => {
                validate_options(options)?;
                if !options.contains(correct_option) {
                    return Err(format!(
                        "answer '{}' is not one of the options",
                        correct_option
                    ));
                }
            }
            Question::TrueFalse { .. } => {}
            Question::MultiAnswer {
                options,
                correct_options,
                ..
            } => {
                validate_options(options)?;
                if correct_options.is_empty() {
                    return Err("multiple answer question has no correct answers".to_string());
                }
                if let Some(stray) = correct_options.iter().find(|a| !options.contains(a)) {
                    return Err(format!("answer '{}' is not one of the options", stray));
                }
            }
        }

        Ok(())
    }
}

fn validate_options(options: &[String]) -> Result<(), String> {
    if options.len() < 2 {
        return Err(format!("expected at least 2 options, got {}", options.len()));
    }

    let mut seen = BTreeSet::new();
    for option in options {
        if !seen.insert(option.as_str()) {
            return Err(format!("duplicate option '{}'", option));
        }
    }

    Ok(())
}

/// What the user has entered for one question.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum UserAnswer {
    #[default]
    Unanswered,
    Choice(String),
    Verdict(bool),
    Selection(BTreeSet<String>),
}

impl UserAnswer {
    /// An unanswered slot or an empty multi-answer selection.
    pub fn is_empty(&self) -> bool {
        match self {
            UserAnswer::Unanswered => true,
            UserAnswer::Selection(set) => set.is_empty(),
            UserAnswer::Choice(_) | UserAnswer::Verdict(_) => false,
        }
    }

    /// Whether this answer may live in a slot for `kind`.
    pub fn fits(&self, kind: QuestionKind) -> bool {
        matches!(
            (self, kind),
            (UserAnswer::Unanswered, _)
                | (UserAnswer::Choice(_), QuestionKind::MultipleChoice)
                | (UserAnswer::Verdict(_), QuestionKind::TrueFalse)
                | (UserAnswer::Selection(_), QuestionKind::MultipleAnswer)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn single(options: &[&str], answer: &str) -> Question {
        Question::SingleChoice {
            prompt: "Pick one".to_string(),
            options: options.iter().map(|s| s.to_string()).collect(),
            correct_option: answer.to_string(),
            explanation: String::new(),
        }
    }

    #[test]
    fn test_validate_single_choice() {
        assert!(single(&["a", "b", "c"], "b").validate().is_ok());
        assert!(single(&["a", "b"], "z").validate().is_err());
        assert!(single(&["a", "a"], "a").validate().is_err());
        assert!(single(&["a"], "a").validate().is_err());
    }

    #[test]
    fn test_validate_rejects_empty_correct_set() {
        let question = Question::MultiAnswer {
            prompt: "Pick some".to_string(),
            options: vec!["x".to_string(), "y".to_string()],
            correct_options: BTreeSet::new(),
            explanation: String::new(),
        };
        assert!(question.validate().is_err());
    }

    #[test]
    fn test_empty_answers() {
        assert!(UserAnswer::Unanswered.is_empty());
        assert!(UserAnswer::Selection(BTreeSet::new()).is_empty());
        assert!(!UserAnswer::Verdict(false).is_empty());
        assert!(!UserAnswer::Choice(String::new()).is_empty());
    }

    #[test]
    fn test_answer_fits_kind() {
        assert!(UserAnswer::Unanswered.fits(QuestionKind::TrueFalse));
        assert!(UserAnswer::Verdict(true).fits(QuestionKind::TrueFalse));
        assert!(!UserAnswer::Verdict(true).fits(QuestionKind::MultipleAnswer));
        assert!(!UserAnswer::Choice("a".into()).fits(QuestionKind::MultipleAnswer));
    }
}
