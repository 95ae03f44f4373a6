//! Grading of a finished session.
//!
//! Correctness is always decided against the canonical answer values, never
//! against option positions, so the shuffled presentation order cannot
//! affect the result.

use crate::models::{Question, UserAnswer};

use super::session::Session;

/// Outcome for a single question.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuestionOutcome {
    pub index: usize,
    pub answered: bool,
    pub correct: bool,
}

/// Graded view of a session. Computed on demand, never stored back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GradedResult {
    pub outcomes: Vec<QuestionOutcome>,
    pub correct_count: usize,
    pub total: usize,
    /// Percentage in `0..=100`.
    pub score: u32,
}

/// Whether `answer` is correct for `question`.
///
/// Empty answers are never correct.
pub fn is_correct(question: &Question, answer: &UserAnswer) -> bool {
    match (question, answer) {
        (Question::SingleChoice { correct_option, .. }, UserAnswer::Choice(chosen)) => {
            chosen == correct_option
        }
        (Question::TrueFalse { correct_value, .. }, UserAnswer::Verdict(value)) => {
            value == correct_value
        }
        (
            Question::MultiAnswer {
                correct_options, ..
            },
            UserAnswer::Selection(selected),
        ) => !selected.is_empty() && selected == correct_options,
        _ => false,
    }
}

/// Rounded percentage of correct answers, 0 for an empty quiz.
pub fn score_percentage(correct: usize, total: usize) -> u32 {
    if total == 0 {
        return 0;
    }
    ((correct as f64 / total as f64) * 100.0).round() as u32
}

pub fn grade(session: &Session) -> GradedResult {
    let outcomes: Vec<QuestionOutcome> = session
        .items()
        .iter()
        .zip(session.answers())
        .enumerate()
        .map(|(index, (item, answer))| QuestionOutcome {
            index,
            answered: !answer.is_empty(),
            correct: is_correct(&item.question, answer),
        })
        .collect();

    let correct_count = outcomes.iter().filter(|o| o.correct).count();
    let total = outcomes.len();

    GradedResult {
        outcomes,
        correct_count,
        total,
        score: score_percentage(correct_count, total),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use super::*;

    fn set(values: &[&str]) -> BTreeSet<String> {
        values.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_multi_answer_ignores_order() {
        let question = Question::MultiAnswer {
            prompt: "Which?".to_string(),
            options: vec!["X".into(), "Y".into(), "Z".into()],
            correct_options: set(&["X", "Z"]),
            explanation: String::new(),
        };

        assert!(is_correct(&question, &UserAnswer::Selection(set(&["Z", "X"]))));
        assert!(!is_correct(&question, &UserAnswer::Selection(set(&["X"]))));
        assert!(!is_correct(&question, &UserAnswer::Selection(set(&["X", "Y", "Z"]))));
        assert!(!is_correct(&question, &UserAnswer::Unanswered));
    }

    #[test]
    fn test_empty_selection_never_correct() {
        let question = Question::MultiAnswer {
            prompt: "Which?".to_string(),
            options: vec!["X".into(), "Y".into()],
            correct_options: BTreeSet::new(),
            explanation: String::new(),
        };

        assert!(!is_correct(&question, &UserAnswer::Selection(BTreeSet::new())));
        assert!(!is_correct(&question, &UserAnswer::Unanswered));
    }

    #[test]
    fn test_single_choice_and_true_false() {
        let single = Question::SingleChoice {
            prompt: "?".to_string(),
            options: vec!["a".into(), "b".into()],
            correct_option: "b".to_string(),
            explanation: String::new(),
        };
        assert!(is_correct(&single, &UserAnswer::Choice("b".to_string())));
        assert!(!is_correct(&single, &UserAnswer::Choice("a".to_string())));

        let verdict = Question::TrueFalse {
            statement: "!".to_string(),
            correct_value: false,
            explanation: String::new(),
        };
        assert!(is_correct(&verdict, &UserAnswer::Verdict(false)));
        assert!(!is_correct(&verdict, &UserAnswer::Verdict(true)));
    }

    #[test]
    fn test_score_percentage() {
        assert_eq!(score_percentage(3, 4), 75);
        assert_eq!(score_percentage(0, 0), 0);
        assert_eq!(score_percentage(2, 3), 67);
        assert_eq!(score_percentage(1, 3), 33);
        assert_eq!(score_percentage(5, 5), 100);
    }
}
