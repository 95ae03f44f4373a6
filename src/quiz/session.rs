//! In-memory state of one quiz attempt.

use rand::Rng;
use rand::seq::SliceRandom;

use crate::models::{Question, QuestionKind, UserAnswer};

/// A question together with the order its options are shown in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizItem {
    pub question: Question,
    /// Permutation of option indices, fixed for the whole session.
    /// `None` for questions without options.
    pub presentation: Option<Vec<usize>>,
}

impl QuizItem {
    /// Options in the order they are displayed during the quiz.
    pub fn presented_options(&self) -> Vec<&str> {
        let options = self.question.options();
        match &self.presentation {
            Some(order) => order.iter().map(|&i| options[i].as_str()).collect(),
            None => options.iter().map(String::as_str).collect(),
        }
    }
}

/// Questions, answers, marks and cursor for one attempt.
///
/// `items`, `answers` and `marked` always have the same length and are
/// index-aligned. Indices outside `0..len()` are programmer errors and panic.
#[derive(Debug, Clone, Default)]
pub struct Session {
    items: Vec<QuizItem>,
    answers: Vec<UserAnswer>,
    marked: Vec<bool>,
    cursor: usize,
}

impl Session {
    /// Build a session from freshly generated questions.
    ///
    /// Every choice-bearing question gets its own shuffled presentation order,
    /// then the question sequence itself is shuffled.
    pub fn build<R: Rng + ?Sized>(questions: Vec<Question>, rng: &mut R) -> Self {
        let mut items: Vec<QuizItem> = questions
            .into_iter()
            .map(|question| {
                let presentation = match question.kind() {
                    QuestionKind::MultipleChoice | QuestionKind::MultipleAnswer => {
                        let mut order: Vec<usize> = (0..question.options().len()).collect();
                        order.shuffle(rng);
                        Some(order)
                    }
                    QuestionKind::TrueFalse => None,
                };
                QuizItem {
                    question,
                    presentation,
                }
            })
            .collect();
        items.shuffle(rng);

        let len = items.len();
        Self {
            items,
            answers: vec![UserAnswer::Unanswered; len],
            marked: vec![false; len],
            cursor: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn items(&self) -> &[QuizItem] {
        &self.items
    }

    pub fn answers(&self) -> &[UserAnswer] {
        &self.answers
    }

    pub fn marked(&self) -> &[bool] {
        &self.marked
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn item(&self, index: usize) -> &QuizItem {
        self.assert_index(index);
        &self.items[index]
    }

    pub fn current(&self) -> &QuizItem {
        self.item(self.cursor)
    }

    pub fn navigate(&mut self, index: usize) {
        self.assert_index(index);
        self.cursor = index;
    }

    /// Replace the answer in slot `index`.
    ///
    /// The answer must fit the slot's question kind.
    pub fn answer(&mut self, index: usize, value: UserAnswer) {
        self.assert_index(index);
        let kind = self.items[index].question.kind();
        assert!(
            value.fits(kind),
            "answer {:?} does not fit a {} question",
            value,
            kind
        );
        self.answers[index] = value;
    }

    /// Add `option` to a multi-answer selection, or remove it if present.
    pub fn toggle_option(&mut self, index: usize, option: &str) {
        self.assert_index(index);
        assert_eq!(
            self.items[index].question.kind(),
            QuestionKind::MultipleAnswer,
            "option toggling only applies to multiple answer questions"
        );
        assert!(
            self.items[index]
                .question
                .options()
                .iter()
                .any(|candidate| candidate == option),
            "{:?} is not an option of question {}",
            option,
            index
        );

        let mut selection = match std::mem::take(&mut self.answers[index]) {
            UserAnswer::Selection(set) => set,
            _ => Default::default(),
        };
        if !selection.remove(option) {
            selection.insert(option.to_string());
        }
        self.answers[index] = UserAnswer::Selection(selection);
    }

    pub fn toggle_mark(&mut self, index: usize) {
        self.assert_index(index);
        self.marked[index] = !self.marked[index];
    }

    pub fn is_answered(&self, index: usize) -> bool {
        self.assert_index(index);
        !self.answers[index].is_empty()
    }

    pub fn answered_count(&self) -> usize {
        self.answers.iter().filter(|a| !a.is_empty()).count()
    }

    pub fn unanswered_count(&self) -> usize {
        self.len() - self.answered_count()
    }

    fn assert_index(&self, index: usize) {
        assert!(
            index < self.items.len(),
            "question index {} out of range for {} questions",
            index,
            self.items.len()
        );
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;

    fn questions() -> Vec<Question> {
        vec![
            Question::SingleChoice {
                prompt: "Capital of France?".to_string(),
                options: vec!["Paris".into(), "Rome".into(), "Oslo".into(), "Bern".into()],
                correct_option: "Paris".to_string(),
                explanation: String::new(),
            },
            Question::TrueFalse {
                statement: "Water is wet.".to_string(),
                correct_value: true,
                explanation: String::new(),
            },
            Question::MultiAnswer {
                prompt: "Primes?".to_string(),
                options: vec!["2".into(), "3".into(), "4".into()],
                correct_options: ["2", "3"].iter().map(|s| s.to_string()).collect(),
                explanation: String::new(),
            },
        ]
    }

    #[test]
    fn test_build_initializes_parallel_arrays() {
        let mut rng = StdRng::seed_from_u64(7);
        let session = Session::build(questions(), &mut rng);

        assert_eq!(session.len(), 3);
        assert_eq!(session.answers().len(), 3);
        assert_eq!(session.marked().len(), 3);
        assert!(session.answers().iter().all(|a| *a == UserAnswer::Unanswered));
        assert!(session.marked().iter().all(|m| !m));
        assert_eq!(session.cursor(), 0);
    }

    #[test]
    fn test_presentation_is_a_permutation() {
        let mut rng = StdRng::seed_from_u64(42);
        let session = Session::build(questions(), &mut rng);

        for item in session.items() {
            match &item.presentation {
                Some(order) => {
                    let mut sorted = order.clone();
                    sorted.sort_unstable();
                    let expected: Vec<usize> = (0..item.question.options().len()).collect();
                    assert_eq!(sorted, expected);
                }
                None => assert_eq!(item.question.kind(), QuestionKind::TrueFalse),
            }
        }
    }

    #[test]
    fn test_toggle_option_adds_and_removes() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut session = Session::build(questions(), &mut rng);
        let index = session
            .items()
            .iter()
            .position(|i| i.question.kind() == QuestionKind::MultipleAnswer)
            .unwrap();

        session.toggle_option(index, "2");
        session.toggle_option(index, "3");
        let expected: BTreeSet<String> = ["2", "3"].iter().map(|s| s.to_string()).collect();
        assert_eq!(session.answers()[index], UserAnswer::Selection(expected));

        session.toggle_option(index, "2");
        session.toggle_option(index, "3");
        assert!(!session.is_answered(index));
        assert_eq!(session.answers()[index], UserAnswer::Selection(BTreeSet::new()));
    }

    #[test]
    fn test_toggle_mark_twice_restores() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut session = Session::build(questions(), &mut rng);

        session.toggle_mark(2);
        assert!(session.marked()[2]);
        session.toggle_mark(2);
        assert!(!session.marked()[2]);
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn test_navigate_out_of_range_panics() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut session = Session::build(questions(), &mut rng);
        session.navigate(3);
    }

    #[test]
    #[should_panic(expected = "does not fit")]
    fn test_answer_kind_mismatch_panics() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut session = Session::build(questions(), &mut rng);
        let index = session
            .items()
            .iter()
            .position(|i| i.question.kind() == QuestionKind::TrueFalse)
            .unwrap();
        session.answer(index, UserAnswer::Choice("Paris".to_string()));
    }

    #[test]
    #[should_panic(expected = "is not an option")]
    fn test_toggle_unknown_option_panics() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut session = Session::build(questions(), &mut rng);
        let index = session
            .items()
            .iter()
            .position(|i| i.question.kind() == QuestionKind::MultipleAnswer)
            .unwrap();
        session.toggle_option(index, "not listed");
    }
}
