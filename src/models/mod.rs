mod question;

pub use question::{Question, QuestionKind, UserAnswer};

/// Lifecycle stage of the application.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Choosing documents and question counts.
    Collecting,
    /// Taking the quiz.
    Active,
    /// Reviewing graded results.
    Graded,
}
