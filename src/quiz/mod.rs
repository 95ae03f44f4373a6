//! Quiz session, grading, and the phase machine around them.

mod grading;
mod machine;
mod session;

pub use grading::{GradedResult, QuestionOutcome, grade, is_correct, score_percentage};
pub use machine::{QuizMachine, SubmitOutcome, TransitionError};
pub use session::{QuizItem, Session};
