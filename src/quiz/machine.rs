//! Three-phase quiz lifecycle.

use rand::Rng;
use thiserror::Error;
use tracing::info;

use crate::models::{Phase, Question, UserAnswer};

use super::grading::{self, GradedResult};
use super::session::Session;

/// A mutation attempted in a phase that does not allow it.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TransitionError {
    #[error("cannot {operation} while {phase:?}")]
    IllegalInPhase {
        operation: &'static str,
        phase: Phase,
    },
    #[error("cannot start a quiz without questions")]
    NoQuestions,
}

/// Result of a submit request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    Graded,
    Cancelled,
}

/// Owns the phase and the session, and gates every mutation on the phase.
#[derive(Debug)]
pub struct QuizMachine {
    phase: Phase,
    session: Session,
}

impl Default for QuizMachine {
    fn default() -> Self {
        Self::new()
    }
}

impl QuizMachine {
    pub fn new() -> Self {
        Self {
            phase: Phase::Collecting,
            session: Session::default(),
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// `Collecting -> Active` once generation has produced questions.
    pub fn load<R: Rng + ?Sized>(
        &mut self,
        questions: Vec<Question>,
        rng: &mut R,
    ) -> Result<(), TransitionError> {
        self.require(Phase::Collecting, "load a quiz")?;
        if questions.is_empty() {
            return Err(TransitionError::NoQuestions);
        }

        self.session = Session::build(questions, rng);
        self.phase = Phase::Active;
        info!("Quiz started with {} questions", self.session.len());
        Ok(())
    }

    pub fn navigate(&mut self, index: usize) -> Result<(), TransitionError> {
        self.require(Phase::Active, "navigate")?;
        self.session.navigate(index);
        Ok(())
    }

    /// Move to the next question, staying put on the last one.
    pub fn next(&mut self) -> Result<(), TransitionError> {
        let cursor = self.session.cursor();
        if cursor + 1 < self.session.len() {
            self.navigate(cursor + 1)
        } else {
            self.require(Phase::Active, "navigate")
        }
    }

    /// Move to the previous question, staying put on the first one.
    pub fn previous(&mut self) -> Result<(), TransitionError> {
        let cursor = self.session.cursor();
        if cursor > 0 {
            self.navigate(cursor - 1)
        } else {
            self.require(Phase::Active, "navigate")
        }
    }

    pub fn answer(&mut self, index: usize, value: UserAnswer) -> Result<(), TransitionError> {
        self.require(Phase::Active, "answer")?;
        self.session.answer(index, value);
        Ok(())
    }

    pub fn toggle_option(&mut self, index: usize, option: &str) -> Result<(), TransitionError> {
        self.require(Phase::Active, "answer")?;
        self.session.toggle_option(index, option);
        Ok(())
    }

    pub fn toggle_mark(&mut self, index: usize) -> Result<(), TransitionError> {
        self.require(Phase::Active, "mark")?;
        self.session.toggle_mark(index);
        Ok(())
    }

    /// Whether submitting needs the user to confirm unanswered questions.
    pub fn needs_confirmation(&self) -> bool {
        self.session.unanswered_count() > 0
    }

    /// `Active -> Graded`.
    ///
    /// When some questions are still empty, `confirm` is asked with the number
    /// of empty questions and the transition happens only if it returns `true`.
    pub fn submit<F>(&mut self, confirm: F) -> Result<SubmitOutcome, TransitionError>
    where
        F: FnOnce(usize) -> bool,
    {
        self.require(Phase::Active, "submit")?;

        let unanswered = self.session.unanswered_count();
        if unanswered > 0 && !confirm(unanswered) {
            return Ok(SubmitOutcome::Cancelled);
        }

        self.phase = Phase::Graded;
        info!(
            "Quiz submitted with {} of {} questions answered",
            self.session.answered_count(),
            self.session.len()
        );
        Ok(SubmitOutcome::Graded)
    }

    /// `Graded -> Collecting`, discarding the session.
    pub fn restart(&mut self) -> Result<(), TransitionError> {
        self.require(Phase::Graded, "restart")?;
        self.session = Session::default();
        self.phase = Phase::Collecting;
        Ok(())
    }

    pub fn grade(&self) -> GradedResult {
        grading::grade(&self.session)
    }

    fn require(&self, phase: Phase, operation: &'static str) -> Result<(), TransitionError> {
        if self.phase == phase {
            Ok(())
        } else {
            Err(TransitionError::IllegalInPhase {
                operation,
                phase: self.phase,
            })
        }
    }
}
