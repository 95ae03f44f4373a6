//! # doc-quiz
//!
//! Turn documents (PDF, DOCX, PPTX, TXT, images) into a quiz with a hosted
//! generative model, take it in the terminal, and export it as PDF.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use doc_quiz::{Config, Quiz, QuizError, QuizRequest};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), QuizError> {
//!     let quiz = Quiz::from_config(
//!         Config::from_env(),
//!         vec!["lecture.pdf".into()],
//!         QuizRequest::default(),
//!     );
//!
//!     // Take over the terminal until the user quits
//!     quiz.run().await
//! }
//! ```

mod app;
pub mod config;
pub mod error;
pub mod export;
pub mod extract;
pub mod generate;
pub mod logging;
pub mod models;
pub mod preferences;
pub mod quiz;
pub mod status;
pub mod terminal;
mod ui;
pub mod workflow;

use std::io;
use std::path::PathBuf;
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use tokio::sync::mpsc;
use tracing::{debug, info};

pub use app::{App, Modal, SetupForm};
pub use config::Config;
pub use error::{QuizError, Result};
pub use export::ExportKind;
pub use generate::{GeminiClient, ModelClient, QuizGenerator, QuizRequest};
pub use models::{Phase, Question, QuestionKind, UserAnswer};

use status::StatusMessage;

const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// What the event loop should do after a key press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Action {
    None,
    Generate,
    Quit,
}

/// A quiz application bound to a model client.
pub struct Quiz<C> {
    app: App,
    generator: QuizGenerator<C>,
}

impl Quiz<GeminiClient> {
    /// Build the application talking to Gemini as configured.
    pub fn from_config(config: Config, files: Vec<PathBuf>, request: QuizRequest) -> Self {
        let generator = QuizGenerator::new(GeminiClient::new(&config));
        Self::new(App::new(config, SetupForm::new(files, request)), generator)
    }
}

impl<C: ModelClient> Quiz<C> {
    pub fn new(app: App, generator: QuizGenerator<C>) -> Self {
        Self { app, generator }
    }

    /// Run the quiz in the terminal.
    ///
    /// Takes over the terminal and returns when the user quits.
    pub async fn run(mut self) -> Result<()> {
        let mut term = terminal::init()?;
        let result = run_event_loop(&mut term, &mut self.app, &self.generator).await;
        terminal::restore()?;
        result
    }

    pub fn app(&self) -> &App {
        &self.app
    }

    pub fn app_mut(&mut self) -> &mut App {
        &mut self.app
    }
}

async fn run_event_loop<C: ModelClient>(
    terminal: &mut terminal::AppTerminal,
    app: &mut App,
    generator: &QuizGenerator<C>,
) -> Result<()> {
    while !app.should_quit {
        terminal.draw(|frame| ui::render(frame, app))?;

        if !event::poll(POLL_INTERVAL)? {
            continue;
        }
        if let Event::Key(key) = event::read()? {
            if key.kind != KeyEventKind::Press {
                continue;
            }

            match handle_input(app, key.code) {
                Action::Quit => app.should_quit = true,
                Action::Generate => run_generation(terminal, app, generator).await?,
                Action::None => {}
            }
        }
    }

    info!("Quit requested");
    Ok(())
}

/// Drive one generation run to completion, redrawing the loading overlay on
/// every status update. Input is not read until the run is over.
async fn run_generation<C: ModelClient>(
    terminal: &mut terminal::AppTerminal,
    app: &mut App,
    generator: &QuizGenerator<C>,
) -> Result<()> {
    if !app.begin_generation() {
        return Ok(());
    }

    let (tx, mut rx) = mpsc::unbounded_channel::<StatusMessage>();
    let progress = move |status: StatusMessage| {
        let _ = tx.send(status);
    };
    let files = app.setup.files.clone();
    let request = app.setup.request.clone();

    let pipeline = workflow::build_quiz(&files, &request, generator, &progress);
    tokio::pin!(pipeline);

    let result = loop {
        terminal.draw(|frame| ui::render(frame, app))?;
        tokio::select! {
            result = &mut pipeline => break result,
            Some(status) = rx.recv() => app.set_status(status),
        }
    };

    app.finish_generation(result);

    // Keys pressed under the loading overlay must not reach the new screen
    let dropped = discard_pending(|| event::poll(Duration::ZERO), event::read)?;
    if dropped > 0 {
        debug!("Discarded {} events queued during generation", dropped);
    }
    Ok(())
}

/// Read and drop events for as long as `poll` reports one pending.
fn discard_pending<E>(
    mut poll: impl FnMut() -> io::Result<bool>,
    mut read: impl FnMut() -> io::Result<E>,
) -> io::Result<usize> {
    let mut dropped = 0;
    while poll()? {
        read()?;
        dropped += 1;
    }
    Ok(dropped)
}

fn handle_input(app: &mut App, key: KeyCode) -> Action {
    if app.modal().is_some() {
        handle_modal_input(app, key);
        return Action::None;
    }

    match key {
        KeyCode::Char('t') | KeyCode::Char('T') => {
            app.toggle_theme();
            return Action::None;
        }
        KeyCode::Char('q') | KeyCode::Char('Q') => return Action::Quit,
        _ => {}
    }

    match app.phase() {
        Phase::Collecting => handle_setup_input(app, key),
        Phase::Active => handle_quiz_input(app, key),
        Phase::Graded => handle_result_input(app, key),
    }
}

fn handle_modal_input(app: &mut App, key: KeyCode) {
    let confirming = matches!(app.modal(), Some(Modal::ConfirmSubmit { .. }));
    match key {
        KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter if confirming => {
            app.confirm_submit(true)
        }
        KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc if confirming => {
            app.confirm_submit(false)
        }
        KeyCode::Enter | KeyCode::Esc | KeyCode::Char(' ') if !confirming => app.dismiss_modal(),
        _ => {}
    }
}

fn handle_setup_input(app: &mut App, key: KeyCode) -> Action {
    match key {
        KeyCode::Up | KeyCode::Char('k') => app.setup.select_previous_row(),
        KeyCode::Down | KeyCode::Char('j') => app.setup.select_next_row(),
        KeyCode::Left | KeyCode::Char('h') | KeyCode::Char('-') => app.setup.adjust(-1),
        KeyCode::Right | KeyCode::Char('l') | KeyCode::Char('+') => app.setup.adjust(1),
        KeyCode::Enter | KeyCode::Char('g') => return Action::Generate,
        _ => {}
    }
    Action::None
}

fn handle_quiz_input(app: &mut App, key: KeyCode) -> Action {
    match key {
        KeyCode::Up | KeyCode::Char('k') => app.select_previous_option(),
        KeyCode::Down | KeyCode::Char('j') => app.select_next_option(),
        KeyCode::Left | KeyCode::Char('h') => app.previous_question(),
        KeyCode::Right | KeyCode::Char('l') => app.next_question(),
        KeyCode::Enter | KeyCode::Char(' ') => app.choose_option(),
        KeyCode::Char('m') | KeyCode::Char('M') => app.toggle_mark(),
        KeyCode::Char('s') | KeyCode::Char('S') => app.request_submit(),
        KeyCode::Char(c @ '1'..='9') => {
            if let Some(digit) = c.to_digit(10) {
                app.go_to_question(digit as usize - 1);
            }
        }
        _ => {}
    }
    Action::None
}

fn handle_result_input(app: &mut App, key: KeyCode) -> Action {
    match key {
        KeyCode::Down | KeyCode::Char('j') => app.scroll_results_down(),
        KeyCode::Up | KeyCode::Char('k') => app.scroll_results_up(),
        KeyCode::Char('e') | KeyCode::Char('E') => app.export(ExportKind::Questions),
        KeyCode::Char('a') | KeyCode::Char('A') => app.export(ExportKind::Answers),
        KeyCode::Char('r') | KeyCode::Char('R') => app.restart(),
        _ => {}
    }
    Action::None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_app(name: &str) -> App {
        let config = Config {
            preferences_path: std::env::temp_dir()
                .join(format!("doc-quiz-input-{}-{}", name, std::process::id()))
                .join("preferences.toml"),
            ..Config::default()
        };
        App::new(
            config,
            SetupForm::new(vec![PathBuf::from("notes.txt")], QuizRequest::default()),
        )
    }

    fn true_false(statement: &str) -> Question {
        Question::TrueFalse {
            statement: statement.to_string(),
            correct_value: true,
            explanation: String::new(),
        }
    }

    #[test]
    fn test_setup_keys() {
        let mut app = test_app("setup");

        assert_eq!(handle_input(&mut app, KeyCode::Char('l')), Action::None);
        assert_eq!(app.setup.request.count(QuestionKind::MultipleChoice), 6);

        handle_input(&mut app, KeyCode::Char('j'));
        handle_input(&mut app, KeyCode::Char('h'));
        assert_eq!(app.setup.request.count(QuestionKind::TrueFalse), 4);

        assert_eq!(handle_input(&mut app, KeyCode::Enter), Action::Generate);
        assert_eq!(handle_input(&mut app, KeyCode::Char('q')), Action::Quit);
    }

    #[test]
    fn test_modal_captures_keys() {
        let mut app = test_app("modal");
        app.start_quiz(vec![true_false("A"), true_false("B")]);

        handle_input(&mut app, KeyCode::Char('s'));
        assert!(matches!(app.modal(), Some(Modal::ConfirmSubmit { .. })));

        // Quit is swallowed while the dialog is open
        assert_eq!(handle_input(&mut app, KeyCode::Char('q')), Action::None);

        handle_input(&mut app, KeyCode::Char('n'));
        assert!(app.modal().is_none());
        assert_eq!(app.phase(), Phase::Active);
    }

    #[test]
    fn test_quiz_keys_answer_and_submit() {
        let mut app = test_app("quiz");
        app.start_quiz(vec![true_false("A"), true_false("B")]);

        handle_input(&mut app, KeyCode::Enter);
        handle_input(&mut app, KeyCode::Char('l'));
        handle_input(&mut app, KeyCode::Enter);
        assert_eq!(app.session().answered_count(), 2);

        handle_input(&mut app, KeyCode::Char('s'));
        assert_eq!(app.phase(), Phase::Graded);
        assert_eq!(app.grade().score, 100);

        handle_input(&mut app, KeyCode::Char('r'));
        assert_eq!(app.phase(), Phase::Collecting);
    }

    #[test]
    fn test_discard_pending_empties_queue() {
        let queue = std::cell::RefCell::new(std::collections::VecDeque::from([
            KeyCode::Enter,
            KeyCode::Char('s'),
        ]));

        let dropped = discard_pending(
            || Ok(!queue.borrow().is_empty()),
            || Ok(queue.borrow_mut().pop_front()),
        )
        .unwrap();

        assert_eq!(dropped, 2);
        assert!(queue.borrow().is_empty());
    }
}
