use std::path::PathBuf;

use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::warn;

use crate::config::Config;
use crate::error::QuizError;
use crate::export::{self, ExportKind};
use crate::generate::{QuizRequest, SUPPORTED_LANGUAGES};
use crate::models::{Phase, Question, QuestionKind, UserAnswer};
use crate::preferences::{self, Theme};
use crate::quiz::{GradedResult, QuizItem, QuizMachine, Session, SubmitOutcome, TransitionError};
use crate::status::{Notice, NoticeTitle, StatusMessage};
use crate::workflow;

/// Rows of the setup form: one per question kind, then the language.
pub const SETUP_ROWS: usize = QuestionKind::ALL.len() + 1;

/// A dialog drawn above the current screen that captures all input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Modal {
    Notice(Notice),
    /// Submitting with `unanswered` empty questions needs a yes/no.
    ConfirmSubmit { unanswered: usize },
}

/// Files and question counts chosen before generation.
#[derive(Debug, Clone)]
pub struct SetupForm {
    pub files: Vec<PathBuf>,
    pub request: QuizRequest,
    selected_row: usize,
}

impl SetupForm {
    pub fn new(files: Vec<PathBuf>, request: QuizRequest) -> Self {
        Self {
            files,
            request,
            selected_row: 0,
        }
    }

    pub fn selected_row(&self) -> usize {
        self.selected_row
    }

    pub fn select_next_row(&mut self) {
        self.selected_row = (self.selected_row + 1) % SETUP_ROWS;
    }

    pub fn select_previous_row(&mut self) {
        self.selected_row = (self.selected_row + SETUP_ROWS - 1) % SETUP_ROWS;
    }

    /// Change the selected count by `delta`, or cycle the language.
    pub fn adjust(&mut self, delta: i32) {
        match QuestionKind::ALL.get(self.selected_row) {
            Some(&kind) => {
                let count = self.request.count(kind).saturating_add_signed(delta);
                self.request.set_count(kind, count);
            }
            None => {
                let len = SUPPORTED_LANGUAGES.len() as i32;
                let current = SUPPORTED_LANGUAGES
                    .iter()
                    .position(|(name, _)| *name == self.request.language)
                    .unwrap_or(0) as i32;
                let next = (current + delta).rem_euclid(len) as usize;
                self.request.language = SUPPORTED_LANGUAGES[next].0.to_string();
            }
        }
    }
}

pub struct App {
    machine: QuizMachine,
    pub setup: SetupForm,
    selected_option: usize,
    result_scroll: usize,
    loading: Option<StatusMessage>,
    modal: Option<Modal>,
    theme: Theme,
    config: Config,
    pub should_quit: bool,
}

impl App {
    pub fn new(config: Config, setup: SetupForm) -> Self {
        let theme = preferences::load_theme(&config.preferences_path);
        Self {
            machine: QuizMachine::new(),
            setup,
            selected_option: 0,
            result_scroll: 0,
            loading: None,
            modal: None,
            theme,
            config,
            should_quit: false,
        }
    }

    pub fn phase(&self) -> Phase {
        self.machine.phase()
    }

    pub fn session(&self) -> &Session {
        self.machine.session()
    }

    pub fn current_item(&self) -> &QuizItem {
        self.session().current()
    }

    pub fn grade(&self) -> GradedResult {
        self.machine.grade()
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    pub fn loading(&self) -> Option<&StatusMessage> {
        self.loading.as_ref()
    }

    pub fn modal(&self) -> Option<&Modal> {
        self.modal.as_ref()
    }

    pub fn selected_option(&self) -> usize {
        self.selected_option
    }

    pub fn result_scroll(&self) -> usize {
        self.result_scroll
    }

    // --- generation -------------------------------------------------------

    /// Validate the form and show the loading overlay. Returns `false` and
    /// shows a notice when the inputs are rejected.
    pub fn begin_generation(&mut self) -> bool {
        if let Err(e) = workflow::validate_inputs(&self.setup.files, &self.setup.request) {
            self.show_error(&e.into());
            return false;
        }
        self.loading = Some(StatusMessage::ReadingFiles {
            count: self.setup.files.len(),
        });
        true
    }

    pub fn set_status(&mut self, status: StatusMessage) {
        self.loading = Some(status);
    }

    pub fn finish_generation(&mut self, result: Result<Vec<Question>, QuizError>) {
        self.loading = None;
        match result {
            Ok(questions) => self.start_quiz(questions),
            Err(e) => self.show_error(&e),
        }
    }

    /// Enter the quiz with a fresh shuffle.
    pub fn start_quiz(&mut self, questions: Vec<Question>) {
        let mut rng = StdRng::from_entropy();
        match self.machine.load(questions, &mut rng) {
            Ok(()) => {
                self.selected_option = 0;
                self.result_scroll = 0;
            }
            Err(e) => self.show_notice(Notice::Error {
                title: NoticeTitle::GenerationFailed,
                detail: e.to_string(),
            }),
        }
    }

    // --- quiz -------------------------------------------------------------

    /// Number of selectable rows for the current question.
    pub fn option_count(&self) -> usize {
        match &self.current_item().question {
            Question::TrueFalse { .. } => 2,
            question => question.options().len(),
        }
    }

    pub fn select_next_option(&mut self) {
        let count = self.option_count();
        if count > 0 {
            self.selected_option = (self.selected_option + 1) % count;
        }
    }

    pub fn select_previous_option(&mut self) {
        let count = self.option_count();
        if count > 0 {
            self.selected_option = (self.selected_option + count - 1) % count;
        }
    }

    pub fn next_question(&mut self) {
        let result = self.machine.next();
        self.apply(result);
        self.selected_option = 0;
    }

    pub fn previous_question(&mut self) {
        let result = self.machine.previous();
        self.apply(result);
        self.selected_option = 0;
    }

    pub fn go_to_question(&mut self, index: usize) {
        if index < self.session().len() {
            let result = self.machine.navigate(index);
            self.apply(result);
            self.selected_option = 0;
        }
    }

    /// Answer with the highlighted option; toggles it for multi-answer.
    pub fn choose_option(&mut self) {
        let index = self.session().cursor();
        let row = self.selected_option;
        let item = self.current_item();
        let kind = item.question.kind();
        let option = item.presented_options().get(row).map(|o| o.to_string());

        let result = match (kind, option) {
            (QuestionKind::TrueFalse, _) => {
                self.machine.answer(index, UserAnswer::Verdict(row == 0))
            }
            (QuestionKind::MultipleChoice, Some(option)) => {
                self.machine.answer(index, UserAnswer::Choice(option))
            }
            (QuestionKind::MultipleAnswer, Some(option)) => {
                self.machine.toggle_option(index, &option)
            }
            (_, None) => return,
        };
        self.apply(result);
    }

    pub fn toggle_mark(&mut self) {
        let index = self.session().cursor();
        let result = self.machine.toggle_mark(index);
        self.apply(result);
    }

    /// Submit, asking first when questions are still unanswered.
    pub fn request_submit(&mut self) {
        if self.machine.needs_confirmation() {
            self.modal = Some(Modal::ConfirmSubmit {
                unanswered: self.session().unanswered_count(),
            });
        } else {
            self.submit(true);
        }
    }

    /// Answer the confirmation dialog.
    pub fn confirm_submit(&mut self, accepted: bool) {
        self.modal = None;
        self.submit(accepted);
    }

    fn submit(&mut self, accepted: bool) {
        match self.machine.submit(|_| accepted) {
            Ok(SubmitOutcome::Graded) => self.result_scroll = 0,
            Ok(SubmitOutcome::Cancelled) => {}
            Err(e) => warn!("Ignored submit: {}", e),
        }
    }

    // --- results ----------------------------------------------------------

    pub fn scroll_results_down(&mut self) {
        self.result_scroll = self.result_scroll.saturating_add(1);
    }

    pub fn scroll_results_up(&mut self) {
        self.result_scroll = self.result_scroll.saturating_sub(1);
    }

    pub fn restart(&mut self) {
        let result = self.machine.restart();
        self.apply(result);
        self.selected_option = 0;
        self.result_scroll = 0;
    }

    /// Write one of the PDF exports and report where it went.
    pub fn export(&mut self, kind: ExportKind) {
        let questions: Vec<Question> = self
            .session()
            .items()
            .iter()
            .map(|item| item.question.clone())
            .collect();

        let notice = match export::export(
            kind,
            &questions,
            &self.config.output_dir,
            self.config.export_font.as_deref(),
        ) {
            Ok(path) => Notice::Exported { path },
            Err(e) => Notice::Error {
                title: NoticeTitle::ExportFailed,
                detail: e.to_string(),
            },
        };
        self.show_notice(notice);
    }

    // --- shell ------------------------------------------------------------

    pub fn toggle_theme(&mut self) {
        self.theme = self.theme.toggled();
        if let Err(e) = preferences::save_theme(&self.config.preferences_path, self.theme) {
            self.show_error(&e.into());
        }
    }

    pub fn show_error(&mut self, error: &QuizError) {
        warn!("{}", error);
        let title = match error {
            QuizError::Validation(_) => NoticeTitle::InvalidInput,
            QuizError::Extraction(_) => NoticeTitle::ExtractionFailed,
            QuizError::Generation { .. } | QuizError::Io(_) => NoticeTitle::GenerationFailed,
            QuizError::Export(_) => NoticeTitle::ExportFailed,
            QuizError::Preferences(_) => NoticeTitle::PreferencesFailed,
        };
        self.show_notice(Notice::Error {
            title,
            detail: error.to_string(),
        });
    }

    pub fn show_notice(&mut self, notice: Notice) {
        self.modal = Some(Modal::Notice(notice));
    }

    pub fn dismiss_modal(&mut self) {
        self.modal = None;
    }

    fn apply(&self, result: Result<(), TransitionError>) {
        if let Err(e) = result {
            warn!("Ignored input: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use super::*;

    fn test_config(name: &str) -> Config {
        Config {
            preferences_path: std::env::temp_dir()
                .join(format!("doc-quiz-app-{}-{}", name, std::process::id()))
                .join("preferences.toml"),
            output_dir: std::env::temp_dir().join(format!(
                "doc-quiz-app-out-{}-{}",
                name,
                std::process::id()
            )),
            ..Config::default()
        }
    }

    fn test_app(name: &str) -> App {
        App::new(
            test_config(name),
            SetupForm::new(vec![PathBuf::from("notes.txt")], QuizRequest::default()),
        )
    }

    fn questions() -> Vec<Question> {
        vec![
            Question::TrueFalse {
                statement: "Rust has a borrow checker.".to_string(),
                correct_value: true,
                explanation: String::new(),
            },
            Question::MultiAnswer {
                prompt: "Which are integers?".to_string(),
                options: vec!["i32".into(), "f64".into(), "u8".into()],
                correct_options: BTreeSet::from(["i32".to_string(), "u8".to_string()]),
                explanation: String::new(),
            },
        ]
    }

    #[test]
    fn test_setup_adjust_clamps_and_cycles() {
        let mut form = SetupForm::new(Vec::new(), QuizRequest::default());

        for _ in 0..10 {
            form.adjust(-1);
        }
        assert_eq!(form.request.count(QuestionKind::MultipleChoice), 0);

        form.select_previous_row();
        assert_eq!(form.selected_row(), SETUP_ROWS - 1);
        form.adjust(-1);
        assert_eq!(form.request.language, SUPPORTED_LANGUAGES[5].0);
        form.adjust(1);
        assert_eq!(form.request.language, SUPPORTED_LANGUAGES[0].0);
    }

    #[test]
    fn test_begin_generation_rejects_empty_request() {
        let mut app = test_app("empty-request");
        for kind in QuestionKind::ALL {
            app.setup.request.set_count(kind, 0);
        }

        assert!(!app.begin_generation());
        assert!(app.loading().is_none());
        assert!(matches!(
            app.modal(),
            Some(Modal::Notice(Notice::Error {
                title: NoticeTitle::InvalidInput,
                ..
            }))
        ));
        assert_eq!(app.phase(), Phase::Collecting);
    }

    #[test]
    fn test_failed_generation_stays_collecting() {
        let mut app = test_app("failed");
        assert!(app.begin_generation());
        assert!(app.loading().is_some());

        app.finish_generation(Err(QuizError::Generation {
            attempts: 3,
            source: crate::error::GenerateError::EmptyQuiz,
        }));

        assert!(app.loading().is_none());
        assert_eq!(app.phase(), Phase::Collecting);
        assert!(matches!(app.modal(), Some(Modal::Notice(_))));
    }

    #[test]
    fn test_submit_with_unanswered_asks_first() {
        let mut app = test_app("confirm");
        app.start_quiz(questions());
        assert_eq!(app.phase(), Phase::Active);

        app.request_submit();
        assert_eq!(app.modal(), Some(&Modal::ConfirmSubmit { unanswered: 2 }));

        app.confirm_submit(false);
        assert_eq!(app.phase(), Phase::Active);
        assert!(app.modal().is_none());

        app.request_submit();
        app.confirm_submit(true);
        assert_eq!(app.phase(), Phase::Graded);
        assert_eq!(app.grade().correct_count, 0);
    }

    #[test]
    fn test_choose_option_answers_by_value() {
        let mut app = test_app("choose");
        app.start_quiz(questions());

        for index in 0..app.session().len() {
            app.go_to_question(index);
            match app.current_item().question.clone() {
                Question::TrueFalse { .. } => app.choose_option(),
                Question::MultiAnswer {
                    correct_options, ..
                } => {
                    let presented: Vec<String> = app
                        .current_item()
                        .presented_options()
                        .iter()
                        .map(|o| o.to_string())
                        .collect();
                    for (row, option) in presented.iter().enumerate() {
                        if correct_options.contains(option) {
                            while app.selected_option() != row {
                                app.select_next_option();
                            }
                            app.choose_option();
                        }
                    }
                }
                Question::SingleChoice { .. } => unreachable!(),
            }
        }

        app.request_submit();
        assert!(app.modal().is_none());
        assert_eq!(app.phase(), Phase::Graded);
        assert_eq!(app.grade().score, 100);

        app.restart();
        assert_eq!(app.phase(), Phase::Collecting);
        assert!(app.session().is_empty());
    }

    #[test]
    fn test_mark_toggles_current() {
        let mut app = test_app("mark");
        app.start_quiz(questions());
        app.toggle_mark();
        assert!(app.session().marked()[0]);
        app.toggle_mark();
        assert!(!app.session().marked()[0]);
    }

    #[test]
    fn test_export_without_font_reports_missing_glyphs() {
        let mut app = test_app("export-cjk");
        app.start_quiz(vec![Question::TrueFalse {
            statement: "水在攝氏一百度沸騰".to_string(),
            correct_value: true,
            explanation: String::new(),
        }]);
        app.request_submit();
        app.confirm_submit(true);

        app.export(ExportKind::Questions);

        assert!(matches!(
            app.modal(),
            Some(Modal::Notice(Notice::Error {
                title: NoticeTitle::ExportFailed,
                ..
            }))
        ));
        assert!(!app.config().output_dir.join("quiz-questions.pdf").exists());

        app.dismiss_modal();
        app.restart();
        app.start_quiz(questions());
        app.request_submit();
        app.confirm_submit(true);
        app.export(ExportKind::Answers);

        match app.modal() {
            Some(Modal::Notice(Notice::Exported { path })) => {
                assert!(path.exists());
                let _ = std::fs::remove_file(path);
            }
            other => panic!("unexpected modal: {:?}", other),
        }
    }
}
