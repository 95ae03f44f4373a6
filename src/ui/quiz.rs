use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Padding, Paragraph, Wrap},
};

use crate::app::App;
use crate::export::option_letter;
use crate::models::{Question, UserAnswer};
use crate::quiz::{QuizItem, Session};

use super::Palette;

pub(super) const TRUE_FALSE_LABELS: [&str; 2] = ["是 (True)", "非 (False)"];

/// Texts of the selectable rows, in the order they are shown.
pub(super) fn row_texts(item: &QuizItem) -> Vec<String> {
    match &item.question {
        Question::TrueFalse { .. } => TRUE_FALSE_LABELS.iter().map(|s| s.to_string()).collect(),
        _ => item
            .presented_options()
            .into_iter()
            .map(str::to_string)
            .collect(),
    }
}

pub fn render(frame: &mut Frame, area: Rect, app: &App, palette: &Palette) {
    let chunks = Layout::vertical([
        Constraint::Length(1),
        Constraint::Length(3),
        Constraint::Length(4),
        Constraint::Fill(1),
        Constraint::Length(1),
    ])
    .margin(2)
    .split(area);

    render_progress(frame, chunks[0], app.session(), palette);
    render_directory(frame, chunks[1], app.session(), palette);
    render_question_text(frame, chunks[2], app, palette);
    render_options(frame, chunks[3], app, palette);
    render_controls(frame, chunks[4], palette);
}

fn render_progress(frame: &mut Frame, area: Rect, session: &Session, palette: &Palette) {
    let [left, right] =
        Layout::horizontal([Constraint::Fill(1), Constraint::Fill(1)]).areas(area);

    let answered = format!(
        "已作答 {} / {} answered",
        session.answered_count(),
        session.len()
    );
    frame.render_widget(Paragraph::new(answered).fg(palette.muted), left);

    let position = format!("{}/{}", session.cursor() + 1, session.len());
    frame.render_widget(
        Paragraph::new(position)
            .alignment(Alignment::Right)
            .fg(palette.muted),
        right,
    );
}

/// One cell per question: answered, marked and current are told apart by
/// colour and decoration.
fn render_directory(frame: &mut Frame, area: Rect, session: &Session, palette: &Palette) {
    let spans: Vec<Span> = (0..session.len())
        .map(|index| {
            let mut style = if session.is_answered(index) {
                Style::default().fg(palette.correct)
            } else {
                Style::default().fg(palette.muted)
            };
            if index == session.cursor() {
                style = style.bold().reversed();
            }
            let mark = if session.marked()[index] { "★" } else { " " };
            Span::styled(format!("{}{:>2} ", mark, index + 1), style)
        })
        .collect();

    let widget = Paragraph::new(Line::from(spans))
        .wrap(Wrap { trim: false })
        .block(
            Block::default()
                .borders(Borders::BOTTOM)
                .border_style(palette.muted),
        );
    frame.render_widget(widget, area);
}

fn render_question_text(frame: &mut Frame, area: Rect, app: &App, palette: &Palette) {
    let session = app.session();
    let question = &app.current_item().question;

    let mut header = vec![Span::styled(
        format!("[{}] ", question.kind().native_name()),
        Style::default().fg(palette.accent),
    )];
    if session.marked()[session.cursor()] {
        header.push(Span::styled(
            "★ 已標記 / Marked",
            Style::default().fg(palette.marked),
        ));
    }

    let content = vec![
        Line::from(header),
        Line::from(Span::styled(
            question.text(),
            Style::default().fg(palette.text).bold(),
        )),
    ];
    frame.render_widget(Paragraph::new(content).wrap(Wrap { trim: true }), area);
}

fn render_options(frame: &mut Frame, area: Rect, app: &App, palette: &Palette) {
    let session = app.session();
    let item = app.current_item();
    let answer = &session.answers()[session.cursor()];
    let rows = row_texts(item);
    let multi = matches!(item.question, Question::MultiAnswer { .. });

    let mut lines: Vec<Line> = Vec::with_capacity(rows.len() * 2);
    for (index, text) in rows.iter().enumerate() {
        let is_selected = index == app.selected_option();
        let is_chosen = is_chosen(answer, index, text);

        let style = if is_selected {
            Style::default().fg(palette.accent).bold()
        } else if is_chosen {
            Style::default().fg(palette.correct)
        } else {
            Style::default().fg(palette.text)
        };
        let marker = if is_selected { ">" } else { " " };
        let check = match (multi, is_chosen) {
            (true, true) => "[x]",
            (true, false) => "[ ]",
            (false, true) => "(•)",
            (false, false) => "( )",
        };

        lines.push(Line::from(vec![
            Span::styled(format!(" {} {} ", marker, check), style),
            Span::styled(format!("{}. ", option_letter(index)), style),
            Span::styled(text.as_str(), style),
        ]));
        lines.push(Line::from(""));
    }

    frame.render_widget(
        Paragraph::new(lines)
            .wrap(Wrap { trim: false })
            .block(Block::default().padding(Padding::horizontal(1))),
        area,
    );
}

fn is_chosen(answer: &UserAnswer, row: usize, text: &str) -> bool {
    match answer {
        UserAnswer::Unanswered => false,
        UserAnswer::Choice(chosen) => chosen == text,
        UserAnswer::Verdict(value) => *value == (row == 0),
        UserAnswer::Selection(selected) => selected.contains(text),
    }
}

fn render_controls(frame: &mut Frame, area: Rect, palette: &Palette) {
    let widget = Paragraph::new(
        "j/k option  ·  enter select  ·  h/l question  ·  m mark  ·  s submit  ·  t theme  ·  q quit",
    )
    .alignment(Alignment::Center)
    .fg(palette.muted);
    frame.render_widget(widget, area);
}
