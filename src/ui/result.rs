use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Padding, Paragraph, Wrap},
};

use crate::app::App;
use crate::export::option_letter;
use crate::models::UserAnswer;
use crate::quiz::{GradedResult, QuizItem};

use super::Palette;
use super::quiz::row_texts;
use super::theme::score_feedback;

pub fn render(frame: &mut Frame, area: Rect, app: &App, palette: &Palette) {
    let result = app.grade();
    let grade_color = palette.grade_color(result.score);

    let chunks = Layout::vertical([
        Constraint::Length(1),
        Constraint::Length(7),
        Constraint::Fill(1),
        Constraint::Length(2),
    ])
    .margin(1)
    .split(area);

    render_score_summary(frame, chunks[1], &result, grade_color, palette);
    render_analysis(frame, chunks[2], app, &result, palette);
    render_controls(frame, chunks[3], palette);
}

fn render_score_summary(
    frame: &mut Frame,
    area: Rect,
    result: &GradedResult,
    grade_color: Color,
    palette: &Palette,
) {
    let content = vec![
        Line::from(""),
        Line::from(Span::styled(
            "測驗結果 / RESULTS",
            Style::default().fg(palette.accent).bold(),
        )),
        Line::from(""),
        Line::from(Span::styled(
            format!(
                "{}%  ·  {} / {}",
                result.score, result.correct_count, result.total
            ),
            Style::default().fg(grade_color).bold(),
        )),
        Line::from(Span::styled(
            score_feedback(result.score),
            Style::default().fg(palette.text),
        )),
        Line::from(""),
    ];

    let widget = Paragraph::new(content).alignment(Alignment::Center).block(
        Block::default()
            .borders(Borders::BOTTOM)
            .border_style(palette.muted),
    );
    frame.render_widget(widget, area);
}

/// One card per question with both answers and the explanation.
fn render_analysis(
    frame: &mut Frame,
    area: Rect,
    app: &App,
    result: &GradedResult,
    palette: &Palette,
) {
    let session = app.session();
    let mut lines: Vec<Line> = Vec::new();

    for outcome in &result.outcomes {
        let item = session.item(outcome.index);
        let (symbol, color) = if outcome.correct {
            ("✓", palette.correct)
        } else {
            ("✗", palette.incorrect)
        };

        let mut header = vec![
            Span::styled(format!(" {} ", symbol), Style::default().fg(color).bold()),
            Span::styled(
                format!("{}. ", outcome.index + 1),
                Style::default().fg(palette.muted),
            ),
            Span::styled(
                format!("[{}] ", item.question.kind().native_name()),
                Style::default().fg(palette.accent),
            ),
        ];
        if session.marked()[outcome.index] {
            header.push(Span::styled(
                "★ Marked ",
                Style::default().fg(palette.marked),
            ));
        }
        lines.push(Line::from(header));
        lines.push(Line::from(Span::styled(
            format!("   {}", item.question.text()),
            Style::default().fg(palette.text).bold(),
        )));

        let your_answer = answer_label(item, &session.answers()[outcome.index]);
        lines.push(Line::from(vec![
            Span::styled("   您的答案 / Your answer: ", Style::default().fg(palette.muted)),
            Span::styled(your_answer, Style::default().fg(color)),
        ]));
        if !outcome.correct {
            let correct = answer_label(item, &item.question.correct_answer());
            lines.push(Line::from(vec![
                Span::styled(
                    "   正確答案 / Correct answer: ",
                    Style::default().fg(palette.muted),
                ),
                Span::styled(correct, Style::default().fg(palette.correct)),
            ]));
        }
        lines.push(Line::from(vec![
            Span::styled("   解析 / Explanation: ", Style::default().fg(palette.muted)),
            Span::styled(
                item.question.explanation(),
                Style::default().fg(palette.text),
            ),
        ]));
        lines.push(Line::from(""));
    }

    let widget = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .block(Block::default().padding(Padding::horizontal(1)))
        .scroll((app.result_scroll() as u16, 0));
    frame.render_widget(widget, area);
}

/// Describe an answer with the letters the options had during the quiz.
fn answer_label(item: &QuizItem, answer: &UserAnswer) -> String {
    let rows = row_texts(item);
    let labelled = |row: usize| format!("{}. {}", option_letter(row), rows[row]);

    match answer {
        UserAnswer::Choice(chosen) => rows
            .iter()
            .position(|text| text == chosen)
            .map(labelled)
            .unwrap_or_else(|| chosen.clone()),
        UserAnswer::Verdict(value) => labelled(if *value { 0 } else { 1 }),
        UserAnswer::Selection(selected) if !selected.is_empty() => (0..rows.len())
            .filter(|&row| selected.contains(&rows[row]))
            .map(labelled)
            .collect::<Vec<_>>()
            .join(", "),
        UserAnswer::Unanswered | UserAnswer::Selection(_) => "未作答 / Not answered".to_string(),
    }
}

fn render_controls(frame: &mut Frame, area: Rect, palette: &Palette) {
    let widget = Paragraph::new(
        "j/k scroll  ·  e export questions  ·  a export answers  ·  r restart  ·  t theme  ·  q quit",
    )
    .alignment(Alignment::Center)
    .fg(palette.muted);
    frame.render_widget(widget, area);
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use super::*;
    use crate::models::Question;

    fn multi_item() -> QuizItem {
        QuizItem {
            question: Question::MultiAnswer {
                prompt: "Pick".to_string(),
                options: vec!["a".into(), "b".into(), "c".into()],
                correct_options: BTreeSet::from(["a".to_string(), "c".to_string()]),
                explanation: String::new(),
            },
            presentation: Some(vec![2, 0, 1]),
        }
    }

    #[test]
    fn test_labels_follow_presentation_order() {
        let item = multi_item();
        let answer = UserAnswer::Selection(BTreeSet::from(["a".to_string(), "c".to_string()]));
        assert_eq!(answer_label(&item, &answer), "A. c, B. a");
    }

    #[test]
    fn test_empty_answers_are_not_answered() {
        let item = multi_item();
        assert_eq!(
            answer_label(&item, &UserAnswer::Selection(BTreeSet::new())),
            "未作答 / Not answered"
        );
        assert_eq!(
            answer_label(&item, &UserAnswer::Unanswered),
            "未作答 / Not answered"
        );
    }

    #[test]
    fn test_true_false_labels() {
        let item = QuizItem {
            question: Question::TrueFalse {
                statement: "S".to_string(),
                correct_value: false,
                explanation: String::new(),
            },
            presentation: None,
        };
        assert_eq!(answer_label(&item, &UserAnswer::Verdict(false)), "B. 非 (False)");
    }
}
