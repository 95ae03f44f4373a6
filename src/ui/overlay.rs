//! Loading overlay and modal dialogs, drawn above every screen.

use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Clear, Gauge, Padding, Paragraph, Wrap},
};

use crate::app::Modal;
use crate::status::{Notice, StatusMessage};

use super::{Palette, centered};

const OVERLAY_WIDTH: u16 = 64;

pub fn render_loading(frame: &mut Frame, area: Rect, status: &StatusMessage, palette: &Palette) {
    let popup = centered(area, OVERLAY_WIDTH, 8);
    frame.render_widget(Clear, popup);

    let block = Block::default()
        .title(" 處理中 / Working ")
        .borders(Borders::ALL)
        .border_style(palette.accent)
        .bg(palette.background)
        .padding(Padding::horizontal(1));
    let inner = block.inner(popup);
    frame.render_widget(block, popup);

    let [text_area, _, gauge_area] = Layout::vertical([
        Constraint::Length(2),
        Constraint::Length(1),
        Constraint::Length(1),
    ])
    .areas(inner);

    let (headline, subline) = status.lines();
    let text = vec![
        Line::from(Span::styled(headline, Style::default().fg(palette.text).bold())),
        Line::from(Span::styled(subline, Style::default().fg(palette.muted))),
    ];
    frame.render_widget(Paragraph::new(text).alignment(Alignment::Center), text_area);

    if let Some(percent) = status.percent() {
        let gauge = Gauge::default()
            .gauge_style(Style::default().fg(palette.accent))
            .percent(u16::from(percent.min(100)));
        frame.render_widget(gauge, gauge_area);
    }
}

pub fn render_modal(frame: &mut Frame, area: Rect, modal: &Modal, palette: &Palette) {
    let (title, body, hint, border) = match modal {
        Modal::Notice(notice) => {
            let border = match notice {
                Notice::Error { .. } => palette.incorrect,
                Notice::Exported { .. } => palette.correct,
            };
            (notice.title().to_string(), notice.body(), "enter ok", border)
        }
        Modal::ConfirmSubmit { unanswered } => (
            "確認提交 / Confirm Submission".to_string(),
            format!(
                "還有 {0} 題未作答，確定要提交嗎？\n{0} questions are still unanswered. Submit anyway?",
                unanswered
            ),
            "y submit  ·  n keep answering",
            palette.marked,
        ),
    };

    let text_width = usize::from(OVERLAY_WIDTH - 4);
    let rows: usize = body
        .lines()
        .map(|line| line.chars().count() / text_width + 1)
        .sum();
    let height = (rows as u16).saturating_add(6).min(20);
    let popup = centered(area, OVERLAY_WIDTH, height);
    frame.render_widget(Clear, popup);

    let block = Block::default()
        .title(format!(" {} ", title))
        .borders(Borders::ALL)
        .border_style(border)
        .bg(palette.background)
        .padding(Padding::uniform(1));
    let inner = block.inner(popup);
    frame.render_widget(block, popup);

    let [body_area, hint_area] =
        Layout::vertical([Constraint::Fill(1), Constraint::Length(1)]).areas(inner);

    frame.render_widget(
        Paragraph::new(body)
            .wrap(Wrap { trim: true })
            .fg(palette.text),
        body_area,
    );
    frame.render_widget(
        Paragraph::new(hint)
            .alignment(Alignment::Center)
            .fg(palette.muted),
        hint_area,
    );
}
