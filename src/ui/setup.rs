use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Padding, Paragraph, Wrap},
};

use crate::app::App;
use crate::generate::SUPPORTED_LANGUAGES;
use crate::models::QuestionKind;
use crate::workflow::MAX_FILES;

use super::Palette;

pub fn render(frame: &mut Frame, area: Rect, app: &App, palette: &Palette) {
    let chunks = Layout::vertical([
        Constraint::Length(3),
        Constraint::Length(MAX_FILES as u16 + 3),
        Constraint::Fill(1),
        Constraint::Length(1),
    ])
    .margin(2)
    .split(area);

    render_title(frame, chunks[0], palette);
    render_files(frame, chunks[1], app, palette);
    render_form(frame, chunks[2], app, palette);
    render_controls(frame, chunks[3], palette);
}

fn render_title(frame: &mut Frame, area: Rect, palette: &Palette) {
    let content = vec![
        Line::from(Span::styled(
            "AI 文件測驗產生器",
            Style::default().fg(palette.accent).bold(),
        )),
        Line::from(Span::styled(
            "AI Document Quiz Generator",
            Style::default().fg(palette.muted),
        )),
    ];
    frame.render_widget(Paragraph::new(content).alignment(Alignment::Center), area);
}

fn render_files(frame: &mut Frame, area: Rect, app: &App, palette: &Palette) {
    let files = &app.setup.files;
    let mut lines: Vec<Line> = files
        .iter()
        .map(|path| {
            Line::from(vec![
                Span::styled(" • ", Style::default().fg(palette.accent)),
                Span::styled(path.display().to_string(), Style::default().fg(palette.text)),
            ])
        })
        .collect();
    if files.is_empty() {
        lines.push(Line::from(Span::styled(
            " 尚未選擇檔案 / No files given on the command line",
            Style::default().fg(palette.incorrect),
        )));
    }

    let title = format!(" 文件 / Documents ({}/{}) ", files.len(), MAX_FILES);
    let widget = Paragraph::new(lines).wrap(Wrap { trim: true }).block(
        Block::default()
            .title(title)
            .borders(Borders::ALL)
            .border_style(palette.muted)
            .padding(Padding::horizontal(1)),
    );
    frame.render_widget(widget, area);
}

fn render_form(frame: &mut Frame, area: Rect, app: &App, palette: &Palette) {
    let request = &app.setup.request;
    let selected = app.setup.selected_row();

    let mut rows: Vec<(String, String)> = QuestionKind::ALL
        .iter()
        .map(|&kind| {
            (
                format!("{} / {}", kind.native_name(), kind.display_name()),
                format!("< {:2} >", request.count(kind)),
            )
        })
        .collect();

    let language = SUPPORTED_LANGUAGES
        .iter()
        .find(|(name, _)| *name == request.language)
        .map(|(name, english)| format!("< {} ({}) >", name, english))
        .unwrap_or_else(|| format!("< {} >", request.language));
    rows.push(("出題語言 / Language".to_string(), language));

    let mut lines = Vec::with_capacity(rows.len() * 2 + 2);
    for (index, (label, value)) in rows.into_iter().enumerate() {
        let is_selected = index == selected;
        let style = if is_selected {
            Style::default().fg(palette.accent).bold()
        } else {
            Style::default().fg(palette.text)
        };
        let marker = if is_selected { ">" } else { " " };

        lines.push(Line::from(vec![
            Span::styled(format!(" {} ", marker), style),
            Span::styled(format!("{:<28}", label), style),
            Span::styled(value, style),
        ]));
        lines.push(Line::from(""));
    }
    lines.push(Line::from(Span::styled(
        format!("   共 {} 題 / {} questions in total", request.total(), request.total()),
        Style::default().fg(palette.muted),
    )));

    let widget = Paragraph::new(lines).block(
        Block::default()
            .title(" 題型設定 / Question Settings ")
            .borders(Borders::ALL)
            .border_style(palette.muted)
            .padding(Padding::uniform(1)),
    );
    frame.render_widget(widget, area);
}

fn render_controls(frame: &mut Frame, area: Rect, palette: &Palette) {
    let widget = Paragraph::new("j/k field  ·  h/l change  ·  enter generate  ·  t theme  ·  q quit")
        .alignment(Alignment::Center)
        .fg(palette.muted);
    frame.render_widget(widget, area);
}
