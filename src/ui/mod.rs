mod overlay;
mod quiz;
mod result;
mod setup;
mod theme;

use ratatui::{layout::Flex, prelude::*, widgets::Block};

use crate::app::App;
use crate::models::Phase;

pub use theme::Palette;

pub fn render(frame: &mut Frame, app: &App) {
    let palette = Palette::for_theme(app.theme());
    let area = frame.area();
    frame.render_widget(Block::default().bg(palette.background), area);

    match app.phase() {
        Phase::Collecting => setup::render(frame, area, app, &palette),
        Phase::Active => quiz::render(frame, area, app, &palette),
        Phase::Graded => result::render(frame, area, app, &palette),
    }

    if let Some(status) = app.loading() {
        overlay::render_loading(frame, area, status, &palette);
    }
    if let Some(modal) = app.modal() {
        overlay::render_modal(frame, area, modal, &palette);
    }
}

/// A `width` x `height` rectangle centred in `area`, clipped to it.
fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let [row] = Layout::vertical([Constraint::Length(height.min(area.height))])
        .flex(Flex::Center)
        .areas(area);
    let [cell] = Layout::horizontal([Constraint::Length(width.min(area.width))])
        .flex(Flex::Center)
        .areas(row);
    cell
}
