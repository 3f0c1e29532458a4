use ratatui::{
    layout::{Constraint, Rect},
    style::{Modifier, Style},
    widgets::{Block, Borders, Cell, Row, Table, TableState},
    Frame,
};

use super::{ACCENT, DIM, HIGHLIGHT, SECONDARY};
use crate::app::App;
use crate::mode::Mode;

/// Render the active panel's rows
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let panel = app.active_panel();
    let descriptor = panel.descriptor();
    let rows = panel.rendered_rows();

    let title = if panel.filter().trim().is_empty() {
        format!(" {} ({}) ", descriptor.title, rows.len())
    } else {
        format!(
            " {} :: {} ~ '{}' ({}) ",
            descriptor.title,
            descriptor.filter_column,
            panel.filter().trim(),
            rows.len()
        )
    };

    let border_style = if app.mode == Mode::Normal {
        Style::default().fg(ACCENT)
    } else {
        Style::default().fg(SECONDARY)
    };

    let header = Row::new(descriptor.headers().into_iter().map(Cell::from))
        .style(Style::default().fg(DIM).add_modifier(Modifier::BOLD));

    // ID column stays narrow; the rest share the width
    let widths = std::iter::once(Constraint::Length(6))
        .chain(descriptor.columns.iter().map(|_| Constraint::Fill(1)));

    let table = Table::new(rows.into_iter().map(Row::new), widths)
        .header(header)
        .block(
            Block::default()
                .title(title)
                .borders(Borders::ALL)
                .border_style(border_style),
        )
        .row_highlight_style(Style::default().fg(HIGHLIGHT).add_modifier(Modifier::BOLD))
        .highlight_symbol("> ");

    let mut state = TableState::default().with_selected(panel.selected());
    frame.render_stateful_widget(table, area, &mut state);
}
