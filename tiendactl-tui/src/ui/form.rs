use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use super::{ACCENT, DIM, SECONDARY};
use crate::app::App;
use crate::mode::Mode;

/// Render the filter box above the record fields
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(4)])
        .split(area);

    render_filter(frame, app, chunks[0]);
    render_fields(frame, app, chunks[1]);
}

fn render_filter(frame: &mut Frame, app: &App, area: Rect) {
    let panel = app.active_panel();
    let editing = app.mode == Mode::Filter;

    let block = Block::default()
        .title(format!(" Filter by {} ", panel.descriptor().filter_column))
        .borders(Borders::ALL)
        .border_style(if editing {
            Style::default().fg(Mode::Filter.color())
        } else {
            Style::default().fg(SECONDARY)
        });

    let content = if editing {
        format!("{}|", panel.filter())
    } else {
        panel.filter().to_string()
    };

    frame.render_widget(Paragraph::new(content).block(block), area);
}

fn render_fields(frame: &mut Frame, app: &App, area: Rect) {
    let panel = app.active_panel();
    let descriptor = panel.descriptor();
    let editing = app.mode == Mode::Edit;

    let title = match panel.selected_id() {
        Some(id) => format!(" {} #{} ", descriptor.singular, id),
        None => format!(" New {} ", descriptor.singular.to_lowercase()),
    };

    let mut lines = Vec::new();
    for (idx, (column, value)) in descriptor.columns.iter().zip(panel.fields()).enumerate() {
        let focused = editing && idx == panel.focused_field();
        let marker = if column.required { "*" } else { "" };

        let label_style = if focused {
            Style::default().fg(ACCENT).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(DIM)
        };
        lines.push(Line::from(Span::styled(
            format!("{}{}", column.label, marker),
            label_style,
        )));

        let text = if focused {
            format!("  {}|", value)
        } else {
            format!("  {}", value)
        };
        lines.push(Line::from(Span::styled(text, Style::default().fg(Color::White))));

        // Hint for columns the storage fills in
        if let (Some(default), true) = (column.default, value.is_empty()) {
            lines.push(Line::from(Span::styled(
                format!("  (empty = {})", default),
                Style::default().fg(DIM),
            )));
        }
    }

    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(if editing {
            Style::default().fg(Mode::Edit.color())
        } else {
            Style::default().fg(SECONDARY)
        });

    let paragraph = Paragraph::new(lines)
        .block(block)
        .wrap(Wrap { trim: false });

    frame.render_widget(paragraph, area);
}
