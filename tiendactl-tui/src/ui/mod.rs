//! UI rendering using ratatui

mod form;
mod overlay;
mod records;

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Tabs},
    Frame,
};

use crate::app::App;

/// Primary accent color
const ACCENT: Color = Color::Cyan;
/// Secondary color for less important elements
const SECONDARY: Color = Color::DarkGray;
/// Highlight color for selected items
const HIGHLIGHT: Color = Color::Yellow;
const DIM: Color = Color::Rgb(100, 100, 100);

/// Render the entire UI
pub fn render(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Tab header
            Constraint::Min(8),    // Content area
            Constraint::Length(1), // Status bar
        ])
        .split(frame.area());

    render_tabs(frame, app, chunks[0]);

    // Records on the left, filter + fields on the right
    let content = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(62), Constraint::Percentage(38)])
        .split(chunks[1]);

    records::render(frame, app, content[0]);
    form::render(frame, app, content[1]);

    render_status_bar(frame, app, chunks[2]);

    // Overlays: notices first, help on top
    if let Some(notice) = app.current_notice() {
        overlay::render_notice(frame, notice, app.notices.len());
    }
    if let Some(help) = app.help_text {
        overlay::render_help(frame, help);
    }
}

fn render_tabs(frame: &mut Frame, app: &App, area: Rect) {
    let titles: Vec<String> = app
        .panels
        .iter()
        .enumerate()
        .map(|(i, panel)| format!("{}:{}", i + 1, panel.descriptor().title))
        .collect();

    let tabs = Tabs::new(titles)
        .block(
            Block::default()
                .title(format!(" Tienda :: {} ", app.target))
                .title_style(Style::default().fg(ACCENT).add_modifier(Modifier::BOLD))
                .borders(Borders::ALL)
                .border_style(Style::default().fg(SECONDARY)),
        )
        .select(app.active)
        .style(Style::default().fg(Color::White))
        .highlight_style(Style::default().fg(HIGHLIGHT).add_modifier(Modifier::BOLD));

    frame.render_widget(tabs, area);
}

fn render_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let panel = app.active_panel();
    let selection = match panel.selected_id() {
        Some(id) => format!("{} #{}", panel.descriptor().singular, id),
        None => "no selection".to_string(),
    };

    let line = Line::from(vec![
        Span::styled(
            format!(" {} ", app.mode.display_name()),
            Style::default()
                .bg(app.mode.color())
                .fg(Color::Black)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw(" "),
        Span::styled(selection, Style::default().fg(HIGHLIGHT)),
        Span::raw("  "),
        Span::styled(app.mode.hints(), Style::default().fg(DIM)),
    ]);

    frame.render_widget(Paragraph::new(line), area);
}

/// Rect of at most `width` x `height`, centered in `area`
fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width.saturating_sub(4));
    let height = height.min(area.height.saturating_sub(2));
    Rect {
        x: area.x + (area.width.saturating_sub(width)) / 2,
        y: area.y + (area.height.saturating_sub(height)) / 2,
        width,
        height,
    }
}
