use ratatui::{
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};
use tiendactl_core::{Level, Notice};

use super::centered;

fn level_color(level: Level) -> Color {
    match level {
        Level::Info => Color::Green,
        Level::Warning => Color::Yellow,
        Level::Error => Color::Red,
    }
}

/// Render the front notice as a modal; `pending` counts it too
pub fn render_notice(frame: &mut Frame, notice: &Notice, pending: usize) {
    let color = level_color(notice.level);
    let width = 60u16;
    // message lines wrap inside the border
    let inner = usize::from(width.saturating_sub(4)).max(1);
    let message_lines: usize = notice
        .message
        .lines()
        .map(|line| line.chars().count().max(1).div_ceil(inner))
        .sum();
    let height = (message_lines + 4) as u16;

    let area = centered(frame.area(), width, height);
    frame.render_widget(Clear, area);

    let footer = if pending > 1 {
        format!("any key: dismiss ({} more)", pending - 1)
    } else {
        "any key: dismiss".to_string()
    };

    let mut lines: Vec<Line> = notice.message.lines().map(Line::from).collect();
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(footer, Style::default().fg(Color::DarkGray))));

    let block = Block::default()
        .title(format!(" {} ", notice.title))
        .title_style(Style::default().fg(color).add_modifier(Modifier::BOLD))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(color));

    let paragraph = Paragraph::new(Text::from(lines))
        .block(block)
        .wrap(Wrap { trim: false });

    frame.render_widget(paragraph, area);
}

/// Render help overlay
pub fn render_help(frame: &mut Frame, help_text: &str) {
    let height = (help_text.lines().count() + 2) as u16;
    let area = centered(frame.area(), 64, height);
    frame.render_widget(Clear, area);

    let block = Block::default()
        .title(" Help (press any key to close) ")
        .title_style(Style::default().fg(Color::Green).add_modifier(Modifier::BOLD))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Green));

    let paragraph = Paragraph::new(help_text)
        .block(block)
        .style(Style::default().fg(Color::White));

    frame.render_widget(paragraph, area);
}
