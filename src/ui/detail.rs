use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use crate::{app::App, history::HistoryRow};

/// Full summary text of the selected history entry
pub fn render_history_detail(app: &App, f: &mut Frame) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(2)
        .constraints([
            Constraint::Length(3), // title
            Constraint::Min(0),    // summary
            Constraint::Length(3), // instructions
        ])
        .split(f.area());

    let history = &app.dashboard.view().history;
    let Some((entry, row)) = app
        .selected_row()
        .and_then(|idx| Some((history.entry(idx)?, history.rows().get(idx)?)))
    else {
        let none = Paragraph::new("No session selected.")
            .block(Block::default().borders(Borders::ALL).title("Session"))
            .alignment(Alignment::Center);
        f.render_widget(none, chunks[1]);
        return;
    };

    let title = Paragraph::new(title_line(row))
        .block(Block::default().borders(Borders::ALL).title("Session"))
        .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
        .alignment(Alignment::Center);
    f.render_widget(title, chunks[0]);

    let summary: Vec<Line> = match entry.summary.as_deref() {
        Some(text) if !text.trim().is_empty() => text.lines().map(Line::from).collect(),
        _ => vec![Line::from(Span::styled(
            "The backend stored no summary for this session.",
            Style::default().fg(Color::Gray),
        ))],
    };
    let body = Paragraph::new(summary)
        .block(Block::default().borders(Borders::ALL).title("Summary"))
        .wrap(Wrap { trim: false });
    f.render_widget(body, chunks[1]);

    let instructions = Paragraph::new("↑/↓ previous/next session | (b)ack")
        .block(Block::default().borders(Borders::ALL))
        .style(Style::default().fg(Color::Gray).add_modifier(Modifier::ITALIC))
        .alignment(Alignment::Center);
    f.render_widget(instructions, chunks[2]);
}

fn title_line(row: &HistoryRow) -> String {
    format!(
        "{}  |  {} reps  |  {} kcal  |  {}",
        row.when, row.reps, row.calories, row.duration
    )
}
