use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState},
    Frame,
};

use crate::{app::App, history::HistoryTotals, view::one_decimal};

pub fn render(app: &App, f: &mut Frame, area: Rect) {
    let history = &app.dashboard.view().history;

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(3), Constraint::Length(1)])
        .split(area);

    if history.is_empty() {
        let empty = Paragraph::new("No workouts recorded yet.")
            .block(Block::default().borders(Borders::ALL).title("History"))
            .style(Style::default().fg(Color::Gray))
            .alignment(Alignment::Center);
        f.render_widget(empty, chunks[0]);
        return;
    }

    let header = Row::new(vec![
        Cell::from("Date"),
        Cell::from("Reps"),
        Cell::from("Calories"),
        Cell::from("Duration"),
    ])
    .style(
        Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD),
    );

    let rows: Vec<Row> = history
        .rows()
        .iter()
        .map(|row| {
            Row::new(vec![
                Cell::from(row.when.as_str()),
                Cell::from(row.reps.as_str()),
                Cell::from(row.calories.as_str()),
                Cell::from(row.duration.as_str()),
            ])
        })
        .collect();

    let widths = [
        Constraint::Length(21), // Date
        Constraint::Length(8),  // Reps
        Constraint::Length(10), // Calories
        Constraint::Length(10), // Duration
    ];

    let table = Table::new(rows, widths)
        .header(header)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!("History ({} sessions)", history.len())),
        )
        .row_highlight_style(Style::default().bg(Color::DarkGray));

    let mut state = TableState::default().with_selected(app.selected_row());
    f.render_stateful_widget(table, chunks[0], &mut state);

    let totals = Paragraph::new(totals_line(&history.totals()))
        .style(Style::default().fg(Color::Cyan))
        .alignment(Alignment::Right);
    f.render_widget(totals, chunks[1]);
}

pub fn totals_line(totals: &HistoryTotals) -> String {
    let mean = totals
        .mean_duration
        .map(|d| format!("{}s", one_decimal(d)))
        .unwrap_or_else(|| "-".to_string());
    format!(
        "Total: {} reps, {} kcal, avg {} per session",
        totals.reps,
        one_decimal(totals.calories),
        mean
    )
}
