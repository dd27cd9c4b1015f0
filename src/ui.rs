pub mod detail;
pub mod history_table;
pub mod screen;

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Gauge, Paragraph, Wrap},
    Frame,
};

use crate::{
    app::App,
    session::SessionPhase,
    util::truncate_to_width,
    view::{LivePanel, Notice, NoticeKind, UploadPanel},
};

const HORIZONTAL_MARGIN: u16 = 1;

/// Draw whichever screen the app is on
pub fn draw(app: &mut App, f: &mut Frame) {
    let screen = screen::current_screen(&app.state);
    screen.render(app, f);
}

pub(crate) fn render_dashboard(app: &App, f: &mut Frame) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .horizontal_margin(HORIZONTAL_MARGIN)
        .constraints([
            Constraint::Length(9), // live + upload panels
            Constraint::Min(5),    // history
            Constraint::Length(1), // key help
        ])
        .split(f.area());

    let panels = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
        .split(chunks[0]);

    let view = app.dashboard.view();
    render_live_panel(
        &view.live,
        view.live_notice.as_ref(),
        app.dashboard.session().phase(),
        f,
        panels[0],
    );
    render_upload_panel(&view.upload, view.upload_notice.as_ref(), f, panels[1]);
    history_table::render(app, f, chunks[1]);

    let help = Paragraph::new(
        "(s)tart (x) stop | (f)ile (u)pload | (r)efresh ↑/↓ (enter) details | (q)uit",
    )
    .style(Style::default().fg(Color::Gray).add_modifier(Modifier::ITALIC))
    .alignment(Alignment::Center);
    f.render_widget(help, chunks[2]);
}

fn render_live_panel(
    live: &LivePanel,
    notice: Option<&Notice>,
    phase: SessionPhase,
    f: &mut Frame,
    area: Rect,
) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(format!("Live workout ({})", phase.to_string().to_lowercase()));
    let inner = block.inner(area);
    f.render_widget(block, area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // control
            Constraint::Length(1), // progress
            Constraint::Length(1), // gap
            Constraint::Length(1), // counters
            Constraint::Length(1), // gap
            Constraint::Min(1),    // notice
        ])
        .split(inner);

    let control = if live.start_visible {
        Span::styled(
            "[s] Start workout",
            Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
        )
    } else {
        Span::styled(
            "[x] Stop workout",
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        )
    };
    f.render_widget(Paragraph::new(Line::from(control)), rows[0]);

    if live.progress_visible {
        let gauge = Gauge::default()
            .gauge_style(Style::default().fg(Color::Cyan))
            .percent(live.progress as u16)
            .label(format!("{}%", live.progress));
        f.render_widget(gauge, rows[1]);
    }

    if live.stats_visible {
        let label = Style::default().add_modifier(Modifier::DIM);
        let value = Style::default().add_modifier(Modifier::BOLD);
        let counters = Line::from(vec![
            Span::styled("Reps ", label),
            Span::styled(live.reps.as_str(), value),
            Span::raw("   "),
            Span::styled("Calories ", label),
            Span::styled(live.calories.as_str(), value),
            Span::raw("   "),
            Span::styled("Duration ", label),
            Span::styled(format!("{}s", live.duration), value),
        ]);
        f.render_widget(Paragraph::new(counters), rows[3]);
    }

    render_notice(notice, f, rows[5]);
}

fn render_upload_panel(upload: &UploadPanel, notice: Option<&Notice>, f: &mut Frame, area: Rect) {
    let block = Block::default().borders(Borders::ALL).title("Analyze video");
    let inner = block.inner(area);
    f.render_widget(block, area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // file label
            Constraint::Length(1), // progress
            Constraint::Length(1), // gap
            Constraint::Min(1),    // notice
        ])
        .split(inner);

    let label = truncate_to_width(&upload.file_label, inner.width.saturating_sub(4) as usize);
    f.render_widget(
        Paragraph::new(Line::from(vec![
            Span::styled("[f] ", Style::default().fg(Color::Yellow)),
            Span::raw(label),
        ])),
        rows[0],
    );

    if upload.progress_visible {
        let gauge = Gauge::default()
            .gauge_style(Style::default().fg(Color::Magenta))
            .percent(upload.progress as u16)
            .label(format!("{}%", upload.progress));
        f.render_widget(gauge, rows[1]);
    }

    render_notice(notice, f, rows[3]);
}

fn render_notice(notice: Option<&Notice>, f: &mut Frame, area: Rect) {
    let Some(notice) = notice else {
        return;
    };
    let color = match notice.kind {
        NoticeKind::Success => Color::Green,
        NoticeKind::Error => Color::Red,
    };
    let paragraph = Paragraph::new(notice.text.as_str())
        .style(Style::default().fg(color))
        .wrap(Wrap { trim: true });
    f.render_widget(paragraph, area);
}

/// Centered popup asking for the path of the video to analyze
pub(crate) fn render_file_prompt(app: &App, f: &mut Frame) {
    let area = centered_rect(70, 5, f.area());
    let prompt = Paragraph::new(vec![
        Line::from(format!("{}█", app.path_input)),
        Line::from(Span::styled(
            "(enter) select  (esc) cancel",
            Style::default().fg(Color::Gray).add_modifier(Modifier::ITALIC),
        )),
    ])
    .block(
        Block::default()
            .borders(Borders::ALL)
            .title("Video file path"),
    );
    f.render_widget(Clear, area);
    f.render_widget(prompt, area);
}

fn centered_rect(percent_x: u16, height: u16, r: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(0),
            Constraint::Length(height),
            Constraint::Min(0),
        ])
        .split(r);
    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1])[1]
}
