use crate::analytics::{daily_breakdown, seven_day_trend, window_totals};
use crate::app::App;
use crate::domain::format_hhmm;
use crate::ui::styles::{
    behind_style, border_style, default_style, hint_style, on_track_style, title_style,
    trend_style,
};
use chrono::Local;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Sparkline, Table},
    Frame,
};

/// Render the analytics pane: 7-day trend, window totals, and the
/// per-task breakdown for the selected chart date
pub fn render_analytics_pane(f: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(5), // Trend sparkline
            Constraint::Length(3), // Window totals
            Constraint::Min(0),    // Daily breakdown
        ])
        .split(area);

    render_trend(f, app, chunks[0]);
    render_totals(f, app, chunks[1]);
    render_breakdown(f, app, chunks[2]);
}

fn render_trend(f: &mut Frame, app: &App, area: Rect) {
    let today = Local::now().date_naive();
    let trend = seven_day_trend(&app.state.ledger, today);

    // Hundredths of an hour keep sub-hour days visible in the sparkline
    let values: Vec<u64> = trend.iter().map(|p| (p.hours * 100.0) as u64).collect();
    let peak = trend.iter().fold(0.0_f64, |acc, p| acc.max(p.hours));

    let sparkline = Sparkline::default()
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(border_style())
                .title(Span::styled(
                    format!(" 7-Day Momentum (peak {:.1}h) ", peak),
                    title_style(),
                )),
        )
        .data(&values)
        .style(trend_style());

    f.render_widget(sparkline, area);
}

fn render_totals(f: &mut Frame, app: &App, area: Rect) {
    let today = Local::now().date_naive();
    let totals = window_totals(&app.state.ledger, today);

    let line = Line::from(vec![
        Span::styled("Today ", hint_style()),
        Span::raw(format_hhmm(totals.today_ms)),
        Span::styled("   Week ", hint_style()),
        Span::raw(format_hhmm(totals.week_ms)),
        Span::styled("   Month ", hint_style()),
        Span::raw(format_hhmm(totals.month_ms)),
    ]);

    let paragraph = Paragraph::new(line).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(border_style())
            .title(Span::styled(" Focused Time ", title_style())),
    );

    f.render_widget(paragraph, area);
}

fn render_breakdown(f: &mut Frame, app: &App, area: Rect) {
    let today = Local::now().date_naive();
    let rows = daily_breakdown(&app.state.tasks, &app.state.ledger, app.chart_date, today);

    let table_rows: Vec<Row> = rows
        .iter()
        .map(|row| {
            let needed = if row.needed_today > 0.0 {
                format!("{:.2}h", row.needed_today)
            } else if row.daily_goal > 0.0 {
                format!("{:.2}h", row.daily_goal)
            } else {
                "—".to_string()
            };
            let (state, style) = if row.on_track {
                ("✓", on_track_style())
            } else {
                ("—", behind_style())
            };
            Row::new(vec![
                Cell::from(row.name.clone()),
                Cell::from(format!("{:.2}h", row.actual_hours)),
                Cell::from(needed),
                Cell::from(Span::styled(state, style)),
            ])
        })
        .collect();

    let widths = [
        Constraint::Percentage(46),
        Constraint::Percentage(20),
        Constraint::Percentage(20),
        Constraint::Percentage(14),
    ];
    let table = Table::new(table_rows, widths)
        .header(
            Row::new(vec!["Task", "Actual", "Needed", "State"]).style(hint_style()),
        )
        .style(default_style())
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(border_style())
                .title(Span::styled(
                    format!(" Daily Breakdown — {} ", app.chart_date.format("%Y-%m-%d")),
                    title_style(),
                )),
        );

    f.render_widget(table, area);
}
