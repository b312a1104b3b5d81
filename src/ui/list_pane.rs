use crate::app::App;
use crate::domain::{flatten_tasks, format_full, tree_connector, Subtask, Task};
use crate::ui::styles::{
    border_style, default_style, expired_style, idle_style, pin_style, running_style,
    selected_style, title_style, tree_style, urgency_style,
};
use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem},
    Frame,
};

/// Render the focus task list pane
pub fn render_list_pane(f: &mut Frame, app: &App, area: Rect) {
    let rows = flatten_tasks(&app.state.tasks, app.sort_mode);

    let items: Vec<ListItem> = rows
        .iter()
        .map(|row| {
            let line = match row.subtask_index {
                Some(st_idx) => create_subtask_line(
                    &app.state.tasks[row.task_index].subtasks[st_idx],
                    row.is_last,
                ),
                None => create_task_line(&app.state.tasks[row.task_index]),
            };
            let style = if row.index == app.selected_index {
                selected_style()
            } else {
                default_style()
            };
            ListItem::new(line).style(style)
        })
        .collect();

    let title = format!(
        " Focus Segments ({}) — sort: {} ",
        app.state.tasks.len(),
        app.sort_mode.label()
    );
    let list = List::new(items).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(border_style())
            .title(Span::styled(title, title_style())),
    );

    f.render_widget(list, area);
}

fn badge(running: bool, expired: bool) -> (&'static str, ratatui::style::Style) {
    if running {
        ("RUNNING", running_style())
    } else if expired {
        ("DONE", expired_style())
    } else {
        ("PAUSED", idle_style())
    }
}

/// One line per task:
/// `📌 Master React  02:13:09 / 40h [HIGH] RUNNING  → 2026-09-01`
fn create_task_line(task: &Task) -> Line<'static> {
    let mut spans = Vec::new();

    if task.pinned {
        spans.push(Span::styled("📌 ".to_string(), pin_style()));
    }
    spans.push(Span::raw(task.name.clone()));
    spans.push(Span::raw(format!(
        "  {} / {}h ({:.0}%) ",
        format_full(task.remaining_ms),
        task.hours_goal,
        task.progress_ratio() * 100.0
    )));
    spans.push(Span::styled(
        format!("[{}] ", task.urgency.label()),
        urgency_style(task.urgency),
    ));

    let (text, style) = badge(task.is_active(), task.is_expired());
    spans.push(Span::styled(text, style));

    if let Some(goal_date) = task.goal_date {
        spans.push(Span::styled(
            format!("  → {}", goal_date.format("%Y-%m-%d")),
            tree_style(),
        ));
    }

    Line::from(spans)
}

/// One line per subtask, indented under its parent
fn create_subtask_line(sub: &Subtask, is_last: bool) -> Line<'static> {
    let mut spans = Vec::new();

    spans.push(Span::styled("   ".to_string(), tree_style()));
    spans.push(Span::styled(
        format!("{} ", tree_connector(is_last)),
        tree_style(),
    ));
    spans.push(Span::raw(sub.name.clone()));
    spans.push(Span::raw(format!(
        "  {} / {}h ({:.0}%) ",
        format_full(sub.remaining_ms),
        sub.hours_goal,
        sub.progress_ratio() * 100.0
    )));

    let (text, style) = badge(sub.running, sub.is_expired());
    spans.push(Span::styled(text, style));

    Line::from(spans)
}
