use crate::app::{
    App, FORM_FIELD_DAILY, FORM_FIELD_DATE, FORM_FIELD_HOURS, FORM_FIELD_NAME, FORM_FIELD_URGENCY,
};
use crate::ui::layout::centered_rect;
use crate::ui::styles::{border_style, form_active_style, form_label_style, hint_style, title_style};
use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

/// Render the add-task / add-subtask form overlay
pub fn render_input_form(f: &mut Frame, app: &App, area: Rect) {
    let Some(form) = &app.input_form else {
        return;
    };

    let title = if form.is_subtask {
        " New Subtask "
    } else {
        " New Focus Segment "
    };

    let field_line = |label: &str, value: &str, field: usize| {
        let style = if form.field == field {
            form_active_style()
        } else {
            form_label_style()
        };
        let cursor = if form.field == field { "▏" } else { "" };
        Line::from(vec![
            Span::styled(format!("{label:<14}"), style),
            Span::raw(format!("{value}{cursor}")),
        ])
    };

    let mut lines = vec![
        field_line("Objective", &form.name, FORM_FIELD_NAME),
        field_line("Total hours", &form.hours_goal, FORM_FIELD_HOURS),
    ];
    if !form.is_subtask {
        lines.push(field_line("Daily target", &form.daily_goal, FORM_FIELD_DAILY));
        lines.push(field_line("Goal date", &form.goal_date, FORM_FIELD_DATE));

        let urgency_style = if form.field == FORM_FIELD_URGENCY {
            form_active_style()
        } else {
            form_label_style()
        };
        lines.push(Line::from(vec![
            Span::styled(format!("{:<14}", "Urgency"), urgency_style),
            Span::raw(form.urgency.label().to_string()),
        ]));
    }
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "tab next · enter create · esc cancel",
        hint_style(),
    )));

    let height = lines.len() as u16 + 2;
    let rect = centered_rect(46, height, area);

    f.render_widget(Clear, rect);
    let paragraph = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(border_style())
            .title(Span::styled(title, title_style())),
    );
    f.render_widget(paragraph, rect);
}
