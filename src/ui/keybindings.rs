use crate::app::App;
use crate::ui::styles::hint_style;
use ratatui::{layout::Rect, text::Span, widgets::Paragraph, Frame};

const HINTS: &str = " ↑↓ select · enter run/pause · a task · s subtask · r restart · x delete · p pin · o sort · ←→ chart day · e export · q quit";

/// Render the bottom bar: transient status message if present, key hints
/// otherwise
pub fn render_status_bar(f: &mut Frame, app: &App, area: Rect) {
    let text = app.status_line.clone().unwrap_or_else(|| HINTS.to_string());
    f.render_widget(Paragraph::new(Span::styled(text, hint_style())), area);
}
