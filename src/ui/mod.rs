pub mod analytics_pane;
pub mod input_form;
pub mod keybindings;
pub mod layout;
pub mod list_pane;
pub mod styles;

use crate::app::App;
use crate::domain::UiMode;
use analytics_pane::render_analytics_pane;
use input_form::render_input_form;
use keybindings::render_status_bar;
use layout::create_layout;
use list_pane::render_list_pane;
use ratatui::{
    text::Span,
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use styles::{advice_style, border_style, title_style};

/// Main render function - draws the entire UI
pub fn render(f: &mut Frame, app: &App) {
    let size = f.size();
    let layout = create_layout(size);

    render_advice_bar(f, app, layout.advice_area);
    render_list_pane(f, app, layout.list_area);
    render_analytics_pane(f, app, layout.analytics_area);
    render_status_bar(f, app, layout.status_area);

    // Form overlay on top of everything else
    if app.ui_mode == UiMode::AddingTask || app.ui_mode == UiMode::AddingSubtask {
        render_input_form(f, app, size);
    }
}

fn render_advice_bar(f: &mut Frame, app: &App, area: ratatui::layout::Rect) {
    let text = match &app.advice {
        Some(advice) => format!("✨ \"{advice}\""),
        None => "✨ The coach is warming up…".to_string(),
    };

    let paragraph = Paragraph::new(Span::styled(text, advice_style())).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(border_style())
            .title(Span::styled(" Coach Insight ", title_style())),
    );
    f.render_widget(paragraph, area);
}
