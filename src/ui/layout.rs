use ratatui::layout::{Constraint, Direction, Layout, Rect};

/// Main layout structure
pub struct MainLayout {
    pub advice_area: Rect,
    pub list_area: Rect,
    pub analytics_area: Rect,
    pub status_area: Rect,
}

/// Create the main layout:
/// - Top bar: coach advice (3 rows incl. border)
/// - Main area: task list (60%) | analytics (40%)
/// - Bottom bar: keybindings / status (1 row)
pub fn create_layout(area: Rect) -> MainLayout {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Advice bar
            Constraint::Min(0),    // Main content
            Constraint::Length(1), // Status bar
        ])
        .split(area);

    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(60), // Task list
            Constraint::Percentage(40), // Analytics
        ])
        .split(vertical[1]);

    MainLayout {
        advice_area: vertical[0],
        list_area: horizontal[0],
        analytics_area: horizontal[1],
        status_area: vertical[2],
    }
}

/// Centered rectangle for the input form overlay
pub fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let x = area.x + area.width.saturating_sub(width) / 2;
    let y = area.y + area.height.saturating_sub(height) / 2;
    Rect::new(x, y, width.min(area.width), height.min(area.height))
}
