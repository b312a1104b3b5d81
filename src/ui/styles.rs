use crate::domain::Urgency;
use ratatui::style::{Color, Modifier, Style};

/// Default text style
pub fn default_style() -> Style {
    Style::default().fg(Color::White)
}

/// Selected row highlight style
pub fn selected_style() -> Style {
    Style::default()
        .fg(Color::Black)
        .bg(Color::LightCyan)
        .add_modifier(Modifier::BOLD)
}

/// Running countdown badge style
pub fn running_style() -> Style {
    Style::default()
        .fg(Color::Magenta)
        .add_modifier(Modifier::BOLD)
}

/// Paused/idle badge style
pub fn idle_style() -> Style {
    Style::default().fg(Color::Gray)
}

/// Expired countdown style
pub fn expired_style() -> Style {
    Style::default().fg(Color::Red).add_modifier(Modifier::BOLD)
}

/// Tree connector style (for subtasks)
pub fn tree_style() -> Style {
    Style::default().fg(Color::DarkGray)
}

/// Title style for panes
pub fn title_style() -> Style {
    Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
}

/// Border style
pub fn border_style() -> Style {
    Style::default().fg(Color::Gray)
}

/// Keybinding hint style
pub fn hint_style() -> Style {
    Style::default().fg(Color::DarkGray)
}

/// Coach advice style
pub fn advice_style() -> Style {
    Style::default()
        .fg(Color::LightBlue)
        .add_modifier(Modifier::ITALIC)
}

/// Pin marker style
pub fn pin_style() -> Style {
    Style::default().fg(Color::Yellow)
}

/// Urgency badge style
pub fn urgency_style(urgency: Urgency) -> Style {
    match urgency {
        Urgency::High => Style::default().fg(Color::Red),
        Urgency::Medium => Style::default().fg(Color::Yellow),
        Urgency::Low => Style::default().fg(Color::Green),
    }
}

/// "On track" cell style
pub fn on_track_style() -> Style {
    Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)
}

/// "Behind" cell style
pub fn behind_style() -> Style {
    Style::default().fg(Color::DarkGray)
}

/// Trend sparkline style
pub fn trend_style() -> Style {
    Style::default().fg(Color::Cyan)
}

/// Modal/form background style
pub fn form_label_style() -> Style {
    Style::default().fg(Color::DarkGray)
}

/// Active form field style
pub fn form_active_style() -> Style {
    Style::default()
        .fg(Color::LightCyan)
        .add_modifier(Modifier::BOLD)
}
