use crate::app::{App, FORM_FIELD_URGENCY};
use crate::domain::UiMode;
use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent};

/// Handle keyboard input events. Returns true when the app should quit.
pub fn handle_key(app: &mut App, key: KeyEvent) -> Result<bool> {
    match app.ui_mode {
        UiMode::Normal => handle_normal_mode(app, key),
        UiMode::AddingTask | UiMode::AddingSubtask => handle_form_mode(app, key),
    }
}

/// Handle keys in normal mode
fn handle_normal_mode(app: &mut App, key: KeyEvent) -> Result<bool> {
    match key.code {
        // Navigation
        KeyCode::Up => {
            app.move_selection_up();
            Ok(false)
        }
        KeyCode::Down => {
            app.move_selection_down();
            Ok(false)
        }

        // Toggle run/pause for the selected task or subtask
        KeyCode::Enter | KeyCode::Char(' ') => {
            app.toggle_selected();
            Ok(false)
        }

        // Add task / subtask
        KeyCode::Char('a') | KeyCode::Char('A') => {
            app.start_add_task();
            Ok(false)
        }
        KeyCode::Char('s') | KeyCode::Char('S') => {
            app.start_add_subtask();
            Ok(false)
        }

        // Restart the selected task's countdowns
        KeyCode::Char('r') | KeyCode::Char('R') => {
            app.restart_selected();
            Ok(false)
        }

        // Delete
        KeyCode::Char('x') | KeyCode::Char('X') | KeyCode::Delete => {
            app.delete_selected();
            Ok(false)
        }

        // Pin (sort precedence)
        KeyCode::Char('p') | KeyCode::Char('P') => {
            app.pin_selected();
            Ok(false)
        }

        // Cycle the sort mode
        KeyCode::Char('o') | KeyCode::Char('O') => {
            app.cycle_sort_mode();
            Ok(false)
        }

        // Move the breakdown pane's date
        KeyCode::Left => {
            app.chart_prev_day();
            Ok(false)
        }
        KeyCode::Right => {
            app.chart_next_day();
            Ok(false)
        }

        // Export a dated backup next to the current directory
        KeyCode::Char('e') | KeyCode::Char('E') => {
            match app.export() {
                Ok(path) => app.status_line = Some(format!("Exported {}", path.display())),
                Err(err) => app.status_line = Some(format!("Export failed: {err}")),
            }
            Ok(false)
        }

        // Quit
        KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => Ok(true),

        _ => Ok(false),
    }
}

/// Handle keys while the add-task/add-subtask form is open
fn handle_form_mode(app: &mut App, key: KeyEvent) -> Result<bool> {
    let Some(form) = app.input_form.as_mut() else {
        app.ui_mode = UiMode::Normal;
        return Ok(false);
    };

    match key.code {
        KeyCode::Esc => app.cancel_form(),
        KeyCode::Enter => app.submit_form(),
        KeyCode::Tab | KeyCode::Down => form.next_field(),
        KeyCode::Left | KeyCode::Right | KeyCode::Char(' ')
            if form.field == FORM_FIELD_URGENCY =>
        {
            form.urgency = form.urgency.next();
        }
        KeyCode::Backspace => {
            if let Some(buffer) = form.active_buffer_mut() {
                buffer.pop();
            }
        }
        KeyCode::Char(c) => {
            if let Some(buffer) = form.active_buffer_mut() {
                buffer.push(c);
            }
        }
        _ => {}
    }
    Ok(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::Clock;
    use crate::domain::Urgency;
    use crate::engine::FocusState;
    use crossterm::event::{KeyEvent, KeyModifiers};
    use std::path::PathBuf;

    struct FixedClock(i64);

    impl Clock for FixedClock {
        fn now_ms(&self) -> i64 {
            self.0
        }
    }

    fn test_app() -> App {
        App::new(
            FocusState::new(),
            PathBuf::from("/tmp/unused-state.json"),
            Box::new(FixedClock(1_000)),
            None,
        )
    }

    fn press(app: &mut App, code: KeyCode) -> bool {
        handle_key(app, KeyEvent::new(code, KeyModifiers::NONE)).unwrap()
    }

    #[test]
    fn test_quit_keys() {
        let mut app = test_app();
        assert!(press(&mut app, KeyCode::Char('q')));
        assert!(press(&mut app, KeyCode::Esc));
        assert!(!press(&mut app, KeyCode::Char('z')));
    }

    #[test]
    fn test_enter_toggles_selected_task() {
        let mut app = test_app();
        app.state
            .create_task("a", 1.0, 0.0, None, Urgency::Medium, 0);

        assert!(!press(&mut app, KeyCode::Enter));
        assert!(app.state.tasks[0].running);

        assert!(!press(&mut app, KeyCode::Char(' ')));
        assert!(!app.state.tasks[0].running);
    }

    #[test]
    fn test_form_typing_and_submit() {
        let mut app = test_app();
        press(&mut app, KeyCode::Char('a'));
        assert_eq!(app.ui_mode, UiMode::AddingTask);

        for c in "Read".chars() {
            press(&mut app, KeyCode::Char(c));
        }
        press(&mut app, KeyCode::Tab);
        press(&mut app, KeyCode::Char('2'));
        press(&mut app, KeyCode::Enter);

        assert_eq!(app.ui_mode, UiMode::Normal);
        assert_eq!(app.state.tasks.len(), 1);
        assert_eq!(app.state.tasks[0].name, "Read");
        assert_eq!(app.state.tasks[0].hours_goal, 2.0);
    }

    #[test]
    fn test_form_escape_cancels() {
        let mut app = test_app();
        press(&mut app, KeyCode::Char('a'));
        press(&mut app, KeyCode::Char('x'));
        press(&mut app, KeyCode::Esc);

        assert_eq!(app.ui_mode, UiMode::Normal);
        assert!(app.input_form.is_none());
        assert!(app.state.tasks.is_empty());
    }

    #[test]
    fn test_urgency_field_cycles() {
        let mut app = test_app();
        press(&mut app, KeyCode::Char('a'));
        for _ in 0..4 {
            press(&mut app, KeyCode::Tab); // reach the urgency field
        }
        press(&mut app, KeyCode::Right);
        let form = app.input_form.as_ref().unwrap();
        assert_eq!(form.urgency, Urgency::High);
    }
}
