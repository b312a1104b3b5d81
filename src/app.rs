use crate::advice::{AdviceFetcher, AdviceSource};
use crate::analytics::progress_summary;
use crate::clock::Clock;
use crate::domain::{flatten_tasks, SortMode, UiMode, Urgency};
use crate::engine::FocusState;
use crate::notifications;
use crate::persistence::{export_file_name, export_state, save_state};
use crate::ticker;
use anyhow::Result;
use chrono::{Local, NaiveDate};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

/// Which form field the cursor is on
pub const FORM_FIELD_NAME: usize = 0;
pub const FORM_FIELD_HOURS: usize = 1;
pub const FORM_FIELD_DAILY: usize = 2;
pub const FORM_FIELD_DATE: usize = 3;
pub const FORM_FIELD_URGENCY: usize = 4;

/// Input form state for adding a task or subtask
#[derive(Debug, Clone)]
pub struct InputFormState {
    pub name: String,
    pub hours_goal: String,
    pub daily_goal: String,
    pub goal_date: String,
    pub urgency: Urgency,
    pub field: usize,
    pub is_subtask: bool,
}

impl InputFormState {
    fn new(is_subtask: bool) -> Self {
        Self {
            name: String::new(),
            hours_goal: String::new(),
            daily_goal: String::new(),
            goal_date: String::new(),
            urgency: Urgency::default(),
            field: FORM_FIELD_NAME,
            is_subtask,
        }
    }

    /// Subtask forms only take a name and an hours goal
    pub fn field_count(&self) -> usize {
        if self.is_subtask {
            2
        } else {
            5
        }
    }

    pub fn next_field(&mut self) {
        self.field = (self.field + 1) % self.field_count();
    }

    pub fn active_buffer_mut(&mut self) -> Option<&mut String> {
        match self.field {
            FORM_FIELD_NAME => Some(&mut self.name),
            FORM_FIELD_HOURS => Some(&mut self.hours_goal),
            FORM_FIELD_DAILY => Some(&mut self.daily_goal),
            FORM_FIELD_DATE => Some(&mut self.goal_date),
            _ => None,
        }
    }
}

/// Main application state: the persisted document plus everything the TUI
/// session needs around it
pub struct App {
    pub state: FocusState,
    pub state_path: PathBuf,
    pub clock: Box<dyn Clock>,
    pub selected_index: usize,
    pub ui_mode: UiMode,
    pub sort_mode: SortMode,
    pub input_form: Option<InputFormState>,
    /// Date the analytics breakdown pane is showing
    pub chart_date: NaiveDate,
    pub advice: Option<String>,
    /// Transient one-line message (export path, import rejection)
    pub status_line: Option<String>,
    pub needs_save: bool,
    advice_fetcher: AdviceFetcher,
    advice_deadline: Option<Instant>,
    last_task_count: usize,
}

impl App {
    pub fn new(
        state: FocusState,
        state_path: PathBuf,
        clock: Box<dyn Clock>,
        advice_source: Option<Arc<dyn AdviceSource>>,
    ) -> Self {
        let task_count = state.tasks.len();
        let advice_deadline = if task_count > 0 {
            Some(Instant::now() + ticker::advice_delay())
        } else {
            None
        };

        Self {
            state,
            state_path,
            clock,
            selected_index: 0,
            ui_mode: UiMode::Normal,
            sort_mode: SortMode::Urgency,
            input_form: None,
            chart_date: Local::now().date_naive(),
            advice: None,
            status_line: None,
            needs_save: false,
            advice_fetcher: AdviceFetcher::new(advice_source),
            advice_deadline,
            last_task_count: task_count,
        }
    }

    pub fn now_ms(&self) -> i64 {
        self.clock.now_ms()
    }

    /// The currently selected row as (task index, optional subtask index)
    pub fn selected_row(&self) -> Option<(usize, Option<usize>)> {
        let rows = flatten_tasks(&self.state.tasks, self.sort_mode);
        let row = rows.get(self.selected_index)?;
        Some((row.task_index, row.subtask_index))
    }

    pub fn move_selection_up(&mut self) {
        self.selected_index = self.selected_index.saturating_sub(1);
    }

    pub fn move_selection_down(&mut self) {
        let row_count = flatten_tasks(&self.state.tasks, self.sort_mode).len();
        if self.selected_index + 1 < row_count {
            self.selected_index += 1;
        }
    }

    fn clamp_selection(&mut self) {
        let row_count = flatten_tasks(&self.state.tasks, self.sort_mode).len();
        if row_count == 0 {
            self.selected_index = 0;
        } else if self.selected_index >= row_count {
            self.selected_index = row_count - 1;
        }
    }

    /// Pause/resume the selected task or subtask
    pub fn toggle_selected(&mut self) {
        let Some((task_idx, sub_idx)) = self.selected_row() else {
            return;
        };
        let now = self.now_ms();
        let task_id = self.state.tasks[task_idx].id;
        match sub_idx {
            Some(sub_idx) => {
                let sub_id = self.state.tasks[task_idx].subtasks[sub_idx].id;
                self.state.toggle_subtask(task_id, sub_id, now);
            }
            None => self.state.toggle_task(task_id, now),
        }
        self.needs_save = true;
    }

    /// Restart the selected row's task (subtask selection restarts the
    /// whole task, matching the card-level control)
    pub fn restart_selected(&mut self) {
        let Some((task_idx, _)) = self.selected_row() else {
            return;
        };
        let now = self.now_ms();
        let task_id = self.state.tasks[task_idx].id;
        self.state.restart_task(task_id, now);
        self.needs_save = true;
    }

    /// Delete the selected task or subtask
    pub fn delete_selected(&mut self) {
        let Some((task_idx, sub_idx)) = self.selected_row() else {
            return;
        };
        let now = self.now_ms();
        let task_id = self.state.tasks[task_idx].id;
        match sub_idx {
            Some(sub_idx) => {
                let sub_id = self.state.tasks[task_idx].subtasks[sub_idx].id;
                self.state.delete_subtask(task_id, sub_id, now);
            }
            None => self.state.delete_task(task_id, now),
        }
        self.clamp_selection();
        self.needs_save = true;
    }

    /// Toggle the pinned flag on the selected row's task
    pub fn pin_selected(&mut self) {
        let Some((task_idx, _)) = self.selected_row() else {
            return;
        };
        let task_id = self.state.tasks[task_idx].id;
        self.state.toggle_pinned(task_id);
        self.needs_save = true;
    }

    pub fn cycle_sort_mode(&mut self) {
        self.sort_mode = self.sort_mode.toggle();
        self.clamp_selection();
    }

    pub fn start_add_task(&mut self) {
        self.input_form = Some(InputFormState::new(false));
        self.ui_mode = UiMode::AddingTask;
    }

    /// Open the subtask form for the selected row's task
    pub fn start_add_subtask(&mut self) {
        if self.selected_row().is_none() {
            return;
        }
        self.input_form = Some(InputFormState::new(true));
        self.ui_mode = UiMode::AddingSubtask;
    }

    pub fn cancel_form(&mut self) {
        self.input_form = None;
        self.ui_mode = UiMode::Normal;
    }

    /// Submit the input form. An unparseable or non-positive hours goal is
    /// a silent validation no-op: nothing is created and the form stays
    /// open for correction.
    pub fn submit_form(&mut self) {
        let Some(form) = self.input_form.clone() else {
            return;
        };
        let hours_goal: f64 = form.hours_goal.trim().parse().unwrap_or(f64::NAN);
        let now = self.now_ms();

        let created = if form.is_subtask {
            match self.selected_row() {
                Some((task_idx, _)) => {
                    let task_id = self.state.tasks[task_idx].id;
                    self.state
                        .add_subtask(task_id, &form.name, hours_goal, now)
                        .is_some()
                }
                None => false,
            }
        } else {
            let daily_goal: f64 = form.daily_goal.trim().parse().unwrap_or(0.0);
            let goal_date = NaiveDate::parse_from_str(form.goal_date.trim(), "%Y-%m-%d").ok();
            self.state
                .create_task(&form.name, hours_goal, daily_goal, goal_date, form.urgency, now)
                .is_some()
        };

        if created {
            self.input_form = None;
            self.ui_mode = UiMode::Normal;
            self.needs_save = true;
        }
    }

    /// Show the analytics breakdown for the previous/next calendar day
    pub fn chart_prev_day(&mut self) {
        self.chart_date -= chrono::Duration::days(1);
    }

    pub fn chart_next_day(&mut self) {
        self.chart_date += chrono::Duration::days(1);
    }

    /// One loop iteration of background work: reconcile countdowns, fire
    /// notifications for fresh expiries, and drive the advice lifecycle.
    pub fn tick(&mut self) {
        let now = self.now_ms();
        let was_active = self
            .state
            .tasks
            .iter()
            .any(|t| t.running || t.has_running_subtasks());

        let expired = self.state.tick(now);
        for name in &expired {
            notifications::notify_countdown_finished(name);
        }
        if was_active {
            self.needs_save = true;
        }

        self.drive_advice();
    }

    /// Debounced, supersedable advice fetch: re-armed whenever the task
    /// count changes, fired once the delay passes, replies polled here
    fn drive_advice(&mut self) {
        let task_count = self.state.tasks.len();
        if task_count != self.last_task_count {
            self.last_task_count = task_count;
            self.advice_deadline = if task_count > 0 {
                Some(Instant::now() + ticker::advice_delay())
            } else {
                None
            };
        }

        if let Some(deadline) = self.advice_deadline {
            if Instant::now() >= deadline {
                self.advice_deadline = None;
                let summary = progress_summary(&self.state.tasks, &self.state.ledger);
                self.advice_fetcher.request(summary);
            }
        }

        if let Some(advice) = self.advice_fetcher.poll() {
            self.advice = Some(advice);
        }
    }

    /// Export a dated backup into the current directory and report its path
    pub fn export(&mut self) -> Result<PathBuf> {
        let name = export_file_name(Local::now().date_naive());
        let path = std::env::current_dir()?.join(name);
        export_state(&path, &self.state)?;
        Ok(path)
    }

    /// Persist the document to disk
    pub fn save(&mut self) -> Result<()> {
        save_state(&self.state_path, &self.state)?;
        self.needs_save = false;
        Ok(())
    }
}
