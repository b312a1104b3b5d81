use crate::domain::{Ledger, Subtask, Task, Urgency};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Name given to tasks created with a blank name field
const DEFAULT_TASK_NAME: &str = "New Objective";

/// The whole persisted document: the task list plus the time ledger.
///
/// Every mutation funnels through the operations below; nothing outside
/// this module flips run flags or touches the ledger directly. Each
/// operation takes the current instant explicitly so the state machine is
/// fully deterministic under test.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FocusState {
    #[serde(default)]
    pub tasks: Vec<Task>,
    #[serde(default, rename = "logs")]
    pub ledger: Ledger,
}

impl FocusState {
    pub fn new() -> Self {
        Self {
            tasks: Vec::new(),
            ledger: Ledger::new(),
        }
    }

    pub fn task(&self, task_id: Uuid) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == task_id)
    }

    fn task_mut(&mut self, task_id: Uuid) -> Option<&mut Task> {
        self.tasks.iter_mut().find(|t| t.id == task_id)
    }

    /// Create a task with a goal-derived countdown. Rejects a non-finite or
    /// non-positive hours goal as a silent no-op and returns None.
    pub fn create_task(
        &mut self,
        name: &str,
        hours_goal: f64,
        daily_goal: f64,
        goal_date: Option<NaiveDate>,
        urgency: Urgency,
        now: i64,
    ) -> Option<Uuid> {
        if !hours_goal.is_finite() || hours_goal <= 0.0 {
            return None;
        }
        let name = if name.trim().is_empty() {
            DEFAULT_TASK_NAME.to_string()
        } else {
            name.trim().to_string()
        };
        let daily_goal = if daily_goal.is_finite() && daily_goal > 0.0 {
            daily_goal
        } else {
            0.0
        };

        let task = Task::new(name, hours_goal, daily_goal, goal_date, urgency, now);
        let id = task.id;
        // Newest tasks surface at the top of the list
        self.tasks.insert(0, task);
        Some(id)
    }

    /// Append a subtask with the same countdown derivation. No-op if the
    /// task is missing or the hours goal is invalid.
    pub fn add_subtask(
        &mut self,
        task_id: Uuid,
        name: &str,
        hours_goal: f64,
        now: i64,
    ) -> Option<Uuid> {
        if !hours_goal.is_finite() || hours_goal <= 0.0 {
            return None;
        }
        let task = self.task_mut(task_id)?;
        let name = if name.trim().is_empty() {
            DEFAULT_TASK_NAME.to_string()
        } else {
            name.trim().to_string()
        };
        let subtask = Subtask::new(name, hours_goal, now);
        let id = subtask.id;
        task.subtasks.push(subtask);
        Some(id)
    }

    /// Pause/resume a task. Stopping cascades: every running subtask stops
    /// and its log closes along with the task-level log. Starting opens a
    /// task-level log. The countdown itself is untouched.
    pub fn toggle_task(&mut self, task_id: Uuid, now: i64) {
        let Some(task) = self.tasks.iter_mut().find(|t| t.id == task_id) else {
            return;
        };

        if task.running {
            self.ledger.close(task_id, None, now);
            for sub in &mut task.subtasks {
                if sub.running {
                    self.ledger.close(task_id, Some(sub.id), now);
                }
                sub.running = false;
                sub.last_updated = now;
            }
            task.running = false;
        } else {
            // A stale entry can linger after countdown expiry (expiry stops
            // the countdown without closing the log); close it so the
            // one-open-log-per-key precondition of open() holds
            self.ledger.close(task_id, None, now);
            self.ledger.open(task_id, None, now);
            task.running = true;
        }
        task.last_updated = now;
    }

    /// Toggle exactly one subtask, then resynchronize the parent: subtask
    /// activity starts the task (and its log) when the task was idle, and
    /// stops it (closing its log) when no subtask remains running.
    pub fn toggle_subtask(&mut self, task_id: Uuid, sub_id: Uuid, now: i64) {
        let Some(task) = self.tasks.iter_mut().find(|t| t.id == task_id) else {
            return;
        };
        let Some(sub) = task.subtasks.iter_mut().find(|s| s.id == sub_id) else {
            return;
        };

        if sub.running {
            self.ledger.close(task_id, Some(sub_id), now);
            sub.running = false;
        } else {
            // Clear any entry left open by countdown expiry first
            self.ledger.close(task_id, Some(sub_id), now);
            self.ledger.open(task_id, Some(sub_id), now);
            sub.running = true;
        }
        sub.last_updated = now;

        let some_running = task.subtasks.iter().any(|s| s.running);
        if some_running && !task.running {
            task.running = true;
            self.ledger.close(task_id, None, now);
            self.ledger.open(task_id, None, now);
        } else if !some_running && task.running {
            task.running = false;
            self.ledger.close(task_id, None, now);
        }
        task.last_updated = now;
    }

    /// Stop the task and all running subtasks (closing their logs) and
    /// reset every countdown to its goal-derived value. History is kept.
    pub fn restart_task(&mut self, task_id: Uuid, now: i64) {
        let Some(task) = self.tasks.iter_mut().find(|t| t.id == task_id) else {
            return;
        };

        if task.running {
            self.ledger.close(task_id, None, now);
        }
        for sub in &mut task.subtasks {
            if sub.running {
                self.ledger.close(task_id, Some(sub.id), now);
            }
            sub.reset(now);
        }
        task.reset(now);
    }

    /// Remove a task. Any open logs for it (task-level or subtask) are
    /// closed first, so deletion never leaves an orphan-open entry. The
    /// closed history survives and becomes orphaned.
    pub fn delete_task(&mut self, task_id: Uuid, now: i64) {
        let Some(index) = self.tasks.iter().position(|t| t.id == task_id) else {
            return;
        };

        self.ledger.close(task_id, None, now);
        for sub in &self.tasks[index].subtasks {
            self.ledger.close(task_id, Some(sub.id), now);
        }
        self.tasks.remove(index);
    }

    /// Remove a subtask, closing its open log first if it was running
    pub fn delete_subtask(&mut self, task_id: Uuid, sub_id: Uuid, now: i64) {
        let Some(task) = self.tasks.iter_mut().find(|t| t.id == task_id) else {
            return;
        };
        let Some(index) = task.subtasks.iter().position(|s| s.id == sub_id) else {
            return;
        };

        self.ledger.close(task_id, Some(sub_id), now);
        task.subtasks.remove(index);
    }

    /// Reconcile every running countdown against the clock. Returns the
    /// names of entities whose countdown just expired. Expiry clears the
    /// running flag but deliberately leaves the log open; closing is tied
    /// to explicit toggle/restart/delete actions only.
    pub fn tick(&mut self, now: i64) -> Vec<String> {
        let mut expired = Vec::new();
        for task in &mut self.tasks {
            if task.advance(now) {
                expired.push(task.name.clone());
            }
            for sub in &mut task.subtasks {
                if sub.advance(now) {
                    expired.push(sub.name.clone());
                }
            }
        }
        expired
    }

    /// Flip a task's pinned flag (sort precedence)
    pub fn toggle_pinned(&mut self, task_id: Uuid) {
        if let Some(task) = self.task_mut(task_id) {
            task.pinned = !task.pinned;
        }
    }

    /// Replace the whole document (import)
    pub fn replace(&mut self, other: FocusState) {
        *self = other;
    }
}
