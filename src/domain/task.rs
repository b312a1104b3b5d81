use super::enums::Urgency;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Milliseconds in one hour
pub const MS_PER_HOUR: i64 = 3_600_000;

/// Convert an hours goal to countdown milliseconds
pub fn hours_to_ms(hours: f64) -> i64 {
    (hours * MS_PER_HOUR as f64).round() as i64
}

/// Advance a running countdown by real elapsed wall-clock time.
///
/// Uses the gap since `last_updated` rather than a fixed decrement, so a
/// delayed or skipped tick simply catches up on the next call. Returns true
/// when the countdown reached zero on this call (which also clears the
/// running flag). A countdown already at zero is left untouched.
fn advance_countdown(
    running: &mut bool,
    remaining_ms: &mut i64,
    last_updated: &mut i64,
    now: i64,
) -> bool {
    if !*running || *remaining_ms <= 0 {
        return false;
    }
    let elapsed = now - *last_updated;
    if elapsed <= 0 {
        return false;
    }
    *remaining_ms = (*remaining_ms - elapsed).max(0);
    *last_updated = now;
    if *remaining_ms == 0 {
        *running = false;
        return true;
    }
    false
}

/// A timed sub-unit of a task with its own independent countdown
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Subtask {
    pub id: Uuid,
    pub name: String,
    pub hours_goal: f64,
    pub running: bool,
    pub remaining_ms: i64,
    pub last_updated: i64,
}

impl Subtask {
    pub fn new(name: String, hours_goal: f64, now: i64) -> Self {
        Self {
            id: Uuid::new_v4(),
            name,
            hours_goal,
            running: false,
            remaining_ms: hours_to_ms(hours_goal),
            last_updated: now,
        }
    }

    /// Reconcile the countdown against the clock; true if it just expired
    pub fn advance(&mut self, now: i64) -> bool {
        advance_countdown(
            &mut self.running,
            &mut self.remaining_ms,
            &mut self.last_updated,
            now,
        )
    }

    /// Reset the countdown to its goal-derived value and stop
    pub fn reset(&mut self, now: i64) {
        self.running = false;
        self.remaining_ms = hours_to_ms(self.hours_goal);
        self.last_updated = now;
    }

    /// Fraction of the countdown consumed (0.0 to 1.0)
    pub fn progress_ratio(&self) -> f64 {
        let goal_ms = hours_to_ms(self.hours_goal);
        if goal_ms <= 0 {
            return 1.0;
        }
        1.0 - self.remaining_ms as f64 / goal_ms as f64
    }

    pub fn is_expired(&self) -> bool {
        self.remaining_ms == 0
    }
}

/// A user-defined focus goal with a total target duration and countdown
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: Uuid,
    pub name: String,
    pub hours_goal: f64,
    #[serde(default)]
    pub daily_goal: f64,
    #[serde(default)]
    pub goal_date: Option<NaiveDate>,
    #[serde(default)]
    pub urgency: Urgency,
    pub running: bool,
    pub remaining_ms: i64,
    pub last_updated: i64,
    #[serde(default)]
    pub subtasks: Vec<Subtask>,
    #[serde(default)]
    pub pinned: bool,
    #[serde(default)]
    pub notes: String,
}

impl Task {
    pub fn new(
        name: String,
        hours_goal: f64,
        daily_goal: f64,
        goal_date: Option<NaiveDate>,
        urgency: Urgency,
        now: i64,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            name,
            hours_goal,
            daily_goal,
            goal_date,
            urgency,
            running: false,
            remaining_ms: hours_to_ms(hours_goal),
            last_updated: now,
            subtasks: Vec::new(),
            pinned: false,
            notes: String::new(),
        }
    }

    /// Reconcile the task's own countdown; true if it just expired.
    /// Subtask countdowns are advanced separately by the engine tick.
    pub fn advance(&mut self, now: i64) -> bool {
        advance_countdown(
            &mut self.running,
            &mut self.remaining_ms,
            &mut self.last_updated,
            now,
        )
    }

    /// Reset the countdown to its goal-derived value and stop
    pub fn reset(&mut self, now: i64) {
        self.running = false;
        self.remaining_ms = hours_to_ms(self.hours_goal);
        self.last_updated = now;
    }

    /// Pure activity query: the task counts as active while it or any of
    /// its subtasks is running. Derived on demand, never stored.
    pub fn is_active(&self) -> bool {
        self.running || self.subtasks.iter().any(|s| s.running)
    }

    pub fn has_running_subtasks(&self) -> bool {
        self.subtasks.iter().any(|s| s.running)
    }

    pub fn subtask(&self, sub_id: Uuid) -> Option<&Subtask> {
        self.subtasks.iter().find(|s| s.id == sub_id)
    }

    /// Fraction of the countdown consumed (0.0 to 1.0)
    pub fn progress_ratio(&self) -> f64 {
        let goal_ms = hours_to_ms(self.hours_goal);
        if goal_ms <= 0 {
            return 1.0;
        }
        1.0 - self.remaining_ms as f64 / goal_ms as f64
    }

    pub fn is_expired(&self) -> bool {
        self.remaining_ms == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hours_to_ms() {
        assert_eq!(hours_to_ms(1.0), 3_600_000);
        assert_eq!(hours_to_ms(0.5), 1_800_000);
        assert_eq!(hours_to_ms(2.5), 9_000_000);
    }

    #[test]
    fn test_task_new_derives_remaining() {
        let task = Task::new("Learn Rust".to_string(), 2.0, 0.5, None, Urgency::High, 1_000);
        assert_eq!(task.remaining_ms, 2 * MS_PER_HOUR);
        assert!(!task.running);
        assert_eq!(task.last_updated, 1_000);
        assert!(task.subtasks.is_empty());
        assert!(!task.pinned);
    }

    #[test]
    fn test_advance_is_monotonic_and_non_negative() {
        let mut task = Task::new("T".to_string(), 1.0, 0.0, None, Urgency::Medium, 0);
        task.running = true;

        let mut previous = task.remaining_ms;
        for now in [1_000, 5_000, 5_000, 120_000, 3_600_000, 7_200_000] {
            task.advance(now);
            assert!(task.remaining_ms <= previous);
            assert!(task.remaining_ms >= 0);
            previous = task.remaining_ms;
        }
        assert_eq!(task.remaining_ms, 0);
        assert!(!task.running);
    }

    #[test]
    fn test_advance_ignores_clock_going_backwards() {
        let mut task = Task::new("T".to_string(), 1.0, 0.0, None, Urgency::Medium, 10_000);
        task.running = true;

        task.advance(5_000);
        assert_eq!(task.remaining_ms, MS_PER_HOUR);
        assert_eq!(task.last_updated, 10_000);
    }

    #[test]
    fn test_expiry_is_idempotent() {
        let mut task = Task::new("T".to_string(), 1.0, 0.0, None, Urgency::Medium, 0);
        task.running = true;

        assert!(task.advance(2 * MS_PER_HOUR));
        assert_eq!(task.remaining_ms, 0);
        assert!(!task.running);

        // Further ticks leave it at zero, even if re-started
        assert!(!task.advance(3 * MS_PER_HOUR));
        task.running = true;
        assert!(!task.advance(4 * MS_PER_HOUR));
        assert_eq!(task.remaining_ms, 0);
    }

    #[test]
    fn test_reset_restores_goal_and_stops() {
        let mut task = Task::new("T".to_string(), 2.0, 0.0, None, Urgency::Medium, 0);
        task.running = true;
        task.advance(MS_PER_HOUR);

        task.reset(MS_PER_HOUR);
        assert_eq!(task.remaining_ms, 2 * MS_PER_HOUR);
        assert!(!task.running);
        assert_eq!(task.last_updated, MS_PER_HOUR);
    }

    #[test]
    fn test_is_active_covers_subtask_activity() {
        let mut task = Task::new("T".to_string(), 1.0, 0.0, None, Urgency::Medium, 0);
        assert!(!task.is_active());

        task.subtasks.push(Subtask::new("S".to_string(), 0.5, 0));
        task.subtasks[0].running = true;
        assert!(task.is_active());

        task.subtasks[0].running = false;
        task.running = true;
        assert!(task.is_active());
    }

    #[test]
    fn test_subtask_advance_independent_of_parent() {
        let mut task = Task::new("T".to_string(), 1.0, 0.0, None, Urgency::Medium, 0);
        task.subtasks.push(Subtask::new("S".to_string(), 1.0, 0));
        task.subtasks[0].running = true;

        task.advance(60_000);
        assert_eq!(task.remaining_ms, MS_PER_HOUR); // parent not running

        task.subtasks[0].advance(60_000);
        assert_eq!(task.subtasks[0].remaining_ms, MS_PER_HOUR - 60_000);
    }

    #[test]
    fn test_task_serializes_camel_case() {
        let task = Task::new("T".to_string(), 1.0, 0.0, None, Urgency::Low, 42);
        let json = serde_json::to_value(&task).unwrap();
        assert!(json.get("hoursGoal").is_some());
        assert!(json.get("dailyGoal").is_some());
        assert!(json.get("remainingMs").is_some());
        assert!(json.get("lastUpdated").is_some());
        assert!(json.get("goalDate").is_some());
        assert_eq!(json["urgency"], "low");
    }
}
