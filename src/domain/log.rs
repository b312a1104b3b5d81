use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One recorded start/stop interval of focused work.
///
/// `subtask_id = None` means the interval was logged against the task
/// itself. Entries are immutable once closed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeLog {
    pub id: Uuid,
    pub task_id: Uuid,
    pub subtask_id: Option<Uuid>,
    pub start_ts: i64,
    pub end_ts: Option<i64>,
}

impl TimeLog {
    pub fn is_open(&self) -> bool {
        self.end_ts.is_none()
    }

    /// Duration of a closed interval; None while still open
    pub fn duration_ms(&self) -> Option<i64> {
        self.end_ts.map(|end| end - self.start_ts)
    }
}

/// Append-only collection of start/stop intervals.
///
/// Invariant (maintained by the engine, not re-validated here): at most one
/// open entry exists per distinct (task, subtask-or-none) key at any
/// instant. Entries are never mutated after closing and never deleted
/// except by wholesale state replacement.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Ledger {
    entries: Vec<TimeLog>,
}

impl Ledger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a new open entry for the key.
    ///
    /// Precondition: the caller guarantees no open entry already exists for
    /// this key.
    pub fn open(&mut self, task_id: Uuid, subtask_id: Option<Uuid>, now: i64) {
        self.entries.push(TimeLog {
            id: Uuid::new_v4(),
            task_id,
            subtask_id,
            start_ts: now,
            end_ts: None,
        });
    }

    /// Close the open entry for the key. No-op if none exists; toggle
    /// operations may be invoked defensively on already-consistent state.
    pub fn close(&mut self, task_id: Uuid, subtask_id: Option<Uuid>, now: i64) {
        if let Some(entry) = self
            .entries
            .iter_mut()
            .find(|l| l.task_id == task_id && l.subtask_id == subtask_id && l.end_ts.is_none())
        {
            entry.end_ts = Some(now);
        }
    }

    pub fn entries(&self) -> &[TimeLog] {
        &self.entries
    }

    pub fn open_entry(&self, task_id: Uuid, subtask_id: Option<Uuid>) -> Option<&TimeLog> {
        self.entries
            .iter()
            .find(|l| l.task_id == task_id && l.subtask_id == subtask_id && l.end_ts.is_none())
    }

    pub fn open_count(&self) -> usize {
        self.entries.iter().filter(|l| l.is_open()).count()
    }

    /// All-time closed duration logged against a task (any subtask key)
    pub fn logged_ms_for_task(&self, task_id: Uuid) -> i64 {
        self.entries
            .iter()
            .filter(|l| l.task_id == task_id)
            .filter_map(|l| l.duration_ms())
            .sum()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
