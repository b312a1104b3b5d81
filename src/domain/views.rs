use super::enums::SortMode;
use super::task::{Task, MS_PER_HOUR};

/// A flattened row for rendering the task list
#[derive(Debug, Clone)]
pub struct FlatRow {
    /// Index in the flattened list
    pub index: usize,
    /// Depth in the tree (0 = task, 1 = subtask)
    pub depth: usize,
    /// Whether this is the last subtask of its parent
    pub is_last: bool,
    /// Index into the tasks array
    pub task_index: usize,
    /// Subtask index (None for task rows)
    pub subtask_index: Option<usize>,
}

/// Display order of task indices: pinned tasks first, then by urgency
/// weight when sorting by urgency. Sorting is stable so insertion order
/// breaks ties.
pub fn sorted_task_indices(tasks: &[Task], mode: SortMode) -> Vec<usize> {
    let mut indices: Vec<usize> = (0..tasks.len()).collect();
    indices.sort_by_key(|&i| {
        let task = &tasks[i];
        let urgency = match mode {
            SortMode::Urgency => task.urgency.weight(),
            SortMode::Insertion => 0,
        };
        (!task.pinned, urgency)
    });
    indices
}

/// Flatten the task list into linear rows in display order
pub fn flatten_tasks(tasks: &[Task], mode: SortMode) -> Vec<FlatRow> {
    let mut rows = Vec::new();
    let mut flat_index = 0;

    for task_idx in sorted_task_indices(tasks, mode) {
        rows.push(FlatRow {
            index: flat_index,
            depth: 0,
            is_last: false,
            task_index: task_idx,
            subtask_index: None,
        });
        flat_index += 1;

        let subtask_count = tasks[task_idx].subtasks.len();
        for st_idx in 0..subtask_count {
            rows.push(FlatRow {
                index: flat_index,
                depth: 1,
                is_last: st_idx == subtask_count - 1,
                task_index: task_idx,
                subtask_index: Some(st_idx),
            });
            flat_index += 1;
        }
    }

    rows
}

/// Format milliseconds as "HH:MM:SS" (clamped at zero)
pub fn format_full(ms: i64) -> String {
    let mut total_seconds = (ms / 1_000).max(0);
    let hours = total_seconds / 3_600;
    total_seconds %= 3_600;
    let minutes = total_seconds / 60;
    let seconds = total_seconds % 60;
    format!("{:02}:{:02}:{:02}", hours, minutes, seconds)
}

/// Format milliseconds as "HH:MM"
pub fn format_hhmm(ms: i64) -> String {
    let total_minutes = (ms / 60_000).max(0);
    format!("{:02}:{:02}", total_minutes / 60, total_minutes % 60)
}

/// Convert milliseconds to hours rounded to 2 decimal places
pub fn ms_to_hours(ms: i64) -> f64 {
    (ms as f64 / MS_PER_HOUR as f64 * 100.0).round() / 100.0
}

/// Tree connector for subtask rows
pub fn tree_connector(is_last: bool) -> &'static str {
    if is_last {
        "└─"
    } else {
        "├─"
    }
}
