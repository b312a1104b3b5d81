pub mod enums;
pub mod log;
pub mod task;
pub mod views;

pub use enums::{SortMode, UiMode, Urgency};
pub use log::{Ledger, TimeLog};
pub use task::{hours_to_ms, Subtask, Task, MS_PER_HOUR};
pub use views::{
    flatten_tasks, format_full, format_hhmm, ms_to_hours, sorted_task_indices, tree_connector,
    FlatRow,
};
