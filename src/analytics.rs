//! Pure, read-only aggregation over the task list and time ledger.
//!
//! Everything here is recomputed on demand from closed ledger intervals; an
//! in-progress session contributes nothing until its log is closed.

use crate::domain::{hours_to_ms, ms_to_hours, Ledger, Task, TimeLog};
use chrono::{Datelike, Duration, Local, NaiveDate, NaiveTime, TimeZone};
use serde::Serialize;
use uuid::Uuid;

/// Total focused time in the three reporting windows, in milliseconds
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct WindowTotals {
    pub today_ms: i64,
    pub week_ms: i64,
    pub month_ms: i64,
}

/// One day of the 7-day trend
#[derive(Debug, Clone, PartialEq)]
pub struct TrendPoint {
    pub date: NaiveDate,
    pub hours: f64,
}

/// Per-task pacing for a selected calendar date
#[derive(Debug, Clone, PartialEq)]
pub struct BreakdownRow {
    pub task_id: Uuid,
    pub name: String,
    pub actual_hours: f64,
    pub daily_goal: f64,
    pub needed_today: f64,
    pub on_track: bool,
}

/// Per-task progress summary handed to the advice gateway
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TaskProgress {
    pub name: String,
    pub goal: f64,
    pub actual: f64,
    pub remaining: f64,
}

/// Epoch-ms instant of local midnight at the start of a calendar day
pub fn day_start_ms(date: NaiveDate) -> i64 {
    let naive = date.and_time(NaiveTime::MIN);
    match Local.from_local_datetime(&naive).earliest() {
        Some(dt) => dt.timestamp_millis(),
        // Midnight falls in a DST gap; treat the day as starting in UTC
        None => naive.and_utc().timestamp_millis(),
    }
}

fn day_end_ms(date: NaiveDate) -> i64 {
    day_start_ms(date + Duration::days(1))
}

/// Portion of a closed log's interval inside `[window_start, window_end)`
fn clipped_overlap_ms(log: &TimeLog, window_start: i64, window_end: i64) -> i64 {
    let Some(end_ts) = log.end_ts else {
        return 0;
    };
    let start = log.start_ts.max(window_start);
    let end = end_ts.min(window_end);
    (end - start).max(0)
}

/// Sum closed-log durations for the today / last-7-days / this-month
/// windows. A log counts toward a window when its start falls at or after
/// the window start.
pub fn window_totals(ledger: &Ledger, today: NaiveDate) -> WindowTotals {
    let today_start = day_start_ms(today);
    let week_start = day_start_ms(today - Duration::days(7));
    let month_start = day_start_ms(today.with_day(1).unwrap_or(today));

    let mut totals = WindowTotals::default();
    for log in ledger.entries() {
        let Some(duration) = log.duration_ms() else {
            continue;
        };
        if log.start_ts >= today_start {
            totals.today_ms += duration;
        }
        if log.start_ts >= week_start {
            totals.week_ms += duration;
        }
        if log.start_ts >= month_start {
            totals.month_ms += duration;
        }
    }
    totals
}

/// Hours of focused time for each of the last 7 calendar days (today
/// inclusive, oldest first). Every closed log is clipped to each day it
/// overlaps, so a session spanning midnight contributes to both days.
pub fn seven_day_trend(ledger: &Ledger, today: NaiveDate) -> Vec<TrendPoint> {
    (0..7)
        .rev()
        .map(|offset| {
            let date = today - Duration::days(offset);
            let start = day_start_ms(date);
            let end = day_end_ms(date);
            let total_ms: i64 = ledger
                .entries()
                .iter()
                .map(|log| clipped_overlap_ms(log, start, end))
                .sum();
            TrendPoint {
                date,
                hours: ms_to_hours(total_ms),
            }
        })
        .collect()
}

/// Per-task actual-vs-needed pacing for one calendar date.
///
/// "Needed today" spreads the remaining project hours evenly over the days
/// until the goal date; a goal date that is not in the future demands the
/// full remainder, and no goal date demands nothing. A task is on track
/// when its actual hours reach the stricter of the explicit daily goal and
/// the computed need. Orphaned logs drop out here because only live tasks
/// are iterated.
pub fn daily_breakdown(
    tasks: &[Task],
    ledger: &Ledger,
    date: NaiveDate,
    today: NaiveDate,
) -> Vec<BreakdownRow> {
    let start = day_start_ms(date);
    let end = day_end_ms(date);

    tasks
        .iter()
        .map(|task| {
            let actual_ms: i64 = ledger
                .entries()
                .iter()
                .filter(|log| log.task_id == task.id)
                .map(|log| clipped_overlap_ms(log, start, end))
                .sum();
            let actual_hours = ms_to_hours(actual_ms);

            let needed_today = match task.goal_date {
                Some(goal_date) => {
                    let logged = ledger.logged_ms_for_task(task.id);
                    let remaining = (hours_to_ms(task.hours_goal) - logged).max(0);
                    let days_left = (goal_date - today).num_days();
                    if days_left > 0 {
                        ms_to_hours(remaining / days_left)
                    } else {
                        ms_to_hours(remaining)
                    }
                }
                None => 0.0,
            };

            let on_track = actual_hours >= task.daily_goal.max(needed_today);
            BreakdownRow {
                task_id: task.id,
                name: task.name.clone(),
                actual_hours,
                daily_goal: task.daily_goal,
                needed_today,
                on_track,
            }
        })
        .collect()
}

/// Ordered per-task `{name, goal, actual, remaining}` summary for the
/// advice gateway, hours at two decimals
pub fn progress_summary(tasks: &[Task], ledger: &Ledger) -> Vec<TaskProgress> {
    tasks
        .iter()
        .map(|task| TaskProgress {
            name: task.name.clone(),
            goal: task.hours_goal,
            actual: ms_to_hours(ledger.logged_ms_for_task(task.id)),
            remaining: ms_to_hours(task.remaining_ms),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Urgency;
    use pretty_assertions::assert_eq;

    const MINUTE_MS: i64 = 60_000;

    fn reference_day() -> NaiveDate {
        // Mid-month so the week window stays inside the month window
        NaiveDate::from_ymd_opt(2026, 8, 20).unwrap()
    }

    fn closed_log(ledger: &mut Ledger, task: Uuid, start: i64, end: i64) {
        ledger.open(task, None, start);
        ledger.close(task, None, end);
    }

    #[test]
    fn test_window_totals_single_closed_log_today() {
        let today = reference_day();
        let task = Uuid::new_v4();
        let mut ledger = Ledger::new();
        let base = day_start_ms(today) + 9 * 60 * MINUTE_MS; // 09:00
        closed_log(&mut ledger, task, base, base + 90 * MINUTE_MS);

        let totals = window_totals(&ledger, today);
        assert_eq!(totals.today_ms, 90 * MINUTE_MS);
        assert_eq!(totals.week_ms, 90 * MINUTE_MS);
        assert_eq!(totals.month_ms, 90 * MINUTE_MS);
    }

    #[test]
    fn test_window_totals_exclude_open_and_bucket_by_start() {
        let today = reference_day();
        let task = Uuid::new_v4();
        let mut ledger = Ledger::new();

        // Yesterday: in week + month, not today
        let yesterday = day_start_ms(today - Duration::days(1)) + 60 * MINUTE_MS;
        closed_log(&mut ledger, task, yesterday, yesterday + 30 * MINUTE_MS);

        // Ten days ago: in month only
        let older = day_start_ms(today - Duration::days(10)) + 60 * MINUTE_MS;
        closed_log(&mut ledger, task, older, older + 60 * MINUTE_MS);

        // Open log contributes nothing anywhere
        ledger.open(task, None, day_start_ms(today) + 60 * MINUTE_MS);

        let totals = window_totals(&ledger, today);
        assert_eq!(totals.today_ms, 0);
        assert_eq!(totals.week_ms, 30 * MINUTE_MS);
        assert_eq!(totals.month_ms, 90 * MINUTE_MS);
    }

    #[test]
    fn test_trend_clips_across_midnight() {
        let today = reference_day();
        let task = Uuid::new_v4();
        let mut ledger = Ledger::new();

        // 23:30 yesterday to 00:30 today: 30 minutes on each side
        let midnight = day_start_ms(today);
        closed_log(
            &mut ledger,
            task,
            midnight - 30 * MINUTE_MS,
            midnight + 30 * MINUTE_MS,
        );

        let trend = seven_day_trend(&ledger, today);
        assert_eq!(trend.len(), 7);
        assert_eq!(trend[6].date, today);
        assert_eq!(trend[6].hours, 0.5);
        assert_eq!(trend[5].date, today - Duration::days(1));
        assert_eq!(trend[5].hours, 0.5);
        assert_eq!(trend[0].hours, 0.0);
    }

    #[test]
    fn test_trend_is_oldest_first_and_day_bounded() {
        let today = reference_day();
        let task = Uuid::new_v4();
        let mut ledger = Ledger::new();

        let base = day_start_ms(today - Duration::days(6)) + 8 * 60 * MINUTE_MS;
        closed_log(&mut ledger, task, base, base + 120 * MINUTE_MS);

        let trend = seven_day_trend(&ledger, today);
        assert_eq!(trend[0].date, today - Duration::days(6));
        assert_eq!(trend[0].hours, 2.0);
        assert!(trend[1..].iter().all(|p| p.hours == 0.0));
    }

    #[test]
    fn test_needed_today_spreads_remaining_over_days_left() {
        let today = reference_day();
        let mut task = Task::new("T".to_string(), 10.0, 0.0, None, Urgency::Medium, 0);
        task.goal_date = Some(today + Duration::days(4));

        let mut ledger = Ledger::new();
        // 2 hours logged a week ago, outside the selected day
        let old = day_start_ms(today - Duration::days(7)) + 60 * MINUTE_MS;
        closed_log(&mut ledger, task.id, old, old + 120 * MINUTE_MS);

        let rows = daily_breakdown(&[task], &ledger, today, today);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].needed_today, 2.0); // (10 - 2) / 4
        assert_eq!(rows[0].actual_hours, 0.0);
        assert!(!rows[0].on_track);
    }

    #[test]
    fn test_needed_today_past_goal_date_demands_full_remainder() {
        let today = reference_day();
        let mut task = Task::new("T".to_string(), 3.0, 0.0, None, Urgency::Medium, 0);
        task.goal_date = Some(today - Duration::days(1));

        let mut ledger = Ledger::new();
        let base = day_start_ms(today) + 60 * MINUTE_MS;
        closed_log(&mut ledger, task.id, base, base + 60 * MINUTE_MS);

        let rows = daily_breakdown(&[task], &ledger, today, today);
        assert_eq!(rows[0].needed_today, 2.0); // 3h goal - 1h logged
        assert_eq!(rows[0].actual_hours, 1.0);
        assert!(!rows[0].on_track);
    }

    #[test]
    fn test_on_track_uses_stricter_of_daily_goal_and_needed() {
        let today = reference_day();
        let mut task = Task::new("T".to_string(), 10.0, 1.0, None, Urgency::Medium, 0);
        task.goal_date = Some(today + Duration::days(2));

        let mut ledger = Ledger::new();
        // 1.5 hours today: above the 1.0 daily goal, below needed (10/2 = 5)
        let base = day_start_ms(today) + 60 * MINUTE_MS;
        closed_log(&mut ledger, task.id, base, base + 90 * MINUTE_MS);

        let rows = daily_breakdown(&[task], &ledger, today, today);
        assert_eq!(rows[0].actual_hours, 1.5);
        assert!(rows[0].needed_today > rows[0].daily_goal);
        assert!(!rows[0].on_track);

        // With no goal date, the 1.0 daily goal alone decides
        let mut task2 = Task::new("U".to_string(), 10.0, 1.0, None, Urgency::Medium, 0);
        task2.id = ledger.entries()[0].task_id;
        let rows2 = daily_breakdown(&[task2], &ledger, today, today);
        assert!(rows2[0].on_track);
    }

    #[test]
    fn test_breakdown_without_goals_is_always_on_track() {
        let today = reference_day();
        let task = Task::new("T".to_string(), 5.0, 0.0, None, Urgency::Low, 0);
        let ledger = Ledger::new();

        let rows = daily_breakdown(&[task], &ledger, today, today);
        assert_eq!(rows[0].needed_today, 0.0);
        assert!(rows[0].on_track);
    }

    #[test]
    fn test_orphaned_logs_count_in_totals_but_not_breakdown() {
        let today = reference_day();
        let live = Task::new("live".to_string(), 1.0, 0.0, None, Urgency::Low, 0);
        let mut ledger = Ledger::new();

        let orphan_task = Uuid::new_v4(); // deleted long ago
        let base = day_start_ms(today) + 60 * MINUTE_MS;
        closed_log(&mut ledger, orphan_task, base, base + 60 * MINUTE_MS);

        let totals = window_totals(&ledger, today);
        assert_eq!(totals.today_ms, 60 * MINUTE_MS);

        let rows = daily_breakdown(&[live], &ledger, today, today);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].actual_hours, 0.0);
    }

    #[test]
    fn test_progress_summary_shape() {
        let mut task = Task::new("T".to_string(), 4.0, 0.0, None, Urgency::Medium, 0);
        task.remaining_ms = hours_to_ms(3.0);
        let mut ledger = Ledger::new();
        closed_log(&mut ledger, task.id, 0, hours_to_ms(1.0));

        let summary = progress_summary(&[task], &ledger);
        assert_eq!(summary.len(), 1);
        assert_eq!(summary[0].goal, 4.0);
        assert_eq!(summary[0].actual, 1.0);
        assert_eq!(summary[0].remaining, 3.0);
    }
}
