use std::time::Duration;

/// Nominal countdown reconciliation cadence in milliseconds. The tick uses
/// real elapsed time, so a late tick catches up rather than drifting.
pub const TICK_MS: u64 = 1_000;

/// Delay before asking the coach for advice after the task list changes
pub const ADVICE_DELAY_MS: u64 = 5_000;

/// Get tick duration
pub fn tick_duration() -> Duration {
    Duration::from_millis(TICK_MS)
}

/// Get the advice debounce delay
pub fn advice_delay() -> Duration {
    Duration::from_millis(ADVICE_DELAY_MS)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tick_duration() {
        assert_eq!(tick_duration(), Duration::from_millis(1_000));
    }

    #[test]
    fn test_advice_delay() {
        assert_eq!(advice_delay(), Duration::from_millis(5_000));
    }
}
