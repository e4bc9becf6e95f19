//! Overall time-progress derivation.

/// Derived time-progress state, recomputed on every tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimeProgress {
    /// Seconds elapsed since the start, floored at 0 for display.
    pub elapsed: u64,
    /// Seconds left of the planned duration, floored at 0.
    pub remaining: u64,
    /// Percent complete, always in `[0, 100]`.
    pub percent: f32,
    /// True once the elapsed time exceeds the planned duration.
    pub overtime: bool,
}

impl TimeProgress {
    /// Derive the snapshot for the instant `now_ms`.
    ///
    /// `current_time` is an externally synchronized clock sample; when
    /// present it replaces the local `now_ms` and may move backwards
    /// between ticks. A planned duration of 0 reports 100% immediately.
    pub fn compute(
        start_time: i64,
        planned_duration: u64,
        current_time: Option<i64>,
        now_ms: i64,
    ) -> Self {
        let effective = current_time.unwrap_or(now_ms);
        // The raw value keeps its sign: a start in the future yields a
        // negative elapsed, which still feeds the `remaining` subtraction.
        let raw_elapsed = (effective - start_time).div_euclid(1000);
        let elapsed = raw_elapsed.max(0) as u64;
        let remaining = (planned_duration as i64 - raw_elapsed).max(0) as u64;
        let percent = if planned_duration == 0 {
            100.0
        } else {
            (elapsed as f32 / planned_duration as f32 * 100.0).min(100.0)
        };
        Self {
            elapsed,
            remaining,
            percent,
            overtime: elapsed > planned_duration,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mid_progress() {
        // 30s into a 120s plan
        let p = TimeProgress::compute(0, 120, None, 30_000);
        assert_eq!(p.elapsed, 30);
        assert_eq!(p.remaining, 90);
        assert!((p.percent - 25.0).abs() < 1e-4);
        assert!(!p.overtime);
    }

    #[test]
    fn test_elapsed_is_floored() {
        let p = TimeProgress::compute(0, 120, None, 30_999);
        assert_eq!(p.elapsed, 30);
    }

    #[test]
    fn test_not_yet_started() {
        // Start lies 45s in the future: elapsed clamps to 0 but the
        // remaining keeps counting through the pre-roll.
        let p = TimeProgress::compute(45_000, 120, None, 0);
        assert_eq!(p.elapsed, 0);
        assert_eq!(p.remaining, 165);
        assert_eq!(p.percent, 0.0);
        assert!(!p.overtime);
    }

    #[test]
    fn test_overtime() {
        let p = TimeProgress::compute(0, 120, None, 121_000);
        assert_eq!(p.elapsed, 121);
        assert_eq!(p.remaining, 0);
        assert_eq!(p.percent, 100.0);
        assert!(p.overtime);
    }

    #[test]
    fn test_exactly_at_end_is_not_overtime() {
        let p = TimeProgress::compute(0, 120, None, 120_000);
        assert_eq!(p.remaining, 0);
        assert_eq!(p.percent, 100.0);
        assert!(!p.overtime);
    }

    #[test]
    fn test_zero_planned_duration() {
        let p = TimeProgress::compute(0, 0, None, 0);
        assert_eq!(p.percent, 100.0);
        assert!(!p.overtime);

        let p = TimeProgress::compute(0, 0, None, 1_000);
        assert_eq!(p.percent, 100.0);
        assert!(p.overtime);
    }

    #[test]
    fn test_current_time_override() {
        // The synchronized sample wins over the local clock.
        let p = TimeProgress::compute(0, 120, Some(60_000), 10_000);
        assert_eq!(p.elapsed, 60);
        assert_eq!(p.remaining, 60);
    }

    #[test]
    fn test_percent_bounds() {
        for now in (0..400_000).step_by(7_000) {
            let p = TimeProgress::compute(50_000, 120, None, now);
            assert!((0.0..=100.0).contains(&p.percent), "percent out of range at {now}");
        }
    }

    #[test]
    fn test_idempotent() {
        let a = TimeProgress::compute(1_000, 300, Some(42_000), 99_000);
        let b = TimeProgress::compute(1_000, 300, Some(42_000), 99_000);
        assert_eq!(a, b);
    }
}
