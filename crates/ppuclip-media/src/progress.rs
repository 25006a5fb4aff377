//! Progress reporting from the engine's machine-readable output.

/// Key carrying elapsed output time in the `-progress` stream.
const OUT_TIME_KEY: &str = "out_time_ms";

/// Turns the engine's `-progress` stream into integer percent updates.
///
/// Lines are `key=value`; the only key of interest is `out_time_ms`, whose
/// value is in microseconds despite the name. Updates are clamped to 100,
/// deduplicated and never regress, so observers can render each one as-is.
#[derive(Debug, Clone)]
pub struct ProgressTracker {
    total_us: u64,
    current: Option<u8>,
}

impl ProgressTracker {
    /// Create a tracker for a clip of the given duration.
    pub fn new(duration_secs: u64) -> Self {
        Self {
            total_us: duration_secs.saturating_mul(1_000_000),
            current: None,
        }
    }

    /// Feed one line of progress output; returns the percent when it advances.
    ///
    /// The engine reports `N/A` and negative sentinels early in a run; an
    /// unparseable value is ignored rather than treated as zero.
    pub fn observe_line(&mut self, line: &str) -> Option<u8> {
        let (key, value) = line.trim().split_once('=')?;
        if key != OUT_TIME_KEY {
            return None;
        }
        let out_us: u64 = value.trim().parse().ok()?;

        let ratio = if self.total_us > 0 {
            (out_us as f64 / self.total_us as f64).min(1.0)
        } else {
            0.0
        };
        let percent = (ratio * 100.0) as u8;

        match self.current {
            Some(seen) if percent <= seen => None,
            _ => {
                self.current = Some(percent);
                Some(percent)
            }
        }
    }

    /// Last percent emitted, if any.
    pub fn percent(&self) -> Option<u8> {
        self.current
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn value_is_microseconds() {
        let mut tracker = ProgressTracker::new(2);
        assert_eq!(tracker.observe_line("out_time_ms=1000000"), Some(50));
    }

    #[test]
    fn first_reading_emits_even_zero() {
        let mut tracker = ProgressTracker::new(60);
        assert_eq!(tracker.observe_line("out_time_ms=0"), Some(0));
        assert_eq!(tracker.observe_line("out_time_ms=0"), None);
    }

    #[test]
    fn repeated_percent_is_swallowed() {
        let mut tracker = ProgressTracker::new(60);
        assert_eq!(tracker.observe_line("out_time_ms=30000000"), Some(50));
        assert_eq!(tracker.observe_line("out_time_ms=30100000"), None);
        assert_eq!(tracker.observe_line("out_time_ms=36000000"), Some(60));
    }

    #[test]
    fn stale_smaller_reading_never_regresses() {
        let mut tracker = ProgressTracker::new(60);
        assert_eq!(tracker.observe_line("out_time_ms=30000000"), Some(50));
        assert_eq!(tracker.observe_line("out_time_ms=12000000"), None);
        assert_eq!(tracker.percent(), Some(50));
    }

    #[test]
    fn clamps_past_the_requested_duration() {
        let mut tracker = ProgressTracker::new(10);
        assert_eq!(tracker.observe_line("out_time_ms=999999999"), Some(100));
        assert_eq!(tracker.observe_line("out_time_ms=1999999999"), None);
    }

    #[test]
    fn unrelated_keys_and_garbage_are_ignored() {
        let mut tracker = ProgressTracker::new(60);
        assert_eq!(tracker.observe_line("frame=120"), None);
        assert_eq!(tracker.observe_line("speed=1.5x"), None);
        assert_eq!(tracker.observe_line("progress=continue"), None);
        assert_eq!(tracker.observe_line("out_time_ms=N/A"), None);
        assert_eq!(tracker.observe_line("out_time_ms=-9223372036854775808"), None);
        assert_eq!(tracker.observe_line("no equals sign here"), None);
        assert_eq!(tracker.percent(), None);
    }

    #[test]
    fn well_formed_stream_yields_increasing_percents() {
        let mut tracker = ProgressTracker::new(60);
        let stream = [
            "out_time_ms=0",
            "progress=continue",
            "out_time_ms=15000000",
            "progress=continue",
            "out_time_ms=15000000",
            "out_time_ms=45000000",
            "out_time_ms=60000000",
            "progress=end",
        ];
        let emitted: Vec<u8> = stream
            .iter()
            .filter_map(|line| tracker.observe_line(line))
            .collect();
        assert_eq!(emitted, vec![0, 25, 75, 100]);
    }
}
