use std::time::Instant;
use tracing::debug;

/// A cumulative counter reading and when it was taken.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CounterSnapshot {
    pub value:       u64,
    pub observed_at: Instant,
}

/// Derives a per-second rate from a monotonically increasing counter.
///
/// A counter that goes backwards (interface restart, wraparound, provider
/// swap) reports `0` for that one call; tracking resumes from the new
/// baseline on the next.  No wraparound correction is attempted.
#[derive(Debug, Clone, Default)]
pub struct RateTracker {
    last: Option<CounterSnapshot>,
}

impl RateTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `value` observed at `now` and return units/second since the
    /// previous call.
    ///
    /// Returns `0` on the first call, when no time has passed, and when the
    /// counter decreased.  The baseline is replaced on every call.
    pub fn sample(&mut self, value: u64, now: Instant) -> f64 {
        let current = CounterSnapshot { value, observed_at: now };
        let Some(previous) = self.last.replace(current) else {
            return 0.0;
        };

        let elapsed = now.saturating_duration_since(previous.observed_at).as_secs_f64();
        if elapsed <= 0.0 {
            return 0.0;
        }

        match value.checked_sub(previous.value) {
            Some(delta) => delta as f64 / elapsed,
            None => {
                debug!(
                    previous = previous.value,
                    current = value,
                    "counter went backwards; reporting zero rate"
                );
                0.0
            }
        }
    }

    /// The baseline the next call will difference against.
    pub fn last(&self) -> Option<CounterSnapshot> {
        self.last
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn first_call_is_zero_regardless_of_value() {
        let mut r = RateTracker::new();
        assert_eq!(r.sample(u64::MAX, Instant::now()), 0.0);
    }

    #[test]
    fn counter_reset_scenario() {
        let t0 = Instant::now();
        let mut r = RateTracker::new();
        assert_eq!(r.sample(1_000, t0), 0.0);
        assert_eq!(r.sample(2_024, t0 + Duration::from_secs(1)), 1_024.0);
        assert_eq!(r.sample(1_500, t0 + Duration::from_secs(2)), 0.0);
        // Tracking resumes from the post-reset baseline.
        assert_eq!(r.sample(1_600, t0 + Duration::from_secs(3)), 100.0);
    }

    #[test]
    fn divides_by_elapsed_seconds() {
        let t0 = Instant::now();
        let mut r = RateTracker::new();
        r.sample(0, t0);
        assert_eq!(r.sample(500, t0 + Duration::from_millis(500)), 1_000.0);
    }

    #[test]
    fn zero_elapsed_is_zero_and_updates_baseline() {
        let t0 = Instant::now();
        let mut r = RateTracker::new();
        r.sample(100, t0);
        assert_eq!(r.sample(900, t0), 0.0);
        assert_eq!(r.last().map(|s| s.value), Some(900));
        assert_eq!(r.sample(1_000, t0 + Duration::from_secs(1)), 100.0);
    }

    #[test]
    fn never_negative() {
        let t0 = Instant::now();
        let mut r = RateTracker::new();
        let values = [5u64, 3, 9, 0, 0, 7, 1];
        for (i, v) in values.into_iter().enumerate() {
            let rate = r.sample(v, t0 + Duration::from_secs(i as u64));
            assert!(rate >= 0.0, "rate {rate} for {v}");
        }
    }
}
