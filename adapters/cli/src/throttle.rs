use std::time::{Duration, Instant};

/// Shortest wall-clock interval between two real-time frames.
pub(crate) const MIN_FRAME_INTERVAL: Duration = Duration::from_millis(10);

/// Gates real-time frames so they never run more often than a minimum interval.
#[derive(Debug)]
pub(crate) struct FrameThrottle {
    min_interval: Duration,
    last: Option<Instant>,
}

impl FrameThrottle {
    pub(crate) fn new(min_interval: Duration) -> Self {
        Self {
            min_interval,
            last: None,
        }
    }

    /// Returns the elapsed time since the previous frame once the interval passed.
    ///
    /// The very first call only starts the clock.
    pub(crate) fn poll(&mut self, now: Instant) -> Option<Duration> {
        let Some(last) = self.last else {
            self.last = Some(now);
            return None;
        };
        let elapsed = now.saturating_duration_since(last);
        if elapsed < self.min_interval {
            return None;
        }
        self.last = Some(now);
        Some(elapsed)
    }

    /// Time left until the next frame may run.
    pub(crate) fn remaining(&self, now: Instant) -> Duration {
        self.last.map_or(Duration::ZERO, |last| {
            self.min_interval
                .saturating_sub(now.saturating_duration_since(last))
        })
    }
}
