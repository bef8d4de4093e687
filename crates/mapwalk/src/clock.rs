use std::time::{Duration, Instant};

/// Default simulation/render rate.
pub const TARGET_TICK_HZ: f64 = 75.0;

/// Gates frames to a maximum rate.
///
/// `poll` is called as often as the event loop spins; it only reports a tick
/// once the minimum interval has elapsed since the last reported tick. Early
/// polls are dropped, never banked, so a slow frame just runs slower.
#[derive(Debug, Clone)]
pub struct FrameClock {
    interval: Duration,
    last_tick: Instant,
    last_delta: Duration,
    ticks: u64,
}

impl FrameClock {
    pub fn new(rate_hz: f64, start: Instant) -> Self {
        Self {
            interval: Duration::from_secs_f64(1.0 / rate_hz),
            last_tick: start,
            last_delta: Duration::ZERO,
            ticks: 0,
        }
    }

    /// Returns the time since the last executed tick when a new tick is due.
    pub fn poll(&mut self, now: Instant) -> Option<Duration> {
        let elapsed = now.saturating_duration_since(self.last_tick);
        if elapsed < self.interval {
            return None;
        }

        self.last_tick = now;
        self.last_delta = elapsed;
        self.ticks += 1;
        Some(elapsed)
    }

    #[inline]
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Delta of the most recently executed tick.
    #[inline]
    pub fn last_delta(&self) -> Duration {
        self.last_delta
    }

    #[inline]
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Effective rate implied by the last delta.
    pub fn fps(&self) -> f32 {
        let secs = self.last_delta.as_secs_f32();
        if secs > 0.0 {
            secs.recip()
        } else {
            0.0
        }
    }
}
