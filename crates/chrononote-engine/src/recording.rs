//! Process-wide recording state and the adjusted elapsed-time computation.

use std::time::{Duration, Instant};

/// Compensation for the perceptual lag between hearing something and typing
/// the first character about it
pub const DEFAULT_LATENCY_COMPENSATION: Duration = Duration::from_millis(2000);

/// Recording session state: on/off plus the start instant
///
/// Only one session is live at a time; re-starting resets the start instant.
/// All time queries take an explicit `now` so callers (and tests) control
/// the clock; the convenience methods use `Instant::now()`.
#[derive(Debug, Clone)]
pub struct RecordingClock {
    active: bool,
    started_at: Option<Instant>,
    latency_compensation: Duration,
}

impl Default for RecordingClock {
    fn default() -> Self {
        Self::new(DEFAULT_LATENCY_COMPENSATION)
    }
}

impl RecordingClock {
    pub fn new(latency_compensation: Duration) -> Self {
        Self {
            active: false,
            started_at: None,
            latency_compensation,
        }
    }

    pub fn start(&mut self) {
        self.start_at(Instant::now());
    }

    pub fn start_at(&mut self, now: Instant) {
        self.active = true;
        self.started_at = Some(now);
    }

    /// Stop the session; the start instant is retained but irrelevant
    pub fn stop(&mut self) {
        self.active = false;
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Elapsed recording time minus the latency compensation, clamped at zero
    ///
    /// `None` while no session is active (or none was ever started) — the
    /// anchor trigger checks this instead of ever reading a dead clock.
    pub fn elapsed_adjusted(&self, now: Instant) -> Option<Duration> {
        if !self.active {
            return None;
        }
        let started_at = self.started_at?;
        Some(
            now.saturating_duration_since(started_at)
                .saturating_sub(self.latency_compensation),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inactive_clock_yields_nothing() {
        let clock = RecordingClock::default();
        assert_eq!(clock.elapsed_adjusted(Instant::now()), None);
    }

    #[test]
    fn test_stopped_clock_yields_nothing() {
        let t0 = Instant::now();
        let mut clock = RecordingClock::default();
        clock.start_at(t0);
        clock.stop();
        assert_eq!(clock.elapsed_adjusted(t0 + Duration::from_secs(10)), None);
    }

    #[test]
    fn test_elapsed_is_compensated() {
        let t0 = Instant::now();
        let mut clock = RecordingClock::default();
        clock.start_at(t0);

        let elapsed = clock.elapsed_adjusted(t0 + Duration::from_millis(5500));
        assert_eq!(elapsed, Some(Duration::from_millis(3500)));
    }

    #[test]
    fn test_elapsed_clamps_at_zero() {
        // 500ms in minus 2000ms compensation must not go negative
        let t0 = Instant::now();
        let mut clock = RecordingClock::default();
        clock.start_at(t0);

        let elapsed = clock.elapsed_adjusted(t0 + Duration::from_millis(500));
        assert_eq!(elapsed, Some(Duration::ZERO));
    }

    #[test]
    fn test_restart_resets_the_start_instant() {
        let t0 = Instant::now();
        let mut clock = RecordingClock::default();
        clock.start_at(t0);
        clock.stop();
        clock.start_at(t0 + Duration::from_secs(60));

        let elapsed = clock.elapsed_adjusted(t0 + Duration::from_secs(63));
        assert_eq!(elapsed, Some(Duration::from_secs(1)));
    }

    #[test]
    fn test_custom_compensation() {
        let t0 = Instant::now();
        let mut clock = RecordingClock::new(Duration::from_millis(500));
        clock.start_at(t0);

        let elapsed = clock.elapsed_adjusted(t0 + Duration::from_millis(1500));
        assert_eq!(elapsed, Some(Duration::from_millis(1000)));
    }
}
