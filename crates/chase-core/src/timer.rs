//! Accumulator-based cadence gating.
//!
//! Polling `elapsed % interval < epsilon` drifts with the frame rate and can fire twice (or not at
//! all) near an interval boundary. [`IntervalTimer`] accumulates `dt` instead and fires exactly
//! once each time the accumulated time crosses the interval.

/// Absorbs float accumulation error so `n * dt == interval` still fires on the n-th step.
const FIRE_EPSILON: f32 = 1e-5;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IntervalTimer {
    interval: f32,
    accumulated: f32,
}

impl IntervalTimer {
    /// Timer that first fires after one full `interval`.
    pub fn new(interval: f32) -> Self {
        Self {
            interval: interval.max(0.0),
            accumulated: 0.0,
        }
    }

    /// Timer that fires on its first tick, then every `interval`.
    pub fn primed(interval: f32) -> Self {
        let interval = interval.max(0.0);
        Self {
            interval,
            accumulated: interval,
        }
    }

    pub fn interval(&self) -> f32 {
        self.interval
    }

    pub fn set_interval(&mut self, interval: f32) {
        self.interval = interval.max(0.0);
    }

    pub fn elapsed(&self) -> f32 {
        self.accumulated
    }

    /// Advance by `dt` seconds. Returns `true` when the interval elapsed during this step.
    ///
    /// Fires at most once per call; the overshoot carries into the next period so the long-run
    /// cadence does not drift, but a single huge step never queues a burst of fires.
    pub fn tick(&mut self, dt: f32) -> bool {
        if dt.is_finite() && dt > 0.0 {
            self.accumulated += dt;
        }

        if self.accumulated + FIRE_EPSILON < self.interval {
            return false;
        }

        self.accumulated -= self.interval;
        if self.accumulated + FIRE_EPSILON >= self.interval || self.accumulated < 0.0 {
            self.accumulated = 0.0;
        }
        true
    }

    /// Forget accumulated time; the next fire is a full interval away.
    pub fn reset(&mut self) {
        self.accumulated = 0.0;
    }
}
