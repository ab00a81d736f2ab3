/// Last-write-wins debounce timer driven by simulated time.
///
/// Every [`trigger`](Debouncer::trigger) cancels the pending deadline and reschedules it one quiet
/// period out. [`tick`](Debouncer::tick) returns `true` exactly once, when a deadline is reached
/// without any further trigger in between.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Debouncer {
    quiet_period: f32,
    remaining: Option<f32>,
}

impl Debouncer {
    pub fn new(quiet_period: f32) -> Self {
        Self {
            quiet_period: quiet_period.max(0.0),
            remaining: None,
        }
    }

    pub fn quiet_period(&self) -> f32 {
        self.quiet_period
    }

    pub fn is_pending(&self) -> bool {
        self.remaining.is_some()
    }

    /// Seconds left before the pending deadline fires.
    pub fn remaining(&self) -> Option<f32> {
        self.remaining
    }

    pub fn trigger(&mut self) {
        self.remaining = Some(self.quiet_period);
    }

    /// Schedule a one-off deadline `delay` seconds out, replacing any pending one.
    pub fn trigger_after(&mut self, delay: f32) {
        self.remaining = Some(delay.max(0.0));
    }

    pub fn cancel(&mut self) {
        self.remaining = None;
    }

    /// Advance by `dt` seconds. Returns `true` when the pending deadline elapsed.
    pub fn tick(&mut self, dt: f32) -> bool {
        let Some(remaining) = self.remaining else {
            return false;
        };

        let dt = if dt.is_finite() { dt.max(0.0) } else { 0.0 };
        let left = remaining - dt;
        if left <= 0.0 {
            self.remaining = None;
            true
        } else {
            self.remaining = Some(left);
            false
        }
    }
}
