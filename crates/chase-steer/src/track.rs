use chase_core::IntervalTimer;
use chase_grid::Vec2;

use crate::TargetTrackingConfig;

/// Throttled broadcast of the human agent's position.
///
/// Pursuers only ever see the last broadcast position, refreshed once per interval.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TargetTracker {
    timer: IntervalTimer,
    last_known: Option<Vec2>,
}

impl TargetTracker {
    pub fn new(config: TargetTrackingConfig) -> Self {
        Self {
            timer: IntervalTimer::primed(config.broadcast_interval),
            last_known: None,
        }
    }

    pub fn last_known(&self) -> Option<Vec2> {
        self.last_known
    }

    /// Advance by `dt`; returns `true` when `position` was broadcast this step.
    pub fn observe(&mut self, position: Vec2, dt: f32) -> bool {
        if !self.timer.tick(dt) {
            return false;
        }
        self.last_known = Some(position);
        true
    }

    /// Forget the target; the next observation broadcasts immediately.
    pub fn reset(&mut self) {
        self.timer = IntervalTimer::primed(self.timer.interval());
        self.last_known = None;
    }
}

impl Default for TargetTracker {
    fn default() -> Self {
        Self::new(TargetTrackingConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn broadcasts_at_most_once_per_interval() {
        let mut tracker = TargetTracker::default();

        assert!(tracker.observe(Vec2::new(1.0, 0.0), 0.02));
        assert_eq!(tracker.last_known(), Some(Vec2::new(1.0, 0.0)));

        // Movement within the next 0.1 s is not broadcast.
        assert!(!tracker.observe(Vec2::new(2.0, 0.0), 0.05));
        assert_eq!(tracker.last_known(), Some(Vec2::new(1.0, 0.0)));

        assert!(tracker.observe(Vec2::new(3.0, 0.0), 0.05));
        assert_eq!(tracker.last_known(), Some(Vec2::new(3.0, 0.0)));
    }

    #[test]
    fn reset_forgets_target() {
        let mut tracker = TargetTracker::default();
        tracker.observe(Vec2::ZERO, 0.0);
        tracker.reset();
        assert_eq!(tracker.last_known(), None);
        assert!(tracker.observe(Vec2::new(4.0, 4.0), 0.0));
    }
}
