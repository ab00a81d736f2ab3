use chase_core::IntervalTimer;
use chase_grid::{GridCell, NavGrid, PathQuery, Vec2, Vec3};

use crate::{PathFollower, SteeringConfig};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplanOutcome {
    /// A fresh path of this many nodes replaced the held one.
    Replaced(usize),
    /// Close enough to the target; the held path was dropped.
    Cleared,
    /// No route this time; the previous path is kept.
    Kept,
    /// The target position is not known yet.
    NoTarget,
}

/// Per-agent chase state: re-plan cadence, search scratch and the held path.
#[derive(Debug)]
pub struct ChaseController {
    config: SteeringConfig,
    replan_timer: IntervalTimer,
    query: PathQuery,
    scratch: Vec<GridCell>,
    follower: PathFollower,
}

impl ChaseController {
    pub fn new(config: SteeringConfig) -> Self {
        Self {
            config,
            replan_timer: IntervalTimer::primed(config.replan_interval),
            query: PathQuery::new(),
            scratch: Vec::new(),
            follower: PathFollower::new(),
        }
    }

    pub fn config(&self) -> &SteeringConfig {
        &self.config
    }

    pub fn set_config(&mut self, config: SteeringConfig) {
        self.replan_timer.set_interval(config.replan_interval);
        self.config = config;
    }

    pub fn follower(&self) -> &PathFollower {
        &self.follower
    }

    pub fn held_path_len(&self) -> usize {
        self.follower.len()
    }

    /// Re-plan now toward `target`, ignoring the cadence.
    pub fn replan(&mut self, grid: &NavGrid, position: Vec2, target: Option<Vec2>) -> ReplanOutcome {
        let Some(target) = target else {
            return ReplanOutcome::NoTarget;
        };

        if position.distance(target) <= self.config.follow_radius {
            self.follower.clear();
            return ReplanOutcome::Cleared;
        }

        if !self
            .query
            .find_path_into(grid, position, target, &mut self.scratch)
        {
            return ReplanOutcome::Kept;
        }

        self.follower.set_path(self.scratch.drain(..));
        ReplanOutcome::Replaced(self.follower.len())
    }

    /// Advance the re-plan cadence by `dt`; re-plans when it fires.
    pub fn tick_replan(
        &mut self,
        grid: &NavGrid,
        position: Vec2,
        target: Option<Vec2>,
        dt: f32,
    ) -> Option<ReplanOutcome> {
        if !self.replan_timer.tick(dt) {
            return None;
        }
        let outcome = self.replan(grid, position, target);
        tracing::trace!(?outcome, x = position.x, z = position.z, "Re-planned");
        Some(outcome)
    }

    /// Impulse along the held path for one physics step.
    pub fn steer(&mut self, position: Vec2, velocity: Vec3, dt: f32) -> Vec3 {
        self.follower.steer(&self.config, position, velocity, dt)
    }

    /// One physics step: re-plan if the cadence fired, then steer along the held path.
    ///
    /// Returns the impulse to apply to the agent's body.
    pub fn update(
        &mut self,
        grid: &NavGrid,
        position: Vec3,
        velocity: Vec3,
        target: Option<Vec2>,
        dt: f32,
    ) -> Vec3 {
        let here = position.horizontal();
        self.tick_replan(grid, here, target, dt);
        self.steer(here, velocity, dt)
    }

    /// Drop the held path and re-plan on the next update.
    pub fn reset(&mut self) {
        self.follower.clear();
        self.replan_timer = IntervalTimer::primed(self.config.replan_interval);
    }
}

impl Default for ChaseController {
    fn default() -> Self {
        Self::new(SteeringConfig::default())
    }
}
