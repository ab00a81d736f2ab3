use std::collections::VecDeque;

use chase_grid::{GridCell, Vec2, Vec3};

use crate::SteeringConfig;

/// The path an autonomous agent currently holds, and the impulse that follows it.
///
/// The front node is the cell the agent is leaving; the second node is the one it steers toward.
#[derive(Debug, Clone, Default)]
pub struct PathFollower {
    nodes: VecDeque<GridCell>,
}

impl PathFollower {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the held path.
    pub fn set_path(&mut self, path: impl IntoIterator<Item = GridCell>) {
        self.nodes.clear();
        self.nodes.extend(path);
    }

    pub fn clear(&mut self) {
        self.nodes.clear();
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn nodes(&self) -> impl Iterator<Item = &GridCell> {
        self.nodes.iter()
    }

    /// World position of the node being steered toward, if the path has one.
    pub fn steering_target(&self) -> Option<Vec2> {
        self.nodes.get(1).map(GridCell::center)
    }

    /// Impulse for one physics step of `dt` seconds.
    ///
    /// Reaching the steering node pops the front node (one per call) and applies no push that
    /// step. With fewer than two nodes the agent brakes on the horizontal axes.
    pub fn steer(
        &mut self,
        config: &SteeringConfig,
        position: Vec2,
        velocity: Vec3,
        dt: f32,
    ) -> Vec3 {
        let dt = if dt.is_finite() { dt.max(0.0) } else { 0.0 };
        let horizontal = velocity.horizontal();

        let Some(target) = self.steering_target() else {
            let brake = -horizontal * (config.brake_gain * dt);
            return brake.with_height(0.0);
        };

        if position.distance(target) <= config.arrival_radius {
            self.nodes.pop_front();
            return Vec3::ZERO;
        }

        let desired = (target - position).normalize_or_zero() * config.max_speed;
        ((desired - horizontal) * (config.gain * dt)).with_height(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cell(x: i32, z: i32) -> GridCell {
        GridCell {
            x,
            z,
            world_x: x as f32 + 0.5,
            world_z: z as f32 + 0.5,
            walkable: true,
            cost: 1,
        }
    }

    #[test]
    fn pushes_toward_second_node() {
        let mut follower = PathFollower::new();
        follower.set_path([cell(0, 0), cell(1, 0), cell(2, 0)]);

        let impulse = follower.steer(
            &SteeringConfig::default(),
            Vec2::new(0.5, 0.5),
            Vec3::ZERO,
            0.1,
        );

        // desired = (6, 0); impulse = 6 * 5 * 0.1
        assert!((impulse.x - 3.0).abs() < 1e-5);
        assert_eq!(impulse.y, 0.0);
        assert!(impulse.z.abs() < 1e-5);
        assert_eq!(follower.len(), 3);
    }

    #[test]
    fn arrival_radius_is_inclusive() {
        let mut follower = PathFollower::new();
        follower.set_path([cell(0, 0), cell(1, 0), cell(2, 0)]);
        let config = SteeringConfig {
            arrival_radius: 0.25,
            ..SteeringConfig::default()
        };

        let impulse = follower.steer(&config, Vec2::new(1.25, 0.5), Vec3::ZERO, 0.1);

        assert_eq!(impulse, Vec3::ZERO);
        assert_eq!(follower.len(), 2);
        assert_eq!(follower.steering_target(), Some(Vec2::new(2.5, 0.5)));
    }

    #[test]
    fn brakes_without_a_path() {
        let mut follower = PathFollower::new();
        let impulse = follower.steer(
            &SteeringConfig::default(),
            Vec2::ZERO,
            Vec3::new(2.0, -3.0, -1.0),
            0.5,
        );
        assert_eq!(impulse, Vec3::new(-2.0, 0.0, 1.0));
    }

    #[test]
    fn single_node_path_also_brakes() {
        let mut follower = PathFollower::new();
        follower.set_path([cell(0, 0)]);
        let impulse = follower.steer(
            &SteeringConfig::default(),
            Vec2::new(0.5, 0.5),
            Vec3::new(1.0, 0.0, 0.0),
            1.0,
        );
        assert_eq!(impulse, Vec3::new(-2.0, 0.0, 0.0));
        assert_eq!(follower.len(), 1);
    }
}
