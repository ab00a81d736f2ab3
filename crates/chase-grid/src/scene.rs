//! Minimal analytic ray-cast scene built from boxes.
//!
//! Stands in for the physics host outside the engine: the CLI and the tests bake against it.

use crate::{Obstacle, ObstacleLayout, RayCaster, RayHit, Vec3};

/// Box rotated about the vertical axis only.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SceneBox {
    pub center: Vec3,
    pub half_extents: Vec3,
    /// Rotation about +Y in radians.
    pub yaw: f32,
}

impl SceneBox {
    pub fn new(center: Vec3, half_extents: Vec3) -> Self {
        Self {
            center,
            half_extents,
            yaw: 0.0,
        }
    }

    pub fn with_yaw(mut self, yaw: f32) -> Self {
        self.yaw = yaw;
        self
    }

    /// Snapshot of an obstacle's collider at simulation time `time`.
    ///
    /// Pitch and roll are ignored; level geometry only ever turns about the vertical axis.
    pub fn from_obstacle(obstacle: &Obstacle, time: f32) -> Self {
        Self {
            center: obstacle.position_at(time),
            half_extents: obstacle.half_extents(),
            yaw: obstacle.transform.rotation.y,
        }
    }

    /// Entry distance of the ray into this box, if within `[0, max_distance]`.
    pub fn intersect(&self, origin: Vec3, direction: Vec3, max_distance: f32) -> Option<f32> {
        let local_origin = (origin - self.center).rotate_y(-self.yaw);
        let local_dir = direction.rotate_y(-self.yaw);

        let mut t_min = 0.0_f32;
        let mut t_max = max_distance;
        let axes = [
            (local_origin.x, local_dir.x, self.half_extents.x),
            (local_origin.y, local_dir.y, self.half_extents.y),
            (local_origin.z, local_dir.z, self.half_extents.z),
        ];
        for (o, d, half) in axes {
            if d.abs() < f32::EPSILON {
                if o < -half || o > half {
                    return None;
                }
                continue;
            }
            let inv = 1.0 / d;
            let (mut t0, mut t1) = ((-half - o) * inv, (half - o) * inv);
            if t0 > t1 {
                core::mem::swap(&mut t0, &mut t1);
            }
            t_min = t_min.max(t0);
            t_max = t_max.min(t1);
            if t_min > t_max {
                return None;
            }
        }
        Some(t_min)
    }
}

#[derive(Debug, Clone, Default)]
pub struct BoxScene {
    boxes: Vec<SceneBox>,
}

impl BoxScene {
    pub fn empty() -> Self {
        Self::default()
    }

    /// A thin slab whose top sits just below `y = 0`, covering `width` x `depth` around the origin.
    pub fn flat_floor(width: f32, depth: f32) -> Self {
        let mut scene = Self::empty();
        scene.push(SceneBox::new(
            Vec3::new(0.0, -0.1, 0.0),
            Vec3::new(width / 2.0, 0.05, depth / 2.0),
        ));
        scene
    }

    /// A floor plus every obstacle posed at simulation time `time`.
    pub fn from_layout(layout: &ObstacleLayout, time: f32, width: f32, depth: f32) -> Self {
        let mut scene = Self::flat_floor(width, depth);
        scene
            .boxes
            .extend(layout.iter().map(|o| SceneBox::from_obstacle(o, time)));
        scene
    }

    pub fn push(&mut self, b: SceneBox) {
        self.boxes.push(b);
    }

    pub fn boxes(&self) -> &[SceneBox] {
        &self.boxes
    }

    pub fn len(&self) -> usize {
        self.boxes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.boxes.is_empty()
    }
}

impl RayCaster for BoxScene {
    fn cast_ray(&self, origin: Vec3, direction: Vec3, max_distance: f32) -> Option<RayHit> {
        self.boxes
            .iter()
            .filter_map(|b| b.intersect(origin, direction, max_distance))
            .min_by(|a, b| a.total_cmp(b))
            .map(|distance| RayHit { distance })
    }
}
