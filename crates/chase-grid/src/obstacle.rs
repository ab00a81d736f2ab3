//! Editable obstacle layout.
//!
//! Navigation never inspects obstacle geometry directly: obstacles reach the grid only through
//! the ray-cast service. The layout's job is to own the editable set and tell subscribers that
//! *something* changed so a bake can be scheduled.

use std::fmt;
use std::sync::mpsc::{channel, Receiver, Sender};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::Vec3;

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct ObstacleId(pub String);

impl ObstacleId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ObstacleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    pub fn unit(self) -> Vec3 {
        match self {
            Axis::X => Vec3::new(1.0, 0.0, 0.0),
            Axis::Y => Vec3::new(0.0, 1.0, 0.0),
            Axis::Z => Vec3::new(0.0, 0.0, 1.0),
        }
    }
}

/// Sinusoidal oscillation along one axis.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PeriodicMotion {
    pub axis: Axis,
    /// Angular speed (radians per second).
    pub speed: f32,
    pub amplitude: f32,
}

impl PeriodicMotion {
    pub fn offset_at(&self, time: f32) -> Vec3 {
        self.axis.unit() * ((time * self.speed).sin() * self.amplitude)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "type", rename_all = "snake_case"))]
pub enum ObstacleKind {
    StaticBox,
    Animated { motion: PeriodicMotion },
}

#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ObstacleTransform {
    pub position: Vec3,
    /// Euler angles in radians (XYZ).
    pub rotation: Vec3,
    pub scale: Vec3,
}

impl Default for ObstacleTransform {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Vec3::ZERO,
            scale: Vec3::ONE,
        }
    }
}

impl ObstacleTransform {
    pub fn at(position: Vec3) -> Self {
        Self {
            position,
            ..Self::default()
        }
    }
}

/// A unit box scaled, rotated and placed by its transform.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Obstacle {
    pub id: ObstacleId,
    pub kind: ObstacleKind,
    pub transform: ObstacleTransform,
}

impl Obstacle {
    pub fn new(id: impl Into<String>, kind: ObstacleKind, transform: ObstacleTransform) -> Self {
        Self {
            id: ObstacleId::new(id),
            kind,
            transform,
        }
    }

    /// World position at simulation time `time`.
    pub fn position_at(&self, time: f32) -> Vec3 {
        match self.kind {
            ObstacleKind::StaticBox => self.transform.position,
            ObstacleKind::Animated { motion } => self.transform.position + motion.offset_at(time),
        }
    }

    pub fn half_extents(&self) -> Vec3 {
        self.transform.scale * 0.5
    }

    pub fn is_animated(&self) -> bool {
        matches!(self.kind, ObstacleKind::Animated { .. })
    }
}

/// Partial edit applied by [`ObstacleLayout::update`].
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ObstaclePatch {
    pub kind: Option<ObstacleKind>,
    pub position: Option<Vec3>,
    pub rotation: Option<Vec3>,
    pub scale: Option<Vec3>,
}

impl ObstaclePatch {
    pub fn move_to(position: Vec3) -> Self {
        Self {
            position: Some(position),
            ..Self::default()
        }
    }

    fn apply(&self, obstacle: &mut Obstacle) {
        if let Some(kind) = self.kind {
            obstacle.kind = kind;
        }
        if let Some(position) = self.position {
            obstacle.transform.position = position;
        }
        if let Some(rotation) = self.rotation {
            obstacle.transform.rotation = rotation;
        }
        if let Some(scale) = self.scale {
            obstacle.transform.scale = scale;
        }
    }
}

/// Template for placing a new obstacle from the editor palette.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ObstaclePreset {
    pub name: &'static str,
    pub kind: ObstacleKind,
    pub scale: Vec3,
}

impl ObstaclePreset {
    pub const fn all() -> [ObstaclePreset; 5] {
        [
            ObstaclePreset {
                name: "Standard Box",
                kind: ObstacleKind::StaticBox,
                scale: Vec3::new(1.0, 1.0, 1.0),
            },
            ObstaclePreset {
                name: "Wide Wall",
                kind: ObstacleKind::StaticBox,
                scale: Vec3::new(4.0, 1.0, 1.0),
            },
            ObstaclePreset {
                name: "Tall Pillar",
                kind: ObstacleKind::StaticBox,
                scale: Vec3::new(1.0, 3.0, 1.0),
            },
            ObstaclePreset {
                name: "Dynamic (Y-Axis)",
                kind: ObstacleKind::Animated {
                    motion: PeriodicMotion {
                        axis: Axis::Y,
                        speed: 2.0,
                        amplitude: 1.5,
                    },
                },
                scale: Vec3::new(2.0, 1.0, 1.0),
            },
            ObstaclePreset {
                name: "Dynamic (Z-Axis)",
                kind: ObstacleKind::Animated {
                    motion: PeriodicMotion {
                        axis: Axis::Z,
                        speed: 1.5,
                        amplitude: 3.0,
                    },
                },
                scale: Vec3::new(2.0, 1.0, 1.0),
            },
        ]
    }

    pub fn instantiate(&self, id: impl Into<String>, position: Vec3) -> Obstacle {
        Obstacle::new(
            id,
            self.kind,
            ObstacleTransform {
                position,
                rotation: Vec3::ZERO,
                scale: self.scale,
            },
        )
    }
}

/// Notification sent to every layout subscriber.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LayoutChange {
    Added(ObstacleId),
    Removed(ObstacleId),
    Updated(ObstacleId),
}

/// The editable obstacle set and its change feed.
#[derive(Debug, Default)]
pub struct ObstacleLayout {
    obstacles: Vec<Obstacle>,
    selected: Option<ObstacleId>,
    subscribers: Vec<Sender<LayoutChange>>,
}

impl ObstacleLayout {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_obstacles(obstacles: impl IntoIterator<Item = Obstacle>) -> Self {
        let mut layout = Self::new();
        for obstacle in obstacles {
            layout.add(obstacle);
        }
        layout
    }

    /// The stock level: a bobbing wall, a barrier, a U-shaped trap and a diagonal wall.
    pub fn default_level() -> Self {
        let quarter_turn = core::f32::consts::FRAC_PI_4;
        let wall = |id: &str, position: Vec3, scale: Vec3| {
            Obstacle::new(
                id,
                ObstacleKind::StaticBox,
                ObstacleTransform {
                    position,
                    rotation: Vec3::ZERO,
                    scale,
                },
            )
        };

        Self::from_obstacles([
            Obstacle::new(
                "wall-dynamic-1",
                ObstacleKind::Animated {
                    motion: PeriodicMotion {
                        axis: Axis::Y,
                        speed: 1.0,
                        amplitude: 1.0,
                    },
                },
                ObstacleTransform {
                    position: Vec3::new(-3.5, 0.5, 4.0),
                    rotation: Vec3::ZERO,
                    scale: Vec3::new(4.0, 1.0, 1.0),
                },
            ),
            wall(
                "wall-right-barrier",
                Vec3::new(3.5, 0.5, 7.0),
                Vec3::new(4.0, 1.0, 1.0),
            ),
            wall(
                "wall-u-back",
                Vec3::new(0.0, 0.5, 12.0),
                Vec3::new(6.0, 1.0, 1.0),
            ),
            wall(
                "wall-u-left",
                Vec3::new(-2.5, 0.5, 10.0),
                Vec3::new(1.0, 1.0, 3.0),
            ),
            wall(
                "wall-u-right",
                Vec3::new(2.5, 0.5, 10.0),
                Vec3::new(1.0, 1.0, 3.0),
            ),
            Obstacle::new(
                "wall-diagonal",
                ObstacleKind::StaticBox,
                ObstacleTransform {
                    position: Vec3::new(-4.0, 0.5, 14.0),
                    rotation: Vec3::new(0.0, quarter_turn, 0.0),
                    scale: Vec3::new(1.0, 1.0, 8.0),
                },
            ),
        ])
    }

    /// Register a new change feed. Dropping the receiver unsubscribes.
    pub fn subscribe(&mut self) -> Receiver<LayoutChange> {
        let (tx, rx) = channel();
        self.subscribers.push(tx);
        rx
    }

    pub fn len(&self) -> usize {
        self.obstacles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.obstacles.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Obstacle> {
        self.obstacles.iter()
    }

    pub fn get(&self, id: &ObstacleId) -> Option<&Obstacle> {
        self.obstacles.iter().find(|o| &o.id == id)
    }

    /// Insert an obstacle. An id already in use is rejected.
    pub fn add(&mut self, obstacle: Obstacle) -> bool {
        if self.get(&obstacle.id).is_some() {
            tracing::debug!(id = %obstacle.id, "Ignoring obstacle with duplicate id");
            return false;
        }
        let id = obstacle.id.clone();
        self.obstacles.push(obstacle);
        self.notify(LayoutChange::Added(id));
        true
    }

    pub fn remove(&mut self, id: &ObstacleId) -> Option<Obstacle> {
        let pos = self.obstacles.iter().position(|o| &o.id == id)?;
        let removed = self.obstacles.remove(pos);
        if self.selected.as_ref() == Some(id) {
            self.selected = None;
        }
        self.notify(LayoutChange::Removed(removed.id.clone()));
        Some(removed)
    }

    pub fn update(&mut self, id: &ObstacleId, patch: ObstaclePatch) -> bool {
        let Some(obstacle) = self.obstacles.iter_mut().find(|o| &o.id == id) else {
            return false;
        };
        patch.apply(obstacle);
        self.notify(LayoutChange::Updated(id.clone()));
        true
    }

    /// Select an obstacle for editing; unknown ids clear the selection.
    pub fn select(&mut self, id: Option<ObstacleId>) {
        self.selected = id.filter(|id| self.get(id).is_some());
    }

    pub fn selected(&self) -> Option<&Obstacle> {
        self.selected.as_ref().and_then(|id| self.get(id))
    }

    fn notify(&mut self, change: LayoutChange) {
        self.subscribers.retain(|tx| tx.send(change.clone()).is_ok());
    }
}
