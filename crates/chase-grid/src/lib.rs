//! Navigation grid, ray-cast baking and A* path finding.
//!
//! The grid lives on the horizontal XZ plane. Walkability is discovered by casting rays straight
//! down through every cell center ([`GridBaker`]); bakes are coalesced and deferred by a
//! [`BakeScheduler`]. [`NavGrid::find_path`] answers 4-connected shortest-path queries.

#![cfg_attr(docsrs, feature(doc_cfg))]
#![forbid(unsafe_code)]

pub mod bake;
pub mod grid;
pub mod math;
pub mod obstacle;
pub mod path;
pub mod scene;
pub mod schedule;

pub use bake::{BakeConfig, BakeReport, CellClass, GridBaker, RayCaster, RayHit};
pub use grid::{GridCell, GridCoord, GridError, GridSpec, NavGrid, WalkabilityMask};
pub use math::{Vec2, Vec3};
pub use obstacle::{
    Axis, LayoutChange, Obstacle, ObstacleId, ObstacleKind, ObstacleLayout, ObstaclePatch,
    ObstaclePreset, ObstacleTransform, PeriodicMotion,
};
pub use path::{find_path, PathQuery};
pub use scene::{BoxScene, SceneBox};
pub use schedule::{BakeOutcome, BakeScheduler, BakeTicket, BakeTiming, NotifyOutcome};
