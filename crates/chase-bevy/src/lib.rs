//! Bevy adapter for the `chase-*` crates.
//!
//! The adapter keeps navigation engine-agnostic: the grid, scheduler, tracker and roster live in
//! resources, bodies are read through `Transform` plus [`ChaseVelocity`], and steering output is
//! written to [`ChaseImpulse`] for the physics host to apply.
//!
//! ## Scheduling
//!
//! Navigation is simulation logic and belongs in [`bevy_app::FixedUpdate`]. A minimal `App`
//! without Bevy's time plugins never runs the fixed loop, so the plugin defaults to
//! [`bevy_app::Update`] and drives every cadence from the [`ChaseTick`] resource.
//!
//! ## Features
//!
//! - `time`: if Bevy's `bevy_time::Time` resource is present, `ChaseTick` takes its step from
//!   `Time::delta_secs()`.
//! - `physics`: bakes with Rapier ray casts, reads `Velocity` into [`ChaseVelocity`] and writes
//!   [`ChaseImpulse`] into `ExternalImpulse`.

#![cfg_attr(docsrs, feature(doc_cfg))]
#![forbid(unsafe_code)]

use std::sync::Arc;

use bevy_app::{App, FixedUpdate, Plugin, Update};
use bevy_ecs::prelude::{Component, Event, Resource, SystemSet};
use bevy_ecs::schedule::{IntoScheduleConfigs, ScheduleLabel};

use chase_core::TickContext;
use chase_grid::{
    BakeConfig, BakeReport, BakeScheduler, BakeTiming, GridBaker, GridError, GridSpec, NavGrid,
    Obstacle, RayCaster, Vec3,
};
use chase_steer::{
    HumanInput, InputConfig, Roster, SteeringConfig, TargetTracker, TargetTrackingConfig,
};

mod systems;

pub use systems::*;

#[cfg(feature = "physics")]
#[cfg_attr(docsrs, doc(cfg(feature = "physics")))]
pub mod physics;

#[derive(Debug, Clone, Copy, PartialEq)]
#[derive(Resource)]
pub struct ChaseTick(pub TickContext);

impl Default for ChaseTick {
    fn default() -> Self {
        Self(TickContext::new(0, 1.0 / 60.0))
    }
}

/// Seconds of level time; drives obstacle animation.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[derive(Resource)]
pub struct LevelClock {
    pub elapsed: f32,
}

#[derive(Debug, Clone)]
#[derive(Resource)]
pub struct ChaseGrid(pub NavGrid);

#[derive(Debug, Clone)]
#[derive(Resource)]
pub struct ChaseBake {
    pub baker: GridBaker,
    pub scheduler: BakeScheduler,
    pub last_report: Option<BakeReport>,
}

/// Ray-cast service used for baking when the plugin is not wired to Rapier.
#[derive(Clone)]
#[derive(Resource)]
pub struct ChaseRayCaster(pub Arc<dyn RayCaster + Send + Sync>);

impl ChaseRayCaster {
    pub fn new<C>(caster: C) -> Self
    where
        C: RayCaster + Send + Sync + 'static,
    {
        Self(Arc::new(caster))
    }
}

#[derive(Debug, Clone, Copy)]
#[derive(Resource)]
pub struct ChaseTarget(pub TargetTracker);

#[derive(Debug)]
#[derive(Resource)]
pub struct ChaseRoster(pub Roster<u32>);

/// Directional input for the human-controlled agent, written by the host each frame.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[derive(Resource)]
pub struct ChaseInput(pub HumanInput);

#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[derive(Resource)]
pub struct ChaseInputConfig(pub InputConfig);

/// Roster slot of an agent body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[derive(Component)]
pub struct ChaseAgent {
    pub slot: u32,
}

/// Linear velocity of an agent body, as last reported by the physics host.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[derive(Component)]
pub struct ChaseVelocity(pub Vec3);

/// Impulse requested for this step. Cleared at the start of every step.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[derive(Component)]
pub struct ChaseImpulse {
    pub impulse: Vec3,
    pub torque: Vec3,
}

/// Where an agent body returns to on level restart.
#[derive(Debug, Clone, Copy, PartialEq)]
#[derive(Component)]
pub struct ChaseSpawn(pub Vec3);

/// An editable obstacle. Edits to this component schedule a re-bake; animation does not.
#[derive(Debug, Clone, PartialEq)]
#[derive(Component)]
pub struct ChaseObstacle(pub Obstacle);

/// An agent fell out of the world and the level was restarted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[derive(Event)]
pub struct LevelRestart {
    pub agent: u32,
}

#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChaseSet {
    /// Tick step and body state from the host.
    SyncIn,
    /// Level clock, obstacle edits and animation, restarts.
    World,
    Bake,
    Track,
    Plan,
    Steer,
    /// Hand impulses back to the host.
    SyncOut,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChaseSchedule {
    Update,
    FixedUpdate,
}

/// Where bakes get their ray casts from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BakeSource {
    /// The [`ChaseRayCaster`] resource; bakes are retried while it is missing.
    #[default]
    Resource,
    /// Rapier's query pipeline; bakes are retried while no Rapier context exists.
    #[cfg(feature = "physics")]
    #[cfg_attr(docsrs, doc(cfg(feature = "physics")))]
    Rapier,
}

/// Tuning for every navigation component the plugin installs.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ChaseNavConfig {
    pub grid: GridSpec,
    pub bake: BakeConfig,
    pub timing: BakeTiming,
    pub steering: SteeringConfig,
    pub input: InputConfig,
    pub tracking: TargetTrackingConfig,
}

pub struct ChaseNavPlugin {
    schedule: ChaseSchedule,
    bake_source: BakeSource,
    config: ChaseNavConfig,
    grid: NavGrid,
}

impl ChaseNavPlugin {
    /// Fails when the grid spec does not describe a usable grid.
    pub fn new(config: ChaseNavConfig) -> Result<Self, GridError> {
        let grid = NavGrid::from_spec(config.grid)?;
        Ok(Self {
            schedule: ChaseSchedule::Update,
            bake_source: BakeSource::Resource,
            config,
            grid,
        })
    }

    pub fn in_fixed_update(mut self) -> Self {
        self.schedule = ChaseSchedule::FixedUpdate;
        self
    }

    #[cfg(feature = "physics")]
    #[cfg_attr(docsrs, doc(cfg(feature = "physics")))]
    pub fn with_rapier(mut self) -> Self {
        self.bake_source = BakeSource::Rapier;
        self
    }

    pub fn schedule(&self) -> ChaseSchedule {
        self.schedule
    }

    pub fn config(&self) -> &ChaseNavConfig {
        &self.config
    }
}

impl Plugin for ChaseNavPlugin {
    fn build(&self, app: &mut App) {
        let config = self.config;

        app.init_resource::<ChaseTick>();
        app.init_resource::<LevelClock>();
        app.init_resource::<ChaseInput>();
        app.insert_resource(ChaseInputConfig(config.input));
        app.insert_resource(ChaseGrid(self.grid.clone()));
        app.insert_resource(ChaseBake {
            baker: GridBaker::new(config.bake),
            scheduler: BakeScheduler::new(config.timing),
            last_report: None,
        });
        app.insert_resource(ChaseTarget(TargetTracker::new(config.tracking)));
        app.insert_resource(ChaseRoster(Roster::default_party(config.steering)));
        app.add_event::<LevelRestart>();

        match self.schedule {
            ChaseSchedule::Update => self.install_systems(app, Update),
            ChaseSchedule::FixedUpdate => self.install_systems(app, FixedUpdate),
        }
    }
}

impl ChaseNavPlugin {
    fn install_systems<L: ScheduleLabel + Clone>(&self, app: &mut App, schedule: L) {
        app.configure_sets(
            schedule.clone(),
            (
                ChaseSet::SyncIn,
                ChaseSet::World,
                ChaseSet::Bake,
                ChaseSet::Track,
                ChaseSet::Plan,
                ChaseSet::Steer,
                ChaseSet::SyncOut,
            )
                .chain(),
        );

        app.add_systems(
            schedule.clone(),
            (
                #[cfg(feature = "time")]
                sync_tick_dt_from_bevy_time.in_set(ChaseSet::SyncIn),
                clear_impulses.in_set(ChaseSet::SyncIn),
                (
                    advance_level_clock,
                    apply_obstacle_edits,
                    animate_obstacles,
                    detect_obstacle_edits,
                    restart_on_fall,
                )
                    .chain()
                    .in_set(ChaseSet::World),
                track_target.in_set(ChaseSet::Track),
                replan_paths.in_set(ChaseSet::Plan),
                (steer_agents, drive_human_agent).in_set(ChaseSet::Steer),
                advance_tick.in_set(ChaseSet::SyncOut),
            ),
        );

        match self.bake_source {
            BakeSource::Resource => {
                app.add_systems(schedule.clone(), bake_grid.in_set(ChaseSet::Bake));
            }
            #[cfg(feature = "physics")]
            BakeSource::Rapier => {
                app.add_systems(
                    schedule.clone(),
                    physics::bake_grid_with_rapier.in_set(ChaseSet::Bake),
                );
            }
        }

        #[cfg(feature = "physics")]
        app.add_systems(
            schedule,
            (
                physics::sync_velocity_from_rapier.in_set(ChaseSet::SyncIn),
                (
                    physics::apply_impulses_to_rapier,
                    physics::reset_rapier_velocities,
                )
                    .in_set(ChaseSet::SyncOut),
            ),
        );
    }
}
