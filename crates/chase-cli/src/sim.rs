//! Headless pursuit: point-mass bodies, a scripted target and the autonomous pursuers.

use std::sync::mpsc::Receiver;

use anyhow::Result;
use serde::Serialize;

use chase_core::AgentRole;
use chase_grid::{
    BakeReport, BakeScheduler, BoxScene, GridBaker, LayoutChange, NavGrid, ObstacleLayout,
    RayCaster, Vec3,
};
use chase_steer::{
    fell_out_of_world, HumanInput, ReplanOutcome, Roster, TargetTracker, DEFAULT_AGENT_NAMES,
};

use crate::ChaseConfig;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Body {
    pub position: Vec3,
    pub velocity: Vec3,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AgentSummary {
    pub name: String,
    pub role: AgentRole,
    pub position: Vec3,
    /// Horizontal distance to the target body at the end of the run.
    pub distance_to_target: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimulationSummary {
    pub seconds: f32,
    pub steps: u64,
    pub bakes: u64,
    pub replans: u64,
    pub restarts: u32,
    pub agents: Vec<AgentSummary>,
}

pub struct Simulation {
    config: ChaseConfig,
    layout: ObstacleLayout,
    layout_changes: Receiver<LayoutChange>,
    support: BoxScene,
    grid: NavGrid,
    baker: GridBaker,
    scheduler: BakeScheduler,
    last_report: Option<BakeReport>,
    roster: Roster<u32>,
    tracker: TargetTracker,
    /// Indexed by agent id.
    bodies: Vec<Body>,
    spawns: Vec<Vec3>,
    clock: f32,
    steps: u64,
    replans: u64,
    restarts: u32,
}

impl Simulation {
    pub fn new(config: ChaseConfig) -> Result<Self> {
        config.validate()?;
        let grid = NavGrid::from_spec(config.grid)?;

        let mut layout = config.level.layout();
        let layout_changes = layout.subscribe();

        let mut spawns = vec![config.simulation.target_spawn];
        spawns.extend(config.simulation.pursuer_spawns.iter().copied());

        let mut roster = Roster::new();
        for id in 0..spawns.len() as u32 {
            let name = DEFAULT_AGENT_NAMES
                .get(id as usize)
                .map(|name| name.to_string())
                .unwrap_or_else(|| format!("ally-{id}"));
            roster.push(id, name, config.steering);
        }

        let bodies = spawns
            .iter()
            .map(|&position| Body {
                position,
                velocity: Vec3::ZERO,
            })
            .collect();

        Ok(Self {
            support: BoxScene::flat_floor(config.grid.map_width, config.grid.map_height),
            baker: GridBaker::new(config.bake),
            scheduler: BakeScheduler::new(config.timing),
            tracker: TargetTracker::new(config.tracking),
            last_report: None,
            layout,
            layout_changes,
            grid,
            roster,
            bodies,
            spawns,
            clock: 0.0,
            steps: 0,
            replans: 0,
            restarts: 0,
            config,
        })
    }

    pub fn grid(&self) -> &NavGrid {
        &self.grid
    }

    pub fn roster(&self) -> &Roster<u32> {
        &self.roster
    }

    pub fn bodies(&self) -> &[Body] {
        &self.bodies
    }

    pub fn last_report(&self) -> Option<BakeReport> {
        self.last_report
    }

    pub fn bakes(&self) -> u64 {
        self.scheduler.bakes_started()
    }

    pub fn clock(&self) -> f32 {
        self.clock
    }

    /// Edit the level; every edit schedules a debounced re-bake.
    pub fn layout_mut(&mut self) -> &mut ObstacleLayout {
        &mut self.layout
    }

    /// Held key for the target's square patrol: forward, right, backward, left.
    pub fn scripted_input(&self) -> HumanInput {
        let leg = (self.clock / self.config.simulation.target_leg_seconds) as u64 % 4;
        HumanInput {
            forward: leg == 0,
            right: leg == 1,
            backward: leg == 2,
            left: leg == 3,
        }
    }

    /// Advance one fixed physics step.
    pub fn step(&mut self) {
        let dt = self.config.simulation.step;
        self.steps += 1;

        self.scheduler.absorb(self.layout_changes.try_iter());
        self.bake_if_due(dt);

        if let Some(active) = self.roster.active() {
            let drive = self.scripted_input().drive(&self.config.input, dt);
            if let Some(body) = self.bodies.get_mut(active as usize) {
                body.velocity += drive.impulse;
                self.tracker.observe(body.position.horizontal(), dt);
            }
        }

        let target = self.tracker.last_known();
        for (id, controller) in self.roster.autonomous_mut() {
            let Some(body) = self.bodies.get_mut(id as usize) else {
                continue;
            };
            let position = body.position.horizontal();
            if let Some(outcome) = controller.tick_replan(&self.grid, position, target, dt) {
                self.replans += 1;
                if let ReplanOutcome::Replaced(nodes) = outcome {
                    tracing::debug!(agent = id, nodes, "Path replaced");
                }
            }
            body.velocity += controller.steer(position, body.velocity, dt);
        }

        self.integrate(dt);
        self.clock += dt;
        self.restart_if_fallen();
    }

    /// Run for `seconds` of simulated time.
    pub fn run(&mut self, seconds: f32) -> SimulationSummary {
        let steps = (seconds.max(0.0) / self.config.simulation.step).ceil() as u64;
        tracing::info!(seconds, steps, agents = self.bodies.len(), "Simulating");
        for _ in 0..steps {
            self.step();
        }
        let summary = self.summary();
        tracing::info!(
            bakes = summary.bakes,
            replans = summary.replans,
            restarts = summary.restarts,
            "Simulation finished"
        );
        summary
    }

    pub fn summary(&self) -> SimulationSummary {
        let target = self
            .roster
            .active()
            .and_then(|id| self.bodies.get(id as usize))
            .map(|body| body.position.horizontal());

        let agents = self
            .roster
            .entries()
            .iter()
            .filter_map(|entry| {
                let body = self.bodies.get(entry.id as usize)?;
                let position = body.position;
                Some(AgentSummary {
                    name: entry.name.clone(),
                    role: self.roster.role(entry.id)?,
                    position,
                    distance_to_target: target
                        .map(|t| t.distance(position.horizontal()))
                        .unwrap_or(f32::INFINITY),
                })
            })
            .collect();

        SimulationSummary {
            seconds: self.clock,
            steps: self.steps,
            bakes: self.bakes(),
            replans: self.replans,
            restarts: self.restarts,
            agents,
        }
    }

    fn bake_if_due(&mut self, dt: f32) {
        let Some(ticket) = self.scheduler.tick(dt) else {
            return;
        };
        // Animated obstacles are baked where they stand right now.
        let scene = BoxScene::from_layout(
            &self.layout,
            self.clock,
            self.config.grid.map_width,
            self.config.grid.map_height,
        );
        let report = self.baker.bake(&mut self.grid, &scene);
        self.scheduler.finish(ticket);
        self.last_report = Some(report);
    }

    fn integrate(&mut self, dt: f32) {
        let sim = &self.config.simulation;
        let bake = &self.config.bake;
        let damping = (1.0 - sim.damping * dt).max(0.0);

        for body in &mut self.bodies {
            let origin = Vec3::new(body.position.x, bake.ray_origin_height, body.position.z);
            let over_floor = self
                .support
                .cast_ray(origin, Vec3::DOWN, bake.max_ray_distance)
                .is_some();
            let grounded = over_floor && body.position.y >= bake.floor_height;

            body.velocity.x *= damping;
            body.velocity.z *= damping;
            if grounded {
                body.velocity.y = body.velocity.y.max(0.0);
            } else {
                body.velocity.y -= sim.gravity * dt;
            }
            body.position += body.velocity * dt;
        }
    }

    fn restart_if_fallen(&mut self) {
        let Some(fallen) = self
            .bodies
            .iter()
            .position(|body| fell_out_of_world(body.position.y))
        else {
            return;
        };

        tracing::info!(agent = fallen, "Agent fell out of the world; restarting level");
        self.restarts += 1;
        self.roster.reset();
        self.tracker.reset();
        for (body, &spawn) in self.bodies.iter_mut().zip(&self.spawns) {
            *body = Body {
                position: spawn,
                velocity: Vec3::ZERO,
            };
        }
    }
}
