use bevy_ecs::prelude::*;
use bevy_math::{EulerRot, Quat};
use bevy_transform::components::Transform;

#[cfg(feature = "time")]
use bevy_time::Time;

use chase_core::AgentRole;
use chase_grid::{BakeOutcome, RayCaster, Vec2, Vec3};
use chase_steer::fell_out_of_world;

use crate::{
    ChaseAgent, ChaseBake, ChaseGrid, ChaseImpulse, ChaseInput, ChaseInputConfig, ChaseObstacle,
    ChaseRayCaster, ChaseRoster, ChaseSpawn, ChaseTarget, ChaseTick, ChaseVelocity, LevelClock,
    LevelRestart,
};

fn to_vec3(transform: &Transform) -> Vec3 {
    let t = transform.translation;
    Vec3::new(t.x, t.y, t.z)
}

#[cfg(feature = "time")]
pub fn sync_tick_dt_from_bevy_time(time: Option<Res<Time>>, mut tick: ResMut<ChaseTick>) {
    let Some(time) = time else {
        return;
    };

    let dt = time.delta_secs();
    if dt.is_finite() && dt.is_sign_positive() {
        tick.0.dt_seconds = dt;
    }
}

pub fn advance_tick(mut tick: ResMut<ChaseTick>) {
    tick.0 = tick.0.next();
}

pub fn clear_impulses(mut query: Query<&mut ChaseImpulse>) {
    for mut impulse in query.iter_mut() {
        *impulse = ChaseImpulse::default();
    }
}

pub fn advance_level_clock(tick: Res<ChaseTick>, mut clock: ResMut<LevelClock>) {
    clock.elapsed += tick.0.dt();
}

/// Write the full pose of edited obstacles to their `Transform`.
pub fn apply_obstacle_edits(
    clock: Res<LevelClock>,
    mut query: Query<(&ChaseObstacle, &mut Transform), Changed<ChaseObstacle>>,
) {
    for (obstacle, mut transform) in query.iter_mut() {
        let pose = obstacle.0.transform;
        let position = obstacle.0.position_at(clock.elapsed);

        let rotation = pose.rotation;
        *transform = Transform::from_xyz(position.x, position.y, position.z)
            .with_rotation(Quat::from_euler(
                EulerRot::XYZ,
                rotation.x,
                rotation.y,
                rotation.z,
            ))
            .with_scale(bevy_math::Vec3::new(pose.scale.x, pose.scale.y, pose.scale.z));
    }
}

/// Move animated obstacles along their periodic motion. Never schedules a bake.
pub fn animate_obstacles(
    clock: Res<LevelClock>,
    mut query: Query<(&ChaseObstacle, &mut Transform)>,
) {
    for (obstacle, mut transform) in query.iter_mut() {
        if !obstacle.0.is_animated() {
            continue;
        }
        let position = obstacle.0.position_at(clock.elapsed);
        transform.translation.x = position.x;
        transform.translation.y = position.y;
        transform.translation.z = position.z;
    }
}

/// Added, edited or removed obstacles schedule a debounced re-bake.
pub fn detect_obstacle_edits(
    edited: Query<(), Changed<ChaseObstacle>>,
    mut removed: RemovedComponents<ChaseObstacle>,
    mut bake: ResMut<ChaseBake>,
) {
    let changes = edited.iter().count() + removed.read().count();
    if changes == 0 {
        return;
    }
    let outcome = bake.scheduler.notify_changed();
    tracing::debug!(changes, ?outcome, "Obstacle layout edited");
}

pub fn restart_on_fall(
    mut agents: Query<(
        &ChaseAgent,
        &mut Transform,
        &mut ChaseVelocity,
        Option<&ChaseSpawn>,
    )>,
    mut roster: ResMut<ChaseRoster>,
    mut target: ResMut<ChaseTarget>,
    mut events: EventWriter<LevelRestart>,
) {
    let fallen = agents
        .iter()
        .find(|(_, transform, ..)| fell_out_of_world(transform.translation.y))
        .map(|(agent, ..)| agent.slot);
    let Some(slot) = fallen else {
        return;
    };

    tracing::info!(agent = slot, "Agent fell out of the world; restarting level");
    roster.0.reset();
    target.0.reset();
    for (_, mut transform, mut velocity, spawn) in agents.iter_mut() {
        if let Some(spawn) = spawn {
            transform.translation.x = spawn.0.x;
            transform.translation.y = spawn.0.y;
            transform.translation.z = spawn.0.z;
        }
        velocity.0 = Vec3::ZERO;
    }
    events.write(LevelRestart { agent: slot });
}

/// Bake with the [`ChaseRayCaster`] resource when one is due.
pub fn bake_grid(
    tick: Res<ChaseTick>,
    caster: Option<Res<ChaseRayCaster>>,
    mut grid: ResMut<ChaseGrid>,
    mut bake: ResMut<ChaseBake>,
) {
    let caster = caster
        .as_deref()
        .map(|c| c.0.as_ref() as &dyn RayCaster);
    run_bake(tick.0.dt(), caster, &mut grid, &mut bake);
}

pub(crate) fn run_bake(
    dt: f32,
    caster: Option<&dyn RayCaster>,
    grid: &mut ChaseGrid,
    bake: &mut ChaseBake,
) {
    let ChaseBake {
        baker,
        scheduler,
        last_report,
    } = bake;
    if let BakeOutcome::Baked(report) = scheduler.run(dt, &mut grid.0, baker, caster) {
        *last_report = Some(report);
    }
}

/// Broadcast the human agent's position on the tracker's cadence.
pub fn track_target(
    tick: Res<ChaseTick>,
    roster: Res<ChaseRoster>,
    agents: Query<(&ChaseAgent, &Transform)>,
    mut target: ResMut<ChaseTarget>,
) {
    let Some(active) = roster.0.active() else {
        return;
    };
    let Some(position) = agents
        .iter()
        .find(|(agent, _)| agent.slot == active)
        .map(|(_, transform)| to_vec3(transform).horizontal())
    else {
        return;
    };
    target.0.observe(position, tick.0.dt());
}

pub fn replan_paths(
    tick: Res<ChaseTick>,
    grid: Res<ChaseGrid>,
    target: Res<ChaseTarget>,
    mut roster: ResMut<ChaseRoster>,
    agents: Query<(&ChaseAgent, &Transform)>,
) {
    let dt = tick.0.dt();
    let last_known = target.0.last_known();
    for (agent, transform) in agents.iter() {
        if roster.0.role(agent.slot) != Some(AgentRole::Autonomous) {
            continue;
        }
        let Some(controller) = roster.0.controller_mut(agent.slot) else {
            continue;
        };
        let position: Vec2 = to_vec3(transform).horizontal();
        controller.tick_replan(&grid.0, position, last_known, dt);
    }
}

pub fn steer_agents(
    tick: Res<ChaseTick>,
    mut roster: ResMut<ChaseRoster>,
    mut agents: Query<(&ChaseAgent, &Transform, &ChaseVelocity, &mut ChaseImpulse)>,
) {
    let dt = tick.0.dt();
    for (agent, transform, velocity, mut impulse) in agents.iter_mut() {
        if roster.0.role(agent.slot) != Some(AgentRole::Autonomous) {
            continue;
        }
        let Some(controller) = roster.0.controller_mut(agent.slot) else {
            continue;
        };
        let push = controller.steer(to_vec3(transform).horizontal(), velocity.0, dt);
        impulse.impulse += push;
    }
}

pub fn drive_human_agent(
    tick: Res<ChaseTick>,
    input: Res<ChaseInput>,
    config: Res<ChaseInputConfig>,
    roster: Res<ChaseRoster>,
    mut agents: Query<(&ChaseAgent, &mut ChaseImpulse)>,
) {
    let Some(active) = roster.0.active() else {
        return;
    };
    let drive = input.0.drive(&config.0, tick.0.dt());
    for (agent, mut impulse) in agents.iter_mut() {
        if agent.slot == active {
            impulse.impulse += drive.impulse;
            impulse.torque += drive.torque;
        }
    }
}
