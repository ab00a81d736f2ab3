//! Rapier integration: bake ray casts, body velocity in, impulses out.

use bevy_ecs::prelude::*;
use bevy_rapier3d::math::Vect;
use bevy_rapier3d::prelude::*;

use chase_grid::{RayCaster, RayHit, Vec3};

use crate::{ChaseAgent, ChaseBake, ChaseGrid, ChaseImpulse, ChaseTick, ChaseVelocity, LevelRestart};

fn to_vect(v: Vec3) -> Vect {
    Vect::new(v.x, v.y, v.z)
}

/// Bake ray casts answered by Rapier's query pipeline.
///
/// Only fixed and kinematic colliders count as surfaces; agents (dynamic bodies) and sensors are
/// ignored.
pub struct RapierRayCaster<'a> {
    context: &'a RapierContext<'a>,
}

impl<'a> RapierRayCaster<'a> {
    pub fn new(context: &'a RapierContext<'a>) -> Self {
        Self { context }
    }
}

impl RayCaster for RapierRayCaster<'_> {
    fn cast_ray(&self, origin: Vec3, direction: Vec3, max_distance: f32) -> Option<RayHit> {
        let filter = QueryFilter::exclude_dynamic().exclude_sensors();
        self.context
            .cast_ray(to_vect(origin), to_vect(direction), max_distance, true, filter)
            .map(|(_entity, distance)| RayHit { distance })
    }
}

/// Bake against the default Rapier context. Without one the bake is retried later.
pub fn bake_grid_with_rapier(
    tick: Res<ChaseTick>,
    rapier: ReadRapierContext,
    mut grid: ResMut<ChaseGrid>,
    mut bake: ResMut<ChaseBake>,
) {
    let context = rapier.single().ok();
    let caster = context.as_ref().map(|ctx| RapierRayCaster::new(ctx));
    let caster = caster.as_ref().map(|c| c as &dyn RayCaster);
    crate::systems::run_bake(tick.0.dt(), caster, &mut grid, &mut bake);
}

pub fn sync_velocity_from_rapier(mut query: Query<(&Velocity, &mut ChaseVelocity), With<ChaseAgent>>) {
    for (velocity, mut chase_velocity) in query.iter_mut() {
        let v = velocity.linvel;
        chase_velocity.0 = Vec3::new(v.x, v.y, v.z);
    }
}

pub fn apply_impulses_to_rapier(mut query: Query<(&ChaseImpulse, &mut ExternalImpulse)>) {
    for (requested, mut external) in query.iter_mut() {
        external.impulse += to_vect(requested.impulse);
        external.torque_impulse += to_vect(requested.torque);
    }
}

/// Stop every agent body after a level restart.
pub fn reset_rapier_velocities(
    mut restarts: EventReader<LevelRestart>,
    mut query: Query<&mut Velocity, With<ChaseAgent>>,
) {
    if restarts.read().count() == 0 {
        return;
    }
    for mut velocity in query.iter_mut() {
        *velocity = Velocity::zero();
    }
}
