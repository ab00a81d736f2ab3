use bevy_app::App;
use bevy_ecs::event::Events;
use bevy_math::{EulerRot, Quat};
use bevy_transform::components::Transform;

use chase_bevy::{
    ChaseAgent, ChaseBake, ChaseGrid, ChaseImpulse, ChaseInput, ChaseNavConfig, ChaseNavPlugin,
    ChaseObstacle, ChaseRayCaster, ChaseRoster, ChaseSpawn, ChaseTick, ChaseVelocity, LevelRestart,
};
use chase_core::TickContext;
use chase_grid::{
    BakeTiming, BoxScene, GridCoord, GridSpec, Obstacle, ObstacleKind, ObstaclePreset,
    ObstacleTransform, Vec3,
};
use chase_steer::HumanInput;

fn app_with(config: ChaseNavConfig, scene: BoxScene) -> App {
    let mut app = App::new();
    app.add_plugins(ChaseNavPlugin::new(config).unwrap());
    app.insert_resource(ChaseTick(TickContext::new(0, 0.25)));
    app.insert_resource(ChaseRayCaster::new(scene));
    app
}

fn arena_config() -> ChaseNavConfig {
    ChaseNavConfig {
        grid: GridSpec {
            map_width: 20.0,
            map_height: 20.0,
            cell_size: 1.0,
        },
        timing: BakeTiming {
            initial_delay: 0.0,
            quiet_period: 0.1,
        },
        ..ChaseNavConfig::default()
    }
}

fn spawn_agent(app: &mut App, slot: u32, position: Vec3) {
    app.world_mut().spawn((
        ChaseAgent { slot },
        Transform::from_xyz(position.x, position.y, position.z),
        ChaseVelocity::default(),
        ChaseImpulse::default(),
        ChaseSpawn(position),
    ));
}

fn bakes_started(app: &App) -> u64 {
    app.world().resource::<ChaseBake>().scheduler.bakes_started()
}

#[test]
fn initial_bake_waits_for_the_startup_delay() {
    let mut app = app_with(ChaseNavConfig::default(), BoxScene::empty());

    for _ in 0..3 {
        app.update();
    }
    assert_eq!(bakes_started(&app), 0);
    assert!(app.world().resource::<ChaseBake>().last_report.is_none());

    app.update();
    assert_eq!(bakes_started(&app), 1);

    let bake = app.world().resource::<ChaseBake>();
    let report = bake.last_report.unwrap();
    assert_eq!(report.floor, 0);
    assert_eq!(report.void, 40 * 40);

    let grid = &app.world().resource::<ChaseGrid>().0;
    assert!(!grid.is_walkable(GridCoord::new(0, 0)));
    assert_eq!(grid.version(), report.version);
}

#[test]
fn obstacle_edits_rebake_but_animation_does_not() {
    let mut app = app_with(ChaseNavConfig::default(), BoxScene::empty());
    for _ in 0..4 {
        app.update();
    }
    assert_eq!(bakes_started(&app), 1);

    let [_, _, _, bobbing, _] = ObstaclePreset::all();
    let obstacle = bobbing.instantiate("bobber", Vec3::new(2.0, 0.5, 2.0));
    let entity = app
        .world_mut()
        .spawn((ChaseObstacle(obstacle), Transform::default()))
        .id();

    app.update();
    assert_eq!(bakes_started(&app), 2);

    let y_before = app.world().get::<Transform>(entity).unwrap().translation.y;
    for _ in 0..8 {
        app.update();
    }
    let y_after = app.world().get::<Transform>(entity).unwrap().translation.y;
    assert!((y_before - y_after).abs() > 1e-3, "obstacle should be animating");
    assert_eq!(bakes_started(&app), 2);

    app.world_mut()
        .get_mut::<ChaseObstacle>(entity)
        .unwrap()
        .0
        .transform
        .position = Vec3::new(-3.0, 0.5, 4.0);
    app.update();
    assert_eq!(bakes_started(&app), 3);

    app.world_mut().despawn(entity);
    app.update();
    assert_eq!(bakes_started(&app), 4);
}

#[test]
fn obstacle_pose_uses_xyz_euler_order() {
    let mut app = app_with(ChaseNavConfig::default(), BoxScene::empty());
    let obstacle = Obstacle::new(
        "tilted",
        ObstacleKind::StaticBox,
        ObstacleTransform {
            position: Vec3::new(1.0, 0.5, -2.0),
            rotation: Vec3::new(0.3, 0.6, 0.9),
            scale: Vec3::new(4.0, 1.0, 1.0),
        },
    );
    let entity = app
        .world_mut()
        .spawn((ChaseObstacle(obstacle), Transform::default()))
        .id();

    app.update();

    let transform = app.world().get::<Transform>(entity).unwrap();
    let expected = Quat::from_euler(EulerRot::XYZ, 0.3, 0.6, 0.9);
    let reversed =
        Quat::from_rotation_z(0.9) * Quat::from_rotation_y(0.6) * Quat::from_rotation_x(0.3);
    assert!(transform.rotation.angle_between(expected) < 1e-4);
    assert!(transform.rotation.angle_between(reversed) > 1e-2);
    assert_eq!(transform.translation.x, 1.0);
    assert_eq!(transform.translation.z, -2.0);
    assert_eq!(transform.scale.x, 4.0);
}

#[test]
fn pursuer_plans_toward_the_player_and_pushes() {
    let mut app = app_with(arena_config(), BoxScene::flat_floor(20.0, 20.0));
    spawn_agent(&mut app, 0, Vec3::new(5.5, 0.5, 5.5));
    spawn_agent(&mut app, 1, Vec3::new(-5.5, 0.5, -5.5));

    app.update();

    let roster = &app.world().resource::<ChaseRoster>().0;
    let pursuer = roster.controller(1).unwrap();
    assert_eq!(pursuer.held_path_len(), 23);
    assert_eq!(roster.controller(0).unwrap().held_path_len(), 0);

    let mut impulses = app.world_mut().query::<(&ChaseAgent, &ChaseImpulse)>();
    for (agent, impulse) in impulses.iter(app.world()) {
        if agent.slot == 1 {
            assert!(impulse.impulse.x > 0.0 || impulse.impulse.z > 0.0);
            assert_eq!(impulse.impulse.y, 0.0);
        } else {
            assert_eq!(*impulse, ChaseImpulse::default());
        }
    }
}

#[test]
fn human_input_pushes_the_active_agent() {
    let mut app = app_with(arena_config(), BoxScene::flat_floor(20.0, 20.0));
    spawn_agent(&mut app, 0, Vec3::new(0.5, 0.5, 0.5));

    app.insert_resource(ChaseInput(HumanInput {
        forward: true,
        ..HumanInput::default()
    }));
    app.update();

    let mut impulses = app.world_mut().query::<(&ChaseAgent, &ChaseImpulse)>();
    let (_, impulse) = impulses.single(app.world()).unwrap();
    assert!(impulse.impulse.z < 0.0);
    assert!(impulse.torque.x < 0.0);
}

#[test]
fn falling_out_of_the_world_restarts_the_level() {
    let mut app = app_with(arena_config(), BoxScene::flat_floor(20.0, 20.0));
    spawn_agent(&mut app, 0, Vec3::new(0.5, 0.5, 0.5));
    spawn_agent(&mut app, 1, Vec3::new(-5.5, 0.5, -5.5));
    app.update();

    {
        let mut roster = app.world_mut().resource_mut::<ChaseRoster>();
        roster.0.toggle();
        assert_eq!(roster.0.active(), Some(1));
    }

    let mut agents = app.world_mut().query::<(&ChaseAgent, &mut Transform)>();
    for (agent, mut transform) in agents.iter_mut(app.world_mut()) {
        if agent.slot == 0 {
            transform.translation.y = -6.0;
        }
    }
    app.update();

    assert_eq!(app.world().resource::<Events<LevelRestart>>().len(), 1);
    assert_eq!(app.world().resource::<ChaseRoster>().0.active(), Some(0));

    let mut agents = app.world_mut().query::<(&ChaseAgent, &Transform)>();
    for (agent, transform) in agents.iter(app.world()) {
        if agent.slot == 0 {
            assert_eq!(transform.translation.y, 0.5);
            assert_eq!(transform.translation.x, 0.5);
        }
    }
}
