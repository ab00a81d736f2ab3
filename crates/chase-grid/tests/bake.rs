use chase_grid::{
    Axis, BakeConfig, BoxScene, GridBaker, GridCoord, NavGrid, Obstacle, ObstacleKind,
    ObstacleLayout, ObstacleTransform, PeriodicMotion, SceneBox, Vec3,
};

#[test]
fn bake_with_no_hits_blocks_everything() {
    let mut grid = NavGrid::new(10.0, 10.0, 1.0).unwrap();
    let report = GridBaker::default().bake(&mut grid, &BoxScene::empty());

    assert!(grid.cells().iter().all(|c| !c.walkable));
    assert_eq!(report.void, grid.len());
    assert_eq!(report.floor, 0);
    assert_eq!(report.version, 1);
}

#[test]
fn flat_floor_is_fully_walkable() {
    let mut grid = NavGrid::new(10.0, 10.0, 1.0).unwrap();
    grid.apply_walkability(&grid.uniform_mask(false));

    let report = GridBaker::default().bake(&mut grid, &BoxScene::flat_floor(10.0, 10.0));

    assert!(grid.cells().iter().all(|c| c.walkable));
    assert_eq!(report.floor, grid.len());
    assert_eq!(report.blocked(), 0);
}

#[test]
fn each_bake_is_one_version_step() {
    let mut grid = NavGrid::new(10.0, 10.0, 1.0).unwrap();
    let baker = GridBaker::default();
    let scene = BoxScene::flat_floor(10.0, 10.0);

    baker.bake(&mut grid, &scene);
    baker.bake(&mut grid, &scene);
    assert_eq!(grid.version(), 2);

    // Sampling alone never touches the grid.
    let (mask, report) = baker.sample(&grid, &scene);
    assert_eq!(grid.version(), 2);
    assert_eq!(mask.walkable_count(), report.floor);
}

#[test]
fn steps_and_pits_follow_thresholds() {
    let mut grid = NavGrid::new(6.0, 2.0, 1.0).unwrap();
    let mut scene = BoxScene::empty();
    // Floor under columns 0..=3. Column 5 has no support at all.
    scene.push(SceneBox::new(
        Vec3::new(-1.0, -0.05, 0.0),
        Vec3::new(2.0, 0.05, 1.0),
    ));
    // Column 0 (x = -2.5): a low step, top at 0.15.
    scene.push(SceneBox::new(
        Vec3::new(-2.5, 0.05, 0.0),
        Vec3::new(0.4, 0.1, 1.0),
    ));
    // Column 1 (x = -1.5): a wall, top at 1.0.
    scene.push(SceneBox::new(
        Vec3::new(-1.5, 0.5, 0.0),
        Vec3::new(0.4, 0.5, 1.0),
    ));
    // Column 4 (x = 1.5): a pit floor far below.
    scene.push(SceneBox::new(
        Vec3::new(1.5, -2.0, 0.0),
        Vec3::new(0.4, 0.1, 1.0),
    ));

    let report = GridBaker::new(BakeConfig::default()).bake(&mut grid, &scene);

    for z in 0..2 {
        assert!(grid.is_walkable(GridCoord::new(0, z)), "low step");
        assert!(!grid.is_walkable(GridCoord::new(1, z)), "wall");
        assert!(grid.is_walkable(GridCoord::new(2, z)));
        assert!(grid.is_walkable(GridCoord::new(3, z)));
        assert!(!grid.is_walkable(GridCoord::new(4, z)), "pit");
        assert!(!grid.is_walkable(GridCoord::new(5, z)), "void");
    }
    assert_eq!(report.too_high, 2);
    assert_eq!(report.too_low, 2);
    assert_eq!(report.void, 2);
    assert_eq!(report.floor, 6);
}

#[test]
fn default_level_blocks_its_walls() {
    let mut grid = NavGrid::new(40.0, 40.0, 1.0).unwrap();
    let layout = ObstacleLayout::default_level();
    let scene = BoxScene::from_layout(&layout, 0.0, 40.0, 40.0);

    let report = GridBaker::default().bake(&mut grid, &scene);
    assert!(report.too_high > 0);

    let inside_u_left = grid.world_to_grid(-2.5, 9.5).unwrap();
    assert!(!grid.is_walkable(inside_u_left));

    let open_field = grid.world_to_grid(10.5, -10.5).unwrap();
    assert!(grid.is_walkable(open_field));

    // The U trap is enterable from the open side.
    assert!(!grid.find_path(0.5, 0.5, 0.5, 10.5).is_empty());
}

#[test]
fn animated_obstacles_are_sampled_at_bake_time() {
    let layout = ObstacleLayout::from_obstacles([Obstacle::new(
        "bobber",
        ObstacleKind::Animated {
            motion: PeriodicMotion {
                axis: Axis::Y,
                speed: 1.0,
                amplitude: 1.0,
            },
        },
        ObstacleTransform {
            position: Vec3::new(0.5, 0.5, 0.5),
            rotation: Vec3::ZERO,
            scale: Vec3::ONE,
        },
    )]);
    let baker = GridBaker::default();
    let mut grid = NavGrid::new(4.0, 4.0, 1.0).unwrap();
    let cell = grid.world_to_grid(0.5, 0.5).unwrap();

    // Raised: top at y = 1.
    baker.bake(&mut grid, &BoxScene::from_layout(&layout, 0.0, 4.0, 4.0));
    assert!(!grid.is_walkable(cell));

    // Sunk: top at y = 0, flush with the floor.
    let sunk = 1.5 * core::f32::consts::PI;
    baker.bake(&mut grid, &BoxScene::from_layout(&layout, sunk, 4.0, 4.0));
    assert!(grid.is_walkable(cell));
}
