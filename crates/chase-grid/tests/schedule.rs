use chase_grid::{
    BakeOutcome, BakeScheduler, BakeTiming, BoxScene, GridBaker, NavGrid, NotifyOutcome,
    ObstacleId, ObstacleLayout, ObstaclePatch, ObstaclePreset, Vec3,
};

/// Scheduler whose first bake already ran.
fn settled() -> BakeScheduler {
    let mut scheduler = BakeScheduler::new(BakeTiming::default());
    let ticket = scheduler.request_now().unwrap();
    scheduler.finish(ticket);
    scheduler
}

fn count_bakes(scheduler: &mut BakeScheduler, seconds: f32, dt: f32) -> usize {
    let mut bakes = 0;
    let steps = (seconds / dt).round() as usize;
    for _ in 0..steps {
        if let Some(ticket) = scheduler.tick(dt) {
            bakes += 1;
            scheduler.finish(ticket);
        }
    }
    bakes
}

#[test]
fn first_bake_waits_for_initial_delay() {
    let mut scheduler = BakeScheduler::new(BakeTiming::default());

    for _ in 0..3 {
        assert!(scheduler.tick(0.25).is_none());
    }
    assert_eq!(scheduler.notify_changed(), NotifyOutcome::Deferred);

    let ticket = scheduler.tick(0.25).expect("initial bake due after one second");
    assert!(scheduler.is_baking());
    scheduler.finish(ticket);
    assert!(!scheduler.is_pending());
}

#[test]
fn burst_of_changes_bakes_once() {
    let mut scheduler = settled();

    // Five notifications within 50 ms.
    for _ in 0..5 {
        assert_eq!(scheduler.notify_changed(), NotifyOutcome::Scheduled);
        assert!(scheduler.tick(0.01).is_none());
    }

    assert_eq!(count_bakes(&mut scheduler, 0.5, 0.01), 1);
    assert_eq!(scheduler.bakes_started(), 2);
}

#[test]
fn steady_changes_postpone_the_bake() {
    let mut scheduler = settled();

    for _ in 0..20 {
        scheduler.notify_changed();
        assert!(scheduler.tick(0.05).is_none());
    }
    assert_eq!(count_bakes(&mut scheduler, 0.2, 0.05), 1);
}

#[test]
fn triggers_during_a_bake_are_dropped() {
    let mut scheduler = settled();
    scheduler.notify_changed();

    let mut ticket = None;
    for _ in 0..20 {
        if let Some(t) = scheduler.tick(0.01) {
            ticket = Some(t);
            break;
        }
    }
    let ticket = ticket.expect("debounced bake");

    assert_eq!(scheduler.notify_changed(), NotifyOutcome::Ignored);
    assert!(scheduler.request_now().is_none());
    assert!(scheduler.tick(1.0).is_none());

    scheduler.finish(ticket);
    assert_eq!(count_bakes(&mut scheduler, 1.0, 0.01), 0);
}

#[test]
fn missing_ray_caster_retries_later() {
    let mut scheduler = BakeScheduler::new(BakeTiming {
        initial_delay: 0.0,
        quiet_period: 0.25,
    });
    let baker = GridBaker::default();
    let mut grid = NavGrid::new(4.0, 4.0, 1.0).unwrap();
    let scene = BoxScene::flat_floor(4.0, 4.0);

    assert_eq!(
        scheduler.run(0.0, &mut grid, &baker, None),
        BakeOutcome::Skipped
    );
    assert!(!scheduler.is_baking());
    assert_eq!(grid.version(), 0);

    assert_eq!(
        scheduler.run(0.125, &mut grid, &baker, Some(&scene)),
        BakeOutcome::Idle
    );
    match scheduler.run(0.125, &mut grid, &baker, Some(&scene)) {
        BakeOutcome::Baked(report) => {
            assert_eq!(report.floor, 16);
            assert_eq!(report.version, 1);
        }
        other => panic!("expected a bake, got {other:?}"),
    }
}

#[test]
fn layout_edits_feed_the_scheduler() {
    let mut layout = ObstacleLayout::new();
    let changes = layout.subscribe();
    let mut scheduler = settled();

    let preset = ObstaclePreset::all()[0];
    assert!(layout.add(preset.instantiate("box-1", Vec3::new(0.5, 0.5, 0.5))));
    assert!(!layout.add(preset.instantiate("box-1", Vec3::ZERO)));
    let id = ObstacleId::new("box-1");
    assert!(layout.update(&id, ObstaclePatch::move_to(Vec3::new(1.5, 0.5, 0.5))));
    assert!(layout.remove(&id).is_some());

    assert_eq!(scheduler.absorb(changes.try_iter()), 3);
    assert!(scheduler.is_pending());
    assert_eq!(count_bakes(&mut scheduler, 0.5, 0.01), 1);
}

#[test]
fn dropped_subscribers_are_pruned() {
    let mut layout = ObstacleLayout::new();
    let kept = layout.subscribe();
    drop(layout.subscribe());

    layout.add(ObstaclePreset::all()[2].instantiate("pillar", Vec3::ZERO));
    assert_eq!(kept.try_iter().count(), 1);
}
