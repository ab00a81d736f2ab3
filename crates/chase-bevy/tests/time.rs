#![cfg(feature = "time")]

use std::time::Duration;

use bevy_app::App;
use bevy_time::Time;

use chase_bevy::{ChaseNavConfig, ChaseNavPlugin, ChaseTick, LevelClock};
use chase_core::TickContext;

#[test]
fn bevy_time_drives_the_chase_tick_step() {
    let mut app = App::new();
    app.add_plugins(ChaseNavPlugin::new(ChaseNavConfig::default()).unwrap());
    app.insert_resource(ChaseTick(TickContext::new(0, 123.0)));

    let mut time: Time = Time::default();
    time.advance_by(Duration::from_millis(250));
    app.insert_resource(time);

    app.update();

    let tick = app.world().resource::<ChaseTick>();
    assert!((tick.0.dt_seconds - 0.25).abs() < 1e-6);
    assert_eq!(tick.0.tick, 1);

    let clock = app.world().resource::<LevelClock>();
    assert!((clock.elapsed - 0.25).abs() < 1e-6);
}
