use chase_core::{ensure_positive, ConfigError, Debouncer, IntervalTimer, TickContext};

#[test]
fn burst_of_triggers_fires_once_after_quiet_period() {
    let mut debounce = Debouncer::new(0.1);
    let mut fires = 0;

    // Five triggers 10 ms apart (a 40 ms burst).
    for _ in 0..5 {
        debounce.trigger();
        if debounce.tick(0.01) {
            fires += 1;
        }
    }
    assert_eq!(fires, 0);
    assert!(debounce.is_pending());

    // Quiet: 200 ms of 10 ms steps.
    for _ in 0..20 {
        if debounce.tick(0.01) {
            fires += 1;
        }
    }
    assert_eq!(fires, 1);
    assert!(!debounce.is_pending());
}

#[test]
fn retrigger_reschedules_deadline() {
    let mut debounce = Debouncer::new(1.0);
    debounce.trigger();
    assert!(!debounce.tick(0.75));
    debounce.trigger();
    assert!(!debounce.tick(0.75));
    assert!(debounce.tick(0.25));
}

#[test]
fn cancel_drops_pending_deadline() {
    let mut debounce = Debouncer::new(0.5);
    debounce.trigger();
    debounce.cancel();
    assert!(!debounce.tick(10.0));
}

#[test]
fn trigger_after_uses_custom_delay() {
    let mut debounce = Debouncer::new(0.1);
    debounce.trigger_after(1.0);
    assert!(!debounce.tick(0.5));
    assert_eq!(debounce.remaining(), Some(0.5));
    assert!(debounce.tick(0.5));
}

#[test]
fn interval_timer_cadence_matches_tick_context() {
    let mut ctx = TickContext::new(0, 0.125);
    let mut timer = IntervalTimer::new(0.5);
    let mut fired_at = Vec::new();
    for _ in 0..16 {
        if timer.tick(ctx.dt()) {
            fired_at.push(ctx.tick);
        }
        ctx = ctx.next();
    }
    assert_eq!(fired_at, vec![3, 7, 11, 15]);
}

#[test]
fn config_checks_report_field() {
    assert!(ensure_positive("cell_size", 1.0).is_ok());
    let err = ensure_positive("cell_size", 0.0).unwrap_err();
    assert_eq!(
        err,
        ConfigError::NonPositive {
            field: "cell_size",
            value: 0.0
        }
    );
    assert!(err.to_string().contains("cell_size"));
}
