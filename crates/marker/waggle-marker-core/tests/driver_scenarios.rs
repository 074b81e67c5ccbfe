use waggle_marker_core::{
    Config, CurveDef, CurveGeometry, Driver, DriverState, LayoutClass, ManualScheduler,
    MarkerChange, MarkerEvent, MotionContext, Outputs, Vec2,
};
use waggle_test_fixtures::curves;

fn straight() -> waggle_marker_core::Curve {
    let def: CurveDef = curves::load("straight-1000").expect("fixture");
    def.build(32).expect("curve")
}

fn desktop() -> MotionContext {
    MotionContext {
        layout: LayoutClass::Desktop,
        prefers_reduced_motion: false,
    }
}

fn mobile() -> MotionContext {
    MotionContext {
        layout: LayoutClass::Mobile,
        prefers_reduced_motion: false,
    }
}

fn new_driver() -> (Driver<ManualScheduler>, ManualScheduler) {
    let sched = ManualScheduler::new();
    (Driver::new(Config::default(), sched.clone()), sched)
}

/// Fire the pending frame, as the host would.
fn pump<G: CurveGeometry>(
    d: &mut Driver<ManualScheduler>,
    sched: &ManualScheduler,
    curve: &G,
    ts: f64,
) -> Option<Outputs> {
    sched.take_next()?;
    Some(d.on_frame(curve, ts).clone())
}

fn approx(a: f32, b: f32, eps: f32) -> bool {
    (a - b).abs() <= eps
}

fn started(out: &Outputs) -> Option<(f32, f32, f64)> {
    out.events.iter().find_map(|e| match e {
        MarkerEvent::AnimationStarted {
            from,
            to,
            duration_ms,
            ..
        } => Some((*from, *to, *duration_ms)),
        _ => None,
    })
}

#[test]
fn reference_desktop_sequence() {
    let curve = straight();
    assert_eq!(curve.total_length(), Some(1000.0));
    let (mut d, sched) = new_driver();

    let out = d.go_to(0, 4, &desktop(), &curve).clone();
    let (from, to, dur) = started(&out).expect("started");
    assert_eq!(from, 0.0);
    assert!(approx(to, 50.0, 1e-3));
    assert_eq!(dur, 600.0);

    // First frame latches the start time.
    let f = pump(&mut d, &sched, &curve, 1000.0).expect("frame");
    assert_eq!(f.last_pose().map(|p| p.x), Some(0.0));
    let f = pump(&mut d, &sched, &curve, 1300.0).expect("frame");
    assert!(approx(f.last_pose().unwrap().x, 25.0, 1e-3));
    let f = pump(&mut d, &sched, &curve, 1600.0).expect("frame");
    assert!(f
        .events
        .iter()
        .any(|e| matches!(e, MarkerEvent::Arrived { stop: 0, .. })));
    assert!(matches!(d.state(), DriverState::IdleAt(p) if approx(p, 50.0, 1e-3)));
    assert_eq!(sched.pending_count(), 0);

    let out = d.go_to(2, 4, &desktop(), &curve).clone();
    let (from, to, dur) = started(&out).expect("started");
    assert!(approx(from, 50.0, 1e-3));
    assert!(approx(to, (2.0 / 3.0 - 0.08) * 1000.0, 1e-2));
    assert!((dur - 1610.0).abs() < 0.1, "duration {dur}");
}

#[test]
fn retarget_mid_flight_continues_from_current_position() {
    let curve = straight();
    let (mut d, sched) = new_driver();

    d.go_to(3, 4, &desktop(), &curve);
    pump(&mut d, &sched, &curve, 0.0).expect("frame");
    // 3000ms move: halfway after 1500ms.
    let f = pump(&mut d, &sched, &curve, 1500.0).expect("frame");
    assert!(approx(f.last_pose().unwrap().x, 500.0, 1e-2));
    assert_eq!(sched.pending_count(), 1);

    let out = d.go_to(1, 4, &desktop(), &curve).clone();
    assert!(out
        .events
        .iter()
        .any(|e| matches!(e, MarkerEvent::AnimationCancelled { at } if approx(*at, 500.0, 1e-2))));
    let (from, to, _) = started(&out).expect("started");
    assert!(approx(from, 500.0, 1e-2));
    assert!(approx(to, 1000.0 / 3.0, 1e-2));

    // Exactly one live callback: the old one was cancelled before the new one.
    assert_eq!(sched.pending_count(), 1);
    assert_eq!(sched.frames().borrow().cancelled.len(), 1);

    // No jump: the first frame of the new move starts where the old one stopped.
    let f = pump(&mut d, &sched, &curve, 2000.0).expect("frame");
    assert!(approx(f.last_pose().unwrap().x, 500.0, 1e-2));

    // Run to completion.
    let mut ts = 2000.0;
    while sched.pending_count() > 0 {
        ts += 16.0;
        pump(&mut d, &sched, &curve, ts);
    }
    assert!(matches!(d.state(), DriverState::IdleAt(p) if approx(p, 1000.0 / 3.0, 1e-2)));
}

#[test]
fn rapid_commands_never_leak_frames() {
    let curve = straight();
    let (mut d, sched) = new_driver();
    for i in 0..20 {
        d.go_to(i % 4, 4, &desktop(), &curve);
        assert!(sched.pending_count() <= 1);
    }
    d.hide(&desktop());
    assert_eq!(sched.pending_count(), 0);
}

#[test]
fn reduced_motion_is_inert() {
    let curve = straight();
    let (mut d, sched) = new_driver();
    let ctx = MotionContext {
        layout: LayoutClass::Desktop,
        prefers_reduced_motion: true,
    };
    assert!(d.go_to(2, 4, &ctx, &curve).is_empty());
    assert!(d.hide(&ctx).is_empty());
    assert_eq!(sched.frames().borrow().requested, 0);
    assert!(!d.is_visible());
}

#[test]
fn within_tolerance_snaps_without_frames() {
    let curve = straight();
    let (mut d, sched) = new_driver();
    d.go_to(0, 4, &desktop(), &curve);
    let mut ts = 0.0;
    while sched.pending_count() > 0 {
        pump(&mut d, &sched, &curve, ts);
        ts += 100.0;
    }
    let requested = sched.frames().borrow().requested;

    let out = d.go_to(0, 4, &desktop(), &curve).clone();
    assert_eq!(sched.frames().borrow().requested, requested);
    assert!(out
        .events
        .iter()
        .any(|e| matches!(e, MarkerEvent::Snapped { stop: 0, .. })));
    // Already visible: no opacity change.
    assert_eq!(out.last_opacity(), None);
}

#[test]
fn snap_mid_flight_cancels_the_move() {
    let curve = straight();
    let (mut d, sched) = new_driver();
    // 0 -> 333.3 over 1000ms.
    d.go_to(1, 4, &desktop(), &curve);
    pump(&mut d, &sched, &curve, 0.0).expect("frame");
    pump(&mut d, &sched, &curve, 140.0).expect("frame");
    assert!(approx(d.position(), 46.667, 1e-2));
    assert!(d.is_animating());
    assert_eq!(sched.pending_count(), 1);
    let requested = sched.frames().borrow().requested;

    // Stop 0 rests at 50, within tolerance of the marker.
    let out = d.go_to(0, 4, &desktop(), &curve).clone();
    assert!(out
        .events
        .iter()
        .any(|e| matches!(e, MarkerEvent::AnimationCancelled { at } if approx(*at, 46.667, 1e-2))));
    assert!(out
        .events
        .iter()
        .any(|e| matches!(e, MarkerEvent::Snapped { stop: 0, position } if approx(*position, 50.0, 1e-3))));
    assert!(started(&out).is_none());
    assert_eq!(sched.pending_count(), 0);
    assert_eq!(sched.frames().borrow().requested, requested);
    assert_eq!(sched.frames().borrow().cancelled.len(), 1);
    assert!(!d.has_pending_frame());
    assert!(matches!(d.state(), DriverState::IdleAt(p) if approx(p, 50.0, 1e-3)));
    assert!(approx(out.last_pose().expect("pose").x, 50.0, 1e-3));
    // Stale frame callbacks after the snap do nothing.
    assert!(d.on_frame(&curve, 500.0).is_empty());
}

#[test]
fn snap_from_hidden_becomes_visible() {
    let def: CurveDef = curves::load("short-line").expect("fixture");
    let curve = def.build(8).expect("curve");
    let (mut d, sched) = new_driver();
    let out = d.go_to(0, 4, &mobile(), &curve).clone();
    assert_eq!(out.last_opacity(), Some((1.0, None)));
    assert!(d.is_visible());
    assert_eq!(sched.frames().borrow().requested, 0);
    let pose = out.last_pose().expect("pose");
    assert!(approx(pose.y, 0.2, 1e-4));
}

#[test]
fn hide_fades_and_rewinds() {
    let curve = straight();
    let (mut d, sched) = new_driver();
    d.go_to(3, 4, &desktop(), &curve);
    pump(&mut d, &sched, &curve, 0.0);
    pump(&mut d, &sched, &curve, 600.0);
    assert!(d.position() > 0.0);

    let out = d.hide(&desktop()).clone();
    assert_eq!(
        out.changes,
        vec![MarkerChange::Opacity {
            value: 0.0,
            transition_ms: Some(300.0)
        }]
    );
    assert_eq!(d.state(), DriverState::Hidden);
    assert_eq!(d.position(), 0.0);
    assert_eq!(sched.pending_count(), 0);

    // Next activation animates from the curve start.
    let out = d.go_to(1, 4, &desktop(), &curve).clone();
    assert_eq!(started(&out).map(|s| s.0), Some(0.0));
}

#[test]
fn unavailable_curve_and_bad_index_are_noops() {
    struct Unmounted;
    impl CurveGeometry for Unmounted {
        fn total_length(&self) -> Option<f32> {
            None
        }
        fn point_at_length(&self, _distance: f32) -> Option<Vec2> {
            None
        }
    }

    let (mut d, sched) = new_driver();
    assert!(d.go_to(1, 4, &desktop(), &Unmounted).is_empty());
    assert!(d.go_to(4, 4, &desktop(), &straight()).is_empty());
    assert_eq!(sched.frames().borrow().requested, 0);
    assert_eq!(d.state(), DriverState::Hidden);
}

#[test]
fn mobile_last_stop_uses_end_offset() {
    let curve = straight();
    let (mut d, _sched) = new_driver();
    let out = d.go_to(3, 4, &mobile(), &curve).clone();
    let (_, to, _) = started(&out).expect("started");
    assert!(approx(to, 950.0, 1e-2));
}

#[test]
fn frames_emit_finite_rotations_in_range() {
    let def: CurveDef = curves::load("journey-wide").expect("fixture");
    let curve = def.build(32).expect("curve");
    let (mut d, sched) = new_driver();
    d.go_to(3, 4, &desktop(), &curve);
    let mut ts = 0.0;
    while sched.pending_count() > 0 {
        let f = pump(&mut d, &sched, &curve, ts).expect("frame");
        let p = f.last_pose().expect("pose");
        assert!(p.x.is_finite() && p.y.is_finite());
        assert!(p.angle_deg > -180.0 && p.angle_deg <= 180.0);
        ts += 16.0;
    }
    assert!(matches!(d.state(), DriverState::IdleAt(_)));
}
