use waggle_marker_core::{
    Config, Curve, CurveDef, CurveGeometry, CurveVariant, EnvironmentSignal, InputMode,
    ManualScheduler, MarkerChange, MarkerEvent, MotionContext, Outputs, StopList, Timeline,
};
use waggle_test_fixtures::timelines;

fn journey(width: f32) -> (Timeline<Curve, ManualScheduler>, ManualScheduler) {
    let cfg = Config::default();
    let (wide, tall, list): (CurveDef, CurveDef, StopList) =
        timelines::load("journey").expect("journey");
    let ctx = MotionContext::from_environment(width, false, &cfg);
    let sched = ManualScheduler::new();
    let tl = Timeline::from_defs(cfg, list, &wide, &tall, ctx, sched.clone()).expect("timeline");
    (tl, sched)
}

fn run_to_rest(tl: &mut Timeline<Curve, ManualScheduler>, sched: &ManualScheduler) -> Vec<Outputs> {
    let mut ts = 0.0;
    let mut frames = Vec::new();
    while sched.take_next().is_some() {
        frames.push(tl.on_frame(ts).clone());
        ts += 16.0;
    }
    frames
}

fn active_events(out: &Outputs) -> Vec<Option<String>> {
    out.events
        .iter()
        .filter_map(|e| match e {
            MarkerEvent::ActiveStopChanged { stop } => Some(stop.clone()),
            _ => None,
        })
        .collect()
}

#[test]
fn hover_moves_marker_and_reports_active_stop() {
    let (mut tl, sched) = journey(1280.0);
    assert_eq!(tl.input_mode(), InputMode::Pointer);

    let out = tl.enter(1, InputMode::Pointer).clone();
    assert_eq!(active_events(&out), vec![Some("sales".to_string())]);
    assert_eq!(out.last_opacity(), Some((1.0, None)));
    assert_eq!(tl.active_stop().map(|s| s.id.as_str()), Some("sales"));

    let frames = run_to_rest(&mut tl, &sched);
    assert!(!frames.is_empty());
    let len = tl.active_curve().total_length().expect("len");
    let expected = len / 3.0;
    assert!((tl.driver().position() - expected).abs() < 1e-2);

    // Leaving the card clears the highlight but keeps the marker.
    let out = tl.leave(1, InputMode::Pointer).clone();
    assert_eq!(active_events(&out), vec![None]);
    assert!(out.changes.is_empty());
    assert!(tl.driver().is_visible());
}

#[test]
fn container_leave_hides_on_desktop_only() {
    let (mut tl, _sched) = journey(1280.0);
    tl.enter(0, InputMode::Pointer);
    let out = tl.container_leave().clone();
    assert!(out.changes.contains(&MarkerChange::Opacity {
        value: 0.0,
        transition_ms: Some(300.0)
    }));
    assert!(!tl.driver().is_visible());

    let (mut tl, _sched) = journey(375.0);
    assert_eq!(tl.input_mode(), InputMode::Touch);
    tl.enter(2, InputMode::Touch);
    assert!(tl.container_leave().is_empty());
    assert!(tl.driver().is_visible());
}

#[test]
fn wrong_input_mode_is_ignored() {
    let (mut tl, sched) = journey(375.0);
    assert!(tl.enter(0, InputMode::Pointer).is_empty());
    assert_eq!(sched.pending_count(), 0);
    let out = tl.enter(0, InputMode::Touch).clone();
    assert!(!out.is_empty());
    assert_eq!(tl.active_variant(), CurveVariant::Tall);
}

#[test]
fn enter_by_id_resolves_and_ignores_unknown() {
    let (mut tl, sched) = journey(1280.0);
    assert!(tl.enter_by_id("nobody", InputMode::Pointer).is_empty());
    tl.enter_by_id("engineer", InputMode::Pointer);
    assert_eq!(tl.driver().target_stop(), Some(3));
    assert_eq!(sched.pending_count(), 1);
}

#[test]
fn layout_switch_resets_marker() {
    let (mut tl, sched) = journey(1280.0);
    tl.enter(3, InputMode::Pointer);
    assert_eq!(sched.pending_count(), 1);

    // Desktop -> tablet keeps the wide curve.
    assert!(tl.apply(EnvironmentSignal::ViewportWidth(900.0)).is_empty());
    assert!(tl.driver().is_animating());

    let out = tl.apply(EnvironmentSignal::ViewportWidth(500.0)).clone();
    assert!(out.events.contains(&MarkerEvent::Reset));
    assert_eq!(sched.pending_count(), 0);
    assert_eq!(tl.driver().position(), 0.0);
    assert_eq!(tl.active_variant(), CurveVariant::Tall);
}

#[test]
fn reduced_motion_signal_silences_commands() {
    let (mut tl, sched) = journey(1280.0);
    assert!(tl.apply(EnvironmentSignal::ReducedMotion(true)).is_empty());
    assert!(tl.enter(1, InputMode::Pointer).is_empty());
    assert!(tl.hide().is_empty());
    assert_eq!(sched.frames().borrow().requested, 0);
    assert_eq!(tl.stroke_reveal().draw_duration_ms, None);
}

#[test]
fn section_visible_resets_without_fade() {
    let (mut tl, sched) = journey(1280.0);
    tl.enter(2, InputMode::Pointer);
    run_to_rest(&mut tl, &sched);
    let out = tl.section_visible().clone();
    assert_eq!(out.last_opacity(), Some((0.0, None)));
    assert_eq!(active_events(&out), vec![None]);
    assert_eq!(tl.driver().position(), 0.0);
    assert!(tl.active_stop().is_none());
}

#[test]
fn card_pose_tracks_highlight() {
    let (mut tl, _sched) = journey(1280.0);
    assert_eq!(tl.card_pose(1, 2.0).offset_y, 120.0);
    tl.enter(1, InputMode::Pointer);
    let pose = tl.card_pose(1, 2.0);
    assert_eq!(pose.offset_y, 116.0);
    assert_eq!(pose.tilt_deg, 2.0);
    assert!(!tl.card_pose(0, 2.0).elevated);
}

#[test]
fn replacing_active_curve_invalidates() {
    let (mut tl, sched) = journey(1280.0);
    tl.go_to(2);
    assert_eq!(sched.pending_count(), 1);
    let replacement = Curve::parse("M0,0 L500,0").expect("curve");
    // Replacing the inactive curve leaves the move alone.
    assert!(tl.set_curve(CurveVariant::Tall, replacement.clone()).is_empty());
    assert_eq!(sched.pending_count(), 1);
    let out = tl.set_curve(CurveVariant::Wide, replacement).clone();
    assert!(out.events.contains(&MarkerEvent::Reset));
    assert_eq!(tl.active_curve().total_length(), Some(500.0));
}

#[test]
fn single_stop_rests_at_curve_start() {
    let cfg = Config::default();
    let (wide, tall, list): (CurveDef, CurveDef, StopList) =
        timelines::load("single-straight").expect("single");
    let ctx = MotionContext::from_environment(1280.0, false, &cfg);
    let sched = ManualScheduler::new();
    let mut tl = Timeline::from_defs(cfg, list, &wide, &tall, ctx, sched.clone()).expect("timeline");
    let out = tl.enter(0, InputMode::Pointer).clone();
    // The marker starts at 0, so it appears in place.
    assert!(out
        .events
        .iter()
        .any(|e| matches!(e, MarkerEvent::Snapped { stop: 0, position } if *position == 0.0)));
    assert_eq!(out.last_opacity(), Some((1.0, None)));
    assert_eq!(sched.pending_count(), 0);
    run_to_rest(&mut tl, &sched);
    assert_eq!(tl.driver().position(), 0.0);
    assert_eq!(tl.active_stop().map(|s| s.id.as_str()), Some("only"));
}
