use super::*;
use crate::{
    config::{ClockConfig, EngineConfig},
    playback::observer::RecordingObserver,
};

fn id(s: &str) -> EntityId {
    EntityId::from(s)
}

fn scenario_store() -> SampleStore {
    SampleStore::from_tracks([(
        id("p1"),
        Track::from_unsorted(vec![
            Sample::at(0.0, 0.0, 0.5).with_motion(Motion::Still),
            Sample::at(10.0, 0.0, 0.5).with_motion(Motion::Still),
            Sample::at(20.0, 90.0, 0.5).with_motion(Motion::Moving),
        ]),
    )])
}

fn approx(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

#[test]
fn scenario_by_ticks() {
    let mut s = PlaybackSession::new(scenario_store(), &EngineConfig::default()).unwrap();
    let p1 = id("p1");

    for _ in 0..10 {
        s.tick(0.5);
    }
    let st = s.entity_state(&p1).unwrap();
    assert_eq!(s.time_sec(), 5.0);
    assert_eq!(st.motion, Motion::Still);
    assert!(approx(st.dwell_magnitude, 60.0));

    for _ in 0..20 {
        s.tick(0.5);
    }
    let st = s.entity_state(&p1).unwrap();
    assert_eq!(st.motion, Motion::Moving);
    assert_eq!(st.dwell_magnitude, 10.0);
    assert_eq!(st.interval, IntervalKey::new(10.0, 20.0));

    for _ in 0..20 {
        s.tick(0.5);
    }
    let st = s.entity_state(&p1).unwrap();
    assert_eq!(s.time_sec(), 25.0);
    assert_eq!(st.interval, IntervalKey::new(10.0, 20.0));
    assert_eq!(st.motion, Motion::Moving);
    assert_eq!(st.dwell_magnitude, 10.0);
    assert!(approx(st.angle_deg, 90.0));
}

#[test]
fn scenario_by_scrubbing() {
    let mut s = PlaybackSession::new(scenario_store(), &EngineConfig::default()).unwrap();
    let p1 = id("p1");

    let st = s.entity_state_at(&p1, 5.0).unwrap().unwrap();
    assert!(approx(st.dwell_magnitude, 60.0));
    let st = s.entity_state_at(&p1, 15.0).unwrap().unwrap();
    assert_eq!(st.dwell_magnitude, 10.0);
    assert!(approx(st.angle_deg, 45.0));
    let st = s.entity_state_at(&p1, 25.0).unwrap().unwrap();
    assert_eq!(st.motion, Motion::Moving);
    assert_eq!(st.dwell_magnitude, 10.0);
}

#[test]
fn coarse_tick_splits_at_interval_boundary() {
    let mut s = PlaybackSession::new(scenario_store(), &EngineConfig::default()).unwrap();
    s.set_time(8.0).unwrap();
    // One tick from 8 s to 12 s crosses into the moving interval.
    s.tick(4.0);
    assert_eq!(s.entity_state(&id("p1")).unwrap().dwell_magnitude, 10.0);

    let store = SampleStore::from_tracks([(
        id("p2"),
        Track::from_unsorted(vec![
            Sample::at(0.0, 0.0, 0.5).with_motion(Motion::Moving),
            Sample::at(10.0, 0.0, 0.5).with_motion(Motion::Still),
            Sample::at(20.0, 0.0, 0.5).with_motion(Motion::Still),
        ]),
    )]);
    let mut s = PlaybackSession::new(store, &EngineConfig::default()).unwrap();
    s.set_time(8.0).unwrap();
    s.tick(4.0);
    // Only the 2 s after the boundary were still.
    assert!(approx(s.entity_state(&id("p2")).unwrap().dwell_magnitude, 30.0));
}

#[test]
fn backward_scrub_resets_and_rederives() {
    let mut s = PlaybackSession::with_parts(
        scenario_store(),
        None,
        &EngineConfig::default(),
        RecordingObserver::default(),
    )
    .unwrap();
    let p1 = id("p1");
    s.set_time(9.0).unwrap();
    assert!(approx(s.entity_state(&p1).unwrap().dwell_magnitude, 100.0));
    s.observer_mut().take();

    s.set_time(3.0).unwrap();
    assert!(approx(s.entity_state(&p1).unwrap().dwell_magnitude, 40.0));
    let events = s.observer_mut().take();
    assert!(matches!(
        events.first(),
        Some(PlaybackEvent::DerivedStateReset { from_sec, to_sec }) if *from_sec == 9.0 && *to_sec == 3.0
    ));
}

#[test]
fn single_sample_tracks_are_not_rendered() {
    let store = SampleStore::from_tracks([
        (id("solo"), Track::from_unsorted(vec![Sample::at(0.0, 0.0, 0.5)])),
        (
            id("pair"),
            Track::from_unsorted(vec![Sample::at(0.0, 0.0, 0.5), Sample::at(5.0, 0.0, 0.5)]),
        ),
    ]);
    let mut s = PlaybackSession::new(store, &EngineConfig::default()).unwrap();
    s.tick(1.0);
    assert_eq!(s.visible_entity_ids(), vec![id("pair")]);
    assert!(s.entity_state(&id("solo")).is_none());

    s.append_sample(id("solo"), Sample::at(3.0, 0.0, 0.5)).unwrap();
    s.tick(1.0);
    assert_eq!(s.visible_entity_ids(), vec![id("pair"), id("solo")]);
}

#[test]
fn entities_appear_at_their_first_sample() {
    let store = SampleStore::from_tracks([(
        id("late"),
        Track::from_unsorted(vec![Sample::at(50.0, 0.0, 0.5), Sample::at(60.0, 0.0, 0.5)]),
    )]);
    let mut s = PlaybackSession::new(store, &EngineConfig::default()).unwrap();
    assert!(s.visible_entity_ids_at(49.0).unwrap().is_empty());
    let st = s.entity_state_at(&id("late"), 55.0).unwrap().unwrap();
    assert_eq!(st.lifecycle_phase, Phase::Entering);
    // Dwell only counts time since the entity appeared.
    assert!(approx(st.dwell_magnitude, 60.0));
}

#[test]
fn undefined_position_is_not_renderable() {
    let mut gap = Sample::at(10.0, 0.0, 0.5);
    gap.angle_deg = None;
    let store = SampleStore::from_tracks([(
        id("p1"),
        Track::from_unsorted(vec![Sample::at(0.0, 0.0, 0.5), gap, Sample::at(20.0, 0.0, 0.5)]),
    )]);
    let mut s = PlaybackSession::new(store, &EngineConfig::default()).unwrap();
    assert!(s.entity_state_at(&id("p1"), 5.0).unwrap().is_none());
}

#[test]
fn schedule_overrides_sample_classification() {
    let schedule = MotionSchedule::from_json_str(
        r#"[{"tA": 0, "tB": 10, "MOVING": ["p1"]}, {"tA": 10, "tB": 20, "STILL": ["p1"]}]"#,
    )
    .unwrap();
    let mut s = PlaybackSession::with_parts(
        scenario_store(),
        Some(schedule),
        &EngineConfig::default(),
        NullObserver,
    )
    .unwrap();
    let p1 = id("p1");
    let st = s.entity_state_at(&p1, 5.0).unwrap().unwrap();
    assert_eq!(st.motion, Motion::Moving);
    assert_eq!(st.dwell_magnitude, 10.0);
    let st = s.entity_state_at(&p1, 14.0).unwrap().unwrap();
    assert_eq!(st.motion, Motion::Still);
    assert!(approx(st.dwell_magnitude, 50.0));
}

#[test]
fn paused_session_holds_time_but_finishes_fades() {
    let mut s = PlaybackSession::new(scenario_store(), &EngineConfig::default()).unwrap();
    s.pause();
    let p1 = id("p1");
    assert_eq!(s.entity_state(&p1).unwrap().lifecycle_phase, Phase::Entering);
    s.tick(1.0);
    assert_eq!(s.time_sec(), 0.0);
    assert_eq!(s.entity_state(&p1).unwrap().lifecycle_phase, Phase::Active);
    assert_eq!(s.entity_state(&p1).unwrap().dwell_magnitude, 10.0);
}

#[test]
fn speed_scales_playback_time_only() {
    let cfg = EngineConfig {
        clock: ClockConfig {
            duration_sec: 300.0,
            speed: 4.0,
        },
        ..EngineConfig::default()
    };
    let mut s = PlaybackSession::new(scenario_store(), &cfg).unwrap();
    s.tick(1.0);
    assert_eq!(s.time_sec(), 4.0);
    assert!(approx(s.entity_state(&id("p1")).unwrap().dwell_magnitude, 50.0));
    assert!(s.set_speed(-2.0).is_err());
}

#[test]
fn snapshot_lists_visible_entities_in_id_order() {
    let mut store = scenario_store();
    store
        .append(id("a0"), Sample::at(0.0, 10.0, 0.2))
        .unwrap();
    store
        .append(id("a0"), Sample::at(30.0, 10.0, 0.2))
        .unwrap();
    let mut s = PlaybackSession::new(store, &EngineConfig::default()).unwrap();
    s.tick(2.0);
    let snap = s.snapshot();
    assert_eq!(snap.time_sec, 2.0);
    let ids: Vec<&str> = snap.entities.iter().map(|e| e.id.as_str()).collect();
    assert_eq!(ids, vec!["A0", "P1"]);
    // Unlabelled and stationary: still by threshold.
    assert_eq!(snap.entities[0].motion, Motion::Still);
}

fn gap_store() -> SampleStore {
    let mut gap = Sample::at(20.0, 0.0, 0.5).with_motion(Motion::Still);
    gap.angle_deg = None;
    SampleStore::from_tracks([(
        id("p1"),
        Track::from_unsorted(vec![
            Sample::at(0.0, 0.0, 0.5).with_motion(Motion::Still),
            Sample::at(10.0, 0.0, 0.5).with_motion(Motion::Still),
            gap,
            Sample::at(30.0, 0.0, 0.5).with_motion(Motion::Still),
            Sample::at(40.0, 0.0, 0.5).with_motion(Motion::Still),
        ]),
    )])
}

#[test]
fn undefined_position_breaks_the_still_run() {
    let p1 = id("p1");
    let mut ticked = PlaybackSession::new(gap_store(), &EngineConfig::default()).unwrap();
    while ticked.time_sec() < 35.0 {
        ticked.tick(0.5);
    }

    let mut scrubbed = PlaybackSession::new(gap_store(), &EngineConfig::default()).unwrap();
    scrubbed.set_time(50.0).unwrap();
    scrubbed.set_time(35.0).unwrap();

    let a = ticked.entity_state(&p1).unwrap().dwell_magnitude;
    let b = scrubbed.entity_state(&p1).unwrap().dwell_magnitude;
    // Growth restarts from baseline at 30 s, where the position is defined again.
    assert!(approx(a, 60.0), "ticked {a}");
    assert!(approx(b, 60.0), "scrubbed {b}");
}

#[test]
fn undefined_position_discards_derived_state() {
    let p1 = id("p1");
    let mut s = PlaybackSession::new(gap_store(), &EngineConfig::default()).unwrap();
    s.set_time(5.0).unwrap();
    s.tick(1.0);
    assert_eq!(s.entity_state(&p1).unwrap().lifecycle_phase, Phase::Active);

    s.set_time(15.0).unwrap();
    assert!(s.entity_state(&p1).is_none());
    s.tick(16.0);
    let st = s.entity_state(&p1).unwrap();
    assert_eq!(st.lifecycle_phase, Phase::Entering);
    // Only the second spent after 30 s counts.
    assert!(approx(st.dwell_magnitude, 20.0));
}

#[test]
fn scrub_rebuilds_lifecycle_from_the_target_position() {
    let store = SampleStore::from_tracks([(
        id("p1"),
        Track::from_unsorted(vec![
            Sample::at(0.0, 0.0, 0.5),
            Sample::at(10.0, 0.0, 0.9),
            Sample::at(20.0, 0.0, 1.4),
        ]),
    )]);
    let p1 = id("p1");
    let mut s = PlaybackSession::new(store, &EngineConfig::default()).unwrap();

    // Forward past the exit: never shown as exiting after the fact.
    s.set_time(18.0).unwrap();
    assert!(s.entity_state(&p1).is_none());

    // Backward into the map: fades in again.
    s.set_time(5.0).unwrap();
    assert_eq!(s.entity_state(&p1).unwrap().lifecycle_phase, Phase::Entering);

    // Backward to a time past the boundary: stays absent.
    s.set_time(19.0).unwrap();
    s.set_time(16.0).unwrap();
    assert!(s.visible_entity_ids().is_empty());
}
