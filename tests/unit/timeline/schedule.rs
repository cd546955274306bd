use super::*;

const SCHEDULE: &str = r#"[
    {"tA": 10, "tB": 20, "STILL": [], "MOVING": ["p1"]},
    {"tA": 0, "tB": 10, "STILL": [" p1 ", "P2"], "MOVING": []},
    {"tA": 20, "tB": 30, "STILL": ["p2"]}
]"#;

#[test]
fn lookup_is_half_open_and_sorted() {
    let s = MotionSchedule::from_json_str(SCHEDULE).unwrap();
    assert_eq!(s.entries()[0].t_a, 0.0);
    assert_eq!(s.lookup(0.0).unwrap().key(), IntervalKey::new(0.0, 10.0));
    assert_eq!(s.lookup(9.5).unwrap().key(), IntervalKey::new(0.0, 10.0));
    assert_eq!(s.lookup(10.0).unwrap().key(), IntervalKey::new(10.0, 20.0));
}

#[test]
fn lookup_clamps_both_ends() {
    let s = MotionSchedule::from_json_str(SCHEDULE).unwrap();
    assert_eq!(s.lookup(-5.0).unwrap().t_a, 0.0);
    assert_eq!(s.lookup(30.0).unwrap().t_a, 20.0);
    assert_eq!(s.lookup(500.0).unwrap().t_a, 20.0);
    assert!(MotionSchedule::default().lookup(1.0).is_none());
}

#[test]
fn membership_uses_canonical_ids() {
    let s = MotionSchedule::from_json_str(SCHEDULE).unwrap();
    let p1 = EntityId::from("p1");
    let p2 = EntityId::from("p2");
    let p3 = EntityId::from("p3");
    assert_eq!(s.lookup(1.0).unwrap().motion_of(&p1), Motion::Still);
    assert_eq!(s.lookup(1.0).unwrap().motion_of(&p2), Motion::Still);
    assert_eq!(s.lookup(11.0).unwrap().motion_of(&p1), Motion::Moving);
    assert_eq!(s.lookup(1.0).unwrap().motion_of(&p3), Motion::Moving);
}

#[test]
fn rejects_inverted_windows() {
    assert!(MotionSchedule::from_json_str(r#"[{"tA": 5, "tB": 1}]"#).is_err());
}

#[test]
fn boundaries_between_lists_window_starts() {
    let s = MotionSchedule::from_json_str(SCHEDULE).unwrap();
    let b: Vec<f64> = s.boundaries_between(0.0, 25.0).collect();
    assert_eq!(b, vec![10.0, 20.0]);
}
