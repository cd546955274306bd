use super::*;

#[test]
fn entity_ids_are_canonical() {
    assert_eq!(EntityId::parse("  p1 ").unwrap(), EntityId::from("P1"));
    assert_eq!(EntityId::parse("   "), None);
    assert_eq!(EntityId::from("ab").as_str(), "AB");
}

#[test]
fn entity_id_serde_canonicalizes() {
    let id: EntityId = serde_json::from_str("\" p9 \"").unwrap();
    assert_eq!(id.as_str(), "P9");
    assert_eq!(serde_json::to_string(&id).unwrap(), "\"P9\"");
}

#[test]
fn motion_labels_default_to_moving() {
    assert_eq!(Motion::from_label("still"), Motion::Still);
    assert_eq!(Motion::from_label(" STILL "), Motion::Still);
    assert_eq!(Motion::from_label("moving"), Motion::Moving);
    assert_eq!(Motion::from_label("stil"), Motion::Moving);
    assert_eq!(Motion::from_label("walking"), Motion::Moving);
}

#[test]
fn interval_key_display_and_eq() {
    let k = IntervalKey::new(0.0, 10.0);
    assert_eq!(k.to_string(), "0-10");
    assert_eq!(k, IntervalKey::new(0.0, 10.0));
    assert_ne!(k, IntervalKey::new(10.0, 20.0));
}
