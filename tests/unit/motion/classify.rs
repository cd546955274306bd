use super::*;

#[test]
fn label_is_authoritative() {
    let c = MotionClassifier::default();
    let a = Sample::at(0.0, 0.0, 0.5).with_motion(Motion::Still);
    let far = Sample::at(10.0, 180.0, 0.1);
    assert_eq!(c.classify(&a, &far), Motion::Still);

    let a = Sample::at(0.0, 0.0, 0.5).with_motion(Motion::Moving);
    let same = Sample::at(10.0, 0.0, 0.5);
    assert_eq!(c.classify(&a, &same), Motion::Moving);
}

#[test]
fn only_the_opening_sample_label_counts() {
    let c = MotionClassifier::default();
    let a = Sample::at(0.0, 0.0, 0.5);
    let b = Sample::at(10.0, 90.0, 0.5).with_motion(Motion::Still);
    assert_eq!(c.classify(&a, &b), Motion::Moving);
}

#[test]
fn deltas_within_epsilon_are_still() {
    let c = MotionClassifier::default();
    let a = Sample::at(0.0, 359.8, 0.500);
    let b = Sample::at(10.0, 0.2, 0.501);
    assert_eq!(c.classify(&a, &b), Motion::Still);

    let b = Sample::at(10.0, 0.4, 0.5);
    assert_eq!(c.classify(&a, &b), Motion::Moving);
    let b = Sample::at(10.0, 359.8, 0.51);
    assert_eq!(c.classify(&a, &b), Motion::Moving);
}

#[test]
fn missing_position_is_moving() {
    let c = MotionClassifier::default();
    let a = Sample::at(0.0, 10.0, 0.5);
    let mut b = Sample::at(10.0, 10.0, 0.5);
    b.radius_factor = None;
    assert_eq!(c.classify(&a, &b), Motion::Moving);
}

#[test]
fn epsilons_come_from_config() {
    let loose = MotionClassifier::from_config(&MotionConfig {
        angle_epsilon_deg: 5.0,
        radius_epsilon: 0.05,
    });
    let a = Sample::at(0.0, 10.0, 0.5);
    let b = Sample::at(10.0, 14.0, 0.54);
    assert_eq!(loose.classify(&a, &b), Motion::Still);
    assert_eq!(MotionClassifier::default().classify(&a, &b), Motion::Moving);
}
