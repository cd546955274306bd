use crate::{
    config::MotionConfig,
    foundation::{core::Motion, math::shortest_arc_deg},
    samples::model::Sample,
};

/// Decides STILL vs MOVING for the interval opened by `a` and closed by `b`.
///
/// A label on `a` wins outright. Without one, the interval is still only when both the
/// shortest-arc angle change and the radius change stay within their epsilons. Missing
/// coordinates classify as moving.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MotionClassifier {
    pub angle_epsilon_deg: f64,
    pub radius_epsilon: f64,
}

impl Default for MotionClassifier {
    fn default() -> Self {
        Self::from_config(&MotionConfig::default())
    }
}

impl MotionClassifier {
    pub fn from_config(cfg: &MotionConfig) -> Self {
        Self {
            angle_epsilon_deg: cfg.angle_epsilon_deg,
            radius_epsilon: cfg.radius_epsilon,
        }
    }

    pub fn classify(&self, a: &Sample, b: &Sample) -> Motion {
        if let Some(label) = a.motion_label {
            return label;
        }
        self.classify_by_delta(a, b)
    }

    fn classify_by_delta(&self, a: &Sample, b: &Sample) -> Motion {
        let (Some(pa), Some(pb)) = (a.position(), b.position()) else {
            return Motion::Moving;
        };
        let angle_delta = shortest_arc_deg(pa.angle_deg, pb.angle_deg).abs();
        let radius_delta = (pb.radius_factor - pa.radius_factor).abs();
        if angle_delta <= self.angle_epsilon_deg && radius_delta <= self.radius_epsilon {
            Motion::Still
        } else {
            Motion::Moving
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/motion/classify.rs"]
mod tests;
