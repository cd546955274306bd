use crate::{animation::ease::Ease, foundation::math::lerp};

/// A bounded-duration eased move from one scalar to another.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
pub struct Transition {
    pub from_value: f64,
    pub to_value: f64,
    pub elapsed: f64,
    pub duration: f64,
    #[serde(skip)]
    pub ease: Ease,
}

impl Transition {
    pub fn new(from_value: f64, to_value: f64, duration: f64, ease: Ease) -> Self {
        Self {
            from_value,
            to_value,
            elapsed: 0.0,
            duration,
            ease,
        }
    }

    /// Advance by `dt` seconds; negative or non-finite deltas are ignored.
    pub fn advance(&mut self, dt: f64) {
        if dt.is_finite() && dt > 0.0 {
            self.elapsed = (self.elapsed + dt).min(self.duration.max(0.0));
        }
    }

    /// Linear progress in `[0, 1]`. A non-positive duration is complete immediately.
    pub fn progress(&self) -> f64 {
        if self.duration <= 0.0 {
            return 1.0;
        }
        crate::foundation::math::clamp01(self.elapsed / self.duration)
    }

    pub fn is_complete(&self) -> bool {
        self.progress() >= 1.0
    }

    /// Eased progress.
    pub fn eased(&self) -> f64 {
        self.ease.apply(self.progress())
    }

    pub fn value(&self) -> f64 {
        lerp(self.from_value, self.to_value, self.eased())
    }

    /// Value when the destination moves while the transition runs (e.g. an entrance that
    /// lands on a radius which is itself still being interpolated).
    pub fn value_toward(&self, to_value: f64) -> f64 {
        lerp(self.from_value, to_value, self.eased())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/animation/transition.rs"]
mod tests;
