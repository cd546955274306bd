/// Easing curve applied to a normalized transition progress.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum Ease {
    Linear,
    InQuad,
    OutQuad,
    InCubic,
    OutCubic,
}

impl Ease {
    /// Map progress `t` (clamped to `[0, 1]`) through the curve.
    pub fn apply(self, t: f64) -> f64 {
        let t = crate::foundation::math::clamp01(t);
        match self {
            Self::Linear => t,
            Self::InQuad => t * t,
            Self::OutQuad => 1.0 - (1.0 - t) * (1.0 - t),
            // Exits accelerate away from the boundary.
            Self::InCubic => t * t * t,
            // Entrances settle into place.
            Self::OutCubic => 1.0 - (1.0 - t).powi(3),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/animation/ease.rs"]
mod tests;
