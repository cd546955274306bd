/// Map any finite angle into `[0, 360)`.
pub fn normalize_deg(deg: f64) -> f64 {
    let r = deg.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360.0 for tiny negative inputs.
    if r >= 360.0 { 0.0 } else { r }
}

/// Signed shortest angular delta from `from` to `to`, in `(-180, 180]`.
pub fn shortest_arc_deg(from: f64, to: f64) -> f64 {
    let d = (to - from + 540.0).rem_euclid(360.0) - 180.0;
    if d == -180.0 { 180.0 } else { d }
}

pub fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}

/// Clamp to `[0, 1]`; NaN collapses to 0.
pub fn clamp01(t: f64) -> f64 {
    if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/math.rs"]
mod tests;
