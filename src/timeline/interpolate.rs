use crate::{
    foundation::{
        core::Position,
        math::{clamp01, lerp, normalize_deg, shortest_arc_deg},
    },
    samples::model::Sample,
};

/// Position between two bracketing samples at `time_sec`.
///
/// Radius is linear; angle follows the shortest arc so 350° → 10° passes through 0°.
/// Returns `None` when either sample lacks a coordinate: the entity is not renderable at this
/// time.
pub fn interpolate(a: &Sample, b: &Sample, time_sec: f64) -> Option<Position> {
    if a.t_sec == b.t_sec {
        return a.position();
    }

    let pa = a.position()?;
    let pb = b.position()?;

    let ratio = clamp01((time_sec - a.t_sec) / (b.t_sec - a.t_sec));
    let d = shortest_arc_deg(pa.angle_deg, pb.angle_deg);
    Some(Position {
        angle_deg: normalize_deg(pa.angle_deg + d * ratio),
        radius_factor: lerp(pa.radius_factor, pb.radius_factor, ratio),
    })
}

#[cfg(test)]
#[path = "../../tests/unit/timeline/interpolate.rs"]
mod tests;
