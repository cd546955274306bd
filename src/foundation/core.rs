use std::fmt;

/// Canonical entity identifier: trimmed and upper-cased.
///
/// Keyframe tables and schedules spell ids inconsistently (`p1`, ` P1 `), so every id is
/// canonicalized on construction and compared in canonical form only.
#[derive(
    Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(from = "String", into = "String")]
pub struct EntityId(String);

impl EntityId {
    /// Canonicalize `raw` into an id. Returns `None` for blank input.
    pub fn parse(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return None;
        }
        Some(Self(trimmed.to_uppercase()))
    }

    /// Canonical string form.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for EntityId {
    fn from(raw: String) -> Self {
        Self(raw.trim().to_uppercase())
    }
}

impl From<&str> for EntityId {
    fn from(raw: &str) -> Self {
        Self(raw.trim().to_uppercase())
    }
}

impl From<EntityId> for String {
    fn from(id: EntityId) -> Self {
        id.0
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Motion classification of one interval.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Motion {
    /// The entity holds its position over the interval.
    Still,
    /// The entity changes position over the interval.
    Moving,
}

impl Motion {
    /// Case-insensitive label parse. Only `STILL` is still; any other text is moving.
    pub fn from_label(label: &str) -> Self {
        if label.trim().eq_ignore_ascii_case("STILL") {
            Self::Still
        } else {
            Self::Moving
        }
    }

    pub fn is_still(self) -> bool {
        matches!(self, Self::Still)
    }
}

impl fmt::Display for Motion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Still => "STILL",
            Self::Moving => "MOVING",
        })
    }
}

/// Polar floor-plan position.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Position {
    /// Degrees in `[0, 360)`, counter-clockwise from the reference direction.
    pub angle_deg: f64,
    /// Normalized distance from center; `> 1` is past the boundary.
    pub radius_factor: f64,
}

/// Identity of an interval `[t_a, t_b)`.
///
/// Two keys are equal only when both endpoints are bitwise equal, which is what the dwell
/// accumulator needs to notice "a different interval than last tick".
#[derive(Clone, Copy, Debug, serde::Serialize, serde::Deserialize)]
pub struct IntervalKey {
    pub t_a: f64,
    pub t_b: f64,
}

impl IntervalKey {
    pub fn new(t_a: f64, t_b: f64) -> Self {
        Self { t_a, t_b }
    }
}

impl PartialEq for IntervalKey {
    fn eq(&self, other: &Self) -> bool {
        self.t_a.to_bits() == other.t_a.to_bits() && self.t_b.to_bits() == other.t_b.to_bits()
    }
}

impl Eq for IntervalKey {}

impl fmt::Display for IntervalKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.t_a, self.t_b)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
