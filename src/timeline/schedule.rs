use std::{collections::BTreeSet, path::Path};

use anyhow::Context as _;

use crate::foundation::{
    core::{EntityId, IntervalKey, Motion},
    error::{DwellError, DwellResult},
};

/// One precomputed window of the schedule: who is still and who is moving over `[t_a, t_b)`.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ScheduleEntry {
    #[serde(rename = "tA")]
    pub t_a: f64,
    #[serde(rename = "tB")]
    pub t_b: f64,
    #[serde(rename = "STILL", default)]
    pub still: BTreeSet<EntityId>,
    #[serde(rename = "MOVING", default)]
    pub moving: BTreeSet<EntityId>,
}

impl ScheduleEntry {
    pub fn key(&self) -> IntervalKey {
        IntervalKey::new(self.t_a, self.t_b)
    }

    /// Ids listed in neither set are moving.
    pub fn motion_of(&self, id: &EntityId) -> Motion {
        if self.still.contains(id) {
            Motion::Still
        } else {
            Motion::Moving
        }
    }
}

/// Precomputed motion windows, used in place of per-sample labels when available.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize)]
pub struct MotionSchedule {
    entries: Vec<ScheduleEntry>,
}

impl MotionSchedule {
    pub fn new(mut entries: Vec<ScheduleEntry>) -> DwellResult<Self> {
        for e in &entries {
            if !e.t_a.is_finite() || !e.t_b.is_finite() {
                return Err(DwellError::parse("schedule window bounds must be finite"));
            }
            if e.t_b < e.t_a {
                return Err(DwellError::parse(format!(
                    "schedule window [{}, {}) ends before it starts",
                    e.t_a, e.t_b
                )));
            }
        }
        entries.sort_by(|a, b| a.t_a.total_cmp(&b.t_a));
        Ok(Self { entries })
    }

    pub fn from_json_str(s: &str) -> DwellResult<Self> {
        Self::new(serde_json::from_str(s)?)
    }

    pub fn from_path(path: &Path) -> DwellResult<Self> {
        let s = std::fs::read_to_string(path)
            .with_context(|| format!("read schedule '{}'", path.display()))?;
        Self::from_json_str(&s)
    }

    pub fn entries(&self) -> &[ScheduleEntry] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Window containing `time_sec` under the half-open rule, clamped to the first/last window.
    /// A gap between windows holds the preceding window.
    pub fn lookup(&self, time_sec: f64) -> Option<&ScheduleEntry> {
        let at_or_before = self.entries.partition_point(|e| e.t_a <= time_sec);
        match at_or_before {
            0 => self.entries.first(),
            k => self.entries.get(k - 1),
        }
    }

    /// Window start times strictly inside `(from, to)`.
    pub fn boundaries_between(&self, from: f64, to: f64) -> impl Iterator<Item = f64> + '_ {
        let start = self.entries.partition_point(|e| e.t_a <= from);
        self.entries[start..]
            .iter()
            .map(|e| e.t_a)
            .take_while(move |&t| t < to)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/timeline/schedule.rs"]
mod tests;
