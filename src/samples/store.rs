use std::collections::BTreeMap;

use crate::{
    config::StoreConfig,
    foundation::{
        core::{EntityId, Motion},
        error::{DwellError, DwellResult},
        math::normalize_deg,
    },
    samples::model::{RawRow, Sample, Track},
};

/// A row that did not make it into the store.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct SkippedRow {
    /// Zero-based position of the row in the input.
    pub index: usize,
    pub reason: String,
}

/// Parsed tracks keyed by canonical entity id.
///
/// Owned by whoever parsed it; a playback session takes it by value and treats it as read-only
/// apart from live appends.
#[derive(Clone, Debug, Default, serde::Serialize)]
pub struct SampleStore {
    tracks: BTreeMap<EntityId, Track>,
}

impl SampleStore {
    /// Validate, group and sort raw rows. Bad rows are skipped and reported, never fatal.
    #[tracing::instrument(skip(rows, cfg), fields(rows = rows.len()))]
    pub fn parse(rows: &[RawRow], cfg: &StoreConfig) -> (Self, Vec<SkippedRow>) {
        let mut grouped: BTreeMap<EntityId, Vec<Sample>> = BTreeMap::new();
        let mut skipped = Vec::new();

        for (index, row) in rows.iter().enumerate() {
            match parse_row(row, cfg) {
                Ok((id, sample)) => grouped.entry(id).or_default().push(sample),
                Err(reason) => {
                    tracing::debug!(index, %reason, "skipping keyframe row");
                    skipped.push(SkippedRow { index, reason });
                }
            }
        }

        let tracks = grouped
            .into_iter()
            .map(|(id, samples)| (id, Track::from_unsorted(samples)))
            .collect();
        (Self { tracks }, skipped)
    }

    pub fn from_tracks(tracks: impl IntoIterator<Item = (EntityId, Track)>) -> Self {
        Self {
            tracks: tracks.into_iter().collect(),
        }
    }

    /// Append a live sample to `id`'s track, creating the track on first sight.
    pub fn append(&mut self, id: EntityId, sample: Sample) -> DwellResult<()> {
        self.tracks.entry(id).or_default().push(sample)
    }

    pub fn track(&self, id: &EntityId) -> Option<&Track> {
        self.tracks.get(id)
    }

    /// Tracks in id order.
    pub fn iter(&self) -> impl Iterator<Item = (&EntityId, &Track)> {
        self.tracks.iter()
    }

    pub fn ids(&self) -> impl Iterator<Item = &EntityId> {
        self.tracks.keys()
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    /// Fails for tracks that cannot define an interval.
    pub fn classifiable_track(&self, id: &EntityId) -> DwellResult<&Track> {
        match self.tracks.get(id) {
            Some(track) if track.is_classifiable() => Ok(track),
            _ => Err(DwellError::not_enough_samples(id.as_str())),
        }
    }
}

fn parse_row(row: &RawRow, cfg: &StoreConfig) -> Result<(EntityId, Sample), String> {
    let id = row
        .person_id
        .as_deref()
        .and_then(EntityId::parse)
        .ok_or_else(|| "missing personId".to_string())?;

    let t_raw = row
        .t_sec
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| "missing tSec".to_string())?;
    let t_sec = t_raw
        .parse::<f64>()
        .ok()
        .filter(|t| t.is_finite())
        .ok_or_else(|| format!("non-numeric tSec '{t_raw}'"))?;

    let angle_deg = opt_number(row.angle_deg.as_deref()).map(normalize_deg);
    let radius_factor = opt_number(row.radius_factor.as_deref()).or_else(|| {
        row.bench
            .as_deref()
            .filter(|b| cfg.recognizes_bench(b))
            .map(|_| cfg.seated_radius)
    });
    // A present but blank or unknown label is MOVING. Only a row without a motion field at all
    // leaves the classifier to decide from positions.
    let motion_label = row.motion.as_deref().map(Motion::from_label);
    let notes = row
        .notes
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string);

    Ok((
        id,
        Sample {
            t_sec,
            angle_deg,
            radius_factor,
            motion_label,
            notes,
        },
    ))
}

/// Optional numeric cell: blank, unparseable and non-finite all read as absent.
fn opt_number(cell: Option<&str>) -> Option<f64> {
    cell.map(str::trim)
        .filter(|s| !s.is_empty())
        .and_then(|s| s.parse::<f64>().ok())
        .filter(|v| v.is_finite())
}

#[cfg(test)]
#[path = "../../tests/unit/samples/store.rs"]
mod tests;
