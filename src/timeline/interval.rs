use crate::{
    foundation::{
        core::{EntityId, IntervalKey},
        error::{DwellError, DwellResult},
    },
    samples::{
        model::{Sample, Track},
        store::SampleStore,
    },
};

/// The bracketing pair of samples for a query time.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ResolvedInterval<'a> {
    /// Index of `a` in the track; `b` is at `index + 1`.
    pub index: usize,
    pub a: &'a Sample,
    pub b: &'a Sample,
}

impl ResolvedInterval<'_> {
    pub fn t_a(&self) -> f64 {
        self.a.t_sec
    }

    pub fn t_b(&self) -> f64 {
        self.b.t_sec
    }

    pub fn key(&self) -> IntervalKey {
        IntervalKey::new(self.a.t_sec, self.b.t_sec)
    }
}

/// Find the pair `(track[i], track[i + 1])` with `t_a <= time_sec < t_b`.
///
/// Times before the first sample resolve to the first pair; times at or after the last sample
/// resolve to the last pair. Returns `None` only for tracks with fewer than two samples.
pub fn resolve(track: &Track, time_sec: f64) -> Option<ResolvedInterval<'_>> {
    let samples = track.samples();
    let n = samples.len();
    if n < 2 {
        return None;
    }

    // Count of samples at or before `time_sec`; the right-exclusive boundary falls out of `<=`.
    let at_or_before = samples.partition_point(|s| s.t_sec <= time_sec);
    let index = match at_or_before {
        0 => 0,
        k if k >= n => n - 2,
        k => k - 1,
    };
    Some(ResolvedInterval {
        index,
        a: &samples[index],
        b: &samples[index + 1],
    })
}

/// Sample times strictly inside `(from, to)`, ascending. Used to split a time step at interval
/// boundaries.
pub fn boundaries_between(track: &Track, from: f64, to: f64) -> impl Iterator<Item = f64> + '_ {
    let samples = track.samples();
    let start = samples.partition_point(|s| s.t_sec <= from);
    samples[start..]
        .iter()
        .map(|s| s.t_sec)
        .take_while(move |&t| t < to)
}

impl SampleStore {
    /// [`resolve`] for a stored entity, reporting short or unknown tracks as
    /// [`DwellError::NotEnoughSamples`].
    pub fn resolve_at(&self, id: &EntityId, time_sec: f64) -> DwellResult<ResolvedInterval<'_>> {
        self.track(id)
            .and_then(|track| resolve(track, time_sec))
            .ok_or_else(|| DwellError::not_enough_samples(id.as_str()))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/timeline/interval.rs"]
mod tests;
