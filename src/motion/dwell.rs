use std::collections::BTreeMap;

use crate::{
    config::DwellConfig,
    foundation::core::{EntityId, IntervalKey, Motion},
    playback::observer::{PlaybackEvent, PlaybackObserver},
};

/// An interval together with its motion classification.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ClassifiedInterval {
    pub key: IntervalKey,
    pub motion: Motion,
}

/// Per-entity dwell state.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
pub struct DwellState {
    pub last_interval_key: Option<IntervalKey>,
    pub magnitude: f64,
}

/// Grows a magnitude while an entity's intervals classify STILL and snaps it to baseline on
/// MOVING.
///
/// Growth is keyed by interval identity, not wall-clock continuity: moving from one still
/// interval into the next keeps the accumulated magnitude, only a moving interval resets it.
#[derive(Clone, Debug)]
pub struct DwellAccumulator {
    baseline: f64,
    growth_rate_per_sec: f64,
    states: BTreeMap<EntityId, DwellState>,
}

impl DwellAccumulator {
    pub fn new(cfg: &DwellConfig) -> Self {
        Self {
            baseline: cfg.baseline,
            growth_rate_per_sec: cfg.growth_rate_per_sec,
            states: BTreeMap::new(),
        }
    }

    pub fn baseline(&self) -> f64 {
        self.baseline
    }

    /// Advance `id` by `dt_sec` spent inside `interval` and return its magnitude.
    ///
    /// `None` means the entity cannot be classified yet; the previous magnitude (or baseline) is
    /// returned untouched.
    pub fn tick(
        &mut self,
        id: &EntityId,
        interval: Option<ClassifiedInterval>,
        dt_sec: f64,
        observer: &mut dyn PlaybackObserver,
    ) -> f64 {
        let Some(interval) = interval else {
            return self.magnitude(id).unwrap_or(self.baseline);
        };

        let baseline = self.baseline;
        let state = self.states.entry(id.clone()).or_insert(DwellState {
            last_interval_key: None,
            magnitude: baseline,
        });

        if state.last_interval_key != Some(interval.key) {
            state.last_interval_key = Some(interval.key);
            observer.on_event(&PlaybackEvent::IntervalEntered {
                entity: id.clone(),
                key: interval.key,
                motion: interval.motion,
            });
        }

        match interval.motion {
            Motion::Still => {
                if dt_sec.is_finite() && dt_sec > 0.0 {
                    state.magnitude += self.growth_rate_per_sec * dt_sec;
                    observer.on_event(&PlaybackEvent::MagnitudeUpdated {
                        entity: id.clone(),
                        magnitude: state.magnitude,
                    });
                }
            }
            Motion::Moving => {
                if state.magnitude != baseline {
                    state.magnitude = baseline;
                    observer.on_event(&PlaybackEvent::MagnitudeReset {
                        entity: id.clone(),
                        magnitude: baseline,
                    });
                }
            }
        }
        state.magnitude
    }

    pub fn magnitude(&self, id: &EntityId) -> Option<f64> {
        self.states.get(id).map(|s| s.magnitude)
    }

    pub fn state(&self, id: &EntityId) -> Option<&DwellState> {
        self.states.get(id)
    }

    /// Drop `id`'s state; its next observation starts from baseline.
    pub fn forget(&mut self, id: &EntityId) {
        self.states.remove(id);
    }

    pub fn clear(&mut self) {
        self.states.clear();
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/motion/dwell.rs"]
mod tests;
