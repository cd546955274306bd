use std::collections::BTreeMap;

use crate::{
    config::EngineConfig,
    foundation::{
        core::{EntityId, IntervalKey, Motion, Position},
        error::DwellResult,
    },
    lifecycle::tracker::{LifecycleTracker, Phase},
    motion::{
        classify::MotionClassifier,
        dwell::{ClassifiedInterval, DwellAccumulator},
    },
    playback::{
        clock::{ClockStep, PlaybackClock},
        observer::{NullObserver, PlaybackEvent, PlaybackObserver},
    },
    samples::{
        model::{Sample, Track},
        store::SampleStore,
    },
    timeline::{
        interpolate::interpolate,
        interval::{boundaries_between, resolve},
        schedule::MotionSchedule,
    },
};

/// Everything the renderer needs for one entity at the session's current time.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct EntityState {
    pub id: EntityId,
    pub angle_deg: f64,
    pub radius_factor: f64,
    pub motion: Motion,
    pub interval: IntervalKey,
    pub dwell_magnitude: f64,
    pub lifecycle_phase: Phase,
    pub render_opacity: f64,
    pub render_radius: f64,
}

/// Serializable view of every visible entity at one instant.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct FrameSnapshot {
    pub time_sec: f64,
    pub entities: Vec<EntityState>,
}

/// One playback session: the parsed tracks plus every piece of derived per-entity state.
///
/// The session is the only writer of its dwell and lifecycle maps. Each [`tick`] or
/// [`set_time`] recomputes every entity before returning, so readers always see a complete
/// frame.
///
/// [`tick`]: PlaybackSession::tick
/// [`set_time`]: PlaybackSession::set_time
pub struct PlaybackSession<O: PlaybackObserver = NullObserver> {
    store: SampleStore,
    schedule: Option<MotionSchedule>,
    classifier: MotionClassifier,
    clock: PlaybackClock,
    dwell: DwellAccumulator,
    lifecycle: LifecycleTracker,
    observer: O,
    current: BTreeMap<EntityId, EntityState>,
}

impl PlaybackSession<NullObserver> {
    pub fn new(store: SampleStore, cfg: &EngineConfig) -> DwellResult<Self> {
        Self::with_parts(store, None, cfg, NullObserver)
    }
}

impl<O: PlaybackObserver> PlaybackSession<O> {
    /// Build a session and evaluate it at time zero.
    ///
    /// An empty schedule is ignored; per-sample classification is used instead.
    #[tracing::instrument(skip_all, fields(entities = store.len()))]
    pub fn with_parts(
        store: SampleStore,
        schedule: Option<MotionSchedule>,
        cfg: &EngineConfig,
        observer: O,
    ) -> DwellResult<Self> {
        cfg.validate()?;
        let mut session = Self {
            store,
            schedule: schedule.filter(|s| !s.is_empty()),
            classifier: MotionClassifier::from_config(&cfg.motion),
            clock: PlaybackClock::new(&cfg.clock)?,
            dwell: DwellAccumulator::new(&cfg.dwell),
            lifecycle: LifecycleTracker::new(&cfg.lifecycle),
            observer,
            current: BTreeMap::new(),
        };
        let t = session.clock.time_sec();
        session.advance(t, t, LifecycleStep::Advance(0.0));
        Ok(session)
    }

    pub fn clock(&self) -> &PlaybackClock {
        &self.clock
    }

    pub fn store(&self) -> &SampleStore {
        &self.store
    }

    pub fn observer(&self) -> &O {
        &self.observer
    }

    pub fn observer_mut(&mut self) -> &mut O {
        &mut self.observer
    }

    pub fn time_sec(&self) -> f64 {
        self.clock.time_sec()
    }

    pub fn play(&mut self) {
        self.clock.play();
    }

    pub fn pause(&mut self) {
        self.clock.pause();
    }

    pub fn set_speed(&mut self, multiplier: f64) -> DwellResult<()> {
        self.clock.set_speed(multiplier)
    }

    /// One frame of the host loop. Playback time advances by `dt_sec * speed`; lifecycle
    /// transitions advance by the unscaled `dt_sec` so fades keep their on-screen duration.
    pub fn tick(&mut self, dt_sec: f64) -> ClockStep {
        let step = self.clock.tick(dt_sec);
        let wall_dt = if dt_sec.is_finite() { dt_sec.max(0.0) } else { 0.0 };
        self.advance(step.previous_sec, step.time_sec, LifecycleStep::Advance(wall_dt));
        step
    }

    /// Absolute scrub.
    ///
    /// Forward jumps re-derive dwell over the skipped span. Backward jumps discard all derived
    /// state and re-derive dwell from time zero, so the result never depends on scrub history.
    /// Either way lifecycle is rebuilt from the position at the target alone: an entity past the
    /// boundary there stays absent, any other entity fades in again.
    #[tracing::instrument(skip(self))]
    pub fn set_time(&mut self, time_sec: f64) -> DwellResult<ClockStep> {
        let step = self.clock.set_time(time_sec)?;
        if step.is_backward() {
            self.reset_derived_state(step);
            self.advance(0.0, step.time_sec, LifecycleStep::Reseed);
        } else if step.delta_sec() > 0.0 {
            self.advance(step.previous_sec, step.time_sec, LifecycleStep::Reseed);
        } else {
            self.advance(step.time_sec, step.time_sec, LifecycleStep::Advance(0.0));
        }
        Ok(step)
    }

    /// Append a live sample. Takes effect from the next tick.
    pub fn append_sample(&mut self, id: EntityId, sample: Sample) -> DwellResult<()> {
        self.store.append(id, sample)
    }

    pub fn entity_state(&self, id: &EntityId) -> Option<&EntityState> {
        self.current.get(id)
    }

    /// Scrub to `time_sec` and read `id`'s state there.
    pub fn entity_state_at(
        &mut self,
        id: &EntityId,
        time_sec: f64,
    ) -> DwellResult<Option<EntityState>> {
        self.set_time(time_sec)?;
        Ok(self.current.get(id).cloned())
    }

    /// Ids currently on the map (entering, active or exiting), in id order.
    pub fn visible_entity_ids(&self) -> Vec<EntityId> {
        self.current.keys().cloned().collect()
    }

    pub fn visible_entity_ids_at(&mut self, time_sec: f64) -> DwellResult<Vec<EntityId>> {
        self.set_time(time_sec)?;
        Ok(self.visible_entity_ids())
    }

    pub fn snapshot(&self) -> FrameSnapshot {
        FrameSnapshot {
            time_sec: self.clock.time_sec(),
            entities: self.current.values().cloned().collect(),
        }
    }

    fn reset_derived_state(&mut self, step: ClockStep) {
        self.dwell.clear();
        self.lifecycle.clear();
        self.current.clear();
        self.observer.on_event(&PlaybackEvent::DerivedStateReset {
            from_sec: step.previous_sec,
            to_sec: step.time_sec,
        });
    }

    fn advance(&mut self, from_sec: f64, to_sec: f64, lifecycle_step: LifecycleStep) {
        let ids: Vec<EntityId> = self.store.ids().cloned().collect();
        for id in &ids {
            match self.advance_entity(id, from_sec, to_sec, lifecycle_step) {
                Some(state) => {
                    self.current.insert(id.clone(), state);
                }
                None => {
                    // Not visible: derived state is discarded, a reappearance starts fresh.
                    self.current.remove(id);
                    self.dwell.forget(id);
                    self.lifecycle.forget(id);
                }
            }
        }
    }

    /// Update dwell and lifecycle for one entity over `[from_sec, to_sec]`. `None` means the
    /// entity is not renderable at `to_sec`.
    fn advance_entity(
        &mut self,
        id: &EntityId,
        from_sec: f64,
        to_sec: f64,
        lifecycle_step: LifecycleStep,
    ) -> Option<EntityState> {
        let track = self.store.track(id)?;
        if !track.is_classifiable() {
            tracing::trace!(entity = %id, "not enough samples to classify");
            return None;
        }
        let (first_sec, _) = track.span()?;
        if to_sec < first_sec {
            return None;
        }

        let Some(position) = position_at(track, to_sec) else {
            tracing::trace!(entity = %id, to_sec, "position undefined");
            return None;
        };

        let wall_dt = match lifecycle_step {
            LifecycleStep::Advance(dt) => dt,
            LifecycleStep::Reseed => {
                self.lifecycle.forget(id);
                0.0
            }
        };
        let observer: &mut dyn PlaybackObserver = &mut self.observer;
        let view = self
            .lifecycle
            .advance(id, position.radius_factor, wall_dt, observer)
            .filter(|v| v.phase != Phase::Gone)?;

        // Credit each slice of elapsed playback time to the interval it was spent in. A slice
        // with no defined position breaks the still run.
        let schedule = self.schedule.as_ref();
        let start = from_sec.max(first_sec);
        let mut cuts: Vec<f64> = boundaries_between(track, start, to_sec).collect();
        if let Some(s) = schedule {
            cuts.extend(s.boundaries_between(start, to_sec));
            cuts.sort_by(f64::total_cmp);
            cuts.dedup();
        }
        let mut cursor = start;
        for cut in cuts.into_iter().chain(std::iter::once(to_sec)) {
            if cut > cursor {
                if position_at(track, cursor).is_some() {
                    let interval = classify_at(&self.classifier, schedule, id, track, cursor);
                    self.dwell.tick(id, interval, cut - cursor, observer);
                } else {
                    self.dwell.forget(id);
                }
                cursor = cut;
            }
        }
        let interval = classify_at(&self.classifier, schedule, id, track, to_sec);
        let dwell_magnitude = self.dwell.tick(id, interval, 0.0, observer);
        let interval = interval?;

        Some(EntityState {
            id: id.clone(),
            angle_deg: position.angle_deg,
            radius_factor: position.radius_factor,
            motion: interval.motion,
            interval: interval.key,
            dwell_magnitude,
            lifecycle_phase: view.phase,
            render_opacity: view.render_opacity,
            render_radius: view.render_radius,
        })
    }
}

/// How a step drives lifecycle state.
#[derive(Clone, Copy, Debug)]
enum LifecycleStep {
    /// Continuous playback: fades advance by this much wall time.
    Advance(f64),
    /// A scrub: lifecycle is rebuilt from the position at the target time.
    Reseed,
}

fn position_at(track: &Track, time_sec: f64) -> Option<Position> {
    let r = resolve(track, time_sec)?;
    interpolate(r.a, r.b, time_sec)
}

/// Interval and motion for `id` at `time_sec`, from the schedule when one is loaded.
fn classify_at(
    classifier: &MotionClassifier,
    schedule: Option<&MotionSchedule>,
    id: &EntityId,
    track: &Track,
    time_sec: f64,
) -> Option<ClassifiedInterval> {
    if let Some(entry) = schedule.and_then(|s| s.lookup(time_sec)) {
        return Some(ClassifiedInterval {
            key: entry.key(),
            motion: entry.motion_of(id),
        });
    }
    let r = resolve(track, time_sec)?;
    Some(ClassifiedInterval {
        key: r.key(),
        motion: classifier.classify(r.a, r.b),
    })
}

#[cfg(test)]
#[path = "../../tests/unit/playback/session.rs"]
mod tests;
