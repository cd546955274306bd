use crate::{
    foundation::core::{EntityId, IntervalKey, Motion},
    lifecycle::tracker::Phase,
};

/// Engine telemetry, emitted synchronously from inside a tick.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum PlaybackEvent {
    /// An entity's dwell state observed a different interval than on its previous tick.
    IntervalEntered {
        entity: EntityId,
        key: IntervalKey,
        motion: Motion,
    },
    /// Dwell magnitude snapped back to baseline on entering a moving interval.
    MagnitudeReset { entity: EntityId, magnitude: f64 },
    /// Dwell magnitude grew over a still step.
    MagnitudeUpdated { entity: EntityId, magnitude: f64 },
    /// `from` is `None` when the entity was first observed.
    LifecycleTransitioned {
        entity: EntityId,
        from: Option<Phase>,
        to: Phase,
    },
    /// A backward jump discarded all per-entity dwell and lifecycle state.
    DerivedStateReset { from_sec: f64, to_sec: f64 },
}

/// Receiver for [`PlaybackEvent`]s. Implementations must not assume any particular tick rate.
pub trait PlaybackObserver {
    fn on_event(&mut self, event: &PlaybackEvent);
}

impl<O: PlaybackObserver + ?Sized> PlaybackObserver for Box<O> {
    fn on_event(&mut self, event: &PlaybackEvent) {
        (**self).on_event(event);
    }
}

/// Drops every event.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullObserver;

impl PlaybackObserver for NullObserver {
    fn on_event(&mut self, _event: &PlaybackEvent) {}
}

/// Forwards events to `tracing`. Lifecycle transitions and state resets log at `info`, dwell
/// changes at `debug` or `trace`.
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingObserver;

impl PlaybackObserver for TracingObserver {
    fn on_event(&mut self, event: &PlaybackEvent) {
        match event {
            PlaybackEvent::IntervalEntered {
                entity,
                key,
                motion,
            } => tracing::debug!(%entity, %key, %motion, "interval entered"),
            PlaybackEvent::MagnitudeReset { entity, magnitude } => {
                tracing::debug!(%entity, magnitude, "dwell reset")
            }
            PlaybackEvent::MagnitudeUpdated { entity, magnitude } => {
                tracing::trace!(%entity, magnitude, "dwell grew")
            }
            PlaybackEvent::LifecycleTransitioned { entity, from, to } => {
                tracing::info!(%entity, ?from, ?to, "lifecycle transition")
            }
            PlaybackEvent::DerivedStateReset { from_sec, to_sec } => {
                tracing::info!(from_sec, to_sec, "derived state reset")
            }
        }
    }
}

/// Keeps every event in memory.
#[derive(Clone, Debug, Default)]
pub struct RecordingObserver {
    pub events: Vec<PlaybackEvent>,
}

impl RecordingObserver {
    pub fn take(&mut self) -> Vec<PlaybackEvent> {
        std::mem::take(&mut self.events)
    }
}

impl PlaybackObserver for RecordingObserver {
    fn on_event(&mut self, event: &PlaybackEvent) {
        self.events.push(event.clone());
    }
}

#[cfg(test)]
#[path = "../../tests/unit/playback/observer.rs"]
mod tests;
