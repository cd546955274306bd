//! dwellscope is a temporal playback and motion-classification engine for entities recorded
//! as sparse keyframes on a circular floor plan.
//!
//! # Pipeline overview
//!
//! 1. **Load**: keyframe rows → [`SampleStore`] (validated, sorted [`Track`]s per entity)
//! 2. **Resolve**: `(Track, time)` → bracketing [`ResolvedInterval`] with half-open `[tA, tB)`
//!    boundaries and clamping outside the recorded span
//! 3. **Interpolate**: wrap-aware angle and linear radius between the bracketing samples
//! 4. **Classify**: STILL or MOVING per interval, from a sample label, a [`MotionSchedule`], or a
//!    position-delta threshold
//! 5. **Accumulate**: [`DwellAccumulator`] grows a magnitude over consecutive still intervals
//! 6. **Lifecycle**: [`LifecycleTracker`] fades entities in and out around the map boundary
//!
//! A [`PlaybackSession`] owns one [`PlaybackClock`] and all derived per-entity state, and runs
//! the whole pipeline for every entity on each tick or scrub.
#![forbid(unsafe_code)]

mod animation;
mod config;
mod foundation;
mod lifecycle;
mod motion;
mod playback;
mod samples;
mod timeline;

pub use animation::ease::Ease;
pub use animation::transition::Transition;
pub use config::{
    ClockConfig, DwellConfig, EngineConfig, LifecycleConfig, MotionConfig, StoreConfig,
};
pub use foundation::core::{EntityId, IntervalKey, Motion, Position};
pub use foundation::error::{DwellError, DwellResult};
pub use foundation::math::{normalize_deg, shortest_arc_deg};
pub use lifecycle::tracker::{LifecycleState, LifecycleTracker, LifecycleView, Phase};
pub use motion::classify::MotionClassifier;
pub use motion::dwell::{ClassifiedInterval, DwellAccumulator, DwellState};
pub use playback::clock::{ClockStep, PlaybackClock};
pub use playback::observer::{
    NullObserver, PlaybackEvent, PlaybackObserver, RecordingObserver, TracingObserver,
};
pub use playback::session::{EntityState, FrameSnapshot, PlaybackSession};
pub use samples::csv::{read_rows, read_rows_from_path};
pub use samples::model::{RawRow, Sample, Track};
pub use samples::store::{SampleStore, SkippedRow};
pub use timeline::interpolate::interpolate;
pub use timeline::interval::{ResolvedInterval, boundaries_between, resolve};
pub use timeline::schedule::{MotionSchedule, ScheduleEntry};
