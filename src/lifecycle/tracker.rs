use std::collections::BTreeMap;

use crate::{
    animation::transition::Transition,
    config::LifecycleConfig,
    foundation::core::EntityId,
    playback::observer::{PlaybackEvent, PlaybackObserver},
};

/// Appearance phase. Phases only move forward: entering → active → exiting → gone.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Entering,
    Active,
    Exiting,
    Gone,
}

/// Per-entity lifecycle state. `transition` drives the render radius while entering or
/// exiting; opacity follows the same eased progress.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
pub struct LifecycleState {
    pub phase: Phase,
    pub transition: Option<Transition>,
}

/// What the renderer needs from the lifecycle for one entity.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
pub struct LifecycleView {
    pub phase: Phase,
    pub render_opacity: f64,
    pub render_radius: f64,
}

#[derive(Clone, Debug)]
pub struct LifecycleTracker {
    cfg: LifecycleConfig,
    states: BTreeMap<EntityId, LifecycleState>,
}

impl LifecycleTracker {
    pub fn new(cfg: &LifecycleConfig) -> Self {
        Self {
            cfg: cfg.clone(),
            states: BTreeMap::new(),
        }
    }

    /// Advance `id` by `dt_sec` given its true radius this tick.
    ///
    /// Returns `None` when the entity is not (yet) on the map. A returned `Phase::Gone` view
    /// means the entity finished exiting during this call; its state has been discarded and a
    /// later reappearance starts a fresh entrance.
    pub fn advance(
        &mut self,
        id: &EntityId,
        true_radius: f64,
        dt_sec: f64,
        observer: &mut dyn PlaybackObserver,
    ) -> Option<LifecycleView> {
        let cfg = &self.cfg;
        let past_threshold = true_radius > cfg.exit_radius_threshold;

        let Some(state) = self.states.get_mut(id) else {
            if past_threshold {
                return None;
            }
            let state = LifecycleState {
                phase: Phase::Entering,
                transition: Some(Transition::new(
                    cfg.off_map_radius,
                    true_radius,
                    cfg.enter_duration_sec,
                    cfg.enter_ease,
                )),
            };
            self.states.insert(id.clone(), state);
            emit(observer, id, None, Phase::Entering);
            return Some(self.render(&state, true_radius));
        };

        let from = state.phase;
        match state.phase {
            Phase::Entering => {
                if let Some(t) = state.transition.as_mut() {
                    t.advance(dt_sec);
                }
                if state.transition.is_none_or(|t| t.is_complete()) {
                    // A finished entrance that already lies past the boundary goes straight out.
                    if past_threshold {
                        state.phase = Phase::Exiting;
                        state.transition = Some(exit_transition(cfg, true_radius));
                    } else {
                        state.phase = Phase::Active;
                        state.transition = None;
                    }
                }
            }
            Phase::Active => {
                if past_threshold {
                    state.phase = Phase::Exiting;
                    state.transition = Some(exit_transition(cfg, true_radius));
                }
            }
            Phase::Exiting => {
                if let Some(t) = state.transition.as_mut() {
                    t.advance(dt_sec);
                }
                if state.transition.is_none_or(|t| t.is_complete()) {
                    state.phase = Phase::Gone;
                    state.transition = None;
                }
            }
            Phase::Gone => {}
        }

        let state = *state;
        if state.phase != from {
            emit(observer, id, Some(from), state.phase);
        }
        if state.phase == Phase::Gone {
            self.states.remove(id);
        }
        Some(self.render(&state, true_radius))
    }

    /// Current view of `id` without advancing it.
    pub fn view(&self, id: &EntityId, true_radius: f64) -> Option<LifecycleView> {
        self.states.get(id).map(|s| self.render(s, true_radius))
    }

    pub fn phase(&self, id: &EntityId) -> Option<Phase> {
        self.states.get(id).map(|s| s.phase)
    }

    pub fn state(&self, id: &EntityId) -> Option<&LifecycleState> {
        self.states.get(id)
    }

    /// Ids with live state (entering, active or exiting).
    pub fn ids(&self) -> impl Iterator<Item = &EntityId> {
        self.states.keys()
    }

    pub fn forget(&mut self, id: &EntityId) {
        self.states.remove(id);
    }

    pub fn clear(&mut self) {
        self.states.clear();
    }

    fn render(&self, state: &LifecycleState, true_radius: f64) -> LifecycleView {
        let (render_opacity, render_radius) = match (state.phase, state.transition) {
            (Phase::Entering, Some(t)) => (t.eased(), t.value_toward(true_radius)),
            (Phase::Exiting, Some(t)) => (1.0 - t.eased(), t.value()),
            (Phase::Gone, _) => (0.0, self.cfg.past_boundary_radius),
            _ => (1.0, true_radius),
        };
        LifecycleView {
            phase: state.phase,
            render_opacity,
            render_radius,
        }
    }
}

fn exit_transition(cfg: &LifecycleConfig, true_radius: f64) -> Transition {
    Transition::new(
        true_radius,
        cfg.past_boundary_radius,
        cfg.exit_duration_sec,
        cfg.exit_ease,
    )
}

fn emit(observer: &mut dyn PlaybackObserver, id: &EntityId, from: Option<Phase>, to: Phase) {
    observer.on_event(&PlaybackEvent::LifecycleTransitioned {
        entity: id.clone(),
        from,
        to,
    });
}

#[cfg(test)]
#[path = "../../tests/unit/lifecycle/tracker.rs"]
mod tests;
