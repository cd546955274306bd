use std::path::Path;

use anyhow::Context as _;

use crate::{
    animation::ease::Ease,
    foundation::error::{DwellError, DwellResult},
};

/// Complete engine configuration. Every field has a default, so a partial JSON document is
/// a valid config.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub motion: MotionConfig,
    pub dwell: DwellConfig,
    pub lifecycle: LifecycleConfig,
    pub clock: ClockConfig,
    pub store: StoreConfig,
}

/// Position-delta thresholds used when a sample carries no motion label.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct MotionConfig {
    pub angle_epsilon_deg: f64,
    pub radius_epsilon: f64,
}

impl Default for MotionConfig {
    fn default() -> Self {
        // Tight enough to absorb CSV rounding noise and nothing more.
        Self {
            angle_epsilon_deg: 0.5,
            radius_epsilon: 0.002,
        }
    }
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct DwellConfig {
    /// Magnitude while moving, and the starting point of every still run.
    pub baseline: f64,
    /// Growth per second of still playback time. Uncapped.
    pub growth_rate_per_sec: f64,
}

impl Default for DwellConfig {
    fn default() -> Self {
        Self {
            baseline: 10.0,
            growth_rate_per_sec: 10.0,
        }
    }
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct LifecycleConfig {
    pub enter_duration_sec: f64,
    pub exit_duration_sec: f64,
    /// An active entity whose true radius exceeds this starts exiting.
    pub exit_radius_threshold: f64,
    /// Render radius an entrance starts from.
    pub off_map_radius: f64,
    /// Render radius an exit heads toward.
    pub past_boundary_radius: f64,
    pub enter_ease: Ease,
    pub exit_ease: Ease,
}

impl Default for LifecycleConfig {
    fn default() -> Self {
        Self {
            enter_duration_sec: 0.35,
            exit_duration_sec: 0.6,
            exit_radius_threshold: 1.0,
            off_map_radius: 1.25,
            past_boundary_radius: 1.3,
            enter_ease: Ease::OutCubic,
            exit_ease: Ease::InCubic,
        }
    }
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct ClockConfig {
    /// Length of the observation window; the clock never leaves `[0, duration_sec]`.
    pub duration_sec: f64,
    pub speed: f64,
}

impl Default for ClockConfig {
    fn default() -> Self {
        Self {
            duration_sec: 300.0,
            speed: 1.0,
        }
    }
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Radius assumed for a seated entity whose row names a bench but no radius.
    pub seated_radius: f64,
    /// Recognized bench codes (canonical, upper-case). Empty accepts any non-blank code.
    pub bench_codes: Vec<String>,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            seated_radius: 0.85,
            bench_codes: Vec::new(),
        }
    }
}

impl StoreConfig {
    pub fn recognizes_bench(&self, code: &str) -> bool {
        let code = code.trim();
        if code.is_empty() {
            return false;
        }
        self.bench_codes.is_empty()
            || self
                .bench_codes
                .iter()
                .any(|c| c.trim().eq_ignore_ascii_case(code))
    }
}

impl EngineConfig {
    pub fn from_json_str(s: &str) -> DwellResult<Self> {
        let cfg: Self = serde_json::from_str(s)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn from_path(path: &Path) -> DwellResult<Self> {
        let s = std::fs::read_to_string(path)
            .with_context(|| format!("read config '{}'", path.display()))?;
        Self::from_json_str(&s)
    }

    pub fn validate(&self) -> DwellResult<()> {
        non_negative("motion.angle_epsilon_deg", self.motion.angle_epsilon_deg)?;
        non_negative("motion.radius_epsilon", self.motion.radius_epsilon)?;
        finite("dwell.baseline", self.dwell.baseline)?;
        finite("dwell.growth_rate_per_sec", self.dwell.growth_rate_per_sec)?;
        positive("lifecycle.enter_duration_sec", self.lifecycle.enter_duration_sec)?;
        positive("lifecycle.exit_duration_sec", self.lifecycle.exit_duration_sec)?;
        finite(
            "lifecycle.exit_radius_threshold",
            self.lifecycle.exit_radius_threshold,
        )?;
        finite("lifecycle.off_map_radius", self.lifecycle.off_map_radius)?;
        finite(
            "lifecycle.past_boundary_radius",
            self.lifecycle.past_boundary_radius,
        )?;
        positive("clock.duration_sec", self.clock.duration_sec)?;
        non_negative("clock.speed", self.clock.speed)?;
        non_negative("store.seated_radius", self.store.seated_radius)?;
        Ok(())
    }
}

fn finite(name: &str, v: f64) -> DwellResult<()> {
    if !v.is_finite() {
        return Err(DwellError::validation(format!("{name} must be finite")));
    }
    Ok(())
}

fn non_negative(name: &str, v: f64) -> DwellResult<()> {
    finite(name, v)?;
    if v < 0.0 {
        return Err(DwellError::validation(format!("{name} must be >= 0")));
    }
    Ok(())
}

fn positive(name: &str, v: f64) -> DwellResult<()> {
    finite(name, v)?;
    if v <= 0.0 {
        return Err(DwellError::validation(format!("{name} must be > 0")));
    }
    Ok(())
}

#[cfg(test)]
#[path = "../tests/unit/config.rs"]
mod tests;
