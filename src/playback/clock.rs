use crate::{
    config::ClockConfig,
    foundation::error::{DwellError, DwellResult},
};

/// Outcome of one clock mutation.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
pub struct ClockStep {
    pub previous_sec: f64,
    pub time_sec: f64,
}

impl ClockStep {
    /// Playback time covered by the step; negative for a backward scrub.
    pub fn delta_sec(&self) -> f64 {
        self.time_sec - self.previous_sec
    }

    pub fn is_backward(&self) -> bool {
        self.time_sec < self.previous_sec
    }
}

/// Monotonic playback cursor over `[0, duration_sec]`.
///
/// Advanced by a host frame loop through [`PlaybackClock::tick`] or moved directly by
/// [`PlaybackClock::set_time`]. It never wraps and never leaves its range.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct PlaybackClock {
    time_sec: f64,
    duration_sec: f64,
    speed: f64,
    playing: bool,
}

impl PlaybackClock {
    pub fn new(cfg: &ClockConfig) -> DwellResult<Self> {
        if !cfg.duration_sec.is_finite() || cfg.duration_sec <= 0.0 {
            return Err(DwellError::validation("clock duration must be > 0"));
        }
        let mut clock = Self {
            time_sec: 0.0,
            duration_sec: cfg.duration_sec,
            speed: 1.0,
            playing: true,
        };
        clock.set_speed(cfg.speed)?;
        Ok(clock)
    }

    pub fn time_sec(&self) -> f64 {
        self.time_sec
    }

    pub fn duration_sec(&self) -> f64 {
        self.duration_sec
    }

    pub fn speed(&self) -> f64 {
        self.speed
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    pub fn at_end(&self) -> bool {
        self.time_sec >= self.duration_sec
    }

    pub fn play(&mut self) {
        self.playing = true;
    }

    pub fn pause(&mut self) {
        self.playing = false;
    }

    /// Set the playback multiplier. Must be finite and non-negative.
    pub fn set_speed(&mut self, multiplier: f64) -> DwellResult<()> {
        if !multiplier.is_finite() || multiplier < 0.0 {
            return Err(DwellError::validation(format!(
                "speed must be finite and >= 0, got {multiplier}"
            )));
        }
        self.speed = multiplier;
        Ok(())
    }

    /// Advance by `dt_sec * speed` while playing. Clamps at the end; does not loop.
    pub fn tick(&mut self, dt_sec: f64) -> ClockStep {
        let previous_sec = self.time_sec;
        if self.playing && dt_sec.is_finite() && dt_sec > 0.0 {
            self.time_sec = self.clamp(self.time_sec + dt_sec * self.speed);
        }
        ClockStep {
            previous_sec,
            time_sec: self.time_sec,
        }
    }

    /// Absolute scrub. Works while paused; a non-finite target is rejected.
    pub fn set_time(&mut self, time_sec: f64) -> DwellResult<ClockStep> {
        if !time_sec.is_finite() {
            return Err(DwellError::validation("scrub target must be finite"));
        }
        let previous_sec = self.time_sec;
        self.time_sec = self.clamp(time_sec);
        Ok(ClockStep {
            previous_sec,
            time_sec: self.time_sec,
        })
    }

    fn clamp(&self, t: f64) -> f64 {
        t.clamp(0.0, self.duration_sec)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/playback/clock.rs"]
mod tests;
