use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::foundation::core::{Canvas, Rgba8};
use crate::foundation::error::{SketchError, SketchResult};
use crate::model::gateway::validate_model_id;

/// Largest accepted temperature.
pub const TEMPERATURE_MAX: f64 = 5.0;
/// Accepted tick rates in steps per second.
pub const TICK_RATE_RANGE: std::ops::RangeInclusive<u32> = 1..=240;
/// Largest accepted stroke width.
pub const STROKE_WIDTH_MAX: f64 = 50.0;
/// Largest accepted scale factor.
pub const SCALE_FACTOR_MAX: f64 = 10.0;

/// How model loads are polled and bounded.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoadPolicy {
    /// Interval between readiness polls.
    pub poll_interval_ms: u64,
    /// Give up and report `LoadTimeout` after this long.
    pub timeout_ms: u64,
    /// Rendering-pixel scale handed to the model once it is ready.
    pub pixel_factor: f64,
}

impl Default for LoadPolicy {
    fn default() -> Self {
        Self {
            poll_interval_ms: 100,
            timeout_ms: 30_000,
            pixel_factor: 2.0,
        }
    }
}

impl LoadPolicy {
    /// Poll interval as a duration.
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    /// Timeout as a duration.
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

/// Parameters read by the controller on every operation.
///
/// Only the control panel mutates this; the controller borrows it read-only.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Configuration {
    /// Model to load when a session starts without one.
    pub model_id: String,
    /// Sampling temperature, passed to the model untouched.
    pub temperature: f64,
    /// Animation steps per second.
    pub tick_rate: u32,
    /// Stroke width in pixels.
    pub stroke_width: f64,
    /// Multiplier applied to every sampled offset.
    pub scale_factor: f64,
    /// Stroke color when random colors are off.
    pub color: Rgba8,
    /// Pick a new palette color for every drawn segment.
    pub random_colors: bool,
    /// Mark the start point on every cleared surface.
    pub show_origin: bool,
    /// Surface size.
    pub canvas: Canvas,
    /// Surface background.
    pub background: Rgba8,
    /// Safety cap on sampled steps per session.
    pub max_steps: u64,
    /// Load polling behavior.
    pub load: LoadPolicy,
}

impl Default for Configuration {
    fn default() -> Self {
        Self {
            model_id: "cat".to_owned(),
            temperature: 0.5,
            tick_rate: 60,
            stroke_width: 2.0,
            scale_factor: 1.0,
            color: Rgba8::STROKE_BLUE,
            random_colors: false,
            show_origin: true,
            canvas: Canvas::default(),
            background: Rgba8::WHITE,
            max_steps: 5_000,
            load: LoadPolicy::default(),
        }
    }
}

impl Configuration {
    /// Read and validate a JSON configuration file. Missing fields take their defaults.
    pub fn from_json_file(path: &Path) -> SketchResult<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| {
            SketchError::Other(
                anyhow::Error::new(e).context(format!("read config '{}'", path.display())),
            )
        })?;
        let cfg: Self =
            serde_json::from_str(&text).map_err(|e| SketchError::serde(e.to_string()))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Check every field against its accepted range.
    pub fn validate(&self) -> SketchResult<()> {
        validate_model_id(&self.model_id)?;
        check_temperature(self.temperature)?;
        check_tick_rate(self.tick_rate)?;
        check_stroke_width(self.stroke_width)?;
        check_scale_factor(self.scale_factor)?;
        self.canvas.validate()?;
        if self.max_steps == 0 {
            return Err(SketchError::validation("max_steps must be >= 1"));
        }
        if self.load.poll_interval_ms == 0 || self.load.timeout_ms == 0 {
            return Err(SketchError::validation(
                "load poll interval and timeout must be > 0",
            ));
        }
        if !(self.load.pixel_factor.is_finite() && self.load.pixel_factor > 0.0) {
            return Err(SketchError::validation("pixel_factor must be > 0"));
        }
        Ok(())
    }

    /// Duration of one animation step.
    pub fn tick_interval(&self) -> Duration {
        Duration::from_secs_f64(1.0 / f64::from(self.tick_rate.max(1)))
    }
}

/// Temperature must be finite, positive, and at most [`TEMPERATURE_MAX`].
pub fn check_temperature(v: f64) -> SketchResult<()> {
    if v.is_finite() && v > 0.0 && v <= TEMPERATURE_MAX {
        Ok(())
    } else {
        Err(SketchError::validation(format!(
            "temperature must be in (0, {TEMPERATURE_MAX}], got {v}"
        )))
    }
}

/// Tick rate must lie in [`TICK_RATE_RANGE`].
pub fn check_tick_rate(v: u32) -> SketchResult<()> {
    if TICK_RATE_RANGE.contains(&v) {
        Ok(())
    } else {
        Err(SketchError::validation(format!(
            "tick rate must be in {}..={}, got {v}",
            TICK_RATE_RANGE.start(),
            TICK_RATE_RANGE.end()
        )))
    }
}

/// Stroke width must be finite and in `(0, STROKE_WIDTH_MAX]`.
pub fn check_stroke_width(v: f64) -> SketchResult<()> {
    if v.is_finite() && v > 0.0 && v <= STROKE_WIDTH_MAX {
        Ok(())
    } else {
        Err(SketchError::validation(format!(
            "stroke width must be in (0, {STROKE_WIDTH_MAX}], got {v}"
        )))
    }
}

/// Scale factor must be finite and in `(0, SCALE_FACTOR_MAX]`.
pub fn check_scale_factor(v: f64) -> SketchResult<()> {
    if v.is_finite() && v > 0.0 && v <= SCALE_FACTOR_MAX {
        Ok(())
    } else {
        Err(SketchError::validation(format!(
            "scale factor must be in (0, {SCALE_FACTOR_MAX}], got {v}"
        )))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/session/config.rs"]
mod tests;
