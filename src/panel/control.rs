use std::path::{Path, PathBuf};

use crate::foundation::core::{Rgba8, Rng64};
use crate::foundation::error::{SketchError, SketchResult};
use crate::model::catalog;
use crate::model::gateway::{ModelLoader, validate_model_id};
use crate::render::surface::RenderSurface;
use crate::session::config::{
    Configuration, check_scale_factor, check_stroke_width, check_temperature, check_tick_rate,
};
use crate::session::controller::AnimationController;
use crate::session::state::{LoadTicket, Phase};
use crate::session::status::{StatusSink, StatusUpdate};

/// Temperatures picked by [`ControlPanel::randomize_and_start`].
pub const RANDOM_TEMPERATURE: std::ops::Range<f64> = 0.2..0.8;
/// Scale factors picked by [`ControlPanel::randomize_and_start`].
pub const RANDOM_SCALE: std::ops::Range<f64> = 0.8..1.5;

/// A discrete user command.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Start a new session.
    Start,
    /// Pause or resume the running session.
    TogglePause,
    /// End the session and wipe the surface.
    Clear,
    /// Random model, temperature and scale, then start.
    RandomizeAndStart,
    /// Export the surface into the save directory.
    Save,
    /// Switch to another model.
    SetModel(String),
    /// Sampling temperature.
    SetTemperature(f64),
    /// Steps per second.
    SetTickRate(u32),
    /// Stroke width in pixels.
    SetStrokeWidth(f64),
    /// Offset multiplier.
    SetScaleFactor(f64),
    /// Fixed stroke color.
    SetColor(Rgba8),
    /// Per-segment palette colors.
    SetRandomColors(bool),
    /// Origin marker on cleared surfaces.
    SetShowOrigin(bool),
}

impl Command {
    /// Keyboard binding: `space` starts or pauses, `c` clears, `r` randomizes, `s` saves.
    ///
    /// `space` means [`Command::TogglePause`] while a session is drawing and
    /// [`Command::Start`] otherwise.
    pub fn from_key(key: char, phase: Phase) -> Option<Self> {
        match key.to_ascii_lowercase() {
            ' ' if phase.is_drawing() => Some(Self::TogglePause),
            ' ' => Some(Self::Start),
            'c' => Some(Self::Clear),
            'r' => Some(Self::RandomizeAndStart),
            's' => Some(Self::Save),
            _ => None,
        }
    }
}

/// Owns the configuration and drives an [`AnimationController`] with validated commands.
///
/// The panel is the only writer of [`Configuration`]; the controller borrows it per call.
pub struct ControlPanel<L, S>
where
    L: ModelLoader,
    S: RenderSurface,
{
    config: Configuration,
    controller: AnimationController<L, S>,
    rng: Rng64,
    model_pool: Vec<String>,
    save_dir: PathBuf,
    last_saved: Option<PathBuf>,
}

impl<L, S> ControlPanel<L, S>
where
    L: ModelLoader,
    S: RenderSurface,
{
    /// Validate `config` and wrap a fresh controller.
    ///
    /// The randomization pool starts as the ids the loader reports it can serve, or the stock
    /// catalog when the loader cannot tell.
    pub fn new(config: Configuration, loader: L, surface: S) -> SketchResult<Self> {
        config.validate()?;
        let model_pool = loader.loadable().unwrap_or_else(catalog::stock_pool);
        let mut controller = AnimationController::new(loader, surface);
        controller.wipe_surface(&config);
        Ok(Self {
            config,
            controller,
            rng: Rng64::from_time(),
            model_pool,
            save_dir: PathBuf::from("."),
            last_saved: None,
        })
    }

    /// Seed both the randomizer and the controller's color generator.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = Rng64::new(seed);
        self.controller = self
            .controller
            .with_rng(Rng64::new(seed ^ 0x5eed_c010_2b00_0001));
        self
    }

    /// Route status updates to `sink`.
    pub fn with_status_sink(mut self, sink: impl StatusSink + 'static) -> Self {
        self.controller = self.controller.with_status_sink(sink);
        self
    }

    /// Restrict [`Self::randomize_and_start`] to `pool`.
    pub fn with_model_pool(mut self, pool: Vec<String>) -> SketchResult<Self> {
        for id in &pool {
            validate_model_id(id)?;
        }
        self.model_pool = pool;
        Ok(self)
    }

    /// Directory used by [`Self::save`].
    pub fn with_save_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.save_dir = dir.into();
        self
    }

    /// Current configuration.
    pub fn config(&self) -> &Configuration {
        &self.config
    }

    /// The wrapped controller.
    pub fn controller(&self) -> &AnimationController<L, S> {
        &self.controller
    }

    /// Controller and configuration together, for drivers that tick and poll.
    pub fn parts_mut(&mut self) -> (&mut AnimationController<L, S>, &Configuration) {
        (&mut self.controller, &self.config)
    }

    /// Current phase.
    pub fn phase(&self) -> Phase {
        self.controller.phase()
    }

    /// Current status snapshot.
    pub fn status(&self) -> StatusUpdate {
        self.controller.status()
    }

    /// Models eligible for randomization.
    pub fn model_pool(&self) -> &[String] {
        &self.model_pool
    }

    /// Path written by the latest successful save.
    pub fn last_saved(&self) -> Option<&Path> {
        self.last_saved.as_deref()
    }

    /// Run one command and report the resulting phase.
    pub fn apply(&mut self, command: Command) -> SketchResult<Phase> {
        match command {
            Command::Start => {
                self.start()?;
            }
            Command::TogglePause => {
                self.toggle_pause();
            }
            Command::Clear => {
                self.clear();
            }
            Command::RandomizeAndStart => {
                self.randomize_and_start()?;
            }
            Command::Save => {
                let dir = self.save_dir.clone();
                self.save(&dir)?;
            }
            Command::SetModel(id) => {
                self.set_model(&id)?;
            }
            Command::SetTemperature(v) => self.set_temperature(v)?,
            Command::SetTickRate(v) => self.set_tick_rate(v)?,
            Command::SetStrokeWidth(v) => self.set_stroke_width(v)?,
            Command::SetScaleFactor(v) => self.set_scale_factor(v)?,
            Command::SetColor(c) => self.set_color(c),
            Command::SetRandomColors(on) => self.set_random_colors(on),
            Command::SetShowOrigin(on) => self.set_show_origin(on),
        }
        Ok(self.phase())
    }

    /// Start a session; loads the configured model first if none is ready.
    pub fn start(&mut self) -> SketchResult<Phase> {
        self.controller.start(&self.config)
    }

    /// Pause or resume.
    pub fn toggle_pause(&mut self) -> Phase {
        self.controller.toggle_pause()
    }

    /// End the session and wipe the surface.
    pub fn clear(&mut self) -> Phase {
        self.controller.clear(&self.config)
    }

    /// Pick a model from the pool plus a temperature in [`RANDOM_TEMPERATURE`] and a scale in
    /// [`RANDOM_SCALE`], and switch to the picked model. The picks are stored only if the
    /// switch starts.
    ///
    /// The session starts as soon as the load completes, so the phase afterwards is `Loading`.
    pub fn randomize_and_start(&mut self) -> SketchResult<LoadTicket> {
        let model_id = self
            .rng
            .pick(&self.model_pool)
            .cloned()
            .ok_or_else(|| SketchError::validation("model pool is empty"))?;
        let temperature = self
            .rng
            .range_f64(RANDOM_TEMPERATURE.start, RANDOM_TEMPERATURE.end);
        let scale = self.rng.range_f64(RANDOM_SCALE.start, RANDOM_SCALE.end);

        tracing::info!(model = %model_id, temperature, scale, "randomized");
        let next = Configuration {
            model_id,
            temperature,
            scale_factor: scale,
            ..self.config.clone()
        };
        self.switch_to(next)
    }

    /// Export the surface as `sketchrnn_<model>_<YYYYMMDDTHHMMSS>.png` (UTC) inside `dir`.
    pub fn save(&mut self, dir: &Path) -> SketchResult<PathBuf> {
        let stamp = chrono::Utc::now().format("%Y%m%dT%H%M%S");
        let path = dir.join(format!("sketchrnn_{}_{stamp}.png", self.config.model_id));
        self.save_as(&path)
    }

    /// Export the surface to `path`.
    pub fn save_as(&mut self, path: &Path) -> SketchResult<PathBuf> {
        let written = self.controller.export(path)?;
        tracing::info!(path = %written.display(), "saved sketch");
        self.last_saved = Some(written.clone());
        Ok(written)
    }

    /// Switch to `model_id` and start drawing once it is loaded.
    ///
    /// The configured model changes only if the load starts.
    pub fn set_model(&mut self, model_id: &str) -> SketchResult<LoadTicket> {
        validate_model_id(model_id)?;
        let next = Configuration {
            model_id: model_id.to_owned(),
            ..self.config.clone()
        };
        self.switch_to(next)
    }

    fn switch_to(&mut self, next: Configuration) -> SketchResult<LoadTicket> {
        let ticket = self.controller.switch_model(&next.model_id, &next)?;
        self.config = next;
        Ok(ticket)
    }

    /// Set the sampling temperature.
    pub fn set_temperature(&mut self, v: f64) -> SketchResult<()> {
        check_temperature(v)?;
        self.config.temperature = v;
        Ok(())
    }

    /// Set the tick rate; the scheduler reads it before every tick.
    pub fn set_tick_rate(&mut self, v: u32) -> SketchResult<()> {
        check_tick_rate(v)?;
        self.config.tick_rate = v;
        Ok(())
    }

    /// Set the stroke width.
    pub fn set_stroke_width(&mut self, v: f64) -> SketchResult<()> {
        check_stroke_width(v)?;
        self.config.stroke_width = v;
        Ok(())
    }

    /// Set the offset multiplier.
    pub fn set_scale_factor(&mut self, v: f64) -> SketchResult<()> {
        check_scale_factor(v)?;
        self.config.scale_factor = v;
        Ok(())
    }

    /// Set the fixed stroke color.
    pub fn set_color(&mut self, color: Rgba8) {
        self.config.color = color;
    }

    /// Toggle per-segment palette colors.
    pub fn set_random_colors(&mut self, on: bool) {
        self.config.random_colors = on;
    }

    /// Toggle the origin marker.
    ///
    /// Turning it on marks the origin right away unless a session is drawing; turning it off
    /// wipes the surface.
    pub fn set_show_origin(&mut self, on: bool) {
        self.config.show_origin = on;
        if on {
            if !self.phase().is_drawing() {
                self.controller.mark_origin();
            }
        } else {
            self.controller.wipe_surface(&self.config);
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/panel/control.rs"]
mod tests;
