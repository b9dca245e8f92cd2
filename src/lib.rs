//! stroke-anim animates generative pen-stroke models one sample at a time.
//!
//! A model produces a sequence of pen offsets with one-hot pen states (down, up, end). The
//! [`AnimationController`] turns that sequence into line segments on a retained-mode
//! [`RenderSurface`], one sample per tick:
//!
//! - Load a model through a [`ModelLoader`] and poll it until ready
//! - Tick a session; a segment is drawn iff the *previous* sample had the pen down
//! - Pause, clear, switch models, and export the surface as a PNG
//!
//! The [`ControlPanel`] owns the [`Configuration`] and exposes validated commands; the
//! [`Scheduler`] drives it with a fixed-rate tick timer and a load-poll timer.
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod foundation;
mod panel;
mod render;
mod session;

/// Model gateway seam and the bundled gateways.
pub mod model;

pub use crate::foundation::core::{Canvas, PALETTE, Point, Rgba8, Rng64, Vec2};
pub use crate::foundation::error::{SketchError, SketchResult};

pub use crate::model::catalog;
pub use crate::model::gateway::{
    ModelGateway, ModelLoader, PenSample, PenState, validate_model_id,
};
pub use crate::model::recorded::{RecordedCursor, RecordedLoader, RecordedModel, Recording};
pub use crate::model::scripted::{GatewayCalls, Readiness, ScriptedLoader, ScriptedModel};

pub use crate::render::cpu::{CpuSurface, RasterImage};
pub use crate::render::surface::{
    DrawCall, ORIGIN_INNER_RADIUS, ORIGIN_OUTER_RADIUS, RecordingSurface, RenderSurface,
    draw_origin_marker,
};

pub use crate::panel::control::{Command, ControlPanel, RANDOM_SCALE, RANDOM_TEMPERATURE};
pub use crate::session::config::{
    Configuration, LoadPolicy, SCALE_FACTOR_MAX, STROKE_WIDTH_MAX, TEMPERATURE_MAX,
    TICK_RATE_RANGE,
};
pub use crate::session::controller::{AnimationController, LoadPoll, TickOutcome};
pub use crate::session::scheduler::{Pacing, RunSummary, Scheduler};
pub use crate::session::state::{
    DrawingState, FinishReason, LoadTicket, Phase, SessionToken, StepOutcome, advance,
};
pub use crate::session::status::{StatusLog, StatusSink, StatusUpdate, TracingStatusSink};
