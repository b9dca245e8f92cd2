use serde::{Deserialize, Serialize};

use crate::foundation::core::{PALETTE, Point, Rgba8, Rng64};
use crate::model::gateway::{ModelGateway, PenSample, PenState};
use crate::render::surface::RenderSurface;
use crate::session::config::Configuration;

/// Controller lifecycle phase. Exactly one is active at a time.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    /// No session is drawing.
    Idle,
    /// A model load is in flight; the session starts when it completes.
    Loading,
    /// Ticks advance the drawing.
    Running,
    /// Ticks are ignored until resumed.
    Paused,
    /// The drawing ended (pen-end or step cap).
    Finished,
}

impl Phase {
    /// Status label.
    pub fn label(self) -> &'static str {
        match self {
            Self::Idle => "Idle",
            Self::Loading => "Loading model...",
            Self::Running => "Drawing...",
            Self::Paused => "Paused",
            Self::Finished => "Finished",
        }
    }

    /// `Running` or `Paused`.
    pub fn is_drawing(self) -> bool {
        matches!(self, Self::Running | Self::Paused)
    }
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Identity of a drawing session. Bumped on start, clear, model switch, and load completion.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SessionToken(pub u64);

impl SessionToken {
    pub(crate) fn next(self) -> Self {
        Self(self.0.wrapping_add(1))
    }
}

/// Identity of one model load request.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LoadTicket(pub u64);

impl LoadTicket {
    pub(crate) fn next(self) -> Self {
        Self(self.0.wrapping_add(1))
    }
}

/// Why a session stopped drawing.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FinishReason {
    /// The model sampled a pen-end flag.
    PenEnd,
    /// The session hit `max_steps` without a pen-end.
    SequenceLengthExceeded,
}

/// Per-session drawing state. Owned by the controller; recreated for every session.
#[derive(Clone, Debug)]
pub struct DrawingState<St> {
    /// Current pen position in surface pixels.
    pub position: Point,
    /// Pen state sampled on the previous step. Decides whether the next step draws.
    pub previous_pen: PenState,
    /// Scaled sample fed to the model on the next step.
    pub last_input: PenSample,
    /// Opaque recurrent state.
    pub hidden: St,
    /// Segments actually drawn.
    pub stroke_count: u64,
    /// Samples taken.
    pub steps: u64,
    /// Color used for the latest drawn segment.
    pub color: Rgba8,
}

impl<St> DrawingState<St> {
    /// Zeroed pose at `origin` with the pen down, fed the model's zero input and zero state.
    pub fn reset<G>(gateway: &mut G, origin: Point, color: Rgba8) -> Self
    where
        G: ModelGateway<State = St>,
    {
        Self {
            position: origin,
            previous_pen: PenState::Down,
            last_input: gateway.zero_input(),
            hidden: gateway.zero_state(),
            stroke_count: 0,
            steps: 0,
            color,
        }
    }
}

/// Result of one [`advance`] call.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum StepOutcome {
    /// A sample was taken; `drew` tells whether a visible segment was rendered.
    Advanced {
        /// Whether a segment was drawn.
        drew: bool,
        /// The pen state just sampled.
        pen: PenState,
    },
    /// The session is over; no gateway call was made.
    Finished(FinishReason),
}

/// One animation step over an owned drawing state and a read-only configuration.
///
/// Termination is checked first: if the previous sample was a pen-end, or `max_steps` samples
/// were already taken, nothing is sampled or drawn. Otherwise the model is advanced with the
/// previous sample, a new sample is drawn at `config.temperature` and scaled by
/// `config.scale_factor`, and a segment is rendered iff the *previous* pen state was down. The
/// scaled sample is what the model sees on the next step.
pub fn advance<G, S>(
    drawing: &mut DrawingState<G::State>,
    gateway: &mut G,
    config: &Configuration,
    surface: &mut S,
    rng: &mut Rng64,
) -> StepOutcome
where
    G: ModelGateway,
    S: RenderSurface + ?Sized,
{
    if drawing.previous_pen == PenState::End {
        return StepOutcome::Finished(FinishReason::PenEnd);
    }
    if drawing.steps >= config.max_steps {
        return StepOutcome::Finished(FinishReason::SequenceLengthExceeded);
    }

    drawing.hidden = gateway.update(&drawing.last_input, &drawing.hidden);
    let pdf = gateway.pdf(&drawing.hidden, config.temperature);
    let sample = gateway.sample(&pdf);

    let sample = sample.scaled(config.scale_factor);
    let next = drawing.position + sample.offset();

    let drew = drawing.previous_pen == PenState::Down;
    if drew {
        if config.random_colors {
            drawing.color = rng.pick(&PALETTE).copied().unwrap_or(config.color);
        } else {
            drawing.color = config.color;
        }
        surface.draw_line(drawing.position, next, drawing.color, config.stroke_width);
        drawing.stroke_count += 1;
    }

    drawing.position = next;
    drawing.previous_pen = sample.pen;
    drawing.last_input = sample;
    drawing.steps += 1;

    StepOutcome::Advanced {
        drew,
        pen: sample.pen,
    }
}

#[cfg(test)]
#[path = "../../tests/unit/session/state.rs"]
mod tests;
