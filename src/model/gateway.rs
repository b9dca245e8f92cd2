use crate::foundation::core::Vec2;
use crate::foundation::error::{SketchError, SketchResult};
use serde::{Deserialize, Serialize};

/// One-hot pen state carried by every sample.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PenState {
    /// The segment towards the next sample is visible.
    Down,
    /// The pen is lifted before the next sample.
    Up,
    /// The drawing is complete.
    End,
}

impl PenState {
    /// `(down, up, end)` flag form.
    pub fn flags(self) -> (bool, bool, bool) {
        match self {
            Self::Down => (true, false, false),
            Self::Up => (false, true, false),
            Self::End => (false, false, true),
        }
    }
}

/// One step of model output: a 2D offset plus the pen state after moving.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PenSample {
    /// Horizontal offset.
    pub dx: f64,
    /// Vertical offset.
    pub dy: f64,
    /// Pen state.
    pub pen: PenState,
}

impl PenSample {
    /// Build a sample from an offset and a pen state.
    pub fn new(dx: f64, dy: f64, pen: PenState) -> Self {
        Self { dx, dy, pen }
    }

    /// Build a sample from the stroke-5 flag form, rejecting anything but exactly one set flag.
    pub fn from_flags(dx: f64, dy: f64, down: bool, up: bool, end: bool) -> SketchResult<Self> {
        let pen = match (down, up, end) {
            (true, false, false) => PenState::Down,
            (false, true, false) => PenState::Up,
            (false, false, true) => PenState::End,
            _ => {
                return Err(SketchError::validation(format!(
                    "pen flags must be one-hot, got down={down} up={up} end={end}"
                )));
            }
        };
        Ok(Self { dx, dy, pen })
    }

    /// `(down, up, end)` flag form.
    pub fn flags(self) -> (bool, bool, bool) {
        self.pen.flags()
    }

    /// The offset as a vector.
    pub fn offset(self) -> Vec2 {
        Vec2::new(self.dx, self.dy)
    }

    /// Same pen state with the offset multiplied by `factor`.
    pub fn scaled(self, factor: f64) -> Self {
        Self {
            dx: self.dx * factor,
            dy: self.dy * factor,
            pen: self.pen,
        }
    }
}

/// Capability contract of a loaded (or loading) sequence model.
///
/// The controller never inspects `State` or `Distribution`; they are passed back into the
/// gateway verbatim. All calls are synchronous and expected to fit in a tick budget.
pub trait ModelGateway {
    /// Opaque recurrent state.
    type State;
    /// Opaque distribution over the next sample.
    type Distribution;

    /// Whether the model finished loading and can be driven.
    fn is_loaded(&self) -> bool;

    /// Reason the load can never complete, if the gateway can tell.
    fn load_failure(&self) -> Option<String> {
        None
    }

    /// Set the fixed rendering-pixel scale. Called once when the model becomes ready.
    fn set_scale_factor(&mut self, factor: f64);

    /// Fresh recurrent state for a new drawing.
    fn zero_state(&mut self) -> Self::State;

    /// Input fed on the first step of a drawing.
    fn zero_input(&self) -> PenSample;

    /// Advance the recurrent state by one input.
    fn update(&mut self, input: &PenSample, state: &Self::State) -> Self::State;

    /// Distribution over the next sample; `temperature` is passed through untouched.
    fn pdf(&self, state: &Self::State, temperature: f64) -> Self::Distribution;

    /// Draw one sample from `pdf`.
    fn sample(&mut self, pdf: &Self::Distribution) -> PenSample;
}

/// Starts asynchronous model loads.
///
/// `begin` must not block on the load itself; the returned gateway is polled through
/// [`ModelGateway::is_loaded`] until ready.
pub trait ModelLoader {
    /// Gateway type produced by this loader.
    type Gateway: ModelGateway;

    /// Begin loading `model_id`.
    fn begin(&mut self, model_id: &str) -> SketchResult<Self::Gateway>;

    /// Ids this loader can serve, when it knows them up front. `None` means any id may work.
    fn loadable(&self) -> Option<Vec<String>> {
        None
    }
}

/// Reject model ids that are empty or contain anything but `[a-z0-9_-]`.
pub fn validate_model_id(model_id: &str) -> SketchResult<()> {
    if model_id.is_empty() {
        return Err(SketchError::validation("model id must not be empty"));
    }
    let ok = model_id
        .bytes()
        .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || b == b'_' || b == b'-');
    if !ok {
        return Err(SketchError::validation(format!(
            "model id '{model_id}' may only contain [a-z0-9_-]"
        )));
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/model/gateway.rs"]
mod tests;
