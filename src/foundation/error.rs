use std::time::Duration;

/// Convenience result type used across the crate.
pub type SketchResult<T> = Result<T, SketchError>;

/// Error type for model loading, animation control, and raster export.
///
/// None of these are fatal to the process: the controller always lands in a well-defined phase
/// (usually `Idle`) before an error is returned.
#[derive(thiserror::Error, Debug)]
pub enum SketchError {
    /// A parameter, configuration value, or model id was rejected.
    #[error("validation error: {0}")]
    Validation(String),

    /// `start` was requested while the model for the session is still loading.
    #[error("model '{model_id}' is not ready yet")]
    ModelNotReady {
        /// Model whose load is still in flight.
        model_id: String,
    },

    /// Readiness polling exceeded the configured bound.
    #[error("model '{model_id}' did not load within {waited:?}")]
    LoadTimeout {
        /// Model that never became ready.
        model_id: String,
        /// How long the controller waited before giving up.
        waited: Duration,
    },

    /// The gateway reported that loading cannot complete.
    #[error("model '{model_id}' failed to load: {reason}")]
    LoadFailed {
        /// Model that failed.
        model_id: String,
        /// Gateway-provided reason.
        reason: String,
    },

    /// The session sampled more steps than the safety cap allows without an explicit pen-end.
    #[error("sequence exceeded {limit} steps without a pen-end sample")]
    SequenceLengthExceeded {
        /// Configured `max_steps`.
        limit: u64,
    },

    /// Rasterization or image export failed.
    #[error("render error: {0}")]
    Render(String),

    /// Config or recording (de)serialization failed.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Any other error.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl SketchError {
    /// Build a [`SketchError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`SketchError::Render`] value.
    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }

    /// Build a [`SketchError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }

    /// Build a [`SketchError::ModelNotReady`] value.
    pub fn model_not_ready(model_id: impl Into<String>) -> Self {
        Self::ModelNotReady {
            model_id: model_id.into(),
        }
    }

    /// Build a [`SketchError::LoadFailed`] value.
    pub fn load_failed(model_id: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::LoadFailed {
            model_id: model_id.into(),
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
