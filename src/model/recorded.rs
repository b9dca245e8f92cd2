use std::path::{Path, PathBuf};
use std::sync::{Arc, OnceLock};

use serde::{Deserialize, Serialize};

use crate::foundation::error::{SketchError, SketchResult};
use crate::model::gateway::{ModelGateway, ModelLoader, PenSample, PenState, validate_model_id};

/// A set of stroke-3 drawings: each step is `[dx, dy, p]` where `p == 1` lifts the pen after
/// the step.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Recording {
    /// Id the recording was made for.
    pub model_id: String,
    /// Drawings in stroke-3 form.
    pub drawings: Vec<Vec<[f64; 3]>>,
}

impl Recording {
    /// Parse and validate a recording from JSON text.
    pub fn from_json(text: &str) -> SketchResult<Self> {
        let rec: Recording =
            serde_json::from_str(text).map_err(|e| SketchError::serde(e.to_string()))?;
        rec.validate()?;
        Ok(rec)
    }

    /// At least one non-empty drawing, finite offsets, and `p` in `{0, 1}`.
    pub fn validate(&self) -> SketchResult<()> {
        validate_model_id(&self.model_id)?;
        if self.drawings.is_empty() {
            return Err(SketchError::validation("recording has no drawings"));
        }
        for (i, d) in self.drawings.iter().enumerate() {
            if d.is_empty() {
                return Err(SketchError::validation(format!("drawing {i} is empty")));
            }
            for [dx, dy, p] in d {
                if !dx.is_finite() || !dy.is_finite() {
                    return Err(SketchError::validation(format!(
                        "drawing {i} has a non-finite offset"
                    )));
                }
                if *p != 0.0 && *p != 1.0 {
                    return Err(SketchError::validation(format!(
                        "drawing {i} has pen value {p}, expected 0 or 1"
                    )));
                }
            }
        }
        Ok(())
    }

    /// Step `index` of drawing `drawing` as a stroke-5 sample, or `End` past the last step.
    fn step(&self, drawing: usize, index: usize) -> PenSample {
        let Some(d) = self.drawings.get(drawing) else {
            return PenSample::new(0.0, 0.0, PenState::End);
        };
        match d.get(index) {
            None => PenSample::new(0.0, 0.0, PenState::End),
            Some(&[dx, dy, p]) => {
                let pen = if index + 1 == d.len() {
                    PenState::End
                } else if p == 1.0 {
                    PenState::Up
                } else {
                    PenState::Down
                };
                PenSample::new(dx, dy, pen)
            }
        }
    }
}

type LoadSlot = Arc<OnceLock<Result<Arc<Recording>, String>>>;

/// Cursor into a recording.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RecordedCursor {
    drawing: usize,
    consumed: usize,
}

/// Gateway that plays back recorded drawings in place of a neural model.
///
/// Each new session (`zero_state`) moves on to the next drawing. Output offsets are divided by
/// the pixel factor set at readiness. Temperature is accepted and ignored.
#[derive(Clone, Debug)]
pub struct RecordedModel {
    model_id: String,
    slot: LoadSlot,
    pixel_factor: f64,
    next_drawing: usize,
}

impl RecordedModel {
    /// Gateway over an already-parsed recording.
    pub fn from_recording(recording: Recording) -> Self {
        let slot: LoadSlot = Arc::new(OnceLock::new());
        let model_id = recording.model_id.clone();
        let _ = slot.set(Ok(Arc::new(recording)));
        Self {
            model_id,
            slot,
            pixel_factor: 1.0,
            next_drawing: 0,
        }
    }

    /// Id this gateway was created for.
    pub fn model_id(&self) -> &str {
        &self.model_id
    }

    fn recording(&self) -> Option<&Arc<Recording>> {
        self.slot.get().and_then(|r| r.as_ref().ok())
    }
}

impl ModelGateway for RecordedModel {
    type State = RecordedCursor;
    type Distribution = PenSample;

    fn is_loaded(&self) -> bool {
        self.recording().is_some()
    }

    fn load_failure(&self) -> Option<String> {
        self.slot.get().and_then(|r| r.as_ref().err().cloned())
    }

    fn set_scale_factor(&mut self, factor: f64) {
        self.pixel_factor = factor;
    }

    fn zero_state(&mut self) -> RecordedCursor {
        let count = self.recording().map_or(1, |r| r.drawings.len().max(1));
        let drawing = self.next_drawing % count;
        self.next_drawing = (drawing + 1) % count;
        RecordedCursor {
            drawing,
            consumed: 0,
        }
    }

    fn zero_input(&self) -> PenSample {
        PenSample::new(0.0, 0.0, PenState::Down)
    }

    fn update(&mut self, _input: &PenSample, state: &RecordedCursor) -> RecordedCursor {
        RecordedCursor {
            drawing: state.drawing,
            consumed: state.consumed + 1,
        }
    }

    fn pdf(&self, state: &RecordedCursor, _temperature: f64) -> PenSample {
        match self.recording() {
            Some(rec) => rec.step(state.drawing, state.consumed.saturating_sub(1)),
            None => PenSample::new(0.0, 0.0, PenState::End),
        }
    }

    fn sample(&mut self, pdf: &PenSample) -> PenSample {
        if self.pixel_factor > 0.0 {
            pdf.scaled(1.0 / self.pixel_factor)
        } else {
            *pdf
        }
    }
}

/// Loads `<root>/<model_id>.json` recordings on a background thread.
#[derive(Clone, Debug)]
pub struct RecordedLoader {
    root: PathBuf,
}

impl RecordedLoader {
    /// Loader reading recordings from `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Directory recordings are read from.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path a model id resolves to.
    pub fn path_for(&self, model_id: &str) -> PathBuf {
        self.root.join(format!("{model_id}.json"))
    }

    /// Ids of all `*.json` recordings in the root directory, sorted.
    pub fn available(&self) -> SketchResult<Vec<String>> {
        let entries = std::fs::read_dir(&self.root).map_err(|e| {
            SketchError::validation(format!(
                "failed to list models in '{}': {e}",
                self.root.display()
            ))
        })?;
        let mut ids: Vec<String> = entries
            .filter_map(|e| e.ok())
            .map(|e| e.path())
            .filter(|p| p.extension().is_some_and(|ext| ext == "json"))
            .filter_map(|p| p.file_stem().and_then(|s| s.to_str()).map(str::to_owned))
            .filter(|id| validate_model_id(id).is_ok())
            .collect();
        ids.sort();
        Ok(ids)
    }
}

fn read_recording(path: &Path, model_id: &str) -> Result<Arc<Recording>, String> {
    let text = std::fs::read_to_string(path)
        .map_err(|e| format!("failed to read '{}': {e}", path.display()))?;
    let rec = Recording::from_json(&text).map_err(|e| e.to_string())?;
    if rec.model_id != model_id {
        return Err(format!(
            "'{}' holds model '{}', expected '{model_id}'",
            path.display(),
            rec.model_id
        ));
    }
    Ok(Arc::new(rec))
}

impl ModelLoader for RecordedLoader {
    type Gateway = RecordedModel;

    #[tracing::instrument(skip(self))]
    fn begin(&mut self, model_id: &str) -> SketchResult<RecordedModel> {
        validate_model_id(model_id)?;
        let path = self.path_for(model_id);
        let slot: LoadSlot = Arc::new(OnceLock::new());

        let worker_slot = Arc::clone(&slot);
        let worker_id = model_id.to_owned();
        std::thread::Builder::new()
            .name(format!("load-{model_id}"))
            .spawn(move || {
                let result = read_recording(&path, &worker_id);
                if let Err(e) = &result {
                    tracing::debug!(model = %worker_id, error = %e, "recording load failed");
                }
                let _ = worker_slot.set(result);
            })
            .map_err(|e| SketchError::Other(anyhow::Error::new(e).context("spawn load thread")))?;

        Ok(RecordedModel {
            model_id: model_id.to_owned(),
            slot,
            pixel_factor: 1.0,
            next_drawing: 0,
        })
    }

    fn loadable(&self) -> Option<Vec<String>> {
        match self.available() {
            Ok(ids) => Some(ids),
            Err(e) => {
                tracing::debug!(error = %e, "recording directory not listable");
                None
            }
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/model/recorded.rs"]
mod tests;
