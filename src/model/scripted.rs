use std::cell::Cell;
use std::collections::BTreeMap;

use crate::foundation::error::{SketchError, SketchResult};
use crate::model::gateway::{
    ModelGateway, ModelLoader, PenSample, PenState, validate_model_id,
};

/// When a [`ScriptedModel`] reports itself loaded.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Readiness {
    /// Loaded on the first poll.
    Immediate,
    /// `is_loaded` returns `false` this many times, then `true`.
    AfterPolls(u32),
    /// Never loads.
    Never,
    /// Reports a load failure on every poll.
    Fails,
}

/// Gateway call counters, for asserting on how the controller drove the model.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct GatewayCalls {
    /// `update` calls.
    pub update: usize,
    /// `pdf` calls.
    pub pdf: usize,
    /// `sample` calls.
    pub sample: usize,
    /// `zero_state` calls.
    pub zero_state: usize,
}

/// Deterministic gateway that replays a fixed list of samples.
///
/// Once the script is exhausted it yields `End` at the origin, or loops back to the first
/// sample when [`ScriptedModel::looping`] is set. Intended for tests and demos.
#[derive(Clone, Debug)]
pub struct ScriptedModel {
    steps: Vec<PenSample>,
    zero_input: PenSample,
    looping: bool,
    readiness: Readiness,
    polls: Cell<u32>,
    scale_factor: Option<f64>,
    last_temperature: Cell<Option<f64>>,
    inputs: Vec<PenSample>,
    calls: Cell<GatewayCalls>,
}

impl ScriptedModel {
    /// Script that replays `steps` and is ready immediately.
    pub fn new(steps: Vec<PenSample>) -> Self {
        Self {
            steps,
            zero_input: PenSample::new(0.0, 0.0, PenState::Down),
            looping: false,
            readiness: Readiness::Immediate,
            polls: Cell::new(0),
            scale_factor: None,
            last_temperature: Cell::new(None),
            inputs: Vec::new(),
            calls: Cell::new(GatewayCalls::default()),
        }
    }

    /// `n` pen-down samples of offset `(dx, dy)` followed by a single pen-end sample.
    pub fn pen_down_then_end(n: usize, dx: f64, dy: f64) -> Self {
        let mut steps = vec![PenSample::new(dx, dy, PenState::Down); n];
        steps.push(PenSample::new(dx, dy, PenState::End));
        Self::new(steps)
    }

    /// Replay the script forever instead of ending after it.
    pub fn looping(mut self) -> Self {
        self.looping = true;
        self
    }

    /// Override the readiness behavior.
    pub fn with_readiness(mut self, readiness: Readiness) -> Self {
        self.readiness = readiness;
        self
    }

    /// Override the first-step input.
    pub fn with_zero_input(mut self, zero_input: PenSample) -> Self {
        self.zero_input = zero_input;
        self
    }

    /// Counters of gateway calls so far.
    pub fn calls(&self) -> GatewayCalls {
        self.calls.get()
    }

    /// Inputs passed to `update`, in order.
    pub fn inputs(&self) -> &[PenSample] {
        &self.inputs
    }

    /// Temperature seen by the latest `pdf` call.
    pub fn last_temperature(&self) -> Option<f64> {
        self.last_temperature.get()
    }

    /// Value passed to `set_scale_factor`, if it was called.
    pub fn scale_factor(&self) -> Option<f64> {
        self.scale_factor
    }

    fn bump(&self, f: impl FnOnce(&mut GatewayCalls)) {
        let mut c = self.calls.get();
        f(&mut c);
        self.calls.set(c);
    }
}

impl ModelGateway for ScriptedModel {
    /// Number of inputs consumed in the current drawing.
    type State = usize;
    type Distribution = PenSample;

    fn is_loaded(&self) -> bool {
        match self.readiness {
            Readiness::Immediate => true,
            Readiness::Never | Readiness::Fails => false,
            Readiness::AfterPolls(n) => {
                let seen = self.polls.get();
                if seen >= n {
                    true
                } else {
                    self.polls.set(seen + 1);
                    false
                }
            }
        }
    }

    fn load_failure(&self) -> Option<String> {
        (self.readiness == Readiness::Fails).then(|| "scripted failure".to_owned())
    }

    fn set_scale_factor(&mut self, factor: f64) {
        self.scale_factor = Some(factor);
    }

    fn zero_state(&mut self) -> usize {
        self.bump(|c| c.zero_state += 1);
        0
    }

    fn zero_input(&self) -> PenSample {
        self.zero_input
    }

    fn update(&mut self, input: &PenSample, state: &usize) -> usize {
        self.bump(|c| c.update += 1);
        self.inputs.push(*input);
        state + 1
    }

    fn pdf(&self, state: &usize, temperature: f64) -> PenSample {
        self.bump(|c| c.pdf += 1);
        self.last_temperature.set(Some(temperature));
        let i = state.saturating_sub(1);
        let step = if self.looping && !self.steps.is_empty() {
            self.steps.get(i % self.steps.len())
        } else {
            self.steps.get(i)
        };
        step.copied()
            .unwrap_or(PenSample::new(0.0, 0.0, PenState::End))
    }

    fn sample(&mut self, pdf: &PenSample) -> PenSample {
        self.bump(|c| c.sample += 1);
        *pdf
    }
}

/// Loader handing out clones of registered [`ScriptedModel`]s.
#[derive(Clone, Debug, Default)]
pub struct ScriptedLoader {
    models: BTreeMap<String, ScriptedModel>,
    begun: Vec<String>,
}

impl ScriptedLoader {
    /// Empty loader; every `begin` fails until models are registered.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `model` under `model_id`.
    pub fn with_model(mut self, model_id: impl Into<String>, model: ScriptedModel) -> Self {
        self.models.insert(model_id.into(), model);
        self
    }

    /// Model ids passed to `begin`, in order.
    pub fn begun(&self) -> &[String] {
        &self.begun
    }
}

impl ModelLoader for ScriptedLoader {
    type Gateway = ScriptedModel;

    fn begin(&mut self, model_id: &str) -> SketchResult<ScriptedModel> {
        self.begun.push(model_id.to_owned());
        self.models
            .get(model_id)
            .cloned()
            .ok_or_else(|| SketchError::validation(format!("no scripted model '{model_id}'")))
    }

    fn loadable(&self) -> Option<Vec<String>> {
        Some(
            self.models
                .keys()
                .filter(|id| validate_model_id(id).is_ok())
                .cloned()
                .collect(),
        )
    }
}

#[cfg(test)]
#[path = "../../tests/unit/model/scripted.rs"]
mod tests;
