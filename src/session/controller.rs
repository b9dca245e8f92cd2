use std::path::{Path, PathBuf};
use std::time::Instant;

use crate::foundation::core::Rng64;
use crate::foundation::error::{SketchError, SketchResult};
use crate::model::gateway::{ModelGateway, ModelLoader, validate_model_id};
use crate::render::surface::{RenderSurface, draw_origin_marker};
use crate::session::config::Configuration;
use crate::session::state::{
    DrawingState, FinishReason, LoadTicket, Phase, SessionToken, StepOutcome, advance,
};
use crate::session::status::{StatusSink, StatusUpdate, TracingStatusSink};

/// What a call to [`AnimationController::tick`] did.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TickOutcome {
    /// Not running; nothing happened.
    Skipped,
    /// The tick belonged to a superseded session; nothing happened.
    Stale,
    /// A sample was taken and a segment drawn.
    Drew,
    /// A sample was taken with the pen lifted.
    Moved,
    /// The session just transitioned to `Finished`.
    Finished(FinishReason),
}

/// What a load poll or readiness callback did.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoadPoll {
    /// No load is in flight.
    NotLoading,
    /// Still loading.
    Pending,
    /// The load completed and a new session is running.
    Ready(SessionToken),
    /// The callback referred to a superseded load request; nothing happened.
    Stale,
}

struct ActiveModel<G> {
    id: String,
    gateway: G,
}

struct PendingLoad<G> {
    ticket: LoadTicket,
    model_id: String,
    gateway: G,
    started: Instant,
}

/// Drives one model and one surface through the drawing lifecycle.
///
/// Every operation takes the current [`Configuration`] by shared reference; the controller
/// never mutates it. Supersession is tracked with two monotonic tokens: a [`SessionToken`]
/// checked by ticks and a [`LoadTicket`] checked by readiness callbacks. Stale events are
/// discarded without observable effect.
pub struct AnimationController<L, S>
where
    L: ModelLoader,
    S: RenderSurface,
{
    loader: L,
    surface: S,
    sink: Box<dyn StatusSink>,
    rng: Rng64,

    phase: Phase,
    session: SessionToken,
    ticket: LoadTicket,
    model: Option<ActiveModel<L::Gateway>>,
    pending: Option<PendingLoad<L::Gateway>>,
    drawing: Option<DrawingState<<L::Gateway as ModelGateway>::State>>,
    notice: Option<String>,
    finish_reason: Option<FinishReason>,
}

impl<L, S> AnimationController<L, S>
where
    L: ModelLoader,
    S: RenderSurface,
{
    /// Idle controller with no model, publishing status through `tracing`.
    pub fn new(loader: L, surface: S) -> Self {
        Self {
            loader,
            surface,
            sink: Box::new(TracingStatusSink),
            rng: Rng64::from_time(),
            phase: Phase::Idle,
            session: SessionToken::default(),
            ticket: LoadTicket::default(),
            model: None,
            pending: None,
            drawing: None,
            notice: None,
            finish_reason: None,
        }
    }

    /// Replace the status sink.
    pub fn with_status_sink(mut self, sink: impl StatusSink + 'static) -> Self {
        self.sink = Box::new(sink);
        self
    }

    /// Seed the generator used for random segment colors.
    pub fn with_rng(mut self, rng: Rng64) -> Self {
        self.rng = rng;
        self
    }

    /// Current phase.
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Current session identity.
    pub fn session(&self) -> SessionToken {
        self.session
    }

    /// Ticket of the load in flight, if any.
    pub fn pending_ticket(&self) -> Option<LoadTicket> {
        self.pending.as_ref().map(|p| p.ticket)
    }

    /// Id of the loaded model, or of the one being loaded.
    pub fn model_id(&self) -> Option<&str> {
        self.pending
            .as_ref()
            .map(|p| p.model_id.as_str())
            .or_else(|| self.model.as_ref().map(|m| m.id.as_str()))
    }

    /// The ready gateway, if a model is loaded.
    pub fn gateway(&self) -> Option<&L::Gateway> {
        self.model.as_ref().map(|m| &m.gateway)
    }

    /// Per-session drawing state, if a session exists.
    pub fn drawing(&self) -> Option<&DrawingState<<L::Gateway as ModelGateway>::State>> {
        self.drawing.as_ref()
    }

    /// Segments drawn in the current session.
    pub fn stroke_count(&self) -> u64 {
        self.drawing.as_ref().map_or(0, |d| d.stroke_count)
    }

    /// Why the latest session finished, while in `Finished`.
    pub fn finish_reason(&self) -> Option<FinishReason> {
        self.finish_reason
    }

    /// Latest user-facing notice.
    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    /// The render surface.
    pub fn surface(&self) -> &S {
        &self.surface
    }

    /// The render surface, mutably.
    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    /// The model loader.
    pub fn loader(&self) -> &L {
        &self.loader
    }

    /// Snapshot of the observable status.
    pub fn status(&self) -> StatusUpdate {
        StatusUpdate {
            phase: self.phase,
            model_id: self.model_id().map(str::to_owned),
            stroke_count: self.stroke_count(),
            notice: self.notice.clone(),
        }
    }

    /// Start a new drawing session.
    ///
    /// With a ready model the session starts immediately (`Running`). Without any model a load
    /// of `config.model_id` begins (`Loading`) and the session starts once it completes. While a
    /// load is already in flight the request is refused with [`SketchError::ModelNotReady`] and
    /// nothing changes.
    pub fn start(&mut self, config: &Configuration) -> SketchResult<Phase> {
        if let Some(p) = &self.pending {
            tracing::warn!(model = %p.model_id, "start refused: model still loading");
            return Err(SketchError::model_not_ready(p.model_id.clone()));
        }
        if self.model.is_some() {
            self.begin_session(config);
            return Ok(self.phase);
        }
        self.switch_model(&config.model_id, config)?;
        Ok(self.phase)
    }

    /// Flip between `Running` and `Paused`. Other phases are left alone.
    pub fn toggle_pause(&mut self) -> Phase {
        let next = match self.phase {
            Phase::Running => Phase::Paused,
            Phase::Paused => Phase::Running,
            other => return other,
        };
        tracing::info!(from = %self.phase, to = %next, "pause toggled");
        self.phase = next;
        self.publish();
        self.phase
    }

    /// End the current session and wipe the surface (re-marking the origin if configured).
    ///
    /// An in-flight load is kept: the surface is wiped but the phase stays `Loading`.
    pub fn clear(&mut self, config: &Configuration) -> Phase {
        self.wipe_surface(config);
        if self.phase == Phase::Loading {
            return self.phase;
        }
        self.session = self.session.next();
        self.drawing = None;
        self.finish_reason = None;
        self.notice = None;
        if self.phase != Phase::Idle {
            tracing::info!(from = %self.phase, "cleared");
        }
        self.phase = Phase::Idle;
        self.publish();
        self.phase
    }

    /// Discard the current model and session and begin loading `model_id`.
    ///
    /// Any earlier load request is superseded: its gateway is dropped and its ticket no longer
    /// matches, so a late readiness callback for it is ignored.
    pub fn switch_model(
        &mut self,
        model_id: &str,
        config: &Configuration,
    ) -> SketchResult<LoadTicket> {
        validate_model_id(model_id)?;

        self.model = None;
        self.pending = None;
        self.drawing = None;
        self.finish_reason = None;
        self.notice = None;
        self.session = self.session.next();
        self.ticket = self.ticket.next();
        self.surface.clear(config.background);

        match self.loader.begin(model_id) {
            Ok(gateway) => {
                tracing::info!(model = %model_id, ticket = self.ticket.0, "loading model");
                self.pending = Some(PendingLoad {
                    ticket: self.ticket,
                    model_id: model_id.to_owned(),
                    gateway,
                    started: Instant::now(),
                });
                self.phase = Phase::Loading;
                self.publish();
                Ok(self.ticket)
            }
            Err(e) => {
                tracing::warn!(model = %model_id, error = %e, "model load could not start");
                self.phase = Phase::Idle;
                self.notice = Some(e.to_string());
                self.publish();
                Err(e)
            }
        }
    }

    /// Poll the in-flight load, completing it, failing it, or timing it out.
    ///
    /// On timeout or failure the load is dropped, the phase becomes `Idle`, and the error is
    /// returned after the status has been published.
    pub fn poll_load(&mut self, now: Instant, config: &Configuration) -> SketchResult<LoadPoll> {
        let Some(p) = &self.pending else {
            return Ok(LoadPoll::NotLoading);
        };
        if p.gateway.is_loaded() {
            let ticket = p.ticket;
            return Ok(self.on_model_ready(ticket, config));
        }

        let err = if let Some(reason) = p.gateway.load_failure() {
            SketchError::load_failed(p.model_id.clone(), reason)
        } else {
            let waited = now.saturating_duration_since(p.started);
            if waited < config.load.timeout() {
                return Ok(LoadPoll::Pending);
            }
            SketchError::LoadTimeout {
                model_id: p.model_id.clone(),
                waited,
            }
        };

        tracing::warn!(error = %err, "model load abandoned");
        self.pending = None;
        self.phase = Phase::Idle;
        self.notice = Some(err.to_string());
        self.publish();
        Err(err)
    }

    /// Readiness callback for load request `ticket`.
    ///
    /// Ignored (returns [`LoadPoll::Stale`]) unless `ticket` is the load currently in flight.
    /// Otherwise the model is initialized and a fresh session starts synchronously, so the next
    /// tick always sees a fully reset drawing state.
    pub fn on_model_ready(&mut self, ticket: LoadTicket, config: &Configuration) -> LoadPoll {
        match &self.pending {
            Some(p) if p.ticket == ticket => {
                if !p.gateway.is_loaded() {
                    return LoadPoll::Pending;
                }
            }
            _ => {
                tracing::debug!(ticket = ticket.0, "ignoring stale readiness callback");
                return LoadPoll::Stale;
            }
        }
        let Some(p) = self.pending.take() else {
            return LoadPoll::Stale;
        };

        let mut gateway = p.gateway;
        gateway.set_scale_factor(config.load.pixel_factor);
        tracing::info!(
            model = %p.model_id,
            elapsed_ms = p.started.elapsed().as_millis() as u64,
            "model ready"
        );
        self.model = Some(ActiveModel {
            id: p.model_id,
            gateway,
        });
        self.begin_session(config);
        LoadPoll::Ready(self.session)
    }

    /// Advance the current session by one step.
    pub fn tick(&mut self, config: &Configuration) -> TickOutcome {
        self.tick_for(self.session, config)
    }

    /// Advance session `session` by one step; ticks for any other session are stale.
    pub fn tick_for(&mut self, session: SessionToken, config: &Configuration) -> TickOutcome {
        if session != self.session {
            return TickOutcome::Stale;
        }
        if self.phase != Phase::Running {
            return TickOutcome::Skipped;
        }
        let (Some(drawing), Some(model)) = (self.drawing.as_mut(), self.model.as_mut()) else {
            return TickOutcome::Skipped;
        };

        match advance(
            drawing,
            &mut model.gateway,
            config,
            &mut self.surface,
            &mut self.rng,
        ) {
            StepOutcome::Advanced { drew, pen } => {
                tracing::debug!(drew, ?pen, strokes = drawing.stroke_count, "tick");
                self.publish();
                if drew {
                    TickOutcome::Drew
                } else {
                    TickOutcome::Moved
                }
            }
            StepOutcome::Finished(reason) => {
                if reason == FinishReason::SequenceLengthExceeded {
                    let err = SketchError::SequenceLengthExceeded {
                        limit: config.max_steps,
                    };
                    tracing::warn!(error = %err, "drawing stopped");
                    self.notice = Some(err.to_string());
                }
                tracing::info!(
                    ?reason,
                    strokes = drawing.stroke_count,
                    steps = drawing.steps,
                    "drawing finished"
                );
                self.phase = Phase::Finished;
                self.finish_reason = Some(reason);
                self.publish();
                TickOutcome::Finished(reason)
            }
        }
    }

    /// Wipe the surface to the background and re-mark the origin if configured.
    ///
    /// Does not touch the phase or the drawing state.
    pub fn wipe_surface(&mut self, config: &Configuration) {
        self.surface.clear(config.background);
        if config.show_origin {
            self.mark_origin();
        }
    }

    /// Draw the origin marker on top of the current content.
    pub fn mark_origin(&mut self) {
        let origin = self.surface.size().origin();
        draw_origin_marker(&mut self.surface, origin);
    }

    /// Export the current surface content to `path`.
    pub fn export(&mut self, path: &Path) -> SketchResult<PathBuf> {
        self.surface.export_image(path)
    }

    fn begin_session(&mut self, config: &Configuration) {
        let Some(model) = self.model.as_mut() else {
            return;
        };
        self.session = self.session.next();
        self.surface.clear(config.background);
        let origin = self.surface.size().origin();
        if config.show_origin {
            draw_origin_marker(&mut self.surface, origin);
        }
        self.drawing = Some(DrawingState::reset(&mut model.gateway, origin, config.color));
        self.finish_reason = None;
        self.notice = None;
        tracing::info!(model = %model.id, session = self.session.0, "drawing started");
        self.phase = Phase::Running;
        self.publish();
    }

    fn publish(&mut self) {
        let update = self.status();
        self.sink.publish(&update);
    }
}

#[cfg(test)]
#[path = "../../tests/unit/session/controller.rs"]
mod tests;
