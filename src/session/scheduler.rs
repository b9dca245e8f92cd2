use std::time::{Duration, Instant};

use crate::foundation::error::SketchResult;
use crate::model::gateway::ModelLoader;
use crate::panel::control::ControlPanel;
use crate::render::surface::RenderSurface;
use crate::session::controller::LoadPoll;
use crate::session::state::Phase;

/// How ticks are spaced in time.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Pacing {
    /// Sleep between ticks so the configured tick rate is honored.
    #[default]
    RealTime,
    /// Tick as fast as possible (headless rendering, tests).
    Unpaced,
}

/// Counters collected by [`Scheduler::run`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RunSummary {
    /// Ticks delivered while `Running`.
    pub ticks: u64,
    /// Load polls delivered while `Loading`.
    pub polls: u64,
    /// Phase when the run stopped.
    pub phase: Phase,
    /// Segments drawn in the session at that point.
    pub stroke_count: u64,
    /// Whether the deadline cut the run short.
    pub timed_out: bool,
}

/// Cooperative single-threaded driver: a fixed-rate tick timer plus a slower load-poll timer.
///
/// The tick interval is re-read from the panel's configuration before every tick, so rate
/// changes apply immediately. Loads are always polled in real time at
/// `config.load.poll_interval`, whatever the pacing.
#[derive(Clone, Copy, Debug, Default)]
pub struct Scheduler {
    pacing: Pacing,
    deadline: Option<Duration>,
}

impl Scheduler {
    /// Scheduler with the given pacing and no deadline.
    pub fn new(pacing: Pacing) -> Self {
        Self {
            pacing,
            deadline: None,
        }
    }

    /// Stop after `deadline` of wall time even if the phase has not settled.
    pub fn with_deadline(mut self, deadline: Duration) -> Self {
        self.deadline = Some(deadline);
        self
    }

    /// Pacing in use.
    pub fn pacing(&self) -> Pacing {
        self.pacing
    }

    /// Drive `panel` until its phase settles on `Idle`, `Paused` or `Finished`.
    ///
    /// Load timeouts and failures are returned as errors after the controller has returned to
    /// `Idle`.
    #[tracing::instrument(skip_all, fields(pacing = ?self.pacing))]
    pub fn run<L, S>(&self, panel: &mut ControlPanel<L, S>) -> SketchResult<RunSummary>
    where
        L: ModelLoader,
        S: RenderSurface,
    {
        let started = Instant::now();
        let mut next_tick = started;
        let mut ticks = 0u64;
        let mut polls = 0u64;
        let mut timed_out = false;

        loop {
            let now = Instant::now();
            if self.deadline.is_some_and(|d| now.duration_since(started) >= d) {
                timed_out = true;
                break;
            }

            let (controller, config) = panel.parts_mut();
            match controller.phase() {
                Phase::Loading => {
                    polls += 1;
                    if controller.poll_load(now, config)? == LoadPoll::Pending {
                        std::thread::sleep(config.load.poll_interval());
                    }
                    next_tick = Instant::now();
                }
                Phase::Running => {
                    if self.pacing == Pacing::RealTime {
                        if next_tick > now {
                            std::thread::sleep(next_tick - now);
                        }
                        next_tick = next_tick.max(now) + config.tick_interval();
                    }
                    controller.tick(config);
                    ticks += 1;
                }
                Phase::Idle | Phase::Paused | Phase::Finished => break,
            }
        }

        let summary = RunSummary {
            ticks,
            polls,
            phase: panel.phase(),
            stroke_count: panel.controller().stroke_count(),
            timed_out,
        };
        tracing::debug!(?summary, elapsed_ms = started.elapsed().as_millis() as u64, "run done");
        Ok(summary)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/session/scheduler.rs"]
mod tests;
