use std::sync::{Arc, Mutex};

use serde::Serialize;

use crate::session::state::Phase;

/// Observable controller status, published after every advancing tick and phase transition.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct StatusUpdate {
    /// Current phase.
    pub phase: Phase,
    /// Model the session belongs to, if one was selected.
    pub model_id: Option<String>,
    /// Segments drawn in the current session.
    pub stroke_count: u64,
    /// User-facing notice (refusals, timeouts, step cap).
    pub notice: Option<String>,
}

/// Consumer of status updates (a status bar, a log, a test probe).
pub trait StatusSink {
    /// Receive one update.
    fn publish(&mut self, update: &StatusUpdate);
}

/// Emits every update as a structured `tracing` event.
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingStatusSink;

impl StatusSink for TracingStatusSink {
    fn publish(&mut self, update: &StatusUpdate) {
        tracing::debug!(
            phase = %update.phase,
            model = update.model_id.as_deref().unwrap_or("-"),
            strokes = update.stroke_count,
            notice = update.notice.as_deref().unwrap_or(""),
            "status"
        );
    }
}

/// Shared in-memory log of updates. Clones share the same buffer.
#[derive(Clone, Debug, Default)]
pub struct StatusLog {
    updates: Arc<Mutex<Vec<StatusUpdate>>>,
}

impl StatusLog {
    /// Empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of all updates so far.
    pub fn updates(&self) -> Vec<StatusUpdate> {
        self.updates
            .lock()
            .map(|v| v.clone())
            .unwrap_or_else(|poisoned| poisoned.into_inner().clone())
    }

    /// Most recent update.
    pub fn last(&self) -> Option<StatusUpdate> {
        self.updates().pop()
    }

    /// Number of updates so far.
    pub fn len(&self) -> usize {
        self.updates().len()
    }

    /// `true` when nothing was published yet.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Phases in publication order with consecutive duplicates collapsed.
    pub fn phase_trail(&self) -> Vec<Phase> {
        let mut trail: Vec<Phase> = Vec::new();
        for u in self.updates() {
            if trail.last() != Some(&u.phase) {
                trail.push(u.phase);
            }
        }
        trail
    }
}

impl StatusSink for StatusLog {
    fn publish(&mut self, update: &StatusUpdate) {
        let mut v = self
            .updates
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        v.push(update.clone());
    }
}
