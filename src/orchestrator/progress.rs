//! Progress signals emitted while a service call is in flight

use std::sync::Mutex;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProgressPhase {
    Started,
    /// Heartbeat while the call is pending
    Waiting,
    Finished { success: bool },
}

/// One progress signal; `step` strictly increases within a call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProgressUpdate {
    pub step: u64,
    pub phase: ProgressPhase,
    pub elapsed: Duration,
}

/// Receives progress for a single orchestrated call
pub trait ProgressReporter: Send + Sync {
    fn report(&self, update: &ProgressUpdate);
}

/// Discards all progress
#[derive(Debug, Default, Clone, Copy)]
pub struct NoProgress;

impl ProgressReporter for NoProgress {
    fn report(&self, _update: &ProgressUpdate) {}
}

/// Keeps every update; used by tests and by callers that replay progress
#[derive(Debug, Default)]
pub struct RecordingProgress {
    updates: Mutex<Vec<ProgressUpdate>>,
}

impl RecordingProgress {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn updates(&self) -> Vec<ProgressUpdate> {
        self.updates
            .lock()
            .map(|updates| updates.clone())
            .unwrap_or_default()
    }
}

impl ProgressReporter for RecordingProgress {
    fn report(&self, update: &ProgressUpdate) {
        if let Ok(mut updates) = self.updates.lock() {
            updates.push(*update);
        }
    }
}
