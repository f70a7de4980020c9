//! Reporting of non-fatal composition errors.

use crate::error::VoxError;
use std::sync::Mutex;
use tracing::warn;

/// Trait for reporting errors that do not abort a run.
pub trait ErrorReporter: Send + Sync {
    /// Reports an error from a composition stage.
    fn report(&self, stage: &str, error: &VoxError);
}

/// Reporter that logs through `tracing`.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogReporter;

impl ErrorReporter for LogReporter {
    fn report(&self, stage: &str, error: &VoxError) {
        warn!(stage, error = %error, "Non-fatal composition error");
    }
}

/// Reporter that keeps every message, for callers that surface them later.
#[derive(Debug, Default)]
pub struct CollectingReporter {
    messages: Mutex<Vec<String>>,
}

impl CollectingReporter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reported messages formatted as `[stage] error`.
    pub fn messages(&self) -> Vec<String> {
        match self.messages.lock() {
            Ok(messages) => messages.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }
}

impl ErrorReporter for CollectingReporter {
    fn report(&self, stage: &str, error: &VoxError) {
        let entry = format!("[{}] {}", stage, error);
        match self.messages.lock() {
            Ok(mut messages) => messages.push(entry),
            Err(poisoned) => poisoned.into_inner().push(entry),
        }
    }
}
