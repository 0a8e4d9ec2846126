//! Host-pluggable log sink.
//!
//! The core is silent in steady state and never formats a line unless a
//! sink is installed; the only messages it produces surround ROM loading.

use std::fmt;
use std::sync::OnceLock;

/// Severity of a core log line.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Level {
    Info,
    Warn,
}

/// Receives log lines from the core.
pub trait LogSink: Send + Sync + 'static {
    fn log(&self, level: Level, target: &'static str, args: fmt::Arguments);
}

static SINK: OnceLock<Box<dyn LogSink>> = OnceLock::new();

/// Install the process-wide sink. Hands the sink back if one is already
/// installed.
pub fn install(sink: Box<dyn LogSink>) -> Result<(), Box<dyn LogSink>> {
    SINK.set(sink)
}

pub fn is_installed() -> bool {
    SINK.get().is_some()
}

pub(crate) fn emit(level: Level, target: &'static str, args: fmt::Arguments) {
    if let Some(sink) = SINK.get() {
        sink.log(level, target, args);
    }
}
