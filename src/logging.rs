//! Logging capability injected into the server components.
//!
//! The renderer and launcher report recoverable conditions through this
//! trait instead of calling the global `log` macros directly, so tests can
//! capture the exact messages with a stub sink.

/// Sink for informational and warning messages.
pub trait EventLog: Send + Sync {
    /// Report normal progress
    fn info(&self, message: &str);
    /// Report a recoverable problem
    fn warn(&self, message: &str);
}

/// Production sink: forwards to the `log` facade, so the binary's
/// `env_logger` setup controls filtering and formatting.
#[derive(Debug, Default, Clone, Copy)]
pub struct StdLog;

impl EventLog for StdLog {
    fn info(&self, message: &str) {
        log::info!("{}", message);
    }

    fn warn(&self, message: &str) {
        log::warn!("{}", message);
    }
}
