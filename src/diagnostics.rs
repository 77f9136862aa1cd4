use std::sync::Arc;

use anyhow::Result;
use simple_logger::{set_up_color_terminal, SimpleLogger};
use tracing::{event, Level};

/// Name of the user-facing channel. Carries anything an operator should see:
/// warnings, errors, and fatal bootstrap failures.
pub const USER_CHANNEL: &str = "engine";
/// Name of the verbose channel. Carries high-volume trace output, including
/// everything the validation layers emit below warning severity.
pub const VERBOSE_CHANNEL: &str = "engine::verbose";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Channel {
    User,
    Verbose,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Severity {
    Trace,
    Info,
    Warn,
    Error,
    Critical,
}

/// Destination for diagnostics messages. Implementations must be callable
/// from the Vulkan messenger callback, which the driver may invoke from any
/// thread.
pub trait DiagnosticsSink: Send + Sync {
    fn log(&self, channel: Channel, severity: Severity, message: &str);

    fn flush(&self) {}
}

/// Handle to the two diagnostics channels. Constructed once at startup and
/// passed by reference to every component that logs, so tests can swap in a
/// recording sink.
pub struct Diagnostics {
    sink: Arc<dyn DiagnosticsSink>,
}

impl Diagnostics {
    /// Sets up terminal logging and returns a context routing both channels
    /// through it. Must be called before any other logging call.
    pub fn init() -> Result<Self> {
        set_up_color_terminal();
        let logger = SimpleLogger::new();
        logger.init()?;
        Ok(Self::with_sink(Arc::new(TracingSink)))
    }

    pub fn with_sink(sink: Arc<dyn DiagnosticsSink>) -> Self {
        Self { sink }
    }

    pub fn sink(&self) -> &Arc<dyn DiagnosticsSink> {
        &self.sink
    }

    pub fn log(&self, channel: Channel, severity: Severity, message: &str) {
        self.sink.log(channel, severity, message);
    }

    pub fn trace(&self, message: &str) {
        self.log(Channel::Verbose, Severity::Trace, message);
    }

    pub fn info(&self, message: &str) {
        self.log(Channel::Verbose, Severity::Info, message);
    }

    pub fn warn(&self, message: &str) {
        self.log(Channel::User, Severity::Warn, message);
    }

    pub fn error(&self, message: &str) {
        self.log(Channel::User, Severity::Error, message);
    }

    pub fn critical(&self, message: &str) {
        self.log(Channel::User, Severity::Critical, message);
    }

    /// Flushes any buffered output. Call once before process exit.
    pub fn shutdown(&self) {
        self.sink.flush();
    }
}

/// Production sink: emits tracing events on the channel's target, which the
/// `log-always` feature forwards to the terminal logger.
pub struct TracingSink;

impl DiagnosticsSink for TracingSink {
    fn log(&self, channel: Channel, severity: Severity, message: &str) {
        match channel {
            Channel::User => match severity {
                Severity::Trace => event!(target: USER_CHANNEL, Level::TRACE, "{}", message),
                Severity::Info => event!(target: USER_CHANNEL, Level::INFO, "{}", message),
                Severity::Warn => event!(target: USER_CHANNEL, Level::WARN, "{}", message),
                // tracing has no fifth level; critical keeps its meaning at
                // the sink boundary and lands on the error level here
                Severity::Error | Severity::Critical => {
                    event!(target: USER_CHANNEL, Level::ERROR, "{}", message)
                }
            },
            Channel::Verbose => match severity {
                Severity::Trace => event!(target: VERBOSE_CHANNEL, Level::TRACE, "{}", message),
                Severity::Info => event!(target: VERBOSE_CHANNEL, Level::INFO, "{}", message),
                Severity::Warn => event!(target: VERBOSE_CHANNEL, Level::WARN, "{}", message),
                Severity::Error | Severity::Critical => {
                    event!(target: VERBOSE_CHANNEL, Level::ERROR, "{}", message)
                }
            },
        }
    }

    fn flush(&self) {
        log::logger().flush();
    }
}


#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::{test_support::MemorySink, Channel, Diagnostics, Severity};

    #[test]
    fn helpers_route_to_expected_channels() {
        let sink = Arc::new(MemorySink::default());
        let diagnostics = Diagnostics::with_sink(sink.clone());

        diagnostics.trace("t");
        diagnostics.info("i");
        diagnostics.warn("w");
        diagnostics.error("e");
        diagnostics.critical("c");

        let records = sink.records.lock().unwrap();
        assert_eq!(records.len(), 5);
        assert_eq!(records[0], (Channel::Verbose, Severity::Trace, "t".into()));
        assert_eq!(records[1], (Channel::Verbose, Severity::Info, "i".into()));
        assert_eq!(records[2], (Channel::User, Severity::Warn, "w".into()));
        assert_eq!(records[3], (Channel::User, Severity::Error, "e".into()));
        assert_eq!(records[4], (Channel::User, Severity::Critical, "c".into()));
    }

    #[test]
    fn shutdown_flushes_the_sink() {
        let sink = Arc::new(MemorySink::default());
        let diagnostics = Diagnostics::with_sink(sink.clone());

        assert!(!sink.was_flushed());
        diagnostics.shutdown();
        assert!(sink.was_flushed());
    }
}
