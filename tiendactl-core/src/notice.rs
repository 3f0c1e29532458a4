//! User-facing notices: confirmations, warnings and database errors.
//!
//! The data layer and panels never talk to the interface directly. They hand
//! notices to a [`Notifier`]; the terminal UI drains them into a modal, the
//! CLI subcommands just log them.

use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

/// Severity of a notice
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Info,
    Warning,
    Error,
}

/// A message for the operator
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: Level,
    pub title: String,
    pub message: String,
}

impl Notice {
    pub fn info(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(Level::Info, title, message)
    }

    pub fn warning(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(Level::Warning, title, message)
    }

    pub fn error(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(Level::Error, title, message)
    }

    fn new(level: Level, title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            level,
            title: title.into(),
            message: message.into(),
        }
    }

    fn log(&self) {
        match self.level {
            Level::Info => tracing::info!(title = %self.title, "{}", self.message),
            Level::Warning => tracing::warn!(title = %self.title, "{}", self.message),
            Level::Error => tracing::error!(title = %self.title, "{}", self.message),
        }
    }
}

/// Sink for notices
pub trait Notifier: Send + Sync {
    fn notify(&self, notice: Notice);
}

/// Forwards notices over an unbounded channel to the interface loop
#[derive(Debug, Clone)]
pub struct ChannelNotifier {
    tx: UnboundedSender<Notice>,
}

impl ChannelNotifier {
    /// Create a notifier and the receiver the interface drains
    pub fn channel() -> (Self, UnboundedReceiver<Notice>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

impl Notifier for ChannelNotifier {
    fn notify(&self, notice: Notice) {
        notice.log();
        // Receiver gone means the interface is shutting down
        let _ = self.tx.send(notice);
    }
}

/// Logs notices through tracing only (non-interactive commands)
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, notice: Notice) {
        notice.log();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn channel_notifier_delivers_in_order() {
        let (notifier, mut rx) = ChannelNotifier::channel();
        notifier.notify(Notice::info("Saved", "Customer saved."));
        notifier.notify(Notice::error("Database error", "boom"));

        assert_eq!(rx.try_recv().unwrap().title, "Saved");
        assert_eq!(rx.try_recv().unwrap().level, Level::Error);
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn dropped_receiver_is_ignored() {
        let (notifier, rx) = ChannelNotifier::channel();
        drop(rx);
        notifier.notify(Notice::warning("Warning", "nobody listening"));
    }
}
