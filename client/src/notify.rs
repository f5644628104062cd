//! User-facing notification channel.
//!
//! Every error and status message reaches the user through a [`UiSink`].
//! The core never renders anything: the browser front end implements the
//! trait with toasts, native callers use [`LogSink`], tests use
//! [`MemorySink`].

use std::cell::RefCell;
use std::collections::VecDeque;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::config::{MAX_NOTIFICATIONS, NOTIFICATION_DURATION};
use crate::error::ClientError;

/// Severity of a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Success,
    Warning,
    Error,
}

impl Severity {
    /// CSS class for styling.
    pub fn css_class(&self) -> &'static str {
        match self {
            Severity::Info => "notification info",
            Severity::Success => "notification success",
            Severity::Warning => "notification warning",
            Severity::Error => "notification error",
        }
    }

    fn log_level(&self) -> log::Level {
        match self {
            Severity::Info | Severity::Success => log::Level::Info,
            Severity::Warning => log::Level::Warn,
            Severity::Error => log::Level::Error,
        }
    }
}

/// A message waiting to be displayed.
#[derive(Debug, Clone, PartialEq)]
pub struct Notification {
    pub message: String,
    pub severity: Severity,
    /// Local time the notification was raised (HH:MM:SS)
    pub timestamp: String,
    /// How long it stays visible
    pub duration: Duration,
}

impl Notification {
    pub fn new(message: impl Into<String>, severity: Severity) -> Self {
        Self {
            message: message.into(),
            severity,
            timestamp: chrono::Local::now().format("%H:%M:%S").to_string(),
            duration: NOTIFICATION_DURATION,
        }
    }

    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }
}

/// Where notifications go.
pub trait UiSink {
    fn notify(&self, message: &str, severity: Severity);
}

impl<S: UiSink + ?Sized> UiSink for &S {
    fn notify(&self, message: &str, severity: Severity) {
        (**self).notify(message, severity)
    }
}

impl<S: UiSink + ?Sized> UiSink for std::rc::Rc<S> {
    fn notify(&self, message: &str, severity: Severity) {
        (**self).notify(message, severity)
    }
}

/// Surface an error on the notification channel.
///
/// A rejected batch produces one warning per reason; every other kind is a
/// single error notification.
pub fn report(sink: &impl UiSink, error: &ClientError) {
    match error {
        ClientError::Validation(errors) => {
            for err in errors {
                sink.notify(&err.to_string(), Severity::Warning);
            }
        }
        ClientError::Poll(err) => sink.notify(&err.user_message(), Severity::Error),
        ClientError::Server(err) => sink.notify(&err.message, Severity::Error),
        other => sink.notify(&other.to_string(), Severity::Error),
    }
}

/// Sends notifications to the `log` facade.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogSink;

impl UiSink for LogSink {
    fn notify(&self, message: &str, severity: Severity) {
        log::log!(severity.log_level(), "[{:?}] {}", severity, message);
    }
}

/// Keeps the most recent notifications in memory.
#[derive(Debug)]
pub struct MemorySink {
    entries: RefCell<VecDeque<Notification>>,
    capacity: usize,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::with_capacity(MAX_NOTIFICATIONS)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: RefCell::new(VecDeque::new()),
            capacity: capacity.max(1),
        }
    }

    pub fn entries(&self) -> Vec<Notification> {
        self.entries.borrow().iter().cloned().collect()
    }

    pub fn messages(&self) -> Vec<String> {
        self.entries.borrow().iter().map(|n| n.message.clone()).collect()
    }

    pub fn clear(&self) {
        self.entries.borrow_mut().clear();
    }
}

impl Default for MemorySink {
    fn default() -> Self {
        Self::new()
    }
}

impl UiSink for MemorySink {
    fn notify(&self, message: &str, severity: Severity) {
        let mut entries = self.entries.borrow_mut();
        entries.push_back(Notification::new(message, severity));
        while entries.len() > self.capacity {
            entries.pop_front();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{PollError, ServerError, TransportError, ValidationError};

    #[test]
    fn test_memory_sink_is_bounded() {
        let sink = MemorySink::with_capacity(2);
        sink.notify("one", Severity::Info);
        sink.notify("two", Severity::Success);
        sink.notify("three", Severity::Error);

        assert_eq!(sink.messages(), vec!["two", "three"]);
        assert_eq!(sink.entries()[1].severity, Severity::Error);
    }

    #[test]
    fn test_report_validation_lists_each_reason() {
        let sink = MemorySink::new();
        let err = ClientError::Validation(vec![
            ValidationError::InvalidExtension { name: "a.txt".into() },
            ValidationError::FileTooLarge { name: "b.mseed".into() },
        ]);
        report(&sink, &err);

        let entries = sink.entries();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].message, "a.txt: invalid extension");
        assert!(entries.iter().all(|n| n.severity == Severity::Warning));
    }

    #[test]
    fn test_report_server_and_poll_errors() {
        let sink = MemorySink::new();
        report(&sink, &ServerError::from_body(500, "").into());
        report(&sink, &PollError::from(TransportError("refused".into())).into());

        assert_eq!(sink.messages(), vec!["Unknown error", "Connection error"]);
        assert!(sink.entries().iter().all(|n| n.severity == Severity::Error));
    }

    #[test]
    fn test_notification_defaults() {
        let n = Notification::new("Download complete", Severity::Success);
        assert_eq!(n.duration, NOTIFICATION_DURATION);
        assert_eq!(n.timestamp.len(), 8);
        assert_eq!(n.with_duration(Duration::from_secs(3)).duration, Duration::from_secs(3));
    }

    #[test]
    fn test_sink_through_reference() {
        let sink = MemorySink::new();
        let by_ref: &dyn UiSink = &sink;
        by_ref.notify("hello", Severity::Info);
        LogSink.notify("also logged", Severity::Warning);
        assert_eq!(sink.messages(), vec!["hello"]);
    }
}
