use std::fmt;
use std::sync::Arc;

use crate::channel::{Channel, Context, OutputSink};
use crate::config::LoggerConfig;
use crate::logger::Message;
use crate::severity::Severity;

/// Editor channel. Lines go out unprefixed and uncolored, and only while the
/// editor flag is set; the severity filter does not apply.
#[derive(Clone)]
pub struct EditorGate {
    config: Arc<LoggerConfig>,
    sink: Arc<dyn OutputSink>,
}

impl EditorGate {
    pub fn new(config: Arc<LoggerConfig>, sink: Arc<dyn OutputSink>) -> Self {
        Self { config, sink }
    }

    pub fn is_enabled(&self) -> bool {
        self.config.editor_enabled()
    }

    pub fn emit<'m>(
        &self,
        severity: Severity,
        message: impl Into<Message<'m>>,
        context: Option<Context<'_>>,
    ) {
        self.emit_with(severity, || message, context);
    }

    pub fn emit_with<'m, M, F>(
        &self,
        severity: Severity,
        producer: F,
        context: Option<Context<'_>>,
    ) where
        M: Into<Message<'m>>,
        F: FnOnce() -> M,
    {
        if !self.is_enabled() {
            return;
        }
        let message: Message<'m> = producer().into();
        self.sink
            .write(Channel::for_severity(severity), &message.to_string(), context);
    }

    pub fn log<'m>(&self, message: impl Into<Message<'m>>) {
        self.emit(Severity::Information, message, None);
    }

    pub fn warning<'m>(&self, message: impl Into<Message<'m>>) {
        self.emit(Severity::Warning, message, None);
    }

    pub fn error<'m>(&self, message: impl Into<Message<'m>>) {
        self.emit(Severity::Error, message, None);
    }

    pub fn log_with<'m, M: Into<Message<'m>>>(&self, producer: impl FnOnce() -> M) {
        self.emit_with(Severity::Information, producer, None);
    }

    pub fn warning_with<'m, M: Into<Message<'m>>>(&self, producer: impl FnOnce() -> M) {
        self.emit_with(Severity::Warning, producer, None);
    }

    pub fn error_with<'m, M: Into<Message<'m>>>(&self, producer: impl FnOnce() -> M) {
        self.emit_with(Severity::Error, producer, None);
    }
}

impl fmt::Debug for EditorGate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EditorGate")
            .field("enabled", &self.is_enabled())
            .finish()
    }
}
