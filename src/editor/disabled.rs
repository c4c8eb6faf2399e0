use std::sync::Arc;

use crate::channel::{Context, OutputSink};
use crate::config::LoggerConfig;
use crate::logger::Message;
use crate::severity::Severity;

/// Editor channel compiled out of this build. Every call is a no-op and no
/// producer is ever run.
#[derive(Debug, Clone, Copy, Default)]
pub struct EditorGate;

impl EditorGate {
    #[inline(always)]
    pub fn new(_config: Arc<LoggerConfig>, _sink: Arc<dyn OutputSink>) -> Self {
        EditorGate
    }

    #[inline(always)]
    pub fn is_enabled(&self) -> bool {
        false
    }

    #[inline(always)]
    pub fn emit<'m>(
        &self,
        _severity: Severity,
        _message: impl Into<Message<'m>>,
        _context: Option<Context<'_>>,
    ) {
    }

    #[inline(always)]
    pub fn emit_with<'m, M, F>(
        &self,
        _severity: Severity,
        _producer: F,
        _context: Option<Context<'_>>,
    ) where
        M: Into<Message<'m>>,
        F: FnOnce() -> M,
    {
    }

    #[inline(always)]
    pub fn log<'m>(&self, _message: impl Into<Message<'m>>) {}

    #[inline(always)]
    pub fn warning<'m>(&self, _message: impl Into<Message<'m>>) {}

    #[inline(always)]
    pub fn error<'m>(&self, _message: impl Into<Message<'m>>) {}

    #[inline(always)]
    pub fn log_with<'m, M: Into<Message<'m>>>(&self, _producer: impl FnOnce() -> M) {}

    #[inline(always)]
    pub fn warning_with<'m, M: Into<Message<'m>>>(&self, _producer: impl FnOnce() -> M) {}

    #[inline(always)]
    pub fn error_with<'m, M: Into<Message<'m>>>(&self, _producer: impl FnOnce() -> M) {}
}
