use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;

use log::{Metadata, Record};

use crate::caller::{CallSite, Caller};
use crate::channel::{Channel, Context, OutputSink};
use crate::config::LoggerConfig;
use crate::editor::EditorGate;
use crate::palette::ColorLookup;
use crate::severity::{self, Severity};

/// Body of a log line. `Null` stands for an absent message and renders as
/// `null`.
#[derive(Debug, Clone)]
pub enum Message<'a> {
    Text(Cow<'a, str>),
    Args(fmt::Arguments<'a>),
    Null,
}

impl fmt::Display for Message<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Message::Text(text) => f.write_str(text),
            Message::Args(args) => fmt::Display::fmt(args, f),
            Message::Null => f.write_str("null"),
        }
    }
}

impl<'a> From<&'a str> for Message<'a> {
    fn from(text: &'a str) -> Self {
        Message::Text(Cow::Borrowed(text))
    }
}

impl<'a> From<&'a String> for Message<'a> {
    fn from(text: &'a String) -> Self {
        Message::Text(Cow::Borrowed(text))
    }
}

impl From<String> for Message<'_> {
    fn from(text: String) -> Self {
        Message::Text(Cow::Owned(text))
    }
}

impl<'a> From<Cow<'a, str>> for Message<'a> {
    fn from(text: Cow<'a, str>) -> Self {
        Message::Text(text)
    }
}

impl<'a> From<fmt::Arguments<'a>> for Message<'a> {
    fn from(args: fmt::Arguments<'a>) -> Self {
        Message::Args(args)
    }
}

impl<'a, T> From<Option<T>> for Message<'a>
where
    T: Into<Message<'a>>,
{
    fn from(message: Option<T>) -> Self {
        message.map_or(Message::Null, Into::into)
    }
}

/// The dispatch engine: filters, attributes, colors and routes log calls.
///
/// Every call is synchronous and infallible. Lazy variants (`*_with`) only
/// run their producer when the call passes the filter, and the caller is
/// only resolved for calls that pass.
pub struct Logger {
    config: Arc<LoggerConfig>,
    palette: Option<Arc<dyn ColorLookup>>,
    sink: Arc<dyn OutputSink>,
}

impl Logger {
    pub fn new(config: Arc<LoggerConfig>, sink: Arc<dyn OutputSink>) -> Self {
        Self {
            config,
            palette: None,
            sink,
        }
    }

    pub fn with_palette(mut self, palette: Arc<dyn ColorLookup>) -> Self {
        self.palette = Some(palette);
        self
    }

    pub fn config(&self) -> &Arc<LoggerConfig> {
        &self.config
    }

    pub fn sink(&self) -> &Arc<dyn OutputSink> {
        &self.sink
    }

    pub fn filter(&self) -> Severity {
        self.config.filter()
    }

    pub fn set_filter(&self, filter: Severity) {
        self.config.set_filter(filter);
    }

    pub fn should_log(&self, severity: Severity) -> bool {
        severity::should_log(severity, self.config.filter())
    }

    /// Editor channel sharing this logger's switches and sink.
    pub fn editor(&self) -> EditorGate {
        EditorGate::new(self.config.clone(), self.sink.clone())
    }

    /// `[Identity] body`, with only the prefix painted when the palette knows
    /// the identity.
    pub fn format_line(&self, caller: &Caller, message: &Message<'_>) -> String {
        let prefix = format!("[{}]", caller.name());
        let color = self
            .palette
            .as_ref()
            .and_then(|palette| palette.lookup(caller.name()));
        match color {
            Some(color) => format!("{} {message}", self.sink.markup().paint(&prefix, color)),
            None => format!("{prefix} {message}"),
        }
    }

    fn dispatch<'m, C, M>(
        &self,
        severity: Severity,
        caller: C,
        message: M,
        context: Option<Context<'_>>,
    ) where
        C: FnOnce() -> Caller,
        M: FnOnce() -> Message<'m>,
    {
        if !self.should_log(severity) {
            return;
        }
        let line = self.format_line(&caller(), &message());
        self.sink.write(Channel::for_severity(severity), &line, context);
    }

    /// Logs on behalf of `T`, named after its declared type. Resolved at
    /// compile time, so attribution survives inlining.
    pub fn log_from<'m, T: ?Sized>(
        &self,
        severity: Severity,
        message: impl Into<Message<'m>>,
        context: Option<Context<'_>>,
    ) {
        self.dispatch(severity, Caller::of::<T>, || message.into(), context);
    }

    pub fn log_from_with<'m, T, M, F>(
        &self,
        severity: Severity,
        producer: F,
        context: Option<Context<'_>>,
    ) where
        T: ?Sized,
        M: Into<Message<'m>>,
        F: FnOnce() -> M,
    {
        self.dispatch(severity, Caller::of::<T>, || producer().into(), context);
    }

    /// Logs with the caller taken from a stack walk. Only as reliable as the
    /// symbols of the build, see [`Caller::from_stack`].
    pub fn log_from_stack<'m>(
        &self,
        severity: Severity,
        message: impl Into<Message<'m>>,
        context: Option<Context<'_>>,
    ) {
        self.dispatch(severity, Caller::from_stack, || message.into(), context);
    }

    pub fn log_from_stack_with<'m, M, F>(
        &self,
        severity: Severity,
        producer: F,
        context: Option<Context<'_>>,
    ) where
        M: Into<Message<'m>>,
        F: FnOnce() -> M,
    {
        self.dispatch(severity, Caller::from_stack, || producer().into(), context);
    }

    pub fn log_at<'m>(
        &self,
        site: &CallSite,
        severity: Severity,
        message: impl Into<Message<'m>>,
        context: Option<Context<'_>>,
    ) {
        self.dispatch(severity, || site.resolve(), || message.into(), context);
    }

    pub fn log_at_with<'m, M, F>(
        &self,
        site: &CallSite,
        severity: Severity,
        producer: F,
        context: Option<Context<'_>>,
    ) where
        M: Into<Message<'m>>,
        F: FnOnce() -> M,
    {
        self.dispatch(severity, || site.resolve(), || producer().into(), context);
    }

    /// Logs on behalf of an already known caller, such as a script.
    pub fn log_as<'m>(
        &self,
        caller: &Caller,
        severity: Severity,
        message: impl Into<Message<'m>>,
        context: Option<Context<'_>>,
    ) {
        self.dispatch(severity, || caller.clone(), || message.into(), context);
    }

    pub fn log_as_with<'m, M, F>(
        &self,
        caller: &Caller,
        severity: Severity,
        producer: F,
        context: Option<Context<'_>>,
    ) where
        M: Into<Message<'m>>,
        F: FnOnce() -> M,
    {
        self.dispatch(severity, || caller.clone(), || producer().into(), context);
    }

    /// Handle logging on behalf of `T`, usually `Self`:
    /// `logger.scoped::<Self>().warning("low hp")`.
    pub fn scoped<T: ?Sized>(&self) -> Scoped<'_> {
        Scoped {
            logger: self,
            caller: Caller::of::<T>,
        }
    }
}

/// A [`Logger`] bound to one declared type. The identity is only resolved
/// for calls that pass the filter.
#[derive(Debug, Clone, Copy)]
pub struct Scoped<'a> {
    logger: &'a Logger,
    caller: fn() -> Caller,
}

impl Scoped<'_> {
    pub fn log<'m>(
        &self,
        severity: Severity,
        message: impl Into<Message<'m>>,
        context: Option<Context<'_>>,
    ) {
        self.logger
            .dispatch(severity, self.caller, || message.into(), context);
    }

    pub fn log_with<'m, M, F>(
        &self,
        severity: Severity,
        producer: F,
        context: Option<Context<'_>>,
    ) where
        M: Into<Message<'m>>,
        F: FnOnce() -> M,
    {
        self.logger
            .dispatch(severity, self.caller, || producer().into(), context);
    }

    pub fn info<'m>(&self, message: impl Into<Message<'m>>) {
        self.log(Severity::Information, message, None);
    }

    pub fn warning<'m>(&self, message: impl Into<Message<'m>>) {
        self.log(Severity::Warning, message, None);
    }

    pub fn error<'m>(&self, message: impl Into<Message<'m>>) {
        self.log(Severity::Error, message, None);
    }

    pub fn exception<'m>(&self, message: impl Into<Message<'m>>) {
        self.log(Severity::Exception, message, None);
    }

    pub fn always<'m>(&self, message: impl Into<Message<'m>>) {
        self.log(Severity::Always, message, None);
    }

    pub fn info_with<'m, M: Into<Message<'m>>>(&self, producer: impl FnOnce() -> M) {
        self.log_with(Severity::Information, producer, None);
    }

    pub fn warning_with<'m, M: Into<Message<'m>>>(&self, producer: impl FnOnce() -> M) {
        self.log_with(Severity::Warning, producer, None);
    }

    pub fn error_with<'m, M: Into<Message<'m>>>(&self, producer: impl FnOnce() -> M) {
        self.log_with(Severity::Error, producer, None);
    }

    pub fn exception_with<'m, M: Into<Message<'m>>>(&self, producer: impl FnOnce() -> M) {
        self.log_with(Severity::Exception, producer, None);
    }

    pub fn always_with<'m, M: Into<Message<'m>>>(&self, producer: impl FnOnce() -> M) {
        self.log_with(Severity::Always, producer, None);
    }
}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Logger")
            .field("config", &self.config)
            .field("palette", &self.palette.is_some())
            .field("markup", &self.sink.markup())
            .finish()
    }
}

/// Records from the `log` crate go through the same filter, attributed to
/// their module.
impl log::Log for Logger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        self.should_log(metadata.level().into())
    }

    fn log(&self, record: &Record) {
        let caller = || match record.module_path_static() {
            Some(path) => Caller::from_static_module_path(path),
            None => Caller::from_module_path(record.target()),
        };
        self.dispatch(record.level().into(), caller, || Message::Args(*record.args()), None);
    }

    fn flush(&self) {}
}
