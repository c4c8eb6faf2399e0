use std::fmt;
use std::io::Write;
use std::str::FromStr;
use std::sync::Mutex;

use crate::error::{Error, ParseMarkupSnafu};
use crate::palette::Color;
use crate::severity::Severity;

/// Output channel a line is written to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Channel {
    Info = 0,
    Warning = 1,
    Error = 2,
}

impl Channel {
    pub fn for_severity(severity: Severity) -> Channel {
        match severity {
            Severity::Warning => Channel::Warning,
            Severity::Error | Severity::Exception => Channel::Error,
            Severity::Information | Severity::Always | Severity::All | Severity::None => {
                Channel::Info
            }
        }
    }
}

/// Color markup understood by an output surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Markup {
    #[default]
    Plain,
    /// `<color=#rrggbb>text</color>` tags, as rendered by engine consoles.
    RichText,
    /// 24-bit SGR escapes for terminals.
    Ansi,
}

impl Markup {
    pub fn paint(self, text: &str, color: Color) -> String {
        match self {
            Markup::Plain => text.to_string(),
            Markup::RichText => format!("<color={color}>{text}</color>"),
            Markup::Ansi => format!(
                "\x1b[38;2;{};{};{}m{text}\x1b[0m",
                color.r, color.g, color.b
            ),
        }
    }
}

impl FromStr for Markup {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "plain" | "none" => Ok(Markup::Plain),
            "rich" | "richtext" | "rich-text" => Ok(Markup::RichText),
            "ansi" | "terminal" => Ok(Markup::Ansi),
            _ => ParseMarkupSnafu { input: s }.fail(),
        }
    }
}

/// Optional host object a line refers to.
pub type Context<'a> = &'a (dyn fmt::Debug + 'a);

/// The host's write surface. Writes are synchronous and their failures stay
/// inside the sink.
pub trait OutputSink: Send + Sync {
    fn markup(&self) -> Markup {
        Markup::Plain
    }

    fn write(&self, channel: Channel, line: &str, context: Option<Context<'_>>);
}

/// Writes info lines to stdout, warnings and errors to stderr.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleSink {
    markup: Markup,
}

impl ConsoleSink {
    pub fn new(markup: Markup) -> Self {
        Self { markup }
    }
}

impl OutputSink for ConsoleSink {
    fn markup(&self) -> Markup {
        self.markup
    }

    fn write(&self, channel: Channel, line: &str, context: Option<Context<'_>>) {
        let _ = match channel {
            Channel::Info => write_line(std::io::stdout().lock(), line, context),
            Channel::Warning | Channel::Error => {
                write_line(std::io::stderr().lock(), line, context)
            }
        };
    }
}

fn write_line(
    mut out: impl Write,
    line: &str,
    context: Option<Context<'_>>,
) -> std::io::Result<()> {
    match context {
        Some(context) => writeln!(out, "{line} ({context:?})"),
        None => writeln!(out, "{line}"),
    }
}

/// Hands every line to a host callback, e.g. the loader console of the
/// process the library is injected into.
pub struct HostSink<F> {
    markup: Markup,
    callback: F,
}

impl<F> HostSink<F>
where
    F: Fn(Channel, &str, Option<Context<'_>>) + Send + Sync,
{
    pub fn new(markup: Markup, callback: F) -> Self {
        Self { markup, callback }
    }
}

impl<F> OutputSink for HostSink<F>
where
    F: Fn(Channel, &str, Option<Context<'_>>) + Send + Sync,
{
    fn markup(&self) -> Markup {
        self.markup
    }

    fn write(&self, channel: Channel, line: &str, context: Option<Context<'_>>) {
        (self.callback)(channel, line, context)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Emitted {
    pub channel: Channel,
    pub line: String,
    pub context: Option<String>,
}

/// Keeps every written line in memory.
#[derive(Debug, Default)]
pub struct MemorySink {
    markup: Markup,
    lines: Mutex<Vec<Emitted>>,
}

impl MemorySink {
    pub fn new(markup: Markup) -> Self {
        Self {
            markup,
            lines: Mutex::new(Vec::new()),
        }
    }

    pub fn lines(&self) -> Vec<Emitted> {
        self.lines
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    pub fn take(&self) -> Vec<Emitted> {
        std::mem::take(
            &mut *self
                .lines
                .lock()
                .unwrap_or_else(|poisoned| poisoned.into_inner()),
        )
    }
}

impl OutputSink for MemorySink {
    fn markup(&self) -> Markup {
        self.markup
    }

    fn write(&self, channel: Channel, line: &str, context: Option<Context<'_>>) {
        self.lines
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(Emitted {
                channel,
                line: line.to_string(),
                context: context.map(|c| format!("{c:?}")),
            });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_routing() {
        assert_eq!(Channel::for_severity(Severity::Information), Channel::Info);
        assert_eq!(Channel::for_severity(Severity::Warning), Channel::Warning);
        assert_eq!(Channel::for_severity(Severity::Error), Channel::Error);
        assert_eq!(Channel::for_severity(Severity::Exception), Channel::Error);
        assert_eq!(Channel::for_severity(Severity::Always), Channel::Info);
    }

    #[test]
    fn test_paint() {
        let red = Color::rgb(0xff, 0, 0);
        assert_eq!(Markup::Plain.paint("[A]", red), "[A]");
        assert_eq!(Markup::RichText.paint("[A]", red), "<color=#ff0000>[A]</color>");
        assert_eq!(Markup::Ansi.paint("[A]", red), "\x1b[38;2;255;0;0m[A]\x1b[0m");
    }

    #[test]
    fn test_parse_markup() {
        assert_eq!("Rich".parse::<Markup>().unwrap(), Markup::RichText);
        assert_eq!("ansi".parse::<Markup>().unwrap(), Markup::Ansi);
        assert!("html".parse::<Markup>().is_err());
    }

    #[test]
    fn test_host_sink_forwards() {
        let seen = Mutex::new(Vec::new());
        let record = |channel: Channel, line: &str, context: Option<Context<'_>>| {
            seen.lock()
                .unwrap()
                .push((channel, line.to_string(), context.is_some()));
        };
        let sink = HostSink::new(Markup::Plain, record);
        sink.write(Channel::Warning, "careful", None);
        sink.write(Channel::Info, "hello", Some(&42));
        assert_eq!(
            seen.into_inner().unwrap(),
            vec![
                (Channel::Warning, "careful".to_string(), false),
                (Channel::Info, "hello".to_string(), true),
            ]
        );
    }

    #[test]
    fn test_memory_sink_records_context() {
        let sink = MemorySink::default();
        sink.write(Channel::Error, "boom", Some(&"Crate#7"));
        let lines = sink.take();
        assert_eq!(lines[0].context.as_deref(), Some("\"Crate#7\""));
        assert!(sink.lines().is_empty());
    }
}
