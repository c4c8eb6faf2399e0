//! C ABI for hosts that load the library directly.

use std::borrow::Cow;
use std::ffi::{CStr, CString};
use std::sync::Arc;

use libc::{c_char, size_t};

use crate::caller::Caller;
use crate::channel::{Channel, Context, Markup, OutputSink};
use crate::error::{Error, Result};
use crate::facade;
use crate::logger::{Logger, Message};
use crate::settings::Settings;
use crate::severity::Severity;

/// Host write function: channel (0 info, 1 warning, 2 error), NUL terminated
/// line and its length in bytes.
pub type WriteCallback = extern "C" fn(channel: u8, line: *const c_char, len: size_t);

pub struct FfiSink {
    callback: WriteCallback,
    markup: Markup,
}

impl FfiSink {
    pub fn new(callback: WriteCallback, markup: Markup) -> Self {
        Self { callback, markup }
    }
}

impl OutputSink for FfiSink {
    fn markup(&self) -> Markup {
        self.markup
    }

    fn write(&self, channel: Channel, line: &str, _context: Option<Context<'_>>) {
        let line = match CString::new(line) {
            Ok(line) => line,
            Err(_) => match CString::new(line.replace('\0', "")) {
                Ok(line) => line,
                Err(_) => return,
            },
        };
        (self.callback)(channel as u8, line.as_ptr(), line.as_bytes().len());
    }
}

fn markup_from_raw(raw: u8) -> Markup {
    match raw {
        1 => Markup::RichText,
        2 => Markup::Ansi,
        _ => Markup::Plain,
    }
}

/// # Safety
///
/// `ptr` must be null or point to a NUL terminated string.
unsafe fn text<'a>(ptr: *const c_char) -> Option<Cow<'a, str>> {
    if ptr.is_null() {
        return None;
    }
    Some(CStr::from_ptr(ptr).to_string_lossy())
}

/// # Safety
///
/// Pointers must be null or point to NUL terminated strings.
unsafe fn log_raw(
    logger: &Logger,
    severity: u8,
    identity: *const c_char,
    message: *const c_char,
) {
    let Some(severity) = Severity::from_raw(severity) else {
        return;
    };
    if !logger.should_log(severity) {
        return;
    }
    let caller = match text(identity) {
        Some(identity) => Caller::named(identity.into_owned()),
        None => Caller::engine(),
    };
    logger.log_as_with(&caller, severity, || Message::from(text(message)), None);
}

/// Installs the global logger writing through `callback`. Returns false when
/// `callback` is null or a global logger already exists.
#[no_mangle]
pub extern "C" fn tintlog_install_host(callback: Option<WriteCallback>, markup: u8) -> bool {
    let Some(callback) = callback else {
        return false;
    };
    let (settings, rejected) = host_settings(Settings::from_env(), markup);
    let sink = Arc::new(FfiSink::new(callback, settings.markup));
    if facade::install_with(&settings, sink).is_err() {
        return false;
    }
    if let Some(e) = rejected {
        facade::report_rejected(facade::logger(), &e);
    }
    true
}

/// Environment settings with the host's markup, which always wins.
fn host_settings(env: Result<Settings>, markup: u8) -> (Settings, Option<Error>) {
    let (settings, rejected) = facade::settings_or_default(env);
    let settings = Settings {
        markup: markup_from_raw(markup),
        ..settings
    };
    (settings, rejected)
}

/// Sets the filter level. Returns false for an unknown level.
#[no_mangle]
pub extern "C" fn tintlog_set_filter(level: u8) -> bool {
    match Severity::from_raw(level) {
        Some(level) => {
            facade::set_filter(level);
            true
        }
        None => false,
    }
}

#[no_mangle]
pub extern "C" fn tintlog_filter() -> u8 {
    facade::filter().as_raw()
}

#[no_mangle]
pub extern "C" fn tintlog_set_editor_enabled(enabled: bool) {
    facade::set_editor_enabled(enabled);
}

/// # Safety
///
/// `identity` and `message` must be null or point to NUL terminated strings.
#[no_mangle]
pub unsafe extern "C" fn tintlog_log(
    severity: u8,
    identity: *const c_char,
    message: *const c_char,
) {
    log_raw(facade::logger(), severity, identity, message);
}

/// # Safety
///
/// `message` must be null or point to a NUL terminated string.
#[no_mangle]
pub unsafe extern "C" fn tintlog_editor_log(severity: u8, message: *const c_char) {
    let Some(severity) = Severity::from_raw(severity) else {
        return;
    };
    facade::editor().emit_with(severity, || Message::from(text(message)), None);
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;
    use crate::config::LoggerConfig;
    use crate::palette::{Color, ColorTable};

    static WRITTEN: Mutex<Vec<(u8, String)>> = Mutex::new(Vec::new());

    extern "C" fn record(channel: u8, line: *const c_char, len: size_t) {
        let line = unsafe { CStr::from_ptr(line) }.to_string_lossy().into_owned();
        assert_eq!(line.len(), len);
        WRITTEN.lock().unwrap().push((channel, line));
    }

    #[test]
    fn test_log_raw_through_callback() {
        let config = Arc::new(LoggerConfig::new(Severity::Warning, false));
        let palette = ColorTable::from_entries([("Door", Color::rgb(0, 0, 0xff))]);
        let logger = Logger::new(config, Arc::new(FfiSink::new(record, Markup::RichText)))
            .with_palette(Arc::new(palette));
        let identity = CString::new("Door").unwrap();
        let message = CString::new("stuck").unwrap();
        unsafe {
            log_raw(&logger, Severity::Information.as_raw(), identity.as_ptr(), message.as_ptr());
            log_raw(&logger, Severity::Error.as_raw(), identity.as_ptr(), message.as_ptr());
            log_raw(&logger, Severity::Always.as_raw(), std::ptr::null(), std::ptr::null());
            log_raw(&logger, 42, identity.as_ptr(), message.as_ptr());
        }
        assert_eq!(
            *WRITTEN.lock().unwrap(),
            vec![
                (2, "<color=#0000ff>[Door]</color> stuck".to_string()),
                (0, "[Logger] null".to_string()),
            ]
        );
    }

    #[test]
    fn test_host_settings_keep_rejection() {
        let env = Settings::from_source(|key| {
            (key == crate::settings::MARKUP_VAR).then(|| "html".to_string())
        });
        let (settings, rejected) = host_settings(env, 2);
        assert_eq!(settings.markup, Markup::Ansi);
        assert_eq!(settings.filter, Severity::All);
        assert!(matches!(rejected, Some(Error::Setting { .. })));

        let (settings, rejected) = host_settings(Ok(Settings::default()), 1);
        assert_eq!(settings.markup, Markup::RichText);
        assert!(rejected.is_none());
    }

    #[test]
    fn test_markup_from_raw() {
        assert_eq!(markup_from_raw(1), Markup::RichText);
        assert_eq!(markup_from_raw(2), Markup::Ansi);
        assert_eq!(markup_from_raw(9), Markup::Plain);
    }
}
