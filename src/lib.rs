//! Level-filtered logging where every line is prefixed with the identity of
//! the type that emitted it, e.g. `[Player] spawned`.
//!
//! ```no_run
//! struct Player;
//!
//! impl Player {
//!     fn spawn(&self) {
//!         tintlog::warning!("spawned with {} hp", 80);
//!         tintlog::editor_log!("only visible while the editor flag is on");
//!     }
//! }
//! ```

mod caller;
mod channel;
mod command;
mod config;
mod editor;
mod error;
mod facade;
mod ffi;
mod logger;
#[cfg(feature = "lua")]
pub mod luavm;
mod palette;
mod settings;
mod severity;

pub use caller::{CallSite, Caller, ENGINE_IDENTITY, MAX_FRAMES};
pub use channel::{
    Channel, ConsoleSink, Context, Emitted, HostSink, Markup, MemorySink, OutputSink,
};
pub use command::{Cli, Command, Console, Toggle};
pub use config::LoggerConfig;
pub use editor::EditorGate;
pub use error::{Error, Result};
pub use facade::{
    console, editor, editor_enabled, filter, init, install, install_with, logger, palette,
    set_editor_enabled, set_filter,
};
pub use ffi::{FfiSink, WriteCallback};
pub use logger::{Logger, Message, Scoped};
pub use palette::{Color, ColorLookup, ColorTable, NoColors};
pub use settings::{parse_colors, parse_toggle, Settings};
pub use severity::{should_log, Severity};

#[doc(hidden)]
pub mod __private {
    pub use crate::caller::item_path_of;
}

/// Captures the current call site, including the path of the enclosing item.
#[macro_export]
macro_rules! call_site {
    () => {
        $crate::CallSite::new(
            ::std::module_path!(),
            {
                fn __tintlog_site() {}
                $crate::__private::item_path_of(__tintlog_site)
            },
            ::std::file!(),
            ::std::line!(),
        )
    };
}

/// Logs a formatted message at the given severity, attributed to the
/// enclosing type. The message is only formatted when the severity passes the
/// filter.
///
/// ```no_run
/// use tintlog::Severity;
///
/// tintlog::log!(Severity::Warning, "low ammo: {}", 3);
/// ```
#[macro_export]
macro_rules! log {
    (logger: $logger:expr, $severity:expr, $($arg:tt)+) => {
        $logger.log_at_with(
            &$crate::call_site!(),
            $severity,
            || ::std::format!($($arg)+),
            ::std::option::Option::None,
        )
    };
    ($severity:expr, $($arg:tt)+) => {
        $crate::log!(logger: $crate::logger(), $severity, $($arg)+)
    };
}

#[macro_export]
macro_rules! info {
    (logger: $logger:expr, $($arg:tt)+) => {
        $crate::log!(logger: $logger, $crate::Severity::Information, $($arg)+)
    };
    ($($arg:tt)+) => {
        $crate::log!($crate::Severity::Information, $($arg)+)
    };
}

#[macro_export]
macro_rules! warning {
    (logger: $logger:expr, $($arg:tt)+) => {
        $crate::log!(logger: $logger, $crate::Severity::Warning, $($arg)+)
    };
    ($($arg:tt)+) => {
        $crate::log!($crate::Severity::Warning, $($arg)+)
    };
}

#[macro_export]
macro_rules! error {
    (logger: $logger:expr, $($arg:tt)+) => {
        $crate::log!(logger: $logger, $crate::Severity::Error, $($arg)+)
    };
    ($($arg:tt)+) => {
        $crate::log!($crate::Severity::Error, $($arg)+)
    };
}

#[macro_export]
macro_rules! exception {
    (logger: $logger:expr, $($arg:tt)+) => {
        $crate::log!(logger: $logger, $crate::Severity::Exception, $($arg)+)
    };
    ($($arg:tt)+) => {
        $crate::log!($crate::Severity::Exception, $($arg)+)
    };
}

/// Logs regardless of the filter, even when it is `None`.
#[macro_export]
macro_rules! always {
    (logger: $logger:expr, $($arg:tt)+) => {
        $crate::log!(logger: $logger, $crate::Severity::Always, $($arg)+)
    };
    ($($arg:tt)+) => {
        $crate::log!($crate::Severity::Always, $($arg)+)
    };
}

/// Writes to the editor channel of the global logger.
#[macro_export]
macro_rules! editor_log {
    ($($arg:tt)+) => {
        $crate::editor().log_with(|| ::std::format!($($arg)+))
    };
}

#[macro_export]
macro_rules! editor_warning {
    ($($arg:tt)+) => {
        $crate::editor().warning_with(|| ::std::format!($($arg)+))
    };
}

#[macro_export]
macro_rules! editor_error {
    ($($arg:tt)+) => {
        $crate::editor().error_with(|| ::std::format!($($arg)+))
    };
}
