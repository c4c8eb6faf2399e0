//! Process-wide logger used by the macros, the C ABI and the `log` crate.
//!
//! The first access builds a console logger from the environment unless a
//! logger was installed before.

use std::sync::Arc;

use log::LevelFilter;
use once_cell::sync::OnceCell;
use snafu::prelude::*;

use crate::caller::Caller;
use crate::channel::{ConsoleSink, OutputSink};
use crate::command::Console;
use crate::editor::EditorGate;
use crate::error::{AlreadyInstalledSnafu, Error, Result, SetLoggerSnafu};
use crate::logger::Logger;
use crate::palette::ColorTable;
use crate::settings::Settings;
use crate::severity::Severity;

struct Global {
    logger: Logger,
    palette: Arc<ColorTable>,
    editor: EditorGate,
}

impl Global {
    fn new(logger: Logger, palette: Arc<ColorTable>) -> Self {
        let editor = logger.editor();
        Self {
            logger,
            palette,
            editor,
        }
    }

    fn from_settings(settings: &Settings, sink: Arc<dyn OutputSink>) -> Self {
        let palette = settings.palette();
        let logger = Logger::new(settings.config(), sink).with_palette(palette.clone());
        Self::new(logger, palette)
    }
}

static GLOBAL: OnceCell<Global> = OnceCell::new();

fn global() -> &'static Global {
    GLOBAL.get_or_init(|| {
        let (settings, rejected) = settings_or_default(Settings::from_env());
        let global = Global::from_settings(&settings, Arc::new(ConsoleSink::new(settings.markup)));
        if let Some(e) = rejected {
            report_rejected(&global.logger, &e);
        }
        global
    })
}

pub(crate) fn settings_or_default(settings: Result<Settings>) -> (Settings, Option<Error>) {
    match settings {
        Ok(settings) => (settings, None),
        Err(e) => (Settings::default(), Some(e)),
    }
}

/// Reports settings that were dropped in favor of the defaults.
pub(crate) fn report_rejected(logger: &Logger, error: &Error) {
    logger.log_as(
        &Caller::engine(),
        Severity::Warning,
        format_args!("{error}, using defaults"),
        None,
    );
}

/// Installs `logger` as the global logger. `palette` should be the table the
/// logger looks colors up in, so console commands edit the live colors.
pub fn install(logger: Logger, palette: Arc<ColorTable>) -> Result<()> {
    GLOBAL
        .set(Global::new(logger, palette))
        .map_err(|_| AlreadyInstalledSnafu.build())
}

pub fn install_with(settings: &Settings, sink: Arc<dyn OutputSink>) -> Result<()> {
    GLOBAL
        .set(Global::from_settings(settings, sink))
        .map_err(|_| AlreadyInstalledSnafu.build())
}

pub fn logger() -> &'static Logger {
    &global().logger
}

pub fn palette() -> &'static ColorTable {
    &global().palette
}

pub fn editor() -> &'static EditorGate {
    &global().editor
}

pub fn console() -> Console<'static> {
    let global = global();
    Console::new(&global.logger, &global.palette)
}

/// Routes records of the `log` crate through the global logger.
pub fn init() -> Result<()> {
    log::set_logger(logger()).context(SetLoggerSnafu)?;
    log::set_max_level(LevelFilter::Trace);
    Ok(())
}

pub fn filter() -> Severity {
    logger().filter()
}

pub fn set_filter(filter: Severity) {
    logger().set_filter(filter);
}

pub fn editor_enabled() -> bool {
    editor().is_enabled()
}

pub fn set_editor_enabled(enabled: bool) {
    logger().config().set_editor_enabled(enabled);
}
