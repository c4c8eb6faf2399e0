//! Logging functions for Lua scripts running inside the host.

mod print;

use std::sync::Arc;

use mlua::prelude::*;

use crate::caller::Caller;
use crate::logger::Logger;
use crate::severity::Severity;

/// Registers the logging globals in `lua`. Calls are attributed to `script`.
pub fn install(lua: &Lua, logger: Arc<Logger>, script: &str) -> LuaResult<()> {
    let globals = lua.globals();
    let caller = Caller::named(script.to_string());
    let editor = logger.editor();
    // print
    for (name, severity) in [
        ("Print", Severity::Information),
        ("Info", Severity::Information),
        ("Warn", Severity::Warning),
        ("Error", Severity::Error),
        ("Exception", Severity::Exception),
        ("Always", Severity::Always),
    ] {
        globals.set(
            name,
            print::fn_severity(lua, logger.clone(), caller.clone(), severity)?,
        )?;
    }
    globals.set(
        "LogLazy",
        print::fn_log_lazy(lua, logger.clone(), caller.clone())?,
    )?;
    // filter
    globals.set("SetLogLevel", print::fn_set_level(lua, logger.clone())?)?;
    globals.set("GetLogLevel", print::fn_get_level(lua, logger)?)?;
    // editor channel
    for (name, severity) in [
        ("EditorLog", Severity::Information),
        ("EditorWarn", Severity::Warning),
        ("EditorError", Severity::Error),
    ] {
        globals.set(name, print::fn_editor(lua, editor.clone(), severity)?)?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::channel::{Channel, Markup, MemorySink};
    use crate::config::LoggerConfig;

    fn setup(filter: Severity) -> (Lua, Arc<Logger>, Arc<MemorySink>) {
        let lua = Lua::new();
        let sink = Arc::new(MemorySink::new(Markup::Plain));
        let config = Arc::new(LoggerConfig::new(filter, true));
        let logger = Arc::new(Logger::new(config, sink.clone()));
        install(&lua, logger.clone(), "spawner.lua").unwrap();
        (lua, logger, sink)
    }

    #[test]
    fn test_print_functions() {
        let (lua, _, sink) = setup(Severity::All);
        lua.load(r#"Info("spawned", 3, nil) Warn("low")"#).exec().unwrap();
        let lines = sink.take();
        assert_eq!(lines[0].line, "[spawner.lua] spawned, 3, null");
        assert_eq!(lines[0].channel, Channel::Info);
        assert_eq!(lines[1].line, "[spawner.lua] low");
        assert_eq!(lines[1].channel, Channel::Warning);
    }

    #[test]
    fn test_any_value_can_be_logged() {
        let (lua, _, sink) = setup(Severity::All);
        lua.load(r#"Info("hp", true, 1.5, {}) Warn(print) EditorLog(false)"#)
            .exec()
            .unwrap();
        let lines = sink.take();
        assert!(
            lines[0].line.starts_with("[spawner.lua] hp, true, 1.5, table: "),
            "{}",
            lines[0].line
        );
        assert!(lines[1].line.starts_with("[spawner.lua] function: "));
        if cfg!(feature = "editor") {
            assert_eq!(lines[2].line, "false");
        }
    }

    #[test]
    fn test_set_level_from_script() {
        let (lua, logger, sink) = setup(Severity::All);
        lua.load(r#"SetLogLevel("error") Info("hidden") Error("shown")"#)
            .exec()
            .unwrap();
        assert_eq!(logger.filter(), Severity::Error);
        let level: String = lua.load("return GetLogLevel()").eval().unwrap();
        assert_eq!(level, "error");
        assert_eq!(sink.take().len(), 1);
        assert!(lua.load(r#"SetLogLevel("loud")"#).exec().is_err());
    }

    #[test]
    fn test_log_lazy_skips_filtered_producer() {
        let (lua, _, sink) = setup(Severity::Warning);
        lua.load(
            r#"
            calls = 0
            LogLazy("info", function() calls = calls + 1 return "x" end)
            LogLazy("error", function() calls = calls + 1 return "y" end)
            "#,
        )
        .exec()
        .unwrap();
        let calls: i64 = lua.globals().get("calls").unwrap();
        assert_eq!(calls, 1);
        assert_eq!(sink.take()[0].line, "[spawner.lua] y");
    }

    #[test]
    fn test_editor_functions() {
        let (lua, logger, sink) = setup(Severity::None);
        lua.load(r#"EditorWarn("dev only")"#).exec().unwrap();
        logger.config().set_editor_enabled(false);
        lua.load(r#"EditorLog("muted")"#).exec().unwrap();
        let lines = sink.take();
        if cfg!(feature = "editor") {
            assert_eq!(lines.len(), 1);
            assert_eq!(lines[0].line, "dev only");
            assert_eq!(lines[0].channel, Channel::Warning);
        } else {
            assert!(lines.is_empty());
        }
    }
}
