use std::sync::Arc;

use mlua::prelude::*;
use mlua::Variadic;

use crate::caller::Caller;
use crate::editor::EditorGate;
use crate::logger::Logger;
use crate::severity::Severity;

/// `tostring`-style rendering that accepts any value; `nil` is `null`.
fn render(value: &LuaValue) -> String {
    match value {
        LuaValue::Nil => "null".to_string(),
        LuaValue::String(s) => s.to_string_lossy().into_owned(),
        other => other
            .to_string()
            .unwrap_or_else(|_| other.type_name().to_string()),
    }
}

fn join(args: &[LuaValue]) -> String {
    args.iter().map(render).collect::<Vec<_>>().join(", ")
}

fn parse_level(level: &str) -> LuaResult<Severity> {
    level
        .parse::<Severity>()
        .map_err(|e| LuaError::runtime(e.to_string()))
}

/// `Info("a", 1)` style function logging at a fixed severity. Arguments are
/// only joined when the call passes the filter.
pub fn fn_severity(
    lua: &Lua,
    logger: Arc<Logger>,
    caller: Caller,
    severity: Severity,
) -> LuaResult<LuaFunction<'_>> {
    lua.create_function(move |_, args: Variadic<LuaValue>| {
        logger.log_as_with(&caller, severity, || join(&args), None);
        Ok(())
    })
}

/// `LogLazy(level, fn)`: `fn` runs only when the call passes the filter.
pub fn fn_log_lazy(lua: &Lua, logger: Arc<Logger>, caller: Caller) -> LuaResult<LuaFunction<'_>> {
    lua.create_function(move |_, (level, producer): (String, LuaFunction)| {
        let severity = parse_level(&level)?;
        logger.log_as_with(
            &caller,
            severity,
            || {
                producer
                    .call::<_, LuaValue>(())
                    .map_or_else(|e| e.to_string(), |value| render(&value))
            },
            None,
        );
        Ok(())
    })
}

pub fn fn_set_level(lua: &Lua, logger: Arc<Logger>) -> LuaResult<LuaFunction<'_>> {
    lua.create_function(move |_, level: String| {
        logger.set_filter(parse_level(&level)?);
        Ok(())
    })
}

pub fn fn_get_level(lua: &Lua, logger: Arc<Logger>) -> LuaResult<LuaFunction<'_>> {
    lua.create_function(move |_, ()| Ok(logger.filter().name()))
}

pub fn fn_editor(lua: &Lua, editor: EditorGate, severity: Severity) -> LuaResult<LuaFunction<'_>> {
    lua.create_function(move |_, args: Variadic<LuaValue>| {
        editor.emit_with(severity, || join(&args), None);
        Ok(())
    })
}
