//! Attribution of log calls to the type (or module) that issued them.
//!
//! Paths come from three places: call sites captured at compile time by the
//! logging macros, type names of an explicit `T` ([`Caller::of`]), and frames
//! of a backtrace walk as the last resort. All go through the same structural
//! rules:
//!
//! - a segment wrapped in braces (`{{closure}}`, `{closure#0}`,
//!   `{async_block#0}`, `{async_fn#0}`, `{shim:vtable#0}`) is compiler
//!   generated and skipped;
//! - the nearest enclosing segment that starts with an uppercase letter, or
//!   the self type of a qualified `<T as Trait>` segment, is the declared type;
//! - without a declared type the enclosing module names the caller.

use std::borrow::Cow;
use std::fmt;

/// Identity used when no caller can be attributed.
pub const ENGINE_IDENTITY: &str = "Logger";

/// Upper bound on backtrace frames inspected per call.
pub const MAX_FRAMES: usize = 32;

const ENGINE_FRAMES: &[&str] = &[
    concat!(env!("CARGO_CRATE_NAME"), "::logger::Logger"),
    concat!("<", env!("CARGO_CRATE_NAME"), "::logger::Logger"),
    concat!(env!("CARGO_CRATE_NAME"), "::caller::Caller"),
    concat!(env!("CARGO_CRATE_NAME"), "::caller::walk_stack"),
];

const RUNTIME_FRAMES: &[&str] = &[
    "std::",
    "core::",
    "alloc::",
    "<std::",
    "<core::",
    "<alloc::",
    "backtrace::",
    "test::",
    "__rust",
    "rust_begin_unwind",
    "<unknown>",
];

/// The logical originator of a log call.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Caller {
    name: Cow<'static, str>,
}

impl Caller {
    pub fn named(name: impl Into<Cow<'static, str>>) -> Self {
        let name = name.into();
        if name.trim().is_empty() {
            return Self::engine();
        }
        Self { name }
    }

    pub const fn engine() -> Self {
        Self {
            name: Cow::Borrowed(ENGINE_IDENTITY),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_engine(&self) -> bool {
        self.name == ENGINE_IDENTITY
    }

    /// Caller named after the last segment of a module path such as
    /// `game::net::session`.
    pub fn from_module_path(path: &str) -> Self {
        match segments(path).last() {
            Some(last) if !last.is_empty() => Self::named(last.to_string()),
            _ => Self::engine(),
        }
    }

    pub fn from_static_module_path(path: &'static str) -> Self {
        match segments(path).last() {
            Some(last) if !last.is_empty() => Self::named(*last),
            _ => Self::engine(),
        }
    }

    /// Caller named after the declared type `T`: `game::Player<u8>` gives
    /// `Player`. Types without a declared name fall back to their last path
    /// segment.
    pub fn of<T: ?Sized>() -> Self {
        let path = std::any::type_name::<T>();
        match nearest_type(&segments(path)) {
            Some(name) => Self::named(name),
            None => Self::from_static_module_path(path),
        }
    }

    /// Walks the current stack outward from the first frame outside the
    /// logger, resolving one frame at a time and stopping at the first
    /// identity or after [`MAX_FRAMES`] frames.
    ///
    /// Needs symbols: frames inlined away or stripped in optimized builds are
    /// invisible, so the result may name an outer module or fall back to
    /// [`Caller::engine`]. The walk only slices at ASCII separators and does
    /// not panic.
    pub fn from_stack() -> Self {
        walk_stack()
    }
}

impl fmt::Display for Caller {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// Location of a macro invocation, captured at compile time by
/// [`call_site!`](crate::call_site).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CallSite {
    pub module_path: &'static str,
    /// Path of a marker item declared at the call site, so it ends with the
    /// enclosing function and any closures around the call.
    pub item_path: &'static str,
    pub file: &'static str,
    pub line: u32,
}

impl CallSite {
    pub const fn new(
        module_path: &'static str,
        item_path: &'static str,
        file: &'static str,
        line: u32,
    ) -> Self {
        Self {
            module_path,
            item_path,
            file,
            line,
        }
    }

    pub fn resolve(&self) -> Caller {
        if let Some(ty) = nearest_type(&segments(self.item_path)) {
            return Caller::named(ty);
        }
        Caller::from_static_module_path(self.module_path)
    }
}

#[doc(hidden)]
pub fn item_path_of<T>(_: T) -> &'static str {
    std::any::type_name::<T>()
}

fn walk_stack() -> Caller {
    let mut found: Option<String> = None;
    let mut inspected = 0;
    backtrace::trace(|frame| {
        inspected += 1;
        // inlined functions show up as extra symbols of the same frame
        backtrace::resolve_frame(frame, |symbol| {
            if found.is_some() {
                return;
            }
            if let Some(name) = symbol.name() {
                found = inspect_symbol(&format!("{name:#}"));
            }
        });
        found.is_none() && inspected < MAX_FRAMES
    });
    found.map(Caller::named).unwrap_or_else(Caller::engine)
}

fn inspect_symbol(symbol: &str) -> Option<String> {
    let frame = strip_hash(symbol.trim());
    if is_runtime_frame(frame) || is_engine_frame(frame) {
        return None;
    }
    resolve_frame(frame)
}

fn is_runtime_frame(frame: &str) -> bool {
    RUNTIME_FRAMES.iter().any(|prefix| frame.starts_with(prefix))
}

fn is_engine_frame(frame: &str) -> bool {
    ENGINE_FRAMES.iter().any(|prefix| frame.starts_with(prefix))
}

fn resolve_frame(frame: &str) -> Option<String> {
    let segments = segments(frame);
    if let Some(ty) = nearest_type(&segments) {
        return Some(ty.to_string());
    }
    // free function: name the module around the innermost real function
    let function = segments.iter().rposition(|s| !is_synthetic(s))?;
    let module = segments[..function].last()?;
    Some(strip_disambiguator(module).to_string())
}

/// Drops the `::h0123456789abcdef` suffix of legacy mangled symbols.
fn strip_hash(symbol: &str) -> &str {
    match symbol.rsplit_once("::") {
        Some((head, tail))
            if tail.len() == 17
                && tail.starts_with('h')
                && tail[1..].bytes().all(|b| b.is_ascii_hexdigit()) =>
        {
            head
        }
        _ => symbol,
    }
}

/// Splits a path at `::` separators that are not nested inside `<...>`.
pub(crate) fn segments(path: &str) -> Vec<&str> {
    let mut out = Vec::new();
    let bytes = path.as_bytes();
    let mut depth = 0usize;
    let mut start = 0;
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'<' => depth += 1,
            b'>' if i > 0 && bytes[i - 1] == b'-' => {}
            b'>' => depth = depth.saturating_sub(1),
            b':' if depth == 0 && bytes.get(i + 1) == Some(&b':') => {
                out.push(&path[start..i]);
                i += 2;
                start = i;
                continue;
            }
            _ => {}
        }
        i += 1;
    }
    out.push(&path[start..]);
    out
}

/// Compiler generated scopes: closures, async blocks, shims.
pub(crate) fn is_synthetic(segment: &str) -> bool {
    segment.starts_with('{')
}

fn nearest_type<'a>(segments: &[&'a str]) -> Option<&'a str> {
    segments
        .iter()
        .rev()
        .copied()
        .filter(|s| !is_synthetic(s))
        .find_map(declared_type)
}

fn declared_type(segment: &str) -> Option<&str> {
    if let Some(inner) = segment.strip_prefix('<').and_then(|s| s.strip_suffix('>')) {
        let self_ty = inner.split(" as ").next().unwrap_or(inner);
        let self_ty = self_ty
            .trim_start_matches('&')
            .trim_start_matches("mut ")
            .trim_start_matches("dyn ");
        let last = segments(self_ty).last().copied()?;
        let name = strip_generics(strip_disambiguator(last));
        return (!name.is_empty()).then_some(name);
    }
    let name = strip_generics(strip_disambiguator(segment));
    name.starts_with(|c: char| c.is_ascii_uppercase())
        .then_some(name)
}

fn strip_generics(segment: &str) -> &str {
    segment.split('<').next().unwrap_or(segment)
}

/// Drops the `[0123abcd]` crate disambiguator of v0 demangled paths.
fn strip_disambiguator(segment: &str) -> &str {
    segment.split('[').next().unwrap_or(segment)
}
