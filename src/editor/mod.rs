//! Development-only logging channel.
//!
//! The `editor` feature picks the implementation: with it, calls are gated at
//! runtime by [`LoggerConfig::editor_enabled`](crate::LoggerConfig::editor_enabled);
//! without it every method is an empty inline function and producers are
//! never called.

#[cfg(feature = "editor")]
mod enabled;
#[cfg(feature = "editor")]
pub use enabled::EditorGate;

#[cfg(not(feature = "editor"))]
mod disabled;
#[cfg(not(feature = "editor"))]
pub use disabled::EditorGate;
