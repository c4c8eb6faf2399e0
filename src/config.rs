use std::sync::atomic::{AtomicBool, AtomicU8, Ordering};

use crate::severity::Severity;

/// Runtime switches shared by a [`Logger`](crate::Logger) and its
/// [`EditorGate`](crate::EditorGate).
///
/// Both values are plain single-word loads and stores, there is no
/// read-modify-write anywhere.
#[derive(Debug)]
pub struct LoggerConfig {
    filter: AtomicU8,
    editor_enabled: AtomicBool,
}

impl LoggerConfig {
    pub fn new(filter: Severity, editor_enabled: bool) -> Self {
        Self {
            filter: AtomicU8::new(filter.as_filter().as_raw()),
            editor_enabled: AtomicBool::new(editor_enabled),
        }
    }

    pub fn filter(&self) -> Severity {
        Severity::from_raw(self.filter.load(Ordering::Relaxed)).unwrap_or_default()
    }

    pub fn set_filter(&self, filter: Severity) {
        self.filter
            .store(filter.as_filter().as_raw(), Ordering::Relaxed);
    }

    pub fn editor_enabled(&self) -> bool {
        self.editor_enabled.load(Ordering::Relaxed)
    }

    pub fn set_editor_enabled(&self, enabled: bool) {
        self.editor_enabled.store(enabled, Ordering::Relaxed);
    }
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self::new(Severity::All, editor_default())
    }
}

/// Editor channel default for this build: on in development builds that
/// compile the channel in, off everywhere else.
pub const fn editor_default() -> bool {
    cfg!(all(feature = "editor", debug_assertions))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = LoggerConfig::default();
        assert_eq!(config.filter(), Severity::All);
        assert_eq!(config.editor_enabled(), editor_default());
    }

    #[test]
    fn test_set_filter() {
        let config = LoggerConfig::default();
        config.set_filter(Severity::Exception);
        assert_eq!(config.filter(), Severity::Exception);
        config.set_filter(Severity::Always);
        assert_eq!(config.filter(), Severity::All);
    }

    #[test]
    fn test_editor_flag_is_independent_of_filter() {
        let config = LoggerConfig::new(Severity::None, true);
        assert!(config.editor_enabled());
        config.set_editor_enabled(false);
        assert!(!config.editor_enabled());
        assert_eq!(config.filter(), Severity::None);
    }
}
