use std::fmt;
use std::str::FromStr;

use crate::error::{Error, ParseSeveritySnafu};

/// Severity of a log call, also used as the filter threshold.
///
/// The ordered levels are `All < Information < Warning < Error < Exception < None`.
/// `Always` sits outside that order: it is emitted whatever the filter says.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(u8)]
pub enum Severity {
    #[default]
    All = 0,
    Information = 1,
    Warning = 2,
    Error = 3,
    Exception = 4,
    None = 5,
    Always = 6,
}

impl Severity {
    pub const ORDERED: [Severity; 6] = [
        Severity::All,
        Severity::Information,
        Severity::Warning,
        Severity::Error,
        Severity::Exception,
        Severity::None,
    ];

    /// Position in the filter order. `Always` has none.
    pub fn rank(self) -> Option<u8> {
        match self {
            Severity::Always => None,
            level => Some(level as u8),
        }
    }

    pub fn as_raw(self) -> u8 {
        self as u8
    }

    pub fn from_raw(raw: u8) -> Option<Severity> {
        match raw {
            0 => Some(Severity::All),
            1 => Some(Severity::Information),
            2 => Some(Severity::Warning),
            3 => Some(Severity::Error),
            4 => Some(Severity::Exception),
            5 => Some(Severity::None),
            6 => Some(Severity::Always),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Severity::All => "all",
            Severity::Information => "information",
            Severity::Warning => "warning",
            Severity::Error => "error",
            Severity::Exception => "exception",
            Severity::None => "none",
            Severity::Always => "always",
        }
    }

    /// `Always` cannot act as a threshold; it is treated as `All`.
    pub fn as_filter(self) -> Severity {
        match self {
            Severity::Always => Severity::All,
            level => level,
        }
    }
}

/// Whether a call at `severity` passes the threshold `filter`.
pub fn should_log(severity: Severity, filter: Severity) -> bool {
    let filter = filter.as_filter();
    match severity.rank() {
        None => true,
        Some(rank) => filter != Severity::None && rank >= filter as u8,
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Severity {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "all" => Ok(Severity::All),
            "info" | "information" => Ok(Severity::Information),
            "warn" | "warning" => Ok(Severity::Warning),
            "error" => Ok(Severity::Error),
            "exception" => Ok(Severity::Exception),
            "none" | "off" => Ok(Severity::None),
            "always" => Ok(Severity::Always),
            _ => ParseSeveritySnafu { input: s }.fail(),
        }
    }
}

impl From<log::Level> for Severity {
    fn from(level: log::Level) -> Self {
        match level {
            log::Level::Error => Severity::Error,
            log::Level::Warn => Severity::Warning,
            log::Level::Info => Severity::Information,
            log::Level::Debug | log::Level::Trace => Severity::All,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [Severity; 7] = [
        Severity::All,
        Severity::Information,
        Severity::Warning,
        Severity::Error,
        Severity::Exception,
        Severity::None,
        Severity::Always,
    ];

    #[test]
    fn test_always_ignores_filter() {
        for filter in ALL {
            assert!(should_log(Severity::Always, filter), "filter {filter}");
        }
    }

    #[test]
    fn test_ordered_levels_against_filter() {
        for filter in Severity::ORDERED {
            for severity in Severity::ORDERED {
                let expected = filter != Severity::None && severity as u8 >= filter as u8;
                assert_eq!(
                    should_log(severity, filter),
                    expected,
                    "severity {severity}, filter {filter}"
                );
            }
        }
    }

    #[test]
    fn test_none_filter_is_a_kill_switch() {
        assert!(!should_log(Severity::Exception, Severity::None));
        assert!(!should_log(Severity::None, Severity::None));
    }

    #[test]
    fn test_always_as_filter_behaves_like_all() {
        assert!(should_log(Severity::All, Severity::Always));
        assert!(should_log(Severity::Information, Severity::Always));
    }

    #[test]
    fn test_parse() {
        assert_eq!("Warn".parse::<Severity>().unwrap(), Severity::Warning);
        assert_eq!(" info ".parse::<Severity>().unwrap(), Severity::Information);
        assert_eq!("off".parse::<Severity>().unwrap(), Severity::None);
        assert!("verbose".parse::<Severity>().is_err());
    }

    #[test]
    fn test_raw() {
        for severity in ALL {
            assert_eq!(Severity::from_raw(severity.as_raw()), Some(severity));
        }
        assert_eq!(Severity::from_raw(7), None);
    }

    #[test]
    fn test_from_log_level() {
        assert_eq!(Severity::from(log::Level::Warn), Severity::Warning);
        assert_eq!(Severity::from(log::Level::Trace), Severity::All);
    }
}
