use std::sync::Arc;

use snafu::prelude::*;

use crate::channel::Markup;
use crate::config::{editor_default, LoggerConfig};
use crate::error::{InvalidEntrySnafu, ParseToggleSnafu, Result, SettingSnafu};
use crate::palette::{Color, ColorTable};
use crate::severity::Severity;

pub const LEVEL_VAR: &str = "TINTLOG_LEVEL";
pub const EDITOR_VAR: &str = "TINTLOG_EDITOR";
pub const MARKUP_VAR: &str = "TINTLOG_MARKUP";
pub const COLORS_VAR: &str = "TINTLOG_COLORS";

/// Startup configuration of a logger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub filter: Severity,
    pub editor_enabled: bool,
    pub markup: Markup,
    pub colors: Vec<(String, Color)>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            filter: Severity::All,
            editor_enabled: editor_default(),
            markup: Markup::Plain,
            colors: Vec::new(),
        }
    }
}

impl Settings {
    /// Reads `TINTLOG_LEVEL`, `TINTLOG_EDITOR`, `TINTLOG_MARKUP` and
    /// `TINTLOG_COLORS`. Unset variables keep their defaults.
    pub fn from_env() -> Result<Self> {
        Self::from_source(|key| std::env::var(key).ok())
    }

    pub fn from_source<F>(source: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut settings = Settings::default();
        if let Some(level) = source(LEVEL_VAR) {
            settings.filter = level
                .parse::<Severity>()
                .context(SettingSnafu { key: LEVEL_VAR })?
                .as_filter();
        }
        if let Some(editor) = source(EDITOR_VAR) {
            settings.editor_enabled =
                parse_toggle(&editor).context(SettingSnafu { key: EDITOR_VAR })?;
        }
        if let Some(markup) = source(MARKUP_VAR) {
            settings.markup = markup
                .parse::<Markup>()
                .context(SettingSnafu { key: MARKUP_VAR })?;
        }
        if let Some(colors) = source(COLORS_VAR) {
            settings.colors =
                parse_colors(&colors).context(SettingSnafu { key: COLORS_VAR })?;
        }
        Ok(settings)
    }

    pub fn config(&self) -> Arc<LoggerConfig> {
        Arc::new(LoggerConfig::new(self.filter, self.editor_enabled))
    }

    pub fn palette(&self) -> Arc<ColorTable> {
        Arc::new(ColorTable::from_entries(self.colors.iter().cloned()))
    }
}

pub fn parse_toggle(input: &str) -> Result<bool> {
    match input.trim().to_lowercase().as_str() {
        "1" | "on" | "true" | "yes" => Ok(true),
        "0" | "off" | "false" | "no" => Ok(false),
        _ => ParseToggleSnafu { input }.fail(),
    }
}

/// Parses `Identity=color` entries separated by `,` or `;`.
pub fn parse_colors(input: &str) -> Result<Vec<(String, Color)>> {
    input
        .split([',', ';'])
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(|entry| -> Result<(String, Color)> {
            let (identity, color) = entry
                .split_once('=')
                .context(InvalidEntrySnafu { entry })?;
            let identity = identity.trim();
            ensure!(!identity.is_empty(), InvalidEntrySnafu { entry });
            Ok((identity.to_string(), color.parse::<Color>()?))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;
    use crate::error::Error;

    fn source(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| vars.get(key).cloned()
    }

    #[test]
    fn test_defaults_when_unset() {
        let settings = Settings::from_source(source(&[])).unwrap();
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_reads_all_values() {
        let settings = Settings::from_source(source(&[
            (LEVEL_VAR, "warning"),
            (EDITOR_VAR, "off"),
            (MARKUP_VAR, "rich"),
            (COLORS_VAR, "Player=#00ff00; Enemy = red,"),
        ]))
        .unwrap();
        assert_eq!(settings.filter, Severity::Warning);
        assert!(!settings.editor_enabled);
        assert_eq!(settings.markup, Markup::RichText);
        assert_eq!(
            settings.colors,
            vec![
                ("Player".to_string(), Color::rgb(0, 0xff, 0)),
                ("Enemy".to_string(), Color::rgb(0xff, 0, 0)),
            ]
        );
        assert!(!settings.config().editor_enabled());
        assert_eq!(settings.palette().len(), 2);
    }

    #[test]
    fn test_invalid_value_names_the_variable() {
        let err = Settings::from_source(source(&[(LEVEL_VAR, "loud")])).unwrap_err();
        assert!(matches!(err, Error::Setting { ref key, .. } if key.as_str() == LEVEL_VAR));
        assert!(err.to_string().contains("loud"));
    }

    #[test]
    fn test_bad_color_entries() {
        assert!(parse_colors("Player").is_err());
        assert!(parse_colors("=red").is_err());
        assert!(parse_colors("Player=blurple").is_err());
        assert!(parse_colors(" ").unwrap().is_empty());
    }

    #[test]
    fn test_toggle() {
        assert!(parse_toggle("ON").unwrap());
        assert!(!parse_toggle("0").unwrap());
        assert!(parse_toggle("maybe").is_err());
    }
}
