// src/config.rs

//! Presentation settings read from the process environment or a bindings map.

use crate::utils::error::{DebugError, Result};
use std::collections::HashMap;
use std::io::IsTerminal;
use std::str::FromStr;

/// Variable holding the enablement source in process environments.
pub const DEBUG_VAR: &str = "DEBUG";
/// Variable consulted before `DEBUG` by browser-style bundles.
pub const VITE_DEBUG_VAR: &str = "VITE_DEBUG";
/// Forces (or, with `0`/`false`, suppresses) colored terminal output.
pub const FORCE_COLOR_VAR: &str = "FORCE_COLOR";

/// How many colors the terminal can show.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ColorLevel {
    None = 0,
    Basic = 1,
    Ansi256 = 2,
    TrueColor = 3,
}

impl FromStr for ColorLevel {
    type Err = DebugError;

    /// Parses a `FORCE_COLOR` value. An empty value means "on".
    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "" | "true" | "1" => Ok(ColorLevel::Basic),
            "false" | "0" => Ok(ColorLevel::None),
            "2" => Ok(ColorLevel::Ansi256),
            "3" => Ok(ColorLevel::TrueColor),
            _ => Err(DebugError::InvalidColorLevel(s.to_owned())),
        }
    }
}

impl ColorLevel {
    /// Guesses the level of a terminal from its `TERM` and `COLORTERM`.
    pub fn from_terminal_vars(term: Option<&str>, colorterm: Option<&str>) -> Self {
        if matches!(colorterm, Some("truecolor" | "24bit")) {
            return ColorLevel::TrueColor;
        }
        match term {
            Some("dumb") => ColorLevel::None,
            Some(t) if t.contains("256") => ColorLevel::Ansi256,
            _ => ColorLevel::Basic,
        }
    }
}

/// Settings for an environment adapter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Keys looked up, in order, for the enablement source.
    pub source_keys: Vec<String>,
    /// Level requested through `FORCE_COLOR`, if any.
    pub force_color: Option<ColorLevel>,
    /// Explicit override of color detection.
    pub use_colors: Option<bool>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            source_keys: vec![DEBUG_VAR.to_owned()],
            force_color: None,
            use_colors: None,
        }
    }
}

impl Config {
    /// Reads `FORCE_COLOR` from the process environment.
    pub fn from_env() -> Result<Self> {
        let force_color = std::env::var(FORCE_COLOR_VAR)
            .ok()
            .map(|v| v.parse())
            .transpose()?;
        Ok(Self {
            force_color,
            ..Self::default()
        })
    }

    /// Reads `FORCE_COLOR` from a bindings map instead of the process.
    pub fn from_bindings(bindings: &HashMap<String, String>) -> Result<Self> {
        let force_color = bindings
            .get(FORCE_COLOR_VAR)
            .map(|v| v.parse())
            .transpose()?;
        Ok(Self {
            force_color,
            ..Self::default()
        })
    }

    pub fn with_source_keys<I, S>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.source_keys = keys.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_force_color(mut self, level: ColorLevel) -> Self {
        self.force_color = Some(level);
        self
    }

    pub fn with_colors(mut self, use_colors: bool) -> Self {
        self.use_colors = Some(use_colors);
        self
    }

    /// Resolves the color level for output written to stderr.
    pub fn stderr_color_level(&self) -> ColorLevel {
        let detected = || {
            if !std::io::stderr().is_terminal() {
                return ColorLevel::None;
            }
            ColorLevel::from_terminal_vars(
                std::env::var("TERM").ok().as_deref(),
                std::env::var("COLORTERM").ok().as_deref(),
            )
        };
        match (self.use_colors, self.force_color) {
            (Some(false), _) => ColorLevel::None,
            (Some(true), Some(level)) => level.max(ColorLevel::Basic),
            (Some(true), None) => detected().max(ColorLevel::Basic),
            (None, Some(level)) => level,
            (None, None) => detected(),
        }
    }
}

/// Whether a deployment name such as `NODE_ENV` denotes a development build.
pub fn should_log(env_name: &str) -> bool {
    matches!(env_name, "development" | "test")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_force_color_parsing() {
        assert_eq!("".parse::<ColorLevel>().unwrap(), ColorLevel::Basic);
        assert_eq!("true".parse::<ColorLevel>().unwrap(), ColorLevel::Basic);
        assert_eq!("0".parse::<ColorLevel>().unwrap(), ColorLevel::None);
        assert_eq!("2".parse::<ColorLevel>().unwrap(), ColorLevel::Ansi256);
        assert_eq!("3".parse::<ColorLevel>().unwrap(), ColorLevel::TrueColor);
        assert!(matches!(
            "loud".parse::<ColorLevel>(),
            Err(DebugError::InvalidColorLevel(v)) if v == "loud"
        ));
    }

    #[test]
    fn test_terminal_detection() {
        assert_eq!(
            ColorLevel::from_terminal_vars(Some("xterm"), Some("truecolor")),
            ColorLevel::TrueColor
        );
        assert_eq!(
            ColorLevel::from_terminal_vars(Some("xterm-256color"), None),
            ColorLevel::Ansi256
        );
        assert_eq!(ColorLevel::from_terminal_vars(Some("dumb"), None), ColorLevel::None);
        assert_eq!(ColorLevel::from_terminal_vars(None, None), ColorLevel::Basic);
    }

    #[test]
    fn test_from_bindings() {
        let mut bindings = HashMap::new();
        bindings.insert(FORCE_COLOR_VAR.to_owned(), "2".to_owned());
        let config = Config::from_bindings(&bindings).unwrap();
        assert_eq!(config.force_color, Some(ColorLevel::Ansi256));
        assert_eq!(config.source_keys, vec![DEBUG_VAR.to_owned()]);

        bindings.insert(FORCE_COLOR_VAR.to_owned(), "nope".to_owned());
        assert!(Config::from_bindings(&bindings).is_err());
    }

    #[test]
    fn test_explicit_overrides() {
        let off = Config::default()
            .with_force_color(ColorLevel::TrueColor)
            .with_colors(false);
        assert_eq!(off.stderr_color_level(), ColorLevel::None);

        let forced = Config::default().with_force_color(ColorLevel::Ansi256);
        assert_eq!(forced.stderr_color_level(), ColorLevel::Ansi256);

        let on = Config::default()
            .with_force_color(ColorLevel::None)
            .with_colors(true);
        assert_eq!(on.stderr_color_level(), ColorLevel::Basic);
    }

    #[test]
    fn test_should_log() {
        assert!(should_log("development"));
        assert!(should_log("test"));
        assert!(!should_log("production"));
        assert!(!should_log(""));
    }
}
