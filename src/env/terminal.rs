// src/env/terminal.rs

use super::sink::StderrSink;
use super::{lookup, DefaultPolicy, Decoration, Environment, Parts};
use crate::color::{Color, ColorAllocator, Palette};
use crate::config::{ColorLevel, Config, FORCE_COLOR_VAR};
use crate::debugger::clock::Clock;
use crate::format::{host, Arg, Formatters};
use crate::matcher::MatcherCache;
use crate::utils::error::Result;
use crate::utils::humanize::humanize_ms;
use chrono::{DateTime, SecondsFormat};
use std::collections::HashMap;
use std::sync::{Arc, OnceLock};

const RESET: &str = "\u{1b}[0m";

/// Adapter for processes writing to a terminal or log file.
///
/// The source is `DEBUG`, read from a bindings map when one was given and
/// from the process environment otherwise. Lines are colored when stderr is
/// a TTY or `FORCE_COLOR` asks for it; uncolored lines start with an
/// ISO-8601 timestamp instead.
pub struct TerminalEnv {
    config: Config,
    bindings: Option<HashMap<String, String>>,
    level: ColorLevel,
    parts: Parts,
}

static SHARED: OnceLock<Arc<TerminalEnv>> = OnceLock::new();

impl TerminalEnv {
    /// Builds the adapter from the process environment.
    pub fn new() -> Self {
        let config = Config::from_env().unwrap_or_else(|err| {
            log::warn!("ignoring {}: {}", FORCE_COLOR_VAR, err);
            Config::default()
        });
        Self::with_config(config)
    }

    pub fn with_config(config: Config) -> Self {
        let level = config.stderr_color_level();
        Self {
            config,
            bindings: None,
            level,
            parts: Parts::new(palette_for(level), Formatters::rich(), StderrSink),
        }
    }

    /// The adapter shared by [`crate::debugger`], built on first use.
    pub fn shared() -> Arc<TerminalEnv> {
        Arc::clone(SHARED.get_or_init(|| Arc::new(TerminalEnv::new())))
    }

    /// Reads the source from `bindings` instead of the process environment.
    pub fn with_bindings(mut self, bindings: HashMap<String, String>) -> Self {
        self.bindings = Some(bindings);
        self
    }

    /// Overrides the detected color level; also picks the matching palette.
    pub fn with_color_level(mut self, level: ColorLevel) -> Self {
        self.level = level;
        self.parts.palette = palette_for(level);
        self
    }

    pub fn color_level(&self) -> ColorLevel {
        self.level
    }

    pub fn config(&self) -> &Config {
        &self.config
    }
}

super::impl_parts_builders!(TerminalEnv);

impl Default for TerminalEnv {
    fn default() -> Self {
        Self::new()
    }
}

fn palette_for(level: ColorLevel) -> Palette {
    if level >= ColorLevel::Ansi256 {
        Palette::ansi_256()
    } else {
        Palette::ansi_basic()
    }
}

fn iso_date(now_ms: i64) -> String {
    DateTime::from_timestamp_millis(now_ms)
        .map(|t| t.to_rfc3339_opts(SecondsFormat::Millis, true))
        .unwrap_or_default()
}

impl Environment for TerminalEnv {
    fn enablement_source(&self) -> Option<String> {
        match &self.bindings {
            Some(bindings) => lookup(bindings, &self.config.source_keys),
            None => self
                .config
                .source_keys
                .iter()
                .filter_map(|key| std::env::var(key).ok())
                .find(|value| !value.is_empty()),
        }
    }

    fn default_policy(&self) -> DefaultPolicy {
        DefaultPolicy::WhenMatched
    }

    fn supports_color(&self) -> bool {
        self.level > ColorLevel::None
    }

    fn palette(&self) -> &Palette {
        &self.parts.palette
    }

    fn allocator(&self) -> &ColorAllocator {
        &self.parts.allocator
    }

    fn clock(&self) -> &dyn Clock {
        self.parts.clock.as_ref()
    }

    fn formatters(&self) -> &Formatters {
        &self.parts.formatters
    }

    fn matchers(&self) -> &MatcherCache {
        &self.parts.matchers
    }

    fn decorate(&self, decoration: &Decoration<'_>, args: Vec<Arg>) -> Vec<String> {
        let body = host::render(&args);
        let elapsed = format!("+{}", humanize_ms(decoration.diff_ms));
        let code = if self.supports_color() {
            decoration.color.and_then(Color::ansi_code)
        } else {
            None
        };

        let line = match code {
            Some(code) => {
                let prefix = format!("  {};1m{} {}", code, decoration.namespace, RESET);
                let body = body.replace('\n', &format!("\n{}", prefix));
                format!("{}{} {}m{}{}", prefix, body, code, elapsed, RESET)
            }
            None => format!(
                "{} {} {} {}",
                iso_date(decoration.now_ms),
                decoration.namespace,
                body,
                elapsed
            ),
        };
        vec![line]
    }

    fn write(&self, line: &[String]) -> Result<()> {
        self.parts.sink.write(line)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::MemorySink;

    fn bindings(debug: &str) -> HashMap<String, String> {
        HashMap::from([("DEBUG".to_owned(), debug.to_owned())])
    }

    fn plain() -> TerminalEnv {
        TerminalEnv::with_config(Config::default().with_colors(false))
            .with_sink(MemorySink::new())
            .with_allocator(Arc::new(ColorAllocator::new()))
    }

    #[test]
    fn test_source_from_bindings() {
        let env = plain().with_bindings(bindings("app:*"));
        assert_eq!(env.enablement_source().as_deref(), Some("app:*"));
        assert!(env.is_enabled(Some("app:db")));
        assert!(!env.is_enabled(Some("other")));
    }

    #[test]
    fn test_default_debugger_needs_wildcard() {
        let env = plain().with_bindings(HashMap::new());
        assert!(!env.is_enabled(None));
        assert!(!env.is_enabled(Some("app")));

        let env = plain().with_bindings(bindings("app"));
        assert!(!env.is_enabled(None));

        let env = plain().with_bindings(bindings("*"));
        assert!(env.is_enabled(None));
    }

    #[test]
    fn test_plain_decoration() {
        let env = plain();
        let color = Color::Ansi(3);
        let decoration = Decoration {
            namespace: "test:foo",
            color: Some(&color),
            diff_ms: 12,
            now_ms: 0,
        };
        let line = env.decorate(&decoration, vec!["hello %s".into(), "world".into()]);
        assert_eq!(line, vec!["1970-01-01T00:00:00.000Z test:foo hello world +12ms".to_owned()]);
    }

    #[test]
    fn test_colored_decoration_prefixes_every_line() {
        let env = plain().with_color_level(ColorLevel::Basic);
        let color = Color::Ansi(3);
        let decoration = Decoration {
            namespace: "ns",
            color: Some(&color),
            diff_ms: 2000,
            now_ms: 0,
        };
        let line = env.decorate(&decoration, vec!["a\nb".into()]);
        let prefix = "  \u{1b}[33;1mns \u{1b}[0m";
        assert_eq!(
            line[0],
            format!("{prefix}a\n{prefix}b \u{1b}[33m+2s\u{1b}[0m")
        );
    }

    #[test]
    fn test_palette_follows_color_level() {
        assert_eq!(plain().with_color_level(ColorLevel::Ansi256).palette().len(), 10);
        assert_eq!(plain().with_color_level(ColorLevel::Basic).palette().len(), 6);
        assert!(!plain().supports_color());
    }
}
