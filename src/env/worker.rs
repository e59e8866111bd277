// src/env/worker.rs

use super::sink::StdoutSink;
use super::{lookup, DefaultPolicy, Decoration, Environment, Parts};
use crate::color::{ColorAllocator, Palette};
use crate::config::DEBUG_VAR;
use crate::debugger::clock::Clock;
use crate::format::{host, Arg, Formatters};
use crate::matcher::MatcherCache;
use crate::utils::error::Result;
use crate::utils::humanize::humanize_ms;
use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

/// Process-wide `DEBUG` override, consulted when a worker has no binding.
static GLOBAL_DEBUG: RwLock<Option<String>> = RwLock::new(None);

/// Sets (or with `None`, clears) the global `DEBUG` override.
pub fn set_global_debug(value: Option<&str>) {
    *GLOBAL_DEBUG.write().unwrap_or_else(PoisonError::into_inner) = value.map(str::to_owned);
}

fn global_debug() -> Option<String> {
    GLOBAL_DEBUG
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .clone()
        .filter(|value| !value.is_empty())
}

/// Adapter for edge/worker runtimes: no persisted settings, no styling.
///
/// The source is `DEBUG` from the runtime bindings, then the global
/// override, then the process environment. Output is `<ns> <msg> +<diff>`.
pub struct WorkerEnv {
    bindings: HashMap<String, String>,
    source_keys: Vec<String>,
    parts: Parts,
}

impl WorkerEnv {
    pub fn new() -> Self {
        Self {
            bindings: HashMap::new(),
            source_keys: vec![DEBUG_VAR.to_owned()],
            parts: Parts::new(Palette::worker(), Formatters::minimal(), StdoutSink),
        }
    }

    pub fn with_bindings(mut self, bindings: HashMap<String, String>) -> Self {
        self.bindings = bindings;
        self
    }
}

super::impl_parts_builders!(WorkerEnv);

impl Default for WorkerEnv {
    fn default() -> Self {
        Self::new()
    }
}

impl Environment for WorkerEnv {
    fn enablement_source(&self) -> Option<String> {
        lookup(&self.bindings, &self.source_keys)
            .or_else(global_debug)
            .or_else(|| {
                self.source_keys
                    .iter()
                    .filter_map(|key| std::env::var(key).ok())
                    .find(|value| !value.is_empty())
            })
    }

    fn default_policy(&self) -> DefaultPolicy {
        DefaultPolicy::WhenUnconfigured
    }

    fn supports_color(&self) -> bool {
        false
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
        vec![format!(
            "{} {} +{}",
            decoration.namespace,
            host::render(&args),
            humanize_ms(decoration.diff_ms)
        )]
    }

    fn write(&self, line: &[String]) -> Result<()> {
        self.parts.sink.write(line)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_debug(debug: &str) -> WorkerEnv {
        WorkerEnv::new().with_bindings(HashMap::from([("DEBUG".to_owned(), debug.to_owned())]))
    }

    #[test]
    fn test_bindings_decide() {
        let env = with_debug("api:*");
        assert!(env.is_enabled(Some("api:users")));
        assert!(!env.is_enabled(Some("cron")));
        assert!(!env.is_enabled(None));
        assert!(!env.supports_color());
    }

    #[test]
    fn test_wildcard_enables_default() {
        let env = with_debug("*");
        assert!(env.is_enabled(None));
        assert!(env.is_enabled(Some("anything")));
    }

    #[test]
    fn test_decoration() {
        let env = WorkerEnv::new();
        let decoration = Decoration {
            namespace: "api",
            color: None,
            diff_ms: 1500,
            now_ms: 0,
        };
        let out = env.decorate(&decoration, vec!["req %s".into(), "/users".into()]);
        assert_eq!(out, vec!["api req /users +2s"]);

        let out = env.decorate(&decoration, vec!["%O".into(), Arg::Error(vec!["boom".into()])]);
        assert_eq!(out, vec!["api boom +2s"]);
    }
}
