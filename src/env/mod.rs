//! Environment adapters.
//!
//! The debugger core is written once against [`Environment`]. An adapter
//! supplies the current enablement source, decides whether the unnamed
//! debugger logs, and owns presentation: palette, directive handlers,
//! decoration and the output sink.
//!
//! - [`TerminalEnv`]: process environment, ANSI colors, standard error.
//! - [`ConsoleEnv`]: persisted settings, `%c` CSS-styled console output.
//! - [`WorkerEnv`]: runtime bindings, plain console output.

pub mod console;
pub mod sink;
pub mod terminal;
pub mod worker;

pub use console::{ConsoleEnv, Storage, supports_css_colors};
pub use sink::{ConsoleSink, MemorySink, Sink, StderrSink, StdoutSink, WriterSink};
pub use terminal::TerminalEnv;
pub use worker::{WorkerEnv, set_global_debug};

use crate::color::{Color, ColorAllocator, Palette};
use crate::debugger::clock::{Clock, SystemClock};
use crate::format::{Arg, Formatters};
use crate::matcher::{MatcherCache, MatcherSet};
use crate::utils::error::Result;
use std::collections::HashMap;
use std::sync::Arc;

/// When the unnamed default debugger is allowed to log.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DefaultPolicy {
    /// Only when no enablement source is configured at all (or it is `*`).
    WhenUnconfigured,
    /// Only when the source enables everything.
    WhenMatched,
}

/// Per-call data handed to the presentation step.
#[derive(Debug, Clone, Copy)]
pub struct Decoration<'a> {
    pub namespace: &'a str,
    pub color: Option<&'a Color>,
    /// Milliseconds since the debugger's previous enabled call.
    pub diff_ms: i64,
    /// Wall-clock time of this call, in milliseconds since the epoch.
    pub now_ms: i64,
}

/// The capabilities the debugger core needs from its host.
pub trait Environment: Send + Sync {
    /// The enablement source as currently configured, read fresh on every
    /// call.
    fn enablement_source(&self) -> Option<String>;

    fn default_policy(&self) -> DefaultPolicy;

    fn supports_color(&self) -> bool;

    fn palette(&self) -> &Palette;

    fn allocator(&self) -> &ColorAllocator;

    fn clock(&self) -> &dyn Clock;

    fn formatters(&self) -> &Formatters;

    fn matchers(&self) -> &MatcherCache;

    /// Applies colors, namespace and elapsed time to an interpolated
    /// argument list.
    fn decorate(&self, decoration: &Decoration<'_>, args: Vec<Arg>) -> Vec<String>;

    fn write(&self, line: &[String]) -> Result<()>;

    /// Decides whether `namespace` (or the unnamed debugger, for `None`)
    /// currently logs. An empty source counts as unconfigured.
    fn is_enabled(&self, namespace: Option<&str>) -> bool {
        let source = self
            .enablement_source()
            .filter(|source| !source.trim().is_empty());
        match (namespace, source) {
            (_, Some(source)) if MatcherSet::is_wildcard_everything(&source) => true,
            (None, None) => self.default_policy() == DefaultPolicy::WhenUnconfigured,
            (None, Some(_)) | (Some(_), None) => false,
            (Some(namespace), Some(source)) => self.matchers().get(&source).matches(namespace),
        }
    }
}

/// State every adapter carries besides its own settings.
pub(crate) struct Parts {
    pub palette: Palette,
    pub formatters: Formatters,
    pub sink: Box<dyn Sink>,
    pub matchers: MatcherCache,
    pub allocator: Arc<ColorAllocator>,
    pub clock: Arc<dyn Clock>,
}

impl Parts {
    pub fn new(palette: Palette, formatters: Formatters, sink: impl Sink + 'static) -> Self {
        Self {
            palette,
            formatters,
            sink: Box::new(sink),
            matchers: MatcherCache::new(),
            allocator: ColorAllocator::shared(),
            clock: Arc::new(SystemClock),
        }
    }
}

/// First non-empty value among `keys` in a bindings map.
pub(crate) fn lookup(bindings: &HashMap<String, String>, keys: &[String]) -> Option<String> {
    keys.iter()
        .filter_map(|key| bindings.get(key))
        .find(|value| !value.is_empty())
        .cloned()
}

/// Wraps the adapter-specific settings in the same builder methods.
macro_rules! impl_parts_builders {
    ($ty:ty) => {
        impl $ty {
            /// Sends output to `sink` instead of the default stream.
            pub fn with_sink(mut self, sink: impl $crate::env::Sink + 'static) -> Self {
                self.parts.sink = Box::new(sink);
                self
            }

            /// Uses `allocator` instead of the process-wide one.
            pub fn with_allocator(
                mut self,
                allocator: std::sync::Arc<$crate::color::ColorAllocator>,
            ) -> Self {
                self.parts.allocator = allocator;
                self
            }

            pub fn with_clock(
                mut self,
                clock: std::sync::Arc<dyn $crate::debugger::clock::Clock>,
            ) -> Self {
                self.parts.clock = clock;
                self
            }

            pub fn with_palette(mut self, palette: $crate::color::Palette) -> Self {
                self.parts.palette = palette;
                self
            }

            pub fn with_formatters(mut self, formatters: $crate::format::Formatters) -> Self {
                self.parts.formatters = formatters;
                self
            }
        }
    };
}

pub(crate) use impl_parts_builders;
