//! The debugger factory.
//!
//! A [`Debugger`] ties a namespace to an [`Environment`]. Each call asks the
//! environment whether the namespace is enabled *now*, so changing the
//! enablement source takes effect on the next call. Enabled calls measure
//! the time since the instance's previous enabled call, interpolate their
//! arguments and hand the decorated result to the environment's sink.
//!
//! ```ignore
//! use nsdebug::{debug, env::TerminalEnv, Debugger};
//!
//! let log = Debugger::new("auth", TerminalEnv::shared());
//! let login = log.extend("login");
//! debug!(login, "user %s signed in after %dms", "alice", 42);
//! ```

pub mod clock;
pub mod target;

pub use clock::{Clock, ManualClock, SystemClock};
pub use target::{DEFAULT_LABEL, Target};

use crate::color::Color;
use crate::env::{Decoration, Environment, TerminalEnv};
use crate::format::{Arg, interpolate};
use std::cell::Cell;
use std::fmt;
use std::sync::Arc;

enum Mode {
    Disabled,
    Forced(Arc<dyn Environment>),
    Matched(Arc<dyn Environment>),
}

/// A namespace-bound conditional logger.
///
/// Instances are owned by their creator; the elapsed-time state is not
/// synchronised, so a debugger can move between threads but not be shared.
pub struct Debugger {
    mode: Mode,
    namespace: Option<String>,
    color: Option<Color>,
    previous_ms: Cell<i64>,
}

impl Debugger {
    /// Creates a debugger for `target` reporting through `env`.
    pub fn new(target: impl Into<Target>, env: Arc<dyn Environment>) -> Self {
        match target.into() {
            Target::Disabled => Self::disabled(),
            Target::Forced => Self::build(Mode::Forced(env), None),
            Target::Named(namespace) => Self::build(Mode::Matched(env), Some(namespace)),
            Target::Default => Self::build(Mode::Matched(env), None),
        }
    }

    /// A debugger that never emits. Extending it yields another one.
    pub fn disabled() -> Self {
        Self {
            mode: Mode::Disabled,
            namespace: None,
            color: None,
            previous_ms: Cell::new(0),
        }
    }

    fn build(mode: Mode, namespace: Option<String>) -> Self {
        let env = match &mode {
            Mode::Forced(env) | Mode::Matched(env) => env,
            Mode::Disabled => return Self::disabled(),
        };
        let label = namespace.as_deref().unwrap_or(DEFAULT_LABEL);
        let color = env.allocator().select(label, env.palette());
        let now = env.clock().now_ms();
        Self {
            namespace,
            color: Some(color),
            previous_ms: Cell::new(now),
            mode,
        }
    }

    /// The namespace as displayed; the default label for unnamed debuggers.
    pub fn namespace(&self) -> &str {
        self.namespace.as_deref().unwrap_or(DEFAULT_LABEL)
    }

    /// The color assigned at creation. Disabled debuggers have none.
    pub fn color(&self) -> Option<&Color> {
        self.color.as_ref()
    }

    pub fn is_forced(&self) -> bool {
        matches!(self.mode, Mode::Forced(_))
    }

    pub fn is_disabled(&self) -> bool {
        matches!(self.mode, Mode::Disabled)
    }

    /// Whether a call made now would emit.
    pub fn enabled(&self) -> bool {
        match &self.mode {
            Mode::Disabled => false,
            Mode::Forced(_) => true,
            Mode::Matched(env) => env.is_enabled(self.namespace.as_deref()),
        }
    }

    /// Emits `args` if enabled. The first argument is the template.
    ///
    /// Never fails: sink errors are reported through the `log` facade and
    /// otherwise dropped.
    pub fn log(&self, args: Vec<Arg>) {
        if !self.enabled() {
            return;
        }
        let env = match &self.mode {
            Mode::Forced(env) | Mode::Matched(env) => env,
            Mode::Disabled => return,
        };

        let now = env.clock().now_ms();
        let diff = now - self.previous_ms.replace(now);

        let args = interpolate(args, env.formatters());
        let decoration = Decoration {
            namespace: self.namespace(),
            color: self.color.as_ref(),
            diff_ms: diff,
            now_ms: now,
        };
        let line = env.decorate(&decoration, args);

        if let Err(err) = env.write(&line) {
            log::warn!("dropping debug output for {}: {}", self.namespace(), err);
        }
    }

    /// Creates an independent child debugger for `namespace:suffix` in the
    /// same environment, keeping the forced or disabled state.
    pub fn extend(&self, suffix: &str) -> Debugger {
        let namespace = format!("{}:{}", self.namespace(), suffix);
        match &self.mode {
            Mode::Disabled => Self::disabled(),
            Mode::Forced(env) => Self::build(Mode::Forced(Arc::clone(env)), Some(namespace)),
            Mode::Matched(env) => Self::build(Mode::Matched(Arc::clone(env)), Some(namespace)),
        }
    }
}

impl fmt::Debug for Debugger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mode = match self.mode {
            Mode::Disabled => "disabled",
            Mode::Forced(_) => "forced",
            Mode::Matched(_) => "matched",
        };
        f.debug_struct("Debugger")
            .field("namespace", &self.namespace())
            .field("mode", &mode)
            .field("color", &self.color)
            .finish()
    }
}

/// Creates a debugger reporting through `env`.
pub fn create(target: impl Into<Target>, env: Arc<dyn Environment>) -> Debugger {
    Debugger::new(target, env)
}

/// Creates a debugger reporting through the shared process terminal adapter.
pub fn debugger(target: impl Into<Target>) -> Debugger {
    Debugger::new(target, TerminalEnv::shared())
}
