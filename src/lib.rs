//! Namespace-scoped conditional debug logging.
//!
//! Create a [`Debugger`] for a colon-separated namespace; its calls print only
//! while the namespace matches the enablement source (the `DEBUG` variable, a
//! persisted setting, or runtime bindings, depending on the environment).
//!
//! # Quick Start
//!
//! ```ignore
//! use nsdebug::{debug, debugger};
//!
//! // DEBUG="auth:*" cargo run
//! let log = debugger("auth");
//! let login = log.extend("login");
//!
//! debug!(login, "user %s logged in", "alice");   // printed
//! debug!(log, "token %j", serde_json::json!({"exp": 60}));   // not printed
//! ```
//!
//! # Features
//!
//! - **Pattern matching**: `*` wildcards, comma/space separated lists, `-` exclusions
//! - **Stable colors**: namespaces hash to a palette slot; active namespaces don't collide
//! - **Directives**: `%j`, `%o`, `%O` plus custom handlers; `%s`/`%d` via the sink
//! - **Elapsed time**: every line shows the time since that debugger's previous line
//! - **Environments**: terminal (ANSI), styled console (`%c` CSS), workers (plain)
//! - **`log` bridge**: route `log` records through namespaces by target

// Core modules
pub mod color;
pub mod config;
pub mod debugger;
pub mod env;
pub mod format;
pub mod matcher;
pub mod noop;
pub mod utils;

// Factory API
pub use debugger::{Debugger, Target, create, debugger};

// Building blocks
pub use color::{Color, ColorAllocator, Palette};
pub use format::{Arg, Formatters, interpolate};
pub use matcher::MatcherSet;

// Error types
pub use utils::error::{DebugError, Result};

/// Logs through a [`Debugger`], converting each argument with [`Arg::from`].
///
/// ```ignore
/// let db = nsdebug::debugger("db");
/// nsdebug::debug!(db, "query took %dms", 12);
/// ```
#[macro_export]
macro_rules! debug {
    ($dbg:expr $(,)?) => {
        $dbg.log(::std::vec::Vec::new())
    };
    ($dbg:expr, $($arg:expr),+ $(,)?) => {
        $dbg.log(::std::vec![$($crate::format::Arg::from($arg)),+])
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::{MemorySink, TerminalEnv};
    use std::collections::HashMap;
    use std::sync::Arc;

    #[test]
    fn test_macro_converts_arguments() {
        let sink = MemorySink::new();
        let env = TerminalEnv::with_config(config::Config::default().with_colors(false))
            .with_bindings(HashMap::from([("DEBUG".to_owned(), "*".to_owned())]))
            .with_sink(sink.clone())
            .with_allocator(Arc::new(ColorAllocator::new()));
        let dbg = create("macro", Arc::new(env));

        debug!(dbg, "%s=%d %j", "n", 3, serde_json::json!({"ok": true}));
        debug!(dbg);

        let lines = sink.lines();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].contains(r#"macro n=3 {"ok":true} +"#), "{}", lines[0]);
    }
}
