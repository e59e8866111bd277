// src/utils/log.rs

//! Bridge from the `log` facade to namespaced debuggers.
//!
//! Records are routed by target: `my_app::db::pool` becomes the namespace
//! `my_app:db:pool`, so `DEBUG=my_app:db:*` enables a whole module tree.
//! Levels are ignored; a target is either on or off.
//!
//! ```ignore
//! nsdebug::utils::log::init(nsdebug::env::TerminalEnv::shared())?;
//! log::info!(target: "app::startup", "listening on {}", addr);
//! ```
//!
//! Records emitted by this crate itself are never routed back into it.

use crate::debugger::{Debugger, Target};
use crate::env::Environment;
use crate::format::Arg;
use crate::utils::error::Result;
use log::{LevelFilter, Log, Metadata, Record};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

const OWN_TARGET: &str = env!("CARGO_CRATE_NAME");

/// A `log::Log` implementation that emits through one debugger per target.
pub struct NamespaceLogger {
    env: Arc<dyn Environment>,
    debuggers: Mutex<HashMap<String, Debugger>>,
}

impl NamespaceLogger {
    pub fn new(env: Arc<dyn Environment>) -> Self {
        Self {
            env,
            debuggers: Mutex::new(HashMap::new()),
        }
    }

    /// Maps a `log` target (a module path) to a namespace.
    pub fn namespace_for(target: &str) -> String {
        target.replace("::", ":")
    }

    fn is_own(target: &str) -> bool {
        target == OWN_TARGET
            || target
                .strip_prefix(OWN_TARGET)
                .is_some_and(|rest| rest.starts_with("::"))
    }
}

impl Log for NamespaceLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        let target = metadata.target();
        !Self::is_own(target) && self.env.is_enabled(Some(&Self::namespace_for(target)))
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let namespace = Self::namespace_for(record.target());
        // The message is already formatted; escape it so it is not read as
        // a template.
        let message = record.args().to_string().replace('%', "%%");

        let mut debuggers = self.debuggers.lock().unwrap_or_else(PoisonError::into_inner);
        let debugger = debuggers.entry(namespace.clone()).or_insert_with(|| {
            Debugger::new(Target::Named(namespace), Arc::clone(&self.env))
        });
        debugger.log(vec![Arg::Str(message)]);
    }

    fn flush(&self) {}
}

/// Installs a [`NamespaceLogger`] as the global `log` logger.
///
/// Fails if another logger was installed first.
pub fn init(env: Arc<dyn Environment>) -> Result<()> {
    log::set_boxed_logger(Box::new(NamespaceLogger::new(env)))?;
    log::set_max_level(LevelFilter::Trace);
    Ok(())
}
