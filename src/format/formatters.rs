// src/format/formatters.rs

use super::arg::Arg;
use std::collections::HashMap;
use std::fmt;

/// Renders one consumed argument for a `%<letter>` directive.
pub type FormatFn = Box<dyn Fn(&Arg) -> String + Send + Sync>;

/// Prefix of the text substituted when `%j` cannot serialize its argument.
pub const JSON_ERROR_PREFIX: &str = "[UnexpectedJSONParseError]: ";

/// The directive handlers registered for an environment, keyed by letter.
#[derive(Default)]
pub struct Formatters {
    handlers: HashMap<char, FormatFn>,
}

impl Formatters {
    /// An empty registry; every directive is left for the output sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// The set every environment supports: `%j`.
    pub fn minimal() -> Self {
        Self::new().with('j', json)
    }

    /// `%j` plus `%o` (single-line dump) and `%O` (multi-line dump).
    pub fn rich() -> Self {
        Self::minimal()
            .with('o', |arg| arg.inspect(false))
            .with('O', |arg| arg.inspect(true))
    }

    /// Registers `handler` for `%<letter>`, replacing any previous one.
    pub fn with<F>(mut self, letter: char, handler: F) -> Self
    where
        F: Fn(&Arg) -> String + Send + Sync + 'static,
    {
        self.insert(letter, handler);
        self
    }

    pub fn insert<F>(&mut self, letter: char, handler: F)
    where
        F: Fn(&Arg) -> String + Send + Sync + 'static,
    {
        self.handlers.insert(letter, Box::new(handler));
    }

    pub fn get(&self, letter: char) -> Option<&FormatFn> {
        self.handlers.get(&letter)
    }

    pub fn contains(&self, letter: char) -> bool {
        self.handlers.contains_key(&letter)
    }
}

impl fmt::Debug for Formatters {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut letters: Vec<_> = self.handlers.keys().collect();
        letters.sort();
        f.debug_struct("Formatters").field("letters", &letters).finish()
    }
}

/// The `%j` handler. Never fails: serialization errors become a diagnostic.
pub fn json(arg: &Arg) -> String {
    arg.to_json()
        .unwrap_or_else(|err| format!("{}{}", JSON_ERROR_PREFIX, err))
}
