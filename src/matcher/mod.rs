//! Enablement pattern matching.
//!
//! An enablement source such as `"app:*, db -db:verbose"` compiles into a
//! [`MatcherSet`]. Tokens are separated by runs of whitespace and/or commas,
//! `*` matches any run of characters, and every token is anchored at both
//! ends. A token starting with `-` is an exclusion: a namespace matching it is
//! rejected even when an inclusion token also matches.
//!
//! The literal source `*` enables everything, including the unnamed default
//! debugger, without compiling any per-token pattern.

pub mod pattern;

pub use pattern::Pattern;

use std::sync::{Arc, Mutex, PoisonError};

/// The wildcard source that enables every namespace.
pub const EVERYTHING: &str = "*";

/// Compiled form of an enablement source. Immutable once built.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MatcherSet {
    everything: bool,
    include: Vec<Pattern>,
    exclude: Vec<Pattern>,
}

impl MatcherSet {
    /// Compiles `source`. Empty tokens are dropped; an empty source yields a
    /// set that matches nothing.
    pub fn compile(source: &str) -> Self {
        if Self::is_wildcard_everything(source) {
            return Self {
                everything: true,
                ..Self::default()
            };
        }

        let mut set = Self::default();
        for token in source
            .split(|c: char| c.is_whitespace() || c == ',')
            .filter(|token| !token.is_empty())
        {
            match token.strip_prefix('-') {
                Some("") => {}
                Some(excluded) => set.exclude.push(Pattern::new(excluded)),
                None => set.include.push(Pattern::new(token)),
            }
        }

        log::trace!(
            "compiled {} inclusion and {} exclusion patterns from {:?}",
            set.include.len(),
            set.exclude.len(),
            source
        );
        set
    }

    /// Returns true when `source` is the match-everything wildcard.
    pub fn is_wildcard_everything(source: &str) -> bool {
        source.trim() == EVERYTHING
    }

    /// Returns true if the set was compiled from the `*` source.
    pub fn matches_everything(&self) -> bool {
        self.everything
    }

    /// Returns true if nothing can ever match.
    pub fn is_empty(&self) -> bool {
        !self.everything && self.include.is_empty()
    }

    /// Tests `namespace` against the compiled tokens.
    pub fn matches(&self, namespace: &str) -> bool {
        if self.everything {
            return true;
        }
        if self.exclude.iter().any(|p| p.matches(namespace)) {
            return false;
        }
        self.include.iter().any(|p| p.matches(namespace))
    }
}

/// Remembers the last compiled source so repeated checks against an
/// unchanged source do not recompile. A different source string always
/// yields a freshly compiled set.
#[derive(Debug, Default)]
pub struct MatcherCache {
    last: Mutex<Option<(String, Arc<MatcherSet>)>>,
}

impl MatcherCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the compiled set for `source`, recompiling if it changed.
    pub fn get(&self, source: &str) -> Arc<MatcherSet> {
        let mut last = self.last.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some((cached, set)) = last.as_ref() {
            if cached == source {
                return Arc::clone(set);
            }
        }
        let set = Arc::new(MatcherSet::compile(source));
        *last = Some((source.to_owned(), Arc::clone(&set)));
        set
    }
}
