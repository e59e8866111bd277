// src/matcher/pattern.rs

/// A single anchored wildcard pattern compiled from one token.
///
/// The token is stored as the literal runs between `*` wildcards. A token
/// without wildcards has exactly one run and must equal the namespace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pattern {
    runs: Vec<String>,
}

impl Pattern {
    /// Compiles a token. Every character other than `*` is literal.
    pub fn new(token: &str) -> Self {
        Self {
            runs: token.split('*').map(str::to_owned).collect(),
        }
    }

    /// Returns true if the token contained at least one wildcard.
    pub fn has_wildcard(&self) -> bool {
        self.runs.len() > 1
    }

    /// Tests the whole namespace against the pattern (`^...$` semantics).
    pub fn matches(&self, namespace: &str) -> bool {
        let (first, rest) = match self.runs.split_first() {
            Some(split) => split,
            None => return namespace.is_empty(),
        };

        let Some(last) = rest.last() else {
            return namespace == first;
        };

        let Some(mut remaining) = namespace.strip_prefix(first.as_str()) else {
            return false;
        };

        // Interior runs take their leftmost occurrence; the final run must
        // still fit at the end of what is left.
        for run in &rest[..rest.len() - 1] {
            match remaining.find(run.as_str()) {
                Some(at) => remaining = &remaining[at + run.len()..],
                None => return false,
            }
        }

        remaining.ends_with(last.as_str())
    }
}
