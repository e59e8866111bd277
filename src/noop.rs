// src/noop.rs

//! A factory with the same shape as [`crate::debugger::create`] that never
//! emits. Swap it in for release builds to strip debug output entirely.

use crate::debugger::{Debugger, Target};

/// Returns a disabled debugger whatever the target.
pub fn create(_target: impl Into<Target>) -> Debugger {
    Debugger::disabled()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_noop_factory() {
        for dbg in [create("test:namespace"), create(true), create(()), create(false)] {
            assert!(dbg.is_disabled());
            assert!(!dbg.enabled());
            dbg.log(vec!["ignored".into()]);

            let child = dbg.extend("child");
            assert!(child.is_disabled());
            assert!(!child.extend("grandchild").enabled());
        }
    }
}
