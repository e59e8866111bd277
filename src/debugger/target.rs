// src/debugger/target.rs

/// Label shown for debuggers created without a namespace.
pub const DEFAULT_LABEL: &str = "DEV";

/// What a debugger is created for, resolved once at the call boundary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    /// Never emits.
    Disabled,
    /// Always emits, whatever the enablement source says.
    Forced,
    /// Emits when the namespace matches the current source.
    Named(String),
    /// The unnamed debugger; the environment's policy decides.
    Default,
}

impl From<bool> for Target {
    fn from(enabled: bool) -> Self {
        if enabled {
            Target::Forced
        } else {
            Target::Disabled
        }
    }
}

impl From<String> for Target {
    fn from(namespace: String) -> Self {
        if namespace.is_empty() {
            Target::Default
        } else {
            Target::Named(namespace)
        }
    }
}

impl From<&str> for Target {
    fn from(namespace: &str) -> Self {
        Target::from(namespace.to_owned())
    }
}

impl From<Option<&str>> for Target {
    fn from(namespace: Option<&str>) -> Self {
        namespace.map_or(Target::Default, Target::from)
    }
}

impl From<()> for Target {
    fn from(_: ()) -> Self {
        Target::Default
    }
}
