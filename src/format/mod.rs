//! Printf-style interpolation with pluggable directive handlers.
//!
//! A debug call's first argument is its template. [`interpolate`] expands the
//! directives that have a registered [`FormatFn`] (at least `%j`, and `%o` /
//! `%O` for richer environments) and leaves the rest for the output sink;
//! [`host::render`] is the plain-text sink's own pass over what remains.

pub mod arg;
pub mod formatters;
pub mod host;
pub mod interpolate;

pub use arg::Arg;
pub use formatters::{FormatFn, Formatters, JSON_ERROR_PREFIX};
pub use interpolate::interpolate;
