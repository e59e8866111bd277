// src/utils/error.rs

use thiserror::Error;

/// The error type for the fallible setup operations of the crate.
///
/// Logging itself never fails: a debugger swallows sink failures and
/// formatter failures are rendered inline. Only constructors and
/// installation helpers report errors through this type.
#[derive(Error, Debug)]
pub enum DebugError {
    /// Writing to an output sink failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A palette was built from an empty color list.
    #[error("A palette must contain at least one color")]
    EmptyPalette,

    /// `FORCE_COLOR` (or an equivalent binding) held an unrecognised value.
    #[error("Invalid color level {0:?}, expected 0-3, true or false")]
    InvalidColorLevel(String),

    /// A global `log` logger was already installed.
    #[error("Logger already installed: {0}")]
    LoggerInstalled(#[from] log::SetLoggerError),
}

/// A specialized `Result` type for nsdebug setup operations.
pub type Result<T> = std::result::Result<T, DebugError>;
