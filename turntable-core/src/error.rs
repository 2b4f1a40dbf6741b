//! Error types for the Turntable core library.

use thiserror::Error;

/// Top-level error type for all Turntable core operations.
#[derive(Error, Debug)]
pub enum TurntableError {
    /// A stored profile could not be parsed (malformed XML or a non-integer stat).
    #[error("Profile parse error in {path}: {reason}")]
    Parse {
        /// File that failed to parse.
        path: String,
        /// Underlying parser message.
        reason: String,
    },

    /// A profile could not be encoded to XML.
    #[error("Serialization error: {0}")]
    Serialize(String),

    /// The profile name cannot be used as a file name.
    #[error("Invalid profile name: {0:?}")]
    InvalidProfileName(String),

    /// No platform data directory could be resolved and none was configured.
    #[error("No application data directory available")]
    NoDataDirectory,

    /// The leveling curve constant is outside the range where the level and
    /// experience formulas agree.
    #[error("Invalid curve constant {constant}: must be finite and in (0, 1]")]
    Curve {
        /// The rejected constant.
        constant: f64,
    },

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Generic I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience Result type alias.
pub type Result<T> = std::result::Result<T, TurntableError>;
