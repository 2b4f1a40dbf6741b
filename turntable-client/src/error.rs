//! Error types for the client integration layer.

use thiserror::Error;

/// Failures reported by host engine collaborators.
#[derive(Error, Debug)]
pub enum EngineError {
    /// The mesh loader could not produce a mesh for `path`.
    #[error("Failed to load mesh {path}: {reason}")]
    MeshLoad { path: String, reason: String },
}

/// Argument problems in a console command.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum CommandError {
    /// Fewer arguments than the command needs.
    #[error("missing argument {index}")]
    MissingArgument { index: usize },

    /// The argument is not an integer, or not one in the accepted range.
    #[error("{value:?} is not an integer in range")]
    NotAnInteger { value: String },
}
