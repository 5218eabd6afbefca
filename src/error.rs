//! Error types
//!
//! Data-quality problems in a level never surface here: the session degrades
//! to defaults instead. Only capacity exhaustion and collaborator-side level
//! loading can fail.

use std::fmt;

/// Physics world allocation failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorldError {
    /// The world already holds the configured maximum number of bodies.
    BodyLimit { limit: usize },
}

impl fmt::Display for WorldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WorldError::BodyLimit { limit } => {
                write!(f, "physics world body limit reached ({limit} bodies)")
            }
        }
    }
}

impl std::error::Error for WorldError {}

/// Unrecoverable session construction failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionError {
    /// Building the physics world failed.
    World(WorldError),
}

impl fmt::Display for SessionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionError::World(e) => write!(f, "session setup failed: {e}"),
        }
    }
}

impl std::error::Error for SessionError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SessionError::World(e) => Some(e),
        }
    }
}

impl From<WorldError> for SessionError {
    fn from(e: WorldError) -> Self {
        SessionError::World(e)
    }
}

/// Errors while reading level data.
#[derive(Debug)]
pub enum LevelError {
    /// Standard I/O error.
    Io(std::io::Error),
    /// JSON deserialization error.
    Json(serde_json::Error),
    /// The pack has no level with this id.
    NotFound { id: String },
}

impl fmt::Display for LevelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LevelError::Io(e) => write!(f, "IO error: {e}"),
            LevelError::Json(e) => write!(f, "JSON error: {e}"),
            LevelError::NotFound { id } => write!(f, "level {id} not found in pack"),
        }
    }
}

impl std::error::Error for LevelError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            LevelError::Io(e) => Some(e),
            LevelError::Json(e) => Some(e),
            LevelError::NotFound { .. } => None,
        }
    }
}

impl From<std::io::Error> for LevelError {
    fn from(e: std::io::Error) -> Self {
        LevelError::Io(e)
    }
}

impl From<serde_json::Error> for LevelError {
    fn from(e: serde_json::Error) -> Self {
        LevelError::Json(e)
    }
}
