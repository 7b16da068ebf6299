//! Error types for the lookup engine.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ServeZoneError {
    /// Malformed coordinate, radius or other caller-supplied value.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// A time-of-day string that is not `HH:MM:SS`.
    #[error("Invalid time of day '{value}': {source}")]
    InvalidTime {
        value: String,
        #[source]
        source: chrono::ParseError,
    },

    /// Two providers in one build share an id.
    #[error("Duplicate provider id: {0}")]
    DuplicateProvider(u64),

    #[error("Unsupported spatial index type: {0}")]
    UnsupportedIndex(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl From<servezone_types::config::UnknownIndexKind> for ServeZoneError {
    fn from(err: servezone_types::config::UnknownIndexKind) -> Self {
        Self::UnsupportedIndex(err.0)
    }
}

pub type Result<T> = std::result::Result<T, ServeZoneError>;
