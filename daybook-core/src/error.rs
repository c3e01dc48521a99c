//! Error types for the daybook ecosystem.

use std::path::PathBuf;

use chrono::NaiveDate;
use thiserror::Error;

use crate::event::EventId;

/// Errors raised by an event store.
///
/// Expected business conditions (taken names, missing events, empty days)
/// are not errors; they come back as `bool`/`Option` results.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Data directory does not exist: {0}")]
    MissingRoot(PathBuf),

    #[error("Invalid user name: {0:?}")]
    InvalidUserName(String),

    #[error("Unknown user: {0}")]
    UnknownUser(String),

    #[error("Invalid event: {0}")]
    InvalidEvent(String),

    #[error("{user} has no event {id} on {date}")]
    UnknownEvent {
        user: String,
        date: NaiveDate,
        id: EventId,
    },

    #[error("Corrupt record at {path}: {source}")]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Corrupt identifier counter at {0}")]
    CorruptCounter(PathBuf),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Categorical failures at the transport boundary.
///
/// Not-found and name-already-used are not listed here: the transport
/// reports them as `None` and `false`.
#[derive(Error, Debug)]
pub enum TransportError {
    #[error("Invalid credentials")]
    Unauthorized,

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Server error: {0}")]
    Internal(String),

    #[error("Server unavailable: {0}")]
    Unavailable(String),
}

impl From<StoreError> for TransportError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::InvalidUserName(_)
            | StoreError::InvalidEvent(_)
            | StoreError::UnknownEvent { .. } => TransportError::BadRequest(err.to_string()),
            StoreError::UnknownUser(_) => TransportError::Unauthorized,
            StoreError::MissingRoot(_)
            | StoreError::Corrupt { .. }
            | StoreError::CorruptCounter(_)
            | StoreError::Io(_) => TransportError::Internal(err.to_string()),
        }
    }
}

#[derive(Error, Debug)]
#[error("Configuration error: {0}")]
pub struct ConfigError(pub String);

impl From<config::ConfigError> for ConfigError {
    fn from(err: config::ConfigError) -> Self {
        ConfigError(err.to_string())
    }
}
