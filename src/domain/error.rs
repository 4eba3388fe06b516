use thiserror::Error;

use super::todo::TodoId;

/// Failure of the backing JSON collection itself. Never retried; a
/// malformed file has no recovery path, so callers propagate this as
/// fatal to the operation in flight.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("failed to access collection {name}: {source}")]
    Io {
        name: String,
        #[source]
        source: std::io::Error,
    },
    #[error("collection {name} is malformed: {source}")]
    Malformed {
        name: String,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("{0}")]
    Validation(String),
    #[error("username {0:?} is already taken")]
    DuplicateUser(String),
    // Same message for unknown user and wrong password.
    #[error("invalid username or password")]
    InvalidCredentials,
    #[error(transparent)]
    Storage(#[from] StorageError),
}

#[derive(Debug, Error)]
pub enum TodoError {
    #[error("{0}")]
    Validation(String),
    #[error("no task with id {0}")]
    NotFound(TodoId),
    #[error("task {0} belongs to another user")]
    Forbidden(TodoId),
    #[error(transparent)]
    Storage(#[from] StorageError),
}
