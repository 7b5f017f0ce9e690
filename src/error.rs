use std::path::PathBuf;

use thiserror::Error;
use uuid::Uuid;

/// Errors returned by the review-state updater.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SchedulerError {
    #[error("score must be between 1 and 5, got {score}")]
    InvalidScore { score: i64 },

    /// Current state handed to the updater is corrupt.
    #[error("invalid review state: {field} = {value}")]
    InvalidState { field: &'static str, value: String },
}

/// Errors raised while loading or validating a scheduling policy.
#[derive(Error, Debug)]
pub enum PolicyError {
    #[error("failed to read policy file {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse policy JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid policy: {0}")]
    Invalid(String),
}

/// Failure reported by an item store collaborator.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum StoreError {
    #[error("store backend error: {0}")]
    Backend(String),
}

/// Errors returned by [`crate::service::ReviewService`].
#[derive(Error, Debug)]
pub enum ReviewError {
    #[error(transparent)]
    Scheduler(#[from] SchedulerError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("item not found: {0}")]
    NotFound(Uuid),
}
