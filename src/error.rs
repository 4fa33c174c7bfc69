//! Error types for catalog, persistence and CLI operations.
//!
//! Verification itself never fails: every problem it meets evaluates to an
//! unsatisfied requirement.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid challenge content: {0}")]
    InvalidContent(String),

    #[error("Unknown challenge: {0}")]
    ChallengeNotFound(String),
}

pub type Result<T> = std::result::Result<T, Error>;
