use std::path::PathBuf;

use thiserror::Error;

/// Errors surfaced by the tally pipeline
#[derive(Error, Debug)]
pub enum TallyError {
    /// The transcript file does not exist
    #[error("transcript not found: {0:?}")]
    SourceNotFound(PathBuf),

    /// Reading or writing a file failed
    #[error("I/O error on {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// CSV encoding or decoding failed
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON encoding or decoding failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A matrix CSV violated the dense day matrix layout
    #[error("malformed matrix: {0}")]
    MalformedMatrix(String),

    /// A roster file was unusable
    #[error("invalid roster: {0}")]
    Roster(String),
}

/// Convenience Result type for the tally pipeline
pub type Result<T> = std::result::Result<T, TallyError>;
