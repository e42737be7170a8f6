use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while loading or saving a session.
#[derive(Debug, Error)]
pub enum Error {
    #[error("Failed to read state file {path}: {source}")]
    ReadState {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to write state file {path}: {source}")]
    WriteState {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Malformed state file: {0}")]
    MalformedState(#[from] serde_json::Error),

    #[error("Peer id {id} is out of order or above the id counter {last_id}")]
    InconsistentRegistry { id: u32, last_id: u32 },
}
