use std::io::ErrorKind;
use std::path::Path;

use log::{debug, info};

use crate::error::Error;
use crate::session::SessionState;

/// Loads the persisted session state.
///
/// A missing file is not an error: it means nothing has been saved yet, and an empty state
/// is returned.
///
/// # Errors
///
/// This function will return an error if:
/// - The file exists but cannot be read.
/// - The contents are not valid JSON for a session.
/// - The peer ids in the file contradict the saved id counter.
pub fn load(path: impl AsRef<Path>) -> Result<SessionState, Error> {
    let path = path.as_ref();
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            debug!("No state at {}, starting empty", path.display());
            return Ok(SessionState::default());
        }
        Err(source) => {
            return Err(Error::ReadState {
                path: path.to_path_buf(),
                source,
            })
        }
    };
    let state: SessionState = serde_json::from_str(&content)?;
    debug!(
        "Loaded {} peers from {}",
        state.registry.peers().len(),
        path.display()
    );
    Ok(state)
}

/// Writes the session state as pretty-printed JSON, creating parent directories.
///
/// # Errors
///
/// Returns an error if a directory or the file cannot be written.
pub fn save(path: impl AsRef<Path>, state: &SessionState) -> Result<(), Error> {
    let path = path.as_ref();
    let write_error = |source: std::io::Error| Error::WriteState {
        path: path.to_path_buf(),
        source,
    };
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(write_error)?;
    }
    let json = serde_json::to_string_pretty(state)?;
    std::fs::write(path, json).map_err(write_error)?;
    info!("Saved state to {}", path.display());
    Ok(())
}
