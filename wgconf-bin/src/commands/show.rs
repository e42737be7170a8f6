use std::io::Write;
use std::path::Path;

use wgconf::commands;

/// Prints the configuration rendered from the saved session.
///
/// # Errors
///
/// This function will return an error if:
/// - The session cannot be loaded.
/// - Writing to `out` fails.
pub fn invoke(state: &Path, out: &mut impl Write) -> anyhow::Result<()> {
    let session = commands::open(state)?;
    write!(out, "{}", session.config())?;
    Ok(())
}
