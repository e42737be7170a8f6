use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::Context;

use wgconf::commands;
use wgconf::export::FileDownload;

use super::report;

/// Writes the rendered configuration to `wg0.conf` inside `out_dir`.
///
/// # Errors
///
/// This function will return an error if the session cannot be loaded or the file cannot
/// be written. An empty configuration is reported, not treated as an error.
pub fn invoke(state: &Path, out_dir: PathBuf, out: &mut impl Write) -> anyhow::Result<()> {
    let session = commands::open(state)?;
    let mut sink = FileDownload::new(out_dir);
    let notice = session
        .export(&mut sink)
        .with_context(|| format!("Failed to write {}", sink.path().display()))?;
    report(out, Some(notice))
}
