pub mod copy;
pub mod export;
pub mod peer;
pub mod serve;
pub mod server;
pub mod show;

use std::io::Write;

use wgconf::notice::Notice;

/// Prints the notice for an action, if it produced one.
pub(crate) fn report(out: &mut impl Write, notice: Option<Notice>) -> anyhow::Result<()> {
    if let Some(notice) = notice {
        writeln!(out, "{}", notice)?;
    }
    Ok(())
}
