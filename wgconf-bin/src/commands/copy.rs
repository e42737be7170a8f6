use std::io::Write;
use std::path::Path;

use wgconf::commands;
use wgconf::export::{CommandClipboard, TerminalClipboard};
use wgconf::session::CopyTarget;

use super::report;
use crate::cli::CopyWhat;

/// Copies a key or the configuration with `program`, printing it to `out` if that fails.
///
/// # Errors
///
/// This function will return an error if the session cannot be loaded, or if a peer
/// target is given without `--peer`.
pub fn invoke(
    state: &Path,
    what: CopyWhat,
    peer: Option<u32>,
    program: String,
    out: &mut impl Write,
) -> anyhow::Result<()> {
    let peer_id = || peer.ok_or_else(|| anyhow::anyhow!("--peer is required for peer keys."));
    let target = match what {
        CopyWhat::ServerPrivate => CopyTarget::ServerPrivateKey,
        CopyWhat::ServerPublic => CopyTarget::ServerPublicKey,
        CopyWhat::PeerPrivate => CopyTarget::PeerPrivateKey(peer_id()?),
        CopyWhat::PeerPublic => CopyTarget::PeerPublicKey(peer_id()?),
        CopyWhat::Config => CopyTarget::Configuration,
    };

    let session = commands::open(state)?;
    let mut primary = CommandClipboard::new(program, Vec::new());
    let notice = {
        let mut fallback = TerminalClipboard::new(&mut *out);
        session.copy(target, &mut primary, &mut fallback)
    };
    report(out, Some(notice))
}
