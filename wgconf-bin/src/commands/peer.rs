use std::io::Write;
use std::path::Path;

use anyhow::Context;

use wgconf::commands;
use wgconf::peers::PeerUpdate;

use super::report;
use crate::cli::PeerField;

/// Adds a peer with default settings and prints its id.
///
/// # Errors
///
/// This function will return an error if:
/// - The session cannot be loaded or saved.
/// - Every peer id has already been handed out.
pub fn add(state: &Path, out: &mut impl Write) -> anyhow::Result<()> {
    let mut session = commands::open(state)?;
    let Some(id) = session.add_peer() else {
        anyhow::bail!("No peer ids left in {}", state.display());
    };
    commands::persist(state, &session)?;
    writeln!(out, "Added peer {}", id)?;
    Ok(())
}

/// Removes a peer. An unknown id changes nothing and prints nothing.
pub fn remove(state: &Path, id: u32, out: &mut impl Write) -> anyhow::Result<()> {
    let mut session = commands::open(state)?;
    let notice = session.remove_peer(id);
    commands::persist(state, &session)?;
    report(out, notice)
}

/// Generates keys for a peer.
pub fn keys(state: &Path, id: u32, out: &mut impl Write) -> anyhow::Result<()> {
    let mut session = commands::open(state)?;
    let notice = session.generate_peer_keys(id);
    commands::persist(state, &session)?;
    report(out, notice)
}

/// Enables a disabled peer, or disables an enabled one.
pub fn toggle(state: &Path, id: u32, out: &mut impl Write) -> anyhow::Result<()> {
    let mut session = commands::open(state)?;
    let notice = session.toggle_peer(id);
    commands::persist(state, &session)?;
    report(out, notice)
}

/// Sets one field of a peer.
///
/// # Errors
///
/// This function will return an error if:
/// - The session cannot be loaded or saved.
/// - A keepalive value is not a number between 0 and 65535.
pub fn set(state: &Path, id: u32, field: PeerField, value: String) -> anyhow::Result<()> {
    let update = match field {
        PeerField::Name => PeerUpdate::Name(value),
        PeerField::PrivateKey => PeerUpdate::PrivateKey(value),
        PeerField::PublicKey => PeerUpdate::PublicKey(value),
        PeerField::AllowedIps => PeerUpdate::AllowedIps(value),
        PeerField::Endpoint => PeerUpdate::Endpoint(value),
        PeerField::PersistentKeepalive => PeerUpdate::PersistentKeepalive(
            value
                .trim()
                .parse()
                .with_context(|| format!("Invalid keepalive interval {:?}", value))?,
        ),
    };
    let mut session = commands::open(state)?;
    if !session.update_peer(id, update) {
        log::debug!("No peer {}, nothing updated", id);
    }
    commands::persist(state, &session)
}

/// Prints one line per peer: id, state, name, allowed IPs and public key.
pub fn list(state: &Path, out: &mut impl Write) -> anyhow::Result<()> {
    let session = commands::open(state)?;
    for peer in session.registry().peers() {
        let public_key = if peer.public_key.is_empty() {
            "-"
        } else {
            peer.public_key.as_str()
        };
        writeln!(
            out,
            "{}\t{}\t{}\t{}\t{}",
            peer.id(),
            if peer.enabled { "Active" } else { "Disabled" },
            peer.name,
            peer.allowed_ips,
            public_key
        )?;
    }
    Ok(())
}
