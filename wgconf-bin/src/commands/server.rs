use std::io::Write;
use std::path::Path;

use wgconf::commands;

use super::report;

/// Replaces the server keys.
pub fn keys(state: &Path, out: &mut impl Write) -> anyhow::Result<()> {
    let mut session = commands::open(state)?;
    let notice = session.generate_server_keys();
    commands::persist(state, &session)?;
    report(out, Some(notice))
}

/// Sets whichever `[Interface]` fields were given.
pub fn interface(
    state: &Path,
    address: Option<String>,
    listen_port: Option<String>,
    name: Option<String>,
) -> anyhow::Result<()> {
    let mut session = commands::open(state)?;
    session.edit_interface(|settings| {
        if let Some(address) = address {
            settings.address = address;
        }
        if let Some(listen_port) = listen_port {
            settings.listen_port = listen_port;
        }
        if let Some(name) = name {
            settings.interface_name = name;
        }
    });
    commands::persist(state, &session)
}
