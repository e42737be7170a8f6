use std::path::PathBuf;

use wgconf::commands;
use wgconf::config::Configuration;

/// Serves the page, its script, `/server` and `/wg0.conf` until interrupted.
///
/// # Errors
///
/// This function will return an error if the assets cannot be read or the port is taken.
pub async fn invoke(state: PathBuf, port: u16, assets: PathBuf) -> anyhow::Result<()> {
    let config = Configuration::default()
        .with_state_path(state)
        .with_port(port)
        .with_assets_dir(assets);
    commands::serve(&config).await
}
