use std::path::Path;

use anyhow::Context;
use tokio::net::TcpListener;

use super::config::Configuration;
use super::keys::KeyMaterialGenerator;
use super::net::server::{Assets, StaticResponder};
use super::session::Session;
use super::storage;

/// Opens the session persisted at `path`, or an empty one if nothing was saved yet.
///
/// # Errors
///
/// If the state file cannot be read or parsed, an error is returned.
///
/// # Example
///
/// ```no_run
/// use wgconf::commands;
///
/// let mut session = commands::open("wgconf.json").unwrap();
/// session.add_peer();
/// commands::persist("wgconf.json", &session).unwrap();
/// ```
pub fn open(path: impl AsRef<Path>) -> anyhow::Result<Session> {
    let state = storage::load(&path).with_context(|| {
        format!("Failed to load session from {}", path.as_ref().display())
    })?;
    Ok(Session::from_state(state, KeyMaterialGenerator::new()))
}

/// Saves the session so the next invocation picks it up.
///
/// # Errors
///
/// If the state file cannot be written, an error is returned.
pub fn persist(path: impl AsRef<Path>, session: &Session) -> anyhow::Result<()> {
    storage::save(&path, session.state()).with_context(|| {
        format!("Failed to save session to {}", path.as_ref().display())
    })
}

/// Runs the static responder until the process is stopped.
///
/// # Errors
///
/// If the assets cannot be read or the port cannot be bound, an error is returned.
pub async fn serve(config: &Configuration) -> anyhow::Result<()> {
    let assets = Assets::load(config.assets_dir())
        .await
        .context("Failed to load page assets.")?;
    let listener = TcpListener::bind(("0.0.0.0", config.port()))
        .await
        .with_context(|| format!("Failed to bind port {}", config.port()))?;
    StaticResponder::new(assets, config.state_path())
        .serve(listener)
        .await
}
