use anyhow::Context;
use clap::Parser;

use crate::cli::*;

mod cli;
mod commands;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Cli::parse();
    let state = args.state;
    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    match args.command {
        Command::Show => {
            commands::show::invoke(&state, &mut out).context("Failed to show configuration")?;
        }
        Command::List => {
            commands::peer::list(&state, &mut out).context("Failed to list peers")?;
        }
        Command::ServerKeys => {
            commands::server::keys(&state, &mut out).context("Failed to generate server keys")?;
        }
        Command::Interface {
            address,
            listen_port,
            name,
        } => {
            commands::server::interface(&state, address, listen_port, name)
                .context("Failed to edit interface")?;
        }
        Command::AddPeer => {
            commands::peer::add(&state, &mut out).context("Failed to add peer")?;
        }
        Command::RemovePeer { id } => {
            commands::peer::remove(&state, id, &mut out).context("Failed to remove peer")?;
        }
        Command::PeerKeys { id } => {
            commands::peer::keys(&state, id, &mut out).context("Failed to generate peer keys")?;
        }
        Command::Set { id, field, value } => {
            commands::peer::set(&state, id, field, value).context("Failed to update peer")?;
        }
        Command::Toggle { id } => {
            commands::peer::toggle(&state, id, &mut out).context("Failed to toggle peer")?;
        }
        Command::Export { out_dir } => {
            commands::export::invoke(&state, out_dir, &mut out)
                .context("Failed to export configuration")?;
        }
        Command::Copy {
            target,
            peer,
            program,
        } => {
            commands::copy::invoke(&state, target, peer, program, &mut out)
                .context("Failed to copy")?;
        }
        Command::Serve { port, assets } => {
            drop(out);
            commands::serve::invoke(state, port, assets)
                .await
                .context("Server failed")?;
        }
    }
    Ok(())
}
