use std::path::PathBuf;

#[derive(clap::Parser)]
#[command(version, about, long_about = None)]
pub(crate) struct Cli {
    /// File the session is kept in between invocations.
    #[arg(long, global = true, env = "WGCONF_STATE", default_value = "wgconf.json")]
    pub(crate) state: PathBuf,
    #[command(subcommand)]
    pub(crate) command: Command,
}

#[derive(clap::Subcommand)]
pub(crate) enum Command {
    /// Print the rendered configuration.
    Show,
    /// List all peers, including disabled ones.
    List,
    /// Generate new server keys.
    ServerKeys,
    /// Edit the [Interface] fields.
    Interface {
        #[arg(long)]
        address: Option<String>,
        #[arg(long = "listen-port")]
        listen_port: Option<String>,
        #[arg(long)]
        name: Option<String>,
    },
    AddPeer,
    RemovePeer {
        id: u32,
    },
    PeerKeys {
        id: u32,
    },
    /// Set one field of a peer.
    Set {
        id: u32,
        field: PeerField,
        value: String,
    },
    Toggle {
        id: u32,
    },
    /// Write the configuration to <OUT_DIR>/wg0.conf.
    Export {
        #[arg(long = "out-dir", default_value = ".")]
        out_dir: PathBuf,
    },
    /// Copy a key or the configuration to the clipboard.
    Copy {
        target: CopyWhat,
        /// Peer id, for the peer targets.
        #[arg(long)]
        peer: Option<u32>,
        /// Clipboard program the text is piped into.
        #[arg(long, default_value = "wl-copy")]
        program: String,
    },
    /// Serve the page, the script and the exported configuration over HTTP.
    Serve {
        #[arg(long, env = "PORT", default_value_t = 8080)]
        port: u16,
        #[arg(long, default_value = "assets")]
        assets: PathBuf,
    },
}

#[derive(Clone, Copy, clap::ValueEnum)]
pub(crate) enum PeerField {
    Name,
    PrivateKey,
    PublicKey,
    AllowedIps,
    Endpoint,
    PersistentKeepalive,
}

#[derive(Clone, Copy, clap::ValueEnum)]
pub(crate) enum CopyWhat {
    ServerPrivate,
    ServerPublic,
    PeerPrivate,
    PeerPublic,
    Config,
}
