use std::fmt;

/// A short confirmation shown to the operator after an action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    ServerKeysGenerated,
    PeerKeysGenerated,
    PeerRemoved,
    PeerToggled { enabled: bool },
    ConfigurationExported,
    NothingToExport,
    NothingToCopy,
    /// Carries the confirmation for what was copied, e.g. "Public key copied!".
    Copied(String),
    CopyFailed,
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Notice::ServerKeysGenerated => write!(f, "Server keys generated successfully!"),
            Notice::PeerKeysGenerated => write!(f, "Peer keys generated successfully!"),
            Notice::PeerRemoved => write!(f, "Peer removed successfully!"),
            Notice::PeerToggled { enabled: true } => write!(f, "Peer enabled!"),
            Notice::PeerToggled { enabled: false } => write!(f, "Peer disabled!"),
            Notice::ConfigurationExported => write!(f, "Configuration exported successfully!"),
            Notice::NothingToExport => write!(f, "No configuration to export!"),
            Notice::NothingToCopy => write!(f, "Nothing to copy!"),
            Notice::Copied(message) => write!(f, "{}", message),
            Notice::CopyFailed => write!(f, "Copy failed!"),
        }
    }
}
