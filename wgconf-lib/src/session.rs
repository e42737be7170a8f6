use log::info;
use serde::{Deserialize, Serialize};

use crate::export::{self, Clipboard, DownloadSink, ExportError};
use crate::keys::{KeyMaterialGenerator, KeySource};
use crate::notice::Notice;
use crate::peers::{PeerRegistry, PeerUpdate};
use crate::render::{render, InterfaceSettings};

/// Everything the operator has entered, in the form it is persisted in.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionState {
    pub registry: PeerRegistry,
    #[serde(default)]
    pub interface: InterfaceSettings,
}

/// Something the operator can copy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CopyTarget {
    ServerPrivateKey,
    ServerPublicKey,
    PeerPrivateKey(u32),
    PeerPublicKey(u32),
    Configuration,
}

impl CopyTarget {
    fn message(&self) -> &'static str {
        match self {
            CopyTarget::ServerPrivateKey => "Server private key copied!",
            CopyTarget::ServerPublicKey => "Server public key copied!",
            CopyTarget::PeerPrivateKey(_) => "Private key copied!",
            CopyTarget::PeerPublicKey(_) => "Public key copied!",
            CopyTarget::Configuration => "Configuration copied!",
        }
    }
}

/// The single owner of the operator's state.
///
/// All changes go through the methods below. After each one the configuration text is
/// rendered again from scratch, so [`Session::config`] always matches the current state.
pub struct Session<K = KeyMaterialGenerator> {
    state: SessionState,
    keys: K,
    config: String,
}

impl Session {
    /// Starts an empty session with random key material.
    pub fn new() -> Self {
        Self::from_state(SessionState::default(), KeyMaterialGenerator::new())
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: KeySource> Session<K> {
    /// Resumes a session from persisted state.
    pub fn from_state(state: SessionState, keys: K) -> Self {
        let mut session = Self {
            state,
            keys,
            config: String::new(),
        };
        session.refresh();
        session
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn registry(&self) -> &PeerRegistry {
        &self.state.registry
    }

    pub fn interface(&self) -> &InterfaceSettings {
        &self.state.interface
    }

    /// Returns the configuration text for the current state.
    pub fn config(&self) -> &str {
        &self.config
    }

    fn refresh(&mut self) {
        self.config = render(
            self.state.registry.server(),
            &self.state.interface,
            self.state.registry.peers(),
        );
    }

    pub fn generate_server_keys(&mut self) -> Notice {
        self.state.registry.set_server_keys(&mut self.keys);
        self.refresh();
        Notice::ServerKeysGenerated
    }

    /// Adds a peer with default fields and returns its id, or `None` if ids ran out.
    pub fn add_peer(&mut self) -> Option<u32> {
        let id = self.state.registry.add_peer()?.id();
        self.refresh();
        Some(id)
    }

    pub fn remove_peer(&mut self, id: u32) -> Option<Notice> {
        self.state.registry.remove_peer(id)?;
        self.refresh();
        Some(Notice::PeerRemoved)
    }

    pub fn generate_peer_keys(&mut self, id: u32) -> Option<Notice> {
        if !self.state.registry.generate_keys_for(id, &mut self.keys) {
            return None;
        }
        self.refresh();
        Some(Notice::PeerKeysGenerated)
    }

    /// Returns `false` if there is no peer with this id.
    pub fn update_peer(&mut self, id: u32, update: PeerUpdate) -> bool {
        let updated = self.state.registry.update(id, update);
        if updated {
            self.refresh();
        }
        updated
    }

    pub fn toggle_peer(&mut self, id: u32) -> Option<Notice> {
        let enabled = self.state.registry.toggle_enabled(id)?;
        self.refresh();
        Some(Notice::PeerToggled { enabled })
    }

    /// Edits the `[Interface]` fields.
    pub fn edit_interface(&mut self, edit: impl FnOnce(&mut InterfaceSettings)) {
        edit(&mut self.state.interface);
        self.refresh();
    }

    /// Exports the current configuration.
    ///
    /// An empty configuration is reported as [`Notice::NothingToExport`] rather than an
    /// error. Failures of the sink are returned.
    pub fn export(&self, sink: &mut impl DownloadSink) -> Result<Notice, ExportError> {
        match export::export(&self.config, sink) {
            Ok(notice) => {
                info!("{}", notice);
                Ok(notice)
            }
            Err(ExportError::NothingToExport) => Ok(Notice::NothingToExport),
            Err(e) => Err(e),
        }
    }

    /// Returns the text a copy of `target` would put on the clipboard.
    ///
    /// Missing keys and unknown peers yield an empty string.
    pub fn copy_text(&self, target: CopyTarget) -> &str {
        let registry = &self.state.registry;
        match target {
            CopyTarget::ServerPrivateKey => registry.server().private_key.as_str(),
            CopyTarget::ServerPublicKey => registry.server().public_key.as_str(),
            CopyTarget::PeerPrivateKey(id) => registry
                .get(id)
                .map(|peer| peer.private_key.as_str())
                .unwrap_or_default(),
            CopyTarget::PeerPublicKey(id) => registry
                .get(id)
                .map(|peer| peer.public_key.as_str())
                .unwrap_or_default(),
            CopyTarget::Configuration => self.config.as_str(),
        }
    }

    pub fn copy(
        &self,
        target: CopyTarget,
        primary: &mut dyn Clipboard,
        fallback: &mut dyn Clipboard,
    ) -> Notice {
        export::copy(self.copy_text(target), target.message(), primary, fallback)
    }
}
