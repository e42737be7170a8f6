use serde::{Deserialize, Serialize};

pub mod registry;

pub use registry::PeerRegistry;

/// Keepalive interval, in seconds, given to newly added peers.
pub const DEFAULT_PERSISTENT_KEEPALIVE: u16 = 25;

/// The key pair of the local end of the tunnel.
///
/// Both keys are empty until they are generated.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerIdentity {
    pub private_key: String,
    pub public_key: String,
}

impl ServerIdentity {
    /// Returns `true` once keys have been generated.
    pub fn has_keys(&self) -> bool {
        !self.private_key.is_empty()
    }
}

/// A remote endpoint of the tunnel.
///
/// A peer is identified by an id that the registry assigns once and never hands out again.
/// Everything else can be edited.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Peer {
    id: u32,
    pub name: String,
    pub private_key: String,
    pub public_key: String,
    /// The CIDR range routed to this peer.
    pub allowed_ips: String,
    /// Optional `host:port`. Empty means no endpoint line is rendered.
    pub endpoint: String,
    /// Seconds between keepalive packets. Zero disables them.
    pub persistent_keepalive: u16,
    pub enabled: bool,
}

impl Peer {
    /// Creates a peer with the defaults for the given id.
    ///
    /// The allowed IPs default to `10.0.0.{id + 1}/32` so the first peer does not collide
    /// with the server's usual `10.0.0.1`. The value is derived once, here, and is not
    /// touched again by later edits.
    pub(crate) fn with_id(id: u32) -> Self {
        Self {
            id,
            name: format!("Peer {}", id),
            private_key: String::new(),
            public_key: String::new(),
            allowed_ips: format!("10.0.0.{}/32", u64::from(id) + 1),
            endpoint: String::new(),
            persistent_keepalive: DEFAULT_PERSISTENT_KEEPALIVE,
            enabled: true,
        }
    }

    /// Returns the id assigned by the registry.
    pub fn id(&self) -> u32 {
        self.id
    }

    /// Returns `true` if the peer takes part in the rendered configuration.
    pub fn is_rendered(&self) -> bool {
        self.enabled && !self.public_key.is_empty()
    }

    /// Applies a single field update.
    pub fn apply(&mut self, update: PeerUpdate) {
        match update {
            PeerUpdate::Name(name) => self.name = name,
            PeerUpdate::PrivateKey(key) => self.private_key = key,
            PeerUpdate::PublicKey(key) => self.public_key = key,
            PeerUpdate::AllowedIps(ips) => self.allowed_ips = ips,
            PeerUpdate::Endpoint(endpoint) => self.endpoint = endpoint,
            PeerUpdate::PersistentKeepalive(seconds) => self.persistent_keepalive = seconds,
        }
    }
}

/// An edit to one of the operator-editable fields of a [`Peer`].
///
/// `enabled` is not listed; it only changes through
/// [`PeerRegistry::toggle_enabled`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PeerUpdate {
    Name(String),
    PrivateKey(String),
    PublicKey(String),
    AllowedIps(String),
    Endpoint(String),
    PersistentKeepalive(u16),
}
