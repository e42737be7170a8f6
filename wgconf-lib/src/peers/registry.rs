use log::{debug, warn};
use serde::{Deserialize, Serialize};

use super::{Peer, PeerUpdate, ServerIdentity};
use crate::error::Error;
use crate::keys::KeySource;

/// Owns the server identity and the ordered list of peers.
///
/// Peers are kept in creation order. Edits and toggles never move a peer, and ids come
/// from a counter that only ever grows, so an id is never handed out twice even after the
/// peer holding it was removed.
///
/// Every operation addressing a peer by id treats an unknown id as a no-op. Callers that
/// want to react to a miss can look at the returned `bool`/`Option`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RegistryState")]
pub struct PeerRegistry {
    server: ServerIdentity,
    last_id: u32,
    peers: Vec<Peer>,
}

impl PeerRegistry {
    /// Creates an empty registry with no server keys.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn server(&self) -> &ServerIdentity {
        &self.server
    }

    /// Returns the peers in creation order.
    pub fn peers(&self) -> &[Peer] {
        &self.peers
    }

    pub fn get(&self, id: u32) -> Option<&Peer> {
        self.peers.iter().find(|peer| peer.id == id)
    }

    fn get_mut(&mut self, id: u32) -> Option<&mut Peer> {
        self.peers.iter_mut().find(|peer| peer.id == id)
    }

    /// Appends a peer with the next id and default fields, and returns it.
    ///
    /// Returns `None` without touching the registry once every `u32` id has been handed
    /// out, since ids are never reused.
    pub fn add_peer(&mut self) -> Option<&Peer> {
        let Some(id) = self.last_id.checked_add(1) else {
            warn!("Peer ids exhausted, not adding a peer");
            return None;
        };
        self.last_id = id;
        let peer = Peer::with_id(id);
        debug!("Added peer {} ({})", peer.id, peer.allowed_ips);
        self.peers.push(peer);
        self.peers.last()
    }

    /// Removes the peer with the given id. Returns the removed peer, if there was one.
    pub fn remove_peer(&mut self, id: u32) -> Option<Peer> {
        let index = self.peers.iter().position(|peer| peer.id == id)?;
        debug!("Removed peer {}", id);
        Some(self.peers.remove(index))
    }

    /// Gives the peer a new private token and a public token to go with it.
    pub fn generate_keys_for(&mut self, id: u32, keys: &mut impl KeySource) -> bool {
        let Some(peer) = self.get_mut(id) else {
            return false;
        };
        peer.private_key = keys.generate_token();
        peer.public_key = keys.derive_public(&peer.private_key);
        debug!("Generated keys for peer {}", id);
        true
    }

    /// Applies `update` to the peer with the given id.
    pub fn update(&mut self, id: u32, update: PeerUpdate) -> bool {
        let Some(peer) = self.get_mut(id) else {
            return false;
        };
        debug!("Updating peer {}: {:?}", id, update);
        peer.apply(update);
        true
    }

    /// Flips the `enabled` flag and returns the new value.
    pub fn toggle_enabled(&mut self, id: u32) -> Option<bool> {
        let peer = self.get_mut(id)?;
        peer.enabled = !peer.enabled;
        debug!("Peer {} enabled: {}", id, peer.enabled);
        Some(peer.enabled)
    }

    /// Replaces the server identity with freshly generated keys.
    pub fn set_server_keys(&mut self, keys: &mut impl KeySource) -> &ServerIdentity {
        let private_key = keys.generate_token();
        let public_key = keys.derive_public(&private_key);
        self.server = ServerIdentity {
            private_key,
            public_key,
        };
        debug!("Generated server keys");
        &self.server
    }
}

/// Serialized form of the registry, checked before it becomes a [`PeerRegistry`].
#[derive(Deserialize)]
struct RegistryState {
    #[serde(default)]
    server: ServerIdentity,
    last_id: u32,
    #[serde(default)]
    peers: Vec<Peer>,
}

impl TryFrom<RegistryState> for PeerRegistry {
    type Error = Error;

    fn try_from(state: RegistryState) -> Result<Self, Self::Error> {
        // Ids must be strictly increasing in list order and never above the counter.
        let mut previous = 0;
        for peer in &state.peers {
            if peer.id <= previous || peer.id > state.last_id {
                return Err(Error::InconsistentRegistry {
                    id: peer.id,
                    last_id: state.last_id,
                });
            }
            previous = peer.id;
        }
        Ok(Self {
            server: state.server,
            last_id: state.last_id,
            peers: state.peers,
        })
    }
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;
    use crate::keys::KeyMaterialGenerator;

    fn keys() -> KeyMaterialGenerator<StdRng> {
        KeyMaterialGenerator::from_rng(StdRng::seed_from_u64(99))
    }

    fn ids(registry: &PeerRegistry) -> Vec<u32> {
        registry.peers().iter().map(Peer::id).collect()
    }

    #[test]
    fn test_first_peer() {
        let mut registry = PeerRegistry::new();
        let peer = registry.add_peer().unwrap();
        assert_eq!(peer.id(), 1);
        assert_eq!(peer.allowed_ips, "10.0.0.2/32");
        assert!(peer.enabled);
    }

    #[test]
    fn test_ids_never_reused() {
        let mut registry = PeerRegistry::new();
        registry.add_peer();
        registry.add_peer();
        registry.add_peer();
        assert!(registry.remove_peer(3).is_some());
        assert!(registry.remove_peer(1).is_some());
        let peer = registry.add_peer().unwrap();
        assert_eq!(peer.id(), 4);
        assert_eq!(peer.allowed_ips, "10.0.0.5/32");
        assert_eq!(ids(&registry), vec![2, 4]);
    }

    #[test]
    fn test_remove_unknown_is_noop() {
        let mut registry = PeerRegistry::new();
        registry.add_peer();
        let before = registry.clone();
        assert!(registry.remove_peer(42).is_none());
        assert_eq!(registry, before);
    }

    #[test]
    fn test_generate_keys_for() {
        let mut registry = PeerRegistry::new();
        let mut keys = keys();
        registry.add_peer();
        assert!(registry.generate_keys_for(1, &mut keys));
        let peer = registry.get(1).unwrap();
        assert_eq!(peer.private_key.len(), 44);
        assert_eq!(peer.public_key.len(), 44);
        assert!(!registry.generate_keys_for(7, &mut keys));
    }

    #[test]
    fn test_update_keeps_order_and_allowed_ips() {
        let mut registry = PeerRegistry::new();
        registry.add_peer();
        registry.add_peer();
        assert!(registry.update(1, PeerUpdate::Name("phone".into())));
        assert!(registry.update(1, PeerUpdate::Endpoint("1.2.3.4:51820".into())));
        assert!(!registry.update(9, PeerUpdate::Name("ghost".into())));

        assert_eq!(ids(&registry), vec![1, 2]);
        let peer = registry.get(1).unwrap();
        assert_eq!(peer.name, "phone");
        assert_eq!(peer.allowed_ips, "10.0.0.2/32");
    }

    #[test]
    fn test_toggle_enabled() {
        let mut registry = PeerRegistry::new();
        registry.add_peer();
        assert_eq!(registry.toggle_enabled(1), Some(false));
        assert_eq!(registry.peers().len(), 1);
        assert_eq!(registry.toggle_enabled(1), Some(true));
        assert_eq!(registry.toggle_enabled(2), None);
    }

    #[test]
    fn test_set_server_keys() {
        let mut registry = PeerRegistry::new();
        assert!(!registry.server().has_keys());
        let mut keys = keys();
        let first = registry.set_server_keys(&mut keys).clone();
        assert!(first.has_keys());
        assert_eq!(first.public_key.len(), 44);
        let second = registry.set_server_keys(&mut keys).clone();
        assert_ne!(first, second);
    }

    #[test]
    fn test_deserialize_rejects_id_above_counter() {
        let json = r#"{"last_id":1,"peers":[{"id":2,"name":"Peer 2","private_key":"","public_key":"","allowed_ips":"10.0.0.3/32","endpoint":"","persistent_keepalive":25,"enabled":true}]}"#;
        assert!(serde_json::from_str::<PeerRegistry>(json).is_err());
    }

    #[test]
    fn test_serde_keeps_counter() {
        let mut registry = PeerRegistry::new();
        registry.add_peer();
        registry.add_peer();
        registry.remove_peer(2);
        let json = serde_json::to_string(&registry).unwrap();
        let mut restored: PeerRegistry = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, registry);
        assert_eq!(restored.add_peer().unwrap().id(), 3);
    }

    #[test]
    fn test_exhausted_ids_are_not_reused() {
        let json = format!(r#"{{"last_id":{}}}"#, u32::MAX);
        let mut registry: PeerRegistry = serde_json::from_str(&json).unwrap();
        assert!(registry.add_peer().is_none());
        assert!(registry.peers().is_empty());
        assert!(registry.add_peer().is_none());
    }
}
