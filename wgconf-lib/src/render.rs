use std::fmt::Write;

use serde::{Deserialize, Serialize};

use crate::peers::{Peer, ServerIdentity};

/// Shown in place of the server private key until one has been generated.
pub const MISSING_SERVER_KEY: &str = "[Generate server keys first]";

/// The `[Interface]` fields the operator types in directly.
///
/// The values are taken verbatim; nothing here validates the address or the port.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterfaceSettings {
    pub address: String,
    pub listen_port: String,
    /// Name of the interface the file is meant for. Not part of the rendered text.
    pub interface_name: String,
}

impl Default for InterfaceSettings {
    fn default() -> Self {
        InterfaceSettings {
            address: "10.0.0.1/24".to_string(),
            listen_port: "51820".to_string(),
            interface_name: "wg0".to_string(),
        }
    }
}

/// Renders the server identity and peers into WireGuard configuration text.
///
/// The output starts with the `[Interface]` block. Each peer that is enabled and has a
/// public key follows as a `[Peer]` block, in the order given, with its name as a comment.
/// `Endpoint` is written only when set, `PersistentKeepalive` only when non-zero. Every
/// block ends with an empty line.
///
/// # Examples
///
/// ```
/// use wgconf::peers::ServerIdentity;
/// use wgconf::render::{render, InterfaceSettings};
///
/// let text = render(&ServerIdentity::default(), &InterfaceSettings::default(), &[]);
/// assert_eq!(
///     text,
///     "[Interface]\nAddress = 10.0.0.1/24\nPrivateKey = [Generate server keys first]\nListenPort = 51820\n\n"
/// );
/// ```
pub fn render(server: &ServerIdentity, settings: &InterfaceSettings, peers: &[Peer]) -> String {
    let private_key = if server.private_key.is_empty() {
        MISSING_SERVER_KEY
    } else {
        server.private_key.as_str()
    };

    let mut config = String::new();
    // Writing into a String cannot fail.
    let _ = write!(
        config,
        "[Interface]\nAddress = {}\nPrivateKey = {}\nListenPort = {}\n\n",
        settings.address, private_key, settings.listen_port
    );

    for peer in peers.iter().filter(|peer| peer.is_rendered()) {
        let _ = write!(
            config,
            "[Peer]\n# {}\nPublicKey = {}\nAllowedIPs = {}\n",
            peer.name, peer.public_key, peer.allowed_ips
        );
        if !peer.endpoint.is_empty() {
            let _ = writeln!(config, "Endpoint = {}", peer.endpoint);
        }
        if peer.persistent_keepalive > 0 {
            let _ = writeln!(config, "PersistentKeepalive = {}", peer.persistent_keepalive);
        }
        config.push('\n');
    }

    config
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::peers::PeerRegistry;
    use crate::peers::PeerUpdate;

    fn registry_with_keyed_peers(n: u32) -> PeerRegistry {
        let mut registry = PeerRegistry::new();
        for i in 1..=n {
            registry.add_peer();
            registry.update(i, PeerUpdate::PublicKey(format!("PUB{}=", i)));
        }
        registry
    }

    #[test]
    fn test_render_without_server_keys() {
        let registry = registry_with_keyed_peers(1);
        let text = render(
            registry.server(),
            &InterfaceSettings::default(),
            registry.peers(),
        );
        assert_eq!(
            text,
            "[Interface]\n\
             Address = 10.0.0.1/24\n\
             PrivateKey = [Generate server keys first]\n\
             ListenPort = 51820\n\
             \n\
             [Peer]\n\
             # Peer 1\n\
             PublicKey = PUB1=\n\
             AllowedIPs = 10.0.0.2/32\n\
             PersistentKeepalive = 25\n\
             \n"
        );
    }

    #[test]
    fn test_render_full_peer() {
        let mut registry = registry_with_keyed_peers(1);
        registry.update(1, PeerUpdate::Endpoint("vpn.example.com:51820".into()));
        registry.update(1, PeerUpdate::Name("office".into()));
        let server = ServerIdentity {
            private_key: "SERVERPRIV=".into(),
            public_key: "SERVERPUB=".into(),
        };
        let settings = InterfaceSettings {
            address: "192.168.7.1/24".into(),
            listen_port: "443".into(),
            interface_name: "wg9".into(),
        };
        let text = render(&server, &settings, registry.peers());
        assert_eq!(
            text,
            "[Interface]\n\
             Address = 192.168.7.1/24\n\
             PrivateKey = SERVERPRIV=\n\
             ListenPort = 443\n\
             \n\
             [Peer]\n\
             # office\n\
             PublicKey = PUB1=\n\
             AllowedIPs = 10.0.0.2/32\n\
             Endpoint = vpn.example.com:51820\n\
             PersistentKeepalive = 25\n\
             \n"
        );
        assert!(!text.contains("wg9"));
    }

    #[test]
    fn test_peer_without_public_key_is_skipped() {
        let mut registry = PeerRegistry::new();
        registry.add_peer();
        let text = render(
            registry.server(),
            &InterfaceSettings::default(),
            registry.peers(),
        );
        assert!(!text.contains("[Peer]"));
    }

    #[test]
    fn test_disabled_peer_is_skipped() {
        let mut registry = registry_with_keyed_peers(2);
        registry.update(1, PeerUpdate::Endpoint("a:1".into()));
        registry.toggle_enabled(1);
        let text = render(
            registry.server(),
            &InterfaceSettings::default(),
            registry.peers(),
        );
        assert!(!text.contains("PUB1="));
        assert!(!text.contains("Endpoint"));
        assert!(text.contains("PUB2="));
    }

    #[test]
    fn test_keepalive_zero_is_omitted() {
        let mut registry = registry_with_keyed_peers(2);
        registry.update(1, PeerUpdate::PersistentKeepalive(0));
        registry.update(2, PeerUpdate::PersistentKeepalive(7));
        let text = render(
            registry.server(),
            &InterfaceSettings::default(),
            registry.peers(),
        );
        assert_eq!(text.matches("PersistentKeepalive").count(), 1);
        assert!(text.contains("PersistentKeepalive = 7\n"));
    }

    #[test]
    fn test_registry_order_and_duplicates_kept() {
        let mut registry = registry_with_keyed_peers(3);
        registry.update(3, PeerUpdate::PublicKey("PUB1=".into()));
        registry.update(1, PeerUpdate::Name("z-last-alphabetically".into()));
        let text = render(
            registry.server(),
            &InterfaceSettings::default(),
            registry.peers(),
        );
        let names: Vec<&str> = text
            .lines()
            .filter_map(|line| line.strip_prefix("# "))
            .collect();
        assert_eq!(names, vec!["z-last-alphabetically", "Peer 2", "Peer 3"]);
        assert_eq!(text.matches("PublicKey = PUB1=").count(), 2);
    }
}
