use rand::rngs::ThreadRng;
use rand::Rng;

/// The base64 alphabet tokens are drawn from.
pub const ALPHABET: &[u8; 64] =
    b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789+/";

/// Total length of a token, including the trailing `=`.
pub const TOKEN_LENGTH: usize = 44;

/// Source of key material for the server identity and for peers.
///
/// Implementations hand out a private token and a public token for it. Nothing about the
/// pair is required to be cryptographically related.
pub trait KeySource {
    /// Returns a fresh private token.
    fn generate_token(&mut self) -> String;

    /// Returns the public token that goes with `private`.
    fn derive_public(&mut self, private: &str) -> String;
}

/// Produces **simulated** WireGuard keys.
///
/// Tokens have the shape of a base64 encoded 32 byte key (43 characters of the base64
/// alphabet followed by `=`), but they are plain random strings. They are not valid
/// Curve25519 keys, and the "public" token is not derived from the private one. A real
/// deployment needs `wg genkey` / `wg pubkey` or an x25519 implementation instead.
///
/// # Examples
///
/// ```
/// use wgconf::keys::{KeyMaterialGenerator, KeySource, TOKEN_LENGTH};
///
/// let mut keys = KeyMaterialGenerator::new();
/// let token = keys.generate_token();
/// assert_eq!(token.len(), TOKEN_LENGTH);
/// assert!(token.ends_with('='));
/// ```
pub struct KeyMaterialGenerator<R = ThreadRng> {
    rng: R,
}

impl KeyMaterialGenerator<ThreadRng> {
    /// Creates a generator backed by the thread-local random number generator.
    pub fn new() -> Self {
        Self {
            rng: rand::thread_rng(),
        }
    }
}

impl Default for KeyMaterialGenerator<ThreadRng> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Rng> KeyMaterialGenerator<R> {
    /// Creates a generator drawing from the given random number generator.
    pub fn from_rng(rng: R) -> Self {
        Self { rng }
    }
}

impl<R: Rng> KeySource for KeyMaterialGenerator<R> {
    fn generate_token(&mut self) -> String {
        let mut token: String = (0..TOKEN_LENGTH - 1)
            .map(|_| ALPHABET[self.rng.gen_range(0..ALPHABET.len())] as char)
            .collect();
        token.push('=');
        token
    }

    /// Generates an unrelated token. The argument is ignored on purpose: the keys are
    /// simulated, so there is nothing to derive from.
    fn derive_public(&mut self, _private: &str) -> String {
        self.generate_token()
    }
}
