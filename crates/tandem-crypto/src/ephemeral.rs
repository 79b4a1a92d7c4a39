//! Ephemeral pairing keys.
//!
//! Each pairing attempt generates a fresh X25519 keypair. The public half is
//! handed to the user's other device (inside the web-auth URL or as a code for
//! the mobile app); when that device answers with its own public key, ECDH +
//! HKDF-SHA256 yields the shared session key.

use hkdf::Hkdf;
use rand::rngs::OsRng;
use sha2::Sha256;
use x25519_dalek::{EphemeralSecret, PublicKey};
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::error::CryptoError;

/// Length of an X25519 public key in bytes.
pub const PUBLIC_KEY_LEN: usize = 32;

/// HKDF info string for pairing session key derivation.
const HKDF_INFO: &[u8] = b"tandem-pairing-session-v1";

/// HKDF salt for domain separation.
const HKDF_SALT: &[u8] = b"tandem-pairing-hkdf-salt-v1";

/// A single-use X25519 keypair for one pairing attempt.
pub struct EphemeralKeyPair {
    secret: EphemeralSecret,
    public: PublicKey,
}

impl std::fmt::Debug for EphemeralKeyPair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EphemeralKeyPair")
            .field("public", &hex::encode(self.public.as_bytes()))
            .field("secret", &"[REDACTED]")
            .finish()
    }
}

impl Default for EphemeralKeyPair {
    fn default() -> Self {
        Self::generate()
    }
}

impl EphemeralKeyPair {
    /// Generate a new random keypair.
    pub fn generate() -> Self {
        let secret = EphemeralSecret::random_from_rng(OsRng);
        let public = PublicKey::from(&secret);
        Self { secret, public }
    }

    /// Public key bytes to hand to the peer.
    pub fn public_bytes(&self) -> [u8; PUBLIC_KEY_LEN] {
        *self.public.as_bytes()
    }

    /// Short hex prefix of the public key, for logs.
    pub fn short_id(&self) -> String {
        hex::encode(&self.public.as_bytes()[..8])
    }

    /// Complete the exchange with the peer's public key.
    ///
    /// Consumes the keypair; the secret cannot be reused.
    pub fn complete(self, peer_public_bytes: &[u8]) -> Result<SessionKey, CryptoError> {
        let peer: [u8; PUBLIC_KEY_LEN] =
            peer_public_bytes
                .try_into()
                .map_err(|_| CryptoError::InvalidKeyLength {
                    expected: PUBLIC_KEY_LEN,
                    actual: peer_public_bytes.len(),
                })?;
        let shared = self.secret.diffie_hellman(&PublicKey::from(peer));

        let hk = Hkdf::<Sha256>::new(Some(HKDF_SALT), shared.as_bytes());
        let mut key = [0u8; 32];
        hk.expand(HKDF_INFO, &mut key)
            .map_err(|e| CryptoError::KeyDerivationFailed(e.to_string()))?;
        let session = SessionKey(key);
        key.zeroize();
        Ok(session)
    }
}

/// Symmetric key derived from a completed pairing. Zeroized on drop.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct SessionKey([u8; 32]);

impl std::fmt::Debug for SessionKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("SessionKey([REDACTED])")
    }
}

impl SessionKey {
    pub const fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}
