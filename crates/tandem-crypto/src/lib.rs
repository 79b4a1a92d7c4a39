//! Tandem Pairing Crypto
//!
//! Key material for pairing a terminal with a mobile app or web browser.
//!
//! - **Ephemeral key**: X25519 keypair generated per pairing attempt; its
//!   public half is shown to the user (URL fragment or mobile code)
//! - **Session key**: X25519 ECDH with the peer's reply → HKDF-SHA256

pub mod ephemeral;
pub mod error;

pub use ephemeral::{EphemeralKeyPair, PUBLIC_KEY_LEN, SessionKey};
pub use error::CryptoError;
