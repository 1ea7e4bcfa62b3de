//! SHA-256 key derivation from a passphrase.

use crate::config::cipher_params;
use sha2::{Digest, Sha256};
use std::fmt;

/// A passphrase that may be absent.
///
/// An absent passphrase hashes as the text `"undefined"`, so messages hidden
/// without a key can still be revealed without one.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Passphrase(Option<String>);

impl Passphrase {
    /// Wrap a passphrase given as text. The empty string is a real passphrase.
    pub fn new(text: impl Into<String>) -> Self {
        Self(Some(text.into()))
    }

    /// A passphrase that was never supplied.
    pub fn absent() -> Self {
        Self(None)
    }

    /// Whether a passphrase was supplied.
    pub fn is_present(&self) -> bool {
        self.0.is_some()
    }

    /// The text that is hashed into the key.
    pub fn as_text(&self) -> &str {
        self.0.as_deref().unwrap_or(cipher_params::MISSING_KEY_TEXT)
    }

    /// Derive the 256-bit AES key.
    pub fn derive_key(&self) -> [u8; cipher_params::KEY_LENGTH] {
        derive_key(self.as_text())
    }
}

impl From<Option<String>> for Passphrase {
    fn from(value: Option<String>) -> Self {
        Self(value)
    }
}

impl From<&str> for Passphrase {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl fmt::Debug for Passphrase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(_) => f.write_str("Passphrase(***)"),
            None => f.write_str("Passphrase(absent)"),
        }
    }
}

/// Derive a 256-bit key as the SHA-256 digest of the passphrase text.
pub fn derive_key(passphrase: &str) -> [u8; cipher_params::KEY_LENGTH] {
    Sha256::digest(passphrase.as_bytes()).into()
}
