//! Cryptographic operations for pixelveil.
//!
//! This module provides:
//! - AES-256-CBC encryption with PKCS#7 padding
//! - SHA-256 passphrase-to-key derivation

mod cipher;
mod kdf;

pub use cipher::{decrypt, encrypt, CipherText};
pub use kdf::{derive_key, Passphrase};
