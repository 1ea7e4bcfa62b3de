//! AES-256-CBC encryption with a random IV per message.

use crate::config::cipher_params::{BLOCK_SIZE, IV_LENGTH, WIRE_SEPARATOR};
use crate::crypto::kdf::Passphrase;
use crate::error::{Error, Result};
use aes::cipher::block_padding::Pkcs7;
use aes::cipher::{BlockDecryptMut, BlockEncryptMut, KeyIvInit};
use rand::RngCore;
use std::fmt;
use std::str::FromStr;

type Aes256CbcEnc = cbc::Encryptor<aes::Aes256>;
type Aes256CbcDec = cbc::Decryptor<aes::Aes256>;

/// An encrypted message together with the IV needed to decrypt it.
///
/// The wire form is `hex(iv):hex(ciphertext)`, produced by `Display` and
/// parsed by `FromStr`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CipherText {
    /// Initialization vector.
    pub iv: [u8; IV_LENGTH],
    /// PKCS#7-padded ciphertext.
    pub ciphertext: Vec<u8>,
}

impl CipherText {
    /// Length of the wire form in bytes.
    pub fn wire_len(&self) -> usize {
        IV_LENGTH * 2 + 1 + self.ciphertext.len() * 2
    }
}

impl fmt::Display for CipherText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{}{}",
            hex::encode(self.iv),
            WIRE_SEPARATOR,
            hex::encode(&self.ciphertext)
        )
    }
}

impl FromStr for CipherText {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let (iv_hex, data_hex) = s
            .split_once(WIRE_SEPARATOR)
            .ok_or_else(|| Error::InvalidCipherText("missing ':' separator".to_string()))?;

        let iv_bytes = hex::decode(iv_hex)
            .map_err(|e| Error::InvalidCipherText(format!("IV is not hex: {}", e)))?;
        let iv: [u8; IV_LENGTH] = iv_bytes.try_into().map_err(|v: Vec<u8>| {
            Error::InvalidCipherText(format!("IV must be {} bytes, got {}", IV_LENGTH, v.len()))
        })?;

        let ciphertext = hex::decode(data_hex)
            .map_err(|e| Error::InvalidCipherText(format!("ciphertext is not hex: {}", e)))?;

        Ok(Self { iv, ciphertext })
    }
}

/// Encrypt a message with a fresh random IV.
pub fn encrypt(message: &str, passphrase: &Passphrase) -> Result<CipherText> {
    let key = passphrase.derive_key();

    let mut iv = [0u8; IV_LENGTH];
    rand::thread_rng().fill_bytes(&mut iv);

    let ciphertext = Aes256CbcEnc::new_from_slices(&key, &iv)
        .map_err(|e| Error::Encryption(e.to_string()))?
        .encrypt_padded_vec_mut::<Pkcs7>(message.as_bytes());

    Ok(CipherText { iv, ciphertext })
}

/// Decrypt a message that was encrypted with `encrypt`.
///
/// A wrong passphrase is detected only through invalid padding or invalid
/// UTF-8 in the plaintext; there is no authentication tag.
pub fn decrypt(encrypted: &CipherText, passphrase: &Passphrase) -> Result<String> {
    if encrypted.ciphertext.is_empty() || encrypted.ciphertext.len() % BLOCK_SIZE != 0 {
        return Err(Error::Decryption);
    }

    let key = passphrase.derive_key();
    let plaintext = Aes256CbcDec::new_from_slices(&key, &encrypted.iv)
        .map_err(|_| Error::Decryption)?
        .decrypt_padded_vec_mut::<Pkcs7>(&encrypted.ciphertext)
        .map_err(|_| Error::Decryption)?;

    String::from_utf8(plaintext).map_err(|_| Error::Decryption)
}
