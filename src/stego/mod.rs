//! Hiding encrypted messages in images.
//!
//! ```text
//! encode: message → AES-256-CBC → "iv:ct" hex → bits → plan spacing → embed
//! decode: extract → bits → "iv:ct" hex → AES-256-CBC → message
//! ```

mod operations;

pub use operations::{
    decrypt_image, encrypt_image, hide_message, image_capacity, reveal_ciphertext,
    reveal_message, HideReport,
};
