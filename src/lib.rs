//! Pixelveil
//!
//! Hides an encrypted text message in the raw pixel data of an image and
//! recovers it later.
//!
//! # Features
//!
//! - **AES-256-CBC Encryption**: SHA-256 passphrase keys, random IV per message
//! - **Self-describing layout**: the payload stride is stored in the image
//! - **Capacity-adaptive**: the payload is spread over the whole image
//! - **CLI Interface**: `encrypt`, `decrypt`, `capacity` and `generate`
//!
//! # Architecture
//!
//! ```text
//! Message → Encrypt (AES-256-CBC) → Bits → Plan spacing → Embed (RGBA deltas)
//! ```
//!
//! # Example
//!
//! ```rust
//! use pixelveil::crypto::Passphrase;
//! use pixelveil::storage::HostImage;
//! use pixelveil::stego::{hide_message, reveal_message};
//!
//! let mut image = HostImage::solid(64, 64, [255, 0, 0, 255]);
//! let key = Passphrase::new("password");
//!
//! hide_message(image.pixels_mut(), "Hidden data", &key).unwrap();
//!
//! let message = reveal_message(image.pixels(), &key).unwrap();
//! assert_eq!(message, "Hidden data");
//! ```

pub mod config;
pub mod crypto;
pub mod encoding;
pub mod error;
pub mod stego;
pub mod storage;

pub use config::StegoConfig;
pub use error::{Error, Result};
