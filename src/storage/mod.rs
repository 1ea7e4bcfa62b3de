//! Storage layer for carrier images.
//!
//! This module handles:
//! - Decoding image files into flat RGBA channel buffers
//! - Encoding buffers back to lossless image files

mod host_image;

pub use host_image::{is_lossy_path, HostImage};
