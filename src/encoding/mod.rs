//! Payload codec: bit strings, capacity planning, embedding and extraction.
//!
//! The payload is written into a flat RGBA channel buffer as parity deltas
//! between neighbouring slots, prefixed by a self-describing spacing header.

mod bits;
mod capacity;
mod decoder;
mod encoder;

pub use bits::{bit_length, BitString, ParseBitStringError};
pub use capacity::{
    max_message_bytes, minimum_slots, plan_spacing, wire_bits_for_message, CapacityReport,
};
pub use decoder::{extract, read_header};
pub use encoder::{embed, EmbedReport};
