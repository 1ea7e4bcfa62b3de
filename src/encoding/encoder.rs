//! Embedding a payload into a pixel buffer.
//!
//! Layout over the flat channel buffer:
//!
//! ```text
//! slot 0      anchor, never written
//! 1, 3, 5...  spacing header bits (stride 2)
//! next        header delimiter (equal to its predecessor)
//! +2          first payload bit, then every `spacing` slots
//! next        payload terminator, if still inside the buffer
//! ```
//!
//! Each bit is a delta from the slot just before it: +1 for a one, +2 for a
//! zero, reflected downwards when the sum would exceed 250.

use crate::config::layout_params::{
    DELTA_ONE, DELTA_ZERO, FIRST_SLOT, HEADER_STRIDE, MIN_SPACING, WRAP_THRESHOLD,
};
use crate::encoding::bits::BitString;
use crate::error::{Error, Result};
use log::debug;

/// Summary of what `embed` wrote.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmbedReport {
    /// Spacing between payload bits.
    pub spacing: usize,
    /// Number of header bits written.
    pub header_bits: usize,
    /// Number of payload bits written.
    pub payload_bits: usize,
    /// Index of the last payload slot.
    pub last_payload_slot: usize,
    /// Whether an explicit terminator was written after the payload.
    pub terminated: bool,
}

/// Write one bit into `buf[slot]` relative to `buf[slot - 1]`.
pub(crate) fn write_bit(buf: &mut [u8], slot: usize, bit: bool) {
    let prev = buf[slot - 1] as u16;
    let delta = if bit { DELTA_ONE } else { DELTA_ZERO };
    let raised = prev + delta;
    // prev > 248 here, so the subtraction cannot underflow.
    let value = if raised > WRAP_THRESHOLD { prev - delta } else { raised };
    buf[slot] = value as u8;
}

/// Make `buf[slot]` a delimiter by copying its predecessor.
pub(crate) fn write_delimiter(buf: &mut [u8], slot: usize) {
    buf[slot] = buf[slot - 1];
}

/// Embed `payload` into `buf` at the given `spacing`.
///
/// The spacing must come from [`plan_spacing`](crate::encoding::plan_spacing)
/// for `buf.len()` and `payload.len()`; a spacing that does not fit is
/// rejected before anything is written.
pub fn embed(buf: &mut [u8], payload: &BitString, spacing: usize) -> Result<EmbedReport> {
    if payload.is_empty() {
        return Err(Error::EmptyMessage);
    }

    let header = BitString::from_value(spacing);
    let delimiter_slot = FIRST_SLOT + header.len() * HEADER_STRIDE;
    let first_payload_slot = delimiter_slot + HEADER_STRIDE;
    let last_payload_slot = (payload.len() - 1)
        .checked_mul(spacing)
        .and_then(|offset| offset.checked_add(first_payload_slot));

    let needed = last_payload_slot.map_or(usize::MAX, |slot| slot + 1);
    if spacing < MIN_SPACING || needed > buf.len() {
        return Err(Error::InsufficientCapacity {
            needed,
            available: buf.len(),
        });
    }

    let mut slot = FIRST_SLOT;
    for bit in header.iter() {
        write_bit(buf, slot, bit);
        slot += HEADER_STRIDE;
    }
    write_delimiter(buf, slot);
    slot += HEADER_STRIDE;

    for bit in payload.iter() {
        write_bit(buf, slot, bit);
        slot += spacing;
    }
    let last = slot - spacing;

    let terminated = slot < buf.len();
    if terminated {
        write_delimiter(buf, slot);
    }

    debug!(
        "embedded {} header bits and {} payload bits at spacing {}, last slot {} of {}",
        header.len(),
        payload.len(),
        spacing,
        last,
        buf.len()
    );

    Ok(EmbedReport {
        spacing,
        header_bits: header.len(),
        payload_bits: payload.len(),
        last_payload_slot: last,
        terminated,
    })
}
