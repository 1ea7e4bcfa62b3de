//! Extracting a payload from a pixel buffer.
//!
//! Walks the same slots as the encoder: header bits at stride 2 from slot 1
//! up to the first delimiter, then payload bits at the decoded spacing up to
//! the next delimiter or the end of the buffer.

use crate::config::layout_params::{FIRST_SLOT, HEADER_STRIDE, MIN_SPACING};
use crate::encoding::bits::BitString;
use crate::error::{Error, Result};
use log::{debug, warn};

/// Bit carried by `buf[slot]`, or `None` if the slot is a delimiter.
fn read_bit(buf: &[u8], slot: usize) -> Option<bool> {
    let (current, prev) = (buf[slot], buf[slot - 1]);
    if current == prev {
        None
    } else {
        Some(current.abs_diff(prev) % 2 == 1)
    }
}

/// Read the spacing header.
///
/// Returns the spacing and the slot of the header delimiter.
pub fn read_header(buf: &[u8]) -> Result<(usize, usize)> {
    let max_header_bits = usize::BITS as usize;
    let mut header = BitString::new();
    let mut slot = FIRST_SLOT;

    loop {
        if slot >= buf.len() {
            return Err(Error::MalformedHeader(format!(
                "no header delimiter within {} slots",
                buf.len()
            )));
        }
        match read_bit(buf, slot) {
            Some(bit) => header.push(bit),
            None => break,
        }
        if header.len() > max_header_bits {
            return Err(Error::MalformedHeader(format!(
                "header longer than {} bits",
                max_header_bits
            )));
        }
        slot += HEADER_STRIDE;
    }

    let spacing = header
        .to_value()
        .ok_or_else(|| Error::MalformedHeader("empty header".to_string()))?;

    if spacing < MIN_SPACING {
        return Err(Error::MalformedHeader(format!(
            "spacing {} is below the minimum of {}",
            spacing, MIN_SPACING
        )));
    }
    if spacing > buf.len() {
        warn!(
            "header spacing {} exceeds buffer length {}; image probably carries no message",
            spacing,
            buf.len()
        );
    }

    Ok((spacing, slot))
}

/// Extract the payload bits embedded in `buf`.
pub fn extract(buf: &[u8]) -> Result<BitString> {
    let (spacing, delimiter_slot) = read_header(buf)?;

    let mut payload = BitString::new();
    let mut slot = delimiter_slot + HEADER_STRIDE;
    while slot < buf.len() {
        match read_bit(buf, slot) {
            Some(bit) => payload.push(bit),
            None => break,
        }
        slot = match slot.checked_add(spacing) {
            Some(next) => next,
            None => break,
        };
    }

    debug!(
        "extracted {} payload bits at spacing {} from {} slots",
        payload.len(),
        spacing,
        buf.len()
    );

    Ok(payload)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encoding::encoder::embed;

    #[test]
    fn test_read_bit_parity() {
        assert_eq!(read_bit(&[10, 11], 1), Some(true));
        assert_eq!(read_bit(&[10, 12], 1), Some(false));
        assert_eq!(read_bit(&[250, 249], 1), Some(true));
        assert_eq!(read_bit(&[250, 248], 1), Some(false));
        assert_eq!(read_bit(&[7, 7], 1), None);
    }

    #[test]
    fn test_extract_inverts_embed() {
        let mut buf: Vec<u8> = (0..400).map(|i| (i * 37 % 256) as u8).collect();
        let payload: BitString = "1100101011110000".parse().unwrap();

        embed(&mut buf, &payload, 7).unwrap();
        assert_eq!(extract(&buf).unwrap(), payload);
    }

    #[test]
    fn test_extract_without_terminator() {
        let mut buf = vec![10u8; 25];
        let payload: BitString = "1010".parse().unwrap();

        embed(&mut buf, &payload, 5).unwrap();
        assert_eq!(extract(&buf).unwrap(), payload);
    }

    #[test]
    fn test_header_position() {
        let mut buf = vec![10u8; 40];
        let payload: BitString = "1".parse().unwrap();

        embed(&mut buf, &payload, 5).unwrap();
        assert_eq!(read_header(&buf).unwrap(), (5, 7));
    }

    #[test]
    fn test_uniform_buffer_has_empty_header() {
        let buf = vec![42u8; 64];
        assert!(matches!(extract(&buf), Err(Error::MalformedHeader(_))));
    }

    #[test]
    fn test_no_delimiter_is_malformed() {
        // Strictly increasing: no slot ever equals its predecessor.
        let buf: Vec<u8> = (0..40).collect();
        assert!(matches!(read_header(&buf), Err(Error::MalformedHeader(_))));
    }

    #[test]
    fn test_overlong_header_is_malformed() {
        let buf: Vec<u8> = (0..=255).cycle().take(1000).collect();
        assert!(matches!(read_header(&buf), Err(Error::MalformedHeader(_))));
    }

    #[test]
    fn test_small_spacing_is_malformed() {
        // header "10" = 2, then delimiter
        let buf = [10u8, 11, 10, 12, 10, 10, 0, 0];
        assert!(matches!(read_header(&buf), Err(Error::MalformedHeader(_))));
    }

    #[test]
    fn test_tiny_buffers() {
        assert!(matches!(extract(&[]), Err(Error::MalformedHeader(_))));
        assert!(matches!(extract(&[1]), Err(Error::MalformedHeader(_))));
    }
}
