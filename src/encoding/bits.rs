//! Conversion between text and MSB-first bit strings.

use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// An ordered sequence of bits, grouped MSB-first into bytes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BitString {
    bits: Vec<bool>,
}

impl BitString {
    /// Create an empty bit string.
    pub fn new() -> Self {
        Self::default()
    }

    /// Encode text as its UTF-8 bytes, 8 bits per byte, MSB first.
    pub fn from_text(text: &str) -> Self {
        Self::from_bytes(text.as_bytes())
    }

    /// Encode raw bytes, 8 bits per byte, MSB first.
    pub fn from_bytes(bytes: &[u8]) -> Self {
        let bits = bytes
            .iter()
            .flat_map(|&byte| (0..8).rev().map(move |shift| (byte >> shift) & 1 == 1))
            .collect();
        Self { bits }
    }

    /// Minimal binary representation of `value` (no leading zeros; `0` is a
    /// single zero bit).
    pub fn from_value(value: usize) -> Self {
        let width = bit_length(value);
        let bits = (0..width).rev().map(|shift| (value >> shift) & 1 == 1).collect();
        Self { bits }
    }

    /// Group into bytes, left-padding the whole string with zero bits to a
    /// multiple of 8.
    pub fn to_bytes(&self) -> Vec<u8> {
        let padding = (8 - self.bits.len() % 8) % 8;
        let padded = std::iter::repeat(false).take(padding).chain(self.bits.iter().copied());

        let mut bytes = Vec::with_capacity((self.bits.len() + padding) / 8);
        let mut current = 0u8;
        for (i, bit) in padded.enumerate() {
            current = (current << 1) | bit as u8;
            if i % 8 == 7 {
                bytes.push(current);
                current = 0;
            }
        }
        bytes
    }

    /// Decode as UTF-8 text. Never fails: invalid sequences are replaced
    /// with U+FFFD.
    pub fn to_text(&self) -> String {
        String::from_utf8_lossy(&self.to_bytes()).into_owned()
    }

    /// Interpret as an unsigned big-endian integer.
    ///
    /// Returns `None` when empty or too wide for `usize`.
    pub fn to_value(&self) -> Option<usize> {
        if self.bits.is_empty() {
            return None;
        }
        self.bits.iter().try_fold(0usize, |acc, &bit| {
            acc.checked_mul(2).and_then(|v| v.checked_add(bit as usize))
        })
    }

    /// Append one bit.
    pub fn push(&mut self, bit: bool) {
        self.bits.push(bit);
    }

    /// Number of bits.
    pub fn len(&self) -> usize {
        self.bits.len()
    }

    /// Whether there are no bits.
    pub fn is_empty(&self) -> bool {
        self.bits.is_empty()
    }

    /// Iterate over the bits in order.
    pub fn iter(&self) -> impl Iterator<Item = bool> + '_ {
        self.bits.iter().copied()
    }
}

/// Number of binary digits needed to write `value` (at least one).
pub fn bit_length(value: usize) -> usize {
    (usize::BITS - value.leading_zeros()).max(1) as usize
}

impl FromIterator<bool> for BitString {
    fn from_iter<I: IntoIterator<Item = bool>>(iter: I) -> Self {
        Self {
            bits: iter.into_iter().collect(),
        }
    }
}

impl fmt::Display for BitString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for &bit in &self.bits {
            f.write_str(if bit { "1" } else { "0" })?;
        }
        Ok(())
    }
}

/// Error returned when parsing a bit string containing a non-binary digit.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid binary digit {found:?} at position {position}")]
pub struct ParseBitStringError {
    /// Offending character.
    pub found: char,
    /// Its position in the input.
    pub position: usize,
}

impl FromStr for BitString {
    type Err = ParseBitStringError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        s.chars()
            .enumerate()
            .map(|(position, c)| match c {
                '0' => Ok(false),
                '1' => Ok(true),
                found => Err(ParseBitStringError { found, position }),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_to_bits() {
        assert_eq!(
            BitString::from_text("Hello, World!").to_string(),
            "01001000011001010110110001101100011011110010110000100000\
             010101110110111101110010011011000110010000100001"
        );
        assert_eq!(BitString::from_text("a").to_string(), "01100001");
        assert!(BitString::from_text("").is_empty());
    }

    #[test]
    fn test_bits_to_text() {
        let abc: BitString = "010000010100001001000011".parse().unwrap();
        assert_eq!(abc.to_text(), "ABC");

        let hello: BitString = "0110100001100101011011000110110001101111".parse().unwrap();
        assert_eq!(hello.to_text(), "hello");

        assert_eq!(BitString::new().to_text(), "");
    }

    #[test]
    fn test_unaligned_bits_pad_at_front() {
        // "100001" pads to "00100001" = '!'
        let bits: BitString = "100001".parse().unwrap();
        assert_eq!(bits.to_text(), "!");

        // Ten bits pad to two bytes: 000000 10 | 0100 0001 -> [0x02, 0x41]
        let bits: BitString = "1001000001".parse().unwrap();
        assert_eq!(bits.to_bytes(), vec![0x02, 0x41]);
    }

    #[test]
    fn test_text_roundtrip_multibyte() {
        for text in ["", "plain ascii", "ümlaut", "日本語テキスト", "emoji 🦀 crab"] {
            let bits = BitString::from_text(text);
            assert_eq!(bits.len() % 8, 0);
            assert_eq!(bits.to_text(), text);
        }
    }

    #[test]
    fn test_invalid_utf8_is_lossy() {
        let bits = BitString::from_bytes(&[0xff, b'a']);
        assert_eq!(bits.to_text(), "\u{fffd}a");
    }

    #[test]
    fn test_value_roundtrip() {
        assert_eq!(BitString::from_value(0).to_string(), "0");
        assert_eq!(BitString::from_value(5).to_string(), "101");
        assert_eq!(BitString::from_value(1024).len(), 11);
        for value in [0, 1, 3, 255, 256, 123_456, usize::MAX] {
            assert_eq!(BitString::from_value(value).to_value(), Some(value));
        }
    }

    #[test]
    fn test_value_overflow_and_empty() {
        assert_eq!(BitString::new().to_value(), None);
        let wide: BitString = std::iter::repeat(true).take(usize::BITS as usize + 1).collect();
        assert_eq!(wide.to_value(), None);
    }

    #[test]
    fn test_parse_rejects_non_binary() {
        let err = "0102".parse::<BitString>().unwrap_err();
        assert_eq!(err.found, '2');
        assert_eq!(err.position, 3);
        assert_eq!(err.to_string(), "invalid binary digit '2' at position 3");

        let boxed: Box<dyn std::error::Error> = Box::new(err);
        assert!(boxed.source().is_none());
    }

    #[test]
    fn test_bit_length() {
        assert_eq!(bit_length(0), 1);
        assert_eq!(bit_length(1), 1);
        assert_eq!(bit_length(2), 2);
        assert_eq!(bit_length(255), 8);
        assert_eq!(bit_length(256), 9);
    }
}
