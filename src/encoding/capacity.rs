//! Capacity planning: choosing the payload spacing for a buffer.
//!
//! The payload is spread evenly over the buffer at a fixed stride (the
//! spacing). The spacing is written in front of the payload, so a larger
//! spacing needs more header slots, which in turn can shrink the spacing.
//! The planner iterates until the two agree.

use crate::config::cipher_params::{BLOCK_SIZE, IV_LENGTH};
use crate::config::layout_params::{FRAMING_OVERHEAD, MAX_PLANNER_ITERATIONS, MIN_SPACING};
use crate::encoding::bits::bit_length;
use crate::error::{Error, Result};
use log::debug;
use serde::Serialize;

/// Capacity summary for a buffer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CapacityReport {
    /// Number of channel slots in the buffer.
    pub total_slots: usize,
    /// Longest plaintext, in UTF-8 bytes, that fits.
    pub max_message_bytes: usize,
    /// Spacing that a maximum-length message would be embedded at.
    pub spacing_at_max: Option<usize>,
}

impl CapacityReport {
    /// Build a report for a buffer of `total_slots` channel values.
    pub fn for_slots(total_slots: usize) -> Self {
        let max_message_bytes = max_message_bytes(total_slots);
        let spacing_at_max = if max_message_bytes == 0 {
            None
        } else {
            plan_spacing(total_slots, wire_bits_for_message(max_message_bytes)).ok()
        };
        Self {
            total_slots,
            max_message_bytes,
            spacing_at_max,
        }
    }
}

/// Header bits plus framing for a given spacing.
fn framed_header_slots(spacing: usize) -> usize {
    bit_length(spacing) + FRAMING_OVERHEAD
}

/// Whether `spacing` leaves room for the payload and its own header.
fn fits(total_slots: usize, payload_bits: usize, spacing: usize) -> bool {
    payload_bits
        .checked_add(framed_header_slots(spacing))
        .and_then(|units| units.checked_mul(spacing))
        .map_or(false, |needed| needed <= total_slots)
}

/// Largest spacing no greater than `ceiling` that fits.
///
/// Every spacing of header width `w` lies in `2^(w-1)..2^w`, so the best
/// candidate per width is a single division.
fn largest_fitting_spacing(total_slots: usize, payload_bits: usize, ceiling: usize) -> usize {
    (1..=usize::BITS as usize)
        .filter_map(|width| {
            let low = 1usize << (width - 1);
            let high = low.saturating_sub(1).saturating_add(low);
            let units = payload_bits.checked_add(width + FRAMING_OVERHEAD)?;
            let candidate = (total_slots / units).min(high).min(ceiling);
            (candidate >= low).then_some(candidate)
        })
        .max()
        .unwrap_or(0)
}

/// Smallest buffer that can carry `payload_bits` at the minimum spacing.
pub fn minimum_slots(payload_bits: usize) -> usize {
    MIN_SPACING.saturating_mul(payload_bits.saturating_add(framed_header_slots(MIN_SPACING)))
}

/// Compute the spacing for `payload_bits` in a buffer of `total_slots`.
///
/// # Errors
///
/// - `EmptyMessage` if there is nothing to embed.
/// - `InsufficientCapacity` if the converged spacing is below `MIN_SPACING`.
pub fn plan_spacing(total_slots: usize, payload_bits: usize) -> Result<usize> {
    if payload_bits == 0 {
        return Err(Error::EmptyMessage);
    }

    let mut spacing = total_slots / payload_bits;
    let mut previous = None;
    let mut iterations = 0;

    while iterations < MAX_PLANNER_ITERATIONS {
        iterations += 1;
        let next = total_slots / (payload_bits + framed_header_slots(spacing));
        if next == spacing {
            break;
        }
        // Two-cycle across a header-width boundary; the smaller value fits.
        if previous == Some(next) {
            spacing = spacing.min(next);
            break;
        }
        previous = Some(spacing);
        spacing = next;
    }

    if !fits(total_slots, payload_bits, spacing) {
        spacing = largest_fitting_spacing(total_slots, payload_bits, spacing);
    }

    debug!(
        "planned spacing {} for {} payload bits in {} slots ({} iterations)",
        spacing, payload_bits, total_slots, iterations
    );

    if spacing < MIN_SPACING {
        return Err(Error::InsufficientCapacity {
            needed: minimum_slots(payload_bits),
            available: total_slots,
        });
    }

    Ok(spacing)
}

/// Exact payload bit count of the wire form for a plaintext of `message_bytes`.
pub fn wire_bits_for_message(message_bytes: usize) -> usize {
    let padded = (message_bytes / BLOCK_SIZE + 1) * BLOCK_SIZE;
    (IV_LENGTH * 2 + 1 + padded * 2) * 8
}

/// Longest plaintext, in UTF-8 bytes, that a buffer of `total_slots` can hide.
///
/// Returns 0 when not even a one-block message fits.
pub fn max_message_bytes(total_slots: usize) -> usize {
    let blocks_fit =
        |blocks: usize| plan_spacing(total_slots, wire_bits_for_message(blocks * BLOCK_SIZE - 1)).is_ok();

    if !blocks_fit(1) {
        return 0;
    }

    // Invariant: `lo` blocks fit, `hi` blocks do not.
    let mut lo = 1;
    let mut hi = total_slots / (MIN_SPACING * BLOCK_SIZE * 2 * 8) + 2;
    while hi - lo > 1 {
        let mid = lo + (hi - lo) / 2;
        if blocks_fit(mid) {
            lo = mid;
        } else {
            hi = mid;
        }
    }

    lo * BLOCK_SIZE - 1
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simple_fixed_point() {
        // 1600 / 520 = 3, and 1600 / (520 + 2 + 2) = 3
        assert_eq!(plan_spacing(1600, 520).unwrap(), 3);
    }

    #[test]
    fn test_large_buffer_spacing() {
        let total = 640 * 480 * 4;
        let spacing = plan_spacing(total, 520).unwrap();
        assert!(fits(total, 520, spacing));
        assert!(!fits(total, 520, spacing + 1));
    }

    #[test]
    fn test_two_cycle_settles_on_smaller() {
        // 56/10 = 5 -> 56/15 = 3 -> 56/14 = 4 -> 56/15 = 3 -> ...
        assert_eq!(plan_spacing(56, 10).unwrap(), 3);
    }

    #[test]
    fn test_insufficient_capacity() {
        let err = plan_spacing(1520, 520).unwrap_err();
        match err {
            Error::InsufficientCapacity { needed, available } => {
                assert_eq!(needed, 1572);
                assert_eq!(available, 1520);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_zero_slots() {
        assert!(matches!(
            plan_spacing(0, 8),
            Err(Error::InsufficientCapacity { .. })
        ));
    }

    #[test]
    fn test_empty_payload() {
        assert!(matches!(plan_spacing(1000, 0), Err(Error::EmptyMessage)));
    }

    #[test]
    fn test_terminates_over_sweep() {
        for total in (1..5000).step_by(7) {
            for payload in 1..60 {
                if let Ok(spacing) = plan_spacing(total, payload) {
                    assert!(spacing >= MIN_SPACING);
                    assert!(fits(total, payload, spacing), "{total}/{payload}");
                }
            }
        }
    }

    #[test]
    fn test_largest_fitting_spacing_matches_linear_search() {
        for total in (0..2000).step_by(13) {
            for payload in 1..40 {
                for ceiling in [0, 3, 7, 64, total] {
                    let mut expected = ceiling;
                    while expected > 0 && !fits(total, payload, expected) {
                        expected -= 1;
                    }
                    assert_eq!(
                        largest_fitting_spacing(total, payload, ceiling),
                        expected,
                        "{total}/{payload}/{ceiling}"
                    );
                }
            }
        }
    }

    #[test]
    fn test_largest_fitting_spacing_for_huge_ceiling() {
        let total = usize::MAX / 2;
        let spacing = largest_fitting_spacing(total, 1, usize::MAX);
        assert!(fits(total, 1, spacing));
        assert!(!fits(total, 1, spacing + 1));
    }

    #[test]
    fn test_wire_bits_for_message() {
        // "Hello, World!" -> 32 hex IV + ':' + 32 hex ciphertext
        assert_eq!(wire_bits_for_message(13), 65 * 8);
        assert_eq!(wire_bits_for_message(15), 65 * 8);
        assert_eq!(wire_bits_for_message(16), 97 * 8);
    }

    #[test]
    fn test_max_message_bytes() {
        assert_eq!(max_message_bytes(1520), 0);
        assert_eq!(max_message_bytes(1600), 15);

        let total = 100 * 100 * 4;
        let max = max_message_bytes(total);
        assert!(plan_spacing(total, wire_bits_for_message(max)).is_ok());
        assert!(plan_spacing(total, wire_bits_for_message(max + 1)).is_err());
    }

    #[test]
    fn test_capacity_report() {
        let report = CapacityReport::for_slots(1600);
        assert_eq!(report.max_message_bytes, 15);
        assert_eq!(report.spacing_at_max, Some(3));

        let empty = CapacityReport::for_slots(16);
        assert_eq!(empty.max_message_bytes, 0);
        assert_eq!(empty.spacing_at_max, None);
    }

    #[test]
    fn test_capacity_report_json() {
        let json = serde_json::to_value(CapacityReport::for_slots(1600)).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "total_slots": 1600,
                "max_message_bytes": 15,
                "spacing_at_max": 3,
            })
        );

        let empty = serde_json::to_value(CapacityReport::for_slots(16)).unwrap();
        assert!(empty["spacing_at_max"].is_null());
    }
}
