// SPDX-FileCopyrightText: Copyright (c) 2017-2025 slowtec GmbH <post@slowtec.de>
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Byte-order normalization for wire fields.
//!
//! Modbus transmits all multi-byte fields big-endian. Every such field,
//! whether a single address or a whole register array, is normalized by
//! [`swap_host_wire_endian`] before it goes onto the wire and again after it
//! has been read back. Both directions are the same in-place transform.

/// Returns `true` if the host stores integers least-significant byte first.
///
/// Derived from the byte layout of a known value, so it cannot disagree with
/// the actual target byte order.
#[must_use]
pub const fn host_is_little_endian() -> bool {
    u16::from_ne_bytes([1, 0]) == 1
}

/// Reverses the bytes of each `width`-sized element of `buf` in place.
///
/// Widths of 2, 4 and 8 take a bulk path over the matching integer type;
/// any other width of at least 2 falls back to a generic per-element
/// reversal.
///
/// # Panics
///
/// Panics if `width < 2` or if `buf.len()` is not a multiple of `width`.
/// Either indicates a logic error in the caller, not malformed input.
pub fn swap_element_bytes(buf: &mut [u8], width: usize) {
    assert!(width >= 2, "element width {width} is too small to swap");
    assert!(
        buf.len() % width == 0,
        "buffer length {} is not a multiple of the element width {width}",
        buf.len()
    );

    match width {
        2 => {
            for chunk in buf.chunks_exact_mut(2) {
                let value = u16::from_ne_bytes([chunk[0], chunk[1]]);
                chunk.copy_from_slice(&value.swap_bytes().to_ne_bytes());
            }
        }
        4 => {
            for chunk in buf.chunks_exact_mut(4) {
                let value = u32::from_ne_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]);
                chunk.copy_from_slice(&value.swap_bytes().to_ne_bytes());
            }
        }
        8 => {
            for chunk in buf.chunks_exact_mut(8) {
                let value = u64::from_ne_bytes([
                    chunk[0], chunk[1], chunk[2], chunk[3], chunk[4], chunk[5], chunk[6], chunk[7],
                ]);
                chunk.copy_from_slice(&value.swap_bytes().to_ne_bytes());
            }
        }
        _ => {
            for element in buf.chunks_exact_mut(width) {
                element.reverse();
            }
        }
    }
}

/// Normalizes `buf` between host and wire byte order in place.
///
/// The wire is big-endian, so this is a no-op on big-endian hosts.
pub fn swap_host_wire_endian(buf: &mut [u8], width: usize) {
    if host_is_little_endian() {
        swap_element_bytes(buf, width);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_host_byte_order() {
        assert_eq!(host_is_little_endian(), cfg!(target_endian = "little"));
    }

    #[test]
    fn swap_u16_elements() {
        let mut buf = [0x12, 0x34, 0xAB, 0xCD];
        swap_element_bytes(&mut buf, 2);
        assert_eq!(buf, [0x34, 0x12, 0xCD, 0xAB]);
    }

    #[test]
    fn swap_u32_elements() {
        let mut buf = [0x01, 0x02, 0x03, 0x04, 0xAA, 0xBB, 0xCC, 0xDD];
        swap_element_bytes(&mut buf, 4);
        assert_eq!(buf, [0x04, 0x03, 0x02, 0x01, 0xDD, 0xCC, 0xBB, 0xAA]);
    }

    #[test]
    fn swap_u64_elements() {
        let mut buf = [0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07, 0x08];
        swap_element_bytes(&mut buf, 8);
        assert_eq!(buf, [0x08, 0x07, 0x06, 0x05, 0x04, 0x03, 0x02, 0x01]);
    }

    #[test]
    fn round_trip_restores_input() {
        let original: Vec<u8> = (0u8..64).map(|i| i.wrapping_mul(37).wrapping_add(11)).collect();
        for width in [2, 4, 8] {
            let mut buf = original.clone();
            swap_element_bytes(&mut buf, width);
            assert_ne!(buf, original);
            swap_element_bytes(&mut buf, width);
            assert_eq!(buf, original);
        }
    }

    #[test]
    fn generic_path_equals_manual_reversal() {
        for width in [3, 6] {
            let original: Vec<u8> = (0u8..30).collect();
            let mut buf = original.clone();
            swap_element_bytes(&mut buf, width);

            let mut expected = original;
            for element in expected.chunks_exact_mut(width) {
                element.reverse();
            }
            assert_eq!(buf, expected);
        }
    }

    #[test]
    #[should_panic(expected = "too small to swap")]
    fn rejects_single_byte_width() {
        swap_element_bytes(&mut [0x00, 0x01], 1);
    }

    #[test]
    #[should_panic(expected = "not a multiple")]
    fn rejects_partial_elements() {
        swap_element_bytes(&mut [0x00, 0x01, 0x02], 2);
    }

    #[test]
    fn host_wire_round_trip() {
        let mut buf = [0x00, 0x13, 0x00, 0x25];
        swap_host_wire_endian(&mut buf, 2);
        swap_host_wire_endian(&mut buf, 2);
        assert_eq!(buf, [0x00, 0x13, 0x00, 0x25]);
    }
}
