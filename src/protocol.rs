//! Bit-level framing for text messages.
//!
//! This module turns a UTF-8 string into a self-delimiting, checksummed bit
//! sequence and back. It is the wire protocol shared by every serial
//! channel: the bits are what gets transmitted as tones, luminance or
//! color levels.
//!
//! ## Frame Layout
//!
//! ```text
//! Preamble(8) | StartMarker(8) | Length(8) | Data(N x 8) | Checksum(8)
//! ```
//!
//! - Preamble is `10101010`, start marker is `11111111`
//! - `0 < N <= 200` is the UTF-8 byte length of the message
//! - Checksum is the XOR of the `N` data bytes
//! - Every field is sent MSB first
//!
//! ## Decoding
//!
//! [`decode`] is total: any structural problem, checksum mismatch or
//! invalid UTF-8 yields `None`. It searches for the first run of eight
//! 1-bits anywhere in its input, so noise collected before the frame is
//! skipped. The preamble never contains such a run.
//!
//! [`decode_partial`] gives a best-effort preview while a frame is still
//! arriving.

use core::str;

use crate::buffer::{BitBuf, ByteBuf, Text, push_byte, read_byte, text_from_str};
use crate::checksum::xor_checksum;
use crate::consts::{
    Bit, CHECKSUM_BITS, HEADER_BITS, MAX_MESSAGE_BYTES, MIN_PARTIAL_BITS, PREAMBLE, START_MARKER,
    START_MARKER_RUN,
};
use crate::error::EncodeError;

/// UTF-8 length of `message` in bytes.
pub fn byte_length(message: &str) -> usize {
    message.len()
}

/// Whether `message` fits in a single frame.
pub fn can_encode(message: &str) -> bool {
    byte_length(message) <= MAX_MESSAGE_BYTES
}

/// Exact number of bits [`encode`] produces for `message`.
pub fn calculate_bit_count(message: &str) -> usize {
    HEADER_BITS + 8 * byte_length(message) + CHECKSUM_BITS
}

/// Encodes `message` into a complete frame.
///
/// # Errors
/// [`EncodeError::MessageTooLong`] if the UTF-8 encoding is longer than
/// [`MAX_MESSAGE_BYTES`].
///
/// # Example
/// ```rust
/// use airbit::protocol::{decode, encode};
///
/// let bits = encode("A").unwrap();
/// assert_eq!(bits.len(), 40);
/// assert_eq!(decode(&bits).as_deref(), Some("A"));
/// ```
pub fn encode(message: &str) -> Result<BitBuf, EncodeError> {
    let data = message.as_bytes();
    if data.len() > MAX_MESSAGE_BYTES {
        return Err(EncodeError::MessageTooLong {
            len: data.len(),
            max: MAX_MESSAGE_BYTES,
        });
    }

    let mut bits = BitBuf::new();
    push_byte(&mut bits, PREAMBLE);
    push_byte(&mut bits, START_MARKER);
    push_byte(&mut bits, data.len() as u8);
    for &byte in data {
        push_byte(&mut bits, byte);
    }
    push_byte(&mut bits, xor_checksum(data));
    Ok(bits)
}

/// Decodes the first complete, valid frame in `bits`.
///
/// Returns `None` if there is no start marker, the length is zero or over
/// the limit, the frame is truncated, the checksum does not match, or the
/// data is not valid UTF-8.
pub fn decode(bits: &[Bit]) -> Option<Text> {
    let (data_start, len) = locate_data(bits)?;
    let data = read_data(bits, data_start, len)?;
    let checksum = read_byte(bits, data_start + len * 8)?;
    if checksum != xor_checksum(&data) {
        return None;
    }
    str::from_utf8(&data).ok().map(text_from_str)
}

/// Best-effort preview of a frame that is still arriving.
///
/// Interprets as many complete data bytes as are present, ignoring the
/// checksum, and keeps the longest prefix that is valid UTF-8. Returns
/// `None` with fewer than 32 bits, before the marker and a valid length
/// are found, or when that prefix is empty.
pub fn decode_partial(bits: &[Bit]) -> Option<Text> {
    if bits.len() < MIN_PARTIAL_BITS {
        return None;
    }
    let (data_start, len) = locate_data(bits)?;
    let available = (bits.len().saturating_sub(data_start) / 8).min(len);
    let data = read_data(bits, data_start, available)?;

    let valid = match str::from_utf8(&data) {
        Ok(text) => text,
        // Up to the first bad or incomplete sequence.
        Err(err) => str::from_utf8(&data[..err.valid_up_to()]).ok()?,
    };
    if valid.is_empty() {
        return None;
    }
    Some(text_from_str(valid))
}

/// Buffer length at which the frame in `bits` will be complete.
///
/// `None` until the start marker and a plausible length byte are present.
pub fn expected_bit_count(bits: &[Bit]) -> Option<usize> {
    let (data_start, len) = locate_data(bits)?;
    Some(data_start + len * 8 + CHECKSUM_BITS)
}

/// Fraction of the frame in `bits` received so far, in `0.0..=1.0`.
///
/// Stays at `0.0` until the length byte has been read.
pub fn progress(bits: &[Bit]) -> f32 {
    match expected_bit_count(bits) {
        Some(expected) => (bits.len() as f32 / expected as f32).min(1.0),
        None => 0.0,
    }
}

/// Index just past the first run of eight 1-bits.
fn find_marker(bits: &[Bit]) -> Option<usize> {
    let mut run = 0;
    for (i, &bit) in bits.iter().enumerate() {
        if bit & 1 == 1 {
            run += 1;
            if run == START_MARKER_RUN {
                return Some(i + 1);
            }
        } else {
            run = 0;
        }
    }
    None
}

/// Finds the marker and reads the length byte.
///
/// Returns the bit offset of the first data byte and the declared length.
fn locate_data(bits: &[Bit]) -> Option<(usize, usize)> {
    let length_start = find_marker(bits)?;
    let len = read_byte(bits, length_start)? as usize;
    if len == 0 || len > MAX_MESSAGE_BYTES {
        return None;
    }
    Some((length_start + 8, len))
}

fn read_data(bits: &[Bit], data_start: usize, count: usize) -> Option<ByteBuf> {
    let mut data = ByteBuf::new();
    for i in 0..count {
        let _ = data.push(read_byte(bits, data_start + i * 8)?);
    }
    Some(data)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_encode_layout() {
        let bits = encode("A").unwrap();
        assert_eq!(
            bits,
            vec![
                1, 0, 1, 0, 1, 0, 1, 0, // preamble
                1, 1, 1, 1, 1, 1, 1, 1, // start marker
                0, 0, 0, 0, 0, 0, 0, 1, // length
                0, 1, 0, 0, 0, 0, 0, 1, // 'A'
                0, 1, 0, 0, 0, 0, 0, 1, // checksum
            ]
        );
    }

    #[test]
    fn test_roundtrip_ascii_and_multibyte() {
        for message in ["Hello, World!", "こんにちは", "🎉🚀", "mixed ascii ünd 表"] {
            let bits = encode(message).unwrap();
            assert_eq!(bits.len(), calculate_bit_count(message));
            assert_eq!(decode(&bits).as_deref(), Some(message));
        }
    }

    #[test]
    fn test_length_bound() {
        let at_limit = "a".repeat(200);
        let over_limit = "a".repeat(201);

        assert!(can_encode(&at_limit));
        assert!(!can_encode(&over_limit));
        assert_eq!(decode(&encode(&at_limit).unwrap()).as_deref(), Some(&*at_limit));
        assert_eq!(
            encode(&over_limit),
            Err(EncodeError::MessageTooLong { len: 201, max: 200 })
        );
    }

    #[test]
    fn test_byte_length_counts_utf8_bytes() {
        assert_eq!(byte_length("abc"), 3);
        assert_eq!(byte_length("こ"), 3);
        assert_eq!(byte_length("🎉"), 4);
        assert_eq!(calculate_bit_count("こ"), 24 + 24 + 8);
    }

    #[test]
    fn test_decode_skips_leading_noise() {
        let mut bits = vec![0, 1, 0, 0, 1];
        bits.extend_from_slice(&encode("Test").unwrap());
        assert_eq!(decode(&bits).as_deref(), Some("Test"));
    }

    #[test]
    fn test_decode_ignores_trailing_bits() {
        let mut bits = encode("Test").unwrap();
        bits.extend_from_slice(&[1, 0, 1, 1, 0, 0]);
        assert_eq!(decode(&bits).as_deref(), Some("Test"));
    }

    #[test]
    fn test_decode_rejects_flipped_checksum_bit() {
        let mut bits = encode("Test").unwrap();
        let last = bits.len() - 1;
        bits[last] ^= 1;
        assert_eq!(decode(&bits), None);
    }

    #[test]
    fn test_decode_rejects_truncated_frame() {
        let bits = encode("Test").unwrap();
        assert_eq!(decode(&bits[..bits.len() - 10]), None);
    }

    #[test]
    fn test_decode_rejects_empty_and_garbage() {
        assert_eq!(decode(&[]), None);
        assert_eq!(decode(&[0; 16]), None);
    }

    #[test]
    fn test_decode_rejects_bad_lengths() {
        // marker followed by a zero length
        let mut bits = vec![1; 8];
        bits.extend_from_slice(&[0; 16]);
        assert_eq!(decode(&bits), None);

        // marker followed by 201
        let mut bits = vec![1; 8];
        let mut length = BitBuf::new();
        push_byte(&mut length, 201);
        bits.extend_from_slice(&length);
        bits.extend_from_slice(&[0; 64]);
        assert_eq!(decode(&bits), None);
    }

    #[test]
    fn test_decode_rejects_invalid_utf8() {
        let mut bits = BitBuf::new();
        push_byte(&mut bits, PREAMBLE);
        push_byte(&mut bits, START_MARKER);
        push_byte(&mut bits, 1);
        push_byte(&mut bits, 0xc3);
        push_byte(&mut bits, 0xc3);
        assert_eq!(decode(&bits), None);
    }

    #[test]
    fn test_decode_partial_previews_complete_bytes() {
        let bits = encode("Hello").unwrap();
        // header + 3 data bytes + 5 bits of the fourth
        let cut = HEADER_BITS + 3 * 8 + 5;
        assert_eq!(decode_partial(&bits[..cut]).as_deref(), Some("Hel"));
        assert_eq!(decode_partial(&bits).as_deref(), Some("Hello"));
    }

    #[test]
    fn test_decode_partial_trims_incomplete_utf8() {
        let bits = encode("こんにちは").unwrap();
        // four data bytes: one full character plus one byte of the next
        let cut = HEADER_BITS + 4 * 8;
        assert_eq!(decode_partial(&bits[..cut]).as_deref(), Some("こ"));
        // two data bytes: no complete character yet
        let cut = HEADER_BITS + 2 * 8;
        assert_eq!(decode_partial(&bits[..cut]), None);
    }

    #[test]
    fn test_decode_partial_keeps_prefix_before_bad_byte() {
        let mut bits = BitBuf::new();
        push_byte(&mut bits, PREAMBLE);
        push_byte(&mut bits, START_MARKER);
        push_byte(&mut bits, 3);
        push_byte(&mut bits, b'H');
        push_byte(&mut bits, 0xff);
        push_byte(&mut bits, b'i');
        assert_eq!(decode_partial(&bits).as_deref(), Some("H"));

        // nothing valid before the bad byte
        let mut bits = BitBuf::new();
        push_byte(&mut bits, START_MARKER);
        push_byte(&mut bits, 2);
        push_byte(&mut bits, 0xff);
        push_byte(&mut bits, b'i');
        assert_eq!(decode_partial(&bits), None);
    }

    #[test]
    fn test_decode_partial_needs_enough_bits() {
        let bits = encode("Hello").unwrap();
        assert_eq!(decode_partial(&bits[..31]), None);
        assert_eq!(decode_partial(&[0; 40]), None);
    }

    #[test]
    fn test_progress_tracks_frame() {
        let bits = encode("AB").unwrap();
        assert_eq!(expected_bit_count(&bits[..16]), None);
        assert_eq!(progress(&bits[..16]), 0.0);
        assert_eq!(expected_bit_count(&bits[..24]), Some(48));
        assert_eq!(progress(&bits[..24]), 0.5);
        assert_eq!(progress(&bits), 1.0);

        let mut noisy = vec![0, 0, 0, 0];
        noisy.extend_from_slice(&bits);
        assert_eq!(expected_bit_count(&noisy), Some(52));
    }

    proptest! {
        #[test]
        fn prop_roundtrip(message in "\\PC{1,50}") {
            let bits = encode(&message).unwrap();
            prop_assert_eq!(bits.len(), calculate_bit_count(&message));
            let decoded = decode(&bits);
            prop_assert_eq!(decoded.as_deref(), Some(message.as_str()));
        }

        #[test]
        fn prop_decode_never_panics(bits in proptest::collection::vec(0u8..2, 0..600)) {
            let _ = decode(&bits);
            let _ = decode_partial(&bits);
        }
    }
}
