//! Buffer types shared by the codecs and receivers.
//!
//! Without the `std` feature every buffer is a fixed-capacity `heapless`
//! collection sized from the limits in [`crate::consts`]. With `std` they
//! are plain `Vec`s and `String`s.

use crate::consts::Bit;
#[cfg(not(feature = "std"))]
use crate::consts::{BIT_BUF_CAPACITY, MAX_GRID_FRAMES, MAX_MESSAGE_BYTES};
use crate::grid::GridFrame;

/// Ordered sequence of bits, MSB-first within each byte.
#[cfg(not(feature = "std"))]
pub type BitBuf = heapless::Vec<Bit, BIT_BUF_CAPACITY>;
/// Ordered sequence of bits, MSB-first within each byte.
#[cfg(feature = "std")]
pub type BitBuf = Vec<Bit>;

/// Raw message bytes.
#[cfg(not(feature = "std"))]
pub type ByteBuf = heapless::Vec<u8, MAX_MESSAGE_BYTES>;
/// Raw message bytes.
#[cfg(feature = "std")]
pub type ByteBuf = Vec<u8>;

/// A decoded message.
#[cfg(not(feature = "std"))]
pub type Text = heapless::String<MAX_MESSAGE_BYTES>;
/// A decoded message.
#[cfg(feature = "std")]
pub type Text = String;

/// Ordered sequence of grid frames.
#[cfg(not(feature = "std"))]
pub type FrameBuf = heapless::Vec<GridFrame, MAX_GRID_FRAMES>;
/// Ordered sequence of grid frames.
#[cfg(feature = "std")]
pub type FrameBuf = Vec<GridFrame>;

/// Copies validated UTF-8 into a [`Text`].
///
/// Callers only pass slices decoded from at most `MAX_MESSAGE_BYTES` bytes,
/// so the `heapless` push cannot overflow.
#[cfg(not(feature = "std"))]
pub(crate) fn text_from_str(s: &str) -> Text {
    let mut text = Text::new();
    let _ = text.push_str(s);
    text
}

/// Copies validated UTF-8 into a [`Text`].
#[cfg(feature = "std")]
pub(crate) fn text_from_str(s: &str) -> Text {
    String::from(s)
}

/// Appends the 8 bits of `byte` to `bits`, MSB first.
pub(crate) fn push_byte(bits: &mut BitBuf, byte: u8) {
    for shift in (0..8).rev() {
        let _ = bits.push((byte >> shift) & 1);
    }
}

/// Reads 8 bits starting at `offset` as an MSB-first byte.
///
/// Returns `None` if fewer than 8 bits remain.
pub(crate) fn read_byte(bits: &[Bit], offset: usize) -> Option<u8> {
    let chunk = bits.get(offset..offset.checked_add(8)?)?;
    Some(chunk.iter().fold(0u8, |acc, &bit| (acc << 1) | (bit & 1)))
}
