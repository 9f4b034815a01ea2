//! Byte-pair framing for the spatial grid channel.
//!
//! The grid channel shows 16 binary cells at once, so it moves two bytes
//! per frame instead of one bit per symbol. A message becomes
//!
//! ```text
//! [Length(1) | Data(N) | Checksum(1) | Padding(0 or 1)]
//! ```
//!
//! split into consecutive 2-byte [`GridFrame`]s. The checksum is the XOR of
//! the data bytes, and a single zero byte pads the payload to even length.
//!
//! ## Cell Layout
//!
//! A frame maps onto a 4x4 cell matrix in row-major order. Bits 7..0 of the
//! high byte fill cells 0..7 (rows 0 and 1), bits 7..0 of the low byte fill
//! cells 8..15 (rows 2 and 3).

use core::str;

use crate::buffer::{ByteBuf, FrameBuf, Text, text_from_str};
use crate::checksum::xor_checksum;
use crate::consts::{Bit, GRID_CELLS, GRID_FRAME_BYTES, MAX_MESSAGE_BYTES};
use crate::error::EncodeError;

/// Two bytes shown as one 4x4 cell matrix: `[hi, lo]`.
pub type GridFrame = [u8; GRID_FRAME_BYTES];

/// Number of frames [`encode`] produces for `message`.
pub fn frame_count(message: &str) -> usize {
    (message.len() + 2).div_ceil(GRID_FRAME_BYTES)
}

/// Encodes `message` into grid frames.
///
/// # Errors
/// [`EncodeError::MessageTooLong`] if the UTF-8 encoding is longer than
/// [`MAX_MESSAGE_BYTES`].
pub fn encode(message: &str) -> Result<FrameBuf, EncodeError> {
    let data = message.as_bytes();
    if data.len() > MAX_MESSAGE_BYTES {
        return Err(EncodeError::MessageTooLong {
            len: data.len(),
            max: MAX_MESSAGE_BYTES,
        });
    }

    let checksum = xor_checksum(data);
    let payload = core::iter::once(data.len() as u8)
        .chain(data.iter().copied())
        .chain(core::iter::once(checksum));

    let mut frames = FrameBuf::new();
    let mut pending: Option<u8> = None;
    for byte in payload {
        match pending.take() {
            Some(hi) => {
                let _ = frames.push([hi, byte]);
            }
            None => pending = Some(byte),
        }
    }
    if let Some(hi) = pending {
        let _ = frames.push([hi, 0]);
    }
    Ok(frames)
}

/// Decodes a message from grid frames.
///
/// Returns `None` for an empty frame list, a zero or oversized length, too
/// few frames, a checksum mismatch, or invalid UTF-8. Frames past the end
/// of the message are ignored.
pub fn decode(frames: &[GridFrame]) -> Option<Text> {
    let len = byte_at(frames, 0)? as usize;
    if len == 0 || len > MAX_MESSAGE_BYTES {
        return None;
    }
    let required = (len + 2).div_ceil(GRID_FRAME_BYTES) * GRID_FRAME_BYTES;
    if frames.len() * GRID_FRAME_BYTES < required {
        return None;
    }

    let mut data = ByteBuf::new();
    for i in 1..=len {
        let _ = data.push(byte_at(frames, i)?);
    }
    if byte_at(frames, 1 + len)? != xor_checksum(&data) {
        return None;
    }
    str::from_utf8(&data).ok().map(text_from_str)
}

/// Spreads a frame over 16 cells, MSB of `hi` first.
pub fn frame_to_cells(frame: GridFrame) -> [Bit; GRID_CELLS] {
    let [hi, lo] = frame;
    let mut cells = [0; GRID_CELLS];
    for i in 0..8 {
        cells[i] = (hi >> (7 - i)) & 1;
        cells[i + 8] = (lo >> (7 - i)) & 1;
    }
    cells
}

/// Packs 16 cells back into a frame. Inverse of [`frame_to_cells`].
pub fn cells_to_frame(cells: &[Bit; GRID_CELLS]) -> GridFrame {
    let pack = |half: &[Bit]| half.iter().fold(0u8, |acc, &cell| (acc << 1) | (cell & 1));
    [pack(&cells[..8]), pack(&cells[8..])]
}

fn byte_at(frames: &[GridFrame], index: usize) -> Option<u8> {
    frames
        .get(index / GRID_FRAME_BYTES)
        .map(|frame| frame[index % GRID_FRAME_BYTES])
}
