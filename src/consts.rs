//! Constants used across the signal protocol implementation.
//!
//! This module defines the framing bytes, size limits, buffer capacities
//! and timing defaults shared by the codecs, the receivers and the
//! transmitter.
//!
//! ## Key Concepts
//!
//! - **Preamble**: Alternating byte sent first to help the physical layer find bit boundaries.
//! - **Start marker**: Eight consecutive 1-bits; the decoder scans for it anywhere in the buffer.
//! - **Payload Limits**: A message carries at most [`MAX_MESSAGE_BYTES`] UTF-8 bytes.
//! - **Timeout**: A receive session is abandoned after [`MAX_BITS_TIMEOUT`] bits without a frame.
//! - **Buffer Sizing**: `heapless` capacities are derived from the limits above so that
//!   a push can never fail before a protocol limit trips.

/// A single transmitted bit. Always `0` or `1`.
pub type Bit = u8;

/// Monotonic timestamp or duration in milliseconds.
pub type Millis = u64;

/// Preamble byte (`10101010`) sent before the start marker.
pub const PREAMBLE: u8 = 0b1010_1010;

/// Start marker byte: eight consecutive 1-bits.
pub const START_MARKER: u8 = 0xff;

/// Number of consecutive 1-bits making up the start marker.
pub const START_MARKER_RUN: usize = 8;

/// Maximum UTF-8 length (in bytes) of a single message.
pub const MAX_MESSAGE_BYTES: usize = 200;

/// Bits in the fixed frame header: preamble, start marker and length byte.
pub const HEADER_BITS: usize = 24;

/// Bits in the trailing XOR checksum.
pub const CHECKSUM_BITS: usize = 8;

/// A receive session gives up once it holds more bits than this.
pub const MAX_BITS_TIMEOUT: usize = 2000;

/// Minimum number of collected bits before the receiver attempts a decode.
pub const MIN_DECODE_BITS: usize = 24;

/// Minimum number of collected bits before a partial preview is attempted.
pub const MIN_PARTIAL_BITS: usize = 32;

/// Capacity of a bit buffer: one past the timeout so the overflowing bit still fits.
pub const BIT_BUF_CAPACITY: usize = MAX_BITS_TIMEOUT + 1;

/// Bytes in a single grid frame.
pub const GRID_FRAME_BYTES: usize = 2;

/// Side length of the square cell grid.
pub const GRID_SIZE: usize = 4;

/// Cells in a single grid frame (`GRID_SIZE * GRID_SIZE`).
pub const GRID_CELLS: usize = GRID_SIZE * GRID_SIZE;

/// Largest grid payload: length byte, data and checksum.
pub const MAX_GRID_PAYLOAD: usize = MAX_MESSAGE_BYTES + 2;

/// Largest number of frames a grid message can produce.
pub const MAX_GRID_FRAMES: usize = MAX_GRID_PAYLOAD.div_ceil(GRID_FRAME_BYTES);

/// Default gap between pilot and data, in milliseconds.
pub const DEFAULT_GAP_MS: Millis = 300;

/// Default pilot duration for the transmitter, in milliseconds.
pub const DEFAULT_PILOT_MS: Millis = 500;

/// The gap is considered over after `gap_ms * 3 / 5` (60%) has elapsed.
pub const GAP_THRESHOLD_NUMERATOR: Millis = 3;

/// See [`GAP_THRESHOLD_NUMERATOR`](crate::consts::GAP_THRESHOLD_NUMERATOR)
pub const GAP_THRESHOLD_DENOMINATOR: Millis = 5;
