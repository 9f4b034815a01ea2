//! Error types.
//!
//! Decoding never fails loudly: malformed or noisy input yields `None`.
//! Errors are reserved for caller mistakes at encode time, invalid
//! configuration, and the terminal conditions a receiver reports to its
//! [`Listener`](crate::status::Listener).

use core::fmt;

use thiserror::Error;

/// Failure to turn a message into a frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[cfg_attr(feature = "defmt-0-3", derive(defmt::Format))]
pub enum EncodeError {
    /// The UTF-8 encoding of the message exceeds the protocol limit.
    #[error("message is {len} bytes, the limit is {max}")]
    MessageTooLong {
        /// UTF-8 length of the rejected message.
        len: usize,
        /// The limit it exceeded.
        max: usize,
    },
    /// The transmitter's timing cannot carry bits.
    #[error("invalid signal config: {0}")]
    InvalidConfig(#[from] ConfigError),
}

/// Invalid [`SignalConfig`](crate::config::SignalConfig).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[cfg_attr(feature = "defmt-0-3", derive(defmt::Format))]
pub enum ConfigError {
    /// `bit_ms` is zero, so bits could never be told apart.
    #[error("bit duration must be greater than zero")]
    ZeroBitDuration,
}

/// Category of a receive-side failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt-0-3", derive(defmt::Format))]
pub enum ReceiveErrorKind {
    /// The frame was complete but failed validation.
    Checksum,
    /// The bit budget ran out without a valid frame.
    Timeout,
    /// The channel could not access its capture device. Raised by channel adapters.
    Permission,
    /// The channel could not interpret its raw signal. Raised by channel adapters.
    Decode,
}

impl ReceiveErrorKind {
    /// Lowercase name of the kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            ReceiveErrorKind::Checksum => "checksum",
            ReceiveErrorKind::Timeout => "timeout",
            ReceiveErrorKind::Permission => "permission",
            ReceiveErrorKind::Decode => "decode",
        }
    }
}

impl fmt::Display for ReceiveErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A terminal receive failure, handed to [`Listener::on_error`](crate::status::Listener::on_error).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[cfg_attr(feature = "defmt-0-3", derive(defmt::Format))]
#[error("{kind}: {message}")]
pub struct ReceiveError {
    /// What went wrong.
    pub kind: ReceiveErrorKind,
    /// Human readable detail, suitable for a status line.
    pub message: &'static str,
}

impl ReceiveError {
    /// The receiver collected more than [`MAX_BITS_TIMEOUT`](crate::consts::MAX_BITS_TIMEOUT) bits.
    pub const fn timeout() -> Self {
        Self {
            kind: ReceiveErrorKind::Timeout,
            message: "no valid frame within the bit budget",
        }
    }

    /// The collected bits did not form a valid frame.
    pub const fn checksum() -> Self {
        Self {
            kind: ReceiveErrorKind::Checksum,
            message: "frame failed validation",
        }
    }
}
