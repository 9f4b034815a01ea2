//! Time-scheduled sender path.
//!
//! [`BitTransmitter`] lays an encoded frame out in time the way the
//! receiver expects to sample it:
//!
//! ```text
//! | pilot (pilot_ms) | neutral (gap_ms) | bit 0 (bit_ms) | neutral (guard_ms) | bit 1 | ... |
//! ```
//!
//! It does not touch any hardware. Each [`tick()`](BitTransmitter::tick)
//! returns the [`Symbol`] the medium should be showing at that moment, and
//! the channel renders it as a tone, a luminance level, a pin level, etc.

use core::convert::Infallible;

use crate::buffer::BitBuf;
use crate::config::SignalConfig;
use crate::consts::{Bit, Millis};
use crate::error::EncodeError;
use crate::protocol::encode;

/// What the medium should show right now.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt-0-3", derive(defmt::Format))]
pub enum Symbol {
    /// The pilot signal.
    Pilot,
    /// The neutral level used for the gap and the guard intervals.
    Neutral,
    /// A data bit.
    Bit(Bit),
}

/// Schedules the symbols of one message at a time.
#[derive(Debug, Clone)]
pub struct BitTransmitter {
    config: SignalConfig,
    bits: BitBuf,
    started_at: Millis,
    active: bool,

    /// Counter of completed transmissions.
    pub sent: u16,
}

impl BitTransmitter {
    /// Creates an idle transmitter.
    pub fn new(config: SignalConfig) -> Self {
        Self {
            config,
            bits: BitBuf::new(),
            started_at: 0,
            active: false,
            sent: 0,
        }
    }

    /// Encodes `message` and starts its schedule at `now`.
    ///
    /// # Errors
    /// - `WouldBlock` while a previous message is still being sent
    /// - [`EncodeError::InvalidConfig`] if the timing cannot carry bits
    /// - [`EncodeError::MessageTooLong`] if the message does not fit in a frame
    pub fn send(&mut self, message: &str, now: Millis) -> nb::Result<(), EncodeError> {
        if self.active {
            return Err(nb::Error::WouldBlock);
        }
        self.config
            .validate()
            .map_err(|err| nb::Error::Other(EncodeError::from(err)))?;
        self.bits = encode(message).map_err(nb::Error::Other)?;
        self.started_at = now;
        self.active = true;
        debug!("transmitter: sending {} bits", self.bits.len());
        Ok(())
    }

    /// Whether a message is being sent.
    pub fn is_sending(&self) -> bool {
        self.active
    }

    /// `WouldBlock` until the current message has been sent.
    pub fn wait_sent(&self) -> nb::Result<(), Infallible> {
        if self.active {
            Err(nb::Error::WouldBlock)
        } else {
            Ok(())
        }
    }

    /// Abandons the current message.
    pub fn cancel(&mut self) {
        self.active = false;
        self.bits.clear();
    }

    /// The symbol to show at `now`.
    ///
    /// `None` while idle. On the tick the schedule runs out the
    /// transmitter returns [`Symbol::Neutral`] once and goes idle.
    pub fn tick(&mut self, now: Millis) -> Option<Symbol> {
        if !self.active {
            return None;
        }

        let mut elapsed = now.saturating_sub(self.started_at);
        if elapsed < self.config.pilot_ms {
            return Some(Symbol::Pilot);
        }
        elapsed -= self.config.pilot_ms;
        if elapsed < self.config.gap_ms {
            return Some(Symbol::Neutral);
        }
        elapsed -= self.config.gap_ms;

        let slot = self.config.slot_ms().max(1);
        let index = usize::try_from(elapsed / slot).unwrap_or(usize::MAX);
        match self.bits.get(index) {
            Some(&bit) if elapsed % slot < self.config.bit_ms => Some(Symbol::Bit(bit)),
            Some(_) => Some(Symbol::Neutral),
            None => {
                debug!("transmitter: sent {} bits", self.bits.len());
                self.sent = self.sent.wrapping_add(1);
                self.cancel();
                Some(Symbol::Neutral)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ConfigError;

    const CONFIG: SignalConfig = SignalConfig::new(10, 5).with_gap_ms(30).with_pilot_ms(50);

    #[test]
    fn test_idle_transmitter_is_silent() {
        let mut tx = BitTransmitter::new(CONFIG);
        assert_eq!(tx.tick(0), None);
        assert!(!tx.is_sending());
        assert_eq!(tx.wait_sent(), Ok(()));
    }

    #[test]
    fn test_schedule() {
        let mut tx = BitTransmitter::new(CONFIG);
        tx.send("A", 1000).unwrap();
        assert!(tx.is_sending());
        assert_eq!(tx.wait_sent(), Err(nb::Error::WouldBlock));

        assert_eq!(tx.tick(1000), Some(Symbol::Pilot));
        assert_eq!(tx.tick(1049), Some(Symbol::Pilot));
        assert_eq!(tx.tick(1050), Some(Symbol::Neutral));
        assert_eq!(tx.tick(1079), Some(Symbol::Neutral));

        // first bit of the preamble is 1, the second is 0
        assert_eq!(tx.tick(1080), Some(Symbol::Bit(1)));
        assert_eq!(tx.tick(1089), Some(Symbol::Bit(1)));
        assert_eq!(tx.tick(1090), Some(Symbol::Neutral));
        assert_eq!(tx.tick(1095), Some(Symbol::Bit(0)));

        // 40 bits of 15 ms each end at 1080 + 600
        assert_eq!(tx.tick(1679), Some(Symbol::Neutral));
        assert!(tx.is_sending());
        assert_eq!(tx.tick(1680), Some(Symbol::Neutral));
        assert!(!tx.is_sending());
        assert_eq!(tx.tick(1681), None);
        assert_eq!(tx.sent, 1);
    }

    #[test]
    fn test_symbols_follow_encoding() {
        let mut tx = BitTransmitter::new(CONFIG);
        tx.send("Hi", 0).unwrap();
        let expected = encode("Hi").unwrap();

        let sampled: Vec<Bit> = (0..expected.len() as Millis)
            .map(|i| match tx.tick(80 + i * 15 + 3) {
                Some(Symbol::Bit(bit)) => bit,
                other => panic!("expected a bit, got {other:?}"),
            })
            .collect();
        assert_eq!(sampled, expected);
    }

    #[test]
    fn test_send_while_busy_would_block() {
        let mut tx = BitTransmitter::new(CONFIG);
        tx.send("one", 0).unwrap();
        assert_eq!(tx.send("two", 1), Err(nb::Error::WouldBlock));

        tx.cancel();
        assert!(tx.send("two", 2).is_ok());
    }

    #[test]
    fn test_send_rejects_zero_bit_duration() {
        let config = SignalConfig::new(0, 0).with_gap_ms(0).with_pilot_ms(0);
        let mut tx = BitTransmitter::new(config);
        assert_eq!(
            tx.send("A", 0),
            Err(nb::Error::Other(EncodeError::InvalidConfig(
                ConfigError::ZeroBitDuration
            )))
        );
        assert!(!tx.is_sending());
        assert_eq!(tx.tick(0), None);
    }

    #[test]
    fn test_index_saturates_far_past_schedule() {
        let mut tx = BitTransmitter::new(CONFIG);
        tx.send("A", 0).unwrap();
        assert_eq!(tx.tick(Millis::MAX), Some(Symbol::Neutral));
        assert!(!tx.is_sending());
    }

    #[test]
    fn test_send_rejects_long_message() {
        let mut tx = BitTransmitter::new(CONFIG);
        assert_eq!(
            tx.send(&"x".repeat(201), 0),
            Err(nb::Error::Other(EncodeError::MessageTooLong { len: 201, max: 200 }))
        );
        assert!(!tx.is_sending());
    }
}
