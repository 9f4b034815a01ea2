//! On-off keyed channel over a single digital line.
//!
//! The simplest physical medium: a transmitter pin drives a carrier (an
//! LED, an IR emitter, a 433 MHz OOK module, a buzzer driver) on or off,
//! and a receiver pin reads the demodulated level back.
//!
//! - `HIGH` = pilot, or a `1` bit
//! - `LOW`  = neutral (gap and guard intervals), or a `0` bit
//!
//! The pilot is only looked for while the receiver is idle or in the
//! pilot state, so data bits that read `HIGH` are never mistaken for it.
//!
//! ## Example
//!
//! ```rust
//! # use embedded_hal_mock::eh1::digital::{Mock as Pin, State as PinState, Transaction as PinTransaction};
//! use airbit::channel::Channel;
//! use airbit::config::SignalConfig;
//! use airbit::ook::OokChannel;
//! use airbit::status::Listener;
//!
//! struct Inbox;
//! impl Listener for Inbox {
//!     fn on_message(&mut self, _text: &str) {}
//! }
//!
//! # let tx_pin = Pin::new(&[PinTransaction::set(PinState::Low)]);
//! # let rx_pin = Pin::new(&[]);
//! let mut channel = OokChannel::new(tx_pin, rx_pin, SignalConfig::new(50, 10), Inbox).unwrap();
//! channel.start_receive();
//! # channel.stop_receive();
//! # let (mut tx, mut rx) = channel.release();
//! # tx.done();
//! # rx.done();
//! ```

use embedded_hal::digital::{InputPin, OutputPin};

use crate::channel::{Channel, Detector};
use crate::config::SignalConfig;
use crate::consts::{Bit, Millis};
use crate::error::{ConfigError, EncodeError};
use crate::receiver::BitReceiver;
use crate::status::Listener;
use crate::timer::Tick;
use crate::transmitter::{BitTransmitter, Symbol};

/// Reads pilot and bits from the level of an input pin.
///
/// A pin read error counts as "no pilot" and "no confident bit".
#[derive(Debug)]
pub struct PinDetector<RX: InputPin> {
    /// RX pin
    pub rx: RX,
    inverted: bool,
}

impl<RX: InputPin> PinDetector<RX> {
    /// Wraps `rx`. With `inverted`, `LOW` reads as carrier on.
    pub fn new(rx: RX, inverted: bool) -> Self {
        Self { rx, inverted }
    }

    fn level(&mut self) -> Option<bool> {
        self.rx.is_high().ok().map(|high| high != self.inverted)
    }
}

impl<RX: InputPin> Detector for PinDetector<RX> {
    fn detect_pilot(&mut self) -> bool {
        self.level().unwrap_or(false)
    }

    fn detect_bit(&mut self) -> Option<Bit> {
        self.level().map(Bit::from)
    }
}

/// A half-duplex on-off keyed channel.
///
/// Owns a [`BitTransmitter`] driving `TX` and a [`BitReceiver`] reading
/// `RX`. Call [`tick()`](OokChannel::tick) regularly, at several ticks per
/// `bit_ms + guard_ms` slot.
#[derive(Debug)]
pub struct OokChannel<TX, RX, L>
where
    TX: OutputPin,
    RX: InputPin,
    L: Listener,
{
    /// TX pin
    pub tx: TX,
    transmitter: BitTransmitter,
    receiver: BitReceiver<PinDetector<RX>, L>,
}

impl<TX, RX, L> OokChannel<TX, RX, L>
where
    TX: OutputPin,
    RX: InputPin,
    L: Listener,
{
    /// Creates a channel with the carrier off and the receiver stopped.
    ///
    /// # Errors
    /// - [`ConfigError::ZeroBitDuration`] if `config.bit_ms` is zero; the
    ///   TX pin is left untouched
    pub fn new(tx: TX, rx: RX, config: SignalConfig, listener: L) -> Result<Self, ConfigError> {
        let mut cls = Self {
            tx,
            transmitter: BitTransmitter::new(config),
            receiver: BitReceiver::new(PinDetector::new(rx, false), config, listener)?,
        };
        cls.write_tx(false);
        Ok(cls)
    }

    /// The receiver half.
    pub fn receiver(&self) -> &BitReceiver<PinDetector<RX>, L> {
        &self.receiver
    }

    /// The receiver half, mutably.
    pub fn receiver_mut(&mut self) -> &mut BitReceiver<PinDetector<RX>, L> {
        &mut self.receiver
    }

    /// Gives the pins back.
    pub fn release(self) -> (TX, RX) {
        let (detector, _) = self.receiver.into_parts();
        (self.tx, detector.rx)
    }

    /// Drives the TX level for `now`, then polls the receiver.
    pub fn tick(&mut self, now: Millis) {
        if let Some(symbol) = self.transmitter.tick(now) {
            self.write_tx(matches!(symbol, Symbol::Pilot | Symbol::Bit(1)));
        }
        self.receiver.tick(now);
    }

    fn write_tx(&mut self, on: bool) {
        let _ = if on {
            self.tx.set_high()
        } else {
            self.tx.set_low()
        };
    }
}

impl<TX, RX, L> Channel for OokChannel<TX, RX, L>
where
    TX: OutputPin,
    RX: InputPin,
    L: Listener,
{
    type Error = EncodeError;

    fn send(&mut self, message: &str, now: Millis) -> nb::Result<(), EncodeError> {
        self.transmitter.send(message, now)
    }

    fn start_receive(&mut self) {
        self.receiver.start();
    }

    fn stop_receive(&mut self) {
        self.receiver.stop();
    }

    fn is_sending(&self) -> bool {
        self.transmitter.is_sending()
    }

    fn is_receiving(&self) -> bool {
        self.receiver.is_running()
    }
}

impl<TX, RX, L> Tick for OokChannel<TX, RX, L>
where
    TX: OutputPin,
    RX: InputPin,
    L: Listener,
{
    fn tick(&mut self, now: Millis) {
        OokChannel::tick(self, now);
    }
}
