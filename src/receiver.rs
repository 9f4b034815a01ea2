//! Poll-driven bit receiver.
//!
//! This module provides [`BitReceiver`], the state machine that turns the
//! per-tick answers of a [`Detector`] into decoded messages. It is
//! agnostic to the physical medium and to the scheduler: call
//! [`tick()`](BitReceiver::tick) with a monotonic timestamp at a cadence
//! well above one bit per slot, from a timer, an event loop, or a test.
//!
//! ## States
//!
//! | From    | Condition                                          | To      |
//! |---------|----------------------------------------------------|---------|
//! | `Idle`  | pilot detected                                     | `Pilot` |
//! | `Pilot` | pilot gone                                         | `Gap`   |
//! | `Gap`   | 60% of `gap_ms` elapsed                            | `Bits`  |
//! | `Bits`  | `bit_ms + guard_ms` since the last bit and a bit   | `Bits`  |
//! | `Bits`  | the buffer decodes                                 | `Idle`  |
//! | `Bits`  | more than [`MAX_BITS_TIMEOUT`] bits                | `Idle`  |
//!
//! A decode is attempted after every sampled bit once
//! [`MIN_DECODE_BITS`] are held. A failed decode only means the frame is
//! not complete yet; the session continues until it decodes or times out.
//!
//! When the detector has no confident bit on a due tick, nothing is
//! appended and the sample time does not advance, so the next tick
//! samples again. There is no per-bit timeout: a medium that goes silent
//! mid-frame keeps the session in `Bits` until [`stop()`](BitReceiver::stop)
//! or [`reset()`](BitReceiver::reset).
//!
//! ## Example
//!
//! ```rust
//! use airbit::channel::FnDetector;
//! use airbit::config::SignalConfig;
//! use airbit::receiver::BitReceiver;
//! use airbit::status::Listener;
//!
//! struct Print;
//! impl Listener for Print {
//!     fn on_message(&mut self, text: &str) {
//!         println!("received {text}");
//!     }
//! }
//!
//! let detector = FnDetector::new(|| false, || None);
//! let mut receiver = BitReceiver::new(detector, SignalConfig::new(100, 20), Print).unwrap();
//! receiver.start();
//!
//! let mut now = 0;
//! loop {
//!     receiver.tick(now); // Called every few milliseconds
//!     now += 5;
//!     # break;
//! }
//! ```

use crate::buffer::BitBuf;
use crate::channel::Detector;
use crate::config::SignalConfig;
use crate::consts::{MAX_BITS_TIMEOUT, MIN_DECODE_BITS, Millis};
use crate::error::{ConfigError, ReceiveError};
use crate::protocol::decode;
use crate::session::Session;
use crate::status::{Listener, ReceiverState, Status};
use crate::timer::Tick;

/// Automatic, tick-driven receiver for one channel.
///
/// ## Type Parameters
///
/// - `D`: the channel's [`Detector`]
/// - `L`: the [`Listener`] notified of status changes, messages and errors
///
/// ## Notes
///
/// - Receivers share no state; one per channel is fine.
/// - [`start()`](BitReceiver::start) while already running restarts the session.
#[derive(Debug)]
pub struct BitReceiver<D, L>
where
    D: Detector,
    L: Listener,
{
    detector: D,
    listener: L,
    config: SignalConfig,
    session: Session,
    running: bool,

    /// Counter of decoded messages.
    pub good: u16,

    /// Counter of sessions abandoned after [`MAX_BITS_TIMEOUT`] bits.
    pub timeouts: u16,
}

impl<D, L> BitReceiver<D, L>
where
    D: Detector,
    L: Listener,
{
    /// Creates a stopped receiver.
    ///
    /// # Arguments
    /// - `detector`: pilot and bit detection for the channel.
    /// - `config`: symbol timing; must match the transmitter's.
    /// - `listener`: receives status changes, messages and errors.
    ///
    /// # Errors
    /// - [`ConfigError::ZeroBitDuration`] if `config.bit_ms` is zero
    pub fn new(detector: D, config: SignalConfig, listener: L) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            detector,
            listener,
            config,
            session: Session::new(),
            running: false,
            good: 0,
            timeouts: 0,
        })
    }

    /// Starts listening from a fresh, idle session.
    pub fn start(&mut self) {
        self.session.clear();
        self.running = true;
    }

    /// Stops listening and discards the current session.
    pub fn stop(&mut self) {
        self.running = false;
        self.session.clear();
    }

    /// Discards the current session without stopping.
    pub fn reset(&mut self) {
        self.session.clear();
    }

    /// Whether [`tick()`](BitReceiver::tick) does any work.
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Current session state.
    pub fn state(&self) -> ReceiverState {
        self.session.state
    }

    /// Copy of the bits collected in the current session.
    pub fn bits(&self) -> BitBuf {
        self.session.bits.clone()
    }

    /// The timing this receiver samples with.
    pub fn config(&self) -> &SignalConfig {
        &self.config
    }

    /// The listener.
    pub fn listener(&self) -> &L {
        &self.listener
    }

    /// The listener, mutably.
    pub fn listener_mut(&mut self) -> &mut L {
        &mut self.listener
    }

    /// Consumes the receiver, returning its detector and listener.
    pub fn into_parts(self) -> (D, L) {
        (self.detector, self.listener)
    }

    /// The detector.
    pub fn detector_mut(&mut self) -> &mut D {
        &mut self.detector
    }

    /// Advances the state machine by one step.
    ///
    /// `now` is a monotonic timestamp in milliseconds. Does nothing while
    /// stopped.
    pub fn tick(&mut self, now: Millis) {
        if !self.running {
            return;
        }

        match self.session.state {
            ReceiverState::Idle => {
                if self.detector.detect_pilot() {
                    self.session.transition(ReceiverState::Pilot);
                    self.listener.on_status_change(&Status::Pilot);
                }
            }
            ReceiverState::Pilot => {
                if !self.detector.detect_pilot() {
                    self.session.gap_start = now;
                    self.session.transition(ReceiverState::Gap);
                    self.listener.on_status_change(&Status::Gap);
                }
            }
            ReceiverState::Gap => {
                if now.saturating_sub(self.session.gap_start) >= self.config.gap_threshold_ms() {
                    self.session.begin_bits(now);
                    self.listener.on_status_change(&Status::Receiving {
                        progress: 0.0,
                        partial_text: None,
                    });
                }
            }
            ReceiverState::Bits => self.sample(now),
        }
    }

    fn sample(&mut self, now: Millis) {
        if now.saturating_sub(self.session.last_bit) < self.config.slot_ms() {
            return;
        }
        // No confident value: try again next tick without advancing.
        let Some(bit) = self.detector.detect_bit() else {
            return;
        };

        self.session.push(bit);
        self.session.last_bit = now;
        self.listener
            .on_status_change(&self.session.receiving_status());

        if self.session.bits.len() >= MIN_DECODE_BITS {
            if let Some(text) = decode(&self.session.bits) {
                debug!("receiver: decoded {} byte message", text.len());
                self.good = self.good.wrapping_add(1);
                self.listener.on_status_change(&Status::Success);
                self.listener.on_message(&text);
                self.finish();
                return;
            }
        }

        if self.session.timed_out() {
            warn!("receiver: no frame after {} bits", MAX_BITS_TIMEOUT);
            let error = ReceiveError::timeout();
            self.timeouts = self.timeouts.wrapping_add(1);
            self.listener.on_status_change(&Status::Error {
                message: error.message,
            });
            self.listener.on_error(&error);
            self.finish();
        }
    }

    fn finish(&mut self) {
        self.session.clear();
        self.listener.on_status_change(&Status::Idle);
    }
}

impl<D, L> Tick for BitReceiver<D, L>
where
    D: Detector,
    L: Listener,
{
    fn tick(&mut self, now: Millis) {
        BitReceiver::tick(self, now);
    }
}
