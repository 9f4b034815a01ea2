//! Explicitly stepped bit receiver.
//!
//! [`ManualBitReceiver`] has the same states as
//! [`BitReceiver`](crate::receiver::BitReceiver) but no detector and no
//! clock: the caller reports each transition itself. It suits channels
//! that detect transitions in their own loop (the grid channel, for
//! instance) and deterministic tests.
//!
//! Unlike the automatic receiver, [`try_decode()`](ManualBitReceiver::try_decode)
//! treats a failed decode as final. The caller only asks once it believes
//! the frame is complete, so a failure is reported as a `checksum` error.

use crate::buffer::{BitBuf, Text};
use crate::consts::{Bit, MAX_BITS_TIMEOUT};
use crate::error::ReceiveError;
use crate::protocol::decode;
use crate::session::Session;
use crate::status::{Listener, ReceiverState, Status};

/// Receiver driven by explicit method calls.
#[derive(Debug)]
pub struct ManualBitReceiver<L: Listener> {
    listener: L,
    session: Session,

    /// Counter of decoded messages.
    pub good: u16,

    /// Counter of failed decodes and timeouts.
    pub bad: u16,
}

impl<L: Listener> ManualBitReceiver<L> {
    /// Creates an idle receiver.
    pub fn new(listener: L) -> Self {
        Self {
            listener,
            session: Session::new(),
            good: 0,
            bad: 0,
        }
    }

    /// Current session state.
    pub fn state(&self) -> ReceiverState {
        self.session.state
    }

    /// Copy of the bits collected so far.
    pub fn bits(&self) -> BitBuf {
        self.session.bits.clone()
    }

    /// The listener.
    pub fn listener(&self) -> &L {
        &self.listener
    }

    /// The listener, mutably.
    pub fn listener_mut(&mut self) -> &mut L {
        &mut self.listener
    }

    /// Reports the current pilot level.
    ///
    /// `true` in `Idle` moves to `Pilot`; `false` in `Pilot` moves to `Gap`.
    /// Returns whether the state changed.
    pub fn process_pilot_detected(&mut self, detected: bool) -> bool {
        match (self.session.state, detected) {
            (ReceiverState::Idle, true) => {
                self.session.transition(ReceiverState::Pilot);
                self.listener.on_status_change(&Status::Pilot);
                true
            }
            (ReceiverState::Pilot, false) => {
                self.session.transition(ReceiverState::Gap);
                self.listener.on_status_change(&Status::Gap);
                true
            }
            _ => false,
        }
    }

    /// Reports that the gap has elapsed. Only valid in `Gap`.
    ///
    /// Returns whether bit collection started.
    pub fn start_bit_collection(&mut self) -> bool {
        if self.session.state != ReceiverState::Gap {
            return false;
        }
        self.session.begin_bits(0);
        self.listener.on_status_change(&Status::Receiving {
            progress: 0.0,
            partial_text: None,
        });
        true
    }

    /// Appends a sampled bit. Ignored outside `Bits`.
    ///
    /// Exceeding [`MAX_BITS_TIMEOUT`] bits ends the session with a
    /// `timeout` error.
    pub fn add_bit(&mut self, bit: Bit) {
        if self.session.state != ReceiverState::Bits {
            return;
        }
        self.session.push(bit);
        if self.session.timed_out() {
            warn!("manual receiver: no frame after {} bits", MAX_BITS_TIMEOUT);
            self.fail(ReceiveError::timeout());
            return;
        }
        self.listener
            .on_status_change(&self.session.receiving_status());
    }

    /// Decodes the collected bits and ends the session either way.
    ///
    /// On success the listener gets `Success` and the message. On failure
    /// it gets a `checksum` error. Returns `None` without effect outside
    /// `Bits`.
    pub fn try_decode(&mut self) -> Option<Text> {
        if self.session.state != ReceiverState::Bits {
            return None;
        }
        match decode(&self.session.bits) {
            Some(text) => {
                debug!("manual receiver: decoded {} byte message", text.len());
                self.good = self.good.wrapping_add(1);
                self.listener.on_status_change(&Status::Success);
                self.listener.on_message(&text);
                self.finish();
                Some(text)
            }
            None => {
                warn!(
                    "manual receiver: {} bits did not decode",
                    self.session.bits.len()
                );
                self.fail(ReceiveError::checksum());
                None
            }
        }
    }

    /// Discards the session and returns to `Idle`.
    pub fn reset(&mut self) {
        self.session.clear();
    }

    fn fail(&mut self, error: ReceiveError) {
        self.bad = self.bad.wrapping_add(1);
        self.listener.on_status_change(&Status::Error {
            message: error.message,
        });
        self.listener.on_error(&error);
        self.finish();
    }

    fn finish(&mut self) {
        self.session.clear();
        self.listener.on_status_change(&Status::Idle);
    }
}
