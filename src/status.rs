//! Receiver states and the notifications a receiver sends to its owner.

use crate::buffer::Text;
use crate::error::ReceiveError;

/// Phase of a receive session.
///
/// A session always ends back in [`Idle`](ReceiverState::Idle): after a
/// decoded message, a failed validation, a timeout, or a reset.
#[derive(PartialEq, Eq, Clone, Copy, Default, Debug)]
#[cfg_attr(feature = "defmt-0-3", derive(defmt::Format))]
pub enum ReceiverState {
    ///   Waiting for a pilot signal.
    #[default]
    Idle,
    ///   The pilot is present. Waiting for it to end.
    Pilot,
    ///   The pilot has ended. Waiting out the gap before sampling bits.
    Gap,
    ///   Sampling one bit per slot and looking for a complete frame.
    Bits,
}

impl ReceiverState {
    /// Lowercase name of the state.
    pub fn as_str(&self) -> &'static str {
        match self {
            ReceiverState::Idle => "idle",
            ReceiverState::Pilot => "pilot",
            ReceiverState::Gap => "gap",
            ReceiverState::Bits => "bits",
        }
    }
}

/// Live receive status, suitable for driving a UI.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "defmt-0-3", derive(defmt::Format))]
pub enum Status {
    /// No session in progress.
    Idle,
    /// Pilot detected.
    Pilot,
    /// Pilot ended, waiting for the gap to elapse.
    Gap,
    /// Collecting bits.
    Receiving {
        /// Fraction of the frame received, `0.0..=1.0`.
        progress: f32,
        /// Preview of the message so far, once any of it can be decoded.
        partial_text: Option<Text>,
    },
    /// A message was decoded. [`Listener::on_message`] follows.
    Success,
    /// The session failed. [`Listener::on_error`] follows.
    Error {
        /// Short description of the failure.
        message: &'static str,
    },
}

/// Receives a receiver's notifications.
///
/// Callbacks run synchronously inside `tick` (or the manual step methods),
/// always in the order status first, then message or error.
pub trait Listener {
    /// A complete, validated message arrived.
    fn on_message(&mut self, text: &str);

    /// The session ended without a message.
    fn on_error(&mut self, _error: &ReceiveError) {}

    /// The receiver moved to a new status.
    fn on_status_change(&mut self, _status: &Status) {}
}

impl<L: Listener + ?Sized> Listener for &mut L {
    fn on_message(&mut self, text: &str) {
        (**self).on_message(text);
    }

    fn on_error(&mut self, error: &ReceiveError) {
        (**self).on_error(error);
    }

    fn on_status_change(&mut self, status: &Status) {
        (**self).on_status_change(status);
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Records every notification for assertions.
    #[derive(Debug, Default)]
    pub(crate) struct Recorder {
        pub(crate) messages: Vec<String>,
        pub(crate) errors: Vec<ReceiveError>,
        pub(crate) statuses: Vec<Status>,
    }

    impl Listener for Recorder {
        fn on_message(&mut self, text: &str) {
            self.messages.push(text.to_string());
        }

        fn on_error(&mut self, error: &ReceiveError) {
            self.errors.push(*error);
        }

        fn on_status_change(&mut self, status: &Status) {
            self.statuses.push(status.clone());
        }
    }

    #[test]
    fn test_state_names() {
        assert_eq!(ReceiverState::default(), ReceiverState::Idle);
        assert_eq!(ReceiverState::Bits.as_str(), "bits");
    }

    #[test]
    fn test_listener_through_mut_ref() {
        fn notify<L: Listener>(mut listener: L) {
            listener.on_status_change(&Status::Pilot);
            listener.on_message("hi");
        }

        let mut recorder = Recorder::default();
        notify(&mut recorder);
        assert_eq!(recorder.statuses, vec![Status::Pilot]);
        assert_eq!(recorder.messages, vec!["hi".to_string()]);
    }
}
