use crate::buffer::BitBuf;
use crate::consts::{Bit, MAX_BITS_TIMEOUT, Millis};
use crate::protocol::{decode_partial, progress};
use crate::status::{ReceiverState, Status};

/// State of one receive session, owned by a receiver.
#[derive(Debug, Default, Clone)]
pub(crate) struct Session {
    pub(crate) state: ReceiverState,
    pub(crate) bits: BitBuf,
    pub(crate) gap_start: Millis,
    pub(crate) last_bit: Millis,
}

impl Session {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Ends the session: back to idle with an empty buffer.
    pub(crate) fn clear(&mut self) {
        self.state = ReceiverState::Idle;
        self.bits.clear();
        self.gap_start = 0;
        self.last_bit = 0;
    }

    pub(crate) fn transition(&mut self, to: ReceiverState) {
        debug!("receiver: {} -> {}", self.state.as_str(), to.as_str());
        self.state = to;
    }

    /// Starts collecting bits from an empty buffer.
    pub(crate) fn begin_bits(&mut self, now: Millis) {
        self.bits.clear();
        self.last_bit = now;
        self.transition(ReceiverState::Bits);
    }

    pub(crate) fn push(&mut self, bit: Bit) {
        let _ = self.bits.push(bit & 1);
        trace!("bit {} ({} collected)", bit & 1, self.bits.len());
    }

    /// More bits than any frame could need: give up.
    pub(crate) fn timed_out(&self) -> bool {
        self.bits.len() > MAX_BITS_TIMEOUT
    }

    pub(crate) fn receiving_status(&self) -> Status {
        Status::Receiving {
            progress: progress(&self.bits),
            partial_text: decode_partial(&self.bits),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::encode;

    #[test]
    fn test_clear_resets_everything() {
        let mut session = Session::new();
        session.transition(ReceiverState::Gap);
        session.gap_start = 40;
        session.begin_bits(100);
        session.push(1);
        session.clear();

        assert_eq!(session.state, ReceiverState::Idle);
        assert!(session.bits.is_empty());
        assert_eq!(session.gap_start, 0);
        assert_eq!(session.last_bit, 0);
    }

    #[test]
    fn test_push_normalises_bits() {
        let mut session = Session::new();
        session.push(3);
        session.push(2);
        assert_eq!(session.bits, vec![1, 0]);
    }

    #[test]
    fn test_receiving_status_previews() {
        let mut session = Session::new();
        for &bit in &encode("Hi").unwrap()[..32] {
            session.push(bit);
        }
        assert_eq!(
            session.receiving_status(),
            Status::Receiving {
                progress: 32.0 / 48.0,
                partial_text: Some("H".to_string()),
            }
        );
    }

    #[test]
    fn test_timed_out_after_budget() {
        let mut session = Session::new();
        for i in 0..MAX_BITS_TIMEOUT {
            session.push((i % 2) as Bit);
        }
        assert!(!session.timed_out());
        session.push(0);
        assert!(session.timed_out());
    }
}
