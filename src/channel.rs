//! Seams between the receiver core and a physical medium.
//!
//! A medium (tones, screen luminance, color, a single digital line, ...)
//! turns its raw samples into two answers per poll: is the pilot present,
//! and what bit is being shown right now. The [`Detector`] trait carries
//! those answers into a [`BitReceiver`](crate::receiver::BitReceiver),
//! which never knows which medium it is listening to.
//!
//! [`Channel`] is the capability set an application sees for a complete
//! medium: send, listen, and report activity.

use crate::consts::{Bit, Millis};

/// Pilot and bit detection for one physical medium.
///
/// Called once per receiver tick. Implementations hold whatever sampling
/// state they need; the receiver only keeps the returned values.
pub trait Detector {
    /// Whether the pilot signal is present right now.
    fn detect_pilot(&mut self) -> bool;

    /// The bit being shown right now, or `None` if no value is confident.
    fn detect_bit(&mut self) -> Option<Bit>;
}

impl<D: Detector + ?Sized> Detector for &mut D {
    fn detect_pilot(&mut self) -> bool {
        (**self).detect_pilot()
    }

    fn detect_bit(&mut self) -> Option<Bit> {
        (**self).detect_bit()
    }
}

/// A [`Detector`] built from two closures.
///
/// # Example
/// ```rust
/// use airbit::channel::{Detector, FnDetector};
///
/// let mut level = 0.8_f32;
/// let mut detector = FnDetector::new(|| true, move || {
///     level -= 0.5;
///     (level > 0.0).then_some(1)
/// });
/// assert!(detector.detect_pilot());
/// assert_eq!(detector.detect_bit(), Some(1));
/// assert_eq!(detector.detect_bit(), None);
/// ```
#[derive(Debug, Clone)]
pub struct FnDetector<P, B> {
    pilot: P,
    bit: B,
}

impl<P, B> FnDetector<P, B>
where
    P: FnMut() -> bool,
    B: FnMut() -> Option<Bit>,
{
    /// Wraps a pilot closure and a bit closure.
    pub fn new(pilot: P, bit: B) -> Self {
        Self { pilot, bit }
    }
}

impl<P, B> Detector for FnDetector<P, B>
where
    P: FnMut() -> bool,
    B: FnMut() -> Option<Bit>,
{
    fn detect_pilot(&mut self) -> bool {
        (self.pilot)()
    }

    fn detect_bit(&mut self) -> Option<Bit> {
        (self.bit)()
    }
}

/// A complete physical medium as the application sees it.
///
/// Implemented once per medium. Rendering and capture setup stay with the
/// implementation; the signal protocol and receiver core are shared.
pub trait Channel {
    /// Reason a message could not be queued.
    type Error;

    /// Queues `message` for transmission starting at `now`.
    fn send(&mut self, message: &str, now: Millis) -> nb::Result<(), Self::Error>;

    /// Starts listening for messages.
    fn start_receive(&mut self);

    /// Stops listening and discards any partial message.
    fn stop_receive(&mut self);

    /// Whether a transmission is in progress.
    fn is_sending(&self) -> bool;

    /// Whether the channel is listening.
    fn is_receiving(&self) -> bool;
}
