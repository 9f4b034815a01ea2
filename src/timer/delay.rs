use embedded_hal::delay::DelayNs;

use super::{Clock, Tick};
use crate::consts::Millis;

/// Runs a blocking loop that repeatedly calls `tick()` with the current time.
///
/// This is a simple timing loop for environments without an event loop or
/// timer interrupt. It reads `clock`, ticks, then sleeps `poll_ms` with a
/// delay provider implementing `embedded_hal::delay::DelayNs`.
///
/// # Arguments
/// - `ticker`: the receiver or channel to drive
/// - `clock`: monotonic millisecond clock
/// - `delay`: delay provider, typically from the HAL
/// - `poll_ms`: pause between ticks, see [`poll_interval_ms`](super::poll_interval_ms)
///
/// # Example
/// ```rust,ignore
/// use airbit::timer::{poll_interval_ms, run_tick_loop};
/// let poll_ms = poll_interval_ms(&config, 4);
/// run_tick_loop(&mut channel, &mut clock, &mut delay, poll_ms);
/// ```
///
/// # Notes
/// - This loop never returns; it is intended for single-purpose firmware.
pub fn run_tick_loop<T, C, D>(ticker: &mut T, clock: &mut C, delay: &mut D, poll_ms: Millis) -> !
where
    T: Tick,
    C: Clock,
    D: DelayNs,
{
    let pause = u32::try_from(poll_ms).unwrap_or(u32::MAX);
    loop {
        ticker.tick(clock.now_ms());
        delay.delay_ms(pause);
    }
}

/// Like [`run_tick_loop`], but returns once `done` reports true after a tick.
///
/// Useful for "listen until a message arrives" flows and for tests.
pub fn run_tick_loop_until<T, C, D, F>(
    ticker: &mut T,
    clock: &mut C,
    delay: &mut D,
    poll_ms: Millis,
    mut done: F,
) where
    T: Tick,
    C: Clock,
    D: DelayNs,
    F: FnMut(&T) -> bool,
{
    let pause = u32::try_from(poll_ms).unwrap_or(u32::MAX);
    loop {
        ticker.tick(clock.now_ms());
        if done(ticker) {
            return;
        }
        delay.delay_ms(pause);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::channel::FnDetector;
    use crate::config::SignalConfig;
    use crate::protocol::encode;
    use crate::receiver::BitReceiver;
    use crate::status::tests::Recorder;
    use core::cell::Cell;
    use std::rc::Rc;

    /// Clock advanced only by the delay, in nanoseconds.
    #[derive(Debug, Clone, Default)]
    struct SimTime(Rc<Cell<u64>>);

    impl Clock for SimTime {
        fn now_ms(&mut self) -> Millis {
            self.0.get() / 1_000_000
        }
    }

    impl DelayNs for SimTime {
        fn delay_ns(&mut self, ns: u32) {
            self.0.set(self.0.get() + ns as u64);
        }
    }

    #[test]
    fn test_run_tick_loop_until_receives_message() {
        let config = SignalConfig::new(20, 10).with_gap_ms(100);
        let time = SimTime::default();

        // Plays the transmit schedule back from simulated time: pilot for
        // 200 ms, a 100 ms gap, then one bit per 30 ms slot.
        let bits = encode("loop").unwrap();
        let pilot_time = time.clone();
        let bit_time = time.clone();
        let detector = FnDetector::new(
            move || pilot_time.0.get() / 1_000_000 < 200,
            move || {
                let now = bit_time.0.get() / 1_000_000;
                let slot = now.checked_sub(300)? / 30;
                bits.get(slot as usize).copied()
            },
        );

        let mut receiver = BitReceiver::new(detector, config, Recorder::default()).unwrap();
        receiver.start();

        let mut clock = time.clone();
        let mut delay = time.clone();
        let poll_ms = crate::timer::poll_interval_ms(&config, 6);
        run_tick_loop_until(&mut receiver, &mut clock, &mut delay, poll_ms, |r| {
            !r.listener().messages.is_empty() || time.now() > 10_000
        });

        assert_eq!(receiver.listener().messages, vec!["loop".to_string()]);
    }

    #[derive(Debug, Default)]
    struct Ticks(Vec<Millis>);

    impl Tick for Ticks {
        fn tick(&mut self, now: Millis) {
            self.0.push(now);
        }
    }

    #[test]
    fn test_oversized_poll_interval_saturates() {
        let time = SimTime::default();
        let mut ticks = Ticks::default();
        let (mut clock, mut delay) = (time.clone(), time.clone());
        let poll_ms = Millis::from(u32::MAX) + 1;
        run_tick_loop_until(&mut ticks, &mut clock, &mut delay, poll_ms, |t| t.0.len() == 2);

        assert_eq!(ticks.0, vec![0, Millis::from(u32::MAX)]);
    }

    impl SimTime {
        fn now(&self) -> Millis {
            self.0.get() / 1_000_000
        }
    }
}
