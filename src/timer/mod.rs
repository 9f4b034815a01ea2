//! Tick scheduling for receivers and channels.
//!
//! Nothing in this crate schedules itself. Receivers and channels expose
//! `tick(now)`, and the host decides what calls it: an animation frame
//! callback, a timer interrupt, an event loop, or a test harness.
//!
//! Contains:
//! - [`Tick`] and [`Clock`]: the scheduler-facing traits
//! - [`poll_interval_ms`]: how often to tick for a given timing
//! - [`transmit_duration_ms`]: how long a frame takes on air
//! - `run_tick_loop` / `run_tick_loop_until`: blocking driver loops over
//!   `embedded_hal::delay::DelayNs` (feature `delay-loop`)
//!
//! Typical timings:
//!
//! | Medium            | bit_ms | guard_ms | poll interval (4 per slot) |
//! |-------------------|--------|----------|----------------------------|
//! | Ultrasonic FSK    |    100 |       20 |                      30 ms |
//! | Audible FSK       |     80 |       20 |                      25 ms |
//! | Screen luminance  |    150 |       50 |                      50 ms |

use libm::round;

use crate::config::SignalConfig;
use crate::consts::Millis;

#[cfg(feature = "delay-loop")]
mod delay;
#[cfg_attr(feature = "delay-loop", allow(unused_imports))]
#[cfg(feature = "delay-loop")]
pub use delay::*;

/// Something advanced by a periodic scheduler.
pub trait Tick {
    /// Does one step of work for the monotonic time `now` (milliseconds).
    fn tick(&mut self, now: Millis);
}

/// Monotonic millisecond clock.
pub trait Clock {
    /// Milliseconds since an arbitrary fixed origin. Never decreases.
    fn now_ms(&mut self) -> Millis;
}

/// Poll interval that samples each `bit_ms + guard_ms` slot about
/// `polls_per_slot` times.
///
/// # Arguments
/// - `config`: the channel timing
/// - `polls_per_slot`: ticks per slot; values below 1 are treated as 1
///
/// # Returns
/// - The interval in milliseconds, rounded to nearest and at least 1
pub fn poll_interval_ms(config: &SignalConfig, polls_per_slot: u8) -> Millis {
    let polls = polls_per_slot.max(1) as f64;
    let interval = round(config.slot_ms() as f64 / polls) as Millis;
    interval.max(1)
}

/// Time a transmitter needs for a frame of `bit_count` bits: pilot, gap
/// and one slot per bit.
pub fn transmit_duration_ms(config: &SignalConfig, bit_count: usize) -> Millis {
    config.pilot_ms + config.gap_ms + bit_count as Millis * config.slot_ms()
}
