//! Signal timing configuration.
//!
//! One [`SignalConfig`] describes the symbol timing of a channel. The
//! receiver reads `bit_ms`, `guard_ms` and `gap_ms`; the transmitter also
//! uses `pilot_ms`. Both sides of a link must agree on it.

use crate::consts::{
    DEFAULT_GAP_MS, DEFAULT_PILOT_MS, GAP_THRESHOLD_DENOMINATOR, GAP_THRESHOLD_NUMERATOR, Millis,
};
use crate::error::ConfigError;

/// Symbol timing for one channel.
///
/// # Example
/// ```rust
/// use airbit::config::SignalConfig;
///
/// let config = SignalConfig::new(100, 20).with_gap_ms(250);
/// assert_eq!(config.slot_ms(), 120);
/// assert_eq!(config.gap_threshold_ms(), 150);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt-0-3", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SignalConfig {
    /// How long each bit is held.
    pub bit_ms: Millis,
    /// Neutral period after each bit so the channel settles before the next one.
    pub guard_ms: Millis,
    /// Neutral period between the pilot and the first bit.
    #[cfg_attr(feature = "serde", serde(default = "default_gap_ms"))]
    pub gap_ms: Millis,
    /// How long the transmitter holds the pilot signal.
    #[cfg_attr(feature = "serde", serde(default = "default_pilot_ms"))]
    pub pilot_ms: Millis,
}

#[cfg(feature = "serde")]
fn default_gap_ms() -> Millis {
    DEFAULT_GAP_MS
}

#[cfg(feature = "serde")]
fn default_pilot_ms() -> Millis {
    DEFAULT_PILOT_MS
}

impl SignalConfig {
    /// Creates a configuration with the default gap and pilot durations.
    pub const fn new(bit_ms: Millis, guard_ms: Millis) -> Self {
        Self {
            bit_ms,
            guard_ms,
            gap_ms: DEFAULT_GAP_MS,
            pilot_ms: DEFAULT_PILOT_MS,
        }
    }

    /// Overrides the gap duration.
    pub const fn with_gap_ms(mut self, gap_ms: Millis) -> Self {
        self.gap_ms = gap_ms;
        self
    }

    /// Overrides the pilot duration.
    pub const fn with_pilot_ms(mut self, pilot_ms: Millis) -> Self {
        self.pilot_ms = pilot_ms;
        self
    }

    /// Interval between two bit samples: `bit_ms + guard_ms`.
    pub const fn slot_ms(&self) -> Millis {
        self.bit_ms + self.guard_ms
    }

    /// Time after the pilot ends at which the receiver stops waiting for the gap.
    ///
    /// 60% of `gap_ms`, rounded up. Undershooting the nominal gap absorbs
    /// pilot detector flicker at the tail of the pilot.
    pub const fn gap_threshold_ms(&self) -> Millis {
        (self.gap_ms * GAP_THRESHOLD_NUMERATOR).div_ceil(GAP_THRESHOLD_DENOMINATOR)
    }

    /// Checks that the timing can carry bits at all.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.bit_ms == 0 {
            return Err(ConfigError::ZeroBitDuration);
        }
        Ok(())
    }
}
