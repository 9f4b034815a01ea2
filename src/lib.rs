//! # airbit
//!
//! A portable, no_std signal protocol and receiver core for sending short
//! text messages over unconventional physical media: ultrasonic and audible
//! tones, screen brightness or color, a 4x4 grid of cells, or a single
//! on/off line. No network involved.
//!
//! The crate provides:
//! - a bit-level frame format with a start marker, length byte and XOR checksum
//! - a byte-pair frame format for the parallel 4x4 grid medium
//! - a poll-driven receiver state machine that turns per-tick pilot and bit
//!   detections into validated messages
//! - a time-scheduled transmitter and an `embedded-hal` on/off keyed channel
//!
//! ## Crate features
//! | Feature                | Description |
//! |------------------------|-------------|
//! | `std`                  | Disables `#![no_std]` support and replaces `heapless` buffers with
//! `Vec`s and `String`s |
//! | `delay-loop` (default) | Blocking tick loops over `embedded_hal::delay::DelayNs` |
//! | `serde`                | `Serialize`/`Deserialize` for [`config::SignalConfig`] |
//! | `defmt-0-3`            | Uses `defmt` logging |
//! | `log`                  | Uses `log` logging |
//!
//! ## Frame Format
//!
//! ```text
//! Preamble(10101010) | StartMarker(11111111) | Length(8) | Data(N x 8) | Checksum(8)
//! ```
//!
//! Up to 200 bytes of UTF-8 per message. The receiver scans for the start
//! marker anywhere in what it has collected, so imprecise pilot and gap
//! timing only adds leading noise. See [`protocol`] and [`grid`].
//!
//! ## Usage
//!
//! A physical medium supplies a [`channel::Detector`]; the receiver is
//! ticked by whatever scheduler the host has.
//!
//! ```rust
//! use airbit::channel::FnDetector;
//! use airbit::config::SignalConfig;
//! use airbit::receiver::BitReceiver;
//! use airbit::status::{Listener, Status};
//!
//! struct App;
//! impl Listener for App {
//!     fn on_message(&mut self, text: &str) {
//!         println!("got {text}");
//!     }
//!     fn on_status_change(&mut self, status: &Status) {
//!         println!("{status:?}");
//!     }
//! }
//!
//! let detector = FnDetector::new(|| false, || None);
//! let mut receiver = BitReceiver::new(detector, SignalConfig::new(100, 20), App).unwrap();
//! receiver.start();
//! receiver.tick(0); // Call every few milliseconds with a monotonic timestamp
//! ```
//!
//! Encoding is a pure function:
//!
//! ```rust
//! let bits = airbit::protocol::encode("hello").unwrap();
//! assert_eq!(bits.len(), airbit::protocol::calculate_bit_count("hello"));
//! ```
//!
//! ## Integration Notes
//!
//! - Tick several times per `bit_ms + guard_ms` slot; see [`timer::poll_interval_ms`]
//! - Receivers share no state, so one per channel is fine
//! - Delivery is best effort: there are no acknowledgements or retransmissions
//!
//! --
//! Designed for `#![no_std]` use, and equally at home on the host with `std`.

#![deny(
    bad_style,
    dead_code,
    improper_ctypes,
    non_shorthand_field_patterns,
    no_mangle_generic_items,
    overflowing_literals,
    path_statements,
    patterns_in_fns_without_body,
    unconditional_recursion,
    unused,
    while_true,
    missing_debug_implementations,
    missing_docs,
    trivial_casts,
    trivial_numeric_casts,
    unused_extern_crates,
    unused_import_braces,
    unused_qualifications,
    unused_results
)]
#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(not(feature = "std"))]
pub use heapless;

#[macro_use]
mod fmt;

pub mod buffer;
pub mod channel;
pub(crate) mod checksum;
pub mod config;
pub mod consts;
pub mod error;
pub mod grid;
pub mod manual;
pub mod ook;
pub mod protocol;
pub mod receiver;
pub(crate) mod session;
pub mod status;
pub mod timer;
pub mod transmitter;
