//! Platform-agnostic core logic for the link benchmark firmware
//!
//! This crate contains the store-and-forward session state machine and the
//! pieces it is built from. It has NO hardware dependencies: the link, the
//! store and the tick source come in through the `linkbench-hal` traits.
//!
//! - **`clock`**: interrupt-driven millisecond counter with torn-read-free snapshots
//! - **`config`**: benchmark parameters with `Default` implementations
//! - **`number`**: thousands-grouped integer rendering
//! - **`report`**: the text banners written to the link
//! - **`session`**: receive → measure → drain → reset cycle

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod clock;
pub mod config;
pub mod number;
pub mod report;
pub mod session;

pub use clock::TickClock;
pub use config::{BenchConfig, RateReport};
pub use number::{group_thousands, Grouped};
pub use session::{Phase, Session, SessionController, SessionError, SessionReport};
