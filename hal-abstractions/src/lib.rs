//! Hardware abstraction traits for the link benchmark firmware
//!
//! This crate defines the three seams the session logic runs against.
//! Boards implement them (or get them for free through `embedded-io` and
//! `embedded-hal`), tests implement them with fakes.
//!
//! - **`clock`**: `Monotonic` millisecond counter
//! - **`link`**: `ByteLink`, blanket-implemented for `embedded-io` serial ports
//! - **`store`**: `ByteStore` plus the I²C EEPROM and RAM drivers

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod clock;
pub mod link;
pub mod store;

pub use clock::Monotonic;
pub use link::{ByteLink, LinkError};
pub use store::{ByteStore, StoreError};
