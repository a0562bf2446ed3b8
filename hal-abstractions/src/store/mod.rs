//! Persistent byte store
//!
//! A fixed-capacity, byte-addressable store with a global busy gate: only one
//! write may be in flight across the whole store, and both `write` and `read`
//! wait for it to complete before touching the medium.
//!
//! ## Drivers
//!
//! - **`at24`**: 24-series I²C EEPROM with acknowledge polling
//! - **`ram`**: volatile array store for bring-up and tests

use core::fmt;

pub mod at24;
pub mod ram;

pub use at24::{At24Config, At24Eeprom};
pub use ram::RamStore;

/// Store operation errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreError<E> {
    /// Address past the end of the store
    OutOfRange { address: usize, capacity: usize },
    /// Previous write did not complete within the poll budget
    Unavailable,
    /// Underlying bus fault
    Bus(E),
}

impl<E: fmt::Debug> fmt::Display for StoreError<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OutOfRange { address, capacity } => {
                write!(f, "Address {} out of range (capacity {})", address, capacity)
            }
            Self::Unavailable => write!(f, "Store unavailable"),
            Self::Bus(e) => write!(f, "Store bus error: {:?}", e),
        }
    }
}

impl<E: fmt::Debug> core::error::Error for StoreError<E> {}

#[cfg(feature = "defmt")]
impl<E: fmt::Debug> defmt::Format for StoreError<E> {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Self::OutOfRange { address, capacity } => defmt::write!(
                f,
                "Address {} out of range (capacity {})",
                address,
                capacity
            ),
            Self::Unavailable => defmt::write!(f, "Store unavailable"),
            Self::Bus(e) => defmt::write!(f, "Store bus error: {}", defmt::Debug2Format(e)),
        }
    }
}

/// Blocking byte-addressable store
///
/// Content at an address that was never written is undefined; callers must
/// write before they read.
pub trait ByteStore {
    type Error;

    /// Number of addressable cells
    fn capacity(&self) -> usize;

    /// Wait for any in-flight write, then commit `byte` at `address`
    fn write(&mut self, address: usize, byte: u8) -> Result<(), Self::Error>;

    /// Wait for any in-flight write, then return the byte at `address`
    fn read(&mut self, address: usize) -> Result<u8, Self::Error>;
}

/// Reject addresses past `capacity`
pub(crate) fn check_address<E>(address: usize, capacity: usize) -> Result<(), StoreError<E>> {
    if address < capacity {
        Ok(())
    } else {
        Err(StoreError::OutOfRange { address, capacity })
    }
}
