//! 24-series I²C EEPROM driver (24LC256 and friends)
//!
//! Each byte write starts an internal write cycle of a few milliseconds,
//! during which the device does not acknowledge its address. That NACK is
//! the busy gate: before the next write or read the driver keeps addressing
//! the device until it answers (acknowledge polling).
//!
//! Only devices with 16-bit memory addressing are supported.

use embedded_hal::i2c::{Error as _, ErrorKind, I2c};

use super::{check_address, ByteStore, StoreError};

/// Device address with A0..A2 tied low
pub const DEFAULT_DEVICE_ADDRESS: u8 = 0x50;

/// 24LC256 capacity in bytes
pub const DEFAULT_CAPACITY: usize = 32 * 1024;

/// Largest store reachable with a 16-bit memory address
pub const MAX_CAPACITY: usize = 0x1_0000;

/// EEPROM driver configuration
#[derive(Debug, Clone)]
pub struct At24Config {
    /// 7-bit I²C device address
    pub device_address: u8,
    /// Addressable bytes, at most [`MAX_CAPACITY`]
    pub capacity: usize,
    /// Acknowledge polls allowed per busy wait (`None` waits forever)
    pub max_ready_polls: Option<u32>,
}

impl Default for At24Config {
    fn default() -> Self {
        Self {
            device_address: DEFAULT_DEVICE_ADDRESS,
            capacity: DEFAULT_CAPACITY,
            // ~75 µs per poll at 400 kHz, far beyond the 5 ms write cycle
            max_ready_polls: Some(10_000),
        }
    }
}

/// Blocking EEPROM store over an `embedded-hal` I²C bus
pub struct At24Eeprom<I> {
    i2c: I,
    config: At24Config,
    write_in_flight: bool,
}

impl<I: I2c> At24Eeprom<I> {
    /// Create a driver with the default configuration
    pub fn new(i2c: I) -> Self {
        Self::with_config(i2c, At24Config::default())
    }

    /// Create a driver with a custom configuration
    ///
    /// A capacity past [`MAX_CAPACITY`] is clamped; those cells would alias
    /// the bottom of the address space.
    pub fn with_config(i2c: I, mut config: At24Config) -> Self {
        if config.capacity > MAX_CAPACITY {
            #[cfg(feature = "defmt")]
            defmt::warn!(
                "EEPROM capacity {} exceeds 16-bit addressing, using {}",
                config.capacity,
                MAX_CAPACITY
            );
            config.capacity = MAX_CAPACITY;
        }
        Self {
            i2c,
            config,
            write_in_flight: false,
        }
    }

    /// Hand back the bus
    pub fn release(self) -> I {
        self.i2c
    }

    /// `true` while a write cycle may still be running
    pub fn is_write_in_flight(&self) -> bool {
        self.write_in_flight
    }

    /// Block until the previous write cycle has finished
    ///
    /// Polls by setting the address pointer to `address`, which the next
    /// access overwrites anyway. Returns immediately when nothing was written
    /// since the last successful poll.
    fn wait_ready(&mut self, address: usize) -> Result<(), StoreError<ErrorKind>> {
        if !self.write_in_flight {
            return Ok(());
        }

        let pointer = pointer_bytes(address);
        let mut polls: u32 = 0;
        loop {
            match self.i2c.write(self.config.device_address, &pointer) {
                Ok(()) => {
                    #[cfg(feature = "defmt")]
                    defmt::trace!("EEPROM ready after {} polls", polls);
                    self.write_in_flight = false;
                    return Ok(());
                }
                Err(e) => match e.kind() {
                    ErrorKind::NoAcknowledge(_) => {
                        polls += 1;
                        if let Some(max) = self.config.max_ready_polls {
                            if polls >= max {
                                #[cfg(feature = "defmt")]
                                defmt::warn!("EEPROM still busy after {} polls", polls);
                                return Err(StoreError::Unavailable);
                            }
                        }
                    }
                    kind => return Err(StoreError::Bus(kind)),
                },
            }
        }
    }
}

impl<I: I2c> ByteStore for At24Eeprom<I> {
    type Error = StoreError<ErrorKind>;

    fn capacity(&self) -> usize {
        self.config.capacity
    }

    fn write(&mut self, address: usize, byte: u8) -> Result<(), Self::Error> {
        check_address(address, self.config.capacity)?;
        self.wait_ready(address)?;

        let [hi, lo] = pointer_bytes(address);
        self.i2c
            .write(self.config.device_address, &[hi, lo, byte])
            .map_err(|e| StoreError::Bus(e.kind()))?;
        self.write_in_flight = true;
        Ok(())
    }

    fn read(&mut self, address: usize) -> Result<u8, Self::Error> {
        check_address(address, self.config.capacity)?;
        self.wait_ready(address)?;

        let mut buf = [0u8; 1];
        self.i2c
            .write_read(self.config.device_address, &pointer_bytes(address), &mut buf)
            .map_err(|e| StoreError::Bus(e.kind()))?;
        Ok(buf[0])
    }
}

/// Big-endian 16-bit memory address
fn pointer_bytes(address: usize) -> [u8; 2] {
    [(address >> 8) as u8, address as u8]
}
