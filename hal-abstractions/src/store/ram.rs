//! Volatile RAM-backed store

use core::convert::Infallible;

use super::{check_address, ByteStore, StoreError};

/// Value of a cell that was never written (matches erased EEPROM)
pub const ERASED: u8 = 0xFF;

/// Array-backed `ByteStore` with no busy period
///
/// Content is lost on reset, so this only stands in for the EEPROM during
/// bring-up and in tests.
pub struct RamStore<const N: usize> {
    cells: [u8; N],
}

impl<const N: usize> RamStore<N> {
    pub const fn new() -> Self {
        Self { cells: [ERASED; N] }
    }

    /// Raw view of every cell
    pub fn cells(&self) -> &[u8; N] {
        &self.cells
    }
}

impl<const N: usize> Default for RamStore<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> ByteStore for RamStore<N> {
    type Error = StoreError<Infallible>;

    fn capacity(&self) -> usize {
        N
    }

    fn write(&mut self, address: usize, byte: u8) -> Result<(), Self::Error> {
        check_address(address, N)?;
        self.cells[address] = byte;
        Ok(())
    }

    fn read(&mut self, address: usize) -> Result<u8, Self::Error> {
        check_address(address, N)?;
        Ok(self.cells[address])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_erased() {
        let mut store = RamStore::<4>::new();
        assert_eq!(store.read(3), Ok(ERASED));
    }

    #[test]
    fn test_write_then_read() {
        let mut store = RamStore::<4>::new();
        store.write(2, 0x5A).unwrap();
        assert_eq!(store.read(2), Ok(0x5A));
        assert_eq!(store.cells(), &[ERASED, ERASED, 0x5A, ERASED]);
    }

    #[test]
    fn test_out_of_range() {
        let mut store = RamStore::<4>::new();
        assert_eq!(
            store.write(4, 0),
            Err(StoreError::OutOfRange {
                address: 4,
                capacity: 4
            })
        );
        assert!(store.read(100).is_err());
    }
}
