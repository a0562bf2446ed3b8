//! Byte-oriented serial link
//!
//! `ByteLink` is the one-byte-at-a-time view of a serial port the session
//! controller needs. Any type implementing the blocking `embedded-io`
//! traits `Read + Write + ReadReady` gets it through a blanket impl, so a
//! board only has to provide those.

use core::fmt;

use embedded_io::{ErrorType, Read, ReadReady, Write};

/// Serial link errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkError<E> {
    /// Underlying port reported an error
    Io(E),
    /// A transfer moved zero bytes (port closed)
    Closed,
}

impl<E: fmt::Debug> fmt::Display for LinkError<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "Link I/O error: {:?}", e),
            Self::Closed => write!(f, "Link closed"),
        }
    }
}

impl<E: fmt::Debug> core::error::Error for LinkError<E> {}

#[cfg(feature = "defmt")]
impl<E: fmt::Debug> defmt::Format for LinkError<E> {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Self::Io(e) => defmt::write!(f, "Link I/O error: {}", defmt::Debug2Format(e)),
            Self::Closed => defmt::write!(f, "Link closed"),
        }
    }
}

/// Blocking byte link
///
/// `send` returns once the transmitter has accepted the byte, not when it
/// is on the wire; use `flush` for that.
pub trait ByteLink {
    type Error;

    /// Block until the transmitter is free, then hand off one byte
    fn send(&mut self, byte: u8) -> Result<(), Self::Error>;

    /// Block until one byte has arrived and return it
    fn receive(&mut self) -> Result<u8, Self::Error>;

    /// `true` iff `receive` would return without blocking
    fn has_data(&mut self) -> Result<bool, Self::Error>;

    /// Block until every handed-off byte has left the transmitter
    fn flush(&mut self) -> Result<(), Self::Error>;

    /// Send a run of bytes in order
    fn send_all(&mut self, bytes: &[u8]) -> Result<(), Self::Error> {
        for &byte in bytes {
            self.send(byte)?;
        }
        Ok(())
    }
}

impl<T> ByteLink for T
where
    T: Read + Write + ReadReady,
{
    type Error = LinkError<<T as ErrorType>::Error>;

    fn send(&mut self, byte: u8) -> Result<(), Self::Error> {
        match self.write(&[byte]).map_err(LinkError::Io)? {
            0 => Err(LinkError::Closed),
            _ => Ok(()),
        }
    }

    fn receive(&mut self) -> Result<u8, Self::Error> {
        let mut buf = [0u8; 1];
        match self.read(&mut buf).map_err(LinkError::Io)? {
            0 => Err(LinkError::Closed),
            _ => Ok(buf[0]),
        }
    }

    fn has_data(&mut self) -> Result<bool, Self::Error> {
        self.read_ready().map_err(LinkError::Io)
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        Write::flush(self).map_err(LinkError::Io)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embedded_io::ErrorKind;
    use std::collections::VecDeque;

    #[derive(Default)]
    struct Port {
        rx: VecDeque<u8>,
        tx: Vec<u8>,
        flushed: usize,
        fail_writes: bool,
    }

    impl ErrorType for Port {
        type Error = ErrorKind;
    }

    impl Read for Port {
        fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error> {
            match self.rx.pop_front() {
                Some(byte) => {
                    buf[0] = byte;
                    Ok(1)
                }
                None => Ok(0),
            }
        }
    }

    impl ReadReady for Port {
        fn read_ready(&mut self) -> Result<bool, Self::Error> {
            Ok(!self.rx.is_empty())
        }
    }

    impl Write for Port {
        fn write(&mut self, buf: &[u8]) -> Result<usize, Self::Error> {
            if self.fail_writes {
                return Err(ErrorKind::BrokenPipe);
            }
            self.tx.extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> Result<(), Self::Error> {
            self.flushed += 1;
            Ok(())
        }
    }

    #[test]
    fn test_receive_in_arrival_order() {
        let mut port = Port::default();
        port.rx.extend([0x10, 0x20]);
        assert_eq!(port.has_data(), Ok(true));
        assert_eq!(port.receive(), Ok(0x10));
        assert_eq!(port.receive(), Ok(0x20));
        assert_eq!(port.has_data(), Ok(false));
    }

    #[test]
    fn test_send_all_keeps_order() {
        let mut port = Port::default();
        port.send_all(b"abc").unwrap();
        port.send(b'd').unwrap();
        ByteLink::flush(&mut port).unwrap();
        assert_eq!(port.tx, b"abcd");
        assert_eq!(port.flushed, 1);
    }

    #[test]
    fn test_empty_read_is_closed() {
        let mut port = Port::default();
        assert_eq!(port.receive(), Err(LinkError::Closed));
    }

    #[test]
    fn test_write_error_is_wrapped() {
        let mut port = Port {
            fail_writes: true,
            ..Default::default()
        };
        assert_eq!(port.send(1), Err(LinkError::Io(ErrorKind::BrokenPipe)));
    }
}
