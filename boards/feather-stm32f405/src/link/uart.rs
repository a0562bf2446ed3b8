#![deny(unsafe_code)]
//! Blocking UART wrapper implementing the embedded-io traits
//!
//! `linkbench_hal::ByteLink` is blanket-implemented for `Read + Write +
//! ReadReady`, so providing those three here is all the session controller
//! needs from the board.

use embassy_stm32::mode::Blocking;
use embassy_stm32::pac;
use embassy_stm32::peripherals::{PB10, PB11, USART3};
use embassy_stm32::usart::{self, ConfigError, Uart};
use embassy_stm32::Peri;
use embedded_io::{ErrorType, Read, ReadReady, Write};

use super::error::UartError;

/// USART3 on the Feather's TX (PB10) / RX (PB11) pins, 8N1
pub struct UartLink {
    uart: Uart<'static, Blocking>,
    regs: pac::usart::Usart,
}

impl UartLink {
    /// Configure USART3 for `baud_rate`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the baud rate cannot be derived from the
    /// peripheral clock
    pub fn new(
        peri: Peri<'static, USART3>,
        rx: Peri<'static, PB11>,
        tx: Peri<'static, PB10>,
        baud_rate: u32,
    ) -> Result<Self, ConfigError> {
        let mut config = usart::Config::default();
        config.baudrate = baud_rate;

        Ok(Self {
            uart: Uart::new_blocking(peri, rx, tx, config)?,
            regs: pac::USART3,
        })
    }
}

impl ErrorType for UartLink {
    type Error = UartError;
}

/// Reads one byte per call; blocks until it has arrived
impl Read for UartLink {
    fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error> {
        if buf.is_empty() {
            return Ok(0);
        }
        self.uart.blocking_read(&mut buf[..1])?;
        Ok(1)
    }
}

/// RXNE: a received byte is waiting in the data register
impl ReadReady for UartLink {
    fn read_ready(&mut self) -> Result<bool, Self::Error> {
        Ok(self.regs.sr().read().rxne())
    }
}

/// Blocks until the transmit data register has taken every byte
impl Write for UartLink {
    fn write(&mut self, buf: &[u8]) -> Result<usize, Self::Error> {
        self.uart.blocking_write(buf)?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        self.uart.blocking_flush()?;
        Ok(())
    }
}
