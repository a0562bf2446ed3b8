#![deny(unsafe_code)]
//! UART link error types

use defmt::Format;
use embassy_stm32::usart;

/// UART receive/transmit errors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Format)]
pub enum UartError {
    /// Stop bit not seen where expected
    Framing,
    /// Noise detected on a received frame
    Noise,
    /// A byte arrived before the previous one was read
    Overrun,
    /// Parity check failed
    Parity,
    /// Anything else the driver reports
    Other,
}

impl From<usart::Error> for UartError {
    fn from(e: usart::Error) -> Self {
        match e {
            usart::Error::Framing => Self::Framing,
            usart::Error::Noise => Self::Noise,
            usart::Error::Overrun => Self::Overrun,
            usart::Error::Parity => Self::Parity,
            _ => Self::Other,
        }
    }
}

impl core::fmt::Display for UartError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Framing => write!(f, "Framing error"),
            Self::Noise => write!(f, "Noise error"),
            Self::Overrun => write!(f, "Receiver overrun"),
            Self::Parity => write!(f, "Parity error"),
            Self::Other => write!(f, "UART error"),
        }
    }
}

// Implement core::error::Error for no_std compatibility
impl core::error::Error for UartError {}

impl embedded_io::Error for UartError {
    fn kind(&self) -> embedded_io::ErrorKind {
        match self {
            Self::Framing | Self::Noise | Self::Parity => embedded_io::ErrorKind::InvalidData,
            _ => embedded_io::ErrorKind::Other,
        }
    }
}
