//! Serial link module
//!
//! - **`error`**: `UartError` with `embedded-io` error kinds
//! - **`uart`**: `UartLink`, the USART3 port the benchmark runs over

pub mod error;
pub mod uart;

pub use uart::UartLink;
