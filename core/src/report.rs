//! Text report stream
//!
//! The banners share the link with the retransmitted block, so every line is
//! written through `ByteLink` in the order the session produces them:
//!
//! ```text
//! Ready to receive 1000 characters...
//! Time to receive 1000 characters: 4,170 milliseconds
//! Data speed: 4,170
//! Retransmitting stored data:
//! <1000 raw bytes>
//! Retransmission complete.
//! Ready to receive 1000 characters...
//! ```

use core::fmt::{self, Write};

use linkbench_hal::ByteLink;

use crate::number::Grouped;

/// `fmt::Write` over a link that keeps the first link error
struct LinkWriter<'a, L: ByteLink> {
    link: &'a mut L,
    error: Option<L::Error>,
}

impl<L: ByteLink> Write for LinkWriter<'_, L> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.link.send_all(s.as_bytes()).map_err(|e| {
            self.error = Some(e);
            fmt::Error
        })
    }
}

fn emit<L: ByteLink>(link: &mut L, args: fmt::Arguments<'_>) -> Result<(), L::Error> {
    let mut writer = LinkWriter { link, error: None };
    match writer.write_fmt(args) {
        Ok(()) => Ok(()),
        Err(_) => {
            // Only the link can fail here; Grouped never does
            debug_assert!(writer.error.is_some(), "formatting failed without a link error");
            writer.error.map_or(Ok(()), Err)
        }
    }
}

/// `Ready to receive N characters...`
pub fn ready<L: ByteLink>(link: &mut L, capacity: usize) -> Result<(), L::Error> {
    emit(link, format_args!("Ready to receive {} characters...\n", capacity))
}

/// `Time to receive N characters: T milliseconds`
pub fn elapsed<L: ByteLink>(link: &mut L, capacity: usize, elapsed_ms: u64) -> Result<(), L::Error> {
    emit(
        link,
        format_args!(
            "Time to receive {} characters: {} milliseconds\n",
            capacity,
            Grouped(elapsed_ms)
        ),
    )
}

/// `Data speed: V`, left unterminated; the retransmit banner opens with a newline
pub fn rate<L: ByteLink>(link: &mut L, value: u64) -> Result<(), L::Error> {
    emit(link, format_args!("Data speed: {}", Grouped(value)))
}

/// Banner preceding the raw block
pub fn retransmit_start<L: ByteLink>(link: &mut L) -> Result<(), L::Error> {
    link.send_all(b"\nRetransmitting stored data:\n")
}

/// Banner following the raw block
pub fn retransmit_done<L: ByteLink>(link: &mut L) -> Result<(), L::Error> {
    link.send_all(b"\nRetransmission complete.\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Collects everything sent; fails once `budget` bytes have gone out
    #[derive(Default)]
    struct Sink {
        sent: Vec<u8>,
        budget: Option<usize>,
    }

    impl ByteLink for Sink {
        type Error = &'static str;

        fn send(&mut self, byte: u8) -> Result<(), Self::Error> {
            if self.budget == Some(self.sent.len()) {
                return Err("full");
            }
            self.sent.push(byte);
            Ok(())
        }

        fn receive(&mut self) -> Result<u8, Self::Error> {
            Err("send only")
        }

        fn has_data(&mut self) -> Result<bool, Self::Error> {
            Ok(false)
        }

        fn flush(&mut self) -> Result<(), Self::Error> {
            Ok(())
        }
    }

    fn text(sink: &Sink) -> &str {
        core::str::from_utf8(&sink.sent).unwrap()
    }

    #[test]
    fn test_ready_banner() {
        let mut sink = Sink::default();
        ready(&mut sink, 1000).unwrap();
        assert_eq!(text(&sink), "Ready to receive 1000 characters...\n");
    }

    #[test]
    fn test_elapsed_line_groups_digits() {
        let mut sink = Sink::default();
        elapsed(&mut sink, 1000, 4170).unwrap();
        assert_eq!(
            text(&sink),
            "Time to receive 1000 characters: 4,170 milliseconds\n"
        );
    }

    #[test]
    fn test_rate_line_is_unterminated() {
        let mut sink = Sink::default();
        rate(&mut sink, 1_234_567).unwrap();
        retransmit_start(&mut sink).unwrap();
        assert_eq!(
            text(&sink),
            "Data speed: 1,234,567\nRetransmitting stored data:\n"
        );
    }

    #[test]
    fn test_retransmit_done() {
        let mut sink = Sink::default();
        retransmit_done(&mut sink).unwrap();
        assert_eq!(text(&sink), "\nRetransmission complete.\n");
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "formatting failed without a link error")]
    fn test_formatter_failure_is_not_swallowed() {
        struct Broken;

        impl fmt::Display for Broken {
            fn fmt(&self, _: &mut fmt::Formatter<'_>) -> fmt::Result {
                Err(fmt::Error)
            }
        }

        let mut sink = Sink::default();
        let _ = emit(&mut sink, format_args!("Data speed: {}", Broken));
    }

    #[test]
    fn test_link_error_surfaces() {
        let mut sink = Sink {
            budget: Some(5),
            ..Default::default()
        };
        assert_eq!(elapsed(&mut sink, 1000, 1), Err("full"));
        assert_eq!(sink.sent, b"Time ");
    }
}
