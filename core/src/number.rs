//! Thousands-grouped integer rendering
//!
//! `1234567` renders as `1,234,567`: a separator every three digits counted
//! from the least significant end, never a leading one, unsigned only.

use core::fmt::{self, Write};

use heapless::String;

/// Longest rendering: `u64::MAX` has 20 digits and 6 separators
pub const MAX_GROUPED_LEN: usize = 26;

const SEPARATOR: u8 = b',';

/// `Display` adapter that groups digits in threes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Grouped(pub u64);

impl fmt::Display for Grouped {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut buf = [0u8; MAX_GROUPED_LEN];
        let mut pos = buf.len();
        let mut rest = self.0;
        let mut digits = 0;

        loop {
            if digits > 0 && digits % 3 == 0 {
                pos -= 1;
                buf[pos] = SEPARATOR;
            }
            pos -= 1;
            buf[pos] = b'0' + (rest % 10) as u8;
            rest /= 10;
            digits += 1;
            if rest == 0 {
                break;
            }
        }

        let text = core::str::from_utf8(&buf[pos..]).map_err(|_| fmt::Error)?;
        f.pad(text)
    }
}

/// Render `value` into a fixed-capacity string
pub fn group_thousands(value: u64) -> String<MAX_GROUPED_LEN> {
    let mut out = String::new();
    // MAX_GROUPED_LEN covers u64::MAX, so this cannot run out of room
    let _ = write!(out, "{}", Grouped(value));
    out
}
