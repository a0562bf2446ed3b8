//! Millisecond time source

/// Monotonically non-decreasing millisecond counter
///
/// Implementors advance from an external periodic tick. Reading never fails:
/// if the tick source stalls, time simply stops.
pub trait Monotonic {
    /// Milliseconds since the clock started
    fn now_ms(&self) -> u64;

    /// Milliseconds elapsed since an earlier `now_ms()` reading
    fn elapsed_since(&self, earlier_ms: u64) -> u64 {
        self.now_ms().saturating_sub(earlier_ms)
    }
}

impl<T: Monotonic + ?Sized> Monotonic for &T {
    fn now_ms(&self) -> u64 {
        (**self).now_ms()
    }
}
