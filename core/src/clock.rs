//! Interrupt-driven millisecond clock
//!
//! A periodic interrupt calls [`TickClock::tick`]; the main loop reads the
//! count with [`Monotonic::now_ms`]. The counter is 64 bits wide, which a
//! 32-bit core cannot load in one bus access, so both sides go through a
//! critical section and a read can never observe a half-updated value.
//!
//! ## Usage
//! ```ignore
//! static CLOCK: TickClock = TickClock::for_tick_hz(1000);
//!
//! // program the tick interrupt from the clock itself
//! start_tick_timer(CLOCK.tick_hz());
//!
//! // tick interrupt
//! CLOCK.tick();
//!
//! // main loop
//! let start = CLOCK.now_ms();
//! ```

use core::cell::Cell;

use critical_section::Mutex;
use linkbench_hal::Monotonic;

/// Fastest supported tick rate
pub const MAX_TICK_HZ: u32 = 1000;

/// Shared tick counter
///
/// The tick rate is fixed at construction. The tick source must be
/// programmed from [`TickClock::tick_hz`] so the two cannot disagree.
pub struct TickClock {
    ticks: Mutex<Cell<u64>>,
    tick_hz: u32,
}

impl TickClock {
    /// Clock advanced by a 1 ms tick
    pub const fn new() -> Self {
        Self::for_tick_hz(MAX_TICK_HZ)
    }

    /// Clock advanced `tick_hz` times per second
    ///
    /// # Panics
    ///
    /// If `tick_hz` does not divide 1000. In a `static` initializer this is
    /// a compile error.
    pub const fn for_tick_hz(tick_hz: u32) -> Self {
        assert!(
            tick_hz > 0 && MAX_TICK_HZ % tick_hz == 0,
            "tick rate must divide 1000 Hz"
        );
        Self {
            ticks: Mutex::new(Cell::new(0)),
            tick_hz,
        }
    }

    /// Interrupts per second the tick source has to deliver
    pub const fn tick_hz(&self) -> u32 {
        self.tick_hz
    }

    /// Milliseconds added per tick
    pub const fn period_ms(&self) -> u64 {
        (MAX_TICK_HZ / self.tick_hz) as u64
    }

    /// Advance by one tick. Call from the tick interrupt only.
    pub fn tick(&self) {
        critical_section::with(|cs| {
            let ticks = self.ticks.borrow(cs);
            ticks.set(ticks.get().wrapping_add(1));
        });
    }

    /// Ticks seen since boot
    pub fn ticks(&self) -> u64 {
        critical_section::with(|cs| self.ticks.borrow(cs).get())
    }
}

impl Default for TickClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Monotonic for TickClock {
    fn now_ms(&self) -> u64 {
        self.ticks().wrapping_mul(self.period_ms())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_at_zero() {
        let clock = TickClock::new();
        assert_eq!(clock.now_ms(), 0);
    }

    #[test]
    fn test_advances_by_ticks() {
        let clock = TickClock::new();
        let before = clock.now_ms();
        for _ in 0..250 {
            clock.tick();
        }
        assert_eq!(clock.now_ms() - before, 250);
    }

    #[test]
    fn test_tick_period_scales() {
        let clock = TickClock::for_tick_hz(100);
        assert_eq!(clock.period_ms(), 10);
        clock.tick();
        clock.tick();
        assert_eq!(clock.ticks(), 2);
        assert_eq!(clock.now_ms(), 20);
    }

    #[test]
    fn test_one_second_of_ticks_reads_one_second() {
        for tick_hz in [1, 10, 100, 250, 500, 1000] {
            let clock = TickClock::for_tick_hz(tick_hz);
            assert_eq!(clock.tick_hz(), tick_hz);
            for _ in 0..tick_hz {
                clock.tick();
            }
            assert_eq!(clock.now_ms(), 1000, "at {} Hz", tick_hz);
        }
    }

    #[test]
    #[should_panic(expected = "tick rate must divide 1000 Hz")]
    fn test_rejects_uneven_tick_rate() {
        TickClock::for_tick_hz(300);
    }

    #[test]
    fn test_monotonic_under_concurrent_ticks() {
        const TICKS: u64 = 100_000;
        let clock = TickClock::new();

        std::thread::scope(|s| {
            s.spawn(|| {
                for _ in 0..TICKS {
                    clock.tick();
                }
            });

            let mut last = 0;
            while last < TICKS {
                let now = clock.now_ms();
                assert!(now >= last, "clock went backwards: {} < {}", now, last);
                last = now;
            }
        });

        assert_eq!(clock.now_ms(), TICKS);
    }
}
