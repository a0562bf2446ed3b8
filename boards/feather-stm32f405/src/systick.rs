#![deny(unsafe_code)]
//! SysTick as the millisecond tick source
//!
//! The exception handler lives in the RTIC app and only calls
//! `TickClock::tick`; this module just programs the reload value.

use cortex_m::peripheral::syst::SystClkSource;
use cortex_m::peripheral::SYST;
use defmt::info;

/// SysTick reload register is 24 bits wide
const MAX_RELOAD: u32 = 0x00FF_FFFF;

/// Start SysTick interrupting `tick_hz` times per second off the core clock
pub fn start(mut syst: SYST, sysclk_hz: u32, tick_hz: u32) {
    let reload = (sysclk_hz / tick_hz.max(1)).saturating_sub(1).min(MAX_RELOAD);

    syst.set_clock_source(SystClkSource::Core);
    syst.set_reload(reload);
    syst.clear_current();
    syst.enable_interrupt();
    syst.enable_counter();

    info!("SysTick started: {} Hz (reload {})", tick_hz, reload);
}
