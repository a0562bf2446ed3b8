#![deny(unsafe_code)]
//! Board configuration structures

use embassy_stm32::time::Hertz;
use linkbench_core::BenchConfig;
use linkbench_hal::store::At24Config;

/// Bytes per benchmark session
pub const BLOCK_SIZE: usize = 1000;

/// Session clock tick rate (1 ms resolution)
pub const TICK_HZ: u32 = 1000;

/// Core clock after `init` (HSE 12 MHz → PLL → 84 MHz)
pub const SYSCLK_HZ: u32 = 84_000_000;

/// TIM2 on APB1: timer clock = 2*APB1 when prescaler != 1
pub const TIM2_CLOCK_HZ: u32 = 84_000_000;

/// Everything the firmware needs to know before the session loop starts
#[derive(Debug, Clone)]
pub struct BoardConfig {
    /// Link speed, tick rate and report format
    pub bench: BenchConfig,
    /// 24LC256 on I2C1 (SCL PB6, SDA PB7)
    pub eeprom: At24Config,
    /// I2C1 bus clock
    pub i2c_frequency: Hertz,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            bench: BenchConfig::default(),
            eeprom: At24Config::default(),
            // 24LC256 fast mode; keeps ack polls short against the 2400 baud byte period
            i2c_frequency: Hertz(400_000),
        }
    }
}
