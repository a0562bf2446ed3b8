#![deny(unsafe_code)]
#![no_main]
#![no_std]

use defmt_rtt as _; // global logger
use panic_probe as _;
use rtic::app;
use rtic_monotonics::stm32::prelude::*;

use linkbench_core::TickClock;

mod config;
mod link;
mod systick;

stm32_tim2_monotonic!(Mono, 1_000_000);

/// Session clock advanced from the SysTick exception
static CLOCK: TickClock = TickClock::for_tick_hz(config::TICK_HZ);

#[app(device = embassy_stm32, peripherals = true, dispatchers = [USART1])]
mod app {
    use super::*;
    use defmt::{error, info};
    use embassy_stm32::gpio::{Level, Output, Speed};
    use embassy_stm32::i2c::{self, I2c, Master};
    use embassy_stm32::mode::Blocking;
    use embassy_stm32::rcc::{Hse, HseMode};
    use embassy_stm32::time::Hertz;
    use linkbench_core::{group_thousands, SessionController};
    use linkbench_hal::store::At24Eeprom;

    use crate::config::{BoardConfig, BLOCK_SIZE, SYSCLK_HZ, TIM2_CLOCK_HZ};
    use crate::link::UartLink;

    type Eeprom = At24Eeprom<I2c<'static, Blocking, Master>>;
    type Controller = SessionController<UartLink, Eeprom, &'static TickClock, BLOCK_SIZE>;

    #[shared]
    struct Shared {}

    #[local]
    struct Local {
        led: Output<'static>,
        controller: Controller,
    }

    #[init]
    fn init(cx: init::Context) -> (Shared, Local) {
        info!("Link benchmark starting...");
        let board = BoardConfig::default();

        // Adafruit Feather STM32F405: 12 MHz HSE
        let mut config = embassy_stm32::Config::default();
        config.rcc.hse = Some(Hse {
            freq: Hertz(12_000_000),
            mode: HseMode::Oscillator,
        });

        // HSE (12 MHz) / PREDIV(6) = 2 MHz (PLL input)
        // 2 MHz * MUL(168) = 336 MHz (VCO)
        // VCO / DIVP(4) = 84 MHz (SYSCLK)
        config.rcc.pll_src = embassy_stm32::rcc::PllSource::HSE;
        config.rcc.pll = Some(embassy_stm32::rcc::Pll {
            prediv: embassy_stm32::rcc::PllPreDiv::DIV6,
            mul: embassy_stm32::rcc::PllMul::MUL168,
            divp: Some(embassy_stm32::rcc::PllPDiv::DIV4),
            divq: None,
            divr: None,
        });
        config.rcc.sys = embassy_stm32::rcc::Sysclk::PLL1_P;
        config.rcc.ahb_pre = embassy_stm32::rcc::AHBPrescaler::DIV1; // 84 MHz
        config.rcc.apb1_pre = embassy_stm32::rcc::APBPrescaler::DIV2; // 42 MHz
        config.rcc.apb2_pre = embassy_stm32::rcc::APBPrescaler::DIV1; // 84 MHz

        let p = embassy_stm32::init(config);
        info!("System initialized: SYSCLK={} Hz", SYSCLK_HZ);

        Mono::start(TIM2_CLOCK_HZ);
        systick::start(cx.core.SYST, SYSCLK_HZ, CLOCK.tick_hz());

        let uart = defmt::unwrap!(UartLink::new(
            p.USART3,
            p.PB11,
            p.PB10,
            board.bench.baud_rate
        ));
        info!("USART3 link up at {} baud, 8N1", board.bench.baud_rate);

        let mut i2c_config = i2c::Config::default();
        i2c_config.frequency = board.i2c_frequency;
        let i2c = I2c::new_blocking(p.I2C1, p.PB6, p.PB7, i2c_config);
        let eeprom = At24Eeprom::with_config(i2c, board.eeprom.clone());
        info!(
            "EEPROM at 0x{:02x}, {} bytes",
            board.eeprom.device_address, board.eeprom.capacity
        );

        let controller = defmt::unwrap!(SessionController::new(
            uart,
            eeprom,
            &CLOCK,
            board.bench.clone()
        ));
        info!(
            "Session block {} bytes, rate line: {}",
            BLOCK_SIZE, board.bench.rate_report
        );

        let led = Output::new(p.PC1, Level::High, Speed::Low);
        heartbeat::spawn().ok();

        (Shared {}, Local { led, controller })
    }

    /// Clock tick; the only code sharing state with the session loop
    #[task(binds = SysTick, priority = 2)]
    fn sys_tick(_cx: sys_tick::Context) {
        CLOCK.tick();
    }

    /// Heartbeat task
    #[task(priority = 1, local = [led])]
    async fn heartbeat(cx: heartbeat::Context) {
        info!("Heartbeat task started");
        loop {
            cx.local.led.set_high();
            Mono::delay(100.millis()).await;
            cx.local.led.set_low();
            Mono::delay(4900.millis()).await;
        }
    }

    /// Session loop - polls the link forever, never sleeps
    ///
    /// Link and EEPROM calls busy-wait, so this runs in idle where every
    /// other task can preempt it.
    #[idle(local = [controller])]
    fn idle(cx: idle::Context) -> ! {
        let controller = cx.local.controller;

        if let Err(e) = controller.start() {
            error!("Failed to send ready banner: {}", e);
        }
        info!("Waiting for {} byte blocks", controller.capacity());

        loop {
            match controller.poll() {
                Ok(Some(report)) => info!(
                    "Session complete: {} bytes in {=str} ms (started at {} ms)",
                    report.bytes,
                    group_thousands(report.elapsed_ms).as_str(),
                    report.started_at_ms
                ),
                Ok(None) => {}
                Err(e) => error!("Session abandoned: {}", e),
            }
        }
    }
}
