//! Sonde Link - Radiosonde Receiver Firmware
//!
//! Reads a weather balloon sonde's serial data line on an RP2040 by
//! polling a GPIO and busy-waiting hand-tuned bit delays. A relay mode
//! copies a hardware UART to the debug log instead.

#![no_std]
#![no_main]

use defmt::*;
use embassy_executor::Spawner;
use embassy_rp::bind_interrupts;
use embassy_rp::gpio::{Input, Level, Output, Pull};
use embassy_rp::peripherals::UART1;
use embassy_rp::uart::{BufferedInterruptHandler, Config as UartConfig, Uart};
use static_cell::StaticCell;
use {defmt_rtt as _, panic_probe as _};

use sonde_core::rx::BitBangReceiver;
use sonde_hal::gpio::{HalInput, HalOutput};
use sonde_hal_rp2040::blocking_delay;

use crate::config::load_config;
use crate::tasks::SondeReceiver;

/// Configuration compiled into the firmware
/// Edit sonde.toml and rebuild to customize
const EMBEDDED_CONFIG: &str = include_str!("../sonde.toml");

mod config;
mod log_sink;
mod tasks;

bind_interrupts!(struct Irqs {
    UART1_IRQ => BufferedInterruptHandler<UART1>;
});

// Static cells for UART buffers (must live forever)
static TX_BUF: StaticCell<[u8; 64]> = StaticCell::new();
static RX_BUF: StaticCell<[u8; 256]> = StaticCell::new();

// Receiver with its sonde buffer, too large for a task future
static RECEIVER: StaticCell<SondeReceiver> = StaticCell::new();

/// Main entry point
#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("Sonde Link firmware starting...");

    let p = embassy_rp::init(Default::default());
    info!("Peripherals initialized");

    let (config, rx_config) = load_config(EMBEDDED_CONFIG);
    let baud = rx_config.timing.baud_rate().unwrap_or_default();
    info!(
        "Receiver config: {} baud, {}/{} us delays, {} stop bit(s)",
        baud.bits_per_second(),
        rx_config.timing.full_bit_us,
        rx_config.timing.half_bit_us,
        rx_config.stop_bits.count()
    );

    if config.debug.relay {
        // Sonde on a hardware UART (UART1: GPIO4 TX, GPIO5 RX)
        let mut uart_config = UartConfig::default();
        uart_config.baudrate = baud.bits_per_second();

        let tx_buf = TX_BUF.init([0u8; 64]);
        let rx_buf = RX_BUF.init([0u8; 256]);

        let uart = Uart::new_blocking(p.UART1, p.PIN_4, p.PIN_5, uart_config);
        let uart = uart.into_buffered(Irqs, tx_buf, rx_buf);
        let (_tx, rx) = uart.split();
        info!("UART1 initialized for relay");

        spawner
            .spawn(tasks::relay_task(rx, config.debug.relay_debug))
            .unwrap();

        loop {
            embassy_time::Timer::after_secs(60).await;
        }
    }

    // Bit-banged line: GPIO0 RX with pull-up so a disconnected sonde
    // reads idle, GPIO1 TX held idle and otherwise unused
    let rx_pin = HalInput(Input::new(p.PIN_0, Pull::Up));
    let tx_pin = HalOutput::new(Output::new(p.PIN_1, Level::High), true);
    info!("GPIO0/GPIO1 initialized for bit-banged reception");

    let receiver = RECEIVER.init_with(|| BitBangReceiver::new(rx_pin, blocking_delay(), rx_config));
    info!("Sonde buffer: {} bytes", receiver.buffer().capacity());

    spawner
        .spawn(tasks::receiver_task(
            receiver,
            tx_pin,
            config.debug.status_line,
        ))
        .unwrap();

    // The receiver task never yields while a frame is in flight; nothing
    // else needs the executor
    loop {
        embassy_time::Timer::after_secs(60).await;
    }
}
