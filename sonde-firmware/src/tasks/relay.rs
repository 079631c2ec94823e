//! Debug relay task
//!
//! Copies the sonde's hardware UART to the debug log.

use defmt::*;
use embassy_rp::uart::BufferedUartRx;
use embassy_time::Timer;

use sonde_core::relay::{DebugRelay, RelayError, RelayEvent};
use sonde_hal_rp2040::RpUartRx;

use crate::log_sink::DefmtTx;

/// Pause between idle relay steps so the notice does not flood the log
const IDLE_PAUSE_MS: u64 = 100;

/// Relay task - one byte per step, notices when the port is idle
#[embassy_executor::task]
pub async fn relay_task(rx: BufferedUartRx, debug: bool) {
    info!("Relay task started (debug: {})", debug);

    let mut relay = DebugRelay::new(RpUartRx::new(rx), DefmtTx, debug);

    loop {
        match relay.step() {
            Ok(RelayEvent::Relayed(_)) => {}
            Ok(RelayEvent::Idle { .. }) => {
                Timer::after_millis(IDLE_PAUSE_MS).await;
            }
            Err(RelayError::Rx(e)) => {
                warn!("Sonde UART error: {:?}", e);
            }
            Err(RelayError::Tx(never)) => match never {},
        }
    }
}
