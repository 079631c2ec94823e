//! Bit-banged receive task
//!
//! Busy-waits for the whole frame, so it holds the executor while a byte
//! is in flight.

use defmt::*;
use embassy_time::Timer;

use sonde_core::rx::{BitBangReceiver, RxError};
use sonde_hal::debug::NullSink;
use sonde_hal::OutputPin;
use sonde_hal_rp2040::{BlockingDelay, RpInput, RpOutput};

use crate::log_sink::DefmtSink;

/// Receiver on the board's GPIO and timer, full-size buffer
pub type SondeReceiver = BitBangReceiver<RpInput<'static>, BlockingDelay>;

/// Receive task - decodes sonde frames from GPIO until the buffer fills
#[embassy_executor::task]
pub async fn receiver_task(
    receiver: &'static mut SondeReceiver,
    tx_pin: RpOutput<'static>,
    status_line: bool,
) {
    info!(
        "Receiver task started (TX idle {})",
        if tx_pin.is_set_high() { "high" } else { "low" }
    );

    let mut status = DefmtSink;
    let mut quiet = NullSink;

    loop {
        let result = if status_line {
            receiver.run_iteration(&mut status)
        } else {
            receiver.run_iteration(&mut quiet)
        };

        match result {
            Ok(byte) => {
                trace!("Sonde byte {=u8:#x} ({} stored)", byte, receiver.count());
            }
            Err(RxError::Framing { byte }) => {
                warn!("Framing error, dropped {=u8:#x}", byte);
            }
            Err(RxError::BufferFull) => {
                error!(
                    "Sonde buffer full ({} bytes), reception halted",
                    receiver.count()
                );
                info!("Receive stats: {:?}", receiver.stats());
                break;
            }
        }
    }

    // Keep the TX pin driven idle while halted
    let _tx_pin = tx_pin;
    loop {
        Timer::after_secs(60).await;
    }
}
