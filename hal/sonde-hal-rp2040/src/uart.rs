//! Buffered UART receive port
//!
//! The relay polls for bytes without blocking, so the receive side checks
//! `read_ready` before reading.

use embassy_rp::uart::{BufferedUartRx, Error};
use embedded_io::{Read, ReadReady};

/// Receive half of a buffered UART
pub struct RpUartRx {
    rx: BufferedUartRx,
}

impl RpUartRx {
    pub fn new(rx: BufferedUartRx) -> Self {
        Self { rx }
    }
}

impl sonde_hal::UartRx for RpUartRx {
    type Error = Error;

    fn try_read_byte(&mut self) -> Result<Option<u8>, Error> {
        if !self.rx.read_ready()? {
            return Ok(None);
        }
        let mut buf = [0u8; 1];
        let n = self.rx.read(&mut buf)?;
        Ok((n == 1).then_some(buf[0]))
    }
}
