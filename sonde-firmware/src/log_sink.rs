//! Debug output over defmt
//!
//! The debug channel is the RTT log rather than a second UART.

use core::convert::Infallible;

use defmt::info;
use sonde_hal::{DebugSink, UartTx};

/// Status lines as log entries
pub struct DefmtSink;

impl DebugSink for DefmtSink {
    fn write_line(&mut self, line: &str) {
        info!("{=str}", line);
    }
}

/// Relayed bytes as log entries
pub struct DefmtTx;

impl UartTx for DefmtTx {
    type Error = Infallible;

    fn write_blocking(&mut self, data: &[u8]) -> Result<(), Infallible> {
        info!("{=[u8]:a}", data);
        Ok(())
    }

    fn flush(&mut self) -> Result<(), Infallible> {
        Ok(())
    }
}
