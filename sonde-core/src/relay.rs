//! Debug relay
//!
//! Copies bytes from the sonde's serial port to a debug port, one byte per
//! loop iteration. When nothing is waiting the relay says so on the debug
//! port, and in debug mode re-arms the receiver and reports whether it is
//! listening.

use sonde_hal::{UartRx, UartTx};

/// Written when no byte is waiting (no line terminator)
pub const NOT_AVAILABLE_NOTICE: &str = "sonde serial is not available";

/// Written in debug mode when the receiver reports it is listening
pub const LISTENING_LINE: &str = "It is listening";

/// Outcome of one relay step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RelayEvent {
    /// A byte was copied to the debug port
    Relayed(u8),
    /// Nothing waiting
    Idle {
        /// Receiver confirmed it is listening (debug mode only)
        listening: bool,
    },
}

/// Relay errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RelayError<RxE, TxE> {
    /// Receiving from the sonde port failed
    Rx(RxE),
    /// Writing to the debug port failed
    Tx(TxE),
}

/// Serial-to-debug relay
pub struct DebugRelay<R, T> {
    rx: R,
    tx: T,
    debug: bool,
}

impl<R: UartRx, T: UartTx> DebugRelay<R, T> {
    /// Create a relay
    ///
    /// With `debug` set, idle steps re-arm the receiver and report whether
    /// it is listening.
    pub fn new(rx: R, tx: T, debug: bool) -> Self {
        Self { rx, tx, debug }
    }

    /// Relay at most one byte
    pub fn step(&mut self) -> Result<RelayEvent, RelayError<R::Error, T::Error>> {
        if let Some(byte) = self.rx.try_read_byte().map_err(RelayError::Rx)? {
            self.tx.write_blocking(&[byte]).map_err(RelayError::Tx)?;
            return Ok(RelayEvent::Relayed(byte));
        }

        self.tx
            .write_blocking(NOT_AVAILABLE_NOTICE.as_bytes())
            .map_err(RelayError::Tx)?;

        let mut listening = false;
        if self.debug {
            self.rx.listen();
            if self.rx.is_listening() {
                listening = true;
                self.tx
                    .write_blocking(LISTENING_LINE.as_bytes())
                    .map_err(RelayError::Tx)?;
                self.tx.write_blocking(b"\r\n").map_err(RelayError::Tx)?;
            }
        }

        Ok(RelayEvent::Idle { listening })
    }

    /// Check if debug mode is on
    pub fn is_debug(&self) -> bool {
        self.debug
    }

    /// Give back both ports
    pub fn release(self) -> (R, T) {
        (self.rx, self.tx)
    }
}
