//! UART serial communication abstractions
//!
//! Provides traits for blocking serial communication that can be
//! implemented by chip-specific HALs, hardware or software-emulated.

/// UART transmitter
pub trait UartTx {
    /// Error type for transmit operations
    type Error;

    /// Write data to the UART
    ///
    /// Blocks until all data has been written or an error occurs.
    fn write_blocking(&mut self, data: &[u8]) -> Result<(), Self::Error>;

    /// Flush any buffered data
    fn flush(&mut self) -> Result<(), Self::Error>;
}

/// UART receiver
pub trait UartRx {
    /// Error type for receive operations
    type Error;

    /// Read one byte if one is waiting, without blocking
    fn try_read_byte(&mut self) -> Result<Option<u8>, Self::Error>;

    /// Start listening on this port
    ///
    /// Software-emulated ports can only receive on one port at a time;
    /// hardware ports are always listening.
    fn listen(&mut self) {}

    /// Check whether this port is the one currently receiving
    fn is_listening(&self) -> bool {
        true
    }
}

/// Number of stop bits
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StopBits {
    #[default]
    One,
    Two,
}

impl StopBits {
    /// Stop bits as a count
    pub fn count(self) -> u8 {
        match self {
            StopBits::One => 1,
            StopBits::Two => 2,
        }
    }

    /// Parse a stop bit count
    pub fn from_count(count: u8) -> Option<Self> {
        match count {
            1 => Some(StopBits::One),
            2 => Some(StopBits::Two),
            _ => None,
        }
    }
}
