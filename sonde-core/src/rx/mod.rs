//! Bit-timed serial reception
//!
//! Decodes 8N1 (or 8N2) frames from a polled input pin using busy-wait
//! delays instead of a UART peripheral.

pub mod buffer;
pub mod receiver;
pub mod timing;

pub use buffer::{BufferError, SondeBuffer, DEFAULT_CAPACITY};
pub use receiver::{BitBangReceiver, RxConfig, RxError, RxState, RxStats, DATA_BITS, STATUS_LINE};
pub use timing::{BaudRate, BitTiming};
