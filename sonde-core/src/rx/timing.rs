//! Bit timing constants
//!
//! Delays are hand-tuned per baud rate, not derived from the clock. They
//! are shorter than the nominal bit period (104 µs at 9600 baud) because
//! each pin sample and loop iteration costs time of its own.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Supported line speeds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum BaudRate {
    /// 4800 bits per second
    B4800,
    /// 9600 bits per second
    #[default]
    B9600,
}

impl BaudRate {
    /// Line speed in bits per second
    pub fn bits_per_second(self) -> u32 {
        match self {
            BaudRate::B4800 => 4800,
            BaudRate::B9600 => 9600,
        }
    }

    /// Look up a supported baud rate
    pub fn from_bits_per_second(bps: u32) -> Option<Self> {
        match bps {
            4800 => Some(BaudRate::B4800),
            9600 => Some(BaudRate::B9600),
            _ => None,
        }
    }

    /// Calibrated delay pair for this baud rate
    pub fn timing(self) -> BitTiming {
        match self {
            BaudRate::B4800 => BitTiming::BAUD_4800,
            BaudRate::B9600 => BitTiming::BAUD_9600,
        }
    }
}

/// Full-bit and half-bit busy-wait delays in microseconds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct BitTiming {
    /// Delay between consecutive bit samples
    pub full_bit_us: u32,
    /// Delay after the start edge before the first full-bit wait
    pub half_bit_us: u32,
}

impl BitTiming {
    /// Calibrated for 9600 baud
    pub const BAUD_9600: Self = Self::new(84, 42);

    /// Calibrated for 4800 baud
    pub const BAUD_4800: Self = Self::new(188, 94);

    /// Create a custom delay pair
    pub const fn new(full_bit_us: u32, half_bit_us: u32) -> Self {
        Self {
            full_bit_us,
            half_bit_us,
        }
    }

    /// Time the receiver spends in delays for one frame
    ///
    /// Half-bit delay, one full-bit delay per data bit, and one per stop
    /// bit. Pin sampling overhead is not included.
    pub fn frame_delay_us(&self, stop_bits: u8) -> u32 {
        self.half_bit_us + self.full_bit_us * (8 + stop_bits as u32)
    }

    /// Baud rate these delays were calibrated for, if any
    pub fn baud_rate(&self) -> Option<BaudRate> {
        [BaudRate::B4800, BaudRate::B9600]
            .into_iter()
            .find(|baud| baud.timing() == *self)
    }
}

impl Default for BitTiming {
    fn default() -> Self {
        Self::BAUD_9600
    }
}
