//! Scripted line simulation
//!
//! A [`SimPin`] and a [`SimDelay`] share one virtual microsecond clock.
//! Delays advance the clock; each pin sample reads the scripted level at
//! the current time and then advances the clock by the sample cost, the
//! way a real `digitalRead` takes a few cycles.
//!
//! The script starts at t = 0 with its first segment and the line idles
//! HIGH once the script is exhausted.

use core::cell::Cell;

use heapless::Vec;
use sonde_hal::uart::StopBits;
use sonde_hal::{BusyWait, InputPin};

/// Maximum number of level segments in a script
pub const MAX_SEGMENTS: usize = 512;

/// Script has no room for more segments
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ScriptFull;

/// Constant line level for a duration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Segment {
    pub high: bool,
    pub duration_us: u32,
}

/// Virtual microsecond clock
#[derive(Debug, Default)]
pub struct SimClock {
    now_us: Cell<u64>,
}

impl SimClock {
    /// Create a clock at t = 0
    pub fn new() -> Self {
        Self::default()
    }

    /// Current time
    pub fn now_us(&self) -> u64 {
        self.now_us.get()
    }

    /// Move time forward
    pub fn advance(&self, us: u32) {
        self.now_us.set(self.now_us.get() + us as u64);
    }

    /// Rewind to t = 0
    pub fn reset(&self) {
        self.now_us.set(0);
    }
}

/// Level-over-time description of a serial line
#[derive(Debug, Clone, Default)]
pub struct LineScript {
    segments: Vec<Segment, MAX_SEGMENTS>,
}

impl LineScript {
    /// Create an empty script (line idles HIGH forever)
    pub fn new() -> Self {
        Self::default()
    }

    /// Hold the line at `high` for `duration_us`
    ///
    /// Adjacent segments of the same level are merged.
    pub fn level(&mut self, high: bool, duration_us: u32) -> Result<&mut Self, ScriptFull> {
        let merge = matches!(self.segments.last(), Some(last) if last.high == high);
        if merge {
            if let Some(last) = self.segments.last_mut() {
                last.duration_us += duration_us;
            }
        } else {
            self.segments
                .push(Segment { high, duration_us })
                .map_err(|_| ScriptFull)?;
        }
        Ok(self)
    }

    /// Hold the line idle (HIGH)
    pub fn idle(&mut self, duration_us: u32) -> Result<&mut Self, ScriptFull> {
        self.level(true, duration_us)
    }

    /// Transmit one 8-bit frame, LSB first, with a bit period of `bit_us`
    pub fn frame(
        &mut self,
        byte: u8,
        bit_us: u32,
        stop_bits: StopBits,
    ) -> Result<&mut Self, ScriptFull> {
        self.level(false, bit_us)?;
        for bit in 0..8 {
            self.level(byte & (1 << bit) != 0, bit_us)?;
        }
        self.level(true, bit_us * stop_bits.count() as u32)
    }

    /// Transmit frames back to back
    pub fn frames(
        &mut self,
        bytes: &[u8],
        bit_us: u32,
        stop_bits: StopBits,
    ) -> Result<&mut Self, ScriptFull> {
        for &byte in bytes {
            self.frame(byte, bit_us, stop_bits)?;
        }
        Ok(self)
    }

    /// Total scripted duration
    pub fn duration_us(&self) -> u64 {
        self.segments.iter().map(|s| s.duration_us as u64).sum()
    }

    /// Line level at time `t_us`
    pub fn level_at(&self, t_us: u64) -> bool {
        let mut start = 0u64;
        for segment in &self.segments {
            let end = start + segment.duration_us as u64;
            if t_us < end {
                return segment.high;
            }
            start = end;
        }
        true
    }
}

/// Simulated input pin reading a [`LineScript`]
pub struct SimPin<'a> {
    clock: &'a SimClock,
    script: &'a LineScript,
    sample_cost_us: u32,
    samples: u32,
}

impl<'a> SimPin<'a> {
    /// Default time consumed by one sample
    pub const DEFAULT_SAMPLE_COST_US: u32 = 1;

    /// Create a pin with the default sample cost
    pub fn new(clock: &'a SimClock, script: &'a LineScript) -> Self {
        Self::with_sample_cost(clock, script, Self::DEFAULT_SAMPLE_COST_US)
    }

    /// Create a pin whose samples each take `sample_cost_us`
    pub fn with_sample_cost(clock: &'a SimClock, script: &'a LineScript, sample_cost_us: u32) -> Self {
        Self {
            clock,
            script,
            sample_cost_us,
            samples: 0,
        }
    }

    /// Number of samples taken
    pub fn samples(&self) -> u32 {
        self.samples
    }
}

impl InputPin for SimPin<'_> {
    fn is_high(&mut self) -> bool {
        let level = self.script.level_at(self.clock.now_us());
        self.clock.advance(self.sample_cost_us);
        self.samples += 1;
        level
    }
}

/// Simulated busy-wait advancing a [`SimClock`]
pub struct SimDelay<'a> {
    clock: &'a SimClock,
}

impl<'a> SimDelay<'a> {
    pub fn new(clock: &'a SimClock) -> Self {
        Self { clock }
    }
}

impl BusyWait for SimDelay<'_> {
    fn wait_us(&mut self, us: u32) {
        self.clock.advance(us);
    }
}
