//! Bit-banged serial receiver
//!
//! Samples one input pin and busy-waits fixed delays to reconstruct
//! asynchronous serial frames:
//!
//! ```text
//!  idle ─┐     ┌──┬──┬──┬──┬──┬──┬──┬──┐┌─────── idle
//!        │START│D0│D1│D2│D3│D4│D5│D6│D7││STOP
//!        └─────┴──┴──┴──┴──┴──┴──┴──┴──┘
//!        ^ edge seen while polling
//!          + half bit, then one full bit per sample
//! ```
//!
//! There is no resynchronisation inside a frame. If the delays do not
//! match the transmitter's bit period, bytes are silently corrupted.

use sonde_hal::uart::StopBits;
use sonde_hal::{BusyWait, DebugSink, InputPin};

use super::buffer::{BufferError, SondeBuffer, DEFAULT_CAPACITY};
use super::timing::{BaudRate, BitTiming};

/// Data bits per frame
pub const DATA_BITS: u8 = 8;

/// Status line reported once per receive loop iteration
pub const STATUS_LINE: &str = "loop is running";

/// Errors that can occur during reception
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RxError {
    /// Buffer is at capacity; reception halts until it is cleared
    BufferFull,
    /// Stop bit sampled LOW; the assembled byte was discarded
    Framing {
        /// Byte assembled from the data bits
        byte: u8,
    },
}

impl From<BufferError> for RxError {
    fn from(e: BufferError) -> Self {
        match e {
            BufferError::Full => RxError::BufferFull,
        }
    }
}

/// Receiver states
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RxState {
    /// Polling for a start bit
    Idle,
    /// Reading data bits
    Sampling {
        /// Next bit position (0 = LSB)
        bit: u8,
        /// Bits assembled so far
        acc: u8,
    },
    /// Data complete, consuming the stop bit(s)
    StopWait {
        /// Assembled byte
        byte: u8,
    },
}

/// Receiver configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RxConfig {
    /// Busy-wait delays
    pub timing: BitTiming,
    /// Stop bits sent by the transmitter
    pub stop_bits: StopBits,
    /// Report `Framing` when the stop bit reads LOW
    pub check_stop_bit: bool,
    /// Delay between idle samples (0 = poll as fast as possible)
    pub idle_poll_us: u32,
}

impl RxConfig {
    /// Configuration using the calibrated delays for `baud`
    pub fn for_baud(baud: BaudRate) -> Self {
        Self {
            timing: baud.timing(),
            ..Self::default()
        }
    }
}

impl Default for RxConfig {
    fn default() -> Self {
        Self {
            timing: BitTiming::BAUD_9600,
            stop_bits: StopBits::One,
            check_stop_bit: true,
            idle_poll_us: 0,
        }
    }
}

/// Reception counters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RxStats {
    /// Frames decoded and stored
    pub frames: u32,
    /// Frames dropped for a LOW stop bit
    pub framing_errors: u32,
    /// Receive attempts refused because the buffer was full
    pub overflows: u32,
}

/// Bit-banged serial receiver
///
/// Owns the input pin, the timing source and the byte buffer. `N` is the
/// buffer capacity.
pub struct BitBangReceiver<P, D, const N: usize = DEFAULT_CAPACITY> {
    pin: P,
    delay: D,
    config: RxConfig,
    buffer: SondeBuffer<N>,
    state: RxState,
    /// Line has been seen idle (HIGH) since the last frame
    seen_idle: bool,
    stats: RxStats,
}

impl<P: InputPin, D: BusyWait, const N: usize> BitBangReceiver<P, D, N> {
    /// Create a receiver with an empty buffer
    pub fn new(pin: P, delay: D, config: RxConfig) -> Self {
        Self {
            pin,
            delay,
            config,
            buffer: SondeBuffer::new(),
            state: RxState::Idle,
            seen_idle: false,
            stats: RxStats::default(),
        }
    }

    /// Advance the state machine by one transition
    ///
    /// In `Idle` this takes one pin sample. In the other states it waits
    /// one delay and samples once. Returns the byte when a frame has been
    /// stored.
    pub fn step(&mut self) -> Result<Option<u8>, RxError> {
        let full_bit_us = self.config.timing.full_bit_us;

        match self.state {
            RxState::Idle => {
                if self.buffer.is_full() {
                    self.stats.overflows = self.stats.overflows.saturating_add(1);
                    return Err(RxError::BufferFull);
                }

                if self.config.idle_poll_us > 0 {
                    self.delay.wait_us(self.config.idle_poll_us);
                }

                if self.pin.is_high() {
                    self.seen_idle = true;
                    return Ok(None);
                }

                // LOW without a preceding HIGH is the tail of something we
                // did not see start
                if !self.seen_idle {
                    return Ok(None);
                }

                self.seen_idle = false;
                self.delay.wait_us(self.config.timing.half_bit_us);
                self.state = RxState::Sampling { bit: 0, acc: 0 };
                Ok(None)
            }
            RxState::Sampling { bit, acc } => {
                self.delay.wait_us(full_bit_us);
                let acc = acc | ((self.pin.is_high() as u8) << bit);

                self.state = if bit + 1 == DATA_BITS {
                    RxState::StopWait { byte: acc }
                } else {
                    RxState::Sampling { bit: bit + 1, acc }
                };
                Ok(None)
            }
            RxState::StopWait { byte } => {
                self.delay.wait_us(full_bit_us);
                let stop_high = self.pin.is_high();
                self.state = RxState::Idle;
                self.seen_idle = stop_high;

                if self.config.check_stop_bit && !stop_high {
                    self.stats.framing_errors = self.stats.framing_errors.saturating_add(1);
                    #[cfg(feature = "defmt")]
                    defmt::debug!("Stop bit LOW after {=u8:#x}", byte);
                    return Err(RxError::Framing { byte });
                }

                if self.config.stop_bits == StopBits::Two {
                    self.delay.wait_us(full_bit_us);
                }

                if let Err(e) = self.buffer.try_push(byte) {
                    self.stats.overflows = self.stats.overflows.saturating_add(1);
                    return Err(e.into());
                }
                self.stats.frames = self.stats.frames.saturating_add(1);

                #[cfg(feature = "defmt")]
                defmt::trace!("RX {=u8:#x} ({} stored)", byte, self.buffer.len());
                Ok(Some(byte))
            }
        }
    }

    /// Step until a byte is stored, an error occurs, or `max_idle_polls`
    /// idle samples pass without a start bit
    ///
    /// Returns `Ok(None)` when the poll budget runs out. A frame that has
    /// started is always finished, whatever the budget.
    pub fn poll(&mut self, max_idle_polls: u32) -> Result<Option<u8>, RxError> {
        let mut idle_polls = 0u32;
        loop {
            let was_idle = self.state == RxState::Idle;
            if let Some(byte) = self.step()? {
                return Ok(Some(byte));
            }
            if was_idle && self.state == RxState::Idle {
                idle_polls += 1;
                if idle_polls >= max_idle_polls {
                    return Ok(None);
                }
            }
        }
    }

    /// Block until one frame has been stored or has failed
    pub fn receive(&mut self) -> Result<u8, RxError> {
        loop {
            if let Some(byte) = self.step()? {
                return Ok(byte);
            }
        }
    }

    /// One iteration of the receive loop
    ///
    /// Receives one frame, then reports [`STATUS_LINE`] to `sink`. The
    /// report comes after the frame so sink latency never lands between
    /// bit samples.
    pub fn run_iteration<S: DebugSink>(&mut self, sink: &mut S) -> Result<u8, RxError> {
        let result = self.receive();
        sink.write_line(STATUS_LINE);
        result
    }

    /// Clear the buffer, counters and state
    pub fn reset(&mut self) {
        self.buffer.clear();
        self.state = RxState::Idle;
        self.seen_idle = false;
        self.stats = RxStats::default();
    }

    /// Discard stored bytes, keeping counters
    pub fn clear_buffer(&mut self) {
        self.buffer.clear();
    }

    /// Decoded bytes
    pub fn buffer(&self) -> &SondeBuffer<N> {
        &self.buffer
    }

    /// Number of decoded bytes stored
    pub fn count(&self) -> usize {
        self.buffer.len()
    }

    /// Check if the buffer is at capacity
    pub fn is_full(&self) -> bool {
        self.buffer.is_full()
    }

    /// Current state
    pub fn state(&self) -> RxState {
        self.state
    }

    /// Reception counters
    pub fn stats(&self) -> RxStats {
        self.stats
    }

    /// Active configuration
    pub fn config(&self) -> &RxConfig {
        &self.config
    }

    /// Give back the pin and timing source
    pub fn release(self) -> (P, D) {
        (self.pin, self.delay)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::{LineScript, SimClock, SimDelay, SimPin};
    use proptest::prelude::*;

    const BIT_9600: u32 = 84;

    fn receiver<'a, const N: usize>(
        clock: &'a SimClock,
        script: &'a LineScript,
        config: RxConfig,
    ) -> BitBangReceiver<SimPin<'a>, SimDelay<'a>, N> {
        BitBangReceiver::new(SimPin::new(clock, script), SimDelay::new(clock), config)
    }

    fn script_of(bytes: &[u8], bit_us: u32, stop_bits: StopBits) -> LineScript {
        let mut script = LineScript::new();
        script.idle(200).unwrap();
        script.frames(bytes, bit_us, stop_bits).unwrap();
        script
    }

    /// Mock sink counting lines
    struct CountingSink {
        lines: u32,
        last_was_status: bool,
    }

    impl DebugSink for CountingSink {
        fn write_line(&mut self, line: &str) {
            self.lines += 1;
            self.last_was_status = line == STATUS_LINE;
        }
    }

    #[test]
    fn test_decodes_single_frame() {
        let clock = SimClock::new();
        let script = script_of(&[0x41], BIT_9600, StopBits::One);
        let mut rx = receiver::<16>(&clock, &script, RxConfig::default());

        assert_eq!(rx.poll(1000), Ok(Some(0x41)));
        assert_eq!(rx.buffer().as_slice(), &[0x41]);
        assert_eq!(rx.count(), 1);
        assert_eq!(rx.state(), RxState::Idle);
        assert_eq!(rx.stats().frames, 1);
    }

    #[test]
    fn test_back_to_back_frames_in_order() {
        let clock = SimClock::new();
        let script = script_of(&[0x41, 0x7E], BIT_9600, StopBits::One);
        let mut rx = receiver::<16>(&clock, &script, RxConfig::default());

        assert_eq!(rx.poll(1000), Ok(Some(0x41)));
        assert_eq!(rx.poll(1000), Ok(Some(0x7E)));
        assert_eq!(rx.poll(1000), Ok(None));
        assert_eq!(rx.buffer().as_slice(), &[0x41, 0x7E]);
    }

    #[test]
    fn test_two_stop_bits() {
        let clock = SimClock::new();
        let script = script_of(b"$GP", BIT_9600, StopBits::Two);
        let config = RxConfig {
            stop_bits: StopBits::Two,
            ..RxConfig::default()
        };
        let mut rx = receiver::<16>(&clock, &script, config);

        for _ in 0..3 {
            assert!(rx.poll(1000).unwrap().is_some());
        }
        assert_eq!(rx.buffer().as_slice(), b"$GP");
    }

    #[test]
    fn test_second_stop_bit_waits_full_bit() {
        let script = script_of(&[0x41], BIT_9600, StopBits::Two);

        let one_clock = SimClock::new();
        let mut one = receiver::<16>(&one_clock, &script, RxConfig::default());
        assert_eq!(one.poll(1000), Ok(Some(0x41)));

        let two_clock = SimClock::new();
        let config = RxConfig {
            stop_bits: StopBits::Two,
            ..RxConfig::default()
        };
        let mut two = receiver::<16>(&two_clock, &script, config);
        assert_eq!(two.poll(1000), Ok(Some(0x41)));

        // Same samples taken, one extra full-bit delay after the stop bit
        let (one_pin, _) = one.release();
        let (two_pin, _) = two.release();
        assert_eq!(one_pin.samples(), two_pin.samples());
        assert_eq!(two_clock.now_us() - one_clock.now_us(), BIT_9600 as u64);
    }

    #[test]
    fn test_4800_baud() {
        let clock = SimClock::new();
        let script = script_of(&[0xA5], 188, StopBits::One);
        let mut rx = receiver::<16>(&clock, &script, RxConfig::for_baud(BaudRate::B4800));

        assert_eq!(rx.poll(1000), Ok(Some(0xA5)));
    }

    #[test]
    fn test_reset_decodes_identically() {
        let clock = SimClock::new();
        let script = script_of(b"sonde", BIT_9600, StopBits::One);
        let mut rx = receiver::<16>(&clock, &script, RxConfig::default());

        while rx.poll(1000).unwrap().is_some() {}
        let mut first = [0u8; 16];
        let len = rx.count();
        first[..len].copy_from_slice(rx.buffer().as_slice());

        rx.reset();
        clock.reset();
        assert_eq!(rx.count(), 0);
        assert_eq!(rx.stats(), RxStats::default());

        while rx.poll(1000).unwrap().is_some() {}
        assert_eq!(rx.buffer().as_slice(), &first[..len]);
        assert_eq!(rx.buffer().as_slice(), b"sonde");
    }

    #[test]
    fn test_full_buffer_refuses_next_frame() {
        let clock = SimClock::new();
        let script = script_of(&[0x01, 0x02], BIT_9600, StopBits::One);
        let mut rx = receiver::<1>(&clock, &script, RxConfig::default());

        assert_eq!(rx.poll(1000), Ok(Some(0x01)));
        assert!(rx.is_full());

        assert_eq!(rx.poll(1000), Err(RxError::BufferFull));
        assert_eq!(rx.count(), 1);
        assert_eq!(rx.buffer().as_slice(), &[0x01]);
        assert_eq!(rx.stats().overflows, 1);
    }

    #[test]
    fn test_clear_buffer_resumes_reception() {
        let clock = SimClock::new();
        let mut script = LineScript::new();
        script.idle(200).unwrap();
        script.frame(0x10, BIT_9600, StopBits::One).unwrap();
        script.idle(2000).unwrap();
        script.frame(0x20, BIT_9600, StopBits::One).unwrap();
        let mut rx = receiver::<1>(&clock, &script, RxConfig::default());

        assert_eq!(rx.poll(1000), Ok(Some(0x10)));
        assert_eq!(rx.poll(1000), Err(RxError::BufferFull));

        rx.clear_buffer();
        assert_eq!(rx.poll(5000), Ok(Some(0x20)));
        assert_eq!(rx.stats().frames, 2);
    }

    #[test]
    fn test_late_start_sample_corrupts_byte() {
        // Sampling starts an extra 1.5 half-bits late, so every sample
        // lands one bit further on and the stop bit shifts into bit 7
        let clock = SimClock::new();
        let script = script_of(&[0x41], BIT_9600, StopBits::One);
        let config = RxConfig {
            timing: BitTiming::new(84, 42 + 63),
            ..RxConfig::default()
        };
        let mut rx = receiver::<16>(&clock, &script, config);

        let byte = rx.poll(1000).unwrap().unwrap();
        assert_ne!(byte, 0x41);
        assert_eq!(byte, 0xA0);
    }

    #[test]
    fn test_nominal_bit_period_drifts() {
        // The calibrated delays assume per-sample overhead; a transmitter
        // at the nominal 104 µs period drifts out of alignment by bit 2
        let clock = SimClock::new();
        let script = script_of(&[0x41], 104, StopBits::One);
        let mut rx = receiver::<16>(&clock, &script, RxConfig::default());

        let byte = rx.poll(1000).unwrap().unwrap();
        assert_ne!(byte, 0x41);
    }

    #[test]
    fn test_low_stop_bit_is_framing_error() {
        let clock = SimClock::new();
        let mut script = LineScript::new();
        script.idle(200).unwrap();
        script.level(false, BIT_9600).unwrap(); // start
        for bit in 0..8 {
            script.level(0x41 & (1 << bit) != 0, BIT_9600).unwrap();
        }
        script.level(false, BIT_9600).unwrap(); // broken stop bit
        let mut rx = receiver::<16>(&clock, &script, RxConfig::default());

        assert_eq!(rx.poll(1000), Err(RxError::Framing { byte: 0x41 }));
        assert_eq!(rx.count(), 0);
        assert_eq!(rx.stats().framing_errors, 1);
        assert_eq!(rx.state(), RxState::Idle);
    }

    #[test]
    fn test_unchecked_stop_bit_stores_byte() {
        let clock = SimClock::new();
        let mut script = LineScript::new();
        script.idle(200).unwrap();
        script.level(false, BIT_9600).unwrap();
        for bit in 0..8 {
            script.level(0x41 & (1 << bit) != 0, BIT_9600).unwrap();
        }
        script.level(false, BIT_9600).unwrap();
        let config = RxConfig {
            check_stop_bit: false,
            ..RxConfig::default()
        };
        let mut rx = receiver::<16>(&clock, &script, config);

        assert_eq!(rx.poll(1000), Ok(Some(0x41)));
    }

    #[test]
    fn test_low_line_at_power_on_is_ignored() {
        let clock = SimClock::new();
        let mut script = LineScript::new();
        script.level(false, 300).unwrap();
        let mut rx = receiver::<16>(&clock, &script, RxConfig::default());

        // Never saw the line idle, so the LOW is not a start bit
        assert_eq!(rx.poll(100), Ok(None));
        assert_eq!(rx.state(), RxState::Idle);
    }

    #[test]
    fn test_frame_after_low_power_on() {
        let clock = SimClock::new();
        let mut script = LineScript::new();
        script.level(false, 300).unwrap();
        script.idle(200).unwrap();
        script.frame(0x55, BIT_9600, StopBits::One).unwrap();
        let mut rx = receiver::<16>(&clock, &script, RxConfig::default());

        assert_eq!(rx.poll(1000), Ok(Some(0x55)));
    }

    #[test]
    fn test_state_progression() {
        let clock = SimClock::new();
        let mut script = LineScript::new();
        script.idle(1).unwrap();
        script.frame(0xFF, BIT_9600, StopBits::One).unwrap();
        let mut rx = receiver::<16>(&clock, &script, RxConfig::default());

        assert_eq!(rx.step(), Ok(None)); // idle HIGH
        assert_eq!(rx.step(), Ok(None)); // start edge
        assert_eq!(rx.state(), RxState::Sampling { bit: 0, acc: 0 });

        for _ in 0..8 {
            assert_eq!(rx.step(), Ok(None));
        }
        assert_eq!(rx.state(), RxState::StopWait { byte: 0xFF });
        assert_eq!(rx.step(), Ok(Some(0xFF)));
        assert_eq!(rx.state(), RxState::Idle);
    }

    #[test]
    fn test_idle_poll_interval() {
        let clock = SimClock::new();
        let script = script_of(&[0x33], BIT_9600, StopBits::One);
        let config = RxConfig {
            idle_poll_us: 5,
            ..RxConfig::default()
        };
        let mut rx = receiver::<16>(&clock, &script, config);

        assert_eq!(rx.poll(1000), Ok(Some(0x33)));
    }

    #[test]
    fn test_run_iteration_reports_status() {
        let clock = SimClock::new();
        let script = script_of(&[0x41], BIT_9600, StopBits::One);
        let mut rx = receiver::<16>(&clock, &script, RxConfig::default());
        let mut sink = CountingSink {
            lines: 0,
            last_was_status: false,
        };

        assert_eq!(rx.run_iteration(&mut sink), Ok(0x41));
        assert_eq!(sink.lines, 1);
        assert!(sink.last_was_status);
    }

    #[test]
    fn test_run_iteration_reports_on_error() {
        let clock = SimClock::new();
        let script = script_of(&[0x41], BIT_9600, StopBits::One);
        let mut rx = receiver::<0>(&clock, &script, RxConfig::default());
        let mut sink = CountingSink {
            lines: 0,
            last_was_status: false,
        };

        assert_eq!(rx.run_iteration(&mut sink), Err(RxError::BufferFull));
        assert_eq!(sink.lines, 1);
    }

    #[test]
    fn test_release_returns_parts() {
        let clock = SimClock::new();
        let script = script_of(&[0x41], BIT_9600, StopBits::One);
        let mut rx = receiver::<16>(&clock, &script, RxConfig::default());
        rx.poll(1000).unwrap();

        let (pin, _delay) = rx.release();
        assert!(pin.samples() > 200);
    }

    proptest! {
        #[test]
        fn prop_any_byte_decodes(byte in any::<u8>(), slow in any::<bool>()) {
            let (baud, bit_us) = if slow {
                (BaudRate::B4800, 188)
            } else {
                (BaudRate::B9600, BIT_9600)
            };
            let clock = SimClock::new();
            let script = script_of(&[byte], bit_us, StopBits::One);
            let mut rx = receiver::<4>(&clock, &script, RxConfig::for_baud(baud));

            prop_assert_eq!(rx.poll(1000), Ok(Some(byte)));
            prop_assert_eq!(rx.count(), 1);
        }
    }
}
