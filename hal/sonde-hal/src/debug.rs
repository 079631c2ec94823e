//! Debug output channel
//!
//! A line-oriented text sink for status reports. The firmware backs it with
//! `defmt`.

/// Line-oriented text sink
pub trait DebugSink {
    /// Write one line of text (without a terminator)
    fn write_line(&mut self, line: &str);
}

impl<T: DebugSink + ?Sized> DebugSink for &mut T {
    fn write_line(&mut self, line: &str) {
        T::write_line(self, line)
    }
}

/// Discards everything
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl DebugSink for NullSink {
    fn write_line(&mut self, _line: &str) {}
}
