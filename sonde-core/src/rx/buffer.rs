//! Decoded byte storage
//!
//! Append-only, fixed capacity. Writing past the end is refused rather
//! than performed.

use heapless::Vec;

/// Default buffer capacity in bytes
pub const DEFAULT_CAPACITY: usize = 9999;

/// Errors from buffer operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BufferError {
    /// Buffer holds `capacity` bytes already
    Full,
}

/// Ordered sequence of decoded sonde bytes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SondeBuffer<const N: usize = DEFAULT_CAPACITY> {
    bytes: Vec<u8, N>,
}

impl<const N: usize> Default for SondeBuffer<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> SondeBuffer<N> {
    /// Create an empty buffer
    pub const fn new() -> Self {
        Self { bytes: Vec::new() }
    }

    /// Append a byte
    ///
    /// Returns `BufferError::Full` and leaves the buffer untouched when
    /// there is no room.
    pub fn try_push(&mut self, byte: u8) -> Result<(), BufferError> {
        self.bytes.push(byte).map_err(|_| BufferError::Full)
    }

    /// Number of bytes stored
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Check if no bytes are stored
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Maximum number of bytes
    pub const fn capacity(&self) -> usize {
        N
    }

    /// Check if another push would fail
    pub fn is_full(&self) -> bool {
        self.bytes.is_full()
    }

    /// Free space in bytes
    pub fn remaining(&self) -> usize {
        N - self.bytes.len()
    }

    /// Stored bytes in arrival order
    pub fn as_slice(&self) -> &[u8] {
        &self.bytes
    }

    /// Most recently stored byte
    pub fn last(&self) -> Option<u8> {
        self.bytes.last().copied()
    }

    /// Iterate over stored bytes in arrival order
    pub fn iter(&self) -> impl Iterator<Item = u8> + '_ {
        self.bytes.iter().copied()
    }

    /// Discard all stored bytes
    pub fn clear(&mut self) {
        self.bytes.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_in_order() {
        let mut buf = SondeBuffer::<4>::new();
        buf.try_push(b'A').unwrap();
        buf.try_push(b'B').unwrap();
        assert_eq!(buf.as_slice(), b"AB");
        assert_eq!(buf.len(), 2);
        assert_eq!(buf.last(), Some(b'B'));
        assert_eq!(buf.remaining(), 2);
    }

    #[test]
    fn test_full_refuses_push() {
        let mut buf = SondeBuffer::<2>::new();
        buf.try_push(1).unwrap();
        buf.try_push(2).unwrap();
        assert!(buf.is_full());

        assert_eq!(buf.try_push(3), Err(BufferError::Full));
        assert_eq!(buf.as_slice(), &[1, 2]);
        assert_eq!(buf.len(), buf.capacity());
    }

    #[test]
    fn test_clear_makes_room() {
        let mut buf = SondeBuffer::<1>::new();
        buf.try_push(7).unwrap();
        buf.clear();
        assert!(buf.is_empty());
        assert!(buf.try_push(8).is_ok());
        assert_eq!(buf.iter().sum::<u8>(), 8);
    }

    #[test]
    fn test_default_capacity() {
        let buf: SondeBuffer = SondeBuffer::new();
        assert_eq!(buf.capacity(), 9999);
        assert_eq!(buf.last(), None);
    }
}
