/*
    Copyright (C) 2024  CBMHOST contributors

    This file is part of CBMHOST, a Rust library for connecting emulated
    Commodore 8-bit computers to host keyboards and terminals.

    For the full copyright notice, see the lib.rs file.
*/
use core::fmt;

#[cfg(feature = "snapshot")]
use serde::{Serialize, Deserialize};

/// The capacity of the [KeystrokeBuffer].
pub const KEYSTROKE_BUFFER_SIZE: usize = 256;

/// A fixed capacity FIFO queue of the keystrokes waiting to be read by the emulated machine.
///
/// The bytes offered when the queue is full are dropped, so the earliest queued keystrokes
/// are always preserved.
///
/// With the `snapshot` feature the buffer serializes as a sequence of the queued bytes.
#[derive(Clone)]
#[cfg_attr(feature = "snapshot", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "snapshot", serde(from = "Vec<u8>", into = "Vec<u8>"))]
pub struct KeystrokeBuffer {
    data: [u8; KEYSTROKE_BUFFER_SIZE],
    head: usize,
    len: usize,
}

impl Default for KeystrokeBuffer {
    fn default() -> Self {
        KeystrokeBuffer { data: [0; KEYSTROKE_BUFFER_SIZE], head: 0, len: 0 }
    }
}

impl fmt::Debug for KeystrokeBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl KeystrokeBuffer {
    /// Returns the number of the queued bytes.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
    #[inline]
    pub fn is_full(&self) -> bool {
        self.len == KEYSTROKE_BUFFER_SIZE
    }
    /// Returns the number of bytes that can be queued before the buffer is full.
    #[inline]
    pub fn remaining(&self) -> usize {
        KEYSTROKE_BUFFER_SIZE - self.len
    }
    /// Appends a byte to the queue.
    ///
    /// Returns `false` if the queue is full and the byte was dropped.
    pub fn push(&mut self, byte: u8) -> bool {
        if self.is_full() {
            return false
        }
        let tail = (self.head + self.len) % KEYSTROKE_BUFFER_SIZE;
        self.data[tail] = byte;
        self.len += 1;
        true
    }
    /// Appends as many bytes from `bytes` as would fit.
    ///
    /// Returns the number of bytes appended. The remaining bytes are dropped.
    pub fn push_slice(&mut self, bytes: &[u8]) -> usize {
        let count = bytes.len().min(self.remaining());
        for &byte in &bytes[..count] {
            self.push(byte);
        }
        count
    }
    /// Removes and returns the earliest queued byte.
    pub fn pop(&mut self) -> Option<u8> {
        if self.is_empty() {
            return None
        }
        let byte = self.data[self.head];
        self.head = (self.head + 1) % KEYSTROKE_BUFFER_SIZE;
        self.len -= 1;
        Some(byte)
    }
    /// Drops all of the queued bytes.
    pub fn clear(&mut self) {
        self.head = 0;
        self.len = 0;
    }
    /// Returns an iterator over the queued bytes from the earliest one.
    pub fn iter(&self) -> impl Iterator<Item=u8> + '_ {
        (0..self.len).map(move |i| self.data[(self.head + i) % KEYSTROKE_BUFFER_SIZE])
    }
}

impl From<Vec<u8>> for KeystrokeBuffer {
    fn from(bytes: Vec<u8>) -> Self {
        let mut buffer = KeystrokeBuffer::default();
        buffer.push_slice(&bytes);
        buffer
    }
}

impl From<KeystrokeBuffer> for Vec<u8> {
    fn from(buffer: KeystrokeBuffer) -> Self {
        buffer.iter().collect()
    }
}

impl Extend<u8> for KeystrokeBuffer {
    fn extend<I: IntoIterator<Item=u8>>(&mut self, iter: I) {
        for byte in iter {
            if !self.push(byte) {
                break
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fifo_order() {
        let mut buffer = KeystrokeBuffer::default();
        assert!(buffer.is_empty());
        assert_eq!(buffer.pop(), None);
        assert_eq!(buffer.push_slice(b"RUN\r"), 4);
        assert_eq!(buffer.len(), 4);
        assert_eq!(buffer.pop(), Some(b'R'));
        assert!(buffer.push(b'!'));
        assert_eq!(buffer.iter().collect::<Vec<_>>(), b"UN\r!");
        assert_eq!(format!("{:?}", buffer), "[85, 78, 13, 33]");
        buffer.clear();
        assert!(buffer.is_empty());
        assert_eq!(buffer.pop(), None);
    }

    #[test]
    fn overflow_keeps_the_earliest_bytes() {
        let mut buffer = KeystrokeBuffer::default();
        let data: Vec<u8> = (0..=255u8).collect();
        assert_eq!(buffer.push_slice(&data[..200]), 200);
        assert_eq!(buffer.push_slice(&data), 56);
        assert!(buffer.is_full());
        assert_eq!(buffer.remaining(), 0);
        assert!(!buffer.push(b'X'));
        assert_eq!(buffer.push_slice(b"more"), 0);
        let drained: Vec<u8> = core::iter::from_fn(|| buffer.pop()).collect();
        assert_eq!(drained.len(), KEYSTROKE_BUFFER_SIZE);
        assert_eq!(&drained[..200], &data[..200]);
        assert_eq!(&drained[200..], &data[..56]);
    }

    #[test]
    fn wraps_around() {
        let mut buffer = KeystrokeBuffer::default();
        for round in 0..1000usize {
            let byte = round as u8;
            buffer.push_slice(&[byte, byte.wrapping_add(1), byte.wrapping_add(2)]);
            assert_eq!(buffer.pop(), Some(byte));
            assert_eq!(buffer.pop(), Some(byte.wrapping_add(1)));
            assert_eq!(buffer.pop(), Some(byte.wrapping_add(2)));
            assert!(buffer.is_empty());
        }
        buffer.extend(0..=255u8);
        buffer.extend(b"dropped".iter().copied());
        assert!(buffer.is_full());
        assert_eq!(buffer.iter().last(), Some(255));
    }

    #[cfg(feature = "snapshot")]
    #[test]
    fn buffer_serde() {
        let mut buffer = KeystrokeBuffer::default();
        buffer.push_slice(b"xLIST\r");
        buffer.pop();
        let json = serde_json::to_string(&buffer).unwrap();
        assert_eq!(json, "[76,73,83,84,13]");
        let buffer: KeystrokeBuffer = serde_json::from_str(&json).unwrap();
        assert_eq!(Vec::from(buffer), b"LIST\r");
    }
}
