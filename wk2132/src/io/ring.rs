//! Fixed-capacity byte ring buffer.
//!
//! Caches bytes pulled from a hardware RX FIFO ahead of consumption. Each
//! channel owns one; there is no sharing, so plain indices are enough.

/// A single-owner circular byte queue.
///
/// The usable capacity is `N - 1`: one slot stays free so that
/// `head == tail` always means empty.
pub struct RingBuffer<const N: usize> {
    buffer: [u8; N],
    /// Next slot to write.
    head: usize,
    /// Next slot to read.
    tail: usize,
}

impl<const N: usize> RingBuffer<N> {
    /// Create a new empty buffer.
    ///
    /// # Panics
    ///
    /// Compile-time assertion: `N` must be at least 2 (usable capacity is `N - 1`).
    pub const fn new() -> Self {
        assert!(N >= 2, "ring buffer must have at least 2 slots (1 usable)");

        RingBuffer {
            buffer: [0; N],
            head: 0,
            tail: 0,
        }
    }

    /// Append a byte. Returns `Err(byte)` if the buffer is full.
    pub fn push(&mut self, byte: u8) -> Result<(), u8> {
        let next_head = (self.head + 1) % N;
        if next_head == self.tail {
            return Err(byte);
        }
        self.buffer[self.head] = byte;
        self.head = next_head;
        Ok(())
    }

    /// Remove the oldest byte.
    pub fn pop(&mut self) -> Option<u8> {
        if self.is_empty() {
            return None;
        }
        let byte = self.buffer[self.tail];
        self.tail = (self.tail + 1) % N;
        Some(byte)
    }

    /// Oldest byte without removing it.
    pub fn peek(&self) -> Option<u8> {
        if self.is_empty() {
            None
        } else {
            Some(self.buffer[self.tail])
        }
    }

    pub fn is_empty(&self) -> bool {
        self.head == self.tail
    }

    pub fn is_full(&self) -> bool {
        (self.head + 1) % N == self.tail
    }

    /// Number of buffered bytes.
    pub fn len(&self) -> usize {
        (N + self.head - self.tail) % N
    }

    /// Free slots left.
    pub fn free(&self) -> usize {
        Self::capacity() - self.len()
    }

    pub const fn capacity() -> usize {
        N - 1
    }

    /// Drop everything buffered.
    pub fn clear(&mut self) {
        self.tail = self.head;
    }
}

impl<const N: usize> Default for RingBuffer<N> {
    fn default() -> Self {
        Self::new()
    }
}
