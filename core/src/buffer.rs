/*
 * buffer.rs
 * Copyright (C) 2026 Chris Burdess
 *
 * This file is part of Tagliacarte, a cross-platform email client.
 *
 * Tagliacarte is free software: you can redistribute it and/or modify
 * it under the terms of the GNU General Public License as published by
 * the Free Software Foundation, either version 3 of the License, or
 * (at your option) any later version.
 *
 * Tagliacarte is distributed in the hope that it will be useful,
 * but WITHOUT ANY WARRANTY; without even the implied warranty of
 * MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
 * GNU General Public License for more details.
 *
 * You should have received a copy of the GNU General Public License
 * along with Tagliacarte.  If not, see <http://www.gnu.org/licenses/>.
 */

//! Growable read buffer with an explicit doubling-and-compaction policy.
//!
//! Deliberately not `bytes::BytesMut`: the contract here is the one called out
//! in the request parser's design notes — fixed starting capacity, double on
//! fill, and a compaction step (memmove of the unconsumed suffix to offset 0)
//! that runs between parse passes rather than on every `advance`.

const INITIAL_CAPACITY: usize = 8;

/// Heap-backed byte buffer: `buf[..read_to]` holds bytes read from the source
/// but not yet consumed by the parser.
pub struct GrowableBuffer {
    buf: Vec<u8>,
    read_to: usize,
}

impl GrowableBuffer {
    pub fn new() -> Self {
        Self::with_capacity(INITIAL_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            buf: vec![0u8; capacity],
            read_to: 0,
        }
    }

    /// Bytes available to the parser right now.
    pub fn filled(&self) -> &[u8] {
        &self.buf[..self.read_to]
    }

    pub fn capacity(&self) -> usize {
        self.buf.len()
    }

    pub fn read_to(&self) -> usize {
        self.read_to
    }

    /// Double capacity if the buffer is full. Call before reading into the tail.
    pub fn grow_if_full(&mut self) {
        if self.read_to == self.buf.len() {
            let new_capacity = self.buf.len() * 2;
            self.buf.resize(new_capacity, 0);
        }
    }

    /// The writable tail past `read_to`, for the caller to read into.
    pub fn tail_mut(&mut self) -> &mut [u8] {
        &mut self.buf[self.read_to..]
    }

    /// Record that `n` bytes were written into the tail returned by `tail_mut`.
    pub fn advance_read_to(&mut self, n: usize) {
        self.read_to += n;
        debug_assert!(self.read_to <= self.buf.len());
    }

    /// Drop the first `consumed` bytes, shifting the remaining `read_to -
    /// consumed` bytes down to offset 0.
    pub fn compact(&mut self, consumed: usize) {
        debug_assert!(consumed <= self.read_to);
        if consumed == 0 {
            return;
        }
        self.buf.copy_within(consumed..self.read_to, 0);
        self.read_to -= consumed;
    }
}

impl Default for GrowableBuffer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_at_initial_capacity() {
        let buf = GrowableBuffer::new();
        assert_eq!(buf.capacity(), INITIAL_CAPACITY);
        assert_eq!(buf.read_to(), 0);
    }

    #[test]
    fn doubles_only_when_full() {
        let mut buf = GrowableBuffer::with_capacity(4);
        buf.advance_read_to(3);
        buf.grow_if_full();
        assert_eq!(buf.capacity(), 4, "not full yet, should not grow");

        buf.advance_read_to(1); // now read_to == capacity == 4
        buf.grow_if_full();
        assert_eq!(buf.capacity(), 8);
    }

    #[test]
    fn compact_shifts_unconsumed_suffix_to_zero() {
        let mut buf = GrowableBuffer::with_capacity(8);
        buf.tail_mut()[..5].copy_from_slice(b"hello");
        buf.advance_read_to(5);
        buf.compact(2); // consume "he"
        assert_eq!(buf.read_to(), 3);
        assert_eq!(buf.filled(), b"llo");
    }

    #[test]
    fn compact_zero_is_a_no_op() {
        let mut buf = GrowableBuffer::with_capacity(8);
        buf.tail_mut()[..3].copy_from_slice(b"abc");
        buf.advance_read_to(3);
        buf.compact(0);
        assert_eq!(buf.filled(), b"abc");
    }

    #[test]
    fn repeated_growth_bounds_total_capacity() {
        let mut buf = GrowableBuffer::with_capacity(1);
        for _ in 0..10 {
            buf.grow_if_full();
            buf.advance_read_to(1);
            buf.compact(1);
        }
        // Every byte was consumed immediately, so capacity never needed to grow
        // past the seed.
        assert_eq!(buf.capacity(), 1);
    }
}
