#[cfg(feature = "alloc")]
use alloc::vec::Vec;

use core::cmp::min;

/// Byte store behind a [`Decoder`](crate::Decoder).
///
/// The crate ships a growable `Vec<u8>` (feature `alloc`) and a [`FixedBuffer`] for
/// targets without an allocator. A custom store must be able to hold at least one
/// telemetry packet (88 bytes), smaller ones make the decoder evict bytes forever.
pub trait UnderlyingBuffer:
    core::ops::Index<core::ops::Range<usize>, Output = [u8]> + core::ops::Index<usize, Output = u8>
{
    fn clear(&mut self);

    fn len(&self) -> usize;

    /// Upper bound on `len()`. Unbounded stores return `usize::MAX`.
    fn max_capacity(&self) -> usize;

    /// Append as much of `other` as fits, returning how many bytes were left out
    fn extend_from_slice(&mut self, other: &[u8]) -> usize;

    /// Discard the oldest `count` bytes, or everything if fewer are stored
    fn drain(&mut self, count: usize);

    /// Bytes that can still be appended before `extend_from_slice` starts refusing
    fn remaining_capacity(&self) -> usize {
        self.max_capacity().saturating_sub(self.len())
    }

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(feature = "alloc")]
impl UnderlyingBuffer for Vec<u8> {
    fn clear(&mut self) {
        self.clear();
    }

    fn len(&self) -> usize {
        self.len()
    }

    fn max_capacity(&self) -> usize {
        usize::MAX
    }

    fn extend_from_slice(&mut self, other: &[u8]) -> usize {
        self.extend_from_slice(other);
        0
    }

    fn drain(&mut self, count: usize) {
        let count = min(count, self.len());
        self.drain(0..count);
    }
}

/// Inline `[u8; N]` store for `no_std` decoders. `N` must be at least 88.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FixedBuffer<const N: usize> {
    buffer: [u8; N],
    len: usize,
}

impl<const N: usize> FixedBuffer<N> {
    pub const fn new() -> Self {
        Self {
            buffer: [0; N],
            len: 0,
        }
    }
}

impl<const N: usize> Default for FixedBuffer<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> core::ops::Index<core::ops::Range<usize>> for FixedBuffer<N> {
    type Output = [u8];

    fn index(&self, index: core::ops::Range<usize>) -> &Self::Output {
        assert!(
            index.end <= self.len,
            "range {index:?} reaches past the {} stored bytes",
            self.len
        );
        &self.buffer[index]
    }
}

impl<const N: usize> core::ops::Index<usize> for FixedBuffer<N> {
    type Output = u8;

    fn index(&self, index: usize) -> &Self::Output {
        assert!(index < self.len, "byte {index} is not stored, only {}", self.len);
        &self.buffer[index]
    }
}

impl<const N: usize> UnderlyingBuffer for FixedBuffer<N> {
    fn clear(&mut self) {
        self.len = 0;
    }

    fn len(&self) -> usize {
        self.len
    }

    fn max_capacity(&self) -> usize {
        N
    }

    fn extend_from_slice(&mut self, other: &[u8]) -> usize {
        let fits = min(other.len(), N - self.len);
        self.buffer[self.len..self.len + fits].copy_from_slice(&other[..fits]);
        self.len += fits;
        other.len() - fits
    }

    fn drain(&mut self, count: usize) {
        if count >= self.len {
            self.len = 0;
        } else {
            self.buffer.copy_within(count..self.len, 0);
            self.len -= count;
        }
    }
}
