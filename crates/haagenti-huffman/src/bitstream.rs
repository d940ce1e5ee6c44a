//! MSB-first bit packing and unpacking.
//!
//! Both sides agree on one bit order: the first code written occupies the
//! most significant bits of the first byte, and every code is emitted from
//! its most significant bit down. The final partial byte is padded with zero
//! bits in its low-order positions.

use haagenti_core::{Error, Result};

use crate::code::HuffmanCode;

/// Refill target for the reader: callers needing up to 32 bits find them
/// buffered after one `fill`.
const REFILL_THRESHOLD: u32 = 32;

/// Bit writer over a growable byte buffer.
#[derive(Debug, Default)]
pub struct BitWriter {
    data: Vec<u8>,
    bit_buf: u64,
    bit_count: u32,
}

impl BitWriter {
    /// Create a new bit writer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create with capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            data: Vec::with_capacity(capacity),
            bit_buf: 0,
            bit_count: 0,
        }
    }

    /// Create with capacity, reporting allocation failure instead of aborting.
    pub fn try_with_capacity(capacity: usize) -> Result<Self> {
        let mut data = Vec::new();
        data.try_reserve_exact(capacity)
            .map_err(|_| Error::allocation_failed(capacity))?;
        Ok(Self {
            data,
            bit_buf: 0,
            bit_count: 0,
        })
    }

    /// Append the low `n` bits of `value`, most significant first.
    ///
    /// `n` must be in 1..=32.
    #[inline]
    pub fn write_bits(&mut self, value: u32, n: u8) {
        debug_assert!((1..=32).contains(&n), "bit count {} out of range", n);
        let n = u32::from(n);
        let mask = (1u64 << n) - 1;

        // at most 7 bits are held between calls, so 39 bits never overflow
        self.bit_buf = (self.bit_buf << n) | (u64::from(value) & mask);
        self.bit_count += n;

        while self.bit_count >= 8 {
            self.bit_count -= 8;
            self.data.push((self.bit_buf >> self.bit_count) as u8);
        }
    }

    /// Append a Huffman code.
    #[inline]
    pub fn write_code(&mut self, code: HuffmanCode) {
        self.write_bits(code.code, code.num_bits);
    }

    /// Emit any partial byte, zero-padded in its low bits.
    pub fn flush(&mut self) {
        if self.bit_count > 0 {
            self.data.push((self.bit_buf << (8 - self.bit_count)) as u8);
            self.bit_buf = 0;
            self.bit_count = 0;
        }
    }

    /// Flush and return the packed bytes.
    pub fn finish(mut self) -> Vec<u8> {
        self.flush();
        self.data
    }

    /// Total bits written so far.
    pub fn bits_written(&self) -> u64 {
        self.data.len() as u64 * 8 + u64::from(self.bit_count)
    }

    /// Current length in bytes, counting a pending partial byte.
    pub fn len(&self) -> usize {
        self.data.len() + usize::from(self.bit_count > 0)
    }

    /// Check if empty.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty() && self.bit_count == 0
    }
}

/// Bit reader over a borrowed byte slice.
///
/// Valid bits are held left-aligned in a 64-bit buffer; `bit_count` says how
/// many of the top bits are real.
#[derive(Debug, Clone)]
pub struct BitReader<'a> {
    data: &'a [u8],
    pos: usize,
    bit_buf: u64,
    bit_count: u32,
}

impl<'a> BitReader<'a> {
    /// Create a new bit reader.
    pub fn new(data: &'a [u8]) -> Self {
        let mut reader = Self {
            data,
            pos: 0,
            bit_buf: 0,
            bit_count: 0,
        };
        reader.fill();
        reader
    }

    /// Pull whole bytes into the buffer, widest load first.
    ///
    /// No-op once the input is exhausted.
    pub fn fill(&mut self) {
        while self.bit_count <= 56 && self.pos < self.data.len() {
            let rest = &self.data[self.pos..];

            if self.bit_count == 0 && rest.len() >= 8 {
                let mut word = [0u8; 8];
                word.copy_from_slice(&rest[..8]);
                self.bit_buf = u64::from_be_bytes(word);
                self.bit_count = 64;
                self.pos += 8;
            } else if self.bit_count <= 32 && rest.len() >= 4 {
                let word = u32::from_be_bytes([rest[0], rest[1], rest[2], rest[3]]);
                self.bit_buf |= u64::from(word) << (32 - self.bit_count);
                self.bit_count += 32;
                self.pos += 4;
            } else if self.bit_count <= 48 && rest.len() >= 2 {
                let word = u16::from_be_bytes([rest[0], rest[1]]);
                self.bit_buf |= u64::from(word) << (48 - self.bit_count);
                self.bit_count += 16;
                self.pos += 2;
            } else {
                self.bit_buf |= u64::from(rest[0]) << (56 - self.bit_count);
                self.bit_count += 8;
                self.pos += 1;
            }
        }
    }

    #[inline]
    fn ensure(&mut self, n: u32) {
        if self.bit_count < n.max(REFILL_THRESHOLD) {
            self.fill();
        }
    }

    #[inline]
    fn consume(&mut self, n: u32) {
        // n <= 32 so the shift never reaches 64
        self.bit_buf <<= n;
        self.bit_count -= n;
    }

    /// Read one bit. Returns `false` past the end of data.
    #[inline]
    pub fn read_bit(&mut self) -> bool {
        if self.bit_count == 0 {
            self.fill();
            if self.bit_count == 0 {
                return false;
            }
        }
        let bit = self.bit_buf & (1 << 63) != 0;
        self.consume(1);
        bit
    }

    /// Read `n` bits (1..=32), most significant first.
    ///
    /// Past the end of data the missing low-order bits read as zero.
    #[inline]
    pub fn read_bits(&mut self, n: u8) -> u32 {
        debug_assert!((1..=32).contains(&n), "bit count {} out of range", n);
        let n = u32::from(n);
        self.ensure(n);

        if self.bit_count >= n {
            let value = (self.bit_buf >> (64 - n)) as u32;
            self.consume(n);
            return value;
        }

        let available = self.bit_count;
        let mut value = 0u32;
        if available > 0 {
            value = (self.bit_buf >> (64 - available)) as u32;
            self.consume(available);
        }
        // widen before shifting: a zero-bit tail would otherwise shift by 32
        ((u64::from(value) << (n - available)) & 0xFFFF_FFFF) as u32
    }

    /// Look at the next `n` bits (1..=32) without consuming them.
    ///
    /// Returns `None` if fewer than `n` bits remain even after a refill.
    #[inline]
    pub fn peek_bits(&mut self, n: u8) -> Option<u32> {
        debug_assert!((1..=32).contains(&n), "bit count {} out of range", n);
        let n = u32::from(n);
        self.ensure(n);
        if self.bit_count < n {
            return None;
        }
        Some((self.bit_buf >> (64 - n)) as u32)
    }

    /// Discard `n` bits (0..=32), spanning a refill when needed.
    ///
    /// A peek of `m` bits followed by `skip_bits(k)` for `k <= m` leaves the
    /// reader exactly where `read_bits(k)` would.
    #[inline]
    pub fn skip_bits(&mut self, n: u8) {
        let mut n = u32::from(n);
        if self.bit_count >= n {
            self.consume(n);
            return;
        }

        n -= self.bit_count;
        self.bit_buf = 0;
        self.bit_count = 0;

        let whole_bytes = ((n / 8) as usize).min(self.data.len() - self.pos);
        self.pos += whole_bytes;
        n -= (whole_bytes * 8) as u32;

        if n > 0 {
            self.fill();
            let step = n.min(self.bit_count);
            self.consume(step);
        }
    }

    /// True while buffered bits or unread input bytes remain.
    #[inline]
    pub fn has_data(&self) -> bool {
        self.bit_count > 0 || self.pos < self.data.len()
    }

    /// Bits left to read, buffered and unbuffered.
    pub fn bits_remaining(&self) -> u64 {
        u64::from(self.bit_count) + (self.data.len() - self.pos) as u64 * 8
    }
}
