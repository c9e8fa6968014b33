//! Bit-level reader over a caller-provided buffer.

/// A bit-level reader for decoding packed binary records.
///
/// The mirror of [`BitWriter`](crate::BitWriter): fields are extracted
/// MSB-first from a borrowed byte slice, with no alignment between fields.
/// The reader tracks a single bit position and never allocates.
///
/// # Panics
///
/// Reads panic if they run past the end of the borrowed slice. The caller
/// guarantees the buffer holds at least as many bits as will be read.
#[derive(Debug)]
pub struct BitReader<'a> {
    data: &'a [u8],
    bit_pos: usize,
}

impl<'a> BitReader<'a> {
    /// Creates a reader positioned at the start of `data`.
    #[must_use]
    pub const fn new(data: &'a [u8]) -> Self {
        Self { data, bit_pos: 0 }
    }

    /// Returns the number of bits consumed so far.
    #[must_use]
    pub const fn bit_position(&self) -> usize {
        self.bit_pos
    }

    /// Returns the number of bits left in the borrowed slice.
    #[must_use]
    pub const fn bits_remaining(&self) -> usize {
        (self.data.len() * 8).saturating_sub(self.bit_pos)
    }

    /// Moves the cursor to an absolute bit position, forward or backward.
    pub fn seek(&mut self, bit_position: usize) {
        self.bit_pos = bit_position;
    }

    /// Reads a single bit.
    pub fn read_bit(&mut self) -> bool {
        let byte = self.data[self.bit_pos / 8];
        let bit = (byte >> (7 - self.bit_pos % 8)) & 1;
        self.bit_pos += 1;
        bit == 1
    }

    /// Reads `bits` bits as an unsigned integer.
    ///
    /// The first bit read becomes the most significant bit of the result;
    /// `bits == 0` returns 0.
    pub fn read_bits(&mut self, bits: u32) -> u64 {
        debug_assert!(bits <= 64, "bit count {bits} exceeds 64");
        let mut value = 0u64;
        let mut remaining = bits;
        while remaining > 0 && self.bit_pos % 8 != 0 {
            value = (value << 1) | u64::from(self.read_bit());
            remaining -= 1;
        }
        while remaining >= 8 {
            value = (value << 8) | u64::from(self.read_u8());
            remaining -= 8;
        }
        while remaining > 0 {
            value = (value << 1) | u64::from(self.read_bit());
            remaining -= 1;
        }
        value
    }

    /// Reads 8 bits.
    pub fn read_u8(&mut self) -> u8 {
        let idx = self.bit_pos / 8;
        let off = (self.bit_pos % 8) as u32;
        let value = if off == 0 {
            self.data[idx]
        } else {
            (self.data[idx] << off) | (self.data[idx + 1] >> (8 - off))
        };
        self.bit_pos += 8;
        value
    }

    /// Reads 16 bits.
    #[allow(clippy::cast_possible_truncation)]
    pub fn read_u16(&mut self) -> u16 {
        self.read_bits(16) as u16
    }

    /// Reads 32 bits.
    #[allow(clippy::cast_possible_truncation)]
    pub fn read_u32(&mut self) -> u32 {
        self.read_bits(32) as u32
    }

    /// Reads 64 bits.
    pub fn read_u64(&mut self) -> u64 {
        self.read_bits(64)
    }

    /// Fills `out` by reading one byte at a time.
    pub fn read_bytes(&mut self, out: &mut [u8]) {
        for byte in out {
            *byte = self.read_u8();
        }
    }
}
