//! Bit-level writer over a caller-provided buffer.

/// A bit-level writer for encoding packed binary records.
///
/// The writer borrows a byte buffer from the caller and packs fields into it
/// MSB-first, with no alignment between fields. It never allocates and never
/// grows the buffer; the caller sizes the buffer for everything that will be
/// written or inserted into it.
///
/// Write operations overwrite: the target bits are cleared before the new
/// value is set, so the encoded field is the same regardless of what the
/// buffer held before. Insert operations are non-destructive: existing
/// content at and after the cursor is shifted forward to make room.
///
/// # Panics
///
/// Operations panic if they run past the end of the borrowed slice. Staying
/// within the buffer is the caller's contract, the same as with slice
/// indexing.
#[derive(Debug)]
pub struct BitWriter<'a> {
    buf: &'a mut [u8],
    /// Byte the cursor is in.
    byte_offset: usize,
    /// Bit within that byte (0-7), counted from the MSB.
    bit_offset: u32,
}

impl<'a> BitWriter<'a> {
    /// Creates a writer positioned at the start of `buf`.
    pub fn new(buf: &'a mut [u8]) -> Self {
        Self {
            buf,
            byte_offset: 0,
            bit_offset: 0,
        }
    }

    /// Returns the number of bits committed so far.
    #[must_use]
    pub const fn size_in_bits(&self) -> usize {
        self.byte_offset * 8 + self.bit_offset as usize
    }

    /// Returns the number of bytes touched so far, rounding a partial
    /// trailing byte up.
    #[must_use]
    pub const fn size_in_bytes(&self) -> usize {
        self.byte_offset + (self.bit_offset as usize + 7) / 8
    }

    /// Returns a view of the whole borrowed buffer.
    #[must_use]
    pub fn data(&self) -> &[u8] {
        self.buf
    }

    /// Moves the cursor to an absolute bit position, forward or backward.
    ///
    /// Nothing is written; this is how previously written regions get
    /// revisited for patching.
    pub fn seek(&mut self, bit_position: usize) {
        self.byte_offset = bit_position / 8;
        self.bit_offset = (bit_position % 8) as u32;
    }
}

/// Write family: overwrite semantics.
impl BitWriter<'_> {
    /// Writes a single bit.
    pub fn write_bit(&mut self, value: bool) {
        let mask = 0x80u8 >> self.bit_offset;
        if value {
            self.buf[self.byte_offset] |= mask;
        } else {
            self.buf[self.byte_offset] &= !mask;
        }
        self.bit_offset += 1;
        if self.bit_offset == 8 {
            self.bit_offset = 0;
            self.byte_offset += 1;
        }
    }

    /// Writes the low `bits` bits of `value`, field MSB first.
    ///
    /// Equivalent to `bits` sequential [`write_bit`](Self::write_bit) calls;
    /// `bits == 0` is a no-op. Higher bits of `value` are ignored.
    pub fn write_bits(&mut self, value: u64, bits: u32) {
        debug_assert!(bits <= 64, "bit count {bits} exceeds 64");
        let mut remaining = bits;
        while remaining > 0 && self.bit_offset != 0 {
            remaining -= 1;
            self.write_bit((value >> remaining) & 1 == 1);
        }
        while remaining >= 8 {
            remaining -= 8;
            #[allow(clippy::cast_possible_truncation)]
            self.write_u8((value >> remaining) as u8);
        }
        while remaining > 0 {
            remaining -= 1;
            self.write_bit((value >> remaining) & 1 == 1);
        }
    }

    /// Writes 8 bits.
    pub fn write_u8(&mut self, value: u8) {
        if self.bit_offset == 0 {
            self.buf[self.byte_offset] = value;
        } else {
            let off = self.bit_offset;
            let head = &mut self.buf[self.byte_offset];
            *head = (*head & (0xFFu8 << (8 - off))) | (value >> off);
            let tail = &mut self.buf[self.byte_offset + 1];
            *tail = (*tail & (0xFFu8 >> off)) | (value << (8 - off));
        }
        self.byte_offset += 1;
    }

    /// Writes 16 bits.
    pub fn write_u16(&mut self, value: u16) {
        self.write_bits(u64::from(value), 16);
    }

    /// Writes 32 bits.
    pub fn write_u32(&mut self, value: u32) {
        self.write_bits(u64::from(value), 32);
    }

    /// Writes 64 bits.
    pub fn write_u64(&mut self, value: u64) {
        self.write_bits(value, 64);
    }

    /// Writes every byte of `bytes` in order.
    pub fn write_bytes(&mut self, bytes: &[u8]) {
        if self.bit_offset == 0 {
            let end = self.byte_offset + bytes.len();
            self.buf[self.byte_offset..end].copy_from_slice(bytes);
            self.byte_offset = end;
        } else {
            for &byte in bytes {
                self.write_u8(byte);
            }
        }
    }

    /// Writes the same bit `count` times.
    ///
    /// Byte-aligned whole-byte runs are filled directly; leading and
    /// trailing partial bytes go bit by bit.
    pub fn write_repeated_bit(&mut self, value: bool, count: usize) {
        let mut remaining = count;
        while remaining > 0 && self.bit_offset != 0 {
            self.write_bit(value);
            remaining -= 1;
        }
        let whole = remaining / 8;
        if whole > 0 {
            let fill = if value { 0xFF } else { 0x00 };
            self.buf[self.byte_offset..self.byte_offset + whole].fill(fill);
            self.byte_offset += whole;
            remaining -= whole * 8;
        }
        while remaining > 0 {
            self.write_bit(value);
            remaining -= 1;
        }
    }

    /// Writes the same byte `count` times.
    pub fn write_repeated_u8(&mut self, value: u8, count: usize) {
        if self.bit_offset == 0 {
            self.buf[self.byte_offset..self.byte_offset + count].fill(value);
            self.byte_offset += count;
        } else {
            for _ in 0..count {
                self.write_u8(value);
            }
        }
    }
}

/// Insert family: non-destructive semantics.
///
/// An insert shifts everything at and after the cursor forward by the width
/// of the inserted field, through the end of the borrowed slice, then writes
/// the new value into the vacated window. Bits before the cursor are
/// untouched; trailing content (including bytes the caller pre-populated
/// beyond the current position) survives, moved by exactly the field width.
/// Bits shifted past the end of the slice are lost.
impl BitWriter<'_> {
    /// Inserts a single bit at the cursor.
    pub fn insert_bit(&mut self, value: bool) {
        self.shift_tail(self.size_in_bits(), 1);
        self.write_bit(value);
    }

    /// Inserts the low `bits` bits of `value` at the cursor, field MSB first.
    ///
    /// `bits == 0` is a no-op.
    pub fn insert_bits(&mut self, value: u64, bits: u32) {
        debug_assert!(bits <= 64, "bit count {bits} exceeds 64");
        if bits == 0 {
            return;
        }
        self.shift_tail(self.size_in_bits(), bits as usize);
        self.write_bits(value, bits);
    }

    /// Inserts 8 bits at the cursor.
    pub fn insert_u8(&mut self, value: u8) {
        self.insert_bits(u64::from(value), 8);
    }

    /// Inserts 16 bits at the cursor.
    pub fn insert_u16(&mut self, value: u16) {
        self.insert_bits(u64::from(value), 16);
    }

    /// Inserts 32 bits at the cursor.
    pub fn insert_u32(&mut self, value: u32) {
        self.insert_bits(u64::from(value), 32);
    }

    /// Inserts 64 bits at the cursor.
    pub fn insert_u64(&mut self, value: u64) {
        self.insert_bits(value, 64);
    }

    /// Inserts every byte of `bytes` at the cursor.
    ///
    /// The trailing region is shifted once, by the full width, rather than
    /// once per byte.
    pub fn insert_bytes(&mut self, bytes: &[u8]) {
        if bytes.is_empty() {
            return;
        }
        self.shift_tail(self.size_in_bits(), bytes.len() * 8);
        self.write_bytes(bytes);
    }

    /// Shifts every bit from `start` through the end of the buffer forward
    /// by `bits` positions.
    ///
    /// On return, bits before `start` are unchanged, bit `start + bits + i`
    /// holds what bit `start + i` held, and the vacated window
    /// `[start, start + bits)` is unspecified (the caller writes it next).
    ///
    /// Bytes are rewritten from the end of the slice toward the cursor so a
    /// source byte is never read after it has been overwritten.
    fn shift_tail(&mut self, start: usize, bits: usize) {
        if bits == 0 {
            return;
        }
        let whole = bits / 8;
        #[allow(clippy::cast_possible_truncation)]
        let rem = (bits % 8) as u32;
        let first = start / 8;
        let lead = (start % 8) as u32;
        let keep = self.buf[first];
        for i in (first + whole..self.buf.len()).rev() {
            let lo = self.buf[i - whole];
            self.buf[i] = if rem == 0 {
                lo
            } else {
                let hi = if i - whole > first {
                    self.buf[i - whole - 1]
                } else {
                    0
                };
                (hi << (8 - rem)) | (lo >> rem)
            };
        }
        // A sub-byte shift recomputes the cursor byte as well; the bits ahead
        // of `start` in that byte must keep their original values.
        if whole == 0 && lead > 0 {
            let mask = 0xFFu8 >> lead;
            self.buf[first] = (keep & !mask) | (self.buf[first] & mask);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_writer_is_empty() {
        let mut buf = [0u8; 4];
        let writer = BitWriter::new(&mut buf);
        assert_eq!(writer.size_in_bits(), 0);
        assert_eq!(writer.size_in_bytes(), 0);
    }

    #[test]
    fn write_bit_msb_first() {
        let mut buf = [0u8; 2];
        let mut writer = BitWriter::new(&mut buf);
        writer.write_bit(true);
        assert_eq!(writer.size_in_bits(), 1);
        assert_eq!(writer.size_in_bytes(), 1);
        assert_eq!(buf[0], 0x80);
    }

    #[test]
    fn write_bit_fills_byte() {
        let mut buf = [0u8; 2];
        let mut writer = BitWriter::new(&mut buf);
        for bit in [true, false, true, false, true, false, true, false] {
            writer.write_bit(bit);
        }
        assert_eq!(writer.size_in_bits(), 8);
        assert_eq!(buf[0], 0xAA);
    }

    #[test]
    fn write_bit_overwrites_stale_content() {
        let mut buf = [0xFFu8; 1];
        let mut writer = BitWriter::new(&mut buf);
        writer.write_bit(false);
        writer.write_bit(true);
        writer.write_bit(false);
        assert_eq!(buf[0], 0b0101_1111);
    }

    #[test]
    fn write_bits_partial_byte() {
        let mut buf = [0u8; 2];
        let mut writer = BitWriter::new(&mut buf);
        writer.write_bits(0x1, 4);
        assert_eq!(writer.size_in_bytes(), 1);
        assert_eq!(buf[0], 0x10);
    }

    #[test]
    fn write_bits_zero_is_noop() {
        let mut buf = [0u8; 2];
        let mut writer = BitWriter::new(&mut buf);
        writer.write_bits(0xFF, 0);
        assert_eq!(writer.size_in_bits(), 0);
        assert_eq!(buf, [0, 0]);
    }

    #[test]
    fn write_bits_ignores_high_bits() {
        let mut buf = [0u8; 2];
        let mut writer = BitWriter::new(&mut buf);
        writer.write_bits(u64::MAX, 4);
        assert_eq!(writer.size_in_bits(), 4);
        assert_eq!(buf[0], 0xF0);
    }

    #[test]
    fn write_bits_spans_bytes() {
        let mut buf = [0u8; 3];
        let mut writer = BitWriter::new(&mut buf);
        writer.write_bits(0x123, 12);
        assert_eq!(writer.size_in_bytes(), 2);
        assert_eq!(&writer.data()[..2], &[0x12, 0x30]);
        writer.write_bits(0x123, 12);
        assert_eq!(writer.size_in_bytes(), 3);
        assert_eq!(buf, [0x12, 0x31, 0x23]);
    }

    #[test]
    fn write_u8_unaligned() {
        let mut buf = [0u8; 3];
        let mut writer = BitWriter::new(&mut buf);
        writer.write_u8(0x12);
        writer.write_bit(true);
        writer.write_u8(0xF1);
        assert_eq!(writer.size_in_bytes(), 3);
        assert_eq!(buf, [0x12, 0xF8, 0x80]);
    }

    #[test]
    fn write_u8_unaligned_preserves_neighbours() {
        let mut buf = [0xFFu8; 2];
        let mut writer = BitWriter::new(&mut buf);
        writer.seek(4);
        writer.write_u8(0x00);
        // top nibble of byte 0 and low nibble of byte 1 are outside the field
        assert_eq!(buf, [0xF0, 0x0F]);
    }

    #[test]
    fn write_u64_matches_byte_layout() {
        let mut buf = [0u8; 8];
        let mut writer = BitWriter::new(&mut buf);
        writer.write_u64(0x0123_4567_89AB_CDEF);
        assert_eq!(buf, [0x01, 0x23, 0x45, 0x67, 0x89, 0xAB, 0xCD, 0xEF]);
    }

    #[test]
    fn write_bytes_aligned_and_not() {
        let mut buf = [0u8; 4];
        let mut writer = BitWriter::new(&mut buf);
        writer.write_bytes(&[0xAB, 0xCD]);
        assert_eq!(&buf[..2], &[0xAB, 0xCD]);

        let mut buf = [0u8; 4];
        let mut writer = BitWriter::new(&mut buf);
        writer.write_bits(0xF, 4);
        writer.write_bytes(&[0xAB, 0xCD]);
        assert_eq!(writer.size_in_bits(), 20);
        assert_eq!(&buf[..3], &[0xFA, 0xBC, 0xD0]);
    }

    #[test]
    fn write_repeated_bit_aligned_run() {
        let mut buf = [0u8; 4];
        let mut writer = BitWriter::new(&mut buf);
        writer.write_repeated_bit(true, 26);
        assert_eq!(writer.size_in_bits(), 26);
        assert_eq!(buf, [0xFF, 0xFF, 0xFF, 0xC0]);
    }

    #[test]
    fn write_repeated_bit_unaligned_run() {
        let mut buf = [0u8; 3];
        let mut writer = BitWriter::new(&mut buf);
        writer.write_bits(0, 3);
        writer.write_repeated_bit(true, 18);
        assert_eq!(writer.size_in_bits(), 21);
        assert_eq!(buf, [0x1F, 0xFF, 0xF8]);
    }

    #[test]
    fn write_repeated_bit_clears() {
        let mut buf = [0xFFu8; 2];
        let mut writer = BitWriter::new(&mut buf);
        writer.write_repeated_bit(false, 12);
        assert_eq!(buf, [0x00, 0x0F]);
    }

    #[test]
    fn write_repeated_u8() {
        let mut buf = [0u8; 4];
        let mut writer = BitWriter::new(&mut buf);
        writer.write_repeated_u8(0xAB, 3);
        assert_eq!(writer.size_in_bytes(), 3);
        assert_eq!(buf, [0xAB, 0xAB, 0xAB, 0x00]);

        let mut buf = [0u8; 4];
        let mut writer = BitWriter::new(&mut buf);
        writer.write_bit(true);
        writer.write_repeated_u8(0xFF, 2);
        assert_eq!(writer.size_in_bits(), 17);
        assert_eq!(&buf[..3], &[0xFF, 0xFF, 0x80]);
    }

    #[test]
    fn repeated_zero_counts_are_noops() {
        let mut buf = [0u8; 2];
        let mut writer = BitWriter::new(&mut buf);
        writer.write_repeated_bit(true, 0);
        writer.write_repeated_u8(0xFF, 0);
        assert_eq!(writer.size_in_bits(), 0);
        assert_eq!(buf, [0, 0]);
    }

    #[test]
    fn seek_and_patch() {
        let mut buf = [0u8; 3];
        let mut writer = BitWriter::new(&mut buf);
        writer.write_u8(0x00);
        writer.write_u8(0xBB);
        writer.seek(0);
        writer.write_u8(0xAA);
        writer.seek(16);
        writer.write_u8(0xCC);
        assert_eq!(buf, [0xAA, 0xBB, 0xCC]);
    }

    #[test]
    fn seek_mid_byte_patch_keeps_neighbours() {
        let mut buf = [0u8; 2];
        let mut writer = BitWriter::new(&mut buf);
        writer.write_bits(0b11_1111_1111, 10);
        writer.seek(3);
        writer.write_bits(0b000, 3);
        assert_eq!(buf, [0b1110_0011, 0b1100_0000]);
    }

    #[test]
    fn insert_bit_shifts_prefilled_tail() {
        let mut buf = [0xFFu8; 3];
        let mut writer = BitWriter::new(&mut buf);
        writer.insert_bit(false);
        assert_eq!(writer.size_in_bits(), 1);
        assert_eq!(writer.size_in_bytes(), 1);
        assert_eq!(buf, [0x7F, 0xFF, 0xFF]);
    }

    #[test]
    fn insert_bits_mid_byte() {
        let mut buf = [0xAAu8; 3];
        let mut writer = BitWriter::new(&mut buf);
        writer.write_bits(0xF, 4);
        writer.insert_bits(0b01, 2);
        assert_eq!(writer.size_in_bits(), 6);
        // prefix 1111, inserted 01, then the old tail 1010 1010... shifted
        assert_eq!(buf, [0xF6, 0xAA, 0xAA]);
    }

    #[test]
    fn insert_u8_byte_aligned() {
        let mut buf = [0x12u8, 0x34, 0x56, 0x78];
        let mut writer = BitWriter::new(&mut buf);
        writer.seek(8);
        writer.insert_u8(0xAB);
        assert_eq!(writer.size_in_bits(), 16);
        assert_eq!(buf, [0x12, 0xAB, 0x34, 0x56]);
    }

    #[test]
    fn insert_bytes_shifts_once() {
        let mut buf = [0x11u8, 0x22, 0x33, 0x44, 0x55];
        let mut writer = BitWriter::new(&mut buf);
        writer.seek(8);
        writer.insert_bytes(&[0xAA, 0xBB]);
        assert_eq!(writer.size_in_bits(), 32);
        assert_eq!(buf, [0x11, 0xAA, 0xBB, 0x22, 0x33]);
    }

    #[test]
    fn insert_bits_zero_is_noop() {
        let mut buf = [0x55u8; 2];
        let mut writer = BitWriter::new(&mut buf);
        writer.insert_bits(0xFF, 0);
        writer.insert_bytes(&[]);
        assert_eq!(writer.size_in_bits(), 0);
        assert_eq!(buf, [0x55, 0x55]);
    }

    #[test]
    fn insert_u64_unaligned() {
        let mut buf = [0u8; 12];
        let mut writer = BitWriter::new(&mut buf);
        writer.write_bits(0b101, 3);
        writer.insert_u64(u64::MAX);
        assert_eq!(writer.size_in_bits(), 67);
        assert_eq!(buf[0], 0b1011_1111);
        assert_eq!(&buf[1..8], &[0xFF; 7]);
        assert_eq!(buf[8], 0b1110_0000);
    }

    #[test]
    fn insert_preserves_bits_before_cursor() {
        let mut buf = [0b1100_1100u8, 0b0011_0011];
        let mut writer = BitWriter::new(&mut buf);
        writer.seek(6);
        writer.insert_bits(0b1, 1);
        // bits 0-5 unchanged, inserted 1 at bit 6, old bits 6.. shifted by 1
        assert_eq!(buf[0], 0b1100_1110);
        assert_eq!(buf[1], 0b0001_1001);
    }
}
