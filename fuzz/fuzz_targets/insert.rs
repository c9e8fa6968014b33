#![no_main]

use bitstream::BitWriter;
use libfuzzer_sys::fuzz_target;

const BUF_BYTES: usize = 256;
const BUF_BITS: usize = BUF_BYTES * 8;

fn to_bits(buf: &[u8]) -> Vec<bool> {
    buf.iter()
        .flat_map(|&byte| (0..8).map(move |i| (byte >> (7 - i)) & 1 == 1))
        .collect()
}

fuzz_target!(|data: &[u8]| {
    let mut buf = [0u8; BUF_BYTES];
    for (dst, src) in buf.iter_mut().zip(data) {
        *dst = *src;
    }
    let mut model = to_bits(&buf);

    let mut writer = BitWriter::new(&mut buf);
    let mut idx = 0usize;

    // Drive random seek+insert pairs and cross-check against a naive
    // bit-vector model of the same buffer.
    while idx + 2 < data.len() && idx < 512 {
        let pos = (usize::from(data[idx]) * 8 + usize::from(data[idx + 1])) % (BUF_BITS - 64);
        let bits = u32::from(data[idx + 2] % 64) + 1;
        let value = u64::from(data[idx]) << 16 | u64::from(data[idx + 1]) << 8
            | u64::from(data[idx + 2]);
        idx += 3;

        writer.seek(pos);
        writer.insert_bits(value, bits);
        assert_eq!(writer.size_in_bits(), pos + bits as usize);

        let masked = if bits == 64 {
            value
        } else {
            value & ((1u64 << bits) - 1)
        };
        let field: Vec<bool> = (0..bits).rev().map(|i| (masked >> i) & 1 == 1).collect();
        model.splice(pos..pos, field);
        model.truncate(BUF_BITS);
    }

    for (i, &bit) in model.iter().enumerate() {
        let byte = writer.data()[i / 8];
        assert_eq!((byte >> (7 - i % 8)) & 1 == 1, bit, "bit {i} diverged");
    }
});
