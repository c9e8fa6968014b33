#![no_main]

use bitstream::BitReader;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let mut reader = BitReader::new(data);
    let mut idx = 0usize;

    // Use input bytes to drive a bounded sequence of in-range reads.
    while idx < data.len() && idx < 1024 {
        let op = data[idx] % 4;
        idx += 1;

        match op {
            0 => {
                if reader.bits_remaining() >= 1 {
                    let _ = reader.read_bit();
                }
            }
            1 => {
                let bits = u32::from(data[idx.saturating_sub(1)] % 64) + 1;
                if reader.bits_remaining() >= bits as usize {
                    let _ = reader.read_bits(bits);
                }
            }
            2 => {
                if reader.bits_remaining() >= 8 {
                    let _ = reader.read_u8();
                }
            }
            _ => {
                // rewind somewhere still inside the buffer
                let pos = usize::from(data[idx.saturating_sub(1)]) % (data.len() * 8);
                reader.seek(pos);
            }
        }
    }
});
