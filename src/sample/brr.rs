#![doc = r#"
BRR (bit-rate-reduced) block decoding.

A BRR block is 9 bytes: a header byte, then 8 payload bytes holding sixteen
signed 4-bit nibbles (high nibble first). The header byte packs, from bit 0
up: end-of-sample flag, loop flag, a 2-bit prediction filter select, and a
4-bit shift range.

Each nibble is sign-extended, shifted up by the range (then halved), run
through one of four fixed-point prediction filters over the last two
decoded samples, clamped to 16 bits, wrapped to 15 bits, and emitted
doubled to restore the full 16-bit dynamic range.
"#]

use alloc::vec::Vec;

/// Size of one BRR block in bytes.
pub const BRR_BLOCK_SIZE: usize = 9;

const fn sclip15(x: i32) -> i32 {
    if x & 16384 != 0 { x | !16383 } else { x & 16383 }
}

const fn sclamp16(x: i32) -> i32 {
    if x > 32767 {
        32767
    } else if x < -32768 {
        -32768
    } else {
        x
    }
}

/// Decodes a BRR byte stream to linear PCM.
///
/// Decoding stops at the first end-flagged block (inclusive) or when fewer
/// than 9 bytes remain. The returned flag is the end block's loop bit, or
/// `false` when the input ran out before an end flag.
///
/// A shift range above 12 is not an error: the hardware then ignores the
/// nibble's low bits and keeps only its sign at a fixed magnitude, and the
/// decoder reproduces that.
pub fn decode(brr: &[u8]) -> (Vec<i16>, bool) {
    let mut pcm = Vec::with_capacity(brr.len() / BRR_BLOCK_SIZE * 16);
    let mut looped = false;

    let mut s1 = 0i32;
    let mut s2 = 0i32;

    let mut pos = 0;
    while pos + BRR_BLOCK_SIZE <= brr.len() {
        let header = brr[pos];
        let end = header & 1 != 0;
        let loop_flag = header & 2 != 0;
        let filter = (header >> 2) & 3;
        let range = header >> 4;
        let valid_range = range <= 0x0c;

        for &byte in &brr[pos + 1..pos + BRR_BLOCK_SIZE] {
            let high = (byte as i8) >> 4;
            let low = ((byte << 4) as i8) >> 4;

            for nibble in [high, low] {
                let mut out = nibble as i32;
                out = if valid_range {
                    (out << range) >> 1
                } else {
                    out & !0x7ff
                };

                match filter {
                    0 => {}
                    1 => out += s1 + ((-s1) >> 4),
                    2 => out += (s1 << 1) + ((-((s1 << 1) + s1)) >> 5) - s2 + (s2 >> 4),
                    _ => {
                        out += (s1 << 1) + ((-(s1 + (s1 << 2) + (s1 << 3))) >> 6) - s2
                            + (((s2 << 1) + s2) >> 4)
                    }
                }

                out = sclip15(sclamp16(out));

                s2 = s1;
                s1 = out;

                pcm.push((out << 1) as i16);
            }
        }

        pos += BRR_BLOCK_SIZE;

        if end {
            looped = loop_flag;
            break;
        }
    }

    (pcm, looped)
}
