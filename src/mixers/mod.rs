//! Fixed-size views of the lookup3 pipeline, for diffusion measurements.
//!
//! Each submodule exposes `mix_input()` plus its input, output and digest
//! sizes in bytes, so `stats::compute_stats()` can drive them uniformly.

pub mod block_mix;
pub mod final_mix;
pub mod hash64;

/// Loads a 12-byte block as three little-endian words `[a, b, c]`.
fn load_words(bytes: &[u8]) -> [u32; 3] {
    let word = |i: usize| u32::from_le_bytes([bytes[i], bytes[i + 1], bytes[i + 2], bytes[i + 3]]);
    [word(0), word(4), word(8)]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lookup3;

    #[test]
    fn words_are_little_endian() {
        let bytes = [1, 0, 0, 0, 0, 1, 0, 0, 0, 0, 0, 0x80];
        assert_eq!(load_words(&bytes), [1, 0x100, 0x8000_0000]);
    }

    #[test]
    fn block_mix_matches_lookup3() {
        let input: Vec<u8> = (0u8..12).collect();
        let mut out = [0u8; block_mix::OUT_SIZE_BYTES];
        block_mix::mix_input(&input, &mut out);

        let [mut a, mut b, mut c] = load_words(&input);
        lookup3::mix(&mut a, &mut b, &mut c);
        assert_eq!(load_words(&out), [a, b, c]);
    }

    #[test]
    fn final_mix_keeps_b_and_c() {
        let input = [0xffu8; 12];
        let mut out = [0u8; final_mix::OUT_SIZE_BYTES];
        final_mix::mix_input(&input, &mut out);

        let (mut a, mut b, mut c) = (u32::MAX, u32::MAX, u32::MAX);
        lookup3::final_mix(&mut a, &mut b, &mut c);
        assert_eq!(out[0..4], b.to_le_bytes());
        assert_eq!(out[4..8], c.to_le_bytes());
    }

    #[test]
    fn hash64_view_is_the_hash() {
        let input = [7u8; hash64::IN_SIZE_BYTES];
        let mut out = [0u8; hash64::OUT_SIZE_BYTES];
        hash64::mix_input(&input, &mut out);
        assert_eq!(u64::from_le_bytes(out), lookup3::hash64(&input));
    }
}
