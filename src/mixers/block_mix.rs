use crate::lookup3::{mix, BLOCK_BYTES};

pub const IN_SIZE_BYTES: usize = BLOCK_BYTES;
pub const OUT_SIZE_BYTES: usize = 96 / 8;
pub const DIGEST_SIZE_BYTES: usize = 64 / 8;

// Play with this to see how diffusion builds up over consecutive blocks.
const ROUNDS: usize = 1;

/// The lookup3 block mix, as applied to every 12-byte block but the last.
///
/// The input is loaded into `(a, b, c)` little-endian, exactly as the hash
/// absorbs it.  Rounds after the first absorb zero blocks.
pub fn mix_input(in_bytes: &[u8], out_bytes: &mut [u8]) {
    assert!(in_bytes.len() == IN_SIZE_BYTES);
    assert!(out_bytes.len() == OUT_SIZE_BYTES);

    let [mut a, mut b, mut c] = super::load_words(in_bytes);
    for _ in 0..ROUNDS {
        mix(&mut a, &mut b, &mut c);
    }

    // Copy the mixed state to the output.
    out_bytes[0..4].copy_from_slice(&u32::to_le_bytes(a));
    out_bytes[4..8].copy_from_slice(&u32::to_le_bytes(b));
    out_bytes[8..12].copy_from_slice(&u32::to_le_bytes(c));
}
